//! Test doubles for the HUD client
//!
//! - [`RecordingBridge`] stores emitted events and lets tests deliver inbound
//!   ones to registered handlers
//! - [`RecordingTarget`] records every render call in order

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::bridge::{EventHandler, HostBridge};
use crate::format::BarView;
use crate::render::{HudRegion, RenderTarget};

/// In-memory bridge that records traffic in both directions
#[derive(Default)]
pub struct RecordingBridge {
    handlers: Mutex<HashMap<String, Vec<EventHandler>>>,
    emitted: Mutex<Vec<(String, Value)>>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an inbound event to every handler registered for `name`.
    /// Returns the number of handlers invoked.
    pub fn deliver(&self, name: &str, payload: Value) -> usize {
        let handlers = self.handlers.lock().unwrap_or_else(|e| e.into_inner());
        let Some(registered) = handlers.get(name) else {
            return 0;
        };
        for handler in registered {
            handler(payload.clone());
        }
        registered.len()
    }

    /// Number of handlers registered for `name`
    pub fn handler_count(&self, name: &str) -> usize {
        self.handlers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .map_or(0, Vec::len)
    }

    /// Every emitted event, oldest first
    pub fn emitted(&self) -> Vec<(String, Value)> {
        self.emitted.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// How many times `name` was emitted
    pub fn emitted_count(&self, name: &str) -> usize {
        self.emitted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|(n, _)| n == name)
            .count()
    }
}

impl HostBridge for RecordingBridge {
    fn on_event(&self, name: &str, handler: EventHandler) {
        self.handlers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(name.to_string())
            .or_default()
            .push(handler);
    }

    fn emit(&self, name: &str, payload: Value) {
        self.emitted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((name.to_string(), payload));
    }
}

/// One call made on a [`RenderTarget`]
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    PlayerId(String),
    PlayerName(String),
    BankMoney(String),
    CashMoney(String),
    FactionName(String),
    GroupName(String),
    HealthBar(BarView),
    ArmorBar(BarView),
    EnergyBar(BarView),
    Region(HudRegion, bool),
    Loading(bool),
}

/// Render target that records calls instead of drawing
#[derive(Debug, Default)]
pub struct RecordingTarget {
    pub calls: Vec<RenderCall>,
}

impl RecordingTarget {
    /// Number of full renders seen (counted by player id writes)
    pub fn render_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RenderCall::PlayerId(_)))
            .count()
    }

    pub fn last_text(&self, pick: fn(&RenderCall) -> Option<&String>) -> Option<&str> {
        self.calls.iter().rev().find_map(pick).map(String::as_str)
    }

    pub fn last_health_bar(&self) -> Option<&BarView> {
        self.calls.iter().rev().find_map(|c| match c {
            RenderCall::HealthBar(bar) => Some(bar),
            _ => None,
        })
    }

    pub fn last_armor_bar(&self) -> Option<&BarView> {
        self.calls.iter().rev().find_map(|c| match c {
            RenderCall::ArmorBar(bar) => Some(bar),
            _ => None,
        })
    }

    pub fn last_energy_bar(&self) -> Option<&BarView> {
        self.calls.iter().rev().find_map(|c| match c {
            RenderCall::EnergyBar(bar) => Some(bar),
            _ => None,
        })
    }

    pub fn last_bank_money(&self) -> Option<&str> {
        self.last_text(|c| match c {
            RenderCall::BankMoney(text) => Some(text),
            _ => None,
        })
    }

    pub fn last_player_id(&self) -> Option<&str> {
        self.last_text(|c| match c {
            RenderCall::PlayerId(text) => Some(text),
            _ => None,
        })
    }
}

impl RenderTarget for RecordingTarget {
    fn set_player_id(&mut self, text: &str) {
        self.calls.push(RenderCall::PlayerId(text.to_string()));
    }
    fn set_player_name(&mut self, text: &str) {
        self.calls.push(RenderCall::PlayerName(text.to_string()));
    }
    fn set_bank_money(&mut self, text: &str) {
        self.calls.push(RenderCall::BankMoney(text.to_string()));
    }
    fn set_cash_money(&mut self, text: &str) {
        self.calls.push(RenderCall::CashMoney(text.to_string()));
    }
    fn set_faction_name(&mut self, text: &str) {
        self.calls.push(RenderCall::FactionName(text.to_string()));
    }
    fn set_group_name(&mut self, text: &str) {
        self.calls.push(RenderCall::GroupName(text.to_string()));
    }
    fn set_health_bar(&mut self, bar: &BarView) {
        self.calls.push(RenderCall::HealthBar(bar.clone()));
    }
    fn set_armor_bar(&mut self, bar: &BarView) {
        self.calls.push(RenderCall::ArmorBar(bar.clone()));
    }
    fn set_energy_bar(&mut self, bar: &BarView) {
        self.calls.push(RenderCall::EnergyBar(bar.clone()));
    }
    fn set_region_visible(&mut self, region: HudRegion, visible: bool) {
        self.calls.push(RenderCall::Region(region, visible));
    }
    fn set_loading(&mut self, active: bool) {
        self.calls.push(RenderCall::Loading(active));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn recording_bridge_delivers_to_matching_handlers() {
        let bridge = RecordingBridge::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        bridge.on_event(
            "a",
            Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert_eq!(bridge.deliver("a", json!(null)), 1);
        assert_eq!(bridge.deliver("b", json!(null)), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn recording_bridge_records_emits() {
        let bridge = RecordingBridge::new();
        bridge.emit("x", json!(1));
        bridge.emit("y", json!(null));
        bridge.emit("x", json!(2));

        assert_eq!(bridge.emitted_count("x"), 2);
        assert_eq!(bridge.emitted()[1], ("y".to_string(), json!(null)));
    }
}
