//! Display abstraction and snapshot projection

use std::sync::{Arc, Mutex};

use crate::config::HudConfig;
use crate::format::{self, BarView};
use crate::snapshot::HudSnapshot;

/// Independently toggled containers of the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HudRegion {
    TopRight,
    BottomCenter,
}

impl HudRegion {
    pub const ALL: [HudRegion; 2] = [HudRegion::TopRight, HudRegion::BottomCenter];

    /// Layout id of the container
    pub fn id(self) -> &'static str {
        match self {
            HudRegion::TopRight => "top-right",
            HudRegion::BottomCenter => "bottom-center",
        }
    }
}

/// A display surface for the HUD, one method per displayed value
pub trait RenderTarget: Send {
    fn set_player_id(&mut self, text: &str);
    fn set_player_name(&mut self, text: &str);
    fn set_bank_money(&mut self, text: &str);
    fn set_cash_money(&mut self, text: &str);
    fn set_faction_name(&mut self, text: &str);
    fn set_group_name(&mut self, text: &str);
    fn set_health_bar(&mut self, bar: &BarView);
    fn set_armor_bar(&mut self, bar: &BarView);
    fn set_energy_bar(&mut self, bar: &BarView);
    fn set_region_visible(&mut self, region: HudRegion, visible: bool);
    fn set_loading(&mut self, active: bool);
}

/// Project every snapshot field onto `target`
pub fn render<T: RenderTarget + ?Sized>(snapshot: &HudSnapshot, config: &HudConfig, target: &mut T) {
    target.set_player_id(&format::player_id(snapshot.player_id));
    target.set_player_name(&snapshot.player_name);
    target.set_bank_money(&format::money(&config.currency_prefix, snapshot.bank_money));
    target.set_cash_money(&format::money(&config.currency_prefix, snapshot.cash_money));
    target.set_faction_name(&snapshot.faction_name);
    target.set_group_name(&format::group_name(&snapshot.group_name));
    target.set_health_bar(&BarView::stat(snapshot.health));
    target.set_armor_bar(&BarView::stat(snapshot.armor));
    target.set_energy_bar(&BarView::stat(snapshot.energy));
}

/// Target that discards everything, for headless use
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTarget;

impl RenderTarget for NullTarget {
    fn set_player_id(&mut self, _text: &str) {}
    fn set_player_name(&mut self, _text: &str) {}
    fn set_bank_money(&mut self, _text: &str) {}
    fn set_cash_money(&mut self, _text: &str) {}
    fn set_faction_name(&mut self, _text: &str) {}
    fn set_group_name(&mut self, _text: &str) {}
    fn set_health_bar(&mut self, _bar: &BarView) {}
    fn set_armor_bar(&mut self, _bar: &BarView) {}
    fn set_energy_bar(&mut self, _bar: &BarView) {}
    fn set_region_visible(&mut self, _region: HudRegion, _visible: bool) {}
    fn set_loading(&mut self, _active: bool) {}
}

// Lets callers keep a handle on a target they gave to the client.
impl<T: RenderTarget> RenderTarget for Arc<Mutex<T>> {
    fn set_player_id(&mut self, text: &str) {
        lock(&**self).set_player_id(text)
    }
    fn set_player_name(&mut self, text: &str) {
        lock(&**self).set_player_name(text)
    }
    fn set_bank_money(&mut self, text: &str) {
        lock(&**self).set_bank_money(text)
    }
    fn set_cash_money(&mut self, text: &str) {
        lock(&**self).set_cash_money(text)
    }
    fn set_faction_name(&mut self, text: &str) {
        lock(&**self).set_faction_name(text)
    }
    fn set_group_name(&mut self, text: &str) {
        lock(&**self).set_group_name(text)
    }
    fn set_health_bar(&mut self, bar: &BarView) {
        lock(&**self).set_health_bar(bar)
    }
    fn set_armor_bar(&mut self, bar: &BarView) {
        lock(&**self).set_armor_bar(bar)
    }
    fn set_energy_bar(&mut self, bar: &BarView) {
        lock(&**self).set_energy_bar(bar)
    }
    fn set_region_visible(&mut self, region: HudRegion, visible: bool) {
        lock(&**self).set_region_visible(region, visible)
    }
    fn set_loading(&mut self, active: bool) {
        lock(&**self).set_loading(active)
    }
}

fn lock<T>(shared: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
