//! Element tree for the fixed HUD layout
//!
//! Models the page the HUD draws into: elements addressed by id, each with
//! text content, inline style properties and a class list.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::format::BarView;
use crate::render::{HudRegion, RenderTarget};

/// Element ids of the HUD page
pub mod ids {
    pub const PLAYER_ID: &str = "playerID";
    pub const PLAYER_NAME: &str = "playerName";
    pub const BANK_MONEY: &str = "bankMoney";
    pub const CASH_MONEY: &str = "cashMoney";
    pub const FACTION_NAME: &str = "factionName";
    pub const GROUP_NAME: &str = "groupName";
    pub const HEALTH_VALUE: &str = "healthValue";
    pub const HEALTH_BAR: &str = "healthBar";
    pub const ARMOR_VALUE: &str = "armorValue";
    pub const ARMOR_BAR: &str = "armorBar";
    pub const ENERGY_VALUE: &str = "energyValue";
    pub const ENERGY_BAR: &str = "energyBar";
    pub const LOADING_INDICATOR: &str = "loadingIndicator";
}

/// Class hiding a region
pub const HIDDEN_CLASS: &str = "hud-hidden";
/// Class showing the loading indicator
pub const ACTIVE_CLASS: &str = "active";
/// Animation applied to a low bar
pub const PULSE_ANIMATION: &str = "pulse 0.5s ease-in-out infinite";

const ELEMENT_IDS: [&str; 13] = [
    ids::PLAYER_ID,
    ids::PLAYER_NAME,
    ids::BANK_MONEY,
    ids::CASH_MONEY,
    ids::FACTION_NAME,
    ids::GROUP_NAME,
    ids::HEALTH_VALUE,
    ids::HEALTH_BAR,
    ids::ARMOR_VALUE,
    ids::ARMOR_BAR,
    ids::ENERGY_VALUE,
    ids::ENERGY_BAR,
    ids::LOADING_INDICATOR,
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Element {
    pub text: String,
    pub style: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }
}

/// The HUD page as a set of addressable elements
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudLayout {
    elements: BTreeMap<String, Element>,
}

impl Default for HudLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HudLayout {
    /// Layout with every HUD element and both regions present and empty
    pub fn new() -> Self {
        let elements = ELEMENT_IDS
            .iter()
            .copied()
            .chain(HudRegion::ALL.iter().map(|r| r.id()))
            .map(|id| (id.to_string(), Element::default()))
            .collect();
        Self { elements }
    }

    /// Layout containing only the listed elements. Writes to missing
    /// elements are skipped.
    pub fn with_elements<'a>(element_ids: impl IntoIterator<Item = &'a str>) -> Self {
        let elements = element_ids
            .into_iter()
            .map(|id| (id.to_string(), Element::default()))
            .collect();
        Self { elements }
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.element(id).map(|e| e.text.as_str())
    }

    /// Whether `region` is currently visible
    pub fn is_visible(&self, region: HudRegion) -> bool {
        self.element(region.id())
            .is_some_and(|e| !e.has_class(HIDDEN_CLASS))
    }

    fn set_text(&mut self, id: &str, text: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.text = text.to_string();
        }
    }

    fn toggle_class(&mut self, id: &str, class: &str, on: bool) {
        if let Some(element) = self.elements.get_mut(id) {
            if on {
                element.classes.insert(class.to_string());
            } else {
                element.classes.remove(class);
            }
        }
    }

    fn set_bar(&mut self, bar_id: &str, value_id: &str, bar: &BarView) {
        // The bar is only drawn when both of its elements exist.
        if !self.elements.contains_key(bar_id) || !self.elements.contains_key(value_id) {
            return;
        }
        if let Some(element) = self.elements.get_mut(bar_id) {
            element.style.insert("width".to_string(), bar.width());
            let animation = if bar.low { PULSE_ANIMATION } else { "none" };
            element
                .style
                .insert("animation".to_string(), animation.to_string());
        }
        self.set_text(value_id, &bar.value_text);
    }
}

impl RenderTarget for HudLayout {
    fn set_player_id(&mut self, text: &str) {
        self.set_text(ids::PLAYER_ID, text);
    }

    fn set_player_name(&mut self, text: &str) {
        self.set_text(ids::PLAYER_NAME, text);
    }

    fn set_bank_money(&mut self, text: &str) {
        self.set_text(ids::BANK_MONEY, text);
    }

    fn set_cash_money(&mut self, text: &str) {
        self.set_text(ids::CASH_MONEY, text);
    }

    fn set_faction_name(&mut self, text: &str) {
        self.set_text(ids::FACTION_NAME, text);
    }

    fn set_group_name(&mut self, text: &str) {
        self.set_text(ids::GROUP_NAME, text);
    }

    fn set_health_bar(&mut self, bar: &BarView) {
        self.set_bar(ids::HEALTH_BAR, ids::HEALTH_VALUE, bar);
    }

    fn set_armor_bar(&mut self, bar: &BarView) {
        self.set_bar(ids::ARMOR_BAR, ids::ARMOR_VALUE, bar);
    }

    fn set_energy_bar(&mut self, bar: &BarView) {
        self.set_bar(ids::ENERGY_BAR, ids::ENERGY_VALUE, bar);
    }

    fn set_region_visible(&mut self, region: HudRegion, visible: bool) {
        self.toggle_class(region.id(), HIDDEN_CLASS, !visible);
    }

    fn set_loading(&mut self, active: bool) {
        self.toggle_class(ids::LOADING_INDICATOR, ACTIVE_CLASS, active);
    }
}
