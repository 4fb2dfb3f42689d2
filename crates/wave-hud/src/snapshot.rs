//! Player stats snapshot and the sparse updates merged into it
//!
//! Merging keeps the host's truthiness rule: a field only replaces the
//! snapshot value when it is present and truthy. Zero, NaN, the empty string
//! and `null` all count as "not sent", so a real zero balance or zero health
//! can't be expressed through an update.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Last known player stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HudSnapshot {
    pub player_id: u32,
    pub player_name: String,
    pub bank_money: i64,
    pub cash_money: i64,
    pub faction_name: String,
    pub group_name: String,
    /// 0-100
    pub health: f64,
    /// 0-100
    pub armor: f64,
    /// 0-100
    pub energy: f64,
}

impl Default for HudSnapshot {
    fn default() -> Self {
        Self {
            player_id: 0,
            player_name: "Unknown".to_string(),
            bank_money: 0,
            cash_money: 0,
            faction_name: "None".to_string(),
            group_name: "user".to_string(),
            health: 100.0,
            armor: 0.0,
            energy: 100.0,
        }
    }
}

/// Sparse update delivered with `wave_hud:updateData`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HudUpdate {
    #[serde(default, deserialize_with = "whole_u32")]
    pub id: Option<u32>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "whole_i64")]
    pub bank_money: Option<i64>,
    #[serde(default, deserialize_with = "whole_i64")]
    pub cash_money: Option<i64>,
    pub faction: Option<String>,
    pub group: Option<String>,
    pub health: Option<f64>,
    pub armor: Option<f64>,
    pub energy: Option<f64>,
}

impl HudUpdate {
    /// Decode an `updateData` payload field by field.
    ///
    /// A field of the wrong type is logged and skipped; the other fields
    /// still apply. Only a payload that isn't a JSON object is an error.
    pub fn from_payload(payload: Value) -> Result<Self> {
        let mut fields: Map<String, Value> = serde_json::from_value(payload)?;
        Ok(Self {
            id: field(&mut fields, "id", whole_u32),
            name: field(&mut fields, "name", Option::<String>::deserialize),
            bank_money: field(&mut fields, "bankMoney", whole_i64),
            cash_money: field(&mut fields, "cashMoney", whole_i64),
            faction: field(&mut fields, "faction", Option::<String>::deserialize),
            group: field(&mut fields, "group", Option::<String>::deserialize),
            health: field(&mut fields, "health", Option::<f64>::deserialize),
            armor: field(&mut fields, "armor", Option::<f64>::deserialize),
            energy: field(&mut fields, "energy", Option::<f64>::deserialize),
        })
    }
}

fn field<T>(
    fields: &mut Map<String, Value>,
    key: &str,
    decode: impl FnOnce(Value) -> serde_json::Result<Option<T>>,
) -> Option<T> {
    let value = fields.remove(key)?;
    match decode(value) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!("[HUD] Skipping field {key}: {e}");
            None
        }
    }
}

impl HudSnapshot {
    /// Overwrite every field that is present and truthy in `update`
    pub fn merge_update(&mut self, update: &HudUpdate) {
        merge(&mut self.player_id, &update.id);
        merge(&mut self.player_name, &update.name);
        merge(&mut self.bank_money, &update.bank_money);
        merge(&mut self.cash_money, &update.cash_money);
        merge(&mut self.faction_name, &update.faction);
        merge(&mut self.group_name, &update.group);
        merge(&mut self.health, &update.health);
        merge(&mut self.armor, &update.armor);
        merge(&mut self.energy, &update.energy);
    }
}

fn merge<T: Truthy + Clone>(slot: &mut T, incoming: &Option<T>) {
    if let Some(value) = incoming.as_ref().filter(|v| v.is_truthy()) {
        *slot = value.clone();
    }
}

/// Host-side truthiness of a field value
trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for u32 {
    fn is_truthy(&self) -> bool {
        *self != 0
    }
}

impl Truthy for i64 {
    fn is_truthy(&self) -> bool {
        *self != 0
    }
}

impl Truthy for f64 {
    fn is_truthy(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

// Hosts often send integral values as floats (1500.0).
fn whole_i64<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let in_range = (i64::MIN as f64..i64::MAX as f64).contains(&value);
    if value.fract() != 0.0 || !value.is_finite() || !in_range {
        return Err(serde::de::Error::custom(format!(
            "expected a whole number, got {value}"
        )));
    }
    Ok(Some(value as i64))
}

fn whole_u32<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match whole_i64(deserializer)? {
        None => Ok(None),
        Some(value) => u32::try_from(value)
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("player id out of range: {value}"))),
    }
}
