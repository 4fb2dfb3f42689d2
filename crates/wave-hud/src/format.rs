//! Text formatting for HUD values

/// Fill fraction below which a stat bar is drawn as "low"
pub const LOW_FRACTION: f64 = 0.30;

/// Maximum value of health, armor and energy
pub const STAT_MAX: f64 = 100.0;

/// Player id zero-padded to four digits (`7` -> `0007`)
pub fn player_id(id: u32) -> String {
    format!("{id:04}")
}

/// Currency amount with thousands separators (`1234567` -> `$1,234,567`)
pub fn money(prefix: &str, amount: i64) -> String {
    format!("{prefix}{}", thousands(amount))
}

/// Group digits in threes, keeping a leading minus sign
pub fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Group names are shown upper-cased
pub fn group_name(name: &str) -> String {
    name.to_uppercase()
}

/// What a stat bar should display
#[derive(Debug, Clone, PartialEq)]
pub struct BarView {
    /// Filled part of the bar, `0.0..=1.0`
    pub fraction: f64,
    /// Label next to the bar: the current value rounded down
    pub value_text: String,
    /// Pulsing "low" state
    pub low: bool,
}

impl BarView {
    pub fn new(current: f64, max: f64) -> Self {
        let fraction = (current / max).clamp(0.0, 1.0);
        Self {
            fraction,
            value_text: format!("{}", current.floor() as i64),
            low: fraction < LOW_FRACTION,
        }
    }

    /// Bar for a 0-100 stat
    pub fn stat(current: f64) -> Self {
        Self::new(current, STAT_MAX)
    }

    /// CSS width, e.g. `42.5%`
    pub fn width(&self) -> String {
        let percent = (self.fraction * 100.0 * 100.0).round() / 100.0;
        format!("{percent}%")
    }
}
