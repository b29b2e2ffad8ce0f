//! Display formatting for computed values.

use serde::{Deserialize, Serialize};

/// Formatting options for a displayed value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    /// Fixed number of fractional digits, rounded half-up
    pub digits: Option<u8>,
    /// Thousands separator for the integer part
    pub big_mark: Option<String>,
    /// Text placed before the number
    pub prefix: Option<String>,
    /// Text placed after the number; replaced by `%` for percentages
    pub suffix: Option<String>,
    /// Render as a percentage
    pub percent: bool,
}

impl NumberFormat {
    /// Plain formatting.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set fractional digits.
    #[must_use]
    pub const fn digits(mut self, digits: u8) -> Self {
        self.digits = Some(digits);
        self
    }

    /// Set the thousands separator.
    #[must_use]
    pub fn big_mark(mut self, mark: impl Into<String>) -> Self {
        self.big_mark = Some(mark.into());
        self
    }

    /// Set the prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the suffix.
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Mark as a percentage.
    #[must_use]
    pub const fn percent(mut self, percent: bool) -> Self {
        self.percent = percent;
        self
    }

    /// Format a value.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        format(
            value,
            self.digits,
            self.big_mark.as_deref(),
            self.prefix.as_deref(),
            if self.percent {
                Some("%")
            } else {
                self.suffix.as_deref()
            },
        )
    }
}

/// Largest digit count that still rounds exactly through `10^digits`.
const MAX_ROUNDED_DIGITS: u8 = 15;

fn round_half_up(value: f64, digits: u8) -> f64 {
    if digits > MAX_ROUNDED_DIGITS || !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(i32::from(digits));
    let rounded = (value.abs() * scale).round() / scale;
    if rounded == 0.0 {
        0.0
    } else {
        rounded.copysign(value)
    }
}

/// Magnitudes the host prints in exponent form.
const EXPONENT_ABOVE: f64 = 1e21;
const EXPONENT_BELOW: f64 = 1e-6;

/// Shortest round-trip text the host would show for `value`.
fn shortest(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude >= EXPONENT_ABOVE || magnitude < EXPONENT_BELOW {
        let text = format!("{value:e}");
        match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => text,
        }
    } else {
        value.to_string()
    }
}

fn plain(value: f64, digits: Option<u8>) -> String {
    match digits {
        Some(d) if value.is_finite() && value.abs() < EXPONENT_ABOVE => {
            format!("{:.*}", usize::from(d), round_half_up(value, d))
        }
        _ => shortest(value),
    }
}

/// Insert `mark` between groups of three digits in the integer part.
fn group_thousands(number: &str, mark: &str) -> String {
    let (sign, unsigned) = number
        .strip_prefix('-')
        .map_or(("", number), |rest| ("-", rest));
    let (int_part, frac_part) = unsigned
        .find('.')
        .map_or((unsigned, ""), |dot| unsigned.split_at(dot));

    if !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return number.to_string();
    }

    let mut grouped = String::with_capacity(number.len() + mark.len() * (int_part.len() / 3));
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push_str(mark);
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}{frac_part}")
}

/// Render `value` for display.
///
/// `digits` fixes the number of decimals; `big_mark` groups the integer part
/// only; `prefix` and `suffix` are attached verbatim.
#[must_use]
pub fn format(
    value: f64,
    digits: Option<u8>,
    big_mark: Option<&str>,
    prefix: Option<&str>,
    suffix: Option<&str>,
) -> String {
    let mut number = plain(value, digits);
    if let Some(mark) = big_mark.filter(|m| !m.is_empty()) {
        number = group_thousands(&number, mark);
    }
    format!(
        "{}{}{}",
        prefix.unwrap_or_default(),
        number,
        suffix.unwrap_or_default()
    )
}
