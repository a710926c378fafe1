use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Hint shown next to a discount field whose text cannot be a discount.
pub const FORMAT_HINT: &str = "Invalid format. Use: -10%, +5%, -2.50, +10";

/// Optional sign, integer digits, optional separator, fraction digits,
/// optional trailing percent. Commas are normalized before matching.
static DISCOUNT_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-]?)([0-9]*)(?:\.([0-9]*))?(%?)$").expect("discount pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    Percentage,
    Fixed,
}

impl DiscountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountKind::Percentage => "percentage",
            DiscountKind::Fixed => "fixed",
        }
    }
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(DiscountKind::Percentage),
            "fixed" => Ok(DiscountKind::Fixed),
            other => Err(format!("unknown discount type '{}'", other)),
        }
    }
}

/// A signed price change: negative is a discount, positive a surcharge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountSpec {
    pub magnitude: BigDecimal,
    pub kind: DiscountKind,
}

impl DiscountSpec {
    pub fn new(magnitude: BigDecimal, kind: DiscountKind) -> Self {
        Self { magnitude, kind }
    }

    pub fn percentage(magnitude: BigDecimal) -> Self {
        Self::new(magnitude, DiscountKind::Percentage)
    }

    pub fn fixed(magnitude: BigDecimal) -> Self {
        Self::new(magnitude, DiscountKind::Fixed)
    }
}

impl fmt::Display for DiscountSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiscountKind::Percentage => write!(f, "{}%", self.magnitude),
            DiscountKind::Fixed => write!(f, "{}", self.magnitude),
        }
    }
}

/// Classification of a discount text field, one per keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountInput {
    /// Blank input.
    NoValue,
    /// A prefix of a valid discount (`-`, `+`, `5%`); wait for more input.
    StillTyping,
    /// Has the right shape but holds no number (`.`, `-.%`).
    Unparseable,
    /// Cannot become a discount by typing more characters.
    InvalidFormat,
    Parsed(DiscountSpec),
}

impl DiscountInput {
    /// Only `InvalidFormat` is reported to the user.
    pub fn is_error(&self) -> bool {
        matches!(self, DiscountInput::InvalidFormat)
    }

    pub fn into_spec(self) -> Option<DiscountSpec> {
        match self {
            DiscountInput::Parsed(spec) => Some(spec),
            _ => None,
        }
    }
}

fn is_partial(input: &str) -> bool {
    input == "-" || input == "+" || (input.ends_with('%') && input.chars().count() <= 2)
}

/// Parses free-form discount text such as `-10%`, `+5`, `2,50` or `10`.
///
/// A trailing `%` always means a percentage and an explicit sign without `%`
/// means a fixed amount. A bare number between 0 and 100 inclusive is read as
/// a percentage, anything larger as a fixed amount, so `"100"` is a 100%
/// change rather than a 100 unit delta.
///
/// Meant for text that is still being edited: prefixes such as `-` or `5%`
/// come back as [`DiscountInput::StillTyping`].
pub fn parse_discount(input: &str) -> DiscountInput {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return DiscountInput::NoValue;
    }
    if is_partial(trimmed) {
        return DiscountInput::StillTyping;
    }
    parse_shape(trimmed)
}

/// Like [`parse_discount`] for text that has been submitted. Nothing is
/// still being typed, so `5%` is a 5% change and a lone `-` is unparseable.
pub fn parse_committed(input: &str) -> DiscountInput {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return DiscountInput::NoValue;
    }
    parse_shape(trimmed)
}

fn parse_shape(trimmed: &str) -> DiscountInput {
    let normalized = trimmed.replace(',', ".");
    let Some(caps) = DISCOUNT_SHAPE.captures(&normalized) else {
        return DiscountInput::InvalidFormat;
    };

    let sign = caps.get(1).map_or("", |m| m.as_str());
    let int_digits = caps.get(2).map_or("", |m| m.as_str());
    let frac_digits = caps.get(3).map_or("", |m| m.as_str());
    let is_percent = caps.get(4).is_some_and(|m| !m.as_str().is_empty());

    if int_digits.is_empty() && frac_digits.is_empty() {
        return DiscountInput::Unparseable;
    }

    let mut literal = String::with_capacity(normalized.len() + 1);
    if sign == "-" {
        literal.push('-');
    }
    literal.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        literal.push('.');
        literal.push_str(frac_digits);
    }
    let Ok(magnitude) = BigDecimal::from_str(&literal) else {
        return DiscountInput::Unparseable;
    };

    let kind = if is_percent {
        DiscountKind::Percentage
    } else if !sign.is_empty() {
        DiscountKind::Fixed
    } else if magnitude <= BigDecimal::from(100) {
        DiscountKind::Percentage
    } else {
        DiscountKind::Fixed
    };

    DiscountInput::Parsed(DiscountSpec::new(magnitude, kind))
}
