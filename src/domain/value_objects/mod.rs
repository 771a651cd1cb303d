//! Value Objects for returns

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monetary values are rounded to 2 decimal places, half away from zero.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Reasons an operator may pick when filing a return.
pub const RETURN_REASONS: &[&str] = &[
    "Damaged product",
    "Defective product",
    "Wrong item delivered",
    "Item not as described",
    "Wrong size",
    "Changed mind",
    "Other",
];

pub fn is_known_reason(reason: &str) -> bool {
    RETURN_REASONS.contains(&reason)
}

pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Per-unit share of a line discount. Zero when nothing was purchased.
pub fn per_unit_discount(line_discount: Decimal, purchased: u32) -> Decimal {
    if purchased == 0 {
        return Decimal::ZERO;
    }
    line_discount / Decimal::from(purchased)
}

/// Refund owed for `quantity` units: `quantity * (old_unit_price - discount_per_item)`.
pub fn compute_refund(old_unit_price: Decimal, discount_per_item: Decimal, quantity: u32) -> Decimal {
    round_money(Decimal::from(quantity) * (old_unit_price - discount_per_item))
}

/// Return quantity bounded by the purchased quantity of its order line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnQuantity(u32);

impl ReturnQuantity {
    /// Clamps `requested` down to `purchased`. The flag reports whether clamping happened.
    pub fn clamped(requested: u32, purchased: u32) -> (Self, bool) {
        if requested > purchased { (Self(purchased), true) } else { (Self(requested), false) }
    }
    pub fn value(&self) -> u32 { self.0 }
    pub fn is_zero(&self) -> bool { self.0 == 0 }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestAction {
    #[default]
    Refund,
    Exchange,
}

impl RequestAction {
    pub fn as_str(&self) -> &'static str {
        match self { Self::Refund => "REFUND", Self::Exchange => "EXCHANGE" }
    }
}

impl fmt::Display for RequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl std::str::FromStr for RequestAction {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "REFUND" => Ok(Self::Refund),
            "EXCHANGE" => Ok(Self::Exchange),
            other => Err(format!("unknown request action: {other}")),
        }
    }
}
