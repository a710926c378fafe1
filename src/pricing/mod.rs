//! Discount parsing and price adjustment.
//!
//! Both halves are pure: the parser turns user text into a [`DiscountSpec`]
//! and [`apply_discount`] turns a base price plus a spec into a new price.
//! Callers decide whether the result overwrites a product or becomes a
//! price list snapshot.

pub mod adjust;
pub mod discount;

pub use adjust::{adjuster, apply_discount, format_price};
pub use discount::{parse_committed, parse_discount, DiscountInput, DiscountKind, DiscountSpec, FORMAT_HINT};
