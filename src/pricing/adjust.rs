use bigdecimal::{BigDecimal, RoundingMode, Zero};

use super::discount::{DiscountKind, DiscountSpec};

/// Applies `spec` to `base_price`, flooring the result at zero.
///
/// No rounding happens here; use [`format_price`] when displaying.
pub fn apply_discount(base_price: &BigDecimal, spec: &DiscountSpec) -> BigDecimal {
    let adjusted = match spec.kind {
        DiscountKind::Percentage => {
            let one_percent = BigDecimal::new(1.into(), 2);
            let factor = BigDecimal::from(1) + &spec.magnitude * &one_percent;
            base_price * &factor
        }
        DiscountKind::Fixed => base_price + &spec.magnitude,
    };

    if adjusted < BigDecimal::zero() {
        BigDecimal::zero()
    } else {
        adjusted
    }
}

/// Binds `spec` into a price adjuster that persistence code can apply per row.
pub fn adjuster(spec: &DiscountSpec) -> impl Fn(&BigDecimal) -> BigDecimal + Sync + '_ {
    move |base_price| apply_discount(base_price, spec)
}

/// Two-decimal rendering used by the public price list.
pub fn format_price(value: &BigDecimal) -> String {
    value.with_scale_round(2, RoundingMode::HalfUp).to_string()
}
