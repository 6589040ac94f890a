use rust_decimal::Decimal;

/// Price value - uses Decimal for exact, platform-independent arithmetic
pub type Price = Decimal;

/// Quantity value - whole shares
pub type Quantity = u64;

/// Largest order quantity the engine accepts; positions are signed 64-bit
pub const MAX_QUANTITY: Quantity = i64::MAX as Quantity;

/// `price * quantity`, or `None` when the product leaves the decimal range
pub fn checked_notional(price: Price, quantity: Quantity) -> Option<Price> {
    price.checked_mul(Decimal::from(quantity))
}

/// Logical simulation time step (wall-clock free)
pub type Tick = u64;

/// Round a price to the nearest multiple of `tick_size`.
///
/// A zero or negative tick size leaves the price unchanged. The result is never
/// below one tick, so rounding cannot produce a non-positive limit price from a
/// positive input.
pub fn round_to_tick(price: Price, tick_size: Price) -> Price {
    if tick_size <= Decimal::ZERO {
        return price;
    }
    let Some(ticks) = price.checked_div(tick_size) else {
        return price;
    };
    ticks
        .round()
        .checked_mul(tick_size)
        .map_or(price, |rounded| rounded.max(tick_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_to_tick() {
        assert_eq!(round_to_tick(dec!(100.126), dec!(0.01)), dec!(100.13));
        assert_eq!(round_to_tick(dec!(100.124), dec!(0.01)), dec!(100.12));
        assert_eq!(round_to_tick(dec!(99.7), dec!(0.5)), dec!(99.5));
    }

    #[test]
    fn test_round_to_tick_floors_at_one_tick() {
        assert_eq!(round_to_tick(dec!(0.001), dec!(0.01)), dec!(0.01));
        assert_eq!(round_to_tick(dec!(-3), dec!(0.01)), dec!(0.01));
    }

    #[test]
    fn test_round_to_tick_keeps_price_out_of_range() {
        assert_eq!(round_to_tick(Decimal::MAX, dec!(0.01)), Decimal::MAX);
    }

    #[test]
    fn test_checked_notional() {
        assert_eq!(checked_notional(dec!(9.5), 4), Some(dec!(38)));
        let huge = Decimal::from_i128_with_scale(10i128.pow(22), 0);
        assert_eq!(checked_notional(huge, 10_000_000_000), None);
        assert!(checked_notional(Decimal::ONE, MAX_QUANTITY).is_some());
    }

    #[test]
    fn test_round_to_tick_ignores_zero_tick() {
        assert_eq!(round_to_tick(dec!(1.2345), Decimal::ZERO), dec!(1.2345));
    }
}
