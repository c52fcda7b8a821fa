use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits kept for every ledger amount.
pub const MONEY_DECIMALS: u32 = 2;

/// Rounds half-up to two decimals and pins the scale, so `7` becomes `7.00`.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_DECIMALS);
    rounded
}

/// Minor units as persisted by the store. `None` when the amount does not fit an `i64`.
pub fn to_cents(value: Decimal) -> Option<i64> {
    i64::try_from(round_money(value).mantissa()).ok()
}

pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, MONEY_DECIMALS)
}
