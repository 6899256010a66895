use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Upper bound (inclusive) for a commission rate, in percent.
pub const MAX_COMMISSION_PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Largest accepted monetary amount (99,999,999.99).
pub const MAX_AMOUNT: Decimal = dec!(99999999.99);

/// Decimal places accepted on amounts and commission rates
pub const MAX_DECIMAL_PLACES: u32 = 2;

/// Decimal precision for percentage display (chart shares)
pub const PERCENT_DISPLAY_PRECISION: u32 = 1;
