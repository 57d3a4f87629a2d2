use rust_decimal::Decimal;
use spindrop_csvs::MAX_SUPPORTED_DECIMALS;

/// Convert a smallest-unit amount to whole tokens for display.
///
/// Exact: the result carries `decimals` fractional digits.
pub fn to_human_amount(amount: u64, decimals: u8) -> Decimal {
    let decimals = decimals.min(MAX_SUPPORTED_DECIMALS);
    Decimal::from_i128_with_scale(amount as i128, decimals as u32).normalize()
}
