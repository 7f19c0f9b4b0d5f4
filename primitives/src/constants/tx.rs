/// The number of fractional digits shown when displaying balances.
pub const DISPLAY_FRACTION_DIGITS: usize = 4;
