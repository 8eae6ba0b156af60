//! Early-unstake penalty helpers.
//!
//! The penalty contract prices fees per *duration group*: the index of the
//! stake's duration within the pool's ordered list of duration thresholds.

use crate::{
    decimals::format_units,
    error::{MathError, Result},
};

/// Penalty fee percentages are fixed-point with two decimals (`1250` is 12.5 %).
pub const PENALTY_PERCENT_DECIMALS: u8 = 2;

/// Resolve the duration group of a stake.
///
/// The match is exact. A stake whose duration is not in `thresholds` (for
/// example because the thresholds were changed after the stake was created)
/// has no group, and pricing it against a guessed group would misreport the
/// fee.
pub fn duration_group_index(thresholds: &[u64], duration: u64) -> Result<usize> {
    thresholds
        .iter()
        .position(|threshold| *threshold == duration)
        .ok_or(MathError::UnknownDurationGroup { duration })
}

/// Human-readable percentage of a penalty fee (`"12.5"`).
pub fn format_penalty_percentage(fee: u128) -> String {
    format_units(fee, PENALTY_PERCENT_DECIMALS)
}

/// Principal returned to the user after the penalty is deducted.
pub fn receive_amount(unstake_amount: u128, penalty: u128) -> u128 {
    unstake_amount.saturating_sub(penalty)
}
