//! Property-based invariant tests for the staking arithmetic.
//!
//! Uses proptest to verify:
//! - APR estimates are independent of the stake principal
//! - Duration labels stay inside their band
//! - Penalty, unit and USD conversions never lose or invent value

pub mod amount_invariants;
pub mod apr_invariants;
pub mod duration_invariants;
