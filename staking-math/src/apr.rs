//! Annual percentage rate estimate for a staking position.
//!
//! # Formula
//!
//! ```text
//! weighted_staked_amount = amount × multiplier
//! yearly_rewards         = rewards_rate × 31_536_000
//! reward_per_token       = yearly_rewards / total_weight
//! yearly_payout          = weighted_staked_amount × reward_per_token × rewards_token_price
//! user_investment        = amount × staking_token_price
//! apr                    = yearly_payout / user_investment
//! ```
//!
//! Every input is an on-chain fixed-point integer converted to `f64` first,
//! so the result is a display estimate and never used for settlement.
//! The principal appears in both numerator and denominator and cancels out.

use {
    crate::decimals::to_number,
    serde::{Deserialize, Serialize},
};

pub const ONE_YEAR_IN_SECONDS: f64 = 31_536_000.0;

/// Decimals of the multiplier returned by the multiplier contract.
pub const MULTIPLIER_DECIMALS: u8 = 4;
/// Decimals of the pool's total weighted stake.
pub const WEIGHT_DECIMALS: u8 = 9;
/// Decimals of the pool's per-second reward rate.
pub const RATE_DECIMALS: u8 = 9;
/// Decimals of the priced leg of a DEX quote (the wrapped native asset).
pub const QUOTE_DECIMALS: u8 = 18;
/// Decimals of the reference leg of a DEX quote (the pool's tokens).
pub const REFERENCE_DECIMALS: u8 = 9;

/// A two-leg DEX quote: `priced` units of the wrapped native asset are
/// needed to obtain `reference` units of the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub priced: u128,
    pub reference: u128,
}

impl PriceQuote {
    /// Build a quote from a router `getAmountsIn` result. Index 0 is the
    /// priced amount and index 1 the reference amount.
    pub fn from_amounts(amounts: &[u128]) -> Option<Self> {
        match amounts {
            [priced, reference, ..] => Some(Self {
                priced: *priced,
                reference: *reference,
            }),
            _ => None,
        }
    }

    /// A quote with a zero leg carries no price information.
    pub fn is_available(&self) -> bool {
        self.priced != 0 && self.reference != 0
    }

    /// Price of one reference token in the priced asset.
    pub fn price(&self) -> f64 {
        to_number(self.priced, QUOTE_DECIMALS) / to_number(self.reference, REFERENCE_DECIMALS)
    }
}

/// Inputs of [`calculate_apr`]. `None` marks a value that could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AprInputs {
    /// Stake principal in staking-token base units.
    pub amount: u128,
    /// Decimals of `amount`.
    pub amount_decimals: u8,
    /// Multiplier for the stake's (amount, duration), 4 decimals.
    pub multiplier: u128,
    /// Pool-wide weighted stake, 9 decimals.
    pub total_weight: Option<u128>,
    /// Rewards distributed per second, 9 decimals.
    pub rewards_rate: Option<u128>,
    pub staking_quote: Option<PriceQuote>,
    pub rewards_quote: Option<PriceQuote>,
}

fn available(value: Option<u128>) -> Option<u128> {
    value.filter(|v| *v != 0)
}

/// Estimate the APR of a position as a fraction (`0.12` is 12 %).
///
/// Returns `0.0` when the total weight, the rewards rate or either quote is
/// unavailable, and when the position has no value to divide by.
pub fn calculate_apr(inputs: &AprInputs) -> f64 {
    let (Some(total_weight), Some(rewards_rate)) = (
        available(inputs.total_weight),
        available(inputs.rewards_rate),
    ) else {
        return 0.0;
    };
    let (Some(staking_quote), Some(rewards_quote)) = (
        inputs.staking_quote.filter(PriceQuote::is_available),
        inputs.rewards_quote.filter(PriceQuote::is_available),
    ) else {
        return 0.0;
    };

    let amount = to_number(inputs.amount, inputs.amount_decimals);
    let multiplier = to_number(inputs.multiplier, MULTIPLIER_DECIMALS);
    let total_weight = to_number(total_weight, WEIGHT_DECIMALS);
    let rewards_rate = to_number(rewards_rate, RATE_DECIMALS);

    let weighted_staked_amount = amount * multiplier;
    let yearly_rewards = rewards_rate * ONE_YEAR_IN_SECONDS;
    let reward_per_token = yearly_rewards / total_weight;
    let yearly_payout = weighted_staked_amount * reward_per_token * rewards_quote.price();
    let user_investment = amount * staking_quote.price();

    if user_investment == 0.0 {
        return 0.0;
    }

    let apr = yearly_payout / user_investment;
    if apr.is_finite() {
        apr
    } else {
        0.0
    }
}
