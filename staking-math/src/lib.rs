//! # TokenFi Staking Math
//!
//! Pure arithmetic behind the staking dashboard. Nothing in this crate does
//! I/O: every function takes values already read from the chain and turns
//! them into display figures.
//!
//! - [`decimals`] converts on-chain fixed-point integers to and from
//!   human-readable numbers.
//! - [`duration`] maps a lock duration in seconds to a label such as
//!   `"3 Months"` using the pool's rounding ladder.
//! - [`apr`] estimates the annual percentage rate of a position.
//! - [`penalty`] resolves the duration group used by the penalty contract.
//! - [`tvl`] prices the total staked principal in USD.
//! - [`schedule`] derives start/unlock dates and the remaining lock time.
//! - [`view_state`] derives the four-way dashboard state.
//!
//! ## Quick start
//!
//! ```rust
//! use tokenfi_staking_math::{apr::{calculate_apr, AprInputs, PriceQuote}, duration::parse_duration};
//!
//! let label = parse_duration(31_536_000).unwrap();
//! assert_eq!(label.to_string(), "1 Year");
//!
//! let quote = PriceQuote { priced: 1_000_000_000_000_000_000, reference: 1_000_000_000 };
//! let apr = calculate_apr(&AprInputs {
//!     amount: 1_000_000_000,
//!     amount_decimals: 9,
//!     multiplier: 10_000,
//!     total_weight: Some(1_000_000_000_000_000_000),
//!     rewards_rate: Some(1_000_000_000),
//!     staking_quote: Some(quote),
//!     rewards_quote: Some(quote),
//! });
//! assert!(apr > 0.0);
//! ```

pub mod apr;
pub mod decimals;
pub mod duration;
pub mod error;
pub mod penalty;
pub mod schedule;
pub mod tvl;
pub mod view_state;


pub use {
    apr::{calculate_apr, AprInputs, PriceQuote},
    duration::{parse_duration, DurationLabel, DurationUnit},
    error::MathError,
    view_state::ViewState,
};
