//! Client for the TokenFi staking pool on BNB Smart Chain and Ethereum.
//!
//! All state lives in a [`StakingContext`]: build one from a
//! [`ClientConfig`] and a [`Wallet`], then borrow the services off it.
//!
//! ```no_run
//! use {
//!     std::sync::Arc,
//!     tokenfi_staking_client::{ChainId, ClientConfig, ReadOnlyWallet, StakingContext},
//! };
//!
//! # async fn run() -> tokenfi_staking_client::Result<()> {
//! let config = ClientConfig::load("config.yml")?;
//! let ctx = StakingContext::new(config, Arc::new(ReadOnlyWallet::disconnected()))?;
//!
//! for row in ctx.metrics().apr_table(ChainId::BSC).await? {
//!     println!("{:?}: {:.2} %", row.label, row.apr * 100.0);
//! }
//! let tvl = ctx.metrics().total_value_locked_all().await;
//! println!("TVL: ${:.2}", tvl.total_usd);
//! ctx.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod abi;
pub mod cache;
pub mod chain;
pub mod config;
pub mod context;
pub mod contracts;
pub mod error;
pub mod metrics;
pub mod penalty;
pub mod primitives;
pub mod reader;
pub mod rpc;
pub mod sequencer;
pub mod simulation;
pub mod types;
pub mod wallet;

#[cfg(test)]
mod test_utils;

pub use {
    chain::{ChainId, SUPPORTED_CHAINS},
    config::{ChainConfig, ClientConfig, SimulationConfig},
    context::StakingContext,
    error::{ClientError, Result},
    primitives::{Address, TxHash},
    rpc::{ChainRpc, HttpChainRpc},
    sequencer::ClaimAllReport,
    types::{PendingTransaction, Stake, TokenInfo},
    wallet::{ReadOnlyWallet, Wallet},
};
