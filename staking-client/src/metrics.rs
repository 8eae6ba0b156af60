//! APR and total-value-locked figures shown on the dashboard.
//!
//! Missing pool state degrades a figure to zero instead of failing it, the
//! same way an empty dashboard tile shows `0 %`.

use {
    crate::{
        chain::{ChainId, SUPPORTED_CHAINS},
        context::StakingContext,
        error::Result,
    },
    log::*,
    serde::Serialize,
    tokenfi_staking_math::{
        apr::{calculate_apr, AprInputs},
        decimals,
        duration::{parse_duration, DurationLabel},
        tvl,
    },
};

/// APR of one lock duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AprRow {
    pub duration: u64,
    pub label: Option<DurationLabel>,
    /// Fraction, `0.12` is 12 %.
    pub apr: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainValueLocked {
    pub chain_id: ChainId,
    pub total_staked: u128,
    /// Dollars with exactly two decimals.
    pub usd: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueLockedSummary {
    /// `None` for a chain whose reads failed.
    pub chains: Vec<(ChainId, Option<ChainValueLocked>)>,
    /// Sum over chains; zero unless every chain reported.
    pub total_usd: f64,
}

fn degraded<T>(what: &str, chain_id: ChainId, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("{what} unavailable on chain {chain_id}: {err}");
            None
        }
    }
}

pub struct DashboardMetrics<'a> {
    ctx: &'a StakingContext,
}

impl<'a> DashboardMetrics<'a> {
    pub fn new(ctx: &'a StakingContext) -> Self {
        Self { ctx }
    }

    /// APR of staking `amount` base units for `duration` seconds.
    pub async fn apr_for_stake(&self, chain_id: ChainId, amount: u128, duration: u64) -> f64 {
        let reader = self.ctx.reader();
        let Some((staking, rewards)) = degraded(
            "token metadata",
            chain_id,
            reader.staking_and_rewards_tokens(chain_id).await,
        ) else {
            return 0.0;
        };

        let (multiplier, total_weight, rewards_rate, staking_quote, rewards_quote) = tokio::join!(
            reader.multiplier_by_duration(chain_id, amount, duration),
            reader.total_weighted_stake(chain_id),
            reader.rewards_rate_per_second(chain_id),
            reader.price_quote(chain_id, staking.address, staking.decimals),
            reader.price_quote(chain_id, rewards.address, rewards.decimals),
        );

        let inputs = AprInputs {
            amount,
            amount_decimals: staking.decimals,
            multiplier: degraded("multiplier", chain_id, multiplier).unwrap_or(0),
            total_weight: degraded("total weighted stake", chain_id, total_weight),
            rewards_rate: degraded("rewards rate", chain_id, rewards_rate),
            staking_quote: degraded("staking token quote", chain_id, staking_quote),
            rewards_quote: degraded("rewards token quote", chain_id, rewards_quote),
        };
        let apr = calculate_apr(&inputs);
        debug!("apr on chain {chain_id} for {amount} over {duration}s: {apr}");
        apr
    }

    /// APR of one whole staking token locked for `duration`.
    pub async fn apr_for_duration(&self, chain_id: ChainId, duration: u64) -> f64 {
        let Some(staking_decimals) = degraded(
            "staking token",
            chain_id,
            self.staking_decimals(chain_id).await,
        ) else {
            return 0.0;
        };
        let Some(one) = decimals::scale(staking_decimals) else {
            return 0.0;
        };
        self.apr_for_stake(chain_id, one, duration).await
    }

    async fn staking_decimals(&self, chain_id: ChainId) -> Result<u8> {
        let reader = self.ctx.reader();
        let address = reader.staking_token_address(chain_id).await?;
        Ok(reader.token_info(chain_id, address).await?.decimals)
    }

    /// One row per duration threshold, in threshold order.
    pub async fn apr_table(&self, chain_id: ChainId) -> Result<Vec<AprRow>> {
        let thresholds = self.ctx.reader().duration_thresholds(chain_id).await?;
        let mut rows = Vec::with_capacity(thresholds.len());
        for duration in thresholds {
            rows.push(AprRow {
                duration,
                label: parse_duration(duration),
                apr: self.apr_for_duration(chain_id, duration).await,
            });
        }
        Ok(rows)
    }

    /// USD value of everything staked on one chain, priced through
    /// token -> wrapped native -> USD.
    pub async fn total_value_locked(&self, chain_id: ChainId) -> Result<ChainValueLocked> {
        let reader = self.ctx.reader();
        let usd_token = self.ctx.chain_config(chain_id)?.usd_token;
        let staking = reader.staking_token_address(chain_id).await?;
        let (staking, usd) = futures::try_join!(
            reader.token_info(chain_id, staking),
            reader.token_info(chain_id, usd_token),
        )?;
        let (price, total_staked) = futures::try_join!(
            reader.usd_price(chain_id, staking.address, staking.decimals),
            reader.total_staked(chain_id),
        )?;
        Ok(ChainValueLocked {
            chain_id,
            total_staked,
            usd: tvl::usd_value(price, total_staked, staking.decimals, usd.decimals),
        })
    }

    /// Value locked on every supported chain and their sum.
    pub async fn total_value_locked_all(&self) -> ValueLockedSummary {
        let mut chains = Vec::with_capacity(SUPPORTED_CHAINS.len());
        for chain_id in SUPPORTED_CHAINS {
            let locked = degraded(
                "total value locked",
                chain_id,
                self.total_value_locked(chain_id).await,
            );
            chains.push((chain_id, locked));
        }
        let per_chain: Vec<Option<f64>> = chains
            .iter()
            .map(|(_, locked)| locked.as_ref().and_then(|l| l.usd.parse::<f64>().ok()))
            .collect();
        ValueLockedSummary {
            total_usd: tvl::total_usd(&per_chain),
            chains,
        }
    }
}
