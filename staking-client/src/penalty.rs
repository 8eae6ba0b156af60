//! Early-unstake penalties.

use {
    crate::{
        chain::ChainId,
        context::StakingContext,
        error::Result,
        types::Stake,
    },
    serde::Serialize,
    std::time::{SystemTime, UNIX_EPOCH},
    tokenfi_staking_math::penalty::{
        duration_group_index, format_penalty_percentage, receive_amount,
    },
};

/// Fee percentage of a duration group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyFee {
    pub group: usize,
    /// Percentage scaled by 10^2.
    pub fee: u128,
    /// `fee` as a decimal string, e.g. `"12.5"`.
    pub percentage: String,
}

/// What an unstake of `amount` from a stake would pay out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnstakeQuote {
    pub chain_id: ChainId,
    pub stake_index: usize,
    pub amount: u128,
    pub penalty: u128,
    pub receive: u128,
    pub penalty_fee: PenaltyFee,
    pub unlocked: bool,
}

pub struct PenaltyQuotes<'a> {
    ctx: &'a StakingContext,
}

impl<'a> PenaltyQuotes<'a> {
    pub fn new(ctx: &'a StakingContext) -> Self {
        Self { ctx }
    }

    /// Fee of the duration group `duration` belongs to. Fails with
    /// [`tokenfi_staking_math::MathError::UnknownDurationGroup`] when
    /// `duration` is not one of the pool's current thresholds.
    pub async fn penalty_fee_by_duration(
        &self,
        chain_id: ChainId,
        duration: u64,
    ) -> Result<PenaltyFee> {
        let reader = self.ctx.reader();
        let thresholds = reader.duration_thresholds(chain_id).await?;
        let group = duration_group_index(&thresholds, duration)?;
        let fee = reader.penalty_fee_per_group(chain_id, group).await?;
        Ok(PenaltyFee {
            group,
            fee,
            percentage: format_penalty_percentage(fee),
        })
    }

    /// Absolute penalty, in staking-token base units.
    pub async fn calculate_penalty(
        &self,
        chain_id: ChainId,
        amount: u128,
        duration: u64,
    ) -> Result<u128> {
        self.ctx
            .reader()
            .calculate_penalty(chain_id, amount, duration)
            .await
    }

    pub async fn unstake_quote(&self, stake: &Stake, amount: u128) -> Result<UnstakeQuote> {
        let (penalty_fee, penalty) = futures::try_join!(
            self.penalty_fee_by_duration(stake.chain_id, stake.duration),
            self.calculate_penalty(stake.chain_id, amount, stake.duration),
        )?;
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        Ok(UnstakeQuote {
            chain_id: stake.chain_id,
            stake_index: stake.index,
            amount,
            penalty,
            receive: receive_amount(amount, penalty),
            penalty_fee,
            unlocked: stake.schedule().is_unlocked(now),
        })
    }
}
