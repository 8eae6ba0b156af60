use {
    crate::{
        abi::{self, RawStake, Token},
        chain::ChainId,
        contracts::{erc20, staking_pool},
        primitives::Address,
    },
    serde::{Deserialize, Serialize},
    tokenfi_staking_math::schedule::StakeSchedule,
};

/// ERC-20 metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// A user's stake, tagged with the chain it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stake {
    pub chain_id: ChainId,
    /// Position in the user's stake array on `chain_id`.
    pub index: usize,
    pub staked_amount: u128,
    /// Unix seconds from which the stake can be withdrawn without penalty.
    pub minimum_stake_timestamp: u64,
    pub duration: u64,
    pub reward_per_token_paid: u128,
    pub rewards: u128,
}

impl Stake {
    pub fn from_raw(chain_id: ChainId, index: usize, raw: RawStake) -> Self {
        Self {
            chain_id,
            index,
            staked_amount: raw.staked_amount,
            minimum_stake_timestamp: raw.minimum_stake_timestamp,
            duration: raw.duration,
            reward_per_token_paid: raw.reward_per_token_paid,
            rewards: raw.rewards,
        }
    }

    pub fn schedule(&self) -> StakeSchedule {
        StakeSchedule::new(self.minimum_stake_timestamp, self.duration)
    }
}

/// A contract write waiting to be signed and sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    pub address: Address,
    /// Canonical function signature, e.g. `claimRewards(uint256)`.
    pub function: &'static str,
    pub args: Vec<Token>,
    pub chain_id: ChainId,
    pub value: u128,
    /// Sender override. Defaults to the wallet's address.
    pub account: Option<Address>,
}

impl PendingTransaction {
    pub fn new(chain_id: ChainId, address: Address, function: &'static str, args: Vec<Token>) -> Self {
        Self {
            address,
            function,
            args,
            chain_id,
            value: 0,
            account: None,
        }
    }

    /// `stake(amount, tierIndex, duration)`. The tier index is always 0.
    pub fn stake(chain_id: ChainId, pool: Address, amount: u128, duration: u64) -> Self {
        Self::new(
            chain_id,
            pool,
            staking_pool::STAKE,
            vec![Token::Uint(amount), Token::Uint(0), Token::Uint(u128::from(duration))],
        )
    }

    pub fn unstake(chain_id: ChainId, pool: Address, amount: u128, stake_index: usize) -> Self {
        Self::new(
            chain_id,
            pool,
            staking_pool::UNSTAKE,
            vec![Token::Uint(amount), Token::Uint(stake_index as u128)],
        )
    }

    pub fn claim_rewards(chain_id: ChainId, pool: Address, stake_index: usize) -> Self {
        Self::new(
            chain_id,
            pool,
            staking_pool::CLAIM_REWARDS,
            vec![Token::Uint(stake_index as u128)],
        )
    }

    pub fn approve(chain_id: ChainId, token: Address, spender: Address, amount: u128) -> Self {
        Self::new(
            chain_id,
            token,
            erc20::APPROVE,
            vec![Token::Address(spender), Token::Uint(amount)],
        )
    }

    pub fn call_data(&self) -> Vec<u8> {
        abi::encode_call(self.function, &self.args)
    }
}
