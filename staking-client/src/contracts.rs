//! Function signatures of the contracts the client talks to, and the
//! well-known DEX and stablecoin addresses used by default.
//!
//! Selectors are derived from these strings, so they must use canonical ABI
//! types with no spaces.

use crate::primitives::Address;

/// The staking pool, deployed at the same address on every chain.
pub mod staking_pool {
    pub const STAKING_TOKEN: &str = "stakingToken()";
    pub const REWARDS_TOKEN: &str = "rewardsToken()";
    pub const REWARDS_MULTIPLIER: &str = "rewardsMultiplier()";
    pub const PENALTY_FEE_CALCULATOR: &str = "penaltyFeeCalculator()";
    pub const REWARD_RATE_PER_SEC: &str = "rewardRatePerSec()";
    pub const TOTAL_WEIGHTED_STAKE: &str = "totalWeightedStake()";
    pub const TOTAL_STAKED: &str = "totalStaked()";
    pub const PERIOD_FINISH: &str = "periodFinish()";
    pub const GET_USER_STAKES: &str = "getUserStakes(address)";
    /// `(amount, tierIndex, duration)`
    pub const STAKE: &str = "stake(uint256,uint8,uint256)";
    /// `(amount, stakeIndex)`
    pub const UNSTAKE: &str = "unstake(uint256,uint256)";
    /// `(stakeIndex)`
    pub const CLAIM_REWARDS: &str = "claimRewards(uint256)";
}

pub mod multiplier {
    /// `(amount, duration)`, result scaled by 10^4.
    pub const GET_MULTIPLIER: &str = "getMultiplier(uint256,uint256)";
    pub const GET_DURATION_THRESHOLDS: &str = "getDurationThresholds()";
}

pub mod penalty_fee {
    /// Percentage per duration group, scaled by 10^2.
    pub const PENALTY_FEE_PER_GROUP: &str = "penaltyFeePerGroup(uint256)";
    /// `(amount, duration, pool)`
    pub const CALCULATE: &str = "calculate(uint256,uint256,address)";
}

pub mod erc20 {
    pub const NAME: &str = "name()";
    pub const SYMBOL: &str = "symbol()";
    pub const DECIMALS: &str = "decimals()";
    pub const BALANCE_OF: &str = "balanceOf(address)";
    pub const ALLOWANCE: &str = "allowance(address,address)";
    pub const APPROVE: &str = "approve(address,uint256)";
}

/// Uniswap V2 style router used for price discovery.
pub mod router {
    pub const WETH: &str = "WETH()";
    pub const GET_AMOUNTS_IN: &str = "getAmountsIn(uint256,address[])";
    pub const GET_AMOUNTS_OUT: &str = "getAmountsOut(uint256,address[])";
}

/// PancakeSwap V2 router on BNB Smart Chain.
pub const PANCAKESWAP_V2_ROUTER: Address = Address::new([
    0x10, 0xed, 0x43, 0xc7, 0x18, 0x71, 0x4e, 0xb6, 0x3d, 0x5a, 0xa5, 0x7b, 0x78, 0xb5, 0x47,
    0x04, 0xe2, 0x56, 0x02, 0x4e,
]);
/// Uniswap V2 router on Ethereum.
pub const UNISWAP_V2_ROUTER: Address = Address::new([
    0x7a, 0x25, 0x0d, 0x56, 0x30, 0xb4, 0xcf, 0x53, 0x97, 0x39, 0xdf, 0x2c, 0x5d, 0xac, 0xb4,
    0xc6, 0x59, 0xf2, 0x48, 0x8d,
]);
pub const BSC_USDC: Address = Address::new([
    0x8a, 0xc7, 0x6a, 0x51, 0xcc, 0x95, 0x0d, 0x98, 0x22, 0xd6, 0x8b, 0x83, 0xfe, 0x1a, 0xd9,
    0x7b, 0x32, 0xcd, 0x58, 0x0d,
]);
pub const ETHEREUM_USDC: Address = Address::new([
    0xa0, 0xb8, 0x69, 0x91, 0xc6, 0x21, 0x8b, 0x36, 0xc1, 0xd1, 0x9d, 0x4a, 0x2e, 0x9e, 0xb0,
    0xce, 0x36, 0x06, 0xeb, 0x48,
]);
