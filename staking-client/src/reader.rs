//! Contract reads, cached per query key where the value is stable.

use {
    crate::{
        abi::{self, Token},
        cache::QueryKey,
        chain::{ChainId, SUPPORTED_CHAINS},
        context::StakingContext,
        contracts::{erc20, multiplier, penalty_fee, router, staking_pool},
        error::{ClientError, Result},
        primitives::Address,
        types::{Stake, TokenInfo},
    },
    futures::future::try_join_all,
    log::*,
    tokenfi_staking_math::{apr::PriceQuote, decimals},
};

pub const USER_STAKES_QUERY: &str = "get-user-stakes";

pub struct StakingReader<'a> {
    ctx: &'a StakingContext,
}

impl<'a> StakingReader<'a> {
    pub fn new(ctx: &'a StakingContext) -> Self {
        Self { ctx }
    }

    async fn call(
        &self,
        chain_id: ChainId,
        to: Address,
        signature: &str,
        args: &[Token],
    ) -> Result<Vec<u8>> {
        trace!("eth_call {signature} on {to} (chain {chain_id})");
        self.ctx
            .rpc(chain_id)?
            .call(to, abi::encode_call(signature, args))
            .await
    }

    async fn pool_address(
        &self,
        chain_id: ChainId,
        query: &'static str,
        signature: &'static str,
    ) -> Result<Address> {
        let pool = self.ctx.staking_pool();
        self.ctx
            .cache()
            .get_or_fetch(QueryKey::new(query).with("chain", chain_id), || async move {
                let data = self.call(chain_id, pool, signature, &[]).await?;
                abi::decode_address(&data)?.non_zero()
            })
            .await
    }

    pub async fn staking_token_address(&self, chain_id: ChainId) -> Result<Address> {
        self.pool_address(chain_id, "get-staking-token-address", staking_pool::STAKING_TOKEN)
            .await
    }

    pub async fn rewards_token_address(&self, chain_id: ChainId) -> Result<Address> {
        self.pool_address(chain_id, "get-rewards-token-address", staking_pool::REWARDS_TOKEN)
            .await
    }

    pub async fn multiplier_address(&self, chain_id: ChainId) -> Result<Address> {
        self.pool_address(
            chain_id,
            "get-rewards-multiplier-address",
            staking_pool::REWARDS_MULTIPLIER,
        )
        .await
    }

    pub async fn penalty_calculator_address(&self, chain_id: ChainId) -> Result<Address> {
        self.pool_address(
            chain_id,
            "get-penalty-fee-calculator-address",
            staking_pool::PENALTY_FEE_CALCULATOR,
        )
        .await
    }

    /// Name, symbol and decimals, read together.
    pub async fn token_info(&self, chain_id: ChainId, token: Address) -> Result<TokenInfo> {
        let token = token.non_zero()?;
        let key = QueryKey::new("get-token")
            .with("chain", chain_id)
            .with("address", token);
        self.ctx
            .cache()
            .get_or_fetch(key, || async move {
                let (name, symbol, decimals) = futures::try_join!(
                    self.call(chain_id, token, erc20::NAME, &[]),
                    self.call(chain_id, token, erc20::SYMBOL, &[]),
                    self.call(chain_id, token, erc20::DECIMALS, &[]),
                )?;
                Ok(TokenInfo {
                    address: token,
                    name: abi::decode_string(&name)?,
                    symbol: abi::decode_string(&symbol)?,
                    decimals: abi::decode_u8(&decimals)?,
                })
            })
            .await
    }

    /// Staking and rewards token metadata, fetched concurrently.
    pub async fn staking_and_rewards_tokens(
        &self,
        chain_id: ChainId,
    ) -> Result<(TokenInfo, TokenInfo)> {
        let (staking, rewards) = futures::try_join!(
            self.staking_token_address(chain_id),
            self.rewards_token_address(chain_id),
        )?;
        futures::try_join!(
            self.token_info(chain_id, staking),
            self.token_info(chain_id, rewards),
        )
    }

    /// Lock durations in seconds. Their order defines the penalty groups.
    pub async fn duration_thresholds(&self, chain_id: ChainId) -> Result<Vec<u64>> {
        let multiplier = self.multiplier_address(chain_id).await?;
        self.ctx
            .cache()
            .get_or_fetch(
                QueryKey::new("get-duration-thresholds").with("chain", chain_id),
                || async move {
                    let data = self
                        .call(chain_id, multiplier, multiplier::GET_DURATION_THRESHOLDS, &[])
                        .await?;
                    abi::decode_thresholds(&data)
                },
            )
            .await
    }

    /// Reward multiplier for `amount` locked for `duration`, scaled by 10^4.
    pub async fn multiplier_by_duration(
        &self,
        chain_id: ChainId,
        amount: u128,
        duration: u64,
    ) -> Result<u128> {
        if amount == 0 || duration == 0 {
            return Err(ClientError::InvalidInput(
                "multiplier needs a non-zero amount and duration".to_string(),
            ));
        }
        let multiplier = self.multiplier_address(chain_id).await?;
        let key = QueryKey::new("get-multiplier")
            .with("chain", chain_id)
            .with("amount", amount)
            .with("duration", duration);
        self.ctx
            .cache()
            .get_or_fetch(key, || async move {
                let data = self
                    .call(
                        chain_id,
                        multiplier,
                        multiplier::GET_MULTIPLIER,
                        &[Token::Uint(amount), Token::Uint(u128::from(duration))],
                    )
                    .await?;
                abi::decode_uint(&data)
            })
            .await
    }

    /// Penalty percentage of a duration group, scaled by 10^2.
    pub async fn penalty_fee_per_group(&self, chain_id: ChainId, group: usize) -> Result<u128> {
        let calculator = self.penalty_calculator_address(chain_id).await?;
        let data = self
            .call(
                chain_id,
                calculator,
                penalty_fee::PENALTY_FEE_PER_GROUP,
                &[Token::Uint(group as u128)],
            )
            .await?;
        abi::decode_uint(&data)
    }

    /// Penalty, in staking-token base units, for withdrawing `amount` early
    /// from a stake locked for `duration`.
    pub async fn calculate_penalty(
        &self,
        chain_id: ChainId,
        amount: u128,
        duration: u64,
    ) -> Result<u128> {
        let calculator = self.penalty_calculator_address(chain_id).await?;
        let data = self
            .call(
                chain_id,
                calculator,
                penalty_fee::CALCULATE,
                &[
                    Token::Uint(amount),
                    Token::Uint(u128::from(duration)),
                    Token::Address(self.ctx.staking_pool()),
                ],
            )
            .await?;
        abi::decode_uint(&data)
    }

    async fn pool_uint(&self, chain_id: ChainId, signature: &str) -> Result<u128> {
        let data = self
            .call(chain_id, self.ctx.staking_pool(), signature, &[])
            .await?;
        abi::decode_uint(&data)
    }

    pub async fn rewards_rate_per_second(&self, chain_id: ChainId) -> Result<u128> {
        self.pool_uint(chain_id, staking_pool::REWARD_RATE_PER_SEC).await
    }

    pub async fn total_weighted_stake(&self, chain_id: ChainId) -> Result<u128> {
        self.pool_uint(chain_id, staking_pool::TOTAL_WEIGHTED_STAKE).await
    }

    pub async fn total_staked(&self, chain_id: ChainId) -> Result<u128> {
        self.pool_uint(chain_id, staking_pool::TOTAL_STAKED).await
    }

    /// Unix seconds at which the pool stops distributing rewards.
    pub async fn period_finish(&self, chain_id: ChainId) -> Result<u64> {
        let data = self
            .call(chain_id, self.ctx.staking_pool(), staking_pool::PERIOD_FINISH, &[])
            .await?;
        abi::decode_u64(&data)
    }

    pub async fn user_stakes(&self, chain_id: ChainId, user: Address) -> Result<Vec<Stake>> {
        let user = user.non_zero()?;
        let pool = self.ctx.staking_pool();
        let key = QueryKey::new(USER_STAKES_QUERY)
            .with("user", user)
            .with("chain", chain_id);
        self.ctx
            .cache()
            .get_or_fetch(key, || async move {
                let data = self
                    .call(
                        chain_id,
                        pool,
                        staking_pool::GET_USER_STAKES,
                        &[Token::Address(user)],
                    )
                    .await?;
                let stakes: Vec<Stake> = abi::decode_stakes(&data)?
                    .into_iter()
                    .enumerate()
                    .map(|(index, raw)| Stake::from_raw(chain_id, index, raw))
                    .collect();
                debug!("{} stakes for {user} on chain {chain_id}", stakes.len());
                Ok(stakes)
            })
            .await
    }

    /// Stakes on every supported chain, in chain order.
    pub async fn all_user_stakes(&self, user: Address) -> Result<Vec<Stake>> {
        let per_chain = try_join_all(
            SUPPORTED_CHAINS
                .iter()
                .map(|chain_id| self.user_stakes(*chain_id, user)),
        )
        .await?;
        Ok(per_chain.into_iter().flatten().collect())
    }

    /// Wrapped native token of the chain's router.
    pub async fn weth(&self, chain_id: ChainId) -> Result<Address> {
        let router = self.ctx.chain_config(chain_id)?.router;
        self.ctx
            .cache()
            .get_or_fetch(QueryKey::new("get-weth").with("chain", chain_id), || async move {
                let data = self.call(chain_id, router, router::WETH, &[]).await?;
                abi::decode_address(&data)?.non_zero()
            })
            .await
    }

    /// Wrapped native amount needed to buy one whole `token`, paired with the
    /// one-token reference amount.
    pub async fn price_quote(
        &self,
        chain_id: ChainId,
        token: Address,
        token_decimals: u8,
    ) -> Result<PriceQuote> {
        let token = token.non_zero()?;
        let router = self.ctx.chain_config(chain_id)?.router;
        let weth = self.weth(chain_id).await?;
        let one = one_unit(token_decimals)?;
        let data = self
            .call(
                chain_id,
                router,
                router::GET_AMOUNTS_IN,
                &[Token::Uint(one), Token::AddressArray(vec![weth, token])],
            )
            .await?;
        let amounts = abi::decode_uint_array(&data)?;
        PriceQuote::from_amounts(&amounts).ok_or_else(|| {
            ClientError::Decode(format!("getAmountsIn returned {} amounts", amounts.len()))
        })
    }

    /// USD token amount one whole `token` sells for via the wrapped native
    /// token.
    pub async fn usd_price(
        &self,
        chain_id: ChainId,
        token: Address,
        token_decimals: u8,
    ) -> Result<u128> {
        let chain = self.ctx.chain_config(chain_id)?;
        let (router, usd) = (chain.router, chain.usd_token);
        let weth = self.weth(chain_id).await?;
        let one = one_unit(token_decimals)?;
        let data = self
            .call(
                chain_id,
                router,
                router::GET_AMOUNTS_OUT,
                &[Token::Uint(one), Token::AddressArray(vec![token, weth, usd])],
            )
            .await?;
        let amounts = abi::decode_uint_array(&data)?;
        amounts.get(2).copied().ok_or_else(|| {
            ClientError::Decode(format!("getAmountsOut returned {} amounts", amounts.len()))
        })
    }

    pub async fn balance_of(&self, chain_id: ChainId, token: Address, owner: Address) -> Result<u128> {
        let data = self
            .call(chain_id, token, erc20::BALANCE_OF, &[Token::Address(owner)])
            .await?;
        abi::decode_uint(&data)
    }

    pub async fn allowance(
        &self,
        chain_id: ChainId,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<u128> {
        let data = self
            .call(
                chain_id,
                token,
                erc20::ALLOWANCE,
                &[Token::Address(owner), Token::Address(spender)],
            )
            .await?;
        abi::decode_uint(&data)
    }
}

fn one_unit(decimals: u8) -> Result<u128> {
    decimals::scale(decimals)
        .ok_or_else(|| ClientError::Decode(format!("{decimals} decimals out of range")))
}
