//! Write sequences: stake, unstake, claim and claim-all.
//!
//! Each public sequence holds the context's in-flight flag for its whole run,
//! so a second sequence started before the first finishes fails with
//! [`ClientError::Busy`] instead of interleaving wallet prompts.

use {
    crate::{
        cache::QueryKey,
        chain::ChainId,
        context::StakingContext,
        error::{ClientError, Result},
        primitives::{Address, TxHash},
        reader::USER_STAKES_QUERY,
        rpc::{ChainRpc, TransactionReceipt, TransactionRequest},
        types::PendingTransaction,
    },
    log::*,
    std::sync::atomic::{AtomicBool, Ordering},
    tokio::time::{sleep, Instant},
};

const BASIS_POINTS: u128 = 10_000;

/// `gas` plus `margin_bps` basis points.
pub fn apply_gas_margin(gas: u128, margin_bps: u64) -> u128 {
    gas.saturating_mul(BASIS_POINTS.saturating_add(u128::from(margin_bps)))
        .checked_div(BASIS_POINTS)
        .unwrap_or(gas)
}

/// A mined, successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub hash: TxHash,
    pub receipt: TransactionReceipt,
}

/// Result of [`TransactionSequencer::claim_all`].
#[derive(Debug)]
pub struct ClaimAllReport {
    /// Positions in the target list whose claim was mined.
    pub completed: Vec<usize>,
    /// First failing position and its error. Later targets were not attempted.
    pub failed: Option<(usize, ClientError)>,
    /// Progress index as last reported to the caller.
    pub progress: usize,
}

impl ClaimAllReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_none()
    }
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct TransactionSequencer<'a> {
    ctx: &'a StakingContext,
}

impl<'a> TransactionSequencer<'a> {
    pub fn new(ctx: &'a StakingContext) -> Self {
        Self { ctx }
    }

    fn begin(&self) -> Result<InFlight<'a>> {
        let flag = &self.ctx.sequence_in_flight;
        if flag.swap(true, Ordering::AcqRel) {
            return Err(ClientError::Busy);
        }
        Ok(InFlight(flag))
    }

    fn user(&self) -> Result<Address> {
        self.ctx
            .wallet()
            .address()
            .filter(|address| !address.is_zero())
            .ok_or(ClientError::NotConnected)
    }

    fn invalidate_stakes(&self, user: Address, chain_id: Option<ChainId>) {
        let mut filter = QueryKey::new(USER_STAKES_QUERY).with("user", user);
        if let Some(chain_id) = chain_id {
            filter = filter.with("chain", chain_id);
        }
        self.ctx.cache().invalidate(&filter);
    }

    /// Switch the wallet to `chain_id` unless it is already there.
    pub async fn ensure_chain(&self, chain_id: ChainId) -> Result<()> {
        self.ctx.rpc(chain_id)?;
        let wallet = self.ctx.wallet();
        let current = wallet.chain_id().await?;
        if current == chain_id {
            return Ok(());
        }
        info!("switching wallet from chain {current} to {chain_id}");
        wallet.switch_chain(chain_id).await
    }

    /// Sign and send `tx`, then wait until it is mined with the configured
    /// number of confirmations.
    ///
    /// Gas is estimated against the current gas price and padded by the
    /// configured margin. A failed estimate is logged and the transaction is
    /// sent without a gas limit.
    pub async fn write_and_wait(&self, tx: &PendingTransaction) -> Result<WriteOutcome> {
        let config = self.ctx.config();
        let wallet = self.ctx.wallet();
        let rpc = self.ctx.rpc(tx.chain_id)?;
        let from = tx
            .account
            .or_else(|| wallet.address())
            .ok_or(ClientError::NotConnected)?;

        let gas_price = rpc.gas_price().await?;
        let mut request = TransactionRequest {
            from,
            to: tx.address,
            data: tx.call_data(),
            value: tx.value,
            gas: None,
            gas_price: Some(gas_price),
            chain_id: tx.chain_id,
        };
        match rpc.estimate_gas(&request).await {
            Ok(gas) => request.gas = Some(apply_gas_margin(gas, config.gas_margin_bps)),
            Err(err) => warn!("gas estimation for {} failed, sending without limit: {err}", tx.function),
        }

        let hash = wallet.send_transaction(&request).await?;
        info!("sent {} on chain {}: {hash}", tx.function, tx.chain_id);

        let receipt = self.wait_for_receipt(rpc, hash).await?;
        if !receipt.succeeded() {
            error!("{} reverted in block {}: {hash}", tx.function, receipt.block_number);
            return Err(ClientError::Reverted(hash));
        }
        info!("{} confirmed in block {}", tx.function, receipt.block_number);
        Ok(WriteOutcome { hash, receipt })
    }

    async fn wait_for_receipt(&self, rpc: &dyn ChainRpc, hash: TxHash) -> Result<TransactionReceipt> {
        let config = self.ctx.config();
        let deadline = Instant::now()
            .checked_add(config.receipt_timeout())
            .ok_or_else(|| ClientError::Config("receipt timeout out of range".to_string()))?;
        loop {
            if let Some(receipt) = rpc.transaction_receipt(hash).await? {
                let head = rpc.block_number().await?;
                let confirmations = head
                    .saturating_sub(receipt.block_number)
                    .saturating_add(1);
                if confirmations >= config.confirmations || !receipt.succeeded() {
                    return Ok(receipt);
                }
                trace!("{hash}: {confirmations}/{} confirmations", config.confirmations);
            }
            if Instant::now() >= deadline {
                return Err(ClientError::ReceiptTimeout(hash));
            }
            sleep(config.poll_interval()).await;
        }
    }

    /// Make sure `spender` may pull `amount` of `token` from the user.
    ///
    /// Nothing is sent when the allowance already covers `amount`. An
    /// insufficient non-zero allowance is first reset to zero, as some tokens
    /// refuse to change one non-zero allowance to another. The new allowance is
    /// exactly `amount`. Only called from inside a guarded sequence.
    async fn approve_allowance(
        &self,
        chain_id: ChainId,
        token: Address,
        spender: Address,
        amount: u128,
    ) -> Result<()> {
        let owner = self.user()?;
        self.ensure_chain(chain_id).await?;
        let allowance = self
            .ctx
            .reader()
            .allowance(chain_id, token, owner, spender)
            .await?;
        if allowance >= amount {
            debug!("allowance {allowance} of {token} covers {amount}");
            return Ok(());
        }
        if allowance != 0 {
            info!("resetting allowance of {token} for {spender} from {allowance}");
            self.write_and_wait(&PendingTransaction::approve(chain_id, token, spender, 0))
                .await?;
        }
        self.write_and_wait(&PendingTransaction::approve(chain_id, token, spender, amount))
            .await?;
        Ok(())
    }

    /// Lock `amount` staking tokens for `duration` seconds.
    pub async fn create_stake(
        &self,
        chain_id: ChainId,
        amount: u128,
        duration: u64,
    ) -> Result<WriteOutcome> {
        let _in_flight = self.begin()?;
        let user = self.user()?;
        if amount == 0 || duration == 0 {
            return Err(ClientError::InvalidInput(
                "stake amount and duration must be non-zero".to_string(),
            ));
        }
        let reader = self.ctx.reader();
        let token = reader.staking_token_address(chain_id).await?;
        self.ensure_chain(chain_id).await?;

        let balance = reader.balance_of(chain_id, token, user).await?;
        if balance < amount {
            return Err(ClientError::InsufficientBalance {
                balance,
                required: amount,
            });
        }

        let pool = self.ctx.staking_pool();
        self.approve_allowance(chain_id, token, pool, amount).await?;
        let outcome = self
            .write_and_wait(&PendingTransaction::stake(chain_id, pool, amount, duration))
            .await?;
        self.invalidate_stakes(user, None);
        Ok(outcome)
    }

    /// Withdraw `amount` from the user's stake at `stake_index`.
    pub async fn unstake(
        &self,
        chain_id: ChainId,
        amount: u128,
        stake_index: usize,
    ) -> Result<WriteOutcome> {
        let _in_flight = self.begin()?;
        let user = self.user()?;
        if amount == 0 {
            return Err(ClientError::InvalidInput(
                "unstake amount must be non-zero".to_string(),
            ));
        }
        self.ensure_chain(chain_id).await?;
        let outcome = self
            .write_and_wait(&PendingTransaction::unstake(
                chain_id,
                self.ctx.staking_pool(),
                amount,
                stake_index,
            ))
            .await?;
        self.invalidate_stakes(user, Some(chain_id));
        Ok(outcome)
    }

    pub async fn claim_rewards(&self, chain_id: ChainId, stake_index: usize) -> Result<WriteOutcome> {
        let _in_flight = self.begin()?;
        let user = self.user()?;
        self.claim(user, chain_id, stake_index).await
    }

    async fn claim(&self, user: Address, chain_id: ChainId, stake_index: usize) -> Result<WriteOutcome> {
        self.ensure_chain(chain_id).await?;
        let outcome = self
            .write_and_wait(&PendingTransaction::claim_rewards(
                chain_id,
                self.ctx.staking_pool(),
                stake_index,
            ))
            .await?;
        self.invalidate_stakes(user, Some(chain_id));
        Ok(outcome)
    }

    /// Claim each `(chain, stake index)` target in order, one at a time.
    ///
    /// `on_progress` receives the position of the next target after each
    /// successful claim. The run stops at the first failure; claims already
    /// mined stay mined.
    pub async fn claim_all(
        &self,
        targets: &[(ChainId, usize)],
        mut on_progress: impl FnMut(usize),
    ) -> Result<ClaimAllReport> {
        let _in_flight = self.begin()?;
        let user = self.user()?;
        let mut report = ClaimAllReport {
            completed: Vec::with_capacity(targets.len()),
            failed: None,
            progress: 0,
        };
        on_progress(0);

        for (position, (chain_id, stake_index)) in targets.iter().enumerate() {
            match self.claim(user, *chain_id, *stake_index).await {
                Ok(_) => {
                    report.completed.push(position);
                    let next = position.saturating_add(1);
                    if next < targets.len() {
                        report.progress = next;
                        on_progress(next);
                    }
                }
                Err(err) => {
                    error!(
                        "claim-all stopped at {position} (chain {chain_id}, stake {stake_index}): {err}"
                    );
                    report.failed = Some((position, err));
                    break;
                }
            }
        }
        info!(
            "claim-all: {}/{} claims mined",
            report.completed.len(),
            targets.len()
        );
        Ok(report)
    }
}
