//! In-memory chain and wallet used by the unit tests.

use {
    crate::{
        abi::{self, test_encode, RawStake, Token},
        chain::ChainId,
        config::{ChainConfig, ClientConfig},
        context::StakingContext,
        contracts::{erc20, multiplier, penalty_fee, router, staking_pool},
        error::{ClientError, Result},
        primitives::{Address, TxHash},
        rpc::{ChainRpc, TransactionReceipt, TransactionRequest},
        wallet::Wallet,
    },
    async_trait::async_trait,
    std::{
        collections::{HashMap, HashSet},
        sync::{
            atomic::{AtomicU64, Ordering},
            Arc, Mutex,
        },
    },
};

pub const POOL: Address = Address::new([0x50; 20]);
pub const STAKING_TOKEN: Address = Address::new([0x51; 20]);
pub const REWARDS_TOKEN: Address = Address::new([0x52; 20]);
pub const MULTIPLIER: Address = Address::new([0x53; 20]);
pub const PENALTY: Address = Address::new([0x54; 20]);
pub const WETH: Address = Address::new([0x55; 20]);
pub const ROUTER: Address = Address::new([0x56; 20]);
pub const USD: Address = Address::new([0x57; 20]);
pub const USER: Address = Address::new([0x60; 20]);

pub const ONE_TOKEN: u128 = 1_000_000_000;
pub const THRESHOLDS: [u64; 3] = [7_776_000, 31_536_000, 63_072_000];

pub struct FakeChain {
    pub chain_id: ChainId,
    responses: Mutex<HashMap<(Address, Vec<u8>), Vec<u8>>>,
    calls: Mutex<Vec<(Address, Vec<u8>)>>,
    receipts: Mutex<HashMap<TxHash, TransactionReceipt>>,
    block_number: AtomicU64,
    estimate_fails: Mutex<bool>,
    estimates: Mutex<Vec<TransactionRequest>>,
}

impl FakeChain {
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            responses: Mutex::default(),
            calls: Mutex::default(),
            receipts: Mutex::default(),
            block_number: AtomicU64::new(100),
            estimate_fails: Mutex::new(false),
            estimates: Mutex::default(),
        }
    }

    pub fn respond(&self, to: Address, signature: &str, args: &[Token], output: Vec<u8>) {
        self.responses
            .lock()
            .unwrap()
            .insert((to, abi::encode_call(signature, args)), output);
    }

    pub fn forget(&self, to: Address, signature: &str, args: &[Token]) {
        self.responses
            .lock()
            .unwrap()
            .remove(&(to, abi::encode_call(signature, args)));
    }

    pub fn call_count(&self, to: Address, signature: &str) -> usize {
        let selector = abi::selector(signature);
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(address, data)| *address == to && data.starts_with(&selector))
            .count()
    }

    pub fn fail_estimates(&self) {
        *self.estimate_fails.lock().unwrap() = true;
    }

    pub fn estimate_count(&self) -> usize {
        self.estimates.lock().unwrap().len()
    }

    pub fn mine(&self, hash: TxHash, status: u64) {
        let block_number = self.block_number.fetch_add(1, Ordering::SeqCst);
        self.receipts.lock().unwrap().insert(
            hash,
            TransactionReceipt {
                transaction_hash: hash,
                block_number,
                status,
            },
        );
    }

    /// Populate the pool, token, multiplier, penalty and router reads.
    pub fn script_pool(&self) {
        for (signature, address) in [
            (staking_pool::STAKING_TOKEN, STAKING_TOKEN),
            (staking_pool::REWARDS_TOKEN, REWARDS_TOKEN),
            (staking_pool::REWARDS_MULTIPLIER, MULTIPLIER),
            (staking_pool::PENALTY_FEE_CALCULATOR, PENALTY),
        ] {
            self.respond(POOL, signature, &[], test_encode::address(address));
        }
        self.respond(POOL, staking_pool::REWARD_RATE_PER_SEC, &[], test_encode::uint(3 * ONE_TOKEN));
        self.respond(
            POOL,
            staking_pool::TOTAL_WEIGHTED_STAKE,
            &[],
            test_encode::uint(250_000_000 * ONE_TOKEN),
        );
        self.respond(
            POOL,
            staking_pool::TOTAL_STAKED,
            &[],
            test_encode::uint(1_000_000_000 * ONE_TOKEN),
        );
        self.respond(POOL, staking_pool::PERIOD_FINISH, &[], test_encode::uint(1_900_000_000));

        for (token, name, symbol, decimals) in [
            (STAKING_TOKEN, "TokenFi", "TOKEN", 9),
            (REWARDS_TOKEN, "TokenFi", "TOKEN", 9),
            (USD, "USD Coin", "USDC", 18),
        ] {
            self.respond(token, erc20::NAME, &[], test_encode::string(name));
            self.respond(token, erc20::SYMBOL, &[], test_encode::string(symbol));
            self.respond(token, erc20::DECIMALS, &[], test_encode::uint(decimals));
        }

        self.respond(
            MULTIPLIER,
            multiplier::GET_DURATION_THRESHOLDS,
            &[],
            test_encode::uint_array(&THRESHOLDS.map(u128::from)),
        );
        for (threshold, value) in THRESHOLDS.iter().zip([10_000u128, 15_000, 20_000]) {
            self.respond(
                MULTIPLIER,
                multiplier::GET_MULTIPLIER,
                &[Token::Uint(ONE_TOKEN), Token::Uint(u128::from(*threshold))],
                test_encode::uint(value),
            );
        }
        for (group, percent) in [(0u128, 5_000u128), (1, 3_000), (2, 1_000)] {
            self.respond(
                PENALTY,
                penalty_fee::PENALTY_FEE_PER_GROUP,
                &[Token::Uint(group)],
                test_encode::uint(percent),
            );
        }

        self.respond(ROUTER, router::WETH, &[], test_encode::address(WETH));
        // 1 TOKEN = 42_000 gwei of WETH; same for both legs.
        for token in [STAKING_TOKEN, REWARDS_TOKEN] {
            self.respond(
                ROUTER,
                router::GET_AMOUNTS_IN,
                &[Token::Uint(ONE_TOKEN), Token::AddressArray(vec![WETH, token])],
                test_encode::uint_array(&[42_000_000_000_000, ONE_TOKEN]),
            );
        }
        // 1 TOKEN -> WETH -> 0.000042 USD (18 decimals)
        self.respond(
            ROUTER,
            router::GET_AMOUNTS_OUT,
            &[Token::Uint(ONE_TOKEN), Token::AddressArray(vec![STAKING_TOKEN, WETH, USD])],
            test_encode::uint_array(&[ONE_TOKEN, 1_000_000_000_000, 42_000_000_000_000]),
        );
    }

    pub fn script_stakes(&self, user: Address, stakes: &[RawStake]) {
        self.respond(
            POOL,
            staking_pool::GET_USER_STAKES,
            &[Token::Address(user)],
            test_encode::stakes(stakes),
        );
    }

    pub fn script_balance(&self, user: Address, balance: u128) {
        self.respond(
            STAKING_TOKEN,
            erc20::BALANCE_OF,
            &[Token::Address(user)],
            test_encode::uint(balance),
        );
    }

    pub fn script_allowance(&self, owner: Address, allowance: u128) {
        self.respond(
            STAKING_TOKEN,
            erc20::ALLOWANCE,
            &[Token::Address(owner), Token::Address(POOL)],
            test_encode::uint(allowance),
        );
    }
}

#[async_trait]
impl ChainRpc for FakeChain {
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push((to, data.clone()));
        self.responses
            .lock()
            .unwrap()
            .get(&(to, data))
            .cloned()
            .ok_or_else(|| ClientError::Rpc {
                code: 3,
                message: "execution reverted".to_string(),
            })
    }

    async fn block_number(&self) -> Result<u64> {
        Ok(self.block_number.load(Ordering::SeqCst))
    }

    async fn gas_price(&self) -> Result<u128> {
        Ok(5_000_000_000)
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u128> {
        self.estimates.lock().unwrap().push(tx.clone());
        if *self.estimate_fails.lock().unwrap() {
            return Err(ClientError::Rpc {
                code: -32000,
                message: "gas required exceeds allowance".to_string(),
            });
        }
        Ok(100_000)
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>> {
        Ok(self.receipts.lock().unwrap().get(&hash).copied())
    }
}

/// Signs by mining a receipt on the matching [`FakeChain`].
pub struct FakeWallet {
    address: Option<Address>,
    chain_id: Mutex<ChainId>,
    chains: Mutex<HashMap<ChainId, Arc<FakeChain>>>,
    sent: Mutex<Vec<TransactionRequest>>,
    switches: Mutex<Vec<ChainId>>,
    reverting: Mutex<HashSet<Vec<u8>>>,
}

impl FakeWallet {
    pub fn new(address: Option<Address>) -> Self {
        Self {
            address,
            chain_id: Mutex::new(ChainId::BSC),
            chains: Mutex::default(),
            sent: Mutex::default(),
            switches: Mutex::default(),
            reverting: Mutex::default(),
        }
    }

    pub fn attach(&self, chain: Arc<FakeChain>) {
        self.chains.lock().unwrap().insert(chain.chain_id, chain);
    }

    /// Transactions with exactly this calldata get a reverted receipt.
    pub fn revert_on(&self, data: Vec<u8>) {
        self.reverting.lock().unwrap().insert(data);
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn switches(&self) -> Vec<ChainId> {
        self.switches.lock().unwrap().clone()
    }
}

#[async_trait]
impl Wallet for FakeWallet {
    fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    fn address(&self) -> Option<Address> {
        self.address
    }

    async fn chain_id(&self) -> Result<ChainId> {
        Ok(*self.chain_id.lock().unwrap())
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<()> {
        self.switches.lock().unwrap().push(chain_id);
        *self.chain_id.lock().unwrap() = chain_id;
        Ok(())
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash> {
        if *self.chain_id.lock().unwrap() != tx.chain_id {
            return Err(ClientError::Wallet("chain mismatch".to_string()));
        }
        let chain = self
            .chains
            .lock()
            .unwrap()
            .get(&tx.chain_id)
            .cloned()
            .ok_or(ClientError::UnsupportedChain(tx.chain_id))?;
        let mut sent = self.sent.lock().unwrap();
        let hash = TxHash::new([u8::try_from(sent.len() + 1).unwrap(); 32]);
        let status = u64::from(!self.reverting.lock().unwrap().contains(&tx.data));
        chain.mine(hash, status);
        sent.push(tx.clone());
        Ok(hash)
    }
}

pub fn test_config(chains: &[ChainId]) -> ClientConfig {
    ClientConfig {
        staking_pool: Some(POOL),
        chains: chains
            .iter()
            .map(|chain_id| ChainConfig {
                chain_id: *chain_id,
                rpc_endpoints: vec!["http://127.0.0.1:8545".to_string()],
                router: ROUTER,
                usd_token: USD,
            })
            .collect(),
        poll_interval_ms: 5,
        receipt_timeout_ms: 1_000,
        ..ClientConfig::default()
    }
}

/// Context over fake chains. Both chains stay configured; only the ones
/// passed in get a client.
pub fn test_context(chains: &[Arc<FakeChain>], wallet: Arc<FakeWallet>) -> StakingContext {
    let mut rpcs: HashMap<ChainId, Arc<dyn ChainRpc>> = HashMap::new();
    for chain in chains {
        wallet.attach(chain.clone());
        rpcs.insert(chain.chain_id, chain.clone());
    }
    let all = [ChainId::BSC, ChainId::ETHEREUM];
    let config = test_config(&all);
    StakingContext::with_rpc(config, rpcs, wallet).unwrap()
}
