use {
    crate::{
        cache::QueryCache,
        chain::ChainId,
        config::{ChainConfig, ClientConfig},
        error::{ClientError, Result},
        metrics::DashboardMetrics,
        penalty::PenaltyQuotes,
        primitives::Address,
        reader::StakingReader,
        rpc::{ChainRpc, HttpChainRpc},
        sequencer::TransactionSequencer,
        simulation::SimulationForwarder,
        wallet::Wallet,
    },
    log::*,
    std::{
        collections::HashMap,
        sync::{atomic::AtomicBool, Arc},
    },
};

/// Everything the staking operations share: configuration, one RPC client
/// per chain, the query cache and the user's wallet. Build one per session
/// and drop it (or call [`StakingContext::shutdown`]) to tear it down.
pub struct StakingContext {
    config: ClientConfig,
    staking_pool: Address,
    rpcs: HashMap<ChainId, Arc<dyn ChainRpc>>,
    cache: QueryCache,
    wallet: Arc<dyn Wallet>,
    simulation: SimulationForwarder,
    pub(crate) sequence_in_flight: AtomicBool,
}

impl std::fmt::Debug for StakingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StakingContext")
            .field("config", &self.config)
            .field("staking_pool", &self.staking_pool)
            .finish_non_exhaustive()
    }
}

impl StakingContext {
    /// Connect to every configured chain over HTTP.
    pub fn new(config: ClientConfig, wallet: Arc<dyn Wallet>) -> Result<Self> {
        config.validate()?;
        let mut rpcs: HashMap<ChainId, Arc<dyn ChainRpc>> = HashMap::new();
        for chain in &config.chains {
            let rpc = HttpChainRpc::new(
                chain.chain_id,
                chain.rpc_endpoints.clone(),
                config.rpc_timeout(),
            )?;
            rpcs.insert(chain.chain_id, Arc::new(rpc));
        }
        Self::with_rpc(config, rpcs, wallet)
    }

    /// Use caller-supplied chain clients.
    pub fn with_rpc(
        config: ClientConfig,
        rpcs: HashMap<ChainId, Arc<dyn ChainRpc>>,
        wallet: Arc<dyn Wallet>,
    ) -> Result<Self> {
        config.validate()?;
        let staking_pool = config
            .staking_pool
            .ok_or_else(|| ClientError::Config("staking_pool is not set".to_string()))?;
        let simulation = SimulationForwarder::new(config.simulation.clone(), config.rpc_timeout())?;
        info!(
            "staking context ready: pool {staking_pool}, chains {:?}",
            rpcs.keys().map(|c| c.0).collect::<Vec<_>>()
        );
        Ok(Self {
            config,
            staking_pool,
            rpcs,
            cache: QueryCache::new(),
            wallet,
            simulation,
            sequence_in_flight: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn chain_config(&self, chain_id: ChainId) -> Result<&ChainConfig> {
        self.config
            .chain(chain_id)
            .ok_or(ClientError::UnsupportedChain(chain_id))
    }

    pub fn staking_pool(&self) -> Address {
        self.staking_pool
    }

    pub fn rpc(&self, chain_id: ChainId) -> Result<&dyn ChainRpc> {
        self.rpcs
            .get(&chain_id)
            .map(|rpc| rpc.as_ref())
            .ok_or(ClientError::UnsupportedChain(chain_id))
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn wallet(&self) -> &dyn Wallet {
        self.wallet.as_ref()
    }

    pub fn simulation(&self) -> &SimulationForwarder {
        &self.simulation
    }

    pub fn reader(&self) -> StakingReader<'_> {
        StakingReader::new(self)
    }

    pub fn metrics(&self) -> DashboardMetrics<'_> {
        DashboardMetrics::new(self)
    }

    pub fn penalties(&self) -> PenaltyQuotes<'_> {
        PenaltyQuotes::new(self)
    }

    pub fn sequencer(&self) -> TransactionSequencer<'_> {
        TransactionSequencer::new(self)
    }

    /// Drop cached reads and release the chain clients.
    pub fn shutdown(self) {
        let cached = self.cache.len();
        self.cache.clear();
        info!("staking context shut down, dropped {cached} cached reads");
    }
}
