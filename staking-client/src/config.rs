//! Client configuration, stored as YAML.

use {
    crate::{
        chain::{ChainId, SUPPORTED_CHAINS},
        contracts,
        error::{ClientError, Result},
        primitives::Address,
    },
    serde::{Deserialize, Serialize},
    std::{
        fs::{self, File},
        io::Write,
        path::{Path, PathBuf},
        time::Duration,
    },
    url::Url,
};

/// Environment variable that overrides [`SimulationConfig::access_key`].
pub const SIMULATION_ACCESS_KEY_ENV: &str = "TENDERLY_ACCESS_KEY";

/// `~/.config/tokenfi-staking/config.yml`, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    let mut path = dirs_next::home_dir()?;
    path.extend([".config", "tokenfi-staking", "config.yml"]);
    Some(path)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Staking pool address, identical on every chain. Required.
    pub staking_pool: Option<Address>,
    pub chains: Vec<ChainConfig>,
    /// Per-request timeout of every HTTP call.
    pub rpc_timeout_ms: u64,
    /// Delay between receipt polls.
    pub poll_interval_ms: u64,
    /// How long to wait for a transaction receipt before giving up.
    pub receipt_timeout_ms: u64,
    /// Blocks, including the inclusion block, before a write counts as done.
    pub confirmations: u64,
    /// Extra gas on top of the estimate, in basis points.
    pub gas_margin_bps: u64,
    pub simulation: SimulationConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            staking_pool: None,
            chains: vec![ChainConfig::bsc(), ChainConfig::ethereum()],
            rpc_timeout_ms: 10_000,
            poll_interval_ms: 6_000,
            receipt_timeout_ms: 300_000,
            confirmations: 1,
            gas_margin_bps: 1_000,
            simulation: SimulationConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn load(config_file: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(config_file)?;
        let config = serde_yaml::from_reader(file)?;
        Ok(config)
    }

    /// Load `config_file`, or the defaults if it does not exist.
    pub fn load_or_default(config_file: impl AsRef<Path>) -> Result<Self> {
        match Self::load(config_file) {
            Err(ClientError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            result => result,
        }
    }

    pub fn save(&self, config_file: impl AsRef<Path>) -> Result<()> {
        let serialized = serde_yaml::to_string(self)?;
        if let Some(outdir) = config_file.as_ref().parent() {
            fs::create_dir_all(outdir)?;
        }
        let mut file = File::create(config_file)?;
        file.write_all(serialized.as_bytes())?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        match self.staking_pool {
            None => return Err(ClientError::Config("staking_pool is not set".to_string())),
            Some(pool) if pool.is_zero() => {
                return Err(ClientError::Config("staking_pool is the zero address".to_string()))
            }
            Some(_) => {}
        }
        for chain in SUPPORTED_CHAINS {
            if self.chain(chain).is_none() {
                return Err(ClientError::Config(format!(
                    "missing settings for chain {} ({})",
                    chain,
                    chain.name()
                )));
            }
        }
        for chain in &self.chains {
            chain.validate()?;
        }
        if self.confirmations == 0 {
            return Err(ClientError::Config("confirmations must be at least 1".to_string()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ClientError::Config("poll_interval_ms must be positive".to_string()));
        }
        Ok(())
    }

    pub fn chain(&self, chain_id: ChainId) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.chain_id == chain_id)
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_millis(self.receipt_timeout_ms)
    }
}

/// Per-chain endpoints and price-discovery contracts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub chain_id: ChainId,
    /// Tried in order; later entries are fallbacks.
    pub rpc_endpoints: Vec<String>,
    /// Uniswap V2 style router.
    pub router: Address,
    /// USD stablecoin used to value the pool.
    pub usd_token: Address,
}

impl ChainConfig {
    pub fn bsc() -> Self {
        Self {
            chain_id: ChainId::BSC,
            rpc_endpoints: vec![
                "https://bsc.publicnode.com".to_string(),
                "https://binance.llamarpc.com".to_string(),
                "https://bsc-dataseed1.defibit.io".to_string(),
                "https://bsc-dataseed1.binance.org".to_string(),
                "https://bsc-dataseed.bnbchain.org".to_string(),
            ],
            router: contracts::PANCAKESWAP_V2_ROUTER,
            usd_token: contracts::BSC_USDC,
        }
    }

    pub fn ethereum() -> Self {
        Self {
            chain_id: ChainId::ETHEREUM,
            rpc_endpoints: vec![
                "https://ethereum-rpc.publicnode.com".to_string(),
                "https://eth.llamarpc.com".to_string(),
            ],
            router: contracts::UNISWAP_V2_ROUTER,
            usd_token: contracts::ETHEREUM_USDC,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.rpc_endpoints.is_empty() {
            return Err(ClientError::NoEndpoints(self.chain_id));
        }
        for endpoint in &self.rpc_endpoints {
            let url = Url::parse(endpoint).map_err(|err| {
                ClientError::Config(format!("invalid rpc endpoint '{endpoint}': {err}"))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ClientError::Config(format!(
                    "rpc endpoint '{endpoint}' must use http or https"
                )));
            }
        }
        Ok(())
    }
}

/// Settings of the hosted transaction simulation service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SimulationConfig {
    pub api_base: String,
    pub dashboard_base: String,
    pub account_slug: String,
    pub project_slug: String,
    /// Reported to the service as the simulation origin.
    pub source: String,
    pub access_key: Option<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.tenderly.co/api/v1".to_string(),
            dashboard_base: "https://dashboard.tenderly.co".to_string(),
            account_slug: String::new(),
            project_slug: "project".to_string(),
            source: "rabby-wallet".to_string(),
            access_key: None,
        }
    }
}

impl SimulationConfig {
    /// The access key, with the environment taking precedence over the file.
    pub fn access_key(&self) -> Option<String> {
        std::env::var(SIMULATION_ACCESS_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.access_key.clone())
    }

    pub fn validate(&self) -> Result<()> {
        if self.account_slug.is_empty() || self.project_slug.is_empty() {
            return Err(ClientError::Config(
                "simulation account_slug and project_slug must be set".to_string(),
            ));
        }
        for base in [&self.api_base, &self.dashboard_base] {
            Url::parse(base)
                .map_err(|err| ClientError::Config(format!("invalid url '{base}': {err}")))?;
        }
        Ok(())
    }
}
