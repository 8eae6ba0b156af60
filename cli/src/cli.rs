use {
    crate::{metrics::MetricsCliCommand, stakes::StakesCliCommand},
    serde::Serialize,
    std::{fmt, str::FromStr, sync::Arc},
    thiserror::Error,
    tokenfi_staking_client::{
        Address, ChainId, ClientConfig, ClientError, ReadOnlyWallet, StakingContext,
    },
    tokenfi_staking_math::MathError,
};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("bad parameter: {0}")]
    BadParameter(String),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Math(#[from] MathError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ProcessResult = Result<String, CliError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Display,
    Json,
    JsonCompact,
}

impl OutputFormat {
    pub fn from_matches(value: Option<&str>) -> Self {
        match value {
            Some("json") => OutputFormat::Json,
            Some("json-compact") => OutputFormat::JsonCompact,
            _ => OutputFormat::Display,
        }
    }

    pub fn formatted_string<T: Serialize + fmt::Display>(&self, item: &T) -> ProcessResult {
        match self {
            OutputFormat::Display => Ok(item.to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(item)?),
            OutputFormat::JsonCompact => Ok(serde_json::to_string(item)?),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum CliCommand {
    Metrics(MetricsCliCommand),
    Stakes(StakesCliCommand),
}

pub struct CliConfig {
    pub client: ClientConfig,
    pub output_format: OutputFormat,
}

impl CliConfig {
    /// A context that reads on behalf of `user` and never signs.
    pub fn context(&self, user: Option<Address>) -> Result<StakingContext, CliError> {
        let wallet = ReadOnlyWallet::new(user, ChainId::BSC);
        Ok(StakingContext::new(self.client.clone(), Arc::new(wallet))?)
    }
}

/// `bsc`, `ethereum`, `eth` or a numeric chain id of a supported chain.
pub fn parse_chain(value: &str) -> Result<ChainId, CliError> {
    let chain = match value.to_ascii_lowercase().as_str() {
        "bsc" | "bnb" => ChainId::BSC,
        "ethereum" | "eth" | "mainnet" => ChainId::ETHEREUM,
        other => other
            .parse::<u64>()
            .map(ChainId)
            .map_err(|_| CliError::BadParameter(format!("unknown chain '{value}'")))?,
    };
    if !tokenfi_staking_client::SUPPORTED_CHAINS.contains(&chain) {
        return Err(CliError::BadParameter(format!("unsupported chain {chain}")));
    }
    Ok(chain)
}

pub fn parse_address(value: &str) -> Result<Address, CliError> {
    Address::from_str(value).map_err(|_| CliError::BadParameter(format!("invalid address '{value}'")))
}

// clap 2 validators
pub fn is_valid_chain(value: String) -> Result<(), String> {
    parse_chain(&value).map(|_| ()).map_err(|err| err.to_string())
}

pub fn is_valid_address(value: String) -> Result<(), String> {
    parse_address(&value).map(|_| ()).map_err(|err| err.to_string())
}

pub fn is_amount(value: String) -> Result<(), String> {
    tokenfi_staking_math::decimals::parse_units(&value, 18)
        .map(|_| ())
        .map_err(|err| err.to_string())
}

pub fn is_seconds(value: String) -> Result<(), String> {
    value
        .parse::<u64>()
        .map(|_| ())
        .map_err(|err| format!("invalid duration '{value}': {err}"))
}

pub fn is_index(value: String) -> Result<(), String> {
    value
        .parse::<usize>()
        .map(|_| ())
        .map_err(|err| format!("invalid index '{value}': {err}"))
}

pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}
