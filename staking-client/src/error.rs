//! Error types for the staking client.

use {
    crate::{
        chain::ChainId,
        primitives::TxHash,
    },
    thiserror::Error,
    tokenfi_staking_math::MathError,
};

/// Errors surfaced by reads, transaction sequences and the simulation
/// forwarder. None of them are retried by the client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// A value that should be a 20-byte hex address is not one.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A required input is missing or out of range. Raised before any I/O.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The action needs a connected wallet address.
    #[error("user not connected")]
    NotConnected,

    /// The wallet only exposes an address and cannot sign or switch chains.
    #[error("wallet is read-only and cannot {0}")]
    ReadOnlyWallet(&'static str),

    /// The wallet rejected or failed a request.
    #[error("wallet error: {0}")]
    Wallet(String),

    /// The chain is not one of the configured chains.
    #[error("unsupported chain {0}")]
    UnsupportedChain(ChainId),

    /// The configuration is incomplete or inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The wallet holds fewer staking tokens than the requested stake.
    #[error("insufficient balance: have {balance}, need {required}")]
    InsufficientBalance { balance: u128, required: u128 },

    /// A transaction sequence is already running.
    #[error("another transaction sequence is in flight")]
    Busy,

    /// The transaction was mined but reverted.
    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    /// The receipt did not reach the required confirmations in time.
    #[error("timed out waiting for receipt of {0}")]
    ReceiptTimeout(TxHash),

    /// The node answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Every endpoint of the chain was tried; no endpoints are configured.
    #[error("no rpc endpoints configured for chain {0}")]
    NoEndpoints(ChainId),

    /// Transport-level HTTP failure (connect, timeout, non-2xx, body).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Contract return data does not match the expected ABI layout.
    #[error("abi decode error: {0}")]
    Decode(String),

    #[error(transparent)]
    Math(#[from] MathError),

    /// The simulation service answered with a non-success status.
    #[error("failed to simulate transaction: {0}")]
    SimulationFailed(String),
}

/// Convenience result type for staking client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
