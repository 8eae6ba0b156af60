use {
    crate::{
        chain::ChainId,
        error::{ClientError, Result},
        primitives::{Address, TxHash},
        rpc::TransactionRequest,
    },
    async_trait::async_trait,
};

/// The user's signing wallet. Reads go through [`crate::rpc::ChainRpc`]; the
/// wallet only identifies the user, holds the active chain and signs.
#[async_trait]
pub trait Wallet: Send + Sync {
    fn is_connected(&self) -> bool;
    fn address(&self) -> Option<Address>;
    /// Chain the wallet is currently connected to.
    async fn chain_id(&self) -> Result<ChainId>;
    async fn switch_chain(&self, chain_id: ChainId) -> Result<()>;
    /// Sign and broadcast, returning the transaction hash.
    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash>;
}

/// A watch-only wallet: knows an address, never signs.
#[derive(Debug, Clone, Copy)]
pub struct ReadOnlyWallet {
    address: Option<Address>,
    chain_id: ChainId,
}

impl ReadOnlyWallet {
    pub fn new(address: Option<Address>, chain_id: ChainId) -> Self {
        Self { address, chain_id }
    }

    pub fn disconnected() -> Self {
        Self::new(None, ChainId::BSC)
    }
}

#[async_trait]
impl Wallet for ReadOnlyWallet {
    fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    fn address(&self) -> Option<Address> {
        self.address
    }

    async fn chain_id(&self) -> Result<ChainId> {
        Ok(self.chain_id)
    }

    async fn switch_chain(&self, _chain_id: ChainId) -> Result<()> {
        Err(ClientError::ReadOnlyWallet("switch chains"))
    }

    async fn send_transaction(&self, _tx: &TransactionRequest) -> Result<TxHash> {
        Err(ClientError::ReadOnlyWallet("sign transactions"))
    }
}
