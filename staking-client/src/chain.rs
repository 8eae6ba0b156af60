use {
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// EIP-155 chain identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    pub const ETHEREUM: ChainId = ChainId(1);
    pub const BSC: ChainId = ChainId(56);

    pub fn name(&self) -> &'static str {
        match *self {
            Self::ETHEREUM => "Ethereum",
            Self::BSC => "BNB Smart Chain",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chains the staking pool is deployed on, in display order.
pub const SUPPORTED_CHAINS: [ChainId; 2] = [ChainId::BSC, ChainId::ETHEREUM];
