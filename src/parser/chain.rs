//! Supported EVM networks and their block-explorer endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four networks a wallet's history is collected from
///
/// The derived ordering follows declaration order, so `BTreeMap<ChainId, _>`
/// iterates Ethereum, Polygon, Arbitrum, Optimism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainId {
    Ethereum,
    Polygon,
    Arbitrum,
    Optimism,
}

impl ChainId {
    /// Every supported chain, in report order
    pub const ALL: [ChainId; 4] = [
        ChainId::Ethereum,
        ChainId::Polygon,
        ChainId::Arbitrum,
        ChainId::Optimism,
    ];

    /// EIP-155 chain id wallets report for this network
    pub fn evm_chain_id(&self) -> u64 {
        match self {
            ChainId::Ethereum => 1,
            ChainId::Polygon => 137,
            ChainId::Arbitrum => 42161,
            ChainId::Optimism => 10,
        }
    }

    /// Map a wallet's numeric chain id back to a supported network
    pub fn from_evm_chain_id(chain_id: u64) -> Option<ChainId> {
        ChainId::ALL
            .into_iter()
            .find(|chain| chain.evm_chain_id() == chain_id)
    }

    /// Lowercase name used as JSON key and CLI value
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainId::Ethereum => "ethereum",
            ChainId::Polygon => "polygon",
            ChainId::Arbitrum => "arbitrum",
            ChainId::Optimism => "optimism",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ChainId::Ethereum => "Ethereum",
            ChainId::Polygon => "Polygon",
            ChainId::Arbitrum => "Arbitrum One",
            ChainId::Optimism => "Optimism",
        }
    }

    /// Symbol of the token fees are paid in
    pub fn native_symbol(&self) -> &'static str {
        match self {
            ChainId::Polygon => "MATIC",
            ChainId::Ethereum | ChainId::Arbitrum | ChainId::Optimism => "ETH",
        }
    }

    /// Etherscan-compatible API endpoint for this chain
    pub fn explorer_api_url(&self) -> &'static str {
        match self {
            ChainId::Ethereum => "https://api.etherscan.io/api",
            ChainId::Polygon => "https://api.polygonscan.com/api",
            ChainId::Arbitrum => "https://api.arbiscan.io/api",
            ChainId::Optimism => "https://api-optimistic.etherscan.io/api",
        }
    }

    /// Environment variable holding the explorer API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ChainId::Ethereum => "ETHERSCAN_API_KEY",
            ChainId::Polygon => "POLYGONSCAN_API_KEY",
            ChainId::Arbitrum => "ARBISCAN_API_KEY",
            ChainId::Optimism => "OPTIMISM_API_KEY",
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ChainId::ALL
            .into_iter()
            .find(|chain| chain.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown chain '{}' (expected one of: ethereum, polygon, arbitrum, optimism)",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Polygon".parse::<ChainId>().unwrap(), ChainId::Polygon);
        assert_eq!(" OPTIMISM ".parse::<ChainId>().unwrap(), ChainId::Optimism);
        assert!("solana".parse::<ChainId>().is_err());
    }

    #[test]
    fn test_native_symbols() {
        assert_eq!(ChainId::Polygon.native_symbol(), "MATIC");
        assert_eq!(ChainId::Arbitrum.native_symbol(), "ETH");
    }

    #[test]
    fn test_evm_chain_ids() {
        assert_eq!(ChainId::from_evm_chain_id(1), Some(ChainId::Ethereum));
        assert_eq!(ChainId::from_evm_chain_id(137), Some(ChainId::Polygon));
        assert_eq!(ChainId::from_evm_chain_id(42161), Some(ChainId::Arbitrum));
        assert_eq!(ChainId::from_evm_chain_id(10), Some(ChainId::Optimism));
        assert_eq!(ChainId::from_evm_chain_id(56), None);

        for chain in ChainId::ALL {
            assert_eq!(ChainId::from_evm_chain_id(chain.evm_chain_id()), Some(chain));
        }
    }

    #[test]
    fn test_serializes_as_lowercase_key() {
        let json = serde_json::to_string(&ChainId::Arbitrum).unwrap();
        assert_eq!(json, "\"arbitrum\"");
    }
}
