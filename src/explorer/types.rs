//! Types for Etherscan-compatible explorer APIs.
//!
//! Etherscan, Polygonscan, Arbiscan and Optimistic Etherscan share the same
//! `module=account&action=txlist` endpoint and response envelope.

use crate::utils::config::{DEFAULT_END_BLOCK, DEFAULT_PAGE_SIZE, DEFAULT_START_BLOCK};
use serde::Deserialize;

/// Response envelope returned by every explorer endpoint
#[derive(Debug, Deserialize)]
pub struct ExplorerResponse {
    /// "1" on success, "0" on error or empty result
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub message: String,

    /// Transaction array on success, an error string otherwise
    #[serde(default)]
    pub result: serde_json::Value,
}

/// Block range and page size of a `txlist` request
///
/// Only the first page is ever requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxListQuery {
    pub start_block: u64,
    pub end_block: u64,
    pub page_size: u32,
}

impl Default for TxListQuery {
    fn default() -> Self {
        Self {
            start_block: DEFAULT_START_BLOCK,
            end_block: DEFAULT_END_BLOCK,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl TxListQuery {
    /// Query-string parameters for `address`
    ///
    /// # Arguments
    /// * `address` - Wallet address (with 0x prefix)
    /// * `api_key` - Explorer API key, omitted when `None`
    pub fn params(&self, address: &str, api_key: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("module", "account".to_string()),
            ("action", "txlist".to_string()),
            ("address", address.to_string()),
            ("startblock", self.start_block.to_string()),
            ("endblock", self.end_block.to_string()),
            ("page", "1".to_string()),
            ("offset", self.page_size.to_string()),
            ("sort", "asc".to_string()),
        ];

        if let Some(key) = api_key {
            params.push(("apikey", key.to_string()));
        }

        params
    }
}
