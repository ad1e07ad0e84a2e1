//! HTTP client for Etherscan-compatible block-explorer APIs.

use super::types::{ExplorerResponse, TxListQuery};
use crate::parser::{decode_transactions, ChainId, RawTransaction};
use crate::utils::config::{DEFAULT_HTTP_TIMEOUT, NO_TRANSACTIONS_MESSAGE};
use crate::utils::error::ExplorerError;
use log::{debug, info};
use reqwest::blocking::Client;
use std::env;

/// Explorer client for a single chain
pub struct ExplorerClient {
    client: Client,
    chain: ChainId,
    base_url: String,
    api_key: Option<String>,
}

impl ExplorerClient {
    /// Create a client for the chain's public explorer
    pub fn new(chain: ChainId, api_key: Option<String>) -> Result<Self, ExplorerError> {
        Self::with_base_url(chain, chain.explorer_api_url(), api_key)
    }

    /// Create a client against a custom endpoint (self-hosted explorer, tests)
    pub fn with_base_url(
        chain: ChainId,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, ExplorerError> {
        let client = Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(ExplorerError::RequestFailed)?;

        Ok(Self {
            client,
            chain,
            base_url: base_url.into(),
            api_key,
        })
    }

    /// Create a client with the API key from the chain's environment variable
    pub fn from_env(chain: ChainId) -> Result<Self, ExplorerError> {
        let api_key = env::var(chain.api_key_env())
            .ok()
            .filter(|key| !key.trim().is_empty());

        if api_key.is_none() {
            debug!(
                "{} not set, querying {} without an API key",
                chain.api_key_env(),
                chain
            );
        }

        Self::new(chain, api_key)
    }

    pub fn chain(&self) -> ChainId {
        self.chain
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the first page of `address`'s transaction history
    ///
    /// # Errors
    /// * `ExplorerError::RequestFailed` - connection, timeout or body decode failure
    /// * `ExplorerError::InvalidResponse` - non-2xx status or unexpected envelope
    /// * `ExplorerError::Api` - explorer reported an error (bad key, rate limit)
    pub fn fetch_transactions(
        &self,
        address: &str,
        query: &TxListQuery,
    ) -> Result<Vec<RawTransaction>, ExplorerError> {
        let address = normalize_address(address);

        info!("Fetching {} transactions for {}", self.chain, address);

        let params = query.params(&address, self.api_key.as_deref());
        debug!(
            "{} txlist blocks {}..={} page size {}",
            self.base_url, query.start_block, query.end_block, query.page_size
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .map_err(ExplorerError::RequestFailed)?;

        // Check HTTP status
        let status = response.status();
        if !status.is_success() {
            return Err(ExplorerError::InvalidResponse(format!(
                "HTTP {}: {}",
                status,
                response.text().unwrap_or_default()
            )));
        }

        let body: ExplorerResponse = response.json().map_err(ExplorerError::RequestFailed)?;

        let transactions = parse_txlist_response(body)?;
        info!("{}: received {} transactions", self.chain, transactions.len());

        Ok(transactions)
    }
}

/// Interpret a `txlist` envelope
///
/// **Public** - separated from the HTTP call so it can be tested offline
pub fn parse_txlist_response(
    response: ExplorerResponse,
) -> Result<Vec<RawTransaction>, ExplorerError> {
    match response.status.as_str() {
        "1" => decode_transactions(&response.result).ok_or_else(|| {
            ExplorerError::InvalidResponse("result is not a transaction array".to_string())
        }),
        "0" if response.message == NO_TRANSACTIONS_MESSAGE => Ok(Vec::new()),
        "0" => Err(ExplorerError::Api {
            message: response.message,
            result: match response.result {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            },
        }),
        other => Err(ExplorerError::InvalidResponse(format!(
            "unexpected status {:?}",
            other
        ))),
    }
}

/// Normalize an address to lowercase with 0x prefix
pub fn normalize_address(address: &str) -> String {
    let address = address.trim().to_lowercase();
    if address.starts_with("0x") {
        address
    } else {
        format!("0x{}", address)
    }
}

/// True for `0x` followed by 40 hex characters
pub fn is_valid_address(address: &str) -> bool {
    address
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
