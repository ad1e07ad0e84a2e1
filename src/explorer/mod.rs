//! Block-explorer access for transaction histories.
//!
//! Each chain is fetched independently. A chain whose explorer fails is
//! reported as empty so one outage never blocks the other chains' reports.

pub mod client;
pub mod types;

pub use client::{is_valid_address, normalize_address, parse_txlist_response, ExplorerClient};
pub use types::{ExplorerResponse, TxListQuery};

use crate::aggregator::TransactionsByChain;
use crate::parser::{ChainId, RawTransaction};
use crate::utils::error::ExplorerError;
use log::{info, warn};
use std::thread;

/// Transactions of every requested chain after all fetches resolved
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub transactions: TransactionsByChain,

    /// Chains that failed and were substituted with an empty history
    pub failed_chains: Vec<ChainId>,
}

/// Build explorer clients for `chains`, keys read from the environment
pub fn clients_from_env(chains: &[ChainId]) -> Result<Vec<ExplorerClient>, ExplorerError> {
    chains.iter().map(|chain| ExplorerClient::from_env(*chain)).collect()
}

/// Fetch `address`'s history from every client concurrently
///
/// **Public** - main entry point for the network side
///
/// Returns once every fetch has succeeded or failed. Failures are logged and
/// turned into empty histories; they never fail the whole call.
pub fn fetch_all_chains(
    clients: &[ExplorerClient],
    address: &str,
    query: &TxListQuery,
) -> FetchOutcome {
    let address = normalize_address(address);

    let results: Vec<(ChainId, Result<Vec<RawTransaction>, ExplorerError>)> =
        thread::scope(|scope| {
            let handles: Vec<_> = clients
                .iter()
                .map(|client| {
                    let address = address.as_str();
                    let handle = scope.spawn(move || client.fetch_transactions(address, query));
                    (client.chain(), handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(chain, handle)| {
                    let result = handle.join().unwrap_or_else(|_| {
                        Err(ExplorerError::InvalidResponse(
                            "fetch thread panicked".to_string(),
                        ))
                    });
                    (chain, result)
                })
                .collect()
        });

    let mut transactions = TransactionsByChain::for_account(address);
    let mut failed_chains = Vec::new();

    for (chain, result) in results {
        match result {
            Ok(txs) => transactions.insert(chain, txs),
            Err(e) => {
                warn!("{}: fetch failed, reporting as empty: {}", chain, e);
                failed_chains.push(chain);
                transactions.insert(chain, Vec::new());
            }
        }
    }

    info!(
        "Fetched {} chains ({} failed)",
        clients.len(),
        failed_chains.len()
    );

    FetchOutcome {
        transactions,
        failed_chains,
    }
}
