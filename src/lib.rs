//! Git Eth Transactions
//!
//! Git-style activity heatmaps and report cards for EVM wallets.
//!
//! The crate fetches a wallet's transaction history from the Ethereum,
//! Polygon, Arbitrum and Optimism block explorers and aggregates it into:
//! - a calendar heatmap dataset per chain (one entry per active day)
//! - a report card per chain (transaction count, fees, best friend)
//!
//! ## Getting Started
//!
//! ```bash
//! export ETHERSCAN_API_KEY=...
//! git-eth-txs report --address 0x... --summary
//! ```
//!
//! The aggregation is available on its own through [`aggregator::aggregate`]
//! for callers that already hold the transaction lists.

pub mod aggregator;
pub mod commands;
pub mod explorer;
pub mod output;
pub mod parser;
pub mod utils;
pub mod wallet;
