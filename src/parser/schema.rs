//! Output JSON schema definitions for activity reports.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use super::chain::ChainId;
use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One calendar day with activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapEntry {
    /// `YYYY-M-D` with zero-indexed month (January is `0`)
    pub date: String,

    /// Weight drawn for the day
    pub count: u32,
}

/// Heatmap entries per chain, in first-seen day order
pub type Heatmap = BTreeMap<ChainId, Vec<HeatmapEntry>>;

/// Per-chain summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainReport {
    /// Number of transactions fetched, malformed ones included
    pub total_txs: u64,

    /// Fees paid, in the chain's native token
    pub fees: BigDecimal,

    /// Most frequent counterparty, empty when there is none
    pub best_friend: String,
}

impl Default for ChainReport {
    fn default() -> Self {
        Self {
            total_txs: 0,
            fees: BigDecimal::zero(),
            best_friend: String::new(),
        }
    }
}

/// Report card covering every supported chain
///
/// Always holds exactly one entry per [`ChainId`]; chains missing from a
/// deserialized file are filled with zero-valued reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<ChainId, ChainReport>",
    into = "BTreeMap<ChainId, ChainReport>"
)]
pub struct ReportCard {
    chains: BTreeMap<ChainId, ChainReport>,
}

impl ReportCard {
    /// Zero-valued report card
    pub fn new() -> Self {
        Self {
            chains: ChainId::ALL
                .into_iter()
                .map(|chain| (chain, ChainReport::default()))
                .collect(),
        }
    }

    pub fn get(&self, chain: ChainId) -> &ChainReport {
        // Populated for every chain by construction
        &self.chains[&chain]
    }

    pub fn set(&mut self, chain: ChainId, report: ChainReport) {
        self.chains.insert(chain, report);
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChainId, &ChainReport)> {
        self.chains.iter().map(|(chain, report)| (*chain, report))
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Transactions across all chains
    pub fn total_txs(&self) -> u64 {
        self.chains.values().map(|r| r.total_txs).sum()
    }

    /// Fees across all chains, summed per native token
    ///
    /// ETH and MATIC are kept apart: adding them would need a price feed.
    pub fn fees_by_token(&self) -> BTreeMap<&'static str, BigDecimal> {
        let mut totals: BTreeMap<&'static str, BigDecimal> = BTreeMap::new();
        for (chain, report) in &self.chains {
            *totals
                .entry(chain.native_symbol())
                .or_insert_with(BigDecimal::zero) += &report.fees;
        }
        totals
    }
}

impl Default for ReportCard {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BTreeMap<ChainId, ChainReport>> for ReportCard {
    fn from(chains: BTreeMap<ChainId, ChainReport>) -> Self {
        let mut card = ReportCard::new();
        for (chain, report) in chains {
            card.set(chain, report);
        }
        card
    }
}

impl From<ReportCard> for BTreeMap<ChainId, ChainReport> {
    fn from(card: ReportCard) -> Self {
        card.chains
    }
}

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Wallet the report was built for
    pub address: String,

    /// Timestamp when report was generated (RFC 3339)
    pub generated_at: String,

    #[serde(default)]
    pub heatmap: Heatmap,

    pub report_card: ReportCard,

    /// Chains whose explorer could not be reached; reported as empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_chains: Vec<ChainId>,
}

impl ActivityReport {
    /// Distinct active days on one chain
    pub fn active_days(&self, chain: ChainId) -> usize {
        self.heatmap.get(&chain).map_or(0, Vec::len)
    }
}
