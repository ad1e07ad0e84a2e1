//! Aggregation of per-chain transaction lists into heatmaps and report cards.
//!
//! This module transforms fetched transaction histories into:
//! - Calendar heatmap entries (one per distinct active day)
//! - Report cards (transaction count, fees, best friend)
//!
//! Aggregation is a pure function of its input. Malformed records never abort
//! it: they are still counted and are skipped only for the figures they
//! cannot contribute to.

pub mod heatmap;
pub mod report_card;

pub use heatmap::{bucket_date, DaySet};
pub use report_card::{counterparty, wei_to_native, CounterpartyTally};

use crate::parser::{
    decode_transactions, ChainId, ChainReport, Heatmap, HeatmapEntry, RawTransaction, ReportCard,
};
use crate::utils::config::DEFAULT_HEATMAP_WEIGHT;
use crate::utils::error::AggregateError;
use bigdecimal::num_bigint::BigInt;
use chrono::{FixedOffset, Offset, Utc};
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Aggregation settings
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    weights: BTreeMap<ChainId, u32>,
    utc_offset: FixedOffset,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            weights: BTreeMap::new(),
            utc_offset: Utc.fix(),
        }
    }
}

impl AggregatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heatmap weight for every active day on `chain`
    pub fn with_weight(mut self, chain: ChainId, weight: u32) -> Self {
        self.weights.insert(chain, weight);
        self
    }

    /// Zone whose calendar days bucket the heatmap (UTC by default)
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn weight(&self, chain: ChainId) -> u32 {
        self.weights
            .get(&chain)
            .copied()
            .unwrap_or(DEFAULT_HEATMAP_WEIGHT)
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }
}

/// Fetched transactions keyed by chain, plus the account they belong to
///
/// Chains never inserted read as empty.
#[derive(Debug, Clone, Default)]
pub struct TransactionsByChain {
    account: Option<String>,
    chains: HashMap<ChainId, Vec<RawTransaction>>,
}

impl TransactionsByChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transactions of `account`; enables direction-aware best friends
    pub fn for_account(account: impl Into<String>) -> Self {
        Self {
            account: Some(account.into()),
            chains: HashMap::new(),
        }
    }

    pub fn with_chain(mut self, chain: ChainId, transactions: Vec<RawTransaction>) -> Self {
        self.insert(chain, transactions);
        self
    }

    pub fn insert(&mut self, chain: ChainId, transactions: Vec<RawTransaction>) {
        self.chains.insert(chain, transactions);
    }

    pub fn get(&self, chain: ChainId) -> &[RawTransaction] {
        self.chains.get(&chain).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }
}

impl From<HashMap<ChainId, Vec<RawTransaction>>> for TransactionsByChain {
    fn from(chains: HashMap<ChainId, Vec<RawTransaction>>) -> Self {
        Self {
            account: None,
            chains,
        }
    }
}

/// Result of one aggregation call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    pub heatmap: Heatmap,
    pub report_card: ReportCard,
}

/// Aggregate every supported chain
///
/// **Public** - main entry point
///
/// # Returns
/// Heatmap entries and a report for all four chains; absent chains are empty
pub fn aggregate(input: &TransactionsByChain, config: &AggregatorConfig) -> Aggregation {
    let mut heatmap = Heatmap::new();
    let mut report_card = ReportCard::new();

    for chain in ChainId::ALL {
        let (entries, report) = aggregate_chain(chain, input.get(chain), input.account(), config);
        heatmap.insert(chain, entries);
        report_card.set(chain, report);
    }

    Aggregation {
        heatmap,
        report_card,
    }
}

/// Aggregate one chain in a single pass
///
/// # Algorithm
/// 1. Empty input yields no entries and a zero report
/// 2. For each transaction: bucket its day, count it, add its fee, tally
///    its counterparty
/// 3. Emit days in first-seen order with the chain's weight
pub fn aggregate_chain(
    chain: ChainId,
    transactions: &[RawTransaction],
    account: Option<&str>,
    config: &AggregatorConfig,
) -> (Vec<HeatmapEntry>, ChainReport) {
    if transactions.is_empty() {
        return (Vec::new(), ChainReport::default());
    }

    let offset = config.utc_offset();
    let mut days = DaySet::new();
    let mut fees_wei = BigInt::default();
    let mut tally = CounterpartyTally::new(account);
    let mut bad_timestamps = 0usize;
    let mut bad_fees = 0usize;

    for (index, tx) in transactions.iter().enumerate() {
        match tx.timestamp() {
            Some(ts) => {
                days.insert(bucket_date(ts, &offset));
            }
            None => {
                bad_timestamps += 1;
                debug!("{} tx #{}: invalid timeStamp {:?}", chain, index, tx.time_stamp);
            }
        }

        match tx.fee_wei() {
            Some(fee) => fees_wei += fee,
            None => {
                bad_fees += 1;
                debug!(
                    "{} tx #{}: malformed gasPrice {:?} / gasUsed {:?}",
                    chain, index, tx.gas_price, tx.gas_used
                );
            }
        }

        tally.record(tx);
    }

    if bad_timestamps > 0 || bad_fees > 0 {
        warn!(
            "{}: {} of {} transactions had an invalid timestamp, {} malformed fee fields",
            chain,
            bad_timestamps,
            transactions.len(),
            bad_fees
        );
    }

    let entries = days.into_entries(config.weight(chain));
    debug!(
        "{}: {} transactions over {} active days",
        chain,
        transactions.len(),
        entries.len()
    );

    let report = ChainReport {
        total_txs: transactions.len() as u64,
        fees: wei_to_native(fees_wei),
        best_friend: tally.into_best().unwrap_or_default(),
    };

    (entries, report)
}

/// Aggregate an untyped JSON mapping `{ "<chain>": [tx, ...] | null }`
///
/// # Errors
/// * `AggregateError::NotAMapping` - `input` is not a JSON object
///
/// Unknown chain keys are ignored; a value that is not an array is treated
/// as an empty chain.
pub fn aggregate_value(
    input: &Value,
    account: Option<&str>,
    config: &AggregatorConfig,
) -> Result<Aggregation, AggregateError> {
    let Value::Object(map) = input else {
        return Err(AggregateError::NotAMapping(json_kind(input)));
    };

    let mut transactions = match account {
        Some(account) => TransactionsByChain::for_account(account),
        None => TransactionsByChain::new(),
    };

    for (key, value) in map {
        let chain: ChainId = match key.parse() {
            Ok(chain) => chain,
            Err(e) => {
                warn!("Ignoring transactions: {}", e);
                continue;
            }
        };

        let txs = decode_transactions(value).unwrap_or_else(|| {
            warn!("{}: expected a transaction array, got {}", chain, json_kind(value));
            Vec::new()
        });
        transactions.insert(chain, txs);
    }

    Ok(aggregate(&transactions, config))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
