//! Report-card metrics: fee totals and the "best friend" counterparty.
//!
//! Both are accumulated during the aggregator's single pass over a chain.

use crate::parser::RawTransaction;
use crate::utils::config::WEI_DECIMALS;
use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;
use std::collections::HashMap;

/// Convert a whole wei amount to native-token units (÷ 10^18), exactly
pub fn wei_to_native(wei: BigInt) -> BigDecimal {
    BigDecimal::new(wei, WEI_DECIMALS).normalized()
}

/// The address on the other side of `tx`, lowercased
///
/// With a known `account` this is `to` when the account sent the transaction,
/// otherwise `from`. Without one, `to` is used. Self-transfers and contract
/// creations (no `to`) have no counterparty.
pub fn counterparty(tx: &RawTransaction, account: Option<&str>) -> Option<String> {
    let from = tx.from_address().map(str::to_lowercase);
    let to = tx.to_address().map(str::to_lowercase);

    let Some(account) = account.map(str::to_lowercase) else {
        return to;
    };

    let other = if from.as_deref() == Some(account.as_str()) {
        to
    } else {
        from
    }?;

    (other != account).then_some(other)
}

/// Running counterparty frequencies with the current leader
///
/// **Public** - fed one transaction at a time by the aggregator
///
/// The leader only changes when another address strictly exceeds its count,
/// so ties go to whichever address reached the maximum first.
#[derive(Debug, Clone, Default)]
pub struct CounterpartyTally {
    account: Option<String>,
    counts: HashMap<String, u64>,
    best: Option<(String, u64)>,
}

impl CounterpartyTally {
    pub fn new(account: Option<&str>) -> Self {
        Self {
            account: account.map(str::to_lowercase),
            ..Self::default()
        }
    }

    pub fn record(&mut self, tx: &RawTransaction) {
        let Some(address) = counterparty(tx, self.account.as_deref()) else {
            return;
        };

        let count = self.counts.entry(address.clone()).or_insert(0);
        *count += 1;

        let leads = self.best.as_ref().map_or(true, |(_, best)| *count > *best);
        if leads {
            self.best = Some((address, *count));
        }
    }

    pub fn into_best(self) -> Option<String> {
        self.best.map(|(address, _)| address)
    }
}
