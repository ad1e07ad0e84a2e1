//! Raw transaction records as returned by explorer `txlist` endpoints.
//!
//! Explorers return every numeric field as a decimal string, but hand-built
//! fixtures and other indexers use JSON numbers. Fields are therefore kept as
//! raw JSON values and validated lazily by the accessors: decoding a record
//! never fails because of what a field contains.

use bigdecimal::num_bigint::BigInt;
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// One transaction from an explorer API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Block time, Unix seconds
    #[serde(default, rename = "timeStamp", skip_serializing_if = "Option::is_none")]
    pub time_stamp: Option<Value>,

    /// Wei per gas unit
    #[serde(default, rename = "gasPrice", skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<Value>,

    /// Gas units consumed
    #[serde(default, rename = "gasUsed", skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<Value>,
}

impl RawTransaction {
    /// Build a record the way explorers return it (all fields as strings)
    pub fn new(
        time_stamp: i64,
        gas_price: &str,
        gas_used: &str,
        from: &str,
        to: &str,
    ) -> Self {
        Self {
            time_stamp: Some(Value::String(time_stamp.to_string())),
            gas_price: Some(Value::String(gas_price.to_string())),
            gas_used: Some(Value::String(gas_used.to_string())),
            from: Some(Value::String(from.to_string())),
            to: Some(Value::String(to.to_string())),
            hash: None,
        }
    }

    /// Unix seconds, if `timeStamp` is an integer or an integer string
    pub fn timestamp_secs(&self) -> Option<i64> {
        match self.time_stamp.as_ref()? {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Block time as a UTC instant; `None` when unparseable or out of range
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp_secs()?, 0)
    }

    pub fn gas_price(&self) -> Option<BigInt> {
        parse_amount(self.gas_price.as_ref()?)
    }

    pub fn gas_used(&self) -> Option<BigInt> {
        parse_amount(self.gas_used.as_ref()?)
    }

    /// `gasPrice × gasUsed` in wei; `None` if either factor is malformed
    pub fn fee_wei(&self) -> Option<BigInt> {
        Some(self.gas_price()? * self.gas_used()?)
    }

    pub fn from_address(&self) -> Option<&str> {
        address_field(self.from.as_ref())
    }

    pub fn to_address(&self) -> Option<&str> {
        address_field(self.to.as_ref())
    }
}

/// Decode an explorer `result` array
///
/// `null` decodes to an empty list. Items that are not transaction objects
/// become empty records so they are still counted as transactions.
/// Returns `None` when `value` is neither an array nor null.
pub fn decode_transactions(value: &Value) -> Option<Vec<RawTransaction>> {
    match value {
        Value::Null => Some(Vec::new()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| {
                    RawTransaction::deserialize(item).unwrap_or_else(|e| {
                        debug!("Undecodable transaction record kept as empty: {}", e);
                        RawTransaction::default()
                    })
                })
                .collect(),
        ),
        _ => None,
    }
}

/// Parse a whole, non-negative wei or gas amount
///
/// Strings must be plain decimal digits. Sign, fraction and exponent syntax
/// are malformed, which also keeps every amount at scale zero.
fn parse_amount(value: &Value) -> Option<BigInt> {
    match value {
        Value::String(s) => parse_digits(s.trim()),
        Value::Number(n) => match n.as_u64() {
            Some(whole) => Some(BigInt::from(whole)),
            None => n
                .as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .and_then(|f| parse_digits(&format!("{:.0}", f))),
        },
        _ => None,
    }
}

fn parse_digits(digits: &str) -> Option<BigInt> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    BigInt::from_str(digits).ok()
}

fn address_field(value: Option<&Value>) -> Option<&str> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_explorer_record() {
        let tx: RawTransaction = serde_json::from_value(json!({
            "blockNumber": "14000000",
            "timeStamp": "1640995200",
            "hash": "0xabc",
            "from": "0xaaa",
            "to": "0xbbb",
            "gasPrice": "20000000000",
            "gasUsed": "21000",
            "isError": "0"
        }))
        .unwrap();

        assert_eq!(tx.timestamp_secs(), Some(1_640_995_200));
        assert_eq!(tx.from_address(), Some("0xaaa"));
        assert_eq!(tx.to_address(), Some("0xbbb"));
        assert_eq!(
            tx.fee_wei(),
            Some(BigInt::from(420_000_000_000_000u64))
        );
    }

    #[test]
    fn test_numeric_fields_as_json_numbers() {
        let tx: RawTransaction = serde_json::from_value(json!({
            "timeStamp": 1640995200,
            "gasPrice": 1e10,
            "gasUsed": 21000
        }))
        .unwrap();

        assert_eq!(tx.timestamp_secs(), Some(1_640_995_200));
        assert_eq!(
            tx.fee_wei(),
            Some(BigInt::from(210_000_000_000_000u64))
        );
    }

    #[test]
    fn test_malformed_fields_decode_but_yield_none() {
        let tx: RawTransaction = serde_json::from_value(json!({
            "timeStamp": "yesterday",
            "gasPrice": "abc",
            "gasUsed": {"nested": true},
            "to": ""
        }))
        .unwrap();

        assert_eq!(tx.timestamp(), None);
        assert_eq!(tx.gas_price(), None);
        assert_eq!(tx.gas_used(), None);
        assert_eq!(tx.fee_wei(), None);
        assert_eq!(tx.to_address(), None);
    }

    #[test]
    fn test_negative_amount_is_malformed() {
        let tx = RawTransaction::new(0, "-5", "21000", "0xa", "0xb");
        assert_eq!(tx.fee_wei(), None);
    }

    #[test]
    fn test_non_integer_amounts_are_malformed() {
        for gas in ["1e-9223372036854775800", "1e18", "1.5", "+7", "0x10", "1_000"] {
            let tx = RawTransaction::new(0, gas, gas, "0xa", "0xb");
            assert_eq!(tx.gas_price(), None, "gas field {:?}", gas);
            assert_eq!(tx.fee_wei(), None, "gas field {:?}", gas);
        }

        let tx: RawTransaction = serde_json::from_value(json!({
            "gasPrice": 2.5,
            "gasUsed": -3
        }))
        .unwrap();
        assert_eq!(tx.gas_price(), None);
        assert_eq!(tx.gas_used(), None);
    }

    #[test]
    fn test_huge_integer_amount_is_exact() {
        let digits = "123456789012345678901234567890";
        let tx = RawTransaction::new(0, digits, "1", "0xa", "0xb");
        assert_eq!(tx.fee_wei(), Some(BigInt::from_str(digits).unwrap()));
    }

    #[test]
    fn test_decode_transactions_keeps_non_objects() {
        let txs = decode_transactions(&json!([{"timeStamp": "1"}, "garbage", 42])).unwrap();
        assert_eq!(txs.len(), 3);
        assert_eq!(txs[1], RawTransaction::default());

        assert_eq!(decode_transactions(&Value::Null), Some(Vec::new()));
        assert_eq!(decode_transactions(&json!("Max rate limit reached")), None);
    }
}
