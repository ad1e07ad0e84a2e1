//! Bucket transaction timestamps into calendar days for the heatmap.
//!
//! Date format: "YYYY-M-D" with a zero-indexed month and no padding,
//! which is what calendar heatmap widgets keyed on JS `Date` parts expect.
//!
//! Example: 2022-01-01T00:00:00Z becomes "2022-0-1".

use crate::parser::HeatmapEntry;
use chrono::{DateTime, Datelike, FixedOffset, Utc};
use indexmap::IndexSet;

/// Calendar day of `timestamp` in the zone given by `offset`
///
/// **Public** - used by the aggregator and by callers building date ranges
pub fn bucket_date(timestamp: DateTime<Utc>, offset: &FixedOffset) -> String {
    let local = timestamp.with_timezone(offset);
    format!("{}-{}-{}", local.year(), local.month0(), local.day())
}

/// Set of calendar days that remembers first-seen order
///
/// **Public** - collected by the aggregator in a single pass
#[derive(Debug, Clone, Default)]
pub struct DaySet(IndexSet<String>);

impl DaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a day; returns false if it was already present
    pub fn insert(&mut self, date: String) -> bool {
        self.0.insert(date)
    }

    /// Convert into heatmap entries, every day drawn with `weight`
    pub fn into_entries(self, weight: u32) -> Vec<HeatmapEntry> {
        self.0
            .into_iter()
            .map(|date| HeatmapEntry { date, count: weight })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Offset, TimeZone};

    #[test]
    fn test_bucket_date_uses_zero_indexed_month() {
        let ts = Utc.with_ymd_and_hms(2021, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(bucket_date(ts, &Utc.fix()), "2021-11-31");
    }

    #[test]
    fn test_bucket_date_respects_offset() {
        let ts = Utc.with_ymd_and_hms(2021, 12, 31, 23, 0, 0).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(bucket_date(ts, &plus_two), "2022-0-1");
    }

    #[test]
    fn test_day_set_keeps_first_seen_order() {
        let mut days = DaySet::new();
        assert!(days.insert("2021-5-3".to_string()));
        assert!(days.insert("2021-0-9".to_string()));
        assert!(!days.insert("2021-5-3".to_string()));

        let entries = days.into_entries(1);
        let dates: Vec<&str> = entries.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2021-5-3", "2021-0-9"]);
    }
}
