//! Configuration and constants for the CLI.

use std::time::Duration;

/// Default timeout for explorer API requests
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// 10^18 wei = 1 native unit (ETH, MATIC)
pub const WEI_DECIMALS: i64 = 18;

// Explorer txlist query defaults. A single page is fetched; explorers cap
// `offset` at 10,000 records per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10_000;
pub const DEFAULT_START_BLOCK: u64 = 0;
pub const DEFAULT_END_BLOCK: u64 = 99_999_999;

/// Default heatmap weight for a day with activity
pub const DEFAULT_HEATMAP_WEIGHT: u32 = 1;

/// Widest real-world UTC offset, in hours, accepted for day bucketing
pub const MAX_UTC_OFFSET_HOURS: i32 = 14;

/// Message explorers return alongside `status: "0"` for an address with no history
pub const NO_TRANSACTIONS_MESSAGE: &str = "No transactions found";
