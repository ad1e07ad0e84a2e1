//! Transaction parsing and schema definitions.
//!
//! This module handles:
//! - Identifying supported chains
//! - Lenient decoding of explorer transaction records
//! - Defining output schema

pub mod chain;
pub mod schema;
pub mod transaction;

// Re-export main types
pub use chain::ChainId;
pub use schema::{ActivityReport, ChainReport, Heatmap, HeatmapEntry, ReportCard};
pub use transaction::{decode_transactions, RawTransaction};
