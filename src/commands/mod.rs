//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod report;
pub mod utils;

// Re-export main command functions
pub use report::{
    build_report, execute_report, parse_weight_arg, utc_offset_from_hours, validate_args,
    watch_reports, ReportArgs,
};
pub use utils::{display_schema, display_version, validate_report_file};
