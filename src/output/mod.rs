//! Output writers for activity reports.
//!
//! This module handles:
//! - JSON reports (written to disk or stdout)
//! - Text report cards for the terminal

pub mod json;
pub mod summary;

// Re-export main functions
pub use json::{read_report, report_to_string, write_report};
pub use summary::{ellipse_address, render_report_card};
