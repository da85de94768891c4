//! Output formatting utilities for the jogq CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by command:
//!
//! - [`records`] - Filtered record sets
//! - [`check`] - Compiled queries
//! - [`report`] - Weekly reports
//! - [`helpers`] - Common formatting utilities (truncation, values, dates)

mod check;
pub mod helpers;
mod records;
mod report;

pub use check::{format_check_json, format_check_table, CheckOutput};
pub use records::{format_records_json, format_records_table, format_summary, FilterOutput};
pub use report::{format_report_json, format_report_table};
