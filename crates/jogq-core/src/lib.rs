//! Filter query compiler for jogging and user records.
//!
//! This crate provides:
//! - [`filter`]: lexer, parser and evaluator for the `q` query language
//! - [`record`]: typed records built from JSON
//! - [`schema`]: field whitelists for the jog and user collections
//! - [`report`]: weekly distance and speed averages
//!
//! # Example
//!
//! ```
//! use jogq_core::filter::{compile, filter_records};
//! use jogq_core::{records_from_str, FieldWhitelist};
//!
//! let records = records_from_str(r#"[
//!     {"id": 1, "role": 3, "email": "runner@example.com"},
//!     {"id": 2, "role": 1, "email": "admin@example.com"}
//! ]"#).unwrap();
//!
//! let filter = compile("(role ne 3)", &FieldWhitelist::users()).unwrap();
//! let admins = filter_records(&filter, &records).unwrap();
//! assert_eq!(admins.len(), 1);
//! ```

pub mod filter;
pub mod record;
pub mod report;
pub mod schema;

pub use record::{records_from_json, records_from_str, Record, RecordError, Value};
pub use report::{ReportError, WeeklyReport};
pub use schema::FieldWhitelist;
