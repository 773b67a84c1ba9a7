//! Recipient source adapters.
//!
//! Each adapter turns one input channel into a candidate list that the
//! composer merges into the [`RecipientSet`](crate::RecipientSet):
//! - [`manual`] - free-form text, addresses extracted by pattern
//! - [`csv`] - CSV files, parsed by the backend

pub mod csv;
pub mod manual;

pub use csv::{CsvAdapter, IMPORT_FAILED};
pub use manual::{extract_emails, parse_manual};
