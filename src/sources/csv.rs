//! CSV recipient import.
//!
//! Parsing happens on the backend; this side only checks that the
//! selected file is CSV and forwards it.

use tracing::warn;

use crate::backend::Backend;
use crate::error::{Result, ValidationError};
use crate::types::CsvUpload;

/// Message shown for any failed import (transport or backend)
pub const IMPORT_FAILED: &str = "Failed to parse CSV";

/// CSV import through the backend's `parse-csv` endpoint
pub struct CsvAdapter<'a> {
    backend: &'a dyn Backend,
}

impl<'a> CsvAdapter<'a> {
    /// Create an adapter over `backend`
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }

    /// Reject files whose declared type and extension both say "not CSV"
    pub fn check(upload: &CsvUpload) -> std::result::Result<(), ValidationError> {
        if upload.is_csv() {
            Ok(())
        } else {
            Err(ValidationError::NotCsv)
        }
    }

    /// Check `upload` locally, then have the backend parse it
    ///
    /// A non-CSV file fails without a network call.
    pub async fn import(&self, upload: &CsvUpload) -> Result<Vec<String>> {
        Self::check(upload)?;

        match self.backend.parse_csv(upload).await {
            Ok(recipients) => Ok(recipients),
            Err(e) => {
                warn!(
                    file = %upload.file_name,
                    backend = self.backend.name(),
                    error = %e,
                    "CSV import failed"
                );
                Err(e)
            }
        }
    }
}
