//! Recipient handlers: manual entry, CSV import, removal.

use tracing::info;

use super::Composer;
use crate::error::Result;
use crate::sources::{CsvAdapter, IMPORT_FAILED, parse_manual};
use crate::types::{CsvUpload, Event, NoticeLevel};

impl Composer {
    /// Extract addresses from free-form text and merge them
    ///
    /// Returns the number of net-new recipients. On `Ok` the presentation
    /// layer should clear its input field; on `Err` nothing was changed.
    pub fn on_add_manual(&mut self, text: &str) -> Result<usize> {
        let candidates = match parse_manual(text) {
            Ok(candidates) => candidates,
            Err(e) => {
                self.notice(NoticeLevel::Error, e.to_string());
                return Err(e.into());
            }
        };

        let added = self.session.recipients.add(candidates);
        self.notice(NoticeLevel::Success, format!("Added {} recipients", added));
        Ok(added)
    }

    /// Import recipients from a CSV file via the backend
    ///
    /// Non-CSV files are rejected without a network call. Any transport or
    /// backend failure is reported with one generic message. On success the
    /// file name is displayed until [`on_remove_csv_file`](Self::on_remove_csv_file).
    pub async fn on_csv_selected(&mut self, upload: CsvUpload) -> Result<usize> {
        if let Err(e) = CsvAdapter::check(&upload) {
            self.notice(NoticeLevel::Error, e.to_string());
            return Err(e.into());
        }

        self.loading(true, Some("Processing..."));
        let result = CsvAdapter::new(self.backend.as_ref()).import(&upload).await;
        self.loading(false, None);

        let candidates = match result {
            Ok(candidates) => candidates,
            Err(e) => {
                self.notice(NoticeLevel::Error, IMPORT_FAILED);
                return Err(e);
            }
        };

        let added = self.session.recipients.add(candidates);
        info!(file = %upload.file_name, added, "imported recipients from CSV");

        self.session.csv_file = Some(upload.file_name.clone());
        self.emit(Event::CsvFileShown {
            file_name: upload.file_name,
        });
        self.notice(
            NoticeLevel::Success,
            format!("Imported {} recipients from CSV", added),
        );
        Ok(added)
    }

    /// Hide the imported file; recipients it contributed stay in the set
    pub fn on_remove_csv_file(&mut self) {
        if self.session.csv_file.take().is_some() {
            self.emit(Event::CsvFileCleared);
        }
    }

    /// Remove one recipient
    pub fn on_remove_recipient(&mut self, email: &str) -> bool {
        self.session.recipients.remove(email)
    }

    /// Remove every recipient
    pub fn on_clear_recipients(&mut self) {
        self.session.recipients.clear();
    }
}
