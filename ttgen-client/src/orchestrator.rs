//! Bulk upload orchestration
//!
//! A batch is all-or-nothing from the caller's point of view:
//! 1. Every file must carry the `.csv` suffix, checked before anything is sent
//! 2. Each file is classified; recognized files are uploaded concurrently
//! 3. The batch waits for every upload to settle, then reports one outcome
//!
//! A failed upload never cancels its siblings. When several files fail, the
//! reported reason is the first unrecognized file name if there is one (those
//! fail before any request could answer), otherwise the first failed upload in
//! input order. A deadline or cancellation token drops whatever is still in
//! flight.

use crate::backend::{TimetableBackend, UploadFile};
use futures::future::join_all;
use std::future::pending;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use ttgen_common::{classify, Error, Result, UploadCategory};

const CSV_EXTENSION: &str = ".csv";

/// Result for one file of a batch
#[derive(Debug)]
pub struct FileOutcome {
    pub file: String,
    pub result: Result<UploadCategory>,
}

/// Per-file outcomes of a settled batch, in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Collapse the report into the batch's single outcome
    pub fn into_result(self) -> Result<()> {
        let mut first_upload_error = None;
        for outcome in self.outcomes {
            match outcome.result {
                Ok(_) => {}
                Err(e @ Error::UnrecognizedFileName(_)) => return Err(e),
                Err(e) => {
                    if first_upload_error.is_none() {
                        first_upload_error = Some(e);
                    }
                }
            }
        }
        first_upload_error.map_or(Ok(()), Err)
    }
}

/// Concurrent uploader over a [`TimetableBackend`]
pub struct BatchUploader<B: ?Sized> {
    backend: Arc<B>,
    timeout: Option<Duration>,
}

impl<B: TimetableBackend + ?Sized> BatchUploader<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            timeout: None,
        }
    }

    /// Bound the whole batch; `None` waits for every request indefinitely
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Upload every file, succeeding only if all uploads succeed
    pub async fn upload_all(&self, files: &[UploadFile]) -> Result<()> {
        self.upload_all_with_cancel(files, &CancellationToken::new())
            .await
    }

    /// [`Self::upload_all`] with an external cancellation token
    pub async fn upload_all_with_cancel(
        &self,
        files: &[UploadFile],
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.upload_all_detailed(files, cancel).await?.into_result()
    }

    /// Run the batch and return every per-file outcome
    ///
    /// # Errors
    /// Only batch-level failures: [`Error::InvalidFileType`] before any upload,
    /// [`Error::Timeout`] or [`Error::Cancelled`] while waiting.
    pub async fn upload_all_detailed(
        &self,
        files: &[UploadFile],
        cancel: &CancellationToken,
    ) -> Result<BatchReport> {
        if !files.iter().all(|f| f.has_extension(CSV_EXTENSION)) {
            return Err(Error::InvalidFileType(
                "Please upload only CSV files".to_string(),
            ));
        }

        info!(files = files.len(), "Starting bulk upload");

        let uploads = files.iter().map(|file| async move {
            let result = match classify(&file.name) {
                Ok(category) => self
                    .backend
                    .upload(category, file)
                    .await
                    .map(|()| category),
                Err(e) => Err(e),
            };

            match &result {
                Ok(category) => info!(file = %file.name, category = %category, "Upload succeeded"),
                Err(e) => warn!(file = %file.name, error = %e, "Upload failed"),
            }

            FileOutcome {
                file: file.name.clone(),
                result,
            }
        });

        let deadline = async {
            match self.timeout {
                Some(limit) => {
                    tokio::time::sleep(limit).await;
                    limit
                }
                None => pending().await,
            }
        };

        // A batch that has settled is reported as settled even if the token
        // or the deadline fired in the same poll
        tokio::select! {
            biased;
            outcomes = join_all(uploads) => {
                let report = BatchReport { outcomes };
                info!(
                    succeeded = report.succeeded(),
                    failed = report.failed(),
                    "Bulk upload settled"
                );
                Ok(report)
            }
            _ = cancel.cancelled() => {
                warn!("Bulk upload cancelled");
                Err(Error::Cancelled)
            }
            limit = deadline => {
                warn!(timeout = ?limit, "Bulk upload timed out");
                Err(Error::Timeout(limit))
            }
        }
    }

    /// Upload a single file to an explicit category
    ///
    /// Course uploads must be `.csv`; other categories are sent as-is.
    pub async fn upload_one(&self, category: UploadCategory, file: &UploadFile) -> Result<()> {
        if category == UploadCategory::Course && !file.has_extension(CSV_EXTENSION) {
            return Err(Error::InvalidFileType(
                "Please upload a CSV file".to_string(),
            ));
        }
        self.backend.upload(category, file).await?;
        info!(file = %file.name, category = %category, "Upload succeeded");
        Ok(())
    }
}
