//! Upload controller
//!
//! Glue between user actions and the backend: drives the upload trigger,
//! runs batches through [`BatchUploader`], refreshes the course view after a
//! successful upload and reports every outcome as one notification.

use crate::backend::{TimetableBackend, UploadFile};
use crate::orchestrator::BatchUploader;
use crate::ui::{ButtonState, Notice, UiPort, UploadTrigger};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use ttgen_common::api::{CourseListing, DurationConstants};
use ttgen_common::semester::{department_options, group_semesters, semester_options};
use ttgen_common::{CourseFilter, Error, Result, UploadCategory};

pub struct UploadController<B: ?Sized, U: ?Sized> {
    backend: Arc<B>,
    uploader: BatchUploader<B>,
    ui: Arc<U>,
    trigger: UploadTrigger,
    filter: CourseFilter,
    listing: Option<CourseListing>,
}

impl<B, U> UploadController<B, U>
where
    B: TimetableBackend + ?Sized,
    U: UiPort + ?Sized,
{
    pub fn new(backend: Arc<B>, ui: Arc<U>) -> Self {
        Self {
            uploader: BatchUploader::new(backend.clone()),
            backend,
            ui,
            trigger: UploadTrigger::default(),
            filter: CourseFilter::default(),
            listing: None,
        }
    }

    /// Deadline for bulk uploads
    pub fn with_batch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.uploader = self.uploader.with_timeout(timeout);
        self
    }

    /// Start from an initial filter selection
    pub fn with_filter(mut self, filter: CourseFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn button_state(&self) -> ButtonState {
        self.trigger.state()
    }

    pub fn listing(&self) -> Option<&CourseListing> {
        self.listing.as_ref()
    }

    /// Upload a set of files as one all-or-nothing batch
    pub async fn upload_all(&mut self, files: &[UploadFile]) -> Result<()> {
        self.upload_all_with_cancel(files, &CancellationToken::new())
            .await
    }

    /// [`Self::upload_all`] aborted when `cancel` fires
    ///
    /// The token belongs to this batch only; later batches are unaffected.
    pub async fn upload_all_with_cancel(
        &mut self,
        files: &[UploadFile],
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.start();

        let result = self.uploader.upload_all_with_cancel(files, cancel).await;

        match &result {
            Ok(()) => {
                self.refresh_after_upload().await;
                self.ui
                    .notify(&Notice::Success("All files uploaded successfully".to_string()));
            }
            Err(e) => self.ui.notify(&failure_notice(e)),
        }

        self.settle(result.is_ok());
        result
    }

    /// Upload one file to an explicit category
    ///
    /// A successful course upload refreshes the course view.
    pub async fn upload_one(&mut self, category: UploadCategory, file: &UploadFile) -> Result<()> {
        self.start();

        let result = self.uploader.upload_one(category, file).await;

        match &result {
            Ok(()) => {
                if category == UploadCategory::Course {
                    self.refresh_after_upload().await;
                }
                self.ui
                    .notify(&Notice::Success(category.success_message().to_string()));
            }
            Err(e) => self.ui.notify(&failure_notice(e)),
        }

        self.settle(result.is_ok());
        result
    }

    // `&mut self` keeps uploads on one controller from overlapping, and
    // `settle` always returns the trigger to Idle
    fn start(&mut self) {
        self.trigger.begin();
        self.ui.set_button_state(self.trigger.state());
    }

    fn settle(&mut self, success: bool) {
        let state = self.trigger.finish(success);
        self.ui.set_button_state(state);
        let state = self.trigger.reset();
        self.ui.set_button_state(state);
    }

    /// Refresh failures do not change the outcome of the upload itself
    async fn refresh_after_upload(&mut self) {
        if let Err(e) = self.refresh_view().await {
            warn!(error = %e, "Failed to refresh course view after upload");
        }
    }

    /// Fetch the course listing and re-render table and filter options
    pub async fn refresh_view(&mut self) -> Result<()> {
        let listing = self.backend.fetch_courses().await?;
        let groups = group_semesters(&listing.semesters)?;

        self.ui.render_table(&self.filter.apply(&listing.courses));
        self.ui.render_filters(
            &department_options(&listing.departments),
            &semester_options(&groups),
        );

        info!(
            courses = listing.courses.len(),
            departments = listing.departments.len(),
            semesters = listing.semesters.len(),
            "Course view refreshed"
        );
        self.listing = Some(listing);
        Ok(())
    }

    /// Change the filter and re-render the last fetched rows
    pub fn apply_filter(&mut self, filter: CourseFilter) {
        self.filter = filter;
        if let Some(listing) = &self.listing {
            self.ui.render_table(&self.filter.apply(&listing.courses));
        }
    }

    /// Save duration settings, generate all timetables and write the archive
    pub async fn generate(&mut self, durations: &DurationConstants, output: &Path) -> Result<()> {
        let result = self.try_generate(durations, output).await;
        match &result {
            Ok(()) => self.ui.notify(&Notice::Success(format!(
                "Timetables saved to {}",
                output.display()
            ))),
            Err(e) => self.ui.notify(&Notice::Failure(e.to_string())),
        }
        result
    }

    async fn try_generate(&self, durations: &DurationConstants, output: &Path) -> Result<()> {
        self.backend.save_config(durations).await?;
        info!(?durations, "Duration settings saved");

        let archive = self.backend.generate(durations).await?;
        tokio::fs::write(output, &archive).await?;
        info!(path = %output.display(), bytes = archive.len(), "Timetable archive written");
        Ok(())
    }
}

/// Local file type checks are shown as-is, everything else as an upload failure
fn failure_notice(error: &Error) -> Notice {
    match error {
        Error::InvalidFileType(message) => Notice::Failure(message.clone()),
        e => Notice::Failure(format!("Upload failed: {}", e)),
    }
}
