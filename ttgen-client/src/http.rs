//! HTTP client for the timetable server
//!
//! Uploads are multipart bodies with a single `file` field. The server answers
//! every upload with `{success, error?}` JSON; anything else (non-JSON body,
//! `success: false`) is a rejected upload.

use crate::backend::{TimetableBackend, UploadFile};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, info};
use ttgen_common::api::{CourseListing, DurationConstants, SaveConfigRequest, UploadResponse};
use ttgen_common::{Error, Result, UploadCategory};

const USER_AGENT: &str = concat!("ttgen/", env!("CARGO_PKG_VERSION"));

const COURSE_LISTING_PATH: &str = "/";
const SAVE_CONFIG_PATH: &str = "/save-config";
const GENERATE_PATH: &str = "/generate";
const DEPT_TIMETABLES_PATH: &str = "/upload-dept-timetables";
const FACULTY_TIMETABLE_PATH: &str = "/generate-faculty-timetable";

const ZIP_MIME: &str = "application/zip";
const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// reqwest-backed [`TimetableBackend`]
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http_client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpBackend {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(self.timeout)
        } else {
            Error::Network(e.to_string())
        }
    }

    /// Read an `{success, error?}` body, mapping anything else to a rejection
    async fn read_status_body(&self, response: reqwest::Response, path: &str) -> Result<()> {
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        let parsed: UploadResponse = serde_json::from_str(&body).map_err(|e| {
            Error::UploadRejected(format!(
                "Malformed response from {} (HTTP {}): {}",
                path,
                status.as_u16(),
                e
            ))
        })?;

        if parsed.success {
            Ok(())
        } else {
            Err(Error::UploadRejected(parsed.reason()))
        }
    }

    /// Fetch a binary download, requiring the expected content type
    ///
    /// The server redirects to an HTML page when generation fails, so any other
    /// content type is a rejection.
    async fn read_download(
        &self,
        response: reqwest::Response,
        expected_mime: &str,
        what: &str,
    ) -> Result<Vec<u8>> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if !status.is_success() || !content_type.starts_with(expected_mime) {
            return Err(Error::UploadRejected(format!(
                "Failed to generate {} (HTTP {}, {})",
                what,
                status.as_u16(),
                if content_type.is_empty() { "no content type" } else { content_type.as_str() }
            )));
        }

        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        Ok(bytes.to_vec())
    }

    /// Upload exported department timetables (`.xlsx`) for faculty views
    ///
    /// Files without the `.xlsx` suffix are skipped, matching the server which
    /// ignores them. Returns the number of files sent.
    pub async fn upload_department_timetables(&self, files: &[UploadFile]) -> Result<usize> {
        let mut form = Form::new();
        let mut sent = 0;
        for file in files {
            if !file.has_extension(".xlsx") {
                debug!(file = %file.name, "Skipping non-xlsx department timetable");
                continue;
            }
            let part = Part::bytes(file.contents.clone())
                .file_name(file.name.clone())
                .mime_str(XLSX_MIME)
                .map_err(|e| self.transport_error(e))?;
            form = form.part("files[]", part);
            sent += 1;
        }

        if sent == 0 {
            return Err(Error::InvalidFileType(
                "Please upload at least one .xlsx timetable".to_string(),
            ));
        }

        let response = self
            .http_client
            .post(self.url(DEPT_TIMETABLES_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.read_status_body(response, DEPT_TIMETABLES_PATH).await?;
        info!(files = sent, "Department timetables uploaded");
        Ok(sent)
    }

    /// Download one faculty member's timetable workbook
    pub async fn faculty_timetable(&self, faculty_name: &str) -> Result<Vec<u8>> {
        let name = faculty_name.trim();
        if name.is_empty() {
            return Err(Error::UploadRejected("No faculty selected".to_string()));
        }

        let mut url = reqwest::Url::parse(&self.url(FACULTY_TIMETABLE_PATH))
            .map_err(|e| Error::Config(format!("Invalid server URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Invalid server URL: {}", self.base_url)))?
            .push(name);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.read_download(response, XLSX_MIME, "faculty timetable").await
    }
}

#[async_trait]
impl TimetableBackend for HttpBackend {
    async fn upload(&self, category: UploadCategory, file: &UploadFile) -> Result<()> {
        let path = category.endpoint();
        debug!(file = %file.name, category = %category, path, "Uploading file");

        let part = Part::bytes(file.contents.clone())
            .file_name(file.name.clone())
            .mime_str("text/csv")
            .map_err(|e| self.transport_error(e))?;
        let form = Form::new().part("file", part);

        let response = self
            .http_client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.read_status_body(response, path).await
    }

    async fn fetch_courses(&self) -> Result<CourseListing> {
        let response = self
            .http_client
            .get(self.url(COURSE_LISTING_PATH))
            .query(&[("fetch_courses", "true")])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Network(format!(
                "Course listing returned HTTP {}",
                status.as_u16()
            )));
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_str(&body)
            .map_err(|e| Error::UploadRejected(format!("Malformed course listing: {}", e)))
    }

    async fn save_config(&self, durations: &DurationConstants) -> Result<()> {
        let request = SaveConfigRequest {
            duration_constants: *durations,
        };
        let response = self
            .http_client
            .post(self.url(SAVE_CONFIG_PATH))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::ConfigSave(self.transport_error(e).to_string()))?;

        self.read_status_body(response, SAVE_CONFIG_PATH)
            .await
            .map_err(|e| match e {
                Error::UploadRejected(reason) => Error::ConfigSave(reason),
                other => Error::ConfigSave(other.to_string()),
            })
    }

    async fn generate(&self, durations: &DurationConstants) -> Result<Vec<u8>> {
        let response = self
            .http_client
            .post(self.url(GENERATE_PATH))
            .form(&durations.form_fields())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.read_download(response, ZIP_MIME, "timetables").await
    }
}
