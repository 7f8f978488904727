//! ttgen client library
//!
//! Talks to the timetable server: classifies and uploads data files, fetches
//! the course listing for filtering, and drives timetable generation.

pub mod backend;
pub mod controller;
pub mod http;
pub mod orchestrator;
pub mod ui;

pub use backend::{TimetableBackend, UploadFile};
pub use controller::UploadController;
pub use http::HttpBackend;
pub use orchestrator::{BatchReport, BatchUploader};
