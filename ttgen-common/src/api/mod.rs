//! Backend API contract
//!
//! Wire types for the upload, course-listing, save-config and generation
//! endpoints.

pub mod types;

pub use types::{Course, CourseListing, DurationConstants, SaveConfigRequest, UploadResponse};
