//! # ttgen Common Library
//!
//! Shared code for the timetable upload client including:
//! - Upload file classification
//! - Semester label grouping and filter matching
//! - Course row filtering
//! - Backend request/response types
//! - Configuration loading

pub mod api;
pub mod classify;
pub mod config;
pub mod error;
pub mod filter;
pub mod semester;

pub use classify::{classify, UploadCategory};
pub use error::{Error, Result};
pub use filter::CourseFilter;
pub use semester::{group_semesters, matches, SemesterFilter, SemesterGroup};
