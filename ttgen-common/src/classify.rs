//! Upload file classification
//!
//! Maps an uploaded file name to the backend upload it belongs to. Matching is
//! a case-insensitive substring test against [`PRECEDENCE`], checked in order;
//! the first token found wins. A name such as `room_batch.csv` is therefore a
//! [`UploadCategory::Room`] upload.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Kind of data file accepted by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadCategory {
    Room,
    Batch,
    /// Combined course list (`combined.csv`)
    Course,
    Reserved,
    Faculty,
    Elective,
}

/// Ordered `(token, category)` list used by [`classify`]
///
/// Order is the only tie-break between names containing several tokens.
pub const PRECEDENCE: [(&str, UploadCategory); 6] = [
    ("room", UploadCategory::Room),
    ("batch", UploadCategory::Batch),
    ("combined", UploadCategory::Course),
    ("reserved", UploadCategory::Reserved),
    ("faculty", UploadCategory::Faculty),
    ("elective", UploadCategory::Elective),
];

impl UploadCategory {
    /// All categories in precedence order
    pub fn all() -> impl Iterator<Item = UploadCategory> {
        PRECEDENCE.iter().map(|(_, category)| *category)
    }

    /// Backend path receiving this category's multipart upload
    pub fn endpoint(&self) -> &'static str {
        match self {
            UploadCategory::Course => "/upload",
            UploadCategory::Room => "/upload-rooms",
            UploadCategory::Batch => "/upload-batches",
            UploadCategory::Reserved => "/upload-reserved",
            UploadCategory::Faculty => "/upload-faculty",
            UploadCategory::Elective => "/upload-electives",
        }
    }

    /// Short name used on the command line and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadCategory::Room => "room",
            UploadCategory::Batch => "batch",
            UploadCategory::Course => "course",
            UploadCategory::Reserved => "reserved",
            UploadCategory::Faculty => "faculty",
            UploadCategory::Elective => "elective",
        }
    }

    /// Success message shown after an individual upload of this category
    pub fn success_message(&self) -> &'static str {
        match self {
            UploadCategory::Room => "Room data uploaded successfully",
            UploadCategory::Batch => "Batch data uploaded successfully",
            UploadCategory::Course => "Course data uploaded successfully",
            UploadCategory::Reserved => "Reserved slots uploaded successfully",
            UploadCategory::Faculty => "Faculty data uploaded successfully",
            UploadCategory::Elective => "Elective registrations uploaded successfully",
        }
    }
}

impl fmt::Display for UploadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UploadCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "room" | "rooms" => Ok(UploadCategory::Room),
            "batch" | "batches" => Ok(UploadCategory::Batch),
            "course" | "courses" | "combined" => Ok(UploadCategory::Course),
            "reserved" => Ok(UploadCategory::Reserved),
            "faculty" => Ok(UploadCategory::Faculty),
            "elective" | "electives" => Ok(UploadCategory::Elective),
            other => Err(Error::Config(format!("unknown upload category: {}", other))),
        }
    }
}

/// Classify a file name into its upload category
///
/// # Errors
/// [`Error::UnrecognizedFileName`] carrying the original name when no token
/// from [`PRECEDENCE`] occurs in it.
///
/// # Examples
///
/// ```
/// use ttgen_common::classify::{classify, UploadCategory};
///
/// assert_eq!(classify("Rooms_2024.csv").unwrap(), UploadCategory::Room);
/// assert_eq!(classify("combined.csv").unwrap(), UploadCategory::Course);
/// assert!(classify("notes.csv").is_err());
/// ```
pub fn classify(file_name: &str) -> Result<UploadCategory> {
    let lowered = file_name.to_lowercase();
    PRECEDENCE
        .iter()
        .find(|(token, _)| lowered.contains(token))
        .map(|(_, category)| *category)
        .ok_or_else(|| Error::UnrecognizedFileName(file_name.to_string()))
}
