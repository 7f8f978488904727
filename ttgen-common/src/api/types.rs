//! Backend request/response types
//!
//! The backend serializes course rows straight from its CSV store, so cell
//! values arrive as strings, numbers or null depending on the column. Every
//! cell is decoded into a `String` (null and missing become empty).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ========================================
// Upload responses
// ========================================

/// Body returned by every upload and by the save-config endpoint
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,

    /// Server-side reason when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResponse {
    /// Failure reason, falling back to a generic message
    pub fn reason(&self) -> String {
        self.error
            .clone()
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| "Upload failed".to_string())
    }
}

// ========================================
// Course listing
// ========================================

/// One row of the course table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Course {
    #[serde(rename = "Department", default, deserialize_with = "stringish")]
    pub department: String,

    #[serde(rename = "Semester", default, deserialize_with = "stringish")]
    pub semester: String,

    #[serde(rename = "Course Code", default, deserialize_with = "stringish")]
    pub code: String,

    #[serde(rename = "Course Name", default, deserialize_with = "stringish")]
    pub name: String,

    #[serde(rename = "Faculty", default, deserialize_with = "stringish")]
    pub faculty: String,

    /// Lecture hours
    #[serde(rename = "L", default, deserialize_with = "stringish")]
    pub lecture: String,

    /// Tutorial hours
    #[serde(rename = "T", default, deserialize_with = "stringish")]
    pub tutorial: String,

    /// Practical hours
    #[serde(rename = "P", default, deserialize_with = "stringish")]
    pub practical: String,

    #[serde(rename = "Classroom", default, deserialize_with = "stringish")]
    pub classroom: String,
}

/// Response of the course-listing endpoint
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CourseListing {
    #[serde(default)]
    pub courses: Vec<Course>,

    #[serde(default, deserialize_with = "stringish_vec")]
    pub departments: Vec<String>,

    #[serde(default, deserialize_with = "stringish_vec")]
    pub semesters: Vec<String>,
}

// ========================================
// Generation settings
// ========================================

/// Slot counts (30-minute units) used by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DurationConstants {
    pub lecture_duration: u32,
    pub lab_duration: u32,
    pub tutorial_duration: u32,
    pub self_study_duration: u32,
    pub break_duration: u32,
    /// Slots per hour
    pub hour_slots: u32,
}

impl Default for DurationConstants {
    fn default() -> Self {
        Self {
            lecture_duration: 3,
            lab_duration: 4,
            tutorial_duration: 2,
            self_study_duration: 2,
            break_duration: 1,
            hour_slots: 2,
        }
    }
}

impl DurationConstants {
    /// Form fields submitted with a generation request
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("lecture_duration", self.lecture_duration.to_string()),
            ("lab_duration", self.lab_duration.to_string()),
            ("tutorial_duration", self.tutorial_duration.to_string()),
            ("self_study_duration", self.self_study_duration.to_string()),
            ("break_duration", self.break_duration.to_string()),
            ("hour_slots", self.hour_slots.to_string()),
        ]
    }
}

/// Body of the save-config request
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SaveConfigRequest {
    pub duration_constants: DurationConstants,
}

// ========================================
// Lenient cell decoding
// ========================================

fn value_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn stringish<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(value_to_string)
}

fn stringish_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .map(value_to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_listing_with_mixed_cell_types() {
        let body = json!({
            "courses": [{
                "Department": "CSE",
                "Semester": 3,
                "Course Code": "CS301",
                "Course Name": "Operating Systems",
                "Faculty": "Dr. Rao",
                "L": 3, "T": 1, "P": 2,
                "Classroom": null
            }],
            "departments": ["CSE", "ECE"],
            "semesters": [1, 3, "5A"]
        });
        let listing: CourseListing = serde_json::from_value(body).unwrap();
        let course = &listing.courses[0];
        assert_eq!(course.semester, "3");
        assert_eq!(course.lecture, "3");
        assert_eq!(course.classroom, "");
        assert_eq!(listing.semesters, vec!["1", "3", "5A"]);
    }

    #[test]
    fn test_missing_columns_default_empty() {
        let course: Course = serde_json::from_value(json!({"Department": "ME"})).unwrap();
        assert_eq!(course.department, "ME");
        assert_eq!(course.faculty, "");

        let listing: CourseListing = serde_json::from_value(json!({})).unwrap();
        assert!(listing.courses.is_empty());
        assert!(listing.semesters.is_empty());
    }

    #[test]
    fn test_upload_response_reason() {
        let ok: UploadResponse = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(ok.success);

        let bad: UploadResponse =
            serde_json::from_value(json!({"success": false, "error": "Invalid file"})).unwrap();
        assert_eq!(bad.reason(), "Invalid file");

        let bare: UploadResponse = serde_json::from_value(json!({"success": false})).unwrap();
        assert_eq!(bare.reason(), "Upload failed");
    }

    #[test]
    fn test_save_config_body_shape() {
        let body = serde_json::to_value(SaveConfigRequest {
            duration_constants: DurationConstants::default(),
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"duration_constants": {
                "lecture_duration": 3,
                "lab_duration": 4,
                "tutorial_duration": 2,
                "self_study_duration": 2,
                "break_duration": 1,
                "hour_slots": 2
            }})
        );
    }
}
