//! Course table row filter
//!
//! A row is shown when it passes both the department selection (exact, empty
//! means all) and the semester selection (see [`SemesterFilter`]).

use crate::api::Course;
use crate::semester::SemesterFilter;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    pub department: Option<String>,
    pub semester: SemesterFilter,
}

impl CourseFilter {
    /// Build a filter from raw selection values (empty string = no filter)
    pub fn new(department: &str, semester: &str) -> Self {
        Self {
            department: (!department.is_empty()).then(|| department.to_string()),
            semester: SemesterFilter::parse(semester),
        }
    }

    pub fn matches(&self, course: &Course) -> bool {
        let dept_match = self
            .department
            .as_deref()
            .map_or(true, |d| course.department == d);
        dept_match && self.semester.matches(&course.semester)
    }

    /// Rows passing the filter, in listing order
    pub fn apply<'a>(&self, courses: &'a [Course]) -> Vec<&'a Course> {
        courses.iter().filter(|c| self.matches(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(department: &str, semester: &str, code: &str) -> Course {
        Course {
            department: department.to_string(),
            semester: semester.to_string(),
            code: code.to_string(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Course> {
        vec![
            course("CSE", "3", "CS301"),
            course("CSE", "3A", "CS302"),
            course("ECE", "3B", "EC303"),
            course("CSE", "30", "CS999"),
            course("ECE", "5", "EC501"),
        ]
    }

    fn codes(rows: Vec<&Course>) -> Vec<&str> {
        rows.into_iter().map(|c| c.code.as_str()).collect()
    }

    #[test]
    fn test_no_filter_shows_all() {
        let courses = sample();
        assert_eq!(CourseFilter::default().apply(&courses).len(), 5);
        assert_eq!(CourseFilter::new("", "").apply(&courses).len(), 5);
    }

    #[test]
    fn test_department_and_semester_combine() {
        let courses = sample();
        let rows = CourseFilter::new("CSE", "3").apply(&courses);
        assert_eq!(codes(rows), vec!["CS301", "CS302", "CS999"]);

        let rows = CourseFilter::new("ECE", "3").apply(&courses);
        assert_eq!(codes(rows), vec!["EC303"]);
    }

    #[test]
    fn test_exact_section() {
        let courses = sample();
        let rows = CourseFilter::new("", "3A").apply(&courses);
        assert_eq!(codes(rows), vec!["CS302"]);
    }
}
