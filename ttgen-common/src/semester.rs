//! Semester label grouping and filter matching
//!
//! A semester label is a semester number with an optional section letter
//! (`"3"`, `"3A"`). Labels feed two things:
//! - the semester filter options, grouped by number with each group followed
//!   by its sections
//! - the row predicate deciding whether a course row passes the selected filter

use crate::{Error, Result};
use std::cmp::Ordering;
use std::collections::HashMap;

/// One section sub-option of a semester group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionEntry {
    /// Original label, used as the filter value (e.g. "3A")
    pub value: String,
    /// Section letters (e.g. "A")
    pub section: String,
}

/// All labels sharing one semester number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemesterGroup {
    /// Numeric part as written in the label
    pub number: String,
    /// Sections in encounter order, duplicates kept
    pub sections: Vec<SectionEntry>,
}

/// Dropdown-style option produced from groups or departments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    /// Value fed back into [`SemesterFilter::parse`] (empty = all)
    pub value: String,
    /// Text shown to the user
    pub label: String,
    /// Nesting level, 1 for section entries
    pub depth: u8,
}

/// Split a label into its semester number and optional section
///
/// Both parts are searched over the whole label: the number is the first run of
/// ASCII digits, the section the first run of ASCII letters, wherever they occur.
///
/// # Errors
/// [`Error::InvalidSemesterLabel`] when the label contains no digit.
///
/// # Examples
///
/// ```
/// use ttgen_common::semester::split_label;
///
/// assert_eq!(split_label("3A").unwrap(), ("3", Some("A")));
/// assert_eq!(split_label("Sem-12").unwrap(), ("12", Some("Sem")));
/// assert_eq!(split_label("4").unwrap(), ("4", None));
/// ```
pub fn split_label(label: &str) -> Result<(&str, Option<&str>)> {
    let number = first_run(label, |c| c.is_ascii_digit())
        .ok_or_else(|| Error::InvalidSemesterLabel(label.to_string()))?;
    let section = first_run(label, |c| c.is_ascii_alphabetic());
    Ok((number, section))
}

fn first_run(s: &str, pred: impl Fn(char) -> bool) -> Option<&str> {
    let start = s.find(|c: char| pred(c))?;
    let rest = &s[start..];
    let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
    Some(&rest[..len])
}

/// Compare two digit strings by numeric value without overflow
fn cmp_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Group labels by semester number
///
/// Single left-to-right pass. A label without a section still creates its
/// group but adds no section entry. Groups come back sorted by numeric value;
/// groups with equal value (`"03"`, `"3"`) keep encounter order.
///
/// # Errors
/// Fails on the first label without a digit.
pub fn group_semesters<S: AsRef<str>>(labels: &[S]) -> Result<Vec<SemesterGroup>> {
    let mut groups: Vec<SemesterGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for label in labels {
        let label = label.as_ref();
        let (number, section) = split_label(label)?;

        let slot = match index.get(number) {
            Some(&i) => i,
            None => {
                groups.push(SemesterGroup {
                    number: number.to_string(),
                    sections: Vec::new(),
                });
                index.insert(number.to_string(), groups.len() - 1);
                groups.len() - 1
            }
        };

        if let Some(section) = section {
            groups[slot].sections.push(SectionEntry {
                value: label.to_string(),
                section: section.to_string(),
            });
        }
    }

    groups.sort_by(|a, b| cmp_numeric(&a.number, &b.number));
    Ok(groups)
}

/// Ordered semester filter options: "All Semesters", then each group
/// followed by its sections
pub fn semester_options(groups: &[SemesterGroup]) -> Vec<FilterOption> {
    let mut options = vec![FilterOption {
        value: String::new(),
        label: "All Semesters".to_string(),
        depth: 0,
    }];
    for group in groups {
        options.push(FilterOption {
            value: group.number.clone(),
            label: format!("Semester {}", group.number),
            depth: 0,
        });
        options.extend(group.sections.iter().map(|s| FilterOption {
            value: s.value.clone(),
            label: format!("Section {}", s.section),
            depth: 1,
        }));
    }
    options
}

/// Ordered department filter options: "All Departments", then each department
pub fn department_options<S: AsRef<str>>(departments: &[S]) -> Vec<FilterOption> {
    std::iter::once(FilterOption {
        value: String::new(),
        label: "All Departments".to_string(),
        depth: 0,
    })
    .chain(departments.iter().map(|d| FilterOption {
        value: d.as_ref().to_string(),
        label: d.as_ref().to_string(),
        depth: 0,
    }))
    .collect()
}

/// Parsed semester filter selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SemesterFilter {
    /// No filter selected
    #[default]
    All,
    /// Bare semester number; literal prefix match
    Number(String),
    /// Full label; exact match
    Exact(String),
}

impl SemesterFilter {
    pub fn parse(value: &str) -> Self {
        if value.is_empty() {
            SemesterFilter::All
        } else if value.chars().all(|c| c.is_ascii_digit()) {
            SemesterFilter::Number(value.to_string())
        } else {
            SemesterFilter::Exact(value.to_string())
        }
    }

    /// Whether a row's semester passes this filter
    ///
    /// A number filter is a string prefix test, so `"3"` also admits `"30"`.
    pub fn matches(&self, row_semester: &str) -> bool {
        match self {
            SemesterFilter::All => true,
            SemesterFilter::Number(n) => row_semester.starts_with(n.as_str()),
            SemesterFilter::Exact(label) => row_semester == label,
        }
    }

    /// Raw value this filter was parsed from
    pub fn value(&self) -> &str {
        match self {
            SemesterFilter::All => "",
            SemesterFilter::Number(v) | SemesterFilter::Exact(v) => v,
        }
    }
}

/// Test a row's semester against a raw filter value
///
/// # Examples
///
/// ```
/// use ttgen_common::semester::matches;
///
/// assert!(matches("3A", "3"));
/// assert!(matches("30", "3"));
/// assert!(!matches("3B", "3A"));
/// assert!(matches("anything", ""));
/// ```
pub fn matches(row_semester: &str, filter_value: &str) -> bool {
    SemesterFilter::parse(filter_value).matches(row_semester)
}
