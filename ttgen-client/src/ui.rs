//! UI port and upload trigger state
//!
//! The controller never touches a concrete front end; it reports through
//! [`UiPort`]. The CLI renders to the terminal with [`TerminalUi`].

use ttgen_common::api::Course;
use ttgen_common::semester::FilterOption;

/// Upload trigger (button) state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Idle,
    /// Disabled while a batch is running
    InFlight,
    Success,
    Failed,
}

/// Blocking notification shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Failure(m) => m,
        }
    }
}

/// Rendering collaborator for the upload controller
pub trait UiPort: Send + Sync {
    /// Replace the course table with `courses`
    fn render_table(&self, courses: &[&Course]);

    /// Replace the department and semester filter options
    fn render_filters(&self, departments: &[FilterOption], semesters: &[FilterOption]);

    fn set_button_state(&self, state: ButtonState);

    fn notify(&self, notice: &Notice);
}

/// Idle → InFlight → (Success | Failed) → Idle
#[derive(Debug, Default)]
pub struct UploadTrigger {
    state: ButtonState,
}

impl UploadTrigger {
    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state != ButtonState::InFlight
    }

    /// Enter InFlight; returns false (no transition) while disabled
    pub fn begin(&mut self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.state = ButtonState::InFlight;
        true
    }

    /// Leave InFlight with the batch result
    pub fn finish(&mut self, success: bool) -> ButtonState {
        if self.state == ButtonState::InFlight {
            self.state = if success {
                ButtonState::Success
            } else {
                ButtonState::Failed
            };
        }
        self.state
    }

    pub fn reset(&mut self) -> ButtonState {
        self.state = ButtonState::Idle;
        self.state
    }
}

/// Plain-text front end for the CLI
#[derive(Debug, Default)]
pub struct TerminalUi;

const COLUMNS: [&str; 9] = [
    "Department",
    "Semester",
    "Course Code",
    "Course Name",
    "Faculty",
    "L",
    "T",
    "P",
    "Classroom",
];

fn row_cells(course: &Course) -> [&str; 9] {
    [
        course.department.as_str(),
        course.semester.as_str(),
        course.code.as_str(),
        course.name.as_str(),
        course.faculty.as_str(),
        course.lecture.as_str(),
        course.tutorial.as_str(),
        course.practical.as_str(),
        course.classroom.as_str(),
    ]
}

/// Render rows as an aligned text table
pub fn format_table(courses: &[&Course]) -> String {
    let mut widths = COLUMNS.map(str::len);
    for course in courses {
        for (width, cell) in widths.iter_mut().zip(row_cells(course)) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 9]| {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(COLUMNS);
    out.push('\n');
    for course in courses {
        out.push_str(&line(row_cells(course)));
        out.push('\n');
    }
    out
}

/// Render filter options, indenting section entries
pub fn format_options(options: &[FilterOption]) -> String {
    options
        .iter()
        .map(|o| {
            let value = if o.value.is_empty() { "*" } else { o.value.as_str() };
            format!("{}{} [{}]", "   ".repeat(o.depth as usize), o.label, value)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl UiPort for TerminalUi {
    fn render_table(&self, courses: &[&Course]) {
        println!("{}", format_table(courses));
        println!("{} course(s)", courses.len());
    }

    fn render_filters(&self, departments: &[FilterOption], semesters: &[FilterOption]) {
        println!("Departments:\n{}\n", format_options(departments));
        println!("Semesters:\n{}\n", format_options(semesters));
    }

    fn set_button_state(&self, state: ButtonState) {
        if state == ButtonState::InFlight {
            eprintln!("Uploading...");
        }
    }

    fn notify(&self, notice: &Notice) {
        match notice {
            Notice::Success(m) => println!("{}", m),
            Notice::Failure(m) => eprintln!("{}", m),
        }
    }
}
