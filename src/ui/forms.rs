use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Course, StudentDraft, StudentRecord};

/// Internal representation of the add/edit student form.
#[derive(Default, Clone)]
pub(crate) struct StudentForm {
    pub(crate) name: String,
    pub(crate) course: Course,
    pub(crate) mobile: String,
    pub(crate) active: StudentField,
    pub(crate) error: Option<String>,
}

/// Fields available within the student form, in tab order.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub(crate) enum StudentField {
    #[default]
    Name,
    Course,
    Mobile,
}

impl StudentField {
    const ORDER: [StudentField; 3] = [StudentField::Name, StudentField::Course, StudentField::Mobile];

    fn label(self) -> &'static str {
        match self {
            StudentField::Name => "Name",
            StudentField::Course => "Course",
            StudentField::Mobile => "Mobile",
        }
    }

    /// Row offset of the field inside the form body.
    pub(crate) fn row(self) -> u16 {
        match self {
            StudentField::Name => 0,
            StudentField::Course => 1,
            StudentField::Mobile => 2,
        }
    }
}

impl StudentForm {
    /// Pre-fill the form from an existing record when editing.
    pub(crate) fn from_draft(draft: &StudentDraft) -> Self {
        Self {
            name: draft.name.clone(),
            course: draft.course,
            mobile: draft.mobile.clone(),
            active: StudentField::Name,
            error: None,
        }
    }

    pub(crate) fn draft(&self) -> StudentDraft {
        StudentDraft::new(self.name.clone(), self.course, self.mobile.clone())
    }

    /// Move focus forwards (or backwards) through the fields, wrapping.
    pub(crate) fn cycle_field(&mut self, forward: bool) {
        let idx = StudentField::ORDER
            .iter()
            .position(|field| *field == self.active)
            .unwrap_or(0);
        let len = StudentField::ORDER.len();
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        self.active = StudentField::ORDER[next];
    }

    /// Step the course selection when the course field has focus.
    pub(crate) fn cycle_course(&mut self, offset: isize) -> bool {
        if self.active != StudentField::Course {
            return false;
        }
        self.course = self.course.cycle(offset);
        true
    }

    /// Append a character to the active text field. The course field only
    /// changes through [`StudentForm::cycle_course`].
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            StudentField::Name => self.name.push(ch),
            StudentField::Mobile => self.mobile.push(ch),
            StudentField::Course => return false,
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            StudentField::Name => {
                self.name.pop();
            }
            StudentField::Mobile => {
                self.mobile.pop();
            }
            StudentField::Course => {}
        }
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: StudentField) -> Line<'static> {
        let is_active = self.active == field;
        let value = match field {
            StudentField::Name => self.name.clone(),
            StudentField::Course => format!("< {} >", self.course),
            StudentField::Mobile => self.mobile.clone(),
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(value, style),
        ])
    }

    /// Cursor column inside the form body for the active field, or `None` on
    /// the course selector which has no text cursor.
    pub(crate) fn cursor_column(&self) -> Option<u16> {
        let value_len = match self.active {
            StudentField::Name => self.name.chars().count(),
            StudentField::Mobile => self.mobile.chars().count(),
            StudentField::Course => return None,
        };
        Some((self.active.label().len() + 2 + value_len) as u16)
    }
}

#[derive(Clone)]
pub(crate) struct ConfirmDelete {
    pub(crate) id: i64,
    pub(crate) name: String,
}

impl From<&StudentRecord> for ConfirmDelete {
    fn from(record: &StudentRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
        }
    }
}

/// State for the one-line search prompt.
#[derive(Default, Clone)]
pub(crate) struct SearchPrompt {
    pub(crate) query: String,
}
