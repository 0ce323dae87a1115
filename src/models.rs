//! Domain models that mirror the `students` table and get passed throughout
//! the TUI. These stay light-weight data holders so the other layers can focus
//! on presentation and persistence logic.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::error::RecordError;

/// Courses a student can be enrolled in. Stored in SQLite as the display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Course {
    #[default]
    Biology,
    Math,
    Astronomy,
    Physics,
}

impl Course {
    /// Every course in the order the forms cycle through them. This is the one
    /// list both the add and edit flows read from.
    pub const ALL: [Course; 4] = [
        Course::Biology,
        Course::Math,
        Course::Astronomy,
        Course::Physics,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Course::Biology => "Biology",
            Course::Math => "Math",
            Course::Astronomy => "Astronomy",
            Course::Physics => "Physics",
        }
    }

    /// Step through [`Course::ALL`], wrapping at both ends.
    pub fn cycle(self, offset: isize) -> Course {
        let len = Course::ALL.len() as isize;
        let idx = Course::ALL
            .iter()
            .position(|course| *course == self)
            .unwrap_or(0) as isize;
        Course::ALL[(idx + offset).rem_euclid(len) as usize]
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Course {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Course::ALL
            .into_iter()
            .find(|course| course.as_str() == s)
            .ok_or_else(|| RecordError::UnknownCourse(s.to_string()))
    }
}

impl ToSql for Course {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Course {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse().map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One row of the `students` table.
pub struct StudentRecord {
    /// Primary key assigned by SQLite. Never reused and never edited; edit and
    /// delete flows hand it back to the persistence layer.
    pub id: i64,
    pub name: String,
    pub course: Course,
    pub mobile: String,
}

impl StudentRecord {
    /// Copy the editable fields out of the record, for pre-filling forms.
    pub fn draft(&self) -> StudentDraft {
        StudentDraft {
            name: self.name.clone(),
            course: self.course,
            mobile: self.mobile.clone(),
        }
    }
}

/// The user-editable part of a record. Insert and edit flows build one of
/// these before touching the database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentDraft {
    pub name: String,
    pub course: Course,
    pub mobile: String,
}

impl StudentDraft {
    pub fn new(name: impl Into<String>, course: Course, mobile: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            course,
            mobile: mobile.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_parses_only_known_names() {
        assert_eq!("Astronomy".parse::<Course>().unwrap(), Course::Astronomy);
        assert!(matches!(
            "math".parse::<Course>(),
            Err(RecordError::UnknownCourse(text)) if text == "math"
        ));
    }

    #[test]
    fn course_cycle_wraps_both_directions() {
        assert_eq!(Course::Biology.cycle(-1), Course::Physics);
        assert_eq!(Course::Physics.cycle(1), Course::Biology);
        assert_eq!(Course::Math.cycle(2), Course::Physics);
    }

    #[test]
    fn draft_drops_the_id() {
        let record = StudentRecord {
            id: 7,
            name: "Ada".into(),
            course: Course::Math,
            mobile: "555-0100".into(),
        };
        assert_eq!(
            record.draft(),
            StudentDraft::new("Ada", Course::Math, "555-0100")
        );
    }
}
