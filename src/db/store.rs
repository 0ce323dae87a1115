use std::path::PathBuf;

use rusqlite::Connection;

use crate::error::Result;
use crate::models::{Course, StudentRecord};

use super::connection::open_connection;
use super::students::{
    create_student, delete_student, fetch_student, fetch_students, fetch_students_by_name,
    update_student,
};

/// Handle on the student database. Only the file path is kept; each operation
/// opens its own connection and drops it before returning, so nothing stays
/// locked between user actions.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Point the store at `path`, verifying up front that the file can be
    /// opened and carries the schema.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        open_connection(&path)?;
        Ok(Self { path })
    }

    fn connect(&self) -> Result<Connection> {
        open_connection(&self.path)
    }

    pub fn create(&self, name: &str, course: Course, mobile: &str) -> Result<i64> {
        let conn = self.connect()?;
        create_student(&conn, name, course, mobile)
    }

    pub fn read_all(&self) -> Result<Vec<StudentRecord>> {
        let conn = self.connect()?;
        fetch_students(&conn)
    }

    pub fn read_by_name(&self, name: &str) -> Result<Vec<StudentRecord>> {
        let conn = self.connect()?;
        fetch_students_by_name(&conn, name)
    }

    pub fn read_one(&self, id: i64) -> Result<Option<StudentRecord>> {
        let conn = self.connect()?;
        fetch_student(&conn, id)
    }

    pub fn update(&self, id: i64, name: &str, course: Course, mobile: &str) -> Result<()> {
        let conn = self.connect()?;
        update_student(&conn, id, name, course, mobile)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let conn = self.connect()?;
        delete_student(&conn, id)
    }
}
