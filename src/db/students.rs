use rusqlite::{params, Connection, Row};
use tracing::debug;

use crate::error::{RecordError, Result};
use crate::models::{Course, StudentRecord};

fn student_from_row(row: &Row<'_>) -> rusqlite::Result<StudentRecord> {
    Ok(StudentRecord {
        id: row.get(0)?,
        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        course: row.get(2)?,
        mobile: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
    })
}

/// Retrieve every student in insertion order. The view synchronizer relies on
/// this ordering being stable between reloads.
pub fn fetch_students(conn: &Connection) -> Result<Vec<StudentRecord>> {
    let mut stmt = conn.prepare("SELECT id, name, course, mobile FROM students ORDER BY id")?;

    let students = stmt
        .query_map([], student_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    debug!(rows = students.len(), "fetched all students");
    Ok(students)
}

/// Students whose name matches exactly. SQLite's `=` on TEXT is
/// case-sensitive, so "alice" does not find "Alice".
pub fn fetch_students_by_name(conn: &Connection, name: &str) -> Result<Vec<StudentRecord>> {
    let mut stmt =
        conn.prepare("SELECT id, name, course, mobile FROM students WHERE name = ?1 ORDER BY id")?;

    let students = stmt
        .query_map([name], student_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    debug!(name, rows = students.len(), "searched students by name");
    Ok(students)
}

pub fn fetch_student(conn: &Connection, id: i64) -> Result<Option<StudentRecord>> {
    let mut stmt = conn.prepare("SELECT id, name, course, mobile FROM students WHERE id = ?1")?;
    let mut rows = stmt.query_map([id], student_from_row)?;
    Ok(rows.next().transpose()?)
}

/// Insert a new student and return the id SQLite assigned.
pub fn create_student(conn: &Connection, name: &str, course: Course, mobile: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO students (name, course, mobile) VALUES (?1, ?2, ?3)",
        params![name, course, mobile],
    )?;

    let id = conn.last_insert_rowid();
    debug!(id, "inserted student");
    Ok(id)
}

/// Overwrite every editable field. Touching zero rows is an error so the UI
/// can tell the user the record vanished underneath them.
pub fn update_student(
    conn: &Connection,
    id: i64,
    name: &str,
    course: Course,
    mobile: &str,
) -> Result<()> {
    let updated = conn.execute(
        "UPDATE students SET name = ?1, course = ?2, mobile = ?3 WHERE id = ?4",
        params![name, course, mobile, id],
    )?;

    debug!(id, updated, "updated student");
    if updated == 0 {
        Err(RecordError::RecordNotFound { id })
    } else {
        Ok(())
    }
}

pub fn delete_student(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn.execute("DELETE FROM students WHERE id = ?1", params![id])?;

    debug!(id, deleted, "deleted student");
    if deleted == 0 {
        Err(RecordError::RecordNotFound { id })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::ensure_schema;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn null_text_columns_read_as_empty() {
        let conn = memory_db();
        conn.execute(
            "INSERT INTO students (name, course, mobile) VALUES (NULL, 'Math', NULL)",
            [],
        )
        .unwrap();

        let students = fetch_students(&conn).unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].name, "");
        assert_eq!(students[0].mobile, "");
    }

    #[test]
    fn unknown_course_text_is_a_read_error() {
        let conn = memory_db();
        conn.execute(
            "INSERT INTO students (name, course, mobile) VALUES ('Eve', 'Chemistry', '1')",
            [],
        )
        .unwrap();

        assert!(matches!(
            fetch_students(&conn),
            Err(RecordError::UnknownCourse(text)) if text == "Chemistry"
        ));
        assert!(matches!(
            fetch_students_by_name(&conn, "Eve"),
            Err(RecordError::UnknownCourse(_))
        ));
    }

    #[test]
    fn name_search_is_case_sensitive() {
        let conn = memory_db();
        create_student(&conn, "Alice", Course::Biology, "1").unwrap();
        create_student(&conn, "alice", Course::Math, "2").unwrap();

        let hits = fetch_students_by_name(&conn, "Alice").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].course, Course::Biology);
    }

    #[test]
    fn name_search_binds_parameters() {
        let conn = memory_db();
        create_student(&conn, "Bob", Course::Math, "1").unwrap();

        let hits = fetch_students_by_name(&conn, "' OR '1'='1").unwrap();
        assert!(hits.is_empty());
        assert_eq!(fetch_students(&conn).unwrap().len(), 1);
    }

    #[test]
    fn fetch_student_misses_return_none() {
        let conn = memory_db();
        let id = create_student(&conn, "Bob", Course::Math, "1").unwrap();

        assert_eq!(fetch_student(&conn, id).unwrap().unwrap().name, "Bob");
        assert!(fetch_student(&conn, id + 1).unwrap().is_none());
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let conn = memory_db();
        let first = create_student(&conn, "A", Course::Math, "1").unwrap();
        delete_student(&conn, first).unwrap();
        let second = create_student(&conn, "B", Course::Math, "2").unwrap();

        assert!(second > first);
    }
}
