//! Persistence module split across logical submodules.

mod connection;
mod store;
mod students;

pub use connection::{default_db_path, ensure_schema};
pub use store::RecordStore;
pub use students::{
    create_student, delete_student, fetch_student, fetch_students, fetch_students_by_name,
    update_student,
};
