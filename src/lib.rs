//! Core library surface for the Student Records TUI application.
//!
//! The persistence layer, the synchronized table view and the command
//! handlers are public so the `bin` target and the integration tests drive
//! the same pieces.
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;
pub mod view;

/// Persistence entry point.
pub use db::RecordStore;

pub use error::RecordError;
pub use models::{Course, StudentDraft, StudentRecord};

/// The in-memory table and the trait handlers use to refresh it.
pub use view::{RecordTable, RecordView};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
