//! Ratatui front-end: the student table, its modal forms and dialogs, and the
//! crossterm event loop that drives them.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
