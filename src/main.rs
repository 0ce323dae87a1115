//! Binary entry point that glues the SQLite-backed record store to the TUI:
//! resolve configuration, start logging, open the database, load the table,
//! and drive the Ratatui event loop until the user exits.
use anyhow::Context;
use clap::Parser;
use student_records::config::Cli;
use student_records::{logging, run_app, App, RecordStore, RecordTable};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = Cli::parse().resolve()?;
    logging::init(&config)?;
    info!(database = %config.database.display(), "starting student records");

    let store = RecordStore::open(&config.database).context("failed to open student database")?;
    let table = RecordTable::load(&store).context("failed to load students")?;

    let mut app = App::new(store, table);
    let result = run_app(&mut app);
    info!("student records exited");
    result
}
