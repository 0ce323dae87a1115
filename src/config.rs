//! Command-line flags and the paths derived from them.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::db::default_db_path;

/// Log file name placed next to the database when `--log-file` is not given.
const LOG_FILE_NAME: &str = "student-records.log";

/// Terminal student record manager
#[derive(Parser, Debug)]
#[command(name = "student-records")]
#[command(version)]
pub struct Cli {
    /// SQLite database file [default: ~/.student-records/database.db]
    #[arg(long, env = "STUDENT_RECORDS_DB", value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Log file [default: student-records.log next to the database]
    #[arg(long, env = "STUDENT_RECORDS_LOG", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Fully resolved settings the binary runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: PathBuf,
    pub log_file: PathBuf,
    pub log_level: &'static str,
}

impl Cli {
    /// Fill in defaults for anything left unset on the command line.
    pub fn resolve(self) -> Result<Config> {
        let database = match self.database {
            Some(path) => path,
            None => default_db_path()?,
        };
        let log_file = self.log_file.unwrap_or_else(|| {
            database
                .parent()
                .map(|dir| dir.join(LOG_FILE_NAME))
                .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME))
        });
        let log_level = match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };

        Ok(Config {
            database,
            log_file,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_defaults_next_to_database() {
        let cli = Cli::try_parse_from(["student-records", "--database", "/tmp/x/students.db"])
            .unwrap();
        let config = cli.resolve().unwrap();

        assert_eq!(config.database, PathBuf::from("/tmp/x/students.db"));
        assert_eq!(config.log_file, PathBuf::from("/tmp/x/student-records.log"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn verbosity_raises_log_level() {
        let cli = Cli::try_parse_from([
            "student-records",
            "--database",
            "db.sqlite",
            "--log-file",
            "out.log",
            "-vv",
        ])
        .unwrap();
        let config = cli.resolve().unwrap();

        assert_eq!(config.log_file, PathBuf::from("out.log"));
        assert_eq!(config.log_level, "trace");
    }

    #[test]
    fn bare_file_name_logs_in_working_directory() {
        let cli = Cli::try_parse_from(["student-records", "--database", "db.sqlite"]).unwrap();
        let config = cli.resolve().unwrap();

        assert_eq!(config.log_file, PathBuf::from("student-records.log"));
    }
}
