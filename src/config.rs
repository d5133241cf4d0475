//! Storage location and backend selection.
//!
//! Paths follow the XDG base directory layout. Resolution order for the data
//! directory is: explicit override, `TASKPLAN_DATA_DIR`, `XDG_DATA_HOME`,
//! then `~/.local/share`.

use std::env;
use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;

pub const APP_DIR: &str = "taskplan";
pub const DB_FILE: &str = "taskplan.db";
pub const DATA_DIR_ENV: &str = "TASKPLAN_DATA_DIR";

/// Get the data directory for taskplan.
///
/// # Returns
/// Path to data directory, by default `~/.local/share/taskplan/`
pub fn get_data_dir(override_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir;
    }

    if let Ok(dir) = env::var(DATA_DIR_ENV)
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }

    let data_home = env::var("XDG_DATA_HOME")
        .ok()
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".local/share"))
        })
        .unwrap_or_else(|| PathBuf::from("."));

    data_home.join(APP_DIR)
}

/// Get database file path (data_dir/taskplan.db).
pub fn get_db_path(data_dir_override: Option<PathBuf>) -> PathBuf {
    get_data_dir(data_dir_override).join(DB_FILE)
}

/// Storage backend used by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StoreKind {
    /// Process-local, lost on exit
    Memory,
    /// `requests.json` and `tasks.json` in the data directory
    Json,
    /// SQLite database file
    #[default]
    Sqlite,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Memory => write!(f, "memory"),
            StoreKind::Json => write!(f, "json"),
            StoreKind::Sqlite => write!(f, "sqlite"),
        }
    }
}
