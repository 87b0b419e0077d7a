//! Core configuration and startup.
//!
//! # Responsibility
//! - Resolve database and log locations from one data directory.
//! - Bring up logging and the store in a fixed order.

use crate::logging::{default_log_level, init_logging, LoggingError};
use crate::repo::note_repo::RepoError;
use crate::store::PlannerStore;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_FILE_NAME: &str = "planner.sqlite3";
pub const LOG_DIR_NAME: &str = "logs";

/// Host-provided settings for starting the core.
///
/// `data_dir` must be absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    #[serde(default = "default_level")]
    pub log_level: String,
}

fn default_level() -> String {
    default_log_level().to_string()
}

impl CoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            log_level: default_level(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

/// Failures of [`start`].
#[derive(Debug)]
pub enum StartupError {
    Logging(LoggingError),
    Store(RepoError),
}

impl Display for StartupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "logging bootstrap failed: {err}"),
            Self::Store(err) => write!(f, "store bootstrap failed: {err}"),
        }
    }
}

impl Error for StartupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<LoggingError> for StartupError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<RepoError> for StartupError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

/// Initializes logging, then opens and migrates the store.
///
/// # Errors
/// - `Logging` when the log directory is unusable or logging already runs
///   with another configuration.
/// - `Store` when the database cannot be opened or migrated.
pub fn start(config: &CoreConfig) -> Result<PlannerStore, StartupError> {
    let log_dir = config.log_dir();
    init_logging(&config.log_level, &log_dir.to_string_lossy())?;

    let db_path = config.db_path();
    match PlannerStore::open(&db_path) {
        Ok(store) => {
            info!(
                "event=core_ready module=config status=ok db_path={}",
                db_path.display()
            );
            Ok(store)
        }
        Err(err) => {
            error!(
                "event=core_ready module=config status=error db_path={} error={err}",
                db_path.display()
            );
            Err(err.into())
        }
    }
}
