use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that abort a whole run.
#[derive(Error, Debug)]
pub enum PagefetchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Job store error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Rendering error: {0}")]
    Fetch(#[from] FetchError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("DATABASE_URL environment variable is required")]
    MissingDatabaseUrl,

    #[error("Failed to read settings file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Invalid setting '{name}': {reason}")]
    InvalidSetting { name: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Failed to open rendering session: {0}")]
    SessionUnavailable(String),

    #[error("Navigation to {url} timed out after {}s", timeout.as_secs())]
    Timeout { url: String, timeout: Duration },

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Rendering {url} failed: {reason}")]
    Client { url: String, reason: String },
}

impl FetchError {
    /// Only a session that cannot be opened stops the run; everything else
    /// fails the current job.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchError::SessionUnavailable(_))
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid placement for job {job_id}: {reason}")]
    InvalidPlacement { job_id: i64, reason: String },

    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move staged content into '{path}': {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PagefetchError>;
