use thiserror::Error;

use crate::db::DatabaseError;
use crate::error::{FetchError, StorageError};

/// Failure of one job. Never aborts the run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Render failed: {0}")]
    Render(#[from] FetchError),

    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Recording status failed: {0}")]
    Record(#[from] DatabaseError),
}
