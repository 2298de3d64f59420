use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::pipeline::JobState;

/// Value of the `page_fetch_status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchStatus {
    Pending,
    Succeeded,
    Failed,
}

impl FetchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchStatus::Pending => "pending",
            FetchStatus::Succeeded => "succeeded",
            FetchStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, FetchStatus::Pending)
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FetchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FetchStatus::Pending),
            "succeeded" => Ok(FetchStatus::Succeeded),
            "failed" => Ok(FetchStatus::Failed),
            other => Err(other.to_string()),
        }
    }
}

/// One page to fetch, as captured in the batch snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchJob {
    pub id: i64,
    /// The fetch run this job belongs to.
    pub scope_id: i64,
    pub source_url: String,
    /// Stable per-product identifier, first half of the file name.
    pub correlation_id: String,
    /// Time-of-record token, second half of the file name.
    pub folder_timestamp: String,
    /// Destination directory; `None` when the producer never set one.
    pub folder_path: Option<String>,
    pub inserted_at: NaiveDateTime,
}

/// Final result of pushing one job through the pipeline.
#[derive(Debug, Clone)]
pub struct TerminalOutcome {
    pub job_id: i64,
    pub correlation_id: String,
    /// `Succeeded` or `Failed`, as decided by the pipeline.
    pub status: FetchStatus,
    pub content_path: Option<PathBuf>,
    pub error: Option<String>,
    /// Whether the terminal status reached the job store. When `false` the
    /// row is still `pending` even though the job finished.
    pub recorded: bool,
    /// States visited, in order, starting with `Selected`.
    pub trail: Vec<JobState>,
}

impl TerminalOutcome {
    pub fn succeeded(
        job: &FetchJob,
        content_path: PathBuf,
        recorded: bool,
        trail: Vec<JobState>,
    ) -> Self {
        Self {
            job_id: job.id,
            correlation_id: job.correlation_id.clone(),
            status: FetchStatus::Succeeded,
            content_path: Some(content_path),
            error: None,
            recorded,
            trail,
        }
    }

    pub fn failed(job: &FetchJob, error: String, recorded: bool, trail: Vec<JobState>) -> Self {
        Self {
            job_id: job.id,
            correlation_id: job.correlation_id.clone(),
            status: FetchStatus::Failed,
            content_path: None,
            error: Some(error),
            recorded,
            trail,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == FetchStatus::Succeeded
    }
}
