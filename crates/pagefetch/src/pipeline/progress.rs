use std::path::PathBuf;

use crate::worker::FetchStatus;

use super::runner::RunSummary;

/// Events emitted by the pipeline while working through a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    NoPendingJobs {
        scope_id: i64,
    },
    BatchSelected {
        count: usize,
    },
    Fetching {
        job_id: i64,
        url: String,
    },
    Succeeded {
        job_id: i64,
        correlation_id: String,
        content_path: PathBuf,
    },
    Failed {
        job_id: i64,
        correlation_id: String,
        error: String,
    },
    /// The job reached a terminal state but the store did not take the update.
    StatusNotRecorded {
        job_id: i64,
        status: FetchStatus,
        error: String,
    },
    RunCompleted {
        summary: RunSummary,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

/// Human-readable run log on the terminal. Failures go to stderr.
pub struct ConsolePrinter;

impl ConsolePrinter {
    pub fn format(event: &ProgressEvent) -> (ConsoleStream, String) {
        match event {
            ProgressEvent::NoPendingJobs { .. } => {
                (ConsoleStream::Stdout, "No pending pages to download".to_string())
            }
            ProgressEvent::BatchSelected { count } => (
                ConsoleStream::Stdout,
                format!("Found {} pages to download", count),
            ),
            ProgressEvent::Fetching { url, .. } => {
                (ConsoleStream::Stdout, format!("Fetching: {}", url))
            }
            ProgressEvent::Succeeded { correlation_id, .. } => {
                (ConsoleStream::Stdout, format!("✓ Success: {}", correlation_id))
            }
            ProgressEvent::Failed {
                correlation_id,
                error,
                ..
            } => (
                ConsoleStream::Stderr,
                format!("✗ Failed: {} - {}", correlation_id, error),
            ),
            ProgressEvent::StatusNotRecorded {
                job_id,
                status,
                error,
            } => (
                ConsoleStream::Stderr,
                format!("! Could not record '{}' for job {}: {}", status, job_id, error),
            ),
            ProgressEvent::RunCompleted { summary } => {
                (ConsoleStream::Stdout, format!("\nCompleted: {}", summary))
            }
        }
    }
}

impl ProgressReporter for ConsolePrinter {
    fn report(&self, event: ProgressEvent) {
        match Self::format(&event) {
            (ConsoleStream::Stdout, line) => println!("{}", line),
            (ConsoleStream::Stderr, line) => eprintln!("{}", line),
        }
    }
}
