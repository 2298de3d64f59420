pub mod config;
pub mod context;
pub mod error;
pub mod pacing;
pub mod progress;
pub mod runner;

pub use config::PipelineConfig;
pub use context::{JobContext, JobState};
pub use error::PipelineError;
pub use pacing::{FixedDelay, NoDelay, PacingStrategy};
pub use progress::{ConsolePrinter, ConsoleStream, NoopProgress, ProgressEvent, ProgressReporter};
pub use runner::{process_job, JobClients, Pipeline, RunSummary};
