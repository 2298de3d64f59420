pub mod config;
pub mod db;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod sanitize;
pub mod storage;
pub mod worker;

pub use config::{load_settings, BrowserSettings, DatabaseSettings, RunSettings};
pub use db::{DatabaseError, JobStore, SeaOrmJobStore};
pub use error::{ConfigError, FetchError, PagefetchError, Result, StorageError};
pub use pipeline::{
    process_job, ConsolePrinter, JobState, NoopProgress, Pipeline, PipelineConfig, ProgressEvent,
    ProgressReporter, RunSummary,
};
pub use render::{ChromeClient, RenderSession, RenderedContent, RenderingClient};
pub use storage::{build_placement, FileStorage, Placement};
pub use worker::{FetchJob, FetchStatus, TerminalOutcome};
