pub mod job;

pub use job::{FetchJob, FetchStatus, TerminalOutcome};
