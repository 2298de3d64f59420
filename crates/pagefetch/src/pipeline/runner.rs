use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, info_span, warn, Instrument};

use crate::db::JobStore;
use crate::error::PagefetchError;
use crate::render::{ChromeClient, RenderSession, RenderingClient};
use crate::sanitize;
use crate::storage::{build_placement, FileStorage};
use crate::worker::{FetchJob, FetchStatus, TerminalOutcome};

use super::config::PipelineConfig;
use super::context::{JobContext, JobState};
use super::error::PipelineError;
use super::pacing::{FixedDelay, PacingStrategy};
use super::progress::{ProgressEvent, ProgressReporter};

/// Tallies for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub selected: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Jobs whose terminal status never reached the store.
    pub unrecorded: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &TerminalOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        if !outcome.recorded {
            self.unrecorded += 1;
        }
    }

    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} succeeded, {} failed", self.succeeded, self.failed)?;
        if self.unrecorded > 0 {
            write!(f, ", {} unrecorded", self.unrecorded)?;
        }
        Ok(())
    }
}

/// Everything one job needs, borrowed for the duration of the run.
pub struct JobClients<'a> {
    pub session: &'a dyn RenderSession,
    pub storage: &'a FileStorage,
    pub store: &'a dyn JobStore,
    pub progress: &'a dyn ProgressReporter,
}

/// Drives a single job from `Selected` to `Done`. Every failure is absorbed
/// into the returned outcome.
pub async fn process_job(job: FetchJob, clients: &JobClients<'_>) -> TerminalOutcome {
    let span = info_span!("fetch_job",
        job_id = job.id,
        correlation_id = %job.correlation_id,
    );
    run_job(JobContext::new(job), clients).instrument(span).await
}

async fn run_job(mut ctx: JobContext, clients: &JobClients<'_>) -> TerminalOutcome {
    clients.progress.report(ProgressEvent::Fetching {
        job_id: ctx.job.id,
        url: ctx.job.source_url.clone(),
    });

    // Step 1: Render
    ctx.advance(JobState::Rendering);
    if let Err(e) = step_render(&mut ctx, clients.session).await {
        ctx.advance(JobState::RenderFailed);
        return fail(ctx, e, clients).await;
    }
    ctx.advance(JobState::Rendered);

    // Step 2: Write
    ctx.advance(JobState::Writing);
    let content_path = match step_write(&mut ctx, clients.storage) {
        Ok(path) => path,
        Err(e) => {
            ctx.advance(JobState::WriteFailed);
            return fail(ctx, e, clients).await;
        }
    };
    ctx.advance(JobState::Written);

    // Step 3: Record
    ctx.advance(JobState::Recording);
    let recorded = match clients
        .store
        .mark_succeeded(ctx.job.id, &content_path)
        .await
    {
        Ok(()) => true,
        Err(e) => {
            let err = PipelineError::Record(e);
            error!("Content stored but status not recorded: {}", err);
            clients.progress.report(ProgressEvent::StatusNotRecorded {
                job_id: ctx.job.id,
                status: FetchStatus::Succeeded,
                error: err.to_string(),
            });
            false
        }
    };
    ctx.advance(JobState::Done);

    info!(file = %sanitize::redact_path(&content_path), "Stored rendered page");
    clients.progress.report(ProgressEvent::Succeeded {
        job_id: ctx.job.id,
        correlation_id: ctx.job.correlation_id.clone(),
        content_path: content_path.clone(),
    });
    TerminalOutcome::succeeded(&ctx.job, content_path, recorded, ctx.trail)
}

async fn step_render(
    ctx: &mut JobContext,
    session: &dyn RenderSession,
) -> Result<(), PipelineError> {
    let rendered = session
        .render(&ctx.job.source_url)
        .instrument(info_span!("render"))
        .await?;
    ctx.rendered = Some(rendered);
    Ok(())
}

fn step_write(ctx: &mut JobContext, storage: &FileStorage) -> Result<PathBuf, PipelineError> {
    let _step = info_span!("write").entered();
    let placement = build_placement(&ctx.job)?;
    let html = ctx
        .rendered
        .as_ref()
        .map(|r| r.html.as_bytes())
        .unwrap_or_default();
    let path = storage.write(&placement, html)?;
    ctx.placement = Some(placement);
    ctx.content_path = Some(path.clone());
    Ok(path)
}

/// Records `failed` for the job. If even that update is lost the row stays
/// `pending` and the next run picks it up again.
async fn fail(mut ctx: JobContext, err: PipelineError, clients: &JobClients<'_>) -> TerminalOutcome {
    let message = err.to_string();
    warn!("Job failed in state {}: {}", ctx.state, message);

    let recorded = match clients.store.mark_failed(ctx.job.id).await {
        Ok(()) => true,
        Err(e) => {
            let err = PipelineError::Record(e);
            error!("Failure status not recorded: {}", err);
            clients.progress.report(ProgressEvent::StatusNotRecorded {
                job_id: ctx.job.id,
                status: FetchStatus::Failed,
                error: err.to_string(),
            });
            false
        }
    };
    ctx.advance(JobState::Done);

    clients.progress.report(ProgressEvent::Failed {
        job_id: ctx.job.id,
        correlation_id: ctx.job.correlation_id.clone(),
        error: message.clone(),
    });
    TerminalOutcome::failed(&ctx.job, message, recorded, ctx.trail)
}

pub struct Pipeline {
    config: Arc<PipelineConfig>,
    store: Arc<dyn JobStore>,
    renderer: Arc<dyn RenderingClient>,
    storage: FileStorage,
    pacing: Arc<dyn PacingStrategy>,
}

impl Pipeline {
    /// Production constructor: Chromium renderer and a fixed pause.
    pub fn from_config(config: Arc<PipelineConfig>, store: Arc<dyn JobStore>) -> Self {
        let renderer = Arc::new(ChromeClient::new(config.browser.clone()));
        let pacing = Arc::new(FixedDelay(config.pause));
        Self::new(config, store, renderer, pacing)
    }

    /// Inject specific sub-components.
    pub fn new(
        config: Arc<PipelineConfig>,
        store: Arc<dyn JobStore>,
        renderer: Arc<dyn RenderingClient>,
        pacing: Arc<dyn PacingStrategy>,
    ) -> Self {
        let storage = FileStorage::new(&config.content_root);
        Self {
            config,
            store,
            renderer,
            storage,
            pacing,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Processes every pending job of `scope_id` once, in insertion order.
    ///
    /// Only a failed batch query or a session that cannot be opened is
    /// returned as an error; per-job failures end up in the summary.
    pub async fn run(
        &self,
        scope_id: i64,
        progress: &dyn ProgressReporter,
    ) -> Result<RunSummary, PagefetchError> {
        let span = info_span!("run", scope_id);
        self.run_batch(scope_id, progress).instrument(span).await
    }

    async fn run_batch(
        &self,
        scope_id: i64,
        progress: &dyn ProgressReporter,
    ) -> Result<RunSummary, PagefetchError> {
        let jobs = self.store.select_pending_batch(scope_id).await?;
        let mut summary = RunSummary {
            selected: jobs.len(),
            ..Default::default()
        };

        if jobs.is_empty() {
            info!("No pending jobs for scope {}", scope_id);
            progress.report(ProgressEvent::NoPendingJobs { scope_id });
            return Ok(summary);
        }

        info!("Selected {} pending jobs", jobs.len());
        progress.report(ProgressEvent::BatchSelected { count: jobs.len() });

        let mut session = self.renderer.open().await?;

        {
            let clients = JobClients {
                session: session.as_ref(),
                storage: &self.storage,
                store: self.store.as_ref(),
                progress,
            };

            for (index, job) in jobs.into_iter().enumerate() {
                if index > 0 {
                    self.pacing.pause().await;
                }
                let outcome = process_job(job, &clients).await;
                summary.record(&outcome);
            }
        }

        if let Err(e) = session.close().await {
            warn!("Failed to close rendering session: {}", e);
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            unrecorded = summary.unrecorded,
            "Run completed"
        );
        progress.report(ProgressEvent::RunCompleted {
            summary: summary.clone(),
        });
        Ok(summary)
    }
}
