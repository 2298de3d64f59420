//! Scripted stand-ins for the pipeline's collaborators.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::DbErr;

use pagefetch::db::{DatabaseError, JobStore, SeaOrmJobStore};
use pagefetch::pipeline::{PacingStrategy, ProgressEvent, ProgressReporter};
use pagefetch::render::{RenderSession, RenderedContent, RenderingClient};
use pagefetch::{FetchError, FetchJob};

#[derive(Debug, Default)]
pub struct SessionStats {
    pub opened: usize,
    pub closed: usize,
    pub rendered: Vec<String>,
}

/// Renderer that answers from a fixed url → response table.
#[derive(Clone, Default)]
pub struct ScriptedClient {
    pages: Arc<Mutex<HashMap<String, Result<String, FetchError>>>>,
    stats: Arc<Mutex<SessionStats>>,
    fail_open: bool,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    pub fn page(self, url: &str, html: &str) -> Self {
        self.set_page(url, html);
        self
    }

    pub fn timeout(self, url: &str) -> Self {
        self.pages.lock().unwrap().insert(
            url.to_string(),
            Err(FetchError::Timeout {
                url: url.to_string(),
                timeout: Duration::from_secs(40),
            }),
        );
        self
    }

    pub fn set_page(&self, url: &str, html: &str) {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(html.to_string()));
    }

    pub fn opened(&self) -> usize {
        self.stats.lock().unwrap().opened
    }

    pub fn closed(&self) -> usize {
        self.stats.lock().unwrap().closed
    }

    pub fn rendered(&self) -> Vec<String> {
        self.stats.lock().unwrap().rendered.clone()
    }
}

#[async_trait]
impl RenderingClient for ScriptedClient {
    async fn open(&self) -> Result<Box<dyn RenderSession>, FetchError> {
        if self.fail_open {
            return Err(FetchError::SessionUnavailable(
                "browser binary not found".to_string(),
            ));
        }
        self.stats.lock().unwrap().opened += 1;
        Ok(Box::new(ScriptedSession {
            pages: Arc::clone(&self.pages),
            stats: Arc::clone(&self.stats),
        }))
    }
}

pub struct ScriptedSession {
    pages: Arc<Mutex<HashMap<String, Result<String, FetchError>>>>,
    stats: Arc<Mutex<SessionStats>>,
}

#[async_trait]
impl RenderSession for ScriptedSession {
    async fn render(&self, url: &str) -> Result<RenderedContent, FetchError> {
        self.stats.lock().unwrap().rendered.push(url.to_string());
        let response = self.pages.lock().unwrap().get(url).cloned();
        match response {
            Some(Ok(html)) => Ok(RenderedContent {
                url: url.to_string(),
                html,
            }),
            Some(Err(e)) => Err(e),
            None => Err(FetchError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            }),
        }
    }

    async fn close(&mut self) -> Result<(), FetchError> {
        self.stats.lock().unwrap().closed += 1;
        Ok(())
    }
}

/// Counts pauses instead of sleeping.
#[derive(Clone, Default)]
pub struct CountingPacer {
    pauses: Arc<AtomicUsize>,
}

impl CountingPacer {
    pub fn count(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PacingStrategy for CountingPacer {
    async fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }
}

/// Collects every progress event in order.
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Wraps the real store and fails selected operations.
pub struct FailingStore {
    inner: SeaOrmJobStore,
    pub fail_select: bool,
    pub fail_mark_succeeded: bool,
    pub fail_mark_failed: bool,
}

impl FailingStore {
    pub fn new(inner: SeaOrmJobStore) -> Self {
        Self {
            inner,
            fail_select: false,
            fail_mark_succeeded: false,
            fail_mark_failed: false,
        }
    }

    fn lost_connection() -> DatabaseError {
        DatabaseError::Query(DbErr::Custom("connection reset by peer".to_string()))
    }
}

#[async_trait]
impl JobStore for FailingStore {
    async fn select_pending_batch(&self, scope_id: i64) -> Result<Vec<FetchJob>, DatabaseError> {
        if self.fail_select {
            return Err(Self::lost_connection());
        }
        self.inner.select_pending_batch(scope_id).await
    }

    async fn mark_succeeded(
        &self,
        job_id: i64,
        content_path: &Path,
    ) -> Result<(), DatabaseError> {
        if self.fail_mark_succeeded {
            return Err(Self::lost_connection());
        }
        self.inner.mark_succeeded(job_id, content_path).await
    }

    async fn mark_failed(&self, job_id: i64) -> Result<(), DatabaseError> {
        if self.fail_mark_failed {
            return Err(Self::lost_connection());
        }
        self.inner.mark_failed(job_id).await
    }
}
