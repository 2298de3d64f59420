//! Test harness for isolated pipeline runs.
//!
//! Each `TestHarness` owns an in-memory job store and a temporary content
//! root, so tests never share state.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};
use tempfile::TempDir;

use pagefetch::config::BrowserSettings;
use pagefetch::db::entities::{page_job, PageJob};
use pagefetch::db::{self, JobStore, SeaOrmJobStore};
use pagefetch::pipeline::{PacingStrategy, Pipeline, PipelineConfig};
use pagefetch::render::RenderingClient;
use pagefetch::FetchStatus;

use super::builders::{JobBuilder, ProductBuilder};

pub struct TestHarness {
    temp_dir: TempDir,
    pub content_root: PathBuf,
    pub store: SeaOrmJobStore,
}

impl TestHarness {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let content_root = temp_dir.path().join("content");
        std::fs::create_dir_all(&content_root).expect("Failed to create content root");

        let conn = db::open_in_memory()
            .await
            .expect("Failed to create test database");

        Self {
            temp_dir,
            content_root,
            store: SeaOrmJobStore::new(conn),
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub async fn add_product(&self, product: ProductBuilder) {
        product
            .build()
            .insert(self.store.connection())
            .await
            .expect("Failed to insert product");
    }

    pub async fn add_job(&self, job: JobBuilder) {
        job.build()
            .insert(self.store.connection())
            .await
            .expect("Failed to insert job");
    }

    pub fn config(&self) -> Arc<PipelineConfig> {
        Arc::new(PipelineConfig {
            content_root: self.content_root.clone(),
            pause: std::time::Duration::ZERO,
            browser: BrowserSettings::default(),
        })
    }

    /// Pipeline over this harness's store.
    pub fn pipeline(
        &self,
        renderer: impl RenderingClient + 'static,
        pacing: impl PacingStrategy + 'static,
    ) -> Pipeline {
        self.pipeline_with_store(Arc::new(self.store.clone()), renderer, pacing)
    }

    pub fn pipeline_with_store(
        &self,
        store: Arc<dyn JobStore>,
        renderer: impl RenderingClient + 'static,
        pacing: impl PacingStrategy + 'static,
    ) -> Pipeline {
        Pipeline::new(self.config(), store, Arc::new(renderer), Arc::new(pacing))
    }

    pub async fn status(&self, job_id: i64) -> FetchStatus {
        self.store
            .status_of(job_id)
            .await
            .expect("Failed to read status")
            .expect("Job row missing")
    }

    pub async fn row(&self, job_id: i64) -> page_job::Model {
        self.store
            .find_by_id(job_id)
            .await
            .expect("Failed to read job")
            .expect("Job row missing")
    }

    /// Puts a job back to `pending`, as an operator re-queueing it would.
    pub async fn requeue(&self, job_id: i64) {
        PageJob::update_many()
            .col_expr(page_job::Column::PageFetchStatus, Expr::value("pending"))
            .filter(page_job::Column::Id.eq(job_id))
            .exec(self.store.connection())
            .await
            .expect("Failed to requeue job");
    }

    pub fn content_file(&self, relative: &str) -> PathBuf {
        self.content_root.join(relative)
    }
}
