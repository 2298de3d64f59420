//! Job repository: batch selection and terminal status transitions on
//! `gap_product_data`.

use std::path::Path;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use tracing::{debug, warn};

use crate::worker::{FetchJob, FetchStatus};

use super::entities::{page_job, product, PageJob};
use super::DatabaseError;

/// Durable job table as seen by the pipeline.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Snapshot of every pending job with a page URL in `scope_id`, oldest
    /// first. Never mutates.
    async fn select_pending_batch(&self, scope_id: i64) -> Result<Vec<FetchJob>, DatabaseError>;

    /// Single-row update to `succeeded` with the stored path. A job that no
    /// longer exists is logged, not reported as an error.
    async fn mark_succeeded(&self, job_id: i64, content_path: &Path)
        -> Result<(), DatabaseError>;

    /// Single-row update to `failed`.
    async fn mark_failed(&self, job_id: i64) -> Result<(), DatabaseError>;
}

/// Joined row produced by the batch query.
#[derive(Debug, FromQueryResult)]
struct PendingJobRow {
    id: i64,
    gap_data_fetch_id: i64,
    product_page_url: Option<String>,
    folder_timestamp: String,
    inserted_at: NaiveDateTime,
    cc_id: String,
    product_folder_path: Option<String>,
}

impl PendingJobRow {
    fn into_job(self) -> Option<FetchJob> {
        let source_url = self.product_page_url?;
        Some(FetchJob {
            id: self.id,
            scope_id: self.gap_data_fetch_id,
            source_url,
            correlation_id: self.cc_id,
            folder_timestamp: self.folder_timestamp,
            folder_path: self.product_folder_path,
            inserted_at: self.inserted_at,
        })
    }
}

/// [`JobStore`] backed by a SeaORM connection.
#[derive(Clone)]
pub struct SeaOrmJobStore {
    db: DatabaseConnection,
}

impl SeaOrmJobStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connects to `url` (already scheme-normalized).
    pub async fn connect(url: &str) -> Result<Self, DatabaseError> {
        Ok(Self::new(super::connect(url).await?))
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Reads a job row by id.
    pub async fn find_by_id(&self, job_id: i64) -> Result<Option<page_job::Model>, DatabaseError> {
        Ok(PageJob::find_by_id(job_id).one(&self.db).await?)
    }

    /// Current status of a job, if the row exists.
    pub async fn status_of(&self, job_id: i64) -> Result<Option<FetchStatus>, DatabaseError> {
        match self.find_by_id(job_id).await? {
            Some(row) => row
                .page_fetch_status
                .parse::<FetchStatus>()
                .map(Some)
                .map_err(DatabaseError::UnknownStatus),
            None => Ok(None),
        }
    }

    async fn transition(
        &self,
        job_id: i64,
        status: FetchStatus,
        content_path: Option<&Path>,
    ) -> Result<(), DatabaseError> {
        let now = Utc::now().naive_utc();
        let mut update = PageJob::update_many()
            .col_expr(
                page_job::Column::PageFetchStatus,
                Expr::value(status.as_str()),
            )
            .col_expr(page_job::Column::UpdatedAt, Expr::value(now));

        if let Some(path) = content_path {
            update = update.col_expr(
                page_job::Column::HtmlFilePath,
                Expr::value(path.to_string_lossy().into_owned()),
            );
        }

        let result = update
            .filter(page_job::Column::Id.eq(job_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            warn!(
                "Job {} no longer exists; status '{}' was not recorded",
                job_id, status
            );
        } else {
            debug!("Job {} marked {}", job_id, status);
        }
        Ok(())
    }
}

#[async_trait]
impl JobStore for SeaOrmJobStore {
    async fn select_pending_batch(&self, scope_id: i64) -> Result<Vec<FetchJob>, DatabaseError> {
        let rows = PageJob::find()
            .select_only()
            .column(page_job::Column::Id)
            .column(page_job::Column::GapDataFetchId)
            .column(page_job::Column::ProductPageUrl)
            .column(page_job::Column::FolderTimestamp)
            .column(page_job::Column::InsertedAt)
            .column(product::Column::CcId)
            .column(product::Column::ProductFolderPath)
            .join(JoinType::InnerJoin, page_job::Relation::Product.def())
            .filter(page_job::Column::GapDataFetchId.eq(scope_id))
            .filter(page_job::Column::PageFetchStatus.eq(FetchStatus::Pending.as_str()))
            .filter(page_job::Column::ProductPageUrl.is_not_null())
            .order_by_asc(page_job::Column::InsertedAt)
            .order_by_asc(page_job::Column::Id)
            .into_model::<PendingJobRow>()
            .all(&self.db)
            .await?;

        let jobs: Vec<FetchJob> = rows.into_iter().filter_map(PendingJobRow::into_job).collect();
        debug!("Selected {} pending jobs for scope {}", jobs.len(), scope_id);
        Ok(jobs)
    }

    async fn mark_succeeded(
        &self,
        job_id: i64,
        content_path: &Path,
    ) -> Result<(), DatabaseError> {
        self.transition(job_id, FetchStatus::Succeeded, Some(content_path))
            .await
    }

    async fn mark_failed(&self, job_id: i64) -> Result<(), DatabaseError> {
        self.transition(job_id, FetchStatus::Failed, None).await
    }
}
