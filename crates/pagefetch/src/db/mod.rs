//! Job store access.
//!
//! Uses SeaORM over sqlx. Production runs against the producer's Postgres
//! database; the test suite uses an in-memory SQLite database created from
//! the same entities.

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::info;

use crate::sanitize;

pub mod entities;
pub mod error;
pub mod job_repo;

pub use error::DatabaseError;
pub use job_repo::{JobStore, SeaOrmJobStore};

/// Opens a connection to the job store.
///
/// The pipeline is the only user of the connection and works strictly
/// sequentially, so the pool is capped at one connection.
pub async fn connect(url: &str) -> Result<DatabaseConnection, DatabaseError> {
    let mut options = ConnectOptions::new(url.to_owned());
    options
        .max_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let conn = Database::connect(options)
        .await
        .map_err(|source| DatabaseError::Unavailable { source })?;

    info!("Connected to job store at {}", sanitize::redact_database_url(url));
    Ok(conn)
}

/// Opens an in-memory SQLite database with the job tables created. Used by
/// tests; the real tables are owned by the producer.
pub async fn open_in_memory() -> Result<DatabaseConnection, DatabaseError> {
    let conn = connect("sqlite::memory:").await?;

    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);
    conn.execute(backend.build(&schema.create_table_from_entity(entities::Product)))
        .await?;
    conn.execute(backend.build(&schema.create_table_from_entity(entities::PageJob)))
        .await?;

    Ok(conn)
}
