//! Database error types.

use sea_orm::DbErr;
use thiserror::Error;

/// Errors from job store operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The store could not be reached (connect or pool acquire failed).
    #[error("Job store unavailable: {source}")]
    Unavailable {
        #[source]
        source: DbErr,
    },

    /// A statement failed after a connection was obtained.
    #[error("Query failed: {0}")]
    Query(DbErr),

    /// A row carried a status this pipeline does not know.
    #[error("Unknown page fetch status '{0}'")]
    UnknownStatus(String),
}

impl DatabaseError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, DatabaseError::Unavailable { .. })
    }
}

impl From<DbErr> for DatabaseError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
                DatabaseError::Unavailable { source: err }
            }
            other => DatabaseError::Query(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    #[test]
    fn test_connection_errors_map_to_unavailable() {
        let err: DatabaseError =
            DbErr::Conn(RuntimeErr::Internal("connection refused".to_string())).into();
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_statement_errors_map_to_query() {
        let err: DatabaseError =
            DbErr::Exec(RuntimeErr::Internal("syntax error".to_string())).into();
        assert!(!err.is_unavailable());
        assert!(matches!(err, DatabaseError::Query(_)));
    }
}
