use atlas_shared::{AppError, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("could not connect to database: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("migration version {0} is registered twice")]
    DuplicateVersion(i64),

    #[error("applied migration {0} is not known to this build")]
    UnknownVersion(i64),

    #[error("applied migrations changed since they ran: {versions:?}")]
    ChecksumMismatch { versions: Vec<i64> },

    #[error("no applied migrations to revert")]
    NothingToRevert,
}

pub type MigrationResult<T> = Result<T, MigrationError>;

impl From<MigrationError> for AppError {
    fn from(err: MigrationError) -> Self {
        match err {
            MigrationError::Database(e) => AppError::Database(e),
            MigrationError::Connection(e) => AppError::service_unavailable(e.to_string()),
            MigrationError::DuplicateVersion(v) => AppError::with_details(
                ErrorCode::DuplicateMigration,
                "duplicate migration version",
                serde_json::json!({ "version": v }),
            ),
            MigrationError::UnknownVersion(v) => AppError::with_details(
                ErrorCode::UnknownMigration,
                "unknown applied migration",
                serde_json::json!({ "version": v }),
            ),
            MigrationError::ChecksumMismatch { versions } => AppError::with_details(
                ErrorCode::ChecksumMismatch,
                "applied migrations changed since they ran",
                serde_json::json!({ "versions": versions }),
            ),
            MigrationError::NothingToRevert => {
                AppError::new(ErrorCode::MigrationFailed, "no applied migrations to revert")
            }
        }
    }
}
