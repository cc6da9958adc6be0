use civic_core::error::CoreError;

/// Failure of a workflow operation.
///
/// Domain outcomes (not found, forbidden, invalid transition, ...) arrive as
/// [`WorkflowError::Core`]; anything the database reports is
/// [`WorkflowError::Storage`].
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
