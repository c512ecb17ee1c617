use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuidanceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    #[error("Slot full: {0}")]
    SlotFull(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type GuidanceResult<T> = Result<T, GuidanceError>;
