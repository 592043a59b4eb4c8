use crate::domain::payment::LifecycleOperation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    /// The selected gateway method does not implement this lifecycle operation.
    #[error("{operation} is not supported by the {method} gateway method")]
    Unsupported {
        method: &'static str,
        operation: LifecycleOperation,
    },
    #[error("Precondition violated: {0}")]
    Precondition(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
