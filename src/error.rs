//! Error taxonomy for confirmation handling.

use thiserror::Error;

use crate::storage::StorageError;
use crate::validation::ValidationError;

/// Everything that can go wrong between receiving a body and answering it.
///
/// Unlike most axum services this type does not implement `IntoResponse`:
/// the kind-to-status mapping differs per route (an encryption failure is a
/// server fault on `/nino` but a client fault on `/mobile`), so the route
/// dispatch table in `routes::confirmation` owns that mapping.
#[derive(Error, Debug)]
pub enum ConfirmError {
    #[error("Invalid payload: {0}")]
    Validation(#[from] ValidationError),

    #[error("Encryption failure: {0}")]
    Encryption(String),

    #[error("I/O failure: {0}")]
    Io(String),

    #[error("Render failure: {0}")]
    Render(#[from] serde_json::Error),
}

impl From<StorageError> for ConfirmError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Encryption(message) => ConfirmError::Encryption(message),
            StorageError::Io(message) => ConfirmError::Io(message),
        }
    }
}
