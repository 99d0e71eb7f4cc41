// Centralized error handling for the marketplace

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

/// Failures of the durable record store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored account data is malformed: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Every recoverable failure an engine operation can report
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("An account is already registered with identifier {0}")]
    DuplicateIdentifier(String),

    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("Account {0} is not awaiting approval")]
    NotPending(String),

    #[error("Account {0} is not an approved model")]
    NotActiveModel(String),

    #[error("Account {0} is not a model account")]
    NotModel(String),

    #[error("Call duration must be between 1 and {max} minutes, got {minutes}")]
    InvalidDuration { minutes: i64, max: u32 },

    #[error("Amount must be a positive number, got {0}")]
    InvalidAmount(f64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Wrong identifier or password")]
    InvalidCredentials,

    #[error("Not logged in")]
    Unauthenticated,

    #[error("Not allowed for this session")]
    Forbidden,

    #[error("Call not found: {0}")]
    CallNotFound(u64),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl MarketError {
    pub fn status(&self) -> StatusCode {
        match self {
            MarketError::DuplicateIdentifier(_) => StatusCode::CONFLICT,
            MarketError::NotFound(_) | MarketError::CallNotFound(_) => StatusCode::NOT_FOUND,
            MarketError::NotPending(_)
            | MarketError::NotActiveModel(_)
            | MarketError::NotModel(_) => StatusCode::CONFLICT,
            MarketError::InvalidDuration { .. }
            | MarketError::InvalidAmount(_)
            | MarketError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            MarketError::InvalidCredentials | MarketError::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            MarketError::Forbidden => StatusCode::FORBIDDEN,
            MarketError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        use crate::models::api::ErrorResponse;

        let status = self.status();

        (
            status,
            Json(ErrorResponse {
                success: false,
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
