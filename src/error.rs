use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No wallet provider available: {0}")]
    ProviderUnavailable(String),

    #[error("Wallet authorization rejected: {0}")]
    UserRejected(String),

    #[error("Provider returned no accounts")]
    NoAccountsReturned,

    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("No active account; connect a wallet first")]
    NoActiveAccount,

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("A submission is already in flight")]
    SubmissionInProgress,

    #[error("Submission failed: {0}")]
    Submission(String),

    #[error("Transaction not confirmed within {0} seconds")]
    ConfirmationTimeout(u64),

    #[error("Ledger fetch failed: {0}")]
    Fetch(String),

    #[error("Unparseable {field} in ledger record: {raw}")]
    Unparseable { field: &'static str, raw: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Recipient address is required")]
    MissingRecipient,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Message is required")]
    MissingMessage,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            SessionError::ProviderUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            SessionError::UserRejected(_) => (StatusCode::FORBIDDEN, self.to_string()),
            SessionError::NoAccountsReturned => (StatusCode::BAD_REQUEST, self.to_string()),
            SessionError::UnknownAccount(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            SessionError::NoActiveAccount => (StatusCode::BAD_REQUEST, self.to_string()),
            SessionError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            SessionError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            SessionError::SubmissionInProgress => (StatusCode::CONFLICT, self.to_string()),
            SessionError::ConfirmationTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, self.to_string()),
            SessionError::Fetch(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
