//! JSON API envelope.
//!
//! Success bodies are `{"status":"success", ...}`; failures are
//! `{"status":"error","message":"..."}` with a matching HTTP status.
//! Database errors are logged here and surface as a generic 500.
//! Malformed bodies and path parameters are 400s in the same envelope.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::{Value, json};

use crate::rate_limit::RateLimitError;
use crate::services::account::AccountError;
use crate::services::message::MessagingError;

pub const ACCESS_DENIED: &str = "Access denied";
const INTERNAL_ERROR: &str = "Internal server error";

pub type ApiResult = Result<Json<Value>, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Authentication required")
    }

    #[must_use]
    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, ACCESS_DENIED)
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "status": "error", "message": self.message }))).into_response()
    }
}

/// `Json` body extractor whose rejection is an `ApiError`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Path` extractor whose rejection is an `ApiError`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

/// Wrap a JSON object in the success envelope.
#[must_use]
pub fn success(body: Value) -> Json<Value> {
    let mut envelope = serde_json::Map::new();
    envelope.insert("status".into(), Value::from("success"));
    if let Value::Object(fields) = body {
        envelope.extend(fields);
    }
    Json(Value::Object(envelope))
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!(error = %err, "database error");
        Self::internal()
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        let status = match &err {
            AccountError::InvalidUsername
            | AccountError::InvalidEmail
            | AccountError::EmptyPassword
            | AccountError::PasswordMismatch
            | AccountError::InvalidAmount => StatusCode::BAD_REQUEST,
            AccountError::UsernameTaken | AccountError::EmailTaken => StatusCode::CONFLICT,
            AccountError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AccountError::Banned => StatusCode::FORBIDDEN,
            AccountError::NotFound(_) => StatusCode::NOT_FOUND,
            AccountError::Hash(_) | AccountError::Db(_) => {
                tracing::error!(error = %err, "account operation failed");
                return Self::internal();
            }
        };
        Self::new(status, sentence(&err.to_string()))
    }
}

impl From<MessagingError> for ApiError {
    fn from(err: MessagingError) -> Self {
        let status = match &err {
            MessagingError::EmptyMessage
            | MessagingError::SelfChat
            | MessagingError::SelfInvite
            | MessagingError::InvalidChannelName => StatusCode::BAD_REQUEST,
            MessagingError::UserNotFound | MessagingError::InvitationNotFound => StatusCode::NOT_FOUND,
            MessagingError::InvitationClosed => StatusCode::CONFLICT,
            MessagingError::Db(_) => {
                tracing::error!(error = %err, "messaging operation failed");
                return Self::internal();
            }
        };
        Self::new(status, sentence(&err.to_string()))
    }
}

impl From<RateLimitError> for ApiError {
    fn from(err: RateLimitError) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, sentence(&err.to_string()))
    }
}

/// Capitalize the first letter of an error's display text.
fn sentence(raw: &str) -> String {
    let mut chars = raw.chars();
    chars.next().map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
