//! Typed errors and the HTTP status translator.
//!
//! Every handler failure ends up as an [`AppError`]. Its `IntoResponse` impl is the
//! only place a status code is derived from error content, and it always answers
//! with a bare status (no body).

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Failures reported by a [`crate::store::TurkeyStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cast to ObjectId failed for value \"{0}\"")]
    InvalidId(String),
    #[error("turkey validation failed: {0}")]
    Validation(String),
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence failure classes with a fixed HTTP meaning.
///
/// Declaration order is the classification order used when matching messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidId,
    Validation,
    DuplicateKey,
    Unauthorized,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 4] = [
        ErrorKind::InvalidId,
        ErrorKind::Validation,
        ErrorKind::DuplicateKey,
        ErrorKind::Unauthorized,
    ];

    /// Lower-case text that identifies this kind inside an unstructured message.
    pub fn marker(self) -> &'static str {
        match self {
            ErrorKind::InvalidId => "objectid failed",
            ErrorKind::Validation => "validation failed",
            ErrorKind::DuplicateKey => "duplicate key",
            ErrorKind::Unauthorized => "unauthorized",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::InvalidId => StatusCode::NOT_FOUND,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::DuplicateKey => StatusCode::CONFLICT,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    /// First kind (in table order) whose marker occurs in `message`, ignoring case.
    ///
    /// Driver error text is not a stable interface and may change between library
    /// versions; prefer structured kinds where the store can provide them.
    pub fn from_message(message: &str) -> Option<ErrorKind> {
        let lowered = message.to_lowercase();
        Self::ALL.into_iter().find(|kind| lowered.contains(kind.marker()))
    }
}

impl StoreError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            StoreError::InvalidId(_) => Some(ErrorKind::InvalidId),
            StoreError::Validation(_) => Some(ErrorKind::Validation),
            StoreError::DuplicateKey(_) => Some(ErrorKind::DuplicateKey),
            StoreError::Unauthorized(_) => Some(ErrorKind::Unauthorized),
            StoreError::Database(_) | StoreError::Unavailable(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Error whose status is already known; bypasses content inspection.
    #[error("{message}")]
    Status { status: StatusCode, message: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of classifying one [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Explicit(StatusCode),
    Matched(ErrorKind),
    Unmatched,
}

impl Classification {
    pub fn status(self) -> StatusCode {
        match self {
            Classification::Explicit(status) => status,
            Classification::Matched(kind) => kind.status(),
            Classification::Unmatched => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl AppError {
    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        AppError::Status {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, message)
    }

    /// Explicit status first, then the structured store kind, then the message text.
    pub fn classify(&self) -> Classification {
        if let AppError::Status { status, .. } = self {
            return Classification::Explicit(*status);
        }
        let structured = match self {
            AppError::Store(e) => e.kind(),
            AppError::Status { .. } => None,
        };
        match structured.or_else(|| ErrorKind::from_message(&self.to_string())) {
            Some(kind) => Classification::Matched(kind),
            None => Classification::Unmatched,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.classify().status()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let classification = self.classify();
        let status = classification.status();
        match classification {
            Classification::Explicit(_) => {
                tracing::error!(status = status.as_u16(), message = %self, "responding with explicit status");
            }
            Classification::Matched(kind) => {
                tracing::error!(status = status.as_u16(), kind = ?kind, message = %self, "responding with classified status");
            }
            Classification::Unmatched => {
                tracing::error!(status = status.as_u16(), error = ?self, "responding with 500 for unclassified error");
            }
        }
        status.into_response()
    }
}
