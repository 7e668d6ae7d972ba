use thiserror::Error;

use crate::errors::ServiceError;

/// Transport-level outcomes of a backend call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("no response received: {0}")]
    NoResponse(String),
    #[error("token rejected by backend")]
    Unauthorized,
    #[error("backend returned {status}")]
    Status { status: u16, message: Option<String> },
    #[error("unexpected payload: {0}")]
    Decode(String),
}

/// Login failures; `Display` is the exact text shown on the login view.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Unexpected response from server")]
    UnexpectedResponse,
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("No response received from server")]
    NoResponse,
}

impl LoginError {
    /// Backend-provided message when present, `Server error: {status}` otherwise.
    pub fn server(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Server error: {status}"));
        Self::Server { status, message }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            LoginError::InvalidCredentials => 2001,
            LoginError::UnexpectedResponse => 2002,
            LoginError::Server { .. } => 2003,
            LoginError::NoResponse => 2004,
        }
    }
}

impl From<BackendError> for LoginError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::NoResponse(_) => LoginError::NoResponse,
            BackendError::Unauthorized => LoginError::server(401, None),
            BackendError::Status { status, message } => LoginError::server(status, message),
            BackendError::Decode(_) => LoginError::UnexpectedResponse,
        }
    }
}

/// Failures of the secondary profile/team fetches.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Storage(#[from] ServiceError),
}

impl SessionError {
    pub fn code(&self) -> u16 {
        match self {
            SessionError::Backend(BackendError::Unauthorized) => 2101,
            SessionError::Backend(_) => 2102,
            SessionError::Storage(_) => 2200,
        }
    }
}
