//! Error types shared across Union Portal crates.

use std::path::PathBuf;

/// Top-level error type for Union Portal operations.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("Template error: {message}")]
    Template { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Member record error: {message}")]
    Member { message: String },

    #[error("API error: {message}")]
    Api { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias using PortalError.
pub type PortalResult<T> = Result<T, PortalError>;

impl PortalError {
    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn member(msg: impl Into<String>) -> Self {
        Self::Member {
            message: msg.into(),
        }
    }

    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api {
            message: msg.into(),
        }
    }
}
