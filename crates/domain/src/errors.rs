//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Crosspost
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CrosspostError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote portal error: HTTP {status}: {body}")]
    Portal { status: u16, body: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CrosspostError {
    /// HTTP status code of a portal rejection, if this error carries one.
    pub fn portal_status(&self) -> Option<u16> {
        match self {
            Self::Portal { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for Crosspost operations
pub type Result<T> = std::result::Result<T, CrosspostError>;
