//! Conversions from external infrastructure errors into domain errors.

use crosspost_domain::CrosspostError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CrosspostError);

impl From<InfraError> for CrosspostError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CrosspostError> for InfraError {
    fn from(value: CrosspostError) -> Self {
        InfraError(value)
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        if value.is_timeout() {
            return InfraError(CrosspostError::Network("HTTP request timed out".into()));
        }

        if value.is_connect() {
            return InfraError(CrosspostError::Network("HTTP connection failure".into()));
        }

        InfraError(CrosspostError::Network(value.to_string()))
    }
}
