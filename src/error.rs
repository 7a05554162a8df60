// Analysis errors - caller-input failures reported back verbatim

use thiserror::Error;

/// Errors raised while validating or analyzing a batch of access keys.
///
/// Every variant is a caller-input error: the batch is rejected as a whole,
/// nothing is retried and no partial result is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Invalid access key '{key}': {reason}")]
    InvalidFormat { key: String, reason: String },

    #[error("Empty key list: at least one access key is required")]
    EmptyBatch,

    #[error("All keys must belong to the same issuer: key #{index} has taxpayer ID {found}, expected {expected}")]
    MixedIssuer {
        expected: String,
        found: String,
        index: usize,
    },
}

impl AnalysisError {
    pub(crate) fn invalid_format(key: &str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidFormat {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
