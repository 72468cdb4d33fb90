//! Error taxonomy shared by the estimator, generator, and their hosts.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolterraError {
    /// Caller-supplied values violate a precondition.
    #[error("invalid input: {field} {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SolterraError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller rather than the host.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput { .. } | Self::NotFound(_))
    }
}

pub type SolterraResult<T> = Result<T, SolterraError>;

/// Rejects NaN, infinities, and values `<= 0`.
pub(crate) fn require_positive(field: &str, value: f64) -> SolterraResult<f64> {
    if !value.is_finite() {
        return Err(SolterraError::invalid(field, "must be a finite number"));
    }
    if value <= 0.0 {
        return Err(SolterraError::invalid(field, format!("must be > 0 (got {value})")));
    }
    Ok(value)
}

/// Rejects NaN, infinities, and negative values.
pub(crate) fn require_non_negative(field: &str, value: f64) -> SolterraResult<f64> {
    if !value.is_finite() {
        return Err(SolterraError::invalid(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(SolterraError::invalid(field, format!("must be >= 0 (got {value})")));
    }
    Ok(value)
}
