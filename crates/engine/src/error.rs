use browse_config::ConfigError;
use browse_protocol::{ErrorEnvelope, ERROR_CODE_INTERNAL, ERROR_CODE_UPSTREAM};
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowseError>;

/// Failure reported by a [`crate::DirectionalQueryPort`] adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    #[error("Index unavailable: {0}")]
    Unavailable(String),

    #[error("Query timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum BrowseError {
    #[error("Invalid value '{value}' for parameter '{parameter}': {reason}")]
    Validation {
        parameter: String,
        value: String,
        reason: String,
    },

    #[error("Unknown browse field '{0}'")]
    UnknownField(String),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Upstream query failed: {0}")]
    Upstream(#[from] PortError),

    #[error("{0}")]
    Other(String),
}

impl BrowseError {
    pub fn validation(
        parameter: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            parameter: parameter.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the caller can fix the request (HTTP 400 territory).
    #[must_use]
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation { .. } | Self::UnknownField(_) => true,
            Self::Config(err) => err.is_validation(),
            Self::Upstream(_) | Self::Other(_) => false,
        }
    }

    pub fn to_envelope(&self) -> ErrorEnvelope {
        match self {
            Self::Validation {
                parameter, value, ..
            } => ErrorEnvelope::validation(parameter, value, self.to_string()),
            Self::UnknownField(field) => ErrorEnvelope::validation("field", field, self.to_string()),
            Self::Config(ConfigError::UnknownBrowseOption(id)) => {
                ErrorEnvelope::validation("browseOptionId", id, self.to_string())
            }
            Self::Config(err) if err.is_validation() => {
                ErrorEnvelope::validation("browseConfig", "", self.to_string())
            }
            Self::Upstream(_) => ErrorEnvelope {
                code: ERROR_CODE_UPSTREAM.to_string(),
                message: self.to_string(),
                details: None,
                hint: Some("The search index did not answer; retry the request.".to_string()),
            },
            Self::Config(_) | Self::Other(_) => ErrorEnvelope {
                code: ERROR_CODE_INTERNAL.to_string(),
                message: self.to_string(),
                details: None,
                hint: None,
            },
        }
    }
}
