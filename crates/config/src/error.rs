use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Browse option '{0}' is not configured")]
    UnknownBrowseOption(String),

    #[error("Invalid browse config: {0}")]
    InvalidConfig(String),

    #[error("Invalid tenant id: {0:?}")]
    InvalidTenant(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ConfigError {
    /// Client-fixable errors surface as validation failures.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownBrowseOption(_) | Self::InvalidConfig(_) | Self::InvalidTenant(_)
        )
    }
}
