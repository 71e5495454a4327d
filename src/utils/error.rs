use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimerError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Accounts file parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Order history request rejected with status {status}; session cookies may have expired")]
    SessionError { status: u16 },

    #[error("Timed out after {timeout_ms}ms waiting on `{subject}`")]
    TimeoutError { subject: String, timeout_ms: u64 },

    #[error("Unexpected page state: {message}")]
    UiContractError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl ClaimerError {
    /// True when the error is a bounded-wait expiry. Optional UI steps are
    /// allowed to swallow these; required steps propagate them.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClaimerError::TimeoutError { .. })
    }
}

pub type Result<T> = std::result::Result<T, ClaimerError>;
