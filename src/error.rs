use crate::query::error::QueryError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeBenchErrorCode {
    Io,
    Decode,
    InvalidConfig,
    InvalidQuery,
    Introspection,
}

impl ScopeBenchErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ScopeBenchErrorCode::Io => "io",
            ScopeBenchErrorCode::Decode => "decode",
            ScopeBenchErrorCode::InvalidConfig => "invalid_config",
            ScopeBenchErrorCode::InvalidQuery => "invalid_query",
            ScopeBenchErrorCode::Introspection => "introspection",
        }
    }
}

#[derive(Debug, Error)]
pub enum ScopeBenchError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("invalid config: {message}")]
    InvalidConfig { message: String },
    #[error("query error: {0}")]
    Query(#[from] QueryError),
    #[error("plan introspection failed: {0}")]
    Introspection(String),
}

impl From<serde_json::Error> for ScopeBenchError {
    fn from(value: serde_json::Error) -> Self {
        ScopeBenchError::Decode(value.to_string())
    }
}

impl ScopeBenchError {
    pub fn code(&self) -> ScopeBenchErrorCode {
        match self {
            ScopeBenchError::Io(_) => ScopeBenchErrorCode::Io,
            ScopeBenchError::Decode(_) => ScopeBenchErrorCode::Decode,
            ScopeBenchError::InvalidConfig { .. } => ScopeBenchErrorCode::InvalidConfig,
            ScopeBenchError::Query(_) => ScopeBenchErrorCode::InvalidQuery,
            ScopeBenchError::Introspection(_) => ScopeBenchErrorCode::Introspection,
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code().as_str()
    }
}
