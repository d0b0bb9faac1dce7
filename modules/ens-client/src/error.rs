use thiserror::Error;

pub type Result<T> = std::result::Result<T, EnsError>;

#[derive(Debug, Error)]
pub enum EnsError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error (status {status}): {message}")]
    Http { status: u16, message: String },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for EnsError {
    fn from(err: reqwest::Error) -> Self {
        EnsError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for EnsError {
    fn from(err: serde_json::Error) -> Self {
        EnsError::Parse(err.to_string())
    }
}
