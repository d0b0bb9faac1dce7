use std::path::PathBuf;

use thiserror::Error;

/// Missing or unparsable configuration. Always raised before any network activity.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Fatal conditions that end a run. Rejected and unresolved candidates never surface here.
#[derive(Error, Debug)]
pub enum ThreadDropError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ThreadDropError {
    /// Wrap a collaborator failure from the paging phase.
    pub fn fetch(err: impl std::fmt::Display) -> Self {
        ThreadDropError::Fetch(format!("{err:#}"))
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ThreadDropError::Filesystem {
            path: path.into(),
            source,
        }
    }
}
