pub mod address;
pub mod config;
pub mod error;
pub mod matcher;
pub mod types;

pub use address::{validate_address, Rejection, Validation};
pub use config::{Config, ThreadSettings};
pub use error::{ConfigError, ThreadDropError};
pub use matcher::extract_candidates;
pub use types::*;
