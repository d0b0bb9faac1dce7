use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;

pub const DEFAULT_X_API_BASE_URL: &str = "https://api.twitter.com/2";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_MAX_FOLLOWERS: usize = 5000;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // Source API
    pub x_bearer_token: String,
    pub x_api_base_url: String,

    // Thread mode. Kept raw and parsed by `require_thread` so a bad value
    // here never blocks follower mode.
    pub conversation_id: Option<String>,
    pub airdrop_amount: Option<String>,
    pub dedup_addresses: Option<String>,

    // Name resolution
    pub eth_rpc_url: Option<String>,
    pub resolve_concurrency: usize,

    // Follower mode
    pub target_handle: Option<String>,
    pub max_followers: usize,

    // Output
    pub output_dir: PathBuf,
}

/// Values thread mode cannot run without.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadSettings {
    pub conversation_id: String,
    pub amount: u64,
    pub dedup: bool,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let x_bearer_token = get("X_BEARER_TOKEN").ok_or(ConfigError::Missing("X_BEARER_TOKEN"))?;

        let max_followers = get("MAX_FOLLOWERS")
            .map(|v| parse_number::<usize>("MAX_FOLLOWERS", v))
            .transpose()?
            .unwrap_or(DEFAULT_MAX_FOLLOWERS);

        let resolve_concurrency = get("RESOLVE_CONCURRENCY")
            .map(|v| parse_number::<usize>("RESOLVE_CONCURRENCY", v))
            .transpose()?
            .unwrap_or(1);
        if resolve_concurrency == 0 {
            return Err(ConfigError::Invalid {
                key: "RESOLVE_CONCURRENCY",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            x_bearer_token,
            x_api_base_url: get("X_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_X_API_BASE_URL.to_string()),
            conversation_id: get("CONVERSATION_ID"),
            airdrop_amount: get("AIRDROP_AMOUNT"),
            dedup_addresses: get("DEDUP_ADDRESSES"),
            eth_rpc_url: get("ETH_RPC_URL"),
            resolve_concurrency,
            target_handle: get("TARGET_HANDLE").map(|h| normalize_handle(&h)),
            max_followers,
            output_dir: get("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        })
    }

    /// Check and parse the values thread mode needs.
    pub fn require_thread(&self) -> Result<ThreadSettings, ConfigError> {
        let conversation_id = self
            .conversation_id
            .clone()
            .ok_or(ConfigError::Missing("CONVERSATION_ID"))?;
        let amount = self
            .airdrop_amount
            .clone()
            .ok_or(ConfigError::Missing("AIRDROP_AMOUNT"))
            .and_then(|v| parse_number::<u64>("AIRDROP_AMOUNT", v))?;
        let dedup = self
            .dedup_addresses
            .clone()
            .map(|v| parse_bool("DEDUP_ADDRESSES", v))
            .transpose()?
            .unwrap_or(false);
        Ok(ThreadSettings {
            conversation_id,
            amount,
            dedup,
        })
    }

    /// Check the values follower mode needs. Returns the handle without a leading `@`.
    pub fn require_followers(&self) -> Result<String, ConfigError> {
        self.target_handle
            .clone()
            .ok_or(ConfigError::Missing("TARGET_HANDLE"))
    }

    /// Log the configuration with credentials masked.
    pub fn log_redacted(&self) {
        tracing::info!(
            x_bearer_token = %redact(&self.x_bearer_token),
            x_api_base_url = %self.x_api_base_url,
            conversation_id = ?self.conversation_id,
            airdrop_amount = ?self.airdrop_amount,
            dedup_addresses = ?self.dedup_addresses,
            eth_rpc_url = ?self.eth_rpc_url.as_deref().map(redact_url),
            resolve_concurrency = self.resolve_concurrency,
            target_handle = ?self.target_handle,
            max_followers = self.max_followers,
            output_dir = %self.output_dir.display(),
            "Loaded configuration"
        );
    }
}

pub fn normalize_handle(handle: &str) -> String {
    handle.trim().trim_start_matches('@').to_string()
}

fn parse_number<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value,
            reason: "expected true or false".to_string(),
        }),
    }
}

fn redact(secret: &str) -> String {
    let tail: String = secret.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    if secret.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("****{tail}")
    }
}

/// RPC URLs often embed an API key in the path. Keep only scheme and host.
fn redact_url(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, rest)) => {
            let host = rest.split('/').next().unwrap_or(rest);
            format!("{scheme}://{host}/****")
        }
        None => "****".to_string(),
    }
}
