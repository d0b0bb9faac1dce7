use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use threaddrop_common::{FollowerProfile, ThreadDropError};

pub const FOLLOWERS_FILE: &str = "followers.json";
pub const PROFILES_FILE: &str = "profiles.json";

/// Serialize `value` as pretty JSON to `dir/name`, replacing any previous document.
pub fn write_json_document<T: Serialize + ?Sized>(
    dir: &Path,
    name: &str,
    value: &T,
) -> Result<PathBuf, ThreadDropError> {
    fs::create_dir_all(dir).map_err(|e| ThreadDropError::filesystem(dir, e))?;
    let path = dir.join(name);
    let json = serde_json::to_string_pretty(value)?;
    fs::write(&path, json).map_err(|e| ThreadDropError::filesystem(&path, e))?;
    tracing::info!(path = %path.display(), "Wrote document");
    Ok(path)
}

/// Write the ordered follower ids and their profiles as two documents.
pub fn write_follower_documents(
    dir: &Path,
    ids: &[String],
    profiles: &[FollowerProfile],
) -> Result<(PathBuf, PathBuf), ThreadDropError> {
    let ids_path = write_json_document(dir, FOLLOWERS_FILE, ids)?;
    let profiles_path = write_json_document(dir, PROFILES_FILE, profiles)?;
    Ok((ids_path, profiles_path))
}
