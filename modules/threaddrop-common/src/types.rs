use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entries per output batch.
pub const BATCH_SIZE: usize = 100;

// --- Source data ---

/// One unit of retrieved source text, e.g. a reply in a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceItem {
    pub id: String,
    pub text: String,
}

impl SourceItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// One page from a cursor-paginated source.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// `None` ends pagination.
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }

    pub fn with_next(items: Vec<T>, next_token: impl Into<String>) -> Self {
        Self {
            items,
            next_token: Some(next_token.into()),
        }
    }
}

// --- Candidates and addresses ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateKind {
    /// Starts with `0x`, truncated to 42 characters.
    Address,
    /// Ends in `.eth`, case preserved.
    Name,
}

/// A token pulled out of free text that may denote an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub token: String,
    pub kind: CandidateKind,
}

impl RawCandidate {
    pub fn address(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            kind: CandidateKind::Address,
        }
    }

    pub fn name(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            kind: CandidateKind::Name,
        }
    }
}

/// A checksummed 20-byte address. Only constructed by [`crate::validate_address`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalAddress(String);

impl CanonicalAddress {
    pub(crate) fn new_unchecked(checksummed: String) -> Self {
        Self(checksummed)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Batches ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub address: CanonicalAddress,
    pub amount: u64,
}

impl BatchEntry {
    /// `"<address>, <amount>"`, without a line terminator.
    pub fn to_line(&self) -> String {
        format!("{}, {}", self.address, self.amount)
    }
}

/// At most [`BATCH_SIZE`] entries. `index` is the global position of the first entry divided by
/// [`BATCH_SIZE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub index: usize,
    pub entries: Vec<BatchEntry>,
}

impl Batch {
    pub fn file_name(&self) -> String {
        format!("batch-{}.txt", self.index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// --- Followers ---

/// Profile metadata for one follower account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowerProfile {
    pub id: String,
    pub name: String,
    pub username: String,
    pub description: String,
    pub followers_count: u64,
    pub following_count: u64,
    pub verified: bool,
    pub created_at: Option<DateTime<Utc>>,
}
