// Test mocks for the collection pipeline.
//
// Three mocks matching the three trait boundaries:
// - MockPostSource (PostSource): scripted page sequence keyed by cursor
// - MockFollowerSource (FollowerSource): scripted follower pages + profile map
// - MockResolver (NameResolver): HashMap-based name→address, optional per-name delay
//
// Each mock records the calls it receives so tests can assert on paging and
// lookup behavior.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use threaddrop_common::{FollowerProfile, Page, SourceItem};

use crate::traits::{FollowerSource, NameResolver, PostSource};

/// Canonical checksummed addresses for fixtures.
pub const VITALIK: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

/// Deterministic, distinct, all-lowercase address for index `i`.
pub fn fixture_address(i: usize) -> String {
    format!("0x{:040x}", i + 1)
}

/// Cursor used by the mocks for page `n` (0-based). Page 0 is requested with `None`.
fn cursor(n: usize) -> String {
    format!("cursor-{n}")
}

// ---------------------------------------------------------------------------
// MockPostSource
// ---------------------------------------------------------------------------

/// Serves pages in order. Page `n + 1` is reachable through the cursor handed out with page `n`.
pub struct MockPostSource {
    pages: Vec<Vec<SourceItem>>,
    fail_at: Option<usize>,
    calls: Mutex<Vec<Option<String>>>,
}

impl MockPostSource {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            fail_at: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn page(mut self, texts: &[&str]) -> Self {
        let offset: usize = self.pages.iter().map(Vec::len).sum();
        let items = texts
            .iter()
            .enumerate()
            .map(|(i, t)| SourceItem::new(format!("post-{}", offset + i), *t))
            .collect();
        self.pages.push(items);
        self
    }

    /// Fail when page `n` (0-based) is requested.
    pub fn failing_at(mut self, n: usize) -> Self {
        self.fail_at = Some(n);
        self
    }

    /// Cursors received, in call order.
    pub fn calls(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockPostSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostSource for MockPostSource {
    async fn fetch_page(&self, next_token: Option<&str>) -> Result<Page<SourceItem>> {
        self.calls
            .lock()
            .unwrap()
            .push(next_token.map(String::from));

        let n = match next_token {
            None => 0,
            Some(token) => match (0..self.pages.len()).find(|n| cursor(*n) == token) {
                Some(n) => n,
                None => bail!("MockPostSource: unknown cursor {token}"),
            },
        };
        if self.fail_at == Some(n) {
            bail!("MockPostSource: simulated failure on page {n}");
        }

        let items = self.pages.get(n).cloned().unwrap_or_default();
        if n + 1 < self.pages.len() {
            Ok(Page::with_next(items, cursor(n + 1)))
        } else {
            Ok(Page::last(items))
        }
    }
}

// ---------------------------------------------------------------------------
// MockFollowerSource
// ---------------------------------------------------------------------------

pub struct MockFollowerSource {
    handles: HashMap<String, String>,
    pages: Vec<Vec<String>>,
    profiles: HashMap<String, FollowerProfile>,
    page_calls: Mutex<usize>,
    lookup_calls: Mutex<Vec<usize>>,
}

impl MockFollowerSource {
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
            pages: Vec::new(),
            profiles: HashMap::new(),
            page_calls: Mutex::new(0),
            lookup_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on_handle(mut self, handle: &str, user_id: &str) -> Self {
        self.handles.insert(handle.to_string(), user_id.to_string());
        self
    }

    /// Add a page of follower ids. A profile is registered for every id.
    pub fn page(mut self, ids: &[&str]) -> Self {
        for id in ids {
            self.profiles.insert(id.to_string(), fixture_profile(id));
        }
        self.pages.push(ids.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Drop the profile for `id`, simulating a suspended account.
    pub fn without_profile(mut self, id: &str) -> Self {
        self.profiles.remove(id);
        self
    }

    pub fn page_calls(&self) -> usize {
        *self.page_calls.lock().unwrap()
    }

    /// Size of each profile lookup, in call order.
    pub fn lookup_calls(&self) -> Vec<usize> {
        self.lookup_calls.lock().unwrap().clone()
    }
}

impl Default for MockFollowerSource {
    fn default() -> Self {
        Self::new()
    }
}

pub fn fixture_profile(id: &str) -> FollowerProfile {
    FollowerProfile {
        id: id.to_string(),
        name: format!("User {id}"),
        username: format!("user_{id}"),
        description: String::new(),
        followers_count: 10,
        following_count: 20,
        verified: false,
        created_at: None,
    }
}

#[async_trait]
impl FollowerSource for MockFollowerSource {
    async fn user_id(&self, handle: &str) -> Result<String> {
        self.handles
            .get(handle)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("MockFollowerSource: no user registered for {handle}"))
    }

    async fn follower_ids(&self, _user_id: &str, next_token: Option<&str>) -> Result<Page<String>> {
        *self.page_calls.lock().unwrap() += 1;

        let n = match next_token {
            None => 0,
            Some(token) => match (0..self.pages.len()).find(|n| cursor(*n) == token) {
                Some(n) => n,
                None => bail!("MockFollowerSource: unknown cursor {token}"),
            },
        };
        let items = self.pages.get(n).cloned().unwrap_or_default();
        if n + 1 < self.pages.len() {
            Ok(Page::with_next(items, cursor(n + 1)))
        } else {
            Ok(Page::last(items))
        }
    }

    async fn profiles(&self, ids: &[String]) -> Result<Vec<FollowerProfile>> {
        if ids.len() > x_client::MAX_USERS_PER_LOOKUP {
            bail!("MockFollowerSource: lookup of {} ids exceeds limit", ids.len());
        }
        self.lookup_calls.lock().unwrap().push(ids.len());
        // Reverse so callers cannot rely on response order.
        Ok(ids
            .iter()
            .rev()
            .filter_map(|id| self.profiles.get(id).cloned())
            .collect())
    }
}

// ---------------------------------------------------------------------------
// MockResolver
// ---------------------------------------------------------------------------

/// HashMap-based resolver. Unregistered names resolve to `None`.
pub struct MockResolver {
    names: HashMap<String, String>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self {
            names: HashMap::new(),
            failing: HashSet::new(),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on_name(mut self, name: &str, address: &str) -> Self {
        self.names.insert(name.to_string(), address.to_string());
        self
    }

    pub fn failing_on(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    /// Sleep before answering for `name`, so lookups finish out of call order.
    pub fn delayed(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }

    /// Names received, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NameResolver for MockResolver {
    async fn resolve(&self, name: &str) -> Result<Option<String>> {
        self.calls.lock().unwrap().push(name.to_string());
        if let Some(delay) = self.delays.get(name) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(name) {
            bail!("MockResolver: simulated failure for {name}");
        }
        Ok(self.names.get(name).cloned())
    }
}
