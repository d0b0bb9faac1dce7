// Trait seams for the pipeline's external collaborators.
//
// PostSource: pages of reply text for one conversation
// FollowerSource: follower ids and profile lookups for one account
// NameResolver: ENS name → address
//
// Production impls wrap x-client and ens-client; tests use the mocks in
// `testing.rs`. No network, no filesystem.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use ens_client::EnsClient;
use threaddrop_common::{FollowerProfile, Page, SourceItem};
use x_client::{User, XClient};

// ---------------------------------------------------------------------------
// PostSource
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch one page of source items. `None` requests the first page.
    async fn fetch_page(&self, next_token: Option<&str>) -> Result<Page<SourceItem>>;
}

/// Replies to a single conversation, read through recent search.
pub struct ConversationSource {
    client: Arc<XClient>,
    conversation_id: String,
}

impl ConversationSource {
    pub fn new(client: Arc<XClient>, conversation_id: impl Into<String>) -> Self {
        Self {
            client,
            conversation_id: conversation_id.into(),
        }
    }
}

#[async_trait]
impl PostSource for ConversationSource {
    async fn fetch_page(&self, next_token: Option<&str>) -> Result<Page<SourceItem>> {
        let page = self
            .client
            .search_conversation(&self.conversation_id, next_token)
            .await?;
        Ok(Page {
            items: page
                .items
                .into_iter()
                .map(|t| SourceItem::new(t.id, t.text))
                .collect(),
            next_token: page.next_token,
        })
    }
}

// ---------------------------------------------------------------------------
// FollowerSource
// ---------------------------------------------------------------------------

#[async_trait]
pub trait FollowerSource: Send + Sync {
    /// Resolve a handle (no leading `@`) to its account id.
    async fn user_id(&self, handle: &str) -> Result<String>;

    /// Fetch one page of follower ids.
    async fn follower_ids(&self, user_id: &str, next_token: Option<&str>) -> Result<Page<String>>;

    /// Look up profiles for at most [`x_client::MAX_USERS_PER_LOOKUP`] ids.
    /// Unknown ids are omitted; order of the result is unspecified.
    async fn profiles(&self, ids: &[String]) -> Result<Vec<FollowerProfile>>;
}

#[async_trait]
impl FollowerSource for XClient {
    async fn user_id(&self, handle: &str) -> Result<String> {
        Ok(self.user_by_username(handle).await?.id)
    }

    async fn follower_ids(&self, user_id: &str, next_token: Option<&str>) -> Result<Page<String>> {
        let page = self.followers(user_id, next_token).await?;
        Ok(Page {
            items: page.items.into_iter().map(|u| u.id).collect(),
            next_token: page.next_token,
        })
    }

    async fn profiles(&self, ids: &[String]) -> Result<Vec<FollowerProfile>> {
        let users = self.users_by_ids(ids).await?;
        Ok(users.into_iter().map(profile_from_user).collect())
    }
}

pub fn profile_from_user(user: User) -> FollowerProfile {
    let metrics = user.public_metrics.unwrap_or_default();
    FollowerProfile {
        id: user.id,
        name: user.name,
        username: user.username,
        description: user.description.unwrap_or_default(),
        followers_count: metrics.followers_count,
        following_count: metrics.following_count,
        verified: user.verified.unwrap_or(false),
        created_at: user.created_at,
    }
}

// ---------------------------------------------------------------------------
// NameResolver
// ---------------------------------------------------------------------------

#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Resolve an already lower-cased name. `Ok(None)` means not registered.
    async fn resolve(&self, name: &str) -> Result<Option<String>>;
}

#[async_trait]
impl NameResolver for EnsClient {
    async fn resolve(&self, name: &str) -> Result<Option<String>> {
        let address = EnsClient::resolve(self, name).await?;
        Ok(address.map(|a| a.to_checksum(None)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use x_client::PublicMetrics;

    #[test]
    fn profile_from_sparse_user_uses_defaults() {
        let user = User {
            id: "7".into(),
            name: "Seven".into(),
            username: "seven".into(),
            description: None,
            created_at: None,
            verified: None,
            public_metrics: None,
        };
        let profile = profile_from_user(user);
        assert_eq!(profile.description, "");
        assert_eq!(profile.followers_count, 0);
        assert!(!profile.verified);
    }

    #[test]
    fn profile_from_full_user_copies_metrics() {
        let user = User {
            id: "7".into(),
            name: "Seven".into(),
            username: "seven".into(),
            description: Some("builder".into()),
            created_at: None,
            verified: Some(true),
            public_metrics: Some(PublicMetrics {
                followers_count: 120,
                following_count: 80,
                tweet_count: 5,
                listed_count: 0,
            }),
        };
        let profile = profile_from_user(user);
        assert_eq!(profile.description, "builder");
        assert_eq!(profile.followers_count, 120);
        assert_eq!(profile.following_count, 80);
        assert!(profile.verified);
    }
}
