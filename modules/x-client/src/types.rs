use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One page of a paginated X API listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the next page. `None` means the listing is exhausted.
    pub next_token: Option<String>,
}

/// A single post returned by the recent-search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub author_id: Option<String>,
    pub conversation_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Follower / following / post counters attached to a user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicMetrics {
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub tweet_count: u64,
    #[serde(default)]
    pub listed_count: u64,
}

/// A user object. Optional fields are only present when requested via `user.fields`.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub verified: Option<bool>,
    pub public_metrics: Option<PublicMetrics>,
}

/// Error entry from the `errors` array of an X API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiProblem {
    pub title: Option<String>,
    pub detail: Option<String>,
}

impl ApiProblem {
    pub fn message(&self) -> String {
        match (&self.title, &self.detail) {
            (Some(title), Some(detail)) => format!("{title}: {detail}"),
            (Some(msg), None) | (None, Some(msg)) => msg.clone(),
            (None, None) => "unknown error".to_string(),
        }
    }
}

/// Pagination metadata for list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    pub result_count: Option<u32>,
    pub next_token: Option<String>,
}

/// Wrapper for list endpoints. `data` is omitted entirely when a page is empty.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListResponse<T> {
    pub data: Option<Vec<T>>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<ApiProblem>>,
}

/// Wrapper for single-object endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SingleResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<ApiProblem>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_page_has_no_data() {
        let json = r#"{"meta":{"result_count":0}}"#;
        let resp: ListResponse<Tweet> = serde_json::from_str(json).unwrap();
        assert!(resp.data.is_none());
        assert!(resp.meta.unwrap().next_token.is_none());
    }

    #[test]
    fn user_with_metrics_parses() {
        let json = r#"{
            "id": "2244994945",
            "name": "X Dev",
            "username": "XDevelopers",
            "description": "The voice of the X Dev team",
            "created_at": "2013-12-14T04:35:55.000Z",
            "verified": true,
            "public_metrics": {"followers_count": 10, "following_count": 3, "tweet_count": 7, "listed_count": 1}
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.username, "XDevelopers");
        assert_eq!(user.public_metrics.unwrap().followers_count, 10);
        assert_eq!(user.verified, Some(true));
    }

    #[test]
    fn problem_message_prefers_title_and_detail() {
        let p = ApiProblem {
            title: Some("Not Found Error".into()),
            detail: Some("Could not find user".into()),
        };
        assert_eq!(p.message(), "Not Found Error: Could not find user");
    }
}
