pub mod error;
pub mod types;

pub use error::{Result, XError};
pub use types::{ApiProblem, Meta, Page, PublicMetrics, Tweet, User};

use serde::de::DeserializeOwned;
use types::{ListResponse, SingleResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com/2";

/// Upper bound on `max_results` for recent search.
const SEARCH_PAGE_SIZE: &str = "100";

/// Upper bound on `max_results` for follower listings.
const FOLLOWERS_PAGE_SIZE: &str = "1000";

/// Maximum ids accepted by a single `/users?ids=` lookup.
pub const MAX_USERS_PER_LOOKUP: usize = 100;

const TWEET_FIELDS: &str = "author_id,conversation_id,created_at";
const USER_FIELDS: &str = "created_at,description,public_metrics,verified";

pub struct XClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl XClient {
    pub fn new(token: String) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, token)
    }

    pub fn with_base_url(base_url: &str, token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Fetch one page of replies to a conversation via recent search.
    pub async fn search_conversation(
        &self,
        conversation_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<Tweet>> {
        let query = format!("conversation_id:{conversation_id}");
        let mut params = vec![
            ("query", query.as_str()),
            ("max_results", SEARCH_PAGE_SIZE),
            ("tweet.fields", TWEET_FIELDS),
        ];
        if let Some(token) = next_token {
            params.push(("next_token", token));
        }

        let resp: ListResponse<Tweet> = self.get("/tweets/search/recent", &params).await?;
        let page = into_page(resp)?;
        tracing::debug!(
            conversation_id,
            count = page.items.len(),
            has_next = page.next_token.is_some(),
            "Fetched conversation page"
        );
        Ok(page)
    }

    /// Look up a single user by handle.
    pub async fn user_by_username(&self, username: &str) -> Result<User> {
        let path = format!("/users/by/username/{username}");
        let resp: SingleResponse<User> = self.get(&path, &[("user.fields", USER_FIELDS)]).await?;
        match resp.data {
            Some(user) => Ok(user),
            None => Err(problems_to_error(resp.errors, &format!("user {username} not found"))),
        }
    }

    /// Fetch one page of a user's followers. Only id, name and username are populated.
    pub async fn followers(
        &self,
        user_id: &str,
        pagination_token: Option<&str>,
    ) -> Result<Page<User>> {
        let path = format!("/users/{user_id}/followers");
        let mut params = vec![("max_results", FOLLOWERS_PAGE_SIZE)];
        if let Some(token) = pagination_token {
            params.push(("pagination_token", token));
        }

        let resp: ListResponse<User> = self.get(&path, &params).await?;
        let page = into_page(resp)?;
        tracing::debug!(
            user_id,
            count = page.items.len(),
            has_next = page.next_token.is_some(),
            "Fetched followers page"
        );
        Ok(page)
    }

    /// Look up full profiles for up to [`MAX_USERS_PER_LOOKUP`] ids.
    ///
    /// Ids that no longer resolve (suspended, deleted) are omitted from the
    /// result rather than failing the call.
    pub async fn users_by_ids(&self, ids: &[String]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        if ids.len() > MAX_USERS_PER_LOOKUP {
            return Err(XError::Api {
                status: 400,
                message: format!(
                    "at most {MAX_USERS_PER_LOOKUP} ids per lookup, got {}",
                    ids.len()
                ),
            });
        }

        let joined = ids.join(",");
        let params = [("ids", joined.as_str()), ("user.fields", USER_FIELDS)];
        let resp: ListResponse<User> = self.get("/users", &params).await?;
        if let Some(errors) = &resp.errors {
            for problem in errors {
                tracing::warn!(error = %problem.message(), "User lookup returned partial error");
            }
        }
        Ok(resp.data.unwrap_or_default())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(XError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn into_page<T>(resp: ListResponse<T>) -> Result<Page<T>> {
    if resp.data.is_none() && resp.meta.is_none() {
        return Err(problems_to_error(resp.errors, "response carried neither data nor meta"));
    }
    Ok(Page {
        items: resp.data.unwrap_or_default(),
        next_token: resp.meta.and_then(|m| m.next_token),
    })
}

fn problems_to_error(problems: Option<Vec<ApiProblem>>, fallback: &str) -> XError {
    let message = problems
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.iter()
                .map(ApiProblem::message)
                .collect::<Vec<_>>()
                .join("; ")
        })
        .unwrap_or_else(|| fallback.to_string());
    XError::Api {
        status: 200,
        message,
    }
}
