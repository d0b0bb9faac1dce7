//! Accumulate phase: walk a cursor until the source runs out.

use threaddrop_common::{SourceItem, ThreadDropError};

use crate::pipeline::stats::RunStats;
use crate::traits::{FollowerSource, PostSource};

/// Fetch every page from `source`, appending in page order.
///
/// Stops on the first page without a next token. Any fetch failure aborts the
/// phase and the items gathered so far are discarded with it.
pub async fn collect_posts(
    source: &dyn PostSource,
    stats: &mut RunStats,
) -> Result<Vec<SourceItem>, ThreadDropError> {
    let mut items = Vec::new();
    let mut next_token: Option<String> = None;

    loop {
        let page = source
            .fetch_page(next_token.as_deref())
            .await
            .map_err(ThreadDropError::fetch)?;

        stats.pages_fetched += 1;
        stats.items_fetched += page.items.len() as u32;
        tracing::info!(
            page = stats.pages_fetched,
            count = page.items.len(),
            total = items.len() + page.items.len(),
            "Fetched page"
        );
        items.extend(page.items);

        match page.next_token {
            Some(token) => next_token = Some(token),
            None => break,
        }
    }

    Ok(items)
}

/// Fetch follower ids for `user_id` until the listing ends or `max` ids are held.
///
/// The final page is truncated so exactly `max` ids are returned when the
/// account has at least that many followers.
pub async fn collect_follower_ids(
    source: &dyn FollowerSource,
    user_id: &str,
    max: usize,
    stats: &mut RunStats,
) -> Result<Vec<String>, ThreadDropError> {
    let mut ids: Vec<String> = Vec::new();
    let mut next_token: Option<String> = None;

    while ids.len() < max {
        let page = source
            .follower_ids(user_id, next_token.as_deref())
            .await
            .map_err(ThreadDropError::fetch)?;

        stats.pages_fetched += 1;
        stats.items_fetched += page.items.len() as u32;
        ids.extend(page.items);
        tracing::info!(user_id, total = ids.len(), max, "Fetched follower page");

        match page.next_token {
            Some(token) => next_token = Some(token),
            None => break,
        }
    }

    if ids.len() > max {
        stats.items_fetched -= (ids.len() - max) as u32;
        ids.truncate(max);
    }
    Ok(ids)
}
