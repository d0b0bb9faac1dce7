use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::Instrument;
use typed_builder::TypedBuilder;
use uuid::Uuid;

use threaddrop_common::config::DEFAULT_MAX_FOLLOWERS;
use threaddrop_common::{FollowerProfile, ThreadDropError};
use x_client::MAX_USERS_PER_LOOKUP;

use crate::pipeline::accumulate::collect_follower_ids;
use crate::pipeline::stats::RunStats;
use crate::sink::write_follower_documents;
use crate::traits::FollowerSource;

/// Handle → follower ids → profiles.
#[derive(Clone, TypedBuilder)]
pub struct FollowerPipeline {
    source: Arc<dyn FollowerSource>,
    #[builder(default = DEFAULT_MAX_FOLLOWERS)]
    max_followers: usize,
}

#[derive(Debug)]
pub struct FollowerRunOutcome {
    pub run_id: Uuid,
    pub user_id: String,
    pub ids: Vec<String>,
    /// Same order as `ids`; accounts whose lookup returned nothing are absent.
    pub profiles: Vec<FollowerProfile>,
    pub stats: RunStats,
}

impl FollowerPipeline {
    pub async fn collect(&self, handle: &str) -> Result<FollowerRunOutcome, ThreadDropError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("follower_run", %run_id, handle);

        async move {
            let mut stats = RunStats::default();

            let user_id = self
                .source
                .user_id(handle)
                .await
                .map_err(ThreadDropError::fetch)?;
            tracing::info!(user_id = user_id.as_str(), "Resolved handle");

            let ids = collect_follower_ids(
                self.source.as_ref(),
                &user_id,
                self.max_followers,
                &mut stats,
            )
            .await?;

            let profiles = self.lookup_profiles(&ids, &mut stats).await?;
            tracing::info!(
                followers = ids.len(),
                profiles = profiles.len(),
                "Follower collection complete"
            );

            Ok(FollowerRunOutcome {
                run_id,
                user_id,
                ids,
                profiles,
                stats,
            })
        }
        .instrument(span)
        .await
    }

    /// Look up profiles in chunks, re-sequencing each response to input order.
    async fn lookup_profiles(
        &self,
        ids: &[String],
        stats: &mut RunStats,
    ) -> Result<Vec<FollowerProfile>, ThreadDropError> {
        let mut profiles = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(MAX_USERS_PER_LOOKUP) {
            let found = self
                .source
                .profiles(chunk)
                .await
                .map_err(ThreadDropError::fetch)?;
            let mut by_id: HashMap<String, FollowerProfile> =
                found.into_iter().map(|p| (p.id.clone(), p)).collect();

            for id in chunk {
                match by_id.remove(id) {
                    Some(profile) => profiles.push(profile),
                    None => tracing::warn!(id = id.as_str(), "No profile returned for follower"),
                }
            }
        }

        stats.profiles_fetched = profiles.len() as u32;
        Ok(profiles)
    }
}

impl FollowerRunOutcome {
    /// Write `followers.json` and `profiles.json` under `dir`.
    pub fn write(&self, dir: &Path) -> Result<(PathBuf, PathBuf), ThreadDropError> {
        write_follower_documents(dir, &self.ids, &self.profiles)
    }
}
