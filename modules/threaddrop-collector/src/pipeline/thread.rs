use std::path::PathBuf;
use std::sync::Arc;

use tracing::Instrument;
use typed_builder::TypedBuilder;
use uuid::Uuid;

use threaddrop_common::{Batch, CanonicalAddress, ThreadDropError};

use crate::batch::{plan_batches, BatchWriter};
use crate::pipeline::accumulate::collect_posts;
use crate::pipeline::extract::{dedup_addresses, extract_addresses};
use crate::pipeline::stats::RunStats;
use crate::resolution::Resolution;
use crate::traits::PostSource;

/// Replies → address list → batches, for one conversation.
#[derive(Clone, TypedBuilder)]
pub struct ThreadPipeline {
    source: Arc<dyn PostSource>,
    amount: u64,
    #[builder(default = Resolution::NoResolution)]
    resolution: Resolution,
    #[builder(default = 1)]
    resolve_concurrency: usize,
    /// Duplicates are kept unless this is set.
    #[builder(default)]
    dedup: bool,
}

/// Everything a thread run produced, held in memory until written.
#[derive(Debug)]
pub struct ThreadRunOutcome {
    pub run_id: Uuid,
    pub addresses: Vec<CanonicalAddress>,
    pub batches: Vec<Batch>,
    pub stats: RunStats,
}

impl ThreadPipeline {
    /// Run the Accumulate and Extract+Resolve phases and plan batches. Nothing is written.
    pub async fn collect(&self) -> Result<ThreadRunOutcome, ThreadDropError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("thread_run", %run_id);

        async move {
            let mut stats = RunStats::default();

            let items = collect_posts(self.source.as_ref(), &mut stats).await?;
            tracing::info!(items = items.len(), pages = stats.pages_fetched, "Accumulate phase complete");

            let mut addresses = extract_addresses(
                &items,
                &self.resolution,
                self.resolve_concurrency,
                &mut stats,
            )
            .await;

            if self.dedup {
                let (kept, removed) = dedup_addresses(addresses);
                stats.duplicates_removed = removed as u32;
                addresses = kept;
            }
            stats.addresses_final = addresses.len() as u32;

            let batches = plan_batches(&addresses, self.amount);
            tracing::info!(
                addresses = addresses.len(),
                batches = batches.len(),
                "Extract phase complete"
            );

            Ok(ThreadRunOutcome {
                run_id,
                addresses,
                batches,
                stats,
            })
        }
        .instrument(span)
        .await
    }
}

impl ThreadRunOutcome {
    /// Append every batch through `writer`. On failure the outcome is left intact for recovery.
    pub fn write(&mut self, writer: &BatchWriter) -> Result<Vec<PathBuf>, ThreadDropError> {
        let paths = writer.write(&self.batches)?;
        self.stats.batches_written = paths.len() as u32;
        Ok(paths)
    }

    /// All batch lines in order, for dumping when the write fails.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.batches
            .iter()
            .flat_map(|b| b.entries.iter().map(|e| e.to_line()))
    }
}
