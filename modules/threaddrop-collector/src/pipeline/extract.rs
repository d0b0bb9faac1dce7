//! Extract+Resolve phase: text → candidates → canonical addresses.

use std::collections::HashSet;

use futures::stream::{self, StreamExt};

use threaddrop_common::{
    extract_candidates, validate_address, CandidateKind, CanonicalAddress, RawCandidate,
    SourceItem, Validation,
};

use crate::pipeline::stats::RunStats;
use crate::resolution::{NameLookup, Resolution};

/// What happened to one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CandidateOutcome {
    Accepted(CanonicalAddress),
    Rejected,
    Resolved(CanonicalAddress),
    Unresolved,
}

/// Match every item, then validate or resolve every candidate.
///
/// Output order is discovery order: items in the order given, and within an
/// item the address candidate before the name candidate. With
/// `concurrency > 1` name lookups overlap but results are re-sequenced to the
/// same order.
pub async fn extract_addresses(
    items: &[SourceItem],
    resolution: &Resolution,
    concurrency: usize,
    stats: &mut RunStats,
) -> Vec<CanonicalAddress> {
    let candidates: Vec<RawCandidate> = items
        .iter()
        .flat_map(|item| {
            let found = extract_candidates(&item.text);
            if !found.is_empty() {
                tracing::debug!(item_id = item.id.as_str(), count = found.len(), "Matched candidates");
            }
            found
        })
        .collect();

    for candidate in &candidates {
        match candidate.kind {
            CandidateKind::Address => stats.address_candidates += 1,
            CandidateKind::Name => stats.name_candidates += 1,
        }
    }
    tracing::info!(
        addresses = stats.address_candidates,
        names = stats.name_candidates,
        resolving = resolution.is_enabled(),
        "Extracted candidates"
    );

    let outcomes: Vec<CandidateOutcome> = stream::iter(candidates)
        .map(|candidate| process_candidate(candidate, resolution))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut addresses = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            CandidateOutcome::Accepted(addr) => addresses.push(addr),
            CandidateOutcome::Resolved(addr) => {
                stats.names_resolved += 1;
                addresses.push(addr);
            }
            CandidateOutcome::Rejected => stats.addresses_rejected += 1,
            CandidateOutcome::Unresolved => stats.names_unresolved += 1,
        }
    }
    addresses
}

async fn process_candidate(candidate: RawCandidate, resolution: &Resolution) -> CandidateOutcome {
    match candidate.kind {
        CandidateKind::Address => match validate_address(&candidate.token) {
            Validation::Valid(addr) => CandidateOutcome::Accepted(addr),
            Validation::Invalid { observed, reason } => {
                tracing::debug!(candidate = observed.as_str(), %reason, "Rejected address candidate");
                CandidateOutcome::Rejected
            }
        },
        CandidateKind::Name => match resolution.lookup(&candidate.token).await {
            NameLookup::Found(resolved) => match validate_address(&resolved).into_canonical() {
                Some(addr) => CandidateOutcome::Resolved(addr),
                None => {
                    tracing::warn!(
                        name = candidate.token.as_str(),
                        resolved = resolved.as_str(),
                        "Resolver returned a malformed address"
                    );
                    CandidateOutcome::Unresolved
                }
            },
            NameLookup::Miss | NameLookup::Skipped => CandidateOutcome::Unresolved,
        },
    }
}

/// Keep the first occurrence of each address. Returns the list and the number removed.
pub fn dedup_addresses(addresses: Vec<CanonicalAddress>) -> (Vec<CanonicalAddress>, usize) {
    let before = addresses.len();
    let mut seen = HashSet::with_capacity(before);
    let kept: Vec<CanonicalAddress> = addresses
        .into_iter()
        .filter(|a| seen.insert(a.clone()))
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}
