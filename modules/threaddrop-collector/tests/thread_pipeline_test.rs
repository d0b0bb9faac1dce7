//! End-to-end thread runs against in-memory collaborators.
//!
//! MockPostSource → ThreadPipeline::collect() → BatchWriter → files in a tempdir.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use threaddrop_collector::batch::BatchWriter;
use threaddrop_collector::pipeline::ThreadPipeline;
use threaddrop_collector::resolution::Resolution;
use threaddrop_collector::testing::{fixture_address, MockPostSource, MockResolver, VITALIK};
use threaddrop_common::ThreadDropError;

fn pipeline(source: MockPostSource, amount: u64) -> ThreadPipeline {
    ThreadPipeline::builder()
        .source(Arc::new(source))
        .amount(amount)
        .build()
}

#[tokio::test]
async fn address_in_reply_lands_in_first_batch() {
    let source = MockPostSource::new().page(&["send to 0xABCDEF1234567890ABCDEF1234567890ABCDEF12 thanks"]);
    let dir = tempfile::tempdir().unwrap();

    let mut outcome = pipeline(source, 10).collect().await.unwrap();
    outcome.write(&BatchWriter::new(dir.path())).unwrap();

    let content = fs::read_to_string(dir.path().join("batch-0.txt")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1);
    let (address, amount) = lines[0].split_once(", ").unwrap();
    assert_eq!(address.to_lowercase(), "0xabcdef1234567890abcdef1234567890abcdef12");
    assert_eq!(amount, "10");
    assert_eq!(outcome.stats.batches_written, 1);
}

#[tokio::test]
async fn name_without_endpoint_is_dropped() {
    let source = MockPostSource::new().page(&["my name is Vitalik.ETH friend"]);
    let dir = tempfile::tempdir().unwrap();

    let mut outcome = pipeline(source, 10).collect().await.unwrap();
    let paths = outcome.write(&BatchWriter::new(dir.path())).unwrap();

    assert!(outcome.addresses.is_empty());
    assert!(paths.is_empty());
    assert_eq!(outcome.stats.name_candidates, 1);
    assert_eq!(outcome.stats.names_unresolved, 1);
    assert!(!dir.path().join("batch-0.txt").exists());
}

#[tokio::test]
async fn two_hundred_fifty_addresses_make_three_files() {
    let texts: Vec<String> = (0..250)
        .map(|i| format!("gm, my wallet is {}", fixture_address(i)))
        .collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    // Spread across pages so order also has to survive pagination.
    let source = MockPostSource::new()
        .page(&refs[..90])
        .page(&refs[90..180])
        .page(&refs[180..]);
    let dir = tempfile::tempdir().unwrap();

    let mut outcome = pipeline(source, 5).collect().await.unwrap();
    outcome.write(&BatchWriter::new(dir.path())).unwrap();

    let counts: Vec<usize> = (0..3)
        .map(|n| {
            fs::read_to_string(dir.path().join(format!("batch-{n}.txt")))
                .unwrap()
                .lines()
                .count()
        })
        .collect();
    assert_eq!(counts, vec![100, 100, 50]);
    assert!(!dir.path().join("batch-3.txt").exists());

    let second = fs::read_to_string(dir.path().join("batch-1.txt")).unwrap();
    let first_line = second.lines().next().unwrap();
    assert!(first_line.to_lowercase().starts_with(&fixture_address(100)));
}

#[tokio::test]
async fn pagination_stops_at_missing_token() {
    let source = Arc::new(MockPostSource::new().page(&["a"]).page(&["b"]));
    let outcome = ThreadPipeline::builder()
        .source(source.clone())
        .amount(1)
        .build()
        .collect()
        .await
        .unwrap();

    assert_eq!(outcome.stats.pages_fetched, 2);
    assert_eq!(source.calls(), vec![None, Some("cursor-1".to_string())]);
}

#[tokio::test]
async fn fetch_failure_writes_nothing() {
    let source = MockPostSource::new()
        .page(&[VITALIK])
        .page(&["more"])
        .failing_at(1);

    let err = pipeline(source, 1).collect().await.unwrap_err();

    assert!(matches!(err, ThreadDropError::Fetch(_)));
}

#[tokio::test]
async fn duplicates_kept_by_default_and_removed_on_request() {
    let texts = [VITALIK, "again 0xd8da6bf26964af9d7eed9e03e53415d37aa96045", "vitalik.eth"];
    let resolver = Arc::new(MockResolver::new().on_name("vitalik.eth", VITALIK));

    let kept = ThreadPipeline::builder()
        .source(Arc::new(MockPostSource::new().page(&texts)))
        .amount(1)
        .resolution(Resolution::WithResolution(resolver.clone()))
        .build()
        .collect()
        .await
        .unwrap();
    assert_eq!(kept.addresses.len(), 3);

    let deduped = ThreadPipeline::builder()
        .source(Arc::new(MockPostSource::new().page(&texts)))
        .amount(1)
        .resolution(Resolution::WithResolution(resolver))
        .dedup(true)
        .build()
        .collect()
        .await
        .unwrap();
    assert_eq!(deduped.addresses.len(), 1);
    assert_eq!(deduped.addresses[0].as_str(), VITALIK);
    assert_eq!(deduped.stats.duplicates_removed, 2);
}

#[tokio::test]
async fn concurrent_resolution_matches_sequential_order() {
    let mut resolver = MockResolver::new();
    let mut texts = Vec::new();
    for i in 0..40 {
        if i % 3 == 0 {
            let name = format!("holder{i}.eth");
            resolver = resolver
                .on_name(&name, &fixture_address(1000 + i))
                .delayed(&name, Duration::from_millis(40 - i as u64));
            texts.push(format!("ENS: {}", name.to_uppercase()));
        } else {
            texts.push(format!("addr {}", fixture_address(i)));
        }
    }
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let resolver = Arc::new(resolver);

    let run = |concurrency: usize| {
        let resolver = resolver.clone();
        let source = MockPostSource::new().page(&refs);
        async move {
            ThreadPipeline::builder()
                .source(Arc::new(source))
                .amount(1)
                .resolution(Resolution::WithResolution(resolver))
                .resolve_concurrency(concurrency)
                .build()
                .collect()
                .await
                .unwrap()
                .addresses
        }
    };

    let sequential = run(1).await;
    let concurrent = run(8).await;

    assert_eq!(sequential.len(), 40);
    assert_eq!(sequential, concurrent);
}

#[tokio::test]
async fn write_failure_keeps_results_in_memory() {
    let texts: Vec<String> = (0..120)
        .map(|i| format!("wallet {}", fixture_address(i)))
        .collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "occupied").unwrap();
    let writer = BatchWriter::new(&blocker);

    let mut outcome = pipeline(MockPostSource::new().page(&refs), 7)
        .collect()
        .await
        .unwrap();
    let err = outcome.write(&writer).unwrap_err();

    match err {
        ThreadDropError::Filesystem { path, .. } => assert_eq!(path, writer.dir()),
        other => panic!("expected Filesystem error, got {other:?}"),
    }
    assert_eq!(outcome.addresses.len(), 120);
    assert_eq!(outcome.batches.len(), 2);
    assert_eq!(outcome.stats.batches_written, 0);

    let lines: Vec<String> = outcome.lines().collect();
    assert_eq!(lines.len(), 120);
    assert_eq!(lines[0], format!("{}, 7", outcome.addresses[0]));
    assert!(lines[119].ends_with(", 7"));
}
