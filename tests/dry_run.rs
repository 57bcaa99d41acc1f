//! End-to-end runs of the sender in dry-run mode.

use clap::Parser;
use eventhub_sender::{SenderOpts, ADDITIONAL_LABEL, ORIGINAL_LABEL};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn listings_csv(rows: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "id,body").unwrap();
    for i in 0..rows {
        let body = serde_json::json!({
            "listing_id": 1000 + i,
            "date": format!("2024-01-{:02}", i % 28 + 1),
            "price": 100 + i,
        })
        .to_string();
        writeln!(file, "{i},\"{}\"", body.replace('"', "\"\"")).unwrap();
    }
    file.flush().unwrap();
    file
}

fn opts(args: &[&str]) -> SenderOpts {
    SenderOpts::parse_from(std::iter::once("eventhub-sender").chain(args.iter().copied()))
}

#[tokio::test(start_paused = true)]
async fn test_dry_run_sends_both_variants() {
    let csv = listings_csv(25);
    let path = csv.path().to_str().unwrap();

    let mut metrics = eventhub_sender::run(opts(&["--df-path", path, "--dry-run", "--seed", "7"]))
        .await
        .unwrap();
    metrics.sort_by(|a, b| a.label.cmp(&b.label));

    assert_eq!(metrics.len(), 2);

    let additional = &metrics[0];
    assert_eq!(additional.label, ADDITIONAL_LABEL);
    assert_eq!(additional.messages_sent, 25);
    assert_eq!(additional.batches_sent, 3);
    assert!(additional.total_duration >= Duration::from_secs(24));

    let original = &metrics[1];
    assert_eq!(original.label, ORIGINAL_LABEL);
    assert_eq!(original.messages_sent, 25);
    assert_eq!(original.batches_sent, 3);
    assert!(original.total_duration >= Duration::from_secs(18));
}

#[tokio::test(start_paused = true)]
async fn test_dry_run_custom_batch_size_and_partition() {
    let csv = listings_csv(4);
    let path = csv.path().to_str().unwrap();

    let metrics = eventhub_sender::run(opts(&[
        "--df-path",
        path,
        "--dry-run",
        "--batch-size",
        "3",
        "--partition",
        "2",
        "--base-interval",
        "1s",
        "--augmented-interval",
        "1s",
    ]))
    .await
    .unwrap();

    for m in &metrics {
        assert_eq!(m.messages_sent, 4);
        assert_eq!(m.batches_sent, 2);
        assert_eq!(m.partition.get(), 2);
    }
}

#[tokio::test]
async fn test_requires_connection_string() {
    let csv = listings_csv(1);
    let path = csv.path().to_str().unwrap();

    let err = eventhub_sender::run(opts(&["--df-path", path, "--connection-string", ""]))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("--connection-string"));
}

#[tokio::test]
async fn test_missing_file() {
    let err = eventhub_sender::run(opts(&[
        "--df-path",
        "/nonexistent/listings.csv",
        "--dry-run",
    ]))
    .await
    .unwrap_err();
    assert!(format!("{err:#}").contains("Failed to load events"));
}
