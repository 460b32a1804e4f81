//! Tests for single and batch video verification.

use std::sync::Arc;

use pathwise_core::video::{MAX_IDS_PER_REQUEST, VideoLookup, VideoVerification};
use pathwise_test_utils::{StubVideoBackend, public_video, video_item};

/// An 11-character id accepted as a bare reference.
fn id(n: usize) -> String {
    format!("vid{n:08}")
}

fn lookup(backend: &Arc<StubVideoBackend>) -> VideoLookup {
    VideoLookup::new(backend.clone())
}

// ---------------------------------------------------------------------------
// Single verification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn verify_reports_metadata_for_public_video() {
    let backend = Arc::new(StubVideoBackend::new().with_video(public_video("dQw4w9WgXcQ")));

    let result = lookup(&backend)
        .verify("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        .await;

    assert!(result.is_valid);
    assert!(result.is_public);
    assert_eq!(result.error, None);
    assert_eq!(result.title.as_deref(), Some("Title dQw4w9WgXcQ"));
    assert_eq!(result.channel_title.as_deref(), Some("Stub Channel"));
    assert_eq!(result.duration.as_deref(), Some("12:05"));
    assert_eq!(result.view_count.as_deref(), Some("1000"));
    assert_eq!(backend.list_calls(), vec![vec!["dQw4w9WgXcQ".to_string()]]);
}

#[tokio::test]
async fn verify_rejects_unparseable_reference_without_calling_backend() {
    let backend = Arc::new(StubVideoBackend::new());

    let result = lookup(&backend).verify("https://vimeo.com/1234").await;

    assert_eq!(
        result,
        VideoVerification::invalid("Invalid YouTube URL or video ID")
    );
    assert!(backend.list_calls().is_empty());
}

#[tokio::test]
async fn verify_unknown_id_is_not_found() {
    let backend = Arc::new(StubVideoBackend::new());

    let result = lookup(&backend).verify(&id(1)).await;

    assert!(!result.is_valid);
    assert_eq!(result.error.as_deref(), Some("Video not found"));
}

#[tokio::test]
async fn verify_private_and_non_embeddable_videos() {
    let backend = Arc::new(
        StubVideoBackend::new()
            .with_video(video_item(&id(1), "unlisted", Some(true)))
            .with_video(video_item(&id(2), "public", Some(false))),
    );
    let lookup = lookup(&backend);

    let unlisted = lookup.verify(&id(1)).await;
    assert!(unlisted.is_valid);
    assert!(!unlisted.is_public);
    assert_eq!(unlisted.error.as_deref(), Some("Video is not public"));

    let locked = lookup.verify(&id(2)).await;
    assert!(locked.is_valid);
    assert!(!locked.is_public);
    assert_eq!(locked.error.as_deref(), Some("Video is not embeddable"));
}

#[tokio::test]
async fn verify_backend_failure_is_reported_not_raised() {
    let backend = Arc::new(StubVideoBackend::new().failing_list_for(id(1)));

    let result = lookup(&backend).verify(&id(1)).await;

    assert!(!result.is_valid);
    let error = result.error.expect("error message");
    assert!(error.starts_with("API Error: "), "got {error}");
}

// ---------------------------------------------------------------------------
// Batch verification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn batch_splits_into_requests_of_at_most_fifty_ids() {
    let refs: Vec<String> = (0..120).map(id).collect();
    let mut backend = StubVideoBackend::new();
    for r in &refs {
        backend = backend.with_video(public_video(r));
    }
    let backend = Arc::new(backend);

    let results = lookup(&backend).verify_batch(&refs).await;

    let sizes: Vec<usize> = backend.list_calls().iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![50, 50, 20]);
    assert!(sizes.iter().all(|&n| n <= MAX_IDS_PER_REQUEST));

    assert_eq!(results.len(), 120);
    for (entry, reference) in results.iter().zip(&refs) {
        assert_eq!(&entry.reference, reference);
        assert!(entry.result.is_valid);
        assert!(entry.result.is_public);
    }
}

#[tokio::test]
async fn batch_failed_chunk_only_affects_its_own_references() {
    let refs: Vec<String> = (0..60).map(id).collect();
    let mut backend = StubVideoBackend::new().failing_list_for(id(55));
    for r in &refs {
        backend = backend.with_video(public_video(r));
    }
    let backend = Arc::new(backend);

    let results = lookup(&backend).verify_batch(&refs).await;

    assert_eq!(results.len(), 60);
    for entry in &results[..50] {
        assert!(entry.result.is_valid, "{} should be valid", entry.reference);
    }
    for entry in &results[50..] {
        assert!(!entry.result.is_valid);
        assert!(
            entry.result.error.as_deref().unwrap().starts_with("API Error: "),
            "{:?}",
            entry.result.error
        );
    }
}

#[tokio::test]
async fn batch_mixes_invalid_missing_and_restricted_references() {
    let backend = Arc::new(
        StubVideoBackend::new()
            .with_video(public_video(&id(1)))
            .with_video(video_item(&id(2), "private", Some(true)))
            .with_video(video_item(&id(3), "public", Some(false))),
    );
    let refs = vec![
        format!("https://youtu.be/{}", id(1)),
        "not a video".to_string(),
        id(2),
        id(3),
        id(4),
    ];

    let results = lookup(&backend).verify_batch(&refs).await;

    assert_eq!(results.len(), 5);
    assert_eq!(results[0].reference, refs[0]);
    assert!(results[0].result.is_public);

    assert_eq!(
        results[1].result,
        VideoVerification::invalid("Invalid YouTube URL")
    );

    assert!(results[2].result.is_valid);
    assert_eq!(
        results[2].result.error.as_deref(),
        Some("Video is private or unlisted")
    );

    assert!(results[3].result.is_valid);
    assert_eq!(
        results[3].result.error.as_deref(),
        Some("Video embedding disabled")
    );

    assert!(!results[4].result.is_valid);
    assert_eq!(
        results[4].result.error.as_deref(),
        Some("Video not found or unavailable")
    );

    // The invalid reference never reaches the backend.
    assert_eq!(backend.list_calls(), vec![vec![id(1), id(2), id(3), id(4)]]);
}

#[tokio::test]
async fn batch_deduplicates_ids_but_keeps_one_result_per_reference() {
    let backend = Arc::new(StubVideoBackend::new().with_video(public_video(&id(7))));
    let refs = vec![
        id(7),
        format!("https://www.youtube.com/watch?v={}", id(7)),
        format!("https://youtu.be/{}", id(7)),
    ];

    let results = lookup(&backend).verify_batch(&refs).await;

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.result.is_public));
    assert_eq!(backend.list_calls(), vec![vec![id(7)]]);
}

#[tokio::test]
async fn batch_of_only_invalid_references_makes_no_calls() {
    let backend = Arc::new(StubVideoBackend::new());
    let refs = vec!["nope".to_string(), "https://example.com".to_string()];

    let results = lookup(&backend).verify_batch(&refs).await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| !r.result.is_valid));
    assert!(backend.list_calls().is_empty());
}

#[tokio::test]
async fn empty_batch_is_empty() {
    let backend = Arc::new(StubVideoBackend::new());
    assert!(lookup(&backend).verify_batch(&[]).await.is_empty());
    assert!(backend.list_calls().is_empty());
}
