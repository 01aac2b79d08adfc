//! Feed loop tests with a scripted source and paused tokio time.
//!
//! The filler-splice behavior asserted here is a UI-liveness simulation:
//! the spliced insight is synthesized client-side and does not reflect
//! actual new backend data.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use insightflow_client::{normalize, InsightError, InsightParams, InsightResultSet};
use insightflow_feed::{FeedOptions, FeedSnapshot, InsightFeed, InsightSource};
use tokio::sync::watch;

/// Source that returns a fixed one-insight payload, failing from the given
/// call number onward.
struct ScriptedSource {
    calls: Arc<AtomicUsize>,
    fail_from_call: Option<usize>,
}

impl ScriptedSource {
    fn new(fail_from_call: Option<usize>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: Arc::clone(&calls),
                fail_from_call,
            },
            calls,
        )
    }
}

#[async_trait]
impl InsightSource for ScriptedSource {
    async fn fetch(&self, _params: &InsightParams) -> Result<InsightResultSet, InsightError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_from_call.is_some_and(|from| call >= from) {
            return Err(InsightError::Api("backend unavailable".to_string()));
        }
        Ok(normalize(&serde_json::json!({
            "platforms": {
                "twitter": {
                    "insights": [
                        { "title": "Real Insight", "summary": "from backend", "sentiment": "positive" }
                    ]
                }
            },
            "summary": { "totalPosts": 1, "dominantSentiment": "Positive", "topPlatform": "Twitter" }
        })))
    }
}

fn options(poll_interval_ms: u64, realtime: bool) -> FeedOptions {
    FeedOptions {
        poll_interval: Duration::from_millis(poll_interval_ms),
        realtime,
    }
}

async fn wait_until_loaded(rx: &mut watch::Receiver<FeedSnapshot>) -> FeedSnapshot {
    loop {
        let snapshot = rx.borrow().clone();
        if !snapshot.is_loading {
            return snapshot;
        }
        rx.changed().await.expect("feed task should stay alive");
    }
}

#[tokio::test(start_paused = true)]
async fn initial_load_populates_snapshot() {
    let (source, calls) = ScriptedSource::new(None);
    let feed = InsightFeed::spawn(source, InsightParams::default(), options(100, true));
    let mut rx = feed.subscribe();

    let snapshot = wait_until_loaded(&mut rx).await;
    assert!(!snapshot.is_loading);
    assert!(snapshot.error.is_none());
    assert!(!snapshot.has_new_insights);
    let data = snapshot.data.expect("initial load should cache data");
    assert_eq!(data.insights.len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn realtime_disabled_suspends_polling_entirely() {
    let (source, calls) = ScriptedSource::new(None);
    let feed = InsightFeed::spawn(source, InsightParams::default(), options(100, false));
    let mut rx = feed.subscribe();
    wait_until_loaded(&mut rx).await;

    // Several full poll intervals pass without a single background request.
    tokio::time::sleep(Duration::from_millis(550)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Re-enabling resumes the cadence.
    feed.set_realtime(true).await;
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(calls.load(Ordering::SeqCst) > 1);
}

#[tokio::test(start_paused = true)]
async fn background_poll_flags_and_splices_filler() {
    let (source, calls) = ScriptedSource::new(None);
    let feed = InsightFeed::spawn(source, InsightParams::default(), options(100, true));
    let mut rx = feed.subscribe();
    wait_until_loaded(&mut rx).await;

    tokio::time::sleep(Duration::from_millis(150)).await;

    let snapshot = feed.snapshot();
    assert!(calls.load(Ordering::SeqCst) >= 2);
    assert!(snapshot.has_new_insights);
    let data = snapshot.data.expect("data should remain cached");
    // One synthesized filler spliced onto the front of the fresh result.
    assert_eq!(data.insights.len(), 2);
    assert_ne!(data.insights[0].title, "Real Insight");
    assert_eq!(data.insights[1].title, "Real Insight");
}

#[tokio::test(start_paused = true)]
async fn acknowledge_dismisses_new_insight_flag() {
    let (source, _calls) = ScriptedSource::new(None);
    let feed = InsightFeed::spawn(source, InsightParams::default(), options(100, true));
    let mut rx = feed.subscribe();
    wait_until_loaded(&mut rx).await;

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(feed.snapshot().has_new_insights);

    // Mark the poll publication as seen so the next change is the dismissal.
    rx.borrow_and_update();
    feed.acknowledge_new_insights().await;
    rx.changed().await.expect("feed task should stay alive");
    assert!(!feed.snapshot().has_new_insights);
}

#[tokio::test(start_paused = true)]
async fn poll_failure_keeps_stale_data_visible() {
    let (source, calls) = ScriptedSource::new(Some(2));
    let feed = InsightFeed::spawn(source, InsightParams::default(), options(100, true));
    let mut rx = feed.subscribe();
    wait_until_loaded(&mut rx).await;

    tokio::time::sleep(Duration::from_millis(150)).await;

    let snapshot = feed.snapshot();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let error = snapshot.error.expect("failure should surface a message");
    assert!(error.contains("backend unavailable"), "got: {error}");
    // Previous data stays visible, without any filler splice.
    let data = snapshot.data.expect("stale data should remain");
    assert_eq!(data.insights.len(), 1);
    assert_eq!(data.insights[0].title, "Real Insight");
}

#[tokio::test(start_paused = true)]
async fn refetch_replaces_cache_without_filler_and_clears_flag() {
    let (source, calls) = ScriptedSource::new(None);
    let feed = InsightFeed::spawn(source, InsightParams::default(), options(100, true));
    let mut rx = feed.subscribe();
    wait_until_loaded(&mut rx).await;

    // Let one background poll flag and splice first.
    tokio::time::sleep(Duration::from_millis(110)).await;
    assert!(feed.snapshot().has_new_insights);

    feed.refetch().await.expect("manual refetch should succeed");

    let snapshot = feed.snapshot();
    assert!(!snapshot.has_new_insights);
    assert!(snapshot.error.is_none());
    let data = snapshot.data.expect("refetch should cache fresh data");
    assert_eq!(data.insights.len(), 1, "manual refetch must not splice filler");
    assert!(calls.load(Ordering::SeqCst) >= 3);
}

#[tokio::test(start_paused = true)]
async fn refetch_surfaces_error_message() {
    let (source, _calls) = ScriptedSource::new(Some(2));
    let feed = InsightFeed::spawn(source, InsightParams::default(), options(100, false));
    let mut rx = feed.subscribe();
    wait_until_loaded(&mut rx).await;

    let err = feed.refetch().await.expect_err("scripted failure");
    assert!(err.contains("backend unavailable"), "got: {err}");

    let snapshot = feed.snapshot();
    assert_eq!(snapshot.error.as_deref(), Some(err.as_str()));
    assert!(snapshot.data.is_some(), "stale data should remain");
}
