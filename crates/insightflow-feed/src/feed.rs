use std::sync::Arc;
use std::time::Duration;

use insightflow_client::{filler_insight, InsightParams, InsightResultSet};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::source::InsightSource;

/// Fraction of the poll interval that must elapse before a successful
/// background refetch is flagged as "new insights".
const NEW_INSIGHT_THRESHOLD: f64 = 0.9;

/// Options controlling the feed's poll loop.
#[derive(Debug, Clone)]
pub struct FeedOptions {
    /// Cadence of background refetches while realtime is enabled.
    pub poll_interval: Duration,
    /// Whether background polling starts enabled.
    pub realtime: bool,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            realtime: true,
        }
    }
}

/// One observable state of the feed.
///
/// `data` survives fetch failures: the previous result stays visible while
/// `error` carries the latest failure message (stale-while-error).
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    pub data: Option<Arc<InsightResultSet>>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Set when a background refetch was flagged as fresh; dismissed via
    /// [`InsightFeed::acknowledge_new_insights`] or a manual refetch.
    pub has_new_insights: bool,
}

enum Command {
    Refetch(oneshot::Sender<Result<(), String>>),
    SetRealtime(bool),
    AcknowledgeNewInsights,
}

/// Handle to a background insight poll loop.
///
/// Dropping the feed aborts the loop; an in-flight request's result is
/// discarded without touching any published state.
pub struct InsightFeed {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<FeedSnapshot>,
    task: JoinHandle<()>,
}

impl InsightFeed {
    /// Spawns the poll loop.
    ///
    /// The initial fetch runs once at spawn regardless of the realtime flag;
    /// `is_loading` stays `true` until it resolves. Afterwards the interval
    /// drives background refetches while realtime is enabled.
    pub fn spawn<S: InsightSource>(source: S, params: InsightParams, options: FeedOptions) -> Self {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (snapshot_tx, snapshot_rx) = watch::channel(FeedSnapshot {
            is_loading: true,
            ..FeedSnapshot::default()
        });

        let worker = FeedWorker {
            source,
            params,
            poll_interval: options.poll_interval,
            realtime: options.realtime,
            snapshots: snapshot_tx,
            commands: command_rx,
            last_flagged: Instant::now(),
        };
        let task = tokio::spawn(worker.run());

        Self {
            commands: command_tx,
            snapshots: snapshot_rx,
            task,
        }
    }

    /// Returns a clone of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> FeedSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Returns a receiver that observes every snapshot change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.snapshots.clone()
    }

    /// Forces an immediate fetch outside the timer cadence.
    ///
    /// The fresh result replaces the cache with no filler splicing and
    /// dismisses any pending new-insight flag.
    ///
    /// # Errors
    ///
    /// Returns the fetch failure as a message string; the same message is
    /// also stored on the snapshot.
    pub async fn refetch(&self) -> Result<(), String> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::Refetch(tx))
            .await
            .map_err(|_| "feed task stopped".to_string())?;
        rx.await.map_err(|_| "feed task stopped".to_string())?
    }

    /// Enables or disables background polling. While disabled the timer is
    /// fully suspended — no requests are issued.
    pub async fn set_realtime(&self, enabled: bool) {
        let _ = self.commands.send(Command::SetRealtime(enabled)).await;
    }

    /// Dismisses the new-insight notification flag.
    pub async fn acknowledge_new_insights(&self) {
        let _ = self.commands.send(Command::AcknowledgeNewInsights).await;
    }
}

impl Drop for InsightFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct FeedWorker<S> {
    source: S,
    params: InsightParams,
    poll_interval: Duration,
    realtime: bool,
    snapshots: watch::Sender<FeedSnapshot>,
    commands: mpsc::Receiver<Command>,
    last_flagged: Instant,
}

impl<S: InsightSource> FeedWorker<S> {
    async fn run(mut self) {
        self.initial_load().await;

        // First scheduled tick lands one full interval after the initial
        // load. Delay (rather than burst) ticks missed while a fetch was in
        // flight, so overlapping polls are never queued.
        let mut ticker =
            tokio::time::interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.realtime {
                        self.poll_once().await;
                    }
                }
                command = self.commands.recv() => {
                    match command {
                        Some(Command::Refetch(reply)) => {
                            let result = self.refetch().await;
                            let _ = reply.send(result);
                        }
                        Some(Command::SetRealtime(enabled)) => {
                            tracing::debug!(enabled, "realtime polling toggled");
                            self.realtime = enabled;
                        }
                        Some(Command::AcknowledgeNewInsights) => {
                            self.snapshots.send_modify(|s| s.has_new_insights = false);
                        }
                        None => break,
                    }
                }
            }
        }
    }

    async fn initial_load(&mut self) {
        match self.source.fetch(&self.params).await {
            Ok(result) => {
                tracing::info!(insights = result.insights.len(), "initial insight load complete");
                self.snapshots.send_modify(|s| {
                    s.data = Some(Arc::new(result));
                    s.is_loading = false;
                    s.error = None;
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "initial insight load failed");
                self.snapshots.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(e.to_string());
                });
            }
        }
        self.last_flagged = Instant::now();
    }

    /// One background poll. On success, flags new insights and splices a
    /// synthesized filler onto the front of the fresh result when enough of
    /// the interval has passed since the last flagged update. This is a
    /// UI-liveness simulation, not backend delta detection.
    async fn poll_once(&mut self) {
        match self.source.fetch(&self.params).await {
            Ok(mut result) => {
                let flag_new =
                    self.last_flagged.elapsed() > self.poll_interval.mul_f64(NEW_INSIGHT_THRESHOLD);
                if flag_new {
                    let filler = filler_insight();
                    tracing::debug!(title = %filler.title, "splicing filler insight");
                    result.insights.insert(0, filler);
                    self.last_flagged = Instant::now();
                }
                self.snapshots.send_modify(|s| {
                    s.data = Some(Arc::new(result));
                    s.is_loading = false;
                    s.error = None;
                    if flag_new {
                        s.has_new_insights = true;
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "background poll failed, keeping cached data");
                self.snapshots.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(e.to_string());
                });
            }
        }
    }

    /// Manually triggered fetch: stores the fresh result as-is and restarts
    /// the new-insight cadence from now.
    async fn refetch(&mut self) -> Result<(), String> {
        match self.source.fetch(&self.params).await {
            Ok(result) => {
                self.last_flagged = Instant::now();
                self.snapshots.send_modify(|s| {
                    s.data = Some(Arc::new(result));
                    s.is_loading = false;
                    s.error = None;
                    s.has_new_insights = false;
                });
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                self.snapshots.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(message.clone());
                });
                Err(message)
            }
        }
    }
}
