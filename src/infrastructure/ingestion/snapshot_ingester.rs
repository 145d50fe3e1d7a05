use crate::domain::{feed::*, market_board::*, snapshot::*, types::*};
use crate::infrastructure::parsers::load_market_snapshot;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Outcome of one fetch from a market-data source
pub type RefreshResult = MonitorResult<MarketSnapshot>;

/// Anything that can produce a market snapshot on demand
pub trait SnapshotSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Fetches the current snapshot
    fn fetch(&self) -> RefreshResult;
}

/// Reads snapshots from a JSON file on every fetch
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    name: String,
}

impl JsonFileSource {
    /// Create a source backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    /// Backing file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SnapshotSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> RefreshResult {
        load_market_snapshot(&self.path)
    }
}

/// Polls `source` every `interval`, forwarding each result to `sender`.
///
/// Stops after `cycles` fetches when given, or as soon as the receiving side
/// hangs up. Returns the number of results delivered.
pub async fn poll_source<S: SnapshotSource + ?Sized>(
    source: &S,
    sender: mpsc::Sender<RefreshResult>,
    interval: Duration,
    cycles: Option<u64>,
) -> u64 {
    let mut ticker = tokio::time::interval(interval);
    let mut delivered = 0u64;

    info!(
        "Polling {} every {}ms{}",
        source.name(),
        interval.as_millis(),
        cycles.map(|c| format!(" for {} cycles", c)).unwrap_or_default()
    );

    loop {
        if cycles.is_some_and(|limit| delivered >= limit) {
            break;
        }
        ticker.tick().await;

        let result = source.fetch();
        if let Err(e) = &result {
            warn!("Fetch from {} failed: {}", source.name(), e);
        }

        if sender.send(result).await.is_err() {
            debug!("Refresh receiver closed, stopping poll of {}", source.name());
            break;
        }
        delivered += 1;
    }

    delivered
}

/// Applies refresh results to a [`MarketBoard`].
///
/// A successful snapshot is aggregated and published. A failed fetch or
/// aggregation invalidates the board so stale figures are not shown.
pub struct SnapshotIngester {
    /// Channel receiver for refresh results
    receiver: mpsc::Receiver<RefreshResult>,
    /// Board the aggregated views land on
    board: MarketBoard,
    aggregator: SnapshotAggregator,
    stats: RefreshStats,
}

impl SnapshotIngester {
    /// Create new snapshot ingester
    pub fn new(receiver: mpsc::Receiver<RefreshResult>, board: MarketBoard) -> Self {
        Self {
            receiver,
            board,
            aggregator: SnapshotAggregator::new(),
            stats: RefreshStats::new(),
        }
    }

    /// Run the ingestion loop until every sender is dropped
    pub async fn run(&mut self) {
        info!("Starting snapshot ingester");

        while let Some(result) = self.receiver.recv().await {
            let applied = self.apply(result);
            self.stats.record_refresh(applied.is_ok());

            if let Err(e) = applied {
                error!("Refresh failed: {}", e);
            }
        }

        self.report_stats();
        info!("Snapshot ingester finished");
    }

    fn apply(&self, result: RefreshResult) -> MonitorResult<u64> {
        let view = match result.and_then(|snapshot| self.aggregator.aggregate(&snapshot)) {
            Ok(view) => view,
            Err(e) => {
                // Lock failures here are reported alongside the refresh error
                if let Err(lock) = self.board.invalidate(e.to_string()) {
                    error!("Could not invalidate market board: {}", lock);
                }
                return Err(e);
            }
        };

        let as_of = view.as_of;
        let revision = self.board.publish(view)?;
        debug!("Published market view as of {} (revision {})", as_of, revision);
        Ok(revision)
    }

    fn report_stats(&self) {
        info!(
            "Refresh stats - Total: {}, Successful: {}, Failed: {}, Success Rate: {:.2}%",
            self.stats.total_refreshes,
            self.stats.successful_refreshes,
            self.stats.failed_refreshes,
            self.stats.success_rate()
        );
    }

    /// Returns the refresh statistics so far
    pub fn stats(&self) -> &RefreshStats {
        &self.stats
    }
}

/// Runs several refresh feeds against one board.
///
/// Feeds race; whichever publishes last owns the board.
pub struct MultiFeedIngester {
    receivers: Vec<mpsc::Receiver<RefreshResult>>,
    board: MarketBoard,
}

impl MultiFeedIngester {
    /// Create new multi-feed ingester
    pub fn new(receivers: Vec<mpsc::Receiver<RefreshResult>>, board: MarketBoard) -> Self {
        Self { receivers, board }
    }

    /// Run all feeds concurrently, returning per-feed statistics in feed order
    pub async fn run(self) -> Vec<RefreshStats> {
        info!(
            "Starting multi-feed ingester with {} feeds",
            self.receivers.len()
        );

        let mut handles = Vec::new();
        for (feed_id, receiver) in self.receivers.into_iter().enumerate() {
            let board = self.board.clone();
            handles.push(tokio::spawn(async move {
                let mut ingester = SnapshotIngester::new(receiver, board);
                info!("Starting feed {} ingestion", feed_id);
                ingester.run().await;
                info!("Feed {} ingestion completed", feed_id);
                ingester.stats
            }));
        }

        let mut all_stats = Vec::with_capacity(handles.len());
        for (feed_id, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(stats) => all_stats.push(stats),
                Err(e) => {
                    error!("Feed {} failed: {}", feed_id, e);
                    all_stats.push(RefreshStats::new());
                }
            }
        }

        info!("All feeds completed");
        all_stats
    }
}

/// Counters for refresh outcomes
#[derive(Debug, Clone, Default)]
pub struct RefreshStats {
    /// Refresh results received
    pub total_refreshes: u64,
    /// Results that were published to the board
    pub successful_refreshes: u64,
    /// Results that invalidated the board
    pub failed_refreshes: u64,
    /// When the last result was handled
    pub last_refresh: Option<Timestamp>,
    /// When the ingester started
    pub start_time: Timestamp,
}

impl RefreshStats {
    /// Creates new refresh statistics
    pub fn new() -> Self {
        Self {
            start_time: chrono::Utc::now(),
            ..Default::default()
        }
    }

    /// Records one refresh outcome
    pub fn record_refresh(&mut self, success: bool) {
        self.total_refreshes += 1;
        self.last_refresh = Some(chrono::Utc::now());

        if success {
            self.successful_refreshes += 1;
        } else {
            self.failed_refreshes += 1;
        }
    }

    /// Success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_refreshes > 0 {
            (self.successful_refreshes as f64 / self.total_refreshes as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Error rate as a percentage
    pub fn error_rate(&self) -> f64 {
        if self.total_refreshes > 0 {
            (self.failed_refreshes as f64 / self.total_refreshes as f64) * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn snapshot(minute: u32) -> MarketSnapshot {
        let at = chrono::Utc
            .with_ymd_and_hms(2026, 1, 30, 14, minute, 0)
            .unwrap();
        let mut snapshot = MarketSnapshot::new(at);
        snapshot.mcx = vec![
            QuoteUpdate::new("FEB 2026", dec!(214.45), Currency::Inr, dec!(0.85), at),
            QuoteUpdate::new("MAR 2026", dec!(216.10), Currency::Inr, dec!(0.62), at),
        ];
        snapshot
    }

    struct CountingSource {
        calls: AtomicU64,
    }

    impl SnapshotSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        fn fetch(&self) -> RefreshResult {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n % 2 == 1 {
                Err(MonitorError::invalid("feed timed out"))
            } else {
                Ok(snapshot(40 + n as u32))
            }
        }
    }

    #[tokio::test]
    async fn test_ingester_publishes_snapshot() {
        let board = MarketBoard::new();
        let (tx, rx) = mpsc::channel(10);
        let mut ingester = SnapshotIngester::new(rx, board.clone());

        tx.send(Ok(snapshot(42))).await.unwrap();
        drop(tx);
        ingester.run().await;

        let view = board.current().unwrap().unwrap();
        assert_eq!(view.mcx.as_ref().unwrap().spreads[0].display_delta(), "+1.65");
        assert_eq!(ingester.stats().successful_refreshes, 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_invalidates_board() {
        let board = MarketBoard::new();
        let (tx, rx) = mpsc::channel(10);
        let mut ingester = SnapshotIngester::new(rx, board.clone());

        tx.send(Ok(snapshot(42))).await.unwrap();
        tx.send(Err(MonitorError::invalid("MCX FEB 2026 price is missing")))
            .await
            .unwrap();
        drop(tx);
        ingester.run().await;

        match board.state().unwrap() {
            BoardState::Unavailable { reason } => assert!(reason.contains("price is missing")),
            other => panic!("expected unavailable board, got {:?}", other),
        }
        assert_eq!(ingester.stats().failed_refreshes, 1);
        assert_eq!(board.revision().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_aggregation_failure_invalidates_board() {
        let board = MarketBoard::new();
        let (tx, rx) = mpsc::channel(10);
        let mut ingester = SnapshotIngester::new(rx, board.clone());

        let mut bad = snapshot(42);
        bad.mcx[1].currency = Currency::Usd;
        tx.send(Ok(bad)).await.unwrap();
        drop(tx);
        ingester.run().await;

        assert!(matches!(
            board.state().unwrap(),
            BoardState::Unavailable { .. }
        ));
    }

    #[tokio::test]
    async fn test_poll_source_stops_after_cycles() {
        let source = CountingSource {
            calls: AtomicU64::new(0),
        };
        let (tx, mut rx) = mpsc::channel(10);

        let delivered = poll_source(&source, tx, Duration::from_millis(1), Some(3)).await;

        assert_eq!(delivered, 3);
        assert!(rx.recv().await.unwrap().is_ok());
        assert!(rx.recv().await.unwrap().is_err());
        assert!(rx.recv().await.unwrap().is_ok());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_poll_source_stops_when_receiver_drops() {
        let source = CountingSource {
            calls: AtomicU64::new(0),
        };
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let delivered = poll_source(&source, tx, Duration::from_millis(1), None).await;
        assert_eq!(delivered, 0);
    }

    #[test]
    fn test_refresh_stats_calculations() {
        let mut stats = RefreshStats::new();
        for _ in 0..3 {
            stats.record_refresh(true);
        }
        stats.record_refresh(false);

        assert_eq!(stats.total_refreshes, 4);
        assert_eq!(stats.success_rate(), 75.0);
        assert_eq!(stats.error_rate(), 25.0);
        assert!(stats.last_refresh.is_some());
    }

    #[test]
    fn test_empty_stats_rates() {
        let stats = RefreshStats::new();
        assert_eq!(stats.success_rate(), 0.0);
        assert_eq!(stats.error_rate(), 0.0);
    }
}
