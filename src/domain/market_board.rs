use crate::domain::{snapshot::*, types::*};
use std::sync::{Arc, RwLock};

/// What presentation should render right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardState {
    /// No refresh has completed yet
    Empty,
    /// Latest successfully aggregated view
    Ready(Arc<MarketView>),
    /// Latest refresh failed; render a placeholder, not the previous view
    Unavailable {
        /// Why the refresh failed
        reason: String,
    },
}

#[derive(Debug)]
struct BoardInner {
    state: BoardState,
    revision: u64,
}

/// Shared holder of the latest market view.
///
/// Each publish replaces the state wholesale, so concurrent refreshes resolve
/// to whichever published last.
#[derive(Debug, Clone)]
pub struct MarketBoard {
    inner: Arc<RwLock<BoardInner>>,
}

impl MarketBoard {
    /// Creates an empty board
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(BoardInner {
                state: BoardState::Empty,
                revision: 0,
            })),
        }
    }

    /// Publishes a freshly aggregated view, returning the new revision
    pub fn publish(&self, view: MarketView) -> MonitorResult<u64> {
        self.replace(BoardState::Ready(Arc::new(view)))
    }

    /// Marks the board unavailable after a failed refresh
    pub fn invalidate(&self, reason: impl Into<String>) -> MonitorResult<u64> {
        self.replace(BoardState::Unavailable {
            reason: reason.into(),
        })
    }

    fn replace(&self, next: BoardState) -> MonitorResult<u64> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| MonitorError::LockError(e.to_string()))?;
        inner.state = next;
        inner.revision += 1;
        Ok(inner.revision)
    }

    /// Current state
    pub fn state(&self) -> MonitorResult<BoardState> {
        self.inner
            .read()
            .map(|inner| inner.state.clone())
            .map_err(|e| MonitorError::LockError(e.to_string()))
    }

    /// Current view, if the last refresh succeeded
    pub fn current(&self) -> MonitorResult<Option<Arc<MarketView>>> {
        Ok(match self.state()? {
            BoardState::Ready(view) => Some(view),
            BoardState::Empty | BoardState::Unavailable { .. } => None,
        })
    }

    /// Number of publishes so far
    pub fn revision(&self) -> MonitorResult<u64> {
        self.inner
            .read()
            .map(|inner| inner.revision)
            .map_err(|e| MonitorError::LockError(e.to_string()))
    }
}

impl Default for MarketBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feed::MarketSnapshot;
    use chrono::TimeZone;

    fn view(minute: u32) -> MarketView {
        let as_of = chrono::Utc
            .with_ymd_and_hms(2026, 1, 30, 14, minute, 0)
            .unwrap();
        SnapshotAggregator::new()
            .aggregate(&MarketSnapshot::new(as_of))
            .unwrap()
    }

    #[test]
    fn test_board_starts_empty() {
        let board = MarketBoard::new();
        assert_eq!(board.state().unwrap(), BoardState::Empty);
        assert!(board.current().unwrap().is_none());
        assert_eq!(board.revision().unwrap(), 0);
    }

    #[test]
    fn test_last_publish_wins() {
        let board = MarketBoard::new();
        board.publish(view(40)).unwrap();
        let revision = board.publish(view(45)).unwrap();

        assert_eq!(revision, 2);
        assert_eq!(board.current().unwrap().unwrap().as_of, view(45).as_of);
    }

    #[test]
    fn test_failed_refresh_hides_previous_view() {
        let board = MarketBoard::new();
        board.publish(view(40)).unwrap();
        board.invalidate("feed returned malformed price").unwrap();

        assert!(board.current().unwrap().is_none());
        assert!(matches!(
            board.state().unwrap(),
            BoardState::Unavailable { .. }
        ));
    }
}
