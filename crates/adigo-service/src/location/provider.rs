//! Sources of device position fixes

use adigo_core::Coordinate;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

/// Interval between fixes when none is configured
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(5);

/// Shortest period a ticker accepts; zero would panic `interval`
pub(crate) const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Yields the device position as it changes
#[async_trait]
pub trait LocationProvider: Send {
    /// Wait for the next fix, `None` once the source is exhausted
    async fn next_fix(&mut self) -> Option<Coordinate>;
}

/// Reports the same coordinate on a fixed interval
///
/// The first fix is available immediately. A zero interval is raised to
/// one millisecond.
pub struct FixedLocationProvider {
    coordinate: Coordinate,
    every: Duration,
    ticker: Option<Interval>,
}

impl FixedLocationProvider {
    pub fn new(coordinate: Coordinate, every: Duration) -> Self {
        Self {
            coordinate,
            every: every.max(MIN_PERIOD),
            ticker: None,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn next_fix(&mut self) -> Option<Coordinate> {
        let every = self.every;
        let ticker = self.ticker.get_or_insert_with(|| {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });
        ticker.tick().await;
        Some(self.coordinate)
    }
}

/// Forwards fixes pushed by another part of the program
pub struct ChannelLocationProvider {
    rx: mpsc::Receiver<Coordinate>,
}

impl ChannelLocationProvider {
    /// Create the provider and the sender that feeds it
    pub fn new(capacity: usize) -> (Self, mpsc::Sender<Coordinate>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { rx }, tx)
    }
}

#[async_trait]
impl LocationProvider for ChannelLocationProvider {
    async fn next_fix(&mut self) -> Option<Coordinate> {
        self.rx.recv().await
    }
}
