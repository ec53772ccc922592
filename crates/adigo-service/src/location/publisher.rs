//! Location publisher
//!
//! Sends the device position to the server and asks it to push friends'
//! positions back on the per-user queue.

use adigo_core::Coordinate;
use adigo_gateway::StompClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::error::LocationResult;
use super::payload::LocationUpdate;
use super::provider::{LocationProvider, MIN_PERIOD};

/// Destination receiving the device position
pub const LOCATION_UPDATE_DESTINATION: &str = "/app/location/update";

/// Destination asking the server to push friends' positions
pub const REQUEST_FRIENDS_DESTINATION: &str = "/app/location/requestFriends";

/// Publishes the device position on the STOMP session
///
/// Every fix is sent as-is. There is no batching, deduplication or rate
/// limiting; the provider decides how often fixes arrive.
#[derive(Clone)]
pub struct LocationPublisher {
    client: StompClient,
    position: Arc<watch::Sender<Option<Coordinate>>>,
}

impl LocationPublisher {
    pub fn new(client: StompClient) -> Self {
        let (position, _) = watch::channel(None);
        Self {
            client,
            position: Arc::new(position),
        }
    }

    /// Send one fix to `/app/location/update`
    ///
    /// The fix becomes the current position even when the session is down.
    pub fn send_my_location(&self, coordinate: Coordinate) -> LocationResult<()> {
        self.position.send_replace(Some(coordinate));

        let body = serde_json::to_string(&LocationUpdate::from(coordinate))?;
        self.client.send(LOCATION_UPDATE_DESTINATION, &body)?;
        debug!(position = %coordinate, "Published location");
        Ok(())
    }

    /// Ask the server to push the friends' latest positions
    pub fn request_friend_locations(&self) -> LocationResult<()> {
        self.client.send(REQUEST_FRIENDS_DESTINATION, "{}")?;
        debug!("Requested friend locations");
        Ok(())
    }

    /// Last fix handed to the publisher
    pub fn current_position(&self) -> Option<Coordinate> {
        *self.position.borrow()
    }

    /// Watch the device position
    pub fn position_updates(&self) -> watch::Receiver<Option<Coordinate>> {
        self.position.subscribe()
    }

    /// Publish every fix the provider yields until it is exhausted
    pub fn spawn(&self, mut provider: Box<dyn LocationProvider>) -> JoinHandle<()> {
        let publisher = self.clone();
        tokio::spawn(async move {
            info!("Location publishing started");
            while let Some(coordinate) = provider.next_fix().await {
                match publisher.send_my_location(coordinate) {
                    Ok(()) => {}
                    Err(e) if e.is_not_connected() => {
                        debug!(position = %coordinate, "Session down, location not sent");
                    }
                    Err(e) => warn!(error = %e, "Failed to publish location"),
                }
            }
            info!("Location provider exhausted, publishing stopped");
        })
    }

    /// Request friend locations on a fixed interval while connected
    pub fn spawn_friend_requests(&self, every: Duration) -> JoinHandle<()> {
        let publisher = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every.max(MIN_PERIOD));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !publisher.client.is_connected() {
                    continue;
                }
                if let Err(e) = publisher.request_friend_locations() {
                    debug!(error = %e, "Friend location request not sent");
                }
            }
        })
    }
}
