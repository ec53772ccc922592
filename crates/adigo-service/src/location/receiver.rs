//! Friends location receiver
//!
//! Listens on `/user/queue/friendsLocationResponse` and writes every batch
//! into the location cache. The cache is the only output; consumers watch
//! the store.

use adigo_core::UserLocationRepository;
use adigo_gateway::{ConnectionState, StompClient, StompMessage, FRIENDS_LOCATION_QUEUE};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::error::LocationResult;
use super::payload::parse_friend_locations;

pub struct LocationReceiver {
    client: StompClient,
    locations: Arc<dyn UserLocationRepository>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl LocationReceiver {
    pub fn new(client: StompClient, locations: Arc<dyn UserLocationRepository>) -> Self {
        Self {
            client,
            locations,
            task: Mutex::new(None),
        }
    }

    /// Subscribe to the friends queue and start consuming it
    ///
    /// Calling `start` while already running does nothing.
    pub fn start(&self) {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            debug!("Location receiver already running");
            return;
        }

        let messages = self.client.messages();
        let state = self.client.connection_state();
        self.client.subscribe(FRIENDS_LOCATION_QUEUE);

        *task = Some(tokio::spawn(consume(
            self.client.clone(),
            Arc::clone(&self.locations),
            messages,
            state,
        )));
        info!(destination = FRIENDS_LOCATION_QUEUE, "Location receiver started");
    }

    /// Stop consuming and unsubscribe from the friends queue
    pub fn stop(&self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
        self.client.unsubscribe(FRIENDS_LOCATION_QUEUE);
        info!("Location receiver stopped");
    }

    pub fn is_running(&self) -> bool {
        self.task.lock().as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for LocationReceiver {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.abort();
        }
    }
}

async fn consume(
    client: StompClient,
    locations: Arc<dyn UserLocationRepository>,
    mut messages: broadcast::Receiver<StompMessage>,
    mut state: watch::Receiver<ConnectionState>,
) {
    loop {
        tokio::select! {
            received = messages.recv() => match received {
                Ok(message) if message.destination == FRIENDS_LOCATION_QUEUE => {
                    match apply_friend_locations(locations.as_ref(), &message.body).await {
                        Ok(count) => debug!(count, "Friend locations updated"),
                        Err(e) => warn!(error = %e, body = %message.body, "Dropped friend location message"),
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Location receiver lagged behind the message stream");
                }
                Err(broadcast::error::RecvError::Closed) => return,
            },
            changed = state.changed() => {
                if changed.is_err() {
                    return;
                }
                let connected = *state.borrow_and_update() == ConnectionState::Connected;
                if connected && !client.is_subscribed(FRIENDS_LOCATION_QUEUE) {
                    client.subscribe(FRIENDS_LOCATION_QUEUE);
                    info!("Re-subscribed to friend locations");
                }
            }
        }
    }
}

/// Parse one friends queue body and upsert it into the cache
///
/// Returns the number of locations written.
pub async fn apply_friend_locations(
    locations: &dyn UserLocationRepository,
    body: &str,
) -> LocationResult<usize> {
    let batch = parse_friend_locations(body)?;
    let count = batch.len();
    locations.upsert_many(batch).await?;
    Ok(count)
}
