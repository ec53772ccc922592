//! UWB ranging session manager
//!
//! Holds one session at a time. Starting a new session closes the previous
//! one; a setup failure is logged and leaves the manager idle without retry.
//! Distance and angle keep their last value when the peer disconnects.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use super::backend::{LocalEndpoint, RangingBackend, RangingEvent, RangingRole};
use super::error::RangingError;
use super::parameters::{ComplexChannel, RangingParameters, UwbAddress};

/// Distance reported before the first measurement, in meters
pub const INITIAL_DISTANCE: f32 = 1.0;

/// Azimuth reported before the first measurement, in degrees
pub const INITIAL_ANGLE: f32 = 0.0;

struct RangingState {
    distance: watch::Sender<f32>,
    angle: watch::Sender<f32>,
    peer_connected: watch::Sender<bool>,
    active: watch::Sender<bool>,
}

impl RangingState {
    fn apply(&self, event: RangingEvent) {
        match event {
            RangingEvent::Position {
                distance,
                azimuth,
                elevation,
            } => {
                trace!(?distance, ?azimuth, ?elevation, "Ranging position");
                if let Some(d) = distance {
                    self.distance.send_replace(d);
                }
                if let Some(a) = azimuth {
                    self.angle.send_replace(a);
                }
                self.peer_connected
                    .send_if_modified(|connected| !std::mem::replace(connected, true));
            }
            RangingEvent::PeerDisconnected => {
                warn!("Ranging peer disconnected");
                self.peer_connected.send_replace(false);
            }
            RangingEvent::Other(description) => {
                warn!(result = %description, "Unexpected ranging result");
            }
        }
    }
}

pub struct UwbRangingManager {
    backend: Arc<dyn RangingBackend>,
    state: Arc<RangingState>,
    session: Mutex<Option<JoinHandle<()>>>,
}

impl UwbRangingManager {
    pub fn new(backend: Arc<dyn RangingBackend>) -> Self {
        let state = RangingState {
            distance: watch::channel(INITIAL_DISTANCE).0,
            angle: watch::channel(INITIAL_ANGLE).0,
            peer_connected: watch::channel(false).0,
            active: watch::channel(false).0,
        };
        Self {
            backend,
            state: Arc::new(state),
            session: Mutex::new(None),
        }
    }

    /// Local endpoint for `role`, to hand to the peer out of band
    pub async fn local_endpoint(&self, role: RangingRole) -> Result<LocalEndpoint, RangingError> {
        self.backend.local_endpoint(role).await
    }

    /// Open a unicast DS-TWR session with `peer_address`
    ///
    /// Any running session is stopped first. Without an explicit `channel` the
    /// controller uses the channel its backend assigned and the controlee
    /// falls back to channel 9, preamble 11. A failure is logged, returned,
    /// and not retried.
    pub async fn start_ranging(
        &self,
        peer_address: u16,
        channel: Option<ComplexChannel>,
        is_controller: bool,
    ) -> Result<(), RangingError> {
        self.stop_ranging();

        let role = RangingRole::from_controller_flag(is_controller);
        let events = match self.open(role, UwbAddress::from_short(peer_address), channel).await {
            Ok(events) => events,
            Err(e) => {
                error!(error = %e, ?role, peer = peer_address, "Failed to start ranging");
                return Err(e);
            }
        };

        self.state.peer_connected.send_replace(false);
        self.state.active.send_replace(true);
        let handle = tokio::spawn(consume(Arc::clone(&self.state), events));

        // keep only the newest session
        if let Some(previous) = self.session.lock().replace(handle) {
            previous.abort();
        }
        info!(?role, peer = peer_address, "Ranging started");
        Ok(())
    }

    async fn open(
        &self,
        role: RangingRole,
        peer: UwbAddress,
        channel: Option<ComplexChannel>,
    ) -> Result<mpsc::Receiver<RangingEvent>, RangingError> {
        let complex_channel = match (role, channel) {
            (_, Some(channel)) => channel,
            (RangingRole::Controller, None) => self
                .backend
                .local_endpoint(role)
                .await?
                .complex_channel
                .ok_or(RangingError::NoChannel)?,
            (RangingRole::Controlee, None) => ComplexChannel::default(),
        };

        let params = RangingParameters::unicast(complex_channel, peer);
        debug!(
            peer = %peer,
            channel = complex_channel.channel,
            preamble = complex_channel.preamble_index,
            "Opening ranging session"
        );
        self.backend.open_session(role, params).await
    }

    /// Close the current session, if any
    pub fn stop_ranging(&self) {
        if let Some(session) = self.session.lock().take() {
            session.abort();
            info!("Ranging stopped");
        }
        self.state.active.send_replace(false);
    }

    /// Override the displayed distance
    pub fn set_distance(&self, meters: f32) {
        self.state.distance.send_replace(meters);
    }

    /// Override the displayed angle
    pub fn set_angle(&self, degrees: f32) {
        self.state.angle.send_replace(degrees);
    }

    pub fn distance(&self) -> watch::Receiver<f32> {
        self.state.distance.subscribe()
    }

    pub fn angle(&self) -> watch::Receiver<f32> {
        self.state.angle.subscribe()
    }

    /// True once the peer has reported a position, false after it disconnects
    pub fn peer_connected(&self) -> watch::Receiver<bool> {
        self.state.peer_connected.subscribe()
    }

    pub fn ranging_active(&self) -> watch::Receiver<bool> {
        self.state.active.subscribe()
    }

    pub fn current_distance(&self) -> f32 {
        *self.state.distance.borrow()
    }

    pub fn current_angle(&self) -> f32 {
        *self.state.angle.borrow()
    }

    pub fn is_active(&self) -> bool {
        *self.state.active.borrow()
    }
}

impl Drop for UwbRangingManager {
    fn drop(&mut self) {
        if let Some(session) = self.session.get_mut().take() {
            session.abort();
        }
    }
}

async fn consume(state: Arc<RangingState>, mut events: mpsc::Receiver<RangingEvent>) {
    while let Some(event) = events.recv().await {
        state.apply(event);
    }
    debug!("Ranging session closed by backend");
    state.active.send_replace(false);
}
