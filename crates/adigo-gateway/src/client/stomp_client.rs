//! STOMP client
//!
//! Holds at most one link. Every installed link gets a generation number and
//! events from a link that is no longer installed are ignored, so closing a
//! link on purpose never triggers a reconnect.

use adigo_common::{SharedSessionRenewer, SharedTokenStore};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::config::StompConfig;
use super::error::StompError;
use super::subscriptions::SubscriptionTable;
use crate::connection::{
    Backoff, Outbound, Transport, TransportEvent, TransportLink, WebSocketTransport,
};
use crate::protocol::{StompCommand, StompFrame};

const CLOSE_NORMAL: u16 = 1000;

/// Session state as seen by observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    /// Link open, waiting for CONNECTED
    Connecting,
    Connected,
    /// The broker rejected the token and renewal failed; a fresh login is
    /// needed before `connect` is called again
    SessionExpired,
}

/// Payload of a MESSAGE frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StompMessage {
    pub destination: String,
    pub body: String,
}

/// STOMP client with automatic reconnect
///
/// Cheap to clone; all clones drive the same session.
#[derive(Clone)]
pub struct StompClient {
    inner: Arc<Inner>,
}

struct Inner {
    config: StompConfig,
    transport: Arc<dyn Transport>,
    tokens: SharedTokenStore,
    renewer: Option<SharedSessionRenewer>,
    state: watch::Sender<ConnectionState>,
    messages: broadcast::Sender<StompMessage>,
    subscriptions: Mutex<SubscriptionTable>,
    link: Mutex<Option<ActiveLink>>,
    generation: AtomicU64,
    reconnect: Mutex<Option<JoinHandle<()>>>,
    renewal: Mutex<Option<JoinHandle<()>>>,
    /// Bumped by `disconnect`; a renewal started before it must not reconnect
    epoch: AtomicU64,
    shut_down: AtomicBool,
    session_expired: AtomicBool,
}

struct ActiveLink {
    generation: u64,
    outbound: mpsc::UnboundedSender<Outbound>,
    reader: Option<JoinHandle<()>>,
    heartbeat: Option<JoinHandle<()>>,
}

impl ActiveLink {
    fn send(&self, text: String) -> bool {
        self.outbound.send(Outbound::Text(text)).is_ok()
    }

    fn stop_heartbeat(&mut self) {
        if let Some(task) = self.heartbeat.take() {
            task.abort();
        }
    }

    /// Close on our side; the reader is stopped so no close event comes back
    fn close(mut self, reason: &str) {
        self.stop_heartbeat();
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        let _ = self.outbound.send(Outbound::Close {
            code: CLOSE_NORMAL,
            reason: reason.to_string(),
        });
    }
}

impl StompClient {
    pub fn new(
        config: StompConfig,
        transport: Arc<dyn Transport>,
        tokens: SharedTokenStore,
        renewer: Option<SharedSessionRenewer>,
    ) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        let (messages, _) = broadcast::channel(config.message_capacity.max(1));

        Self {
            inner: Arc::new(Inner {
                config,
                transport,
                tokens,
                renewer,
                state,
                messages,
                subscriptions: Mutex::new(SubscriptionTable::default()),
                link: Mutex::new(None),
                generation: AtomicU64::new(0),
                reconnect: Mutex::new(None),
                renewal: Mutex::new(None),
                epoch: AtomicU64::new(0),
                shut_down: AtomicBool::new(false),
                session_expired: AtomicBool::new(false),
            }),
        }
    }

    /// Client over a real WebSocket
    pub fn websocket(
        config: StompConfig,
        tokens: SharedTokenStore,
        renewer: Option<SharedSessionRenewer>,
    ) -> Self {
        Self::new(config, Arc::new(WebSocketTransport::new()), tokens, renewer)
    }

    /// Open a link and send CONNECT
    ///
    /// A no-op when a link already exists. When the link cannot be opened
    /// the error is returned and the reconnect loop is started.
    pub async fn connect(&self) -> Result<(), StompError> {
        if self.inner.shut_down.load(Ordering::SeqCst) {
            return Err(StompError::ShutDown);
        }
        self.inner.session_expired.store(false, Ordering::SeqCst);
        self.inner.open_link(true).await
    }

    /// Send DISCONNECT and close the link after the grace delay
    ///
    /// Cancels any pending reconnect or token renewal; the client stays down
    /// until `connect` is called again.
    pub async fn disconnect(&self) {
        tracing::info!("Disconnecting STOMP client");
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        self.inner.cancel_renewal();
        self.inner.cancel_reconnect();

        let link = self.inner.link.lock().take();
        self.inner.set_state(ConnectionState::Disconnected);

        if let Some(mut link) = link {
            link.stop_heartbeat();
            link.send(StompFrame::disconnect().to_wire());
            tokio::time::sleep(self.inner.config.disconnect_grace).await;
            link.close("Client disconnecting");
        }
    }

    /// Disconnect and refuse any further `connect`
    pub async fn shutdown(&self) {
        self.inner.shut_down.store(true, Ordering::SeqCst);
        self.disconnect().await;
        tracing::info!("STOMP client shut down");
    }

    /// Subscribe to `destination`, returning its subscription id
    ///
    /// Subscribing twice returns the existing id without sending anything.
    /// While disconnected the SUBSCRIBE goes out on the next CONNECTED.
    pub fn subscribe(&self, destination: &str) -> String {
        let mut table = self.inner.subscriptions.lock();
        let (id, created) = table.register(destination);
        if !created {
            tracing::debug!(destination = %destination, "Already subscribed");
            return id;
        }

        if self.is_connected() {
            if self.inner.send_text(StompFrame::subscribe(&id, destination).to_wire()) {
                tracing::debug!(destination = %destination, id = %id, "Sent SUBSCRIBE");
            }
        } else {
            tracing::debug!(destination = %destination, "Not connected, SUBSCRIBE deferred to CONNECTED");
        }
        id
    }

    /// Drop the subscription for `destination`, returning its id
    pub fn unsubscribe(&self, destination: &str) -> Option<String> {
        let mut table = self.inner.subscriptions.lock();
        let Some(id) = table.remove(destination) else {
            tracing::debug!(destination = %destination, "Not subscribed");
            return None;
        };

        if self.is_connected() {
            self.inner.send_text(StompFrame::unsubscribe(&id).to_wire());
            tracing::debug!(destination = %destination, id = %id, "Sent UNSUBSCRIBE");
        } else {
            tracing::debug!(destination = %destination, "Not connected, skipping UNSUBSCRIBE");
        }
        Some(id)
    }

    /// SEND a JSON body to `destination`
    ///
    /// Dropped with `NotConnected` while the session is down; nothing is queued.
    pub fn send(&self, destination: &str, body: &str) -> Result<(), StompError> {
        self.send_with_type(destination, body, "application/json")
    }

    pub fn send_with_type(
        &self,
        destination: &str,
        body: &str,
        content_type: &str,
    ) -> Result<(), StompError> {
        if !self.is_connected() {
            tracing::warn!(destination = %destination, "STOMP not connected, dropping SEND");
            return Err(StompError::NotConnected);
        }

        let frame = StompFrame::send(destination, content_type, body);
        if self.inner.send_text(frame.to_wire()) {
            tracing::trace!(destination = %destination, bytes = body.len(), "Sent SEND");
            Ok(())
        } else {
            Err(StompError::NotConnected)
        }
    }

    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    /// Stream of every MESSAGE received from now on
    pub fn messages(&self) -> broadcast::Receiver<StompMessage> {
        self.inner.messages.subscribe()
    }

    pub fn is_subscribed(&self, destination: &str) -> bool {
        self.inner.subscriptions.lock().contains(destination)
    }
}

impl Inner {
    fn is_connected(&self) -> bool {
        *self.state.borrow() == ConnectionState::Connected
    }

    fn set_state(&self, state: ConnectionState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            tracing::debug!(from = ?previous, to = ?state, "Connection state changed");
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.link
            .lock()
            .as_ref()
            .is_some_and(|l| l.generation == generation)
    }

    fn send_text(&self, text: String) -> bool {
        self.link.lock().as_ref().is_some_and(|l| l.send(text))
    }

    fn cancel_reconnect(&self) {
        if let Some(task) = self.reconnect.lock().take() {
            task.abort();
        }
    }

    fn cancel_renewal(&self) {
        if let Some(task) = self.renewal.lock().take() {
            task.abort();
        }
    }

    async fn open_link(self: &Arc<Self>, reschedule_on_failure: bool) -> Result<(), StompError> {
        if self.link.lock().is_some() {
            tracing::debug!("Link already exists");
            return Ok(());
        }

        self.set_state(ConnectionState::Connecting);
        match self.transport.open(&self.config.url).await {
            Ok(link) => {
                self.install_link(link);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(url = %self.config.url, error = %e, "Failed to open link");
                self.set_state(ConnectionState::Disconnected);
                if reschedule_on_failure {
                    self.schedule_reconnect();
                }
                Err(e.into())
            }
        }
    }

    fn install_link(self: &Arc<Self>, link: TransportLink) {
        let TransportLink { outbound, inbound } = link;

        let generation = {
            let mut slot = self.link.lock();
            if slot.is_some() || self.shut_down.load(Ordering::SeqCst) {
                tracing::debug!("Discarding surplus link");
                let _ = outbound.send(Outbound::Close {
                    code: CLOSE_NORMAL,
                    reason: "superseded".to_string(),
                });
                return;
            }
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *slot = Some(ActiveLink {
                generation,
                outbound: outbound.clone(),
                reader: None,
                heartbeat: None,
            });
            generation
        };

        let reader = tokio::spawn(read_loop(Arc::downgrade(self), generation, inbound));
        if let Some(link) = self.link.lock().as_mut().filter(|l| l.generation == generation) {
            link.reader = Some(reader);
        }

        let token = self.tokens.access_token();
        let connect = StompFrame::connect(token.as_deref(), self.config.heart_beat_ms());
        let _ = outbound.send(Outbound::Text(connect.to_wire()));
        tracing::debug!(generation, "Link open, sent CONNECT");
    }

    fn handle_text(self: &Arc<Self>, generation: u64, text: &str) {
        if !self.is_current(generation) {
            tracing::trace!(generation, "Ignoring frame from superseded link");
            return;
        }

        let frame = match StompFrame::parse(text) {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                tracing::trace!("Heart-beat received");
                return;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Dropping malformed frame");
                return;
            }
        };
        tracing::trace!(frame = %frame, "Frame received");

        match frame.command {
            StompCommand::Connected => self.on_connected(generation, &frame),
            StompCommand::Message => self.on_message(frame),
            StompCommand::Error => self.on_error(&frame),
            StompCommand::Receipt => {
                tracing::debug!(receipt_id = frame.get("receipt-id").unwrap_or_default(), "Receipt received");
            }
            other => tracing::debug!(command = %other, "Ignoring unhandled frame"),
        }
    }

    fn on_connected(&self, generation: u64, frame: &StompFrame) {
        tracing::info!(session = frame.get("session").unwrap_or_default(), "STOMP session established");
        self.cancel_reconnect();

        let mut table = self.subscriptions.lock();
        for destination in &self.config.default_destinations {
            table.register(destination);
        }
        self.set_state(ConnectionState::Connected);

        let mut slot = self.link.lock();
        let Some(link) = slot.as_mut().filter(|l| l.generation == generation) else {
            return;
        };

        for (destination, id) in table.entries() {
            link.send(StompFrame::subscribe(&id, &destination).to_wire());
            tracing::debug!(destination = %destination, id = %id, "Sent SUBSCRIBE");
        }

        link.stop_heartbeat();
        if let Some(interval) = self.outgoing_heartbeat(frame) {
            tracing::debug!(interval_ms = interval.as_millis() as u64, "Sending heart-beats");
            link.heartbeat = Some(spawn_heartbeat(link.outbound.clone(), interval));
        }
    }

    /// Negotiated outgoing interval: max(our offer, what the server wants)
    fn outgoing_heartbeat(&self, frame: &StompFrame) -> Option<Duration> {
        let offered = self.config.heartbeat_outgoing.as_millis() as u64;
        let (_, wanted) = frame.heart_beat()?;
        if offered == 0 || wanted == 0 {
            return None;
        }
        Some(Duration::from_millis(offered.max(wanted)))
    }

    fn on_message(&self, frame: StompFrame) {
        let Some(destination) = frame.get("destination").map(str::to_string) else {
            tracing::warn!("MESSAGE without destination header, dropping");
            return;
        };

        let message = StompMessage {
            destination,
            body: frame.body,
        };
        if self.messages.send(message).is_err() {
            tracing::trace!("No message receivers");
        }
    }

    fn on_error(self: &Arc<Self>, frame: &StompFrame) {
        let message = frame.get("message").unwrap_or_default();
        tracing::error!(message = %message, body = %frame.body, "STOMP ERROR received");

        let lower = message.to_lowercase();
        let token_rejected = lower.contains("expired") || lower.contains("invalid");

        match &self.renewer {
            Some(renewer) if token_rejected => {
                let renewer = renewer.clone();
                let stale = self.tokens.access_token();
                let epoch = self.epoch.load(Ordering::SeqCst);
                let weak = Arc::downgrade(self);
                let task = tokio::spawn(async move {
                    let renewed = renewer.renew(stale.as_deref()).await;
                    let Some(inner) = weak.upgrade() else {
                        return;
                    };
                    if inner.epoch.load(Ordering::SeqCst) != epoch {
                        tracing::debug!("Disconnected during token renewal, staying down");
                        return;
                    }
                    match renewed {
                        Some(_) => inner.reconnect_with_new_token().await,
                        None => inner.expire_session(),
                    }
                });
                if let Some(previous) = self.renewal.lock().replace(task) {
                    previous.abort();
                }
            }
            _ => self.schedule_reconnect(),
        }
    }

    async fn reconnect_with_new_token(self: &Arc<Self>) {
        tracing::info!("Token renewed, reconnecting");
        if let Some(link) = self.link.lock().take() {
            link.close("refresh token done");
        }
        self.set_state(ConnectionState::Disconnected);
        let _ = self.open_link(true).await;
    }

    /// Drop the rejected link so a later `connect` opens a fresh one
    fn expire_session(&self) {
        tracing::error!("Session renewal failed, login required");
        self.session_expired.store(true, Ordering::SeqCst);
        self.cancel_reconnect();
        if let Some(link) = self.link.lock().take() {
            link.close("session expired");
        }
        self.set_state(ConnectionState::SessionExpired);
    }

    fn handle_link_lost(self: &Arc<Self>, generation: u64) {
        let link = {
            let mut slot = self.link.lock();
            match slot.as_ref() {
                Some(l) if l.generation == generation => slot.take(),
                _ => None,
            }
        };
        let Some(mut link) = link else {
            tracing::trace!(generation, "Ignoring close of superseded link");
            return;
        };

        link.stop_heartbeat();
        if !self.session_expired.load(Ordering::SeqCst) {
            self.set_state(ConnectionState::Disconnected);
        }
        self.schedule_reconnect();
    }

    /// Start a fresh reconnect loop, replacing any running one
    fn schedule_reconnect(self: &Arc<Self>) {
        if self.shut_down.load(Ordering::SeqCst) || self.session_expired.load(Ordering::SeqCst) {
            return;
        }

        let weak = Arc::downgrade(self);
        let mut backoff = Backoff::new(self.config.reconnect_initial, self.config.reconnect_max);

        let task = tokio::spawn(async move {
            loop {
                let delay = backoff.next_delay();
                tracing::debug!(delay_ms = delay.as_millis() as u64, "Reconnecting after delay");
                tokio::time::sleep(delay).await;

                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if inner.is_connected()
                    || inner.shut_down.load(Ordering::SeqCst)
                    || inner.session_expired.load(Ordering::SeqCst)
                {
                    return;
                }
                let _ = inner.open_link(false).await;
            }
        });

        if let Some(previous) = self.reconnect.lock().replace(task) {
            previous.abort();
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(task) = self.reconnect.get_mut().take() {
            task.abort();
        }
        if let Some(task) = self.renewal.get_mut().take() {
            task.abort();
        }
        if let Some(link) = self.link.get_mut().take() {
            link.close("Client dropped");
        }
    }
}

async fn read_loop(weak: Weak<Inner>, generation: u64, mut inbound: mpsc::Receiver<TransportEvent>) {
    while let Some(event) = inbound.recv().await {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        match event {
            TransportEvent::Text(text) => inner.handle_text(generation, &text),
            TransportEvent::Closed { code, reason } => {
                tracing::info!(?code, reason = %reason, "Link closed");
                inner.handle_link_lost(generation);
                return;
            }
            TransportEvent::Failed(error) => {
                tracing::warn!(error = %error, "Link failed");
                inner.handle_link_lost(generation);
                return;
            }
        }
    }

    if let Some(inner) = weak.upgrade() {
        inner.handle_link_lost(generation);
    }
}

fn spawn_heartbeat(outbound: mpsc::UnboundedSender<Outbound>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if outbound.send(Outbound::Text("\n".to_string())).is_err() {
                return;
            }
        }
    })
}
