//! Test helpers for integration tests
//!
//! [`FakeBroker`] accepts STOMP-over-WebSocket connections and hands each one
//! to the test as a [`BrokerSession`]. [`FakeApi`] serves the REST endpoints
//! the client needs, with server-side control over which tokens are valid.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use adigo_api::ApiClient;
use adigo_common::{MemoryTokenStore, SharedSessionRenewer, SharedTokenStore, TokenPair};
use adigo_gateway::{StompClient, StompCommand, StompConfig, StompFrame};
use anyhow::{ensure, Context, Result};
use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::fixtures::{
    connected_frame, envelope, friend_list, token_pair_json, user_json, TEST_EMAIL, TEST_PASSWORD,
};

/// How long a helper waits for the client before failing the test
pub const WAIT: Duration = Duration::from_secs(5);

async fn serve(app: Router) -> Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    Ok((addr, handle))
}

// ============================================================================
// Fake STOMP broker
// ============================================================================

pub struct FakeBroker {
    pub addr: SocketAddr,
    sessions: mpsc::UnboundedReceiver<BrokerSession>,
    _handle: JoinHandle<()>,
}

impl FakeBroker {
    pub async fn start() -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = Router::new()
            .route("/ws-stomp", get(broker_handler))
            .with_state(tx);
        let (addr, handle) = serve(app).await?;

        Ok(Self {
            addr,
            sessions: rx,
            _handle: handle,
        })
    }

    pub fn url(&self) -> String {
        format!("ws://{}/ws-stomp", self.addr)
    }

    /// Client settings pointed at this broker, with fast reconnects
    pub fn stomp_config(&self) -> StompConfig {
        StompConfig {
            reconnect_initial: Duration::from_millis(50),
            reconnect_max: Duration::from_millis(200),
            heartbeat_outgoing: Duration::ZERO,
            heartbeat_incoming: Duration::ZERO,
            disconnect_grace: Duration::from_millis(20),
            ..StompConfig::new(self.url())
        }
    }

    /// Wait for the next WebSocket connection
    pub async fn accept(&mut self) -> Result<BrokerSession> {
        tokio::time::timeout(WAIT, self.sessions.recv())
            .await
            .context("no client connected")?
            .context("broker stopped")
    }

    /// Connection that is already waiting, if any
    pub fn try_accept(&mut self) -> Option<BrokerSession> {
        self.sessions.try_recv().ok()
    }

    /// Accept a connection and answer its CONNECT, returning the CONNECT frame
    pub async fn accept_connected(&mut self) -> Result<(BrokerSession, StompFrame)> {
        let mut session = self.accept().await?;
        let connect = session.expect(StompCommand::Connect).await?;
        session.send(&connected_frame());
        Ok((session, connect))
    }
}

async fn broker_handler(
    State(sessions): State<mpsc::UnboundedSender<BrokerSession>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(sessions, socket))
}

async fn handle_socket(sessions: mpsc::UnboundedSender<BrokerSession>, socket: WebSocket) {
    let (mut ws_sink, mut ws_stream) = socket.split();
    let (frames_tx, frames_rx) = mpsc::unbounded_channel();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();

    let session = BrokerSession {
        frames: frames_rx,
        outgoing: out_tx,
    };
    if sessions.send(session).is_err() {
        return;
    }

    let send_task = tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if ws_sink.send(msg).await.is_err() || closing {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_stream.next().await {
        match msg {
            Message::Text(text) => {
                // heart-beats parse to nothing
                if let Ok(Some(frame)) = StompFrame::parse(&text) {
                    if frames_tx.send(frame).is_err() {
                        break;
                    }
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
    send_task.abort();
}

/// Broker side of one client connection
pub struct BrokerSession {
    frames: mpsc::UnboundedReceiver<StompFrame>,
    outgoing: mpsc::UnboundedSender<Message>,
}

impl BrokerSession {
    /// Next frame from the client, `None` once the client hung up
    pub async fn next_frame(&mut self) -> Result<Option<StompFrame>> {
        tokio::time::timeout(WAIT, self.frames.recv())
            .await
            .context("client sent nothing")
    }

    pub async fn expect(&mut self, command: StompCommand) -> Result<StompFrame> {
        let frame = self
            .next_frame()
            .await?
            .with_context(|| format!("connection closed while waiting for {command}"))?;
        ensure!(
            frame.command == command,
            "expected {command}, got {}",
            frame.command
        );
        Ok(frame)
    }

    pub fn send(&self, frame: &StompFrame) {
        let _ = self.outgoing.send(Message::Text(frame.to_wire()));
    }

    /// Close the WebSocket from the server side
    pub fn close(&self, code: u16, reason: &str) {
        let _ = self.outgoing.send(Message::Close(Some(CloseFrame {
            code,
            reason: reason.to_string().into(),
        })));
    }

    /// Wait until the client drops the connection
    pub async fn closed(&mut self) -> Result<()> {
        loop {
            if self.next_frame().await?.is_none() {
                return Ok(());
            }
        }
    }
}

// ============================================================================
// Fake REST server
// ============================================================================

/// Server-side session state of the fake REST API
pub struct ApiState {
    access: Mutex<String>,
    refresh: Mutex<String>,
    issued: AtomicU32,
    pub reissue_calls: AtomicU32,
    pub protected_calls: AtomicU32,
}

impl ApiState {
    fn new() -> Self {
        Self {
            access: Mutex::new(String::new()),
            refresh: Mutex::new(String::new()),
            issued: AtomicU32::new(0),
            reissue_calls: AtomicU32::new(0),
            protected_calls: AtomicU32::new(0),
        }
    }

    fn issue(&self) -> Value {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let access = format!("access-{n}");
        let refresh = format!("refresh-{n}");
        *self.access.lock() = access.clone();
        *self.refresh.lock() = refresh.clone();
        token_pair_json(&access, &refresh)
    }

    /// Issue a pair out of band, as if the client had logged in earlier
    pub fn issue_pair(&self) -> TokenPair {
        let pair = self.issue();
        TokenPair::bearer(
            pair["accessToken"].as_str().unwrap_or_default(),
            pair["refreshToken"].as_str().unwrap_or_default(),
        )
    }

    pub fn current_access(&self) -> String {
        self.access.lock().clone()
    }

    /// Invalidate the access token; the refresh token stays usable
    pub fn expire_access(&self) {
        *self.access.lock() = format!("revoked-{}", self.issued.load(Ordering::SeqCst));
    }

    /// Invalidate both tokens
    pub fn revoke_session(&self) {
        self.expire_access();
        *self.refresh.lock() = "revoked".to_string();
    }

    pub fn reissues(&self) -> u32 {
        self.reissue_calls.load(Ordering::SeqCst)
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let expected = format!("Bearer {}", self.access.lock());
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected)
    }
}

type ApiResponse = (StatusCode, Json<Value>);

fn unauthorized() -> ApiResponse {
    (
        StatusCode::UNAUTHORIZED,
        Json(envelope(401, "Unauthorized", Value::Null)),
    )
}

fn ok(data: Value) -> ApiResponse {
    (StatusCode::OK, Json(envelope(200, "success", data)))
}

async fn login(State(state): State<Arc<ApiState>>, Json(body): Json<Value>) -> ApiResponse {
    if body["email"] == TEST_EMAIL && body["password"] == TEST_PASSWORD {
        ok(state.issue())
    } else {
        unauthorized()
    }
}

async fn reissue(State(state): State<Arc<ApiState>>, Json(body): Json<Value>) -> ApiResponse {
    state.reissue_calls.fetch_add(1, Ordering::SeqCst);
    // widen the window for concurrent callers
    tokio::time::sleep(Duration::from_millis(50)).await;

    let valid = body["refreshToken"].as_str() == Some(state.refresh.lock().as_str());
    if valid {
        ok(state.issue())
    } else {
        unauthorized()
    }
}

async fn friends(State(state): State<Arc<ApiState>>, headers: HeaderMap) -> ApiResponse {
    state.protected_calls.fetch_add(1, Ordering::SeqCst);
    if state.authorized(&headers) {
        ok(friend_list())
    } else {
        unauthorized()
    }
}

async fn me(State(state): State<Arc<ApiState>>, headers: HeaderMap) -> ApiResponse {
    state.protected_calls.fetch_add(1, Ordering::SeqCst);
    if state.authorized(&headers) {
        ok(user_json(1, "tester"))
    } else {
        unauthorized()
    }
}

pub struct FakeApi {
    pub addr: SocketAddr,
    pub state: Arc<ApiState>,
    _handle: JoinHandle<()>,
}

impl FakeApi {
    pub async fn start() -> Result<Self> {
        let state = Arc::new(ApiState::new());
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/reissue", post(reissue))
            .route("/api/member/friend/list", get(friends))
            .route("/api/member/me", get(me))
            .with_state(Arc::clone(&state));
        let (addr, handle) = serve(app).await?;

        Ok(Self {
            addr,
            state,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api/", self.addr)
    }

    /// Client with its own in-memory token store
    pub fn client(&self) -> Result<ApiClient> {
        self.client_with_store(MemoryTokenStore::shared())
    }

    pub fn client_with_store(&self, store: SharedTokenStore) -> Result<ApiClient> {
        Ok(ApiClient::builder(self.base_url())
            .timeout(WAIT)
            .token_store(store)
            .build()?)
    }
}

/// Client whose transport is a real WebSocket to `broker`
///
/// With `api`, rejected tokens are renewed through its authenticator.
pub fn stomp_client(
    broker: &FakeBroker,
    tokens: SharedTokenStore,
    api: Option<&ApiClient>,
) -> StompClient {
    let renewer = api.map(|api| -> SharedSessionRenewer { api.authenticator() });
    StompClient::websocket(broker.stomp_config(), tokens, renewer)
}
