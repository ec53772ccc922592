//! Test fixtures and data generators

use adigo_gateway::{StompCommand, StompFrame};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

pub const TEST_EMAIL: &str = "tester@adigo.site";
pub const TEST_PASSWORD: &str = "TestPass123!";

/// Standard response envelope
pub fn envelope(status: u16, message: &str, data: Value) -> Value {
    json!({
        "status": status,
        "message": message,
        "data": data,
    })
}

/// Token pair in the server's wire format
pub fn token_pair_json(access: &str, refresh: &str) -> Value {
    json!({
        "grantType": "Bearer",
        "accessToken": access,
        "refreshToken": refresh,
        "tokenExpiresIn": "1800000",
        "refreshTokenExpiresIn": "604800000",
    })
}

pub fn user_json(id: i64, nickname: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{nickname}@adigo.site"),
        "nickname": nickname,
        "profileImage": null,
        "authority": "ROLE_USER",
    })
}

/// Friends of the test user
pub fn friend_list() -> Value {
    json!([user_json(7, "minji"), user_json(9, "jisoo")])
}

/// CONNECTED frame without heart-beats
pub fn connected_frame() -> StompFrame {
    StompFrame::new(StompCommand::Connected)
        .header("version", "1.2")
        .header("session", format!("session-{}", unique_suffix()))
        .header("heart-beat", "0,0")
}

pub fn message_frame(destination: &str, body: &str) -> StompFrame {
    StompFrame::new(StompCommand::Message)
        .header("destination", destination)
        .header("subscription", "sub-0")
        .header("message-id", format!("msg-{}", unique_suffix()))
        .body(body)
}

pub fn error_frame(message: &str) -> StompFrame {
    StompFrame::new(StompCommand::Error).header("message", message)
}
