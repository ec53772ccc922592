//! STOMP session integration tests over a real WebSocket
//!
//! Run with: cargo test -p integration-tests --test stomp_tests

use std::sync::Arc;
use std::time::Duration;

use adigo_cache::UserLocationStore;
use adigo_common::{MemoryTokenStore, SharedTokenStore, TokenPair, TokenStore};
use adigo_core::{Coordinate, UserLocation};
use adigo_gateway::{ConnectionState, StompClient, StompCommand, FRIENDS_LOCATION_QUEUE};
use adigo_service::{
    LocationPublisher, LocationReceiver, LOCATION_UPDATE_DESTINATION, REQUEST_FRIENDS_DESTINATION,
};
use integration_tests::{
    error_frame, message_frame, stomp_client, BrokerSession, FakeApi, FakeBroker, WAIT,
};

fn tokens(access: &str) -> SharedTokenStore {
    Arc::new(MemoryTokenStore::with_tokens(TokenPair::bearer(access, "refresh-1")))
}

async fn wait_state(client: &StompClient, expected: ConnectionState) {
    let mut state = client.connection_state();
    tokio::time::timeout(WAIT, state.wait_for(|s| *s == expected))
        .await
        .unwrap_or_else(|_| panic!("client never reached {expected:?}"))
        .unwrap();
}

/// Connect and complete the handshake, consuming the default SUBSCRIBE
async fn connected(broker: &mut FakeBroker, client: &StompClient) -> (BrokerSession, String) {
    client.connect().await.unwrap();
    let (mut session, _) = broker.accept_connected().await.unwrap();
    wait_state(client, ConnectionState::Connected).await;

    let sub = session.expect(StompCommand::Subscribe).await.unwrap();
    assert_eq!(sub.get("destination"), Some(FRIENDS_LOCATION_QUEUE));
    let id = sub.get("id").unwrap().to_string();
    (session, id)
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[tokio::test]
async fn test_handshake_carries_bearer_token() {
    let mut broker = FakeBroker::start().await.unwrap();
    let client = stomp_client(&broker, tokens("access-1"), None);

    client.connect().await.unwrap();
    let (_session, connect) = broker.accept_connected().await.unwrap();

    assert_eq!(connect.get("Authorization"), Some("Bearer access-1"));
    assert_eq!(connect.get("accept-version"), Some("1.1,1.2"));
    wait_state(&client, ConnectionState::Connected).await;
}

#[tokio::test]
async fn test_reconnect_restores_subscriptions() {
    let mut broker = FakeBroker::start().await.unwrap();
    let client = stomp_client(&broker, tokens("access-1"), None);
    let (mut session, friends_id) = connected(&mut broker, &client).await;

    let extra_id = client.subscribe("/topic/notice");
    let sub = session.expect(StompCommand::Subscribe).await.unwrap();
    assert_eq!(sub.get("id"), Some(extra_id.as_str()));

    session.close(1011, "server restart");

    let (mut session, _) = broker.accept_connected().await.unwrap();
    wait_state(&client, ConnectionState::Connected).await;

    let mut resubscribed = Vec::new();
    for _ in 0..2 {
        let sub = session.expect(StompCommand::Subscribe).await.unwrap();
        resubscribed.push((
            sub.get("id").unwrap().to_string(),
            sub.get("destination").unwrap().to_string(),
        ));
    }
    resubscribed.sort();
    let mut expected = vec![
        (friends_id, FRIENDS_LOCATION_QUEUE.to_string()),
        (extra_id, "/topic/notice".to_string()),
    ];
    expected.sort();
    assert_eq!(resubscribed, expected);
}

#[tokio::test]
async fn test_disconnect_sends_disconnect_and_stays_down() {
    let mut broker = FakeBroker::start().await.unwrap();
    let client = stomp_client(&broker, tokens("access-1"), None);
    let (mut session, _) = connected(&mut broker, &client).await;

    client.disconnect().await;

    session.expect(StompCommand::Disconnect).await.unwrap();
    session.closed().await.unwrap();
    assert_eq!(client.state(), ConnectionState::Disconnected);

    // well past the reconnect delay
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(broker.try_accept().is_none());
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

// ============================================================================
// Token renewal
// ============================================================================

#[tokio::test]
async fn test_expired_token_error_renews_and_reconnects() {
    let api_server = FakeApi::start().await.unwrap();
    let store: SharedTokenStore = Arc::new(MemoryTokenStore::with_tokens(
        api_server.state.issue_pair(),
    ));
    let api = api_server.client_with_store(store.clone()).unwrap();

    let mut broker = FakeBroker::start().await.unwrap();
    let client = stomp_client(&broker, store.clone(), Some(&api));
    let (session, _) = connected(&mut broker, &client).await;

    session.send(&error_frame("Access token expired"));

    let (_session, connect) = broker.accept_connected().await.unwrap();
    assert_eq!(connect.get("Authorization"), Some("Bearer access-2"));
    assert_eq!(store.access_token().as_deref(), Some("access-2"));
    assert_eq!(api_server.state.reissues(), 1);
    wait_state(&client, ConnectionState::Connected).await;
}

#[tokio::test]
async fn test_failed_renewal_expires_session() {
    let api_server = FakeApi::start().await.unwrap();
    let store: SharedTokenStore = Arc::new(MemoryTokenStore::with_tokens(
        api_server.state.issue_pair(),
    ));
    let api = api_server.client_with_store(store.clone()).unwrap();

    let mut broker = FakeBroker::start().await.unwrap();
    let client = stomp_client(&broker, store, Some(&api));
    let (session, _) = connected(&mut broker, &client).await;

    api_server.state.revoke_session();
    session.send(&error_frame("Invalid JWT token"));

    wait_state(&client, ConnectionState::SessionExpired).await;
    assert_eq!(api_server.state.reissues(), 1);
}

// ============================================================================
// Location sharing
// ============================================================================

#[tokio::test]
async fn test_publisher_frames_reach_broker() {
    let mut broker = FakeBroker::start().await.unwrap();
    let client = stomp_client(&broker, tokens("access-1"), None);
    let (mut session, _) = connected(&mut broker, &client).await;
    let publisher = LocationPublisher::new(client.clone());

    publisher
        .send_my_location(Coordinate::new(37.45, 127.13).unwrap())
        .unwrap();
    publisher.request_friend_locations().unwrap();

    let update = session.expect(StompCommand::Send).await.unwrap();
    assert_eq!(update.get("destination"), Some(LOCATION_UPDATE_DESTINATION));
    assert_eq!(update.body, r#"{"latitude":37.45,"longitude":127.13}"#);

    let request = session.expect(StompCommand::Send).await.unwrap();
    assert_eq!(request.get("destination"), Some(REQUEST_FRIENDS_DESTINATION));
    assert_eq!(request.body, "{}");
}

#[tokio::test]
async fn test_friend_locations_flow_into_cache() {
    let mut broker = FakeBroker::start().await.unwrap();
    let client = stomp_client(&broker, tokens("access-1"), None);
    let store = UserLocationStore::new_shared();
    let receiver = LocationReceiver::new(client.clone(), store.clone());
    receiver.start();

    let (session, _) = connected(&mut broker, &client).await;
    session.send(&message_frame(
        FRIENDS_LOCATION_QUEUE,
        r#"[{"id":"7","lat":37.45,"lng":127.13}]"#,
    ));
    session.send(&message_frame(
        FRIENDS_LOCATION_QUEUE,
        r#"{"friends":[{"id":"7","latitude":37.5,"longitude":127.0},{"id":"9","latitude":35.1,"longitude":129.0}]}"#,
    ));

    let mut snapshot = store.subscribe();
    let locations = tokio::time::timeout(
        WAIT,
        snapshot.wait_for(|s| s.len() == 2 && s[0].lat == 37.5),
    )
    .await
    .expect("cache never caught up")
    .unwrap()
    .clone();

    assert_eq!(
        locations,
        vec![
            UserLocation::new("7", 37.5, 127.0),
            UserLocation::new("9", 35.1, 129.0),
        ]
    );
}
