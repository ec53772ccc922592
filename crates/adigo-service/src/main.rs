//! Adigo headless agent
//!
//! Logs in, keeps a STOMP session open, shares a fixed position and logs how
//! far away each friend is. Run with:
//! ```bash
//! ADIGO_EMAIL=me@example.com ADIGO_PASSWORD=secret \
//! ADIGO_LATITUDE=37.45 ADIGO_LONGITUDE=127.13 \
//! cargo run -p adigo-service --bin adigo-agent
//! ```

use adigo_api::{dto::LoginRequest, ApiClient, ApiClientBuilder};
use adigo_cache::{UserLocationStore, UserStore};
use adigo_common::{
    try_init_tracing_with_config, AgentConfig, ClientConfig, FileTokenStore, SharedSessionRenewer,
    SharedTokenStore, TokenStore, TracingConfig,
};
use adigo_core::{Coordinate, UserRepository};
use adigo_gateway::{StompClient, StompConfig};
use adigo_service::{friend_locations, FixedLocationProvider, LocationPublisher, LocationReceiver};
use anyhow::{bail, Context};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %format!("{e:#}"), "Agent stopped");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = ClientConfig::from_env().context("Failed to load configuration")?;

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }
    info!(
        env = ?config.app.env,
        api = %config.api.base_url,
        ws = %config.gateway.url,
        "Configuration loaded"
    );

    let tokens: SharedTokenStore = Arc::new(
        FileTokenStore::open(&config.storage.token_path).context("Failed to open token store")?,
    );
    let api = ApiClientBuilder::from_config(&config.api)
        .token_store(Arc::clone(&tokens))
        .build()?;

    ensure_session(&api, &config.agent).await?;

    let users = UserStore::new_shared();
    match api.friends().await {
        Ok(friends) => {
            info!(count = friends.len(), "Friend list loaded");
            users.replace_all(friends).await?;
        }
        Err(e) => warn!(error = %e, "Failed to load friend list"),
    }

    let renewer: SharedSessionRenewer = api.authenticator();
    let stomp = StompClient::websocket(
        StompConfig::from_gateway(&config.gateway),
        tokens,
        Some(renewer),
    );
    let locations = UserLocationStore::new_shared();

    let receiver = LocationReceiver::new(stomp.clone(), locations.clone());
    receiver.start();
    if let Err(e) = stomp.connect().await {
        warn!(error = %e, "Initial connect failed, retrying in background");
    }

    let publisher = LocationPublisher::new(stomp.clone());
    let mut tasks: Vec<JoinHandle<()>> = Vec::new();
    match fixed_position(&config.agent)? {
        Some(here) => {
            let every = Duration::from_millis(config.location.update_interval_ms);
            tasks.push(publisher.spawn(Box::new(FixedLocationProvider::new(here, every))));
        }
        None => info!("No ADIGO_LATITUDE/ADIGO_LONGITUDE set, not sharing a position"),
    }
    tasks.push(publisher.spawn_friend_requests(Duration::from_millis(
        config.location.friends_poll_ms,
    )));
    tasks.push(tokio::spawn(report_distances(locations, users, publisher)));

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    info!("Shutting down");

    for task in tasks {
        task.abort();
    }
    receiver.stop();
    stomp.shutdown().await;
    Ok(())
}

/// Reuse the stored session, renew it, or log in with the configured credentials
async fn ensure_session(api: &ApiClient, agent: &AgentConfig) -> anyhow::Result<()> {
    let tokens = api.token_store();
    if !tokens.is_access_expired() {
        info!("Using stored session");
        return Ok(());
    }

    if tokens.refresh_token().is_some() && api.reissue().await.is_some() {
        info!("Stored session renewed");
        return Ok(());
    }

    let (Some(email), Some(password)) = (&agent.email, &agent.password) else {
        bail!("No usable session; set ADIGO_EMAIL and ADIGO_PASSWORD");
    };
    api.login(&LoginRequest::new(email.as_str(), password.as_str()))
        .await
        .context("Login failed")?;
    Ok(())
}

fn fixed_position(agent: &AgentConfig) -> anyhow::Result<Option<Coordinate>> {
    match (agent.latitude, agent.longitude) {
        (Some(lat), Some(lng)) => Ok(Some(Coordinate::new(lat, lng)?)),
        (None, None) => Ok(None),
        _ => bail!("ADIGO_LATITUDE and ADIGO_LONGITUDE must be set together"),
    }
}

async fn report_distances(
    locations: Arc<UserLocationStore>,
    users: Arc<UserStore>,
    publisher: LocationPublisher,
) {
    let mut updates = locations.subscribe();
    while updates.changed().await.is_ok() {
        let Some(here) = publisher.current_position() else {
            continue;
        };
        let friends = match friend_locations(locations.as_ref(), here).await {
            Ok(friends) => friends,
            Err(e) => {
                warn!(error = %e, "Failed to read friend locations");
                continue;
            }
        };

        for friend in friends {
            let name = match friend.id.parse::<i64>() {
                Ok(id) => users.find_by_id(id).await.ok().flatten().map(|u| u.nickname),
                Err(_) => None,
            };
            info!(
                friend = %name.as_deref().unwrap_or(&friend.id),
                distance_m = friend.distance_meters.round(),
                bearing = friend.bearing_degrees.round(),
                "Friend position"
            );
        }
    }
}
