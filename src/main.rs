//! Debate moderation server - moderator WebSocket endpoint.

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use debate_moderation::{
    adapters::{
        auth::PasswordCredentialVerifier,
        memory::{InMemoryAdminCredentialStore, InMemoryDiscussionRepository},
        postgres::{self, PostgresAdminCredentialStore, PostgresDiscussionRepository},
        websocket::{moderator_app, ModeratorSocketState, RoomManager},
    },
    application::{ConnectionGate, EventRouter, ModerationStore},
    config::{AppConfig, AuthConfig, ServerConfig},
    domain::foundation::{DebateId, ModeratorId, Username},
    ports::{AdminCredentialStore, DiscussionRepository},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let addr = config.server.socket_addr()?;
    info!(
        environment = ?config.server.environment,
        %addr,
        persistence = if config.database.is_some() { "postgres" } else { "memory" },
        "Starting debate moderation server"
    );

    let (discussions, credentials): (Arc<dyn DiscussionRepository>, Arc<dyn AdminCredentialStore>) =
        match &config.database {
            Some(database) => {
                let pool = postgres::connect_pool(database).await?;
                if database.run_migrations {
                    postgres::run_migrations(&pool).await?;
                    info!("Database migrations applied");
                }
                (
                    Arc::new(PostgresDiscussionRepository::new(pool.clone())),
                    Arc::new(PostgresAdminCredentialStore::new(pool)),
                )
            }
            None => {
                warn!("No database configured; discussions and admins are kept in memory");
                (
                    Arc::new(InMemoryDiscussionRepository::new()),
                    Arc::new(dev_credentials(&config.auth)?),
                )
            }
        };

    // Never hand out an id that is already on record.
    let first_id = discussions
        .max_discussion_id()
        .await?
        .map_or(1, |id| id.value() + 1);
    info!(first_debate_id = first_id, "Debate id sequence seeded");

    let router = EventRouter::new(
        Arc::new(ModerationStore::new(DebateId::new(first_id))),
        discussions,
        Arc::new(RoomManager::default()),
        config.moderation.clone(),
    );
    let gate = ConnectionGate::new(Arc::new(PasswordCredentialVerifier::new(credentials)));
    let app = moderator_app(ModeratorSocketState::new(Arc::new(gate), Arc::new(router)));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Moderator endpoint listening on /admin");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if server.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// In-memory admin store holding the configured development admin, if any.
fn dev_credentials(auth: &AuthConfig) -> anyhow::Result<InMemoryAdminCredentialStore> {
    let store = InMemoryAdminCredentialStore::new();
    match auth.dev_admin() {
        Some((username, hash)) => {
            store.insert(Username::new(username)?, ModeratorId::new(1), hash.to_string());
            info!(moderator = username, "Development admin registered");
        }
        None => warn!("No admins configured; every moderator connection will be rejected"),
    }
    Ok(store)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
