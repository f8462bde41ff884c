use std::sync::Arc;

use anyhow::Context;
use spaceport_config::{Config, DatabaseConfig};
use spaceport_core::{
    auth::{PasswordHasher, TokenService, TokenSettings},
    bootstrap::{BootstrapIdentity, ensure_privileged_identity},
    store::{DocumentStore, MemoryStore, PostgresStore},
};
use tracing::{info, warn};

use super::app_state::AppState;

/// PostgreSQL with migrations applied when a URL is configured, otherwise
/// the in-memory store.
pub async fn connect_store(database: &DatabaseConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let Some(url) = database.url.as_deref() else {
        warn!("no database configured; records are kept in memory and lost on restart");
        return Ok(Arc::new(MemoryStore::new()));
    };

    let store = PostgresStore::connect(url, database.max_connections)
        .await
        .context("failed to connect to PostgreSQL")?;
    store
        .migrate()
        .await
        .context("database migration failed")?;
    info!(max_connections = database.max_connections, "connected to PostgreSQL");
    Ok(Arc::new(store))
}

pub fn token_settings(config: &Config) -> TokenSettings {
    let auth = &config.auth;
    TokenSettings::new(auth.token_secret.clone())
        .with_previous_secrets(auth.previous_token_secrets.clone())
        .with_ttl(auth.token_ttl)
}

/// Everything the router needs, over an already-connected store.
pub async fn build_state_with_store(
    config: &Config,
    store: Arc<dyn DocumentStore>,
) -> anyhow::Result<AppState> {
    let hasher = PasswordHasher::new(config.auth.password_pepper.as_deref().map(str::as_bytes))
        .context("invalid password hashing parameters")?;
    let tokens = TokenService::new(token_settings(config))
        .context("invalid token signing configuration")?;

    if let Some(seed) = config.auth.bootstrap.as_ref() {
        let seed = BootstrapIdentity {
            handle: seed.handle.clone(),
            email: seed.email.clone(),
            secret: seed.secret.clone(),
        };
        let created = ensure_privileged_identity(Arc::clone(&store), &hasher, &seed)
            .await
            .context("failed to seed the privileged identity")?;
        if created {
            info!(target: "auth", handle = %seed.handle, "privileged identity created");
        }
    }

    Ok(AppState::new(
        store,
        Arc::new(hasher),
        Arc::new(tokens),
        config.auth.cookie_max_age,
    ))
}

pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let store = connect_store(&config.database).await?;
    build_state_with_store(config, store).await
}
