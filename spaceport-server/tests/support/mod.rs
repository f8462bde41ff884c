#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use anyhow::{Result, anyhow};
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use spaceport_core::{
    auth::{PasswordHasher, TokenService, TokenSettings},
    bootstrap::{BootstrapIdentity, ensure_privileged_identity},
    store::{DocumentStore, MemoryStore},
};
use spaceport_server::{AppState, create_app};

pub const TEST_SECRET: &str = "integration-test-signing-secret-0123456789";
pub const ADMIN_HANDLE: &str = "root";
pub const ADMIN_SECRET: &str = "root-secret";

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

pub fn build_state(store: Arc<dyn DocumentStore>, settings: TokenSettings) -> Result<AppState> {
    let hasher = Arc::new(PasswordHasher::insecure_fast());
    let tokens = Arc::new(TokenService::new(settings)?);
    Ok(AppState::new(store, hasher, tokens, Duration::from_secs(3600)))
}

pub fn serve(state: AppState) -> Result<TestServer> {
    TestServer::builder()
        .http_transport()
        .build(create_app(state).into_make_service())
        .map_err(|err| anyhow!(err.to_string()))
}

pub async fn build_test_app_with(settings: TokenSettings) -> Result<TestApp> {
    let state = build_state(Arc::new(MemoryStore::new()), settings)?;

    let seed = BootstrapIdentity {
        handle: ADMIN_HANDLE.into(),
        email: "root@localhost".into(),
        secret: ADMIN_SECRET.into(),
    };
    ensure_privileged_identity(Arc::clone(&state.store), &state.hasher, &seed).await?;

    let server = serve(state.clone())?;
    Ok(TestApp { server, state })
}

/// In-memory store, cheap hashing and a privileged `root` identity.
pub async fn build_test_app() -> Result<TestApp> {
    build_test_app_with(TokenSettings::new(TEST_SECRET)).await
}

pub fn cookie(token: &str) -> String {
    format!("access_Token={token}")
}

pub async fn register(server: &TestServer, handle: &str, secret: &str) -> Value {
    let response = server
        .post("/users")
        .json(&json!({
            "handle": handle,
            "email": format!("{handle}@example.com"),
            "secret": secret,
        }))
        .await;
    response.assert_status_ok();
    response.json()
}

/// Logs in and returns the issued token.
pub async fn login(server: &TestServer, handle: &str, secret: &str) -> String {
    let response = server
        .post("/login")
        .json(&json!({ "handle": handle, "secret": secret }))
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    body["Access_Token"]
        .as_str()
        .unwrap_or_else(|| panic!("Access_Token missing from {body}"))
        .to_string()
}

pub async fn admin_token(server: &TestServer) -> String {
    login(server, ADMIN_HANDLE, ADMIN_SECRET).await
}
