use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::{Map, Value, json};
use spaceport_core::{
    StoreError,
    auth::TokenSettings,
    error::StoreResult,
    store::DocumentStore,
};
use spaceport_model::RecordId;

mod support;
use support::{TEST_SECRET, build_state, serve};

/// Store whose backend is unreachable: every call fails.
#[derive(Debug)]
struct UnreachableStore;

fn unreachable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl DocumentStore for UnreachableStore {
    fn backend(&self) -> &'static str {
        "unreachable"
    }

    async fn list(&self, _collection: &str) -> StoreResult<Vec<Value>> {
        Err(unreachable())
    }

    async fn get(&self, _collection: &str, _id: &RecordId) -> StoreResult<Option<Value>> {
        Err(unreachable())
    }

    async fn find_one(
        &self,
        _collection: &str,
        _field: &str,
        _value: &str,
    ) -> StoreResult<Option<Value>> {
        Err(unreachable())
    }

    async fn insert(
        &self,
        _collection: &str,
        _id: &RecordId,
        _body: Value,
        _unique: &[&'static str],
    ) -> StoreResult<()> {
        Err(unreachable())
    }

    async fn merge(
        &self,
        _collection: &str,
        _id: &RecordId,
        _fields: Map<String, Value>,
        _unique: &[&'static str],
    ) -> StoreResult<Option<Value>> {
        Err(unreachable())
    }

    async fn remove(&self, _collection: &str, _id: &RecordId) -> StoreResult<Option<Value>> {
        Err(unreachable())
    }

    async fn ping(&self) -> StoreResult<()> {
        Err(unreachable())
    }
}

fn server() -> Result<axum_test::TestServer> {
    serve(build_state(
        Arc::new(UnreachableStore),
        TokenSettings::new(TEST_SECRET),
    )?)
}

fn assert_internal_error(body: &Value) {
    assert_eq!(
        body,
        &json!({ "error": { "message": "Store operation failed", "status": 500 } })
    );
}

#[tokio::test]
async fn list_reports_store_failure_as_500() -> Result<()> {
    let server = server()?;

    let response = server.get("/rovers").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_internal_error(&response.json());
    Ok(())
}

#[tokio::test]
async fn get_reports_store_failure_as_500() -> Result<()> {
    let server = server()?;

    let response = server.get(&format!("/rovers/{}", RecordId::generate())).await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_internal_error(&response.json());
    Ok(())
}

#[tokio::test]
async fn login_reports_store_failure_as_json_500() -> Result<()> {
    let server = server()?;

    let response = server
        .post("/login")
        .json(&json!({ "handle": "alice", "secret": "pw" }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": { "message": "Login failed", "status": 500 } })
    );
    Ok(())
}

#[tokio::test]
async fn health_reports_unreachable_store() -> Result<()> {
    let server = server()?;

    let response = server.get("/health").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["store"]["backend"], "unreachable");
    Ok(())
}
