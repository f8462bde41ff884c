use std::{fmt, time::Duration};

use async_trait::async_trait;
use serde_json::{Map, Value};
use spaceport_model::RecordId;
use sqlx::{PgPool, postgres::PgPoolOptions, types::Json};
use tracing::info;

use super::DocumentStore;
use crate::error::{StoreError, StoreResult};

/// Document store backed by a single `documents` table with a JSONB body.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl fmt::Debug for PostgresStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresStore")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .finish()
    }
}

impl PostgresStore {
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(url)
            .await?;

        info!(max_connections, "database pool initialized");
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        crate::MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|err| StoreError::Database(err.into()))?;
        info!("database migrations applied");
        Ok(())
    }
}

fn map_write_error(err: sqlx::Error, collection: &str, unique: &[&'static str]) -> StoreError {
    let conflict: Option<&'static str> = err
        .as_database_error()
        .filter(|db_err| db_err.is_unique_violation())
        .map(|db_err| match db_err.constraint() {
            Some("documents_pkey") => "id",
            _ => unique.first().copied().unwrap_or("id"),
        });

    match conflict {
        Some(field) => StoreError::Conflict {
            collection: collection.to_string(),
            field: field.to_string(),
        },
        None => StoreError::Database(err),
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Value>> {
        let rows: Vec<(Json<Value>,)> = sqlx::query_as(
            r#"
            SELECT body FROM documents
            WHERE collection = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(Json(body),)| body).collect())
    }

    async fn get(&self, collection: &str, id: &RecordId) -> StoreResult<Option<Value>> {
        let row: Option<(Json<Value>,)> = sqlx::query_as(
            "SELECT body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id.to_hex())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(Json(body),)| body))
    }

    async fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<Option<Value>> {
        let row: Option<(Json<Value>,)> = sqlx::query_as(
            r#"
            SELECT body FROM documents
            WHERE collection = $1 AND body->>$2 = $3
            ORDER BY created_at, id
            LIMIT 1
            "#,
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(Json(body),)| body))
    }

    async fn insert(
        &self,
        collection: &str,
        id: &RecordId,
        body: Value,
        unique: &[&'static str],
    ) -> StoreResult<()> {
        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(id.to_hex())
            .bind(Json(body))
            .execute(&self.pool)
            .await
            .map_err(|err| map_write_error(err, collection, unique))?;
        Ok(())
    }

    async fn merge(
        &self,
        collection: &str,
        id: &RecordId,
        fields: Map<String, Value>,
        unique: &[&'static str],
    ) -> StoreResult<Option<Value>> {
        let row: Option<(Json<Value>,)> = sqlx::query_as(
            r#"
            UPDATE documents SET body = body || $3
            WHERE collection = $1 AND id = $2
            RETURNING body
            "#,
        )
        .bind(collection)
        .bind(id.to_hex())
        .bind(Json(Value::Object(fields)))
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_write_error(err, collection, unique))?;

        Ok(row.map(|(Json(body),)| body))
    }

    async fn remove(&self, collection: &str, id: &RecordId) -> StoreResult<Option<Value>> {
        let row: Option<(Json<Value>,)> = sqlx::query_as(
            "DELETE FROM documents WHERE collection = $1 AND id = $2 RETURNING body",
        )
        .bind(collection)
        .bind(id.to_hex())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(Json(body),)| body))
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
