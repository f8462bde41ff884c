//! Document-store port.
//!
//! Records are kept as JSON documents grouped by collection name and keyed by
//! [`RecordId`]. [`DocumentStore`] is the untyped port the adapters implement;
//! [`Repository`] layers typed (de)serialization on top of it.

use std::{fmt, marker::PhantomData, sync::Arc};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use spaceport_model::RecordId;

use crate::error::{StoreError, StoreResult};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

#[async_trait]
pub trait DocumentStore: Send + Sync + fmt::Debug {
    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    /// Every document in the collection, oldest first.
    async fn list(&self, collection: &str) -> StoreResult<Vec<Value>>;

    async fn get(&self, collection: &str, id: &RecordId) -> StoreResult<Option<Value>>;

    /// First document whose top-level string `field` equals `value`.
    async fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<Option<Value>>;

    /// Fails with [`StoreError::Conflict`] when a `unique` field collides with
    /// another document in the same collection.
    async fn insert(
        &self,
        collection: &str,
        id: &RecordId,
        body: Value,
        unique: &[&'static str],
    ) -> StoreResult<()>;

    /// Shallow-merge `fields` into the stored document and return the result,
    /// or `None` when there is no such document.
    async fn merge(
        &self,
        collection: &str,
        id: &RecordId,
        fields: Map<String, Value>,
        unique: &[&'static str],
    ) -> StoreResult<Option<Value>>;

    /// Remove and return the document, or `None` when there is no such document.
    async fn remove(&self, collection: &str, id: &RecordId) -> StoreResult<Option<Value>>;

    async fn ping(&self) -> StoreResult<()>;
}

/// A record type persisted as one document per record.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;
    /// Top-level fields that must not repeat within the collection.
    const UNIQUE_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> RecordId;
}

/// Typed view of one collection.
pub struct Repository<D> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> D>,
}

impl<D> Clone for Repository<D> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

impl<D> fmt::Debug for Repository<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("collection", &std::any::type_name::<D>())
            .field("store", &self.store.backend())
            .finish()
    }
}

impl<D: Document> Repository<D> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub async fn list(&self) -> StoreResult<Vec<D>> {
        self.store
            .list(D::COLLECTION)
            .await?
            .into_iter()
            .map(decode::<D>)
            .collect()
    }

    pub async fn get(&self, id: &RecordId) -> StoreResult<Option<D>> {
        self.store
            .get(D::COLLECTION, id)
            .await?
            .map(decode::<D>)
            .transpose()
    }

    pub async fn find_by(&self, field: &str, value: &str) -> StoreResult<Option<D>> {
        self.store
            .find_one(D::COLLECTION, field, value)
            .await?
            .map(decode::<D>)
            .transpose()
    }

    pub async fn insert(&self, record: &D) -> StoreResult<()> {
        let body = serde_json::to_value(record)?;
        self.store
            .insert(D::COLLECTION, &record.id(), body, D::UNIQUE_FIELDS)
            .await
    }

    pub async fn merge(
        &self,
        id: &RecordId,
        fields: Map<String, Value>,
    ) -> StoreResult<Option<D>> {
        self.store
            .merge(D::COLLECTION, id, fields, D::UNIQUE_FIELDS)
            .await?
            .map(decode::<D>)
            .transpose()
    }

    pub async fn remove(&self, id: &RecordId) -> StoreResult<Option<D>> {
        self.store
            .remove(D::COLLECTION, id)
            .await?
            .map(decode::<D>)
            .transpose()
    }
}

fn decode<D: Document>(body: Value) -> StoreResult<D> {
    let id = body
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or("<unknown>")
        .to_string();
    serde_json::from_value(body).map_err(|source| StoreError::Corrupt {
        collection: D::COLLECTION.to_string(),
        id,
        source,
    })
}
