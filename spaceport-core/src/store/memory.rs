use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use spaceport_model::RecordId;

use super::DocumentStore;
use crate::error::{StoreError, StoreResult};

type Collection = BTreeMap<String, Value>;

/// Process-local store for development and tests. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_unique(
    collection_name: &str,
    collection: &Collection,
    own_key: &str,
    body: &Value,
    unique: &[&'static str],
) -> StoreResult<()> {
    for field in unique {
        let Some(candidate) = body.get(*field) else {
            continue;
        };
        let taken = collection
            .iter()
            .any(|(key, doc)| key != own_key && doc.get(*field) == Some(candidate));
        if taken {
            return Err(StoreError::Conflict {
                collection: collection_name.to_string(),
                field: (*field).to_string(),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Value>> {
        let guard = self.collections.read();
        Ok(guard
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &RecordId) -> StoreResult<Option<Value>> {
        let guard = self.collections.read();
        Ok(guard
            .get(collection)
            .and_then(|docs| docs.get(&id.to_hex()))
            .cloned())
    }

    async fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<Option<Value>> {
        let guard = self.collections.read();
        Ok(guard.get(collection).and_then(|docs| {
            docs.values()
                .find(|doc| doc.get(field).and_then(Value::as_str) == Some(value))
                .cloned()
        }))
    }

    async fn insert(
        &self,
        collection: &str,
        id: &RecordId,
        body: Value,
        unique: &[&'static str],
    ) -> StoreResult<()> {
        let key = id.to_hex();
        let mut guard = self.collections.write();
        let docs = guard.entry(collection.to_string()).or_default();

        if docs.contains_key(&key) {
            return Err(StoreError::Conflict {
                collection: collection.to_string(),
                field: "id".to_string(),
            });
        }
        check_unique(collection, docs, &key, &body, unique)?;

        docs.insert(key, body);
        Ok(())
    }

    async fn merge(
        &self,
        collection: &str,
        id: &RecordId,
        fields: Map<String, Value>,
        unique: &[&'static str],
    ) -> StoreResult<Option<Value>> {
        let key = id.to_hex();
        let mut guard = self.collections.write();
        let Some(docs) = guard.get_mut(collection) else {
            return Ok(None);
        };
        let Some(current) = docs.get(&key) else {
            return Ok(None);
        };

        let mut merged = current.clone();
        if let Value::Object(target) = &mut merged {
            target.extend(fields);
        }
        check_unique(collection, docs, &key, &merged, unique)?;

        docs.insert(key, merged.clone());
        Ok(Some(merged))
    }

    async fn remove(&self, collection: &str, id: &RecordId) -> StoreResult<Option<Value>> {
        let mut guard = self.collections.write();
        Ok(guard
            .get_mut(collection)
            .and_then(|docs| docs.remove(&id.to_hex())))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_get_and_list() {
        let store = MemoryStore::new();
        let a = RecordId::generate();
        let b = RecordId::generate();
        store
            .insert("rovers", &a, json!({"id": a.to_hex(), "name": "Spirit"}), &[])
            .await
            .unwrap();
        store
            .insert("rovers", &b, json!({"id": b.to_hex(), "name": "Opportunity"}), &[])
            .await
            .unwrap();

        let got = store.get("rovers", &a).await.unwrap().unwrap();
        assert_eq!(got["name"], "Spirit");
        assert_eq!(store.list("rovers").await.unwrap().len(), 2);
        assert!(store.list("missions").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unique_fields_conflict_on_insert_and_merge() {
        let store = MemoryStore::new();
        let a = RecordId::generate();
        let b = RecordId::generate();
        store
            .insert("users", &a, json!({"handle": "alice"}), &["handle"])
            .await
            .unwrap();
        store
            .insert("users", &b, json!({"handle": "bob"}), &["handle"])
            .await
            .unwrap();

        let dup = store
            .insert("users", &RecordId::generate(), json!({"handle": "alice"}), &["handle"])
            .await;
        assert!(matches!(dup, Err(StoreError::Conflict { field, .. }) if field == "handle"));

        let mut rename = Map::new();
        rename.insert("handle".into(), json!("alice"));
        let clash = store.merge("users", &b, rename, &["handle"]).await;
        assert!(matches!(clash, Err(StoreError::Conflict { .. })));

        // Re-writing your own value is not a collision.
        let mut same = Map::new();
        same.insert("handle".into(), json!("bob"));
        assert!(store.merge("users", &b, same, &["handle"]).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn merge_and_remove_missing_return_none() {
        let store = MemoryStore::new();
        let ghost = RecordId::generate();
        assert!(store.merge("rovers", &ghost, Map::new(), &[]).await.unwrap().is_none());
        assert!(store.remove("rovers", &ghost).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_one_matches_string_fields() {
        let store = MemoryStore::new();
        let id = RecordId::generate();
        store
            .insert("users", &id, json!({"handle": "alice", "email": "a@x"}), &[])
            .await
            .unwrap();

        assert!(store.find_one("users", "handle", "alice").await.unwrap().is_some());
        assert!(store.find_one("users", "handle", "bob").await.unwrap().is_none());
    }
}
