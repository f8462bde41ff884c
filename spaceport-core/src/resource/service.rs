use std::{fmt, sync::Arc};

use spaceport_model::RecordId;
use tracing::info;

use super::{Resource, WriteContext};
use crate::{
    auth::{Claims, PasswordHasher},
    error::{ResourceError, ResourceResult},
    store::{DocumentStore, Repository},
};

/// list/get/create/update/delete for one collection.
pub struct ResourceService<R> {
    repo: Repository<R>,
    hasher: Arc<PasswordHasher>,
}

impl<R> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            hasher: Arc::clone(&self.hasher),
        }
    }
}

impl<R: Resource> fmt::Debug for ResourceService<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceService")
            .field("collection", &R::COLLECTION)
            .finish_non_exhaustive()
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(store: Arc<dyn DocumentStore>, hasher: Arc<PasswordHasher>) -> Self {
        Self {
            repo: Repository::new(store),
            hasher,
        }
    }

    fn not_found(raw: &str) -> ResourceError {
        ResourceError::NotFound {
            collection: R::COLLECTION,
            id: raw.to_string(),
        }
    }

    pub async fn list(&self) -> ResourceResult<Vec<R>> {
        Ok(self.repo.list().await?)
    }

    /// A malformed identifier can never name a record, so it reads as not found.
    pub async fn get(&self, raw_id: &str) -> ResourceResult<R> {
        let Ok(id) = RecordId::parse(raw_id) else {
            return Err(Self::not_found(raw_id));
        };

        self.repo
            .get(&id)
            .await?
            .ok_or_else(|| Self::not_found(raw_id))
    }

    pub async fn create(&self, draft: R::Draft, caller: Option<&Claims>) -> ResourceResult<R> {
        let ctx = WriteContext {
            hasher: &self.hasher,
            caller,
        };
        let record = R::from_draft(RecordId::generate(), draft, &ctx)?;
        self.repo.insert(&record).await?;

        info!(collection = R::COLLECTION, id = %record.id(), "record created");
        Ok(record)
    }

    /// Overwrite the supplied fields only and return the updated record.
    ///
    /// The identifier is checked before the payload and before the store.
    pub async fn update(
        &self,
        raw_id: &str,
        patch: R::Patch,
        caller: Option<&Claims>,
    ) -> ResourceResult<R> {
        let id = RecordId::parse(raw_id)?;
        let ctx = WriteContext {
            hasher: &self.hasher,
            caller,
        };
        let fields = R::patch_fields(patch, &ctx)?;

        let updated = self
            .repo
            .merge(&id, fields)
            .await?
            .ok_or_else(|| Self::not_found(raw_id))?;

        info!(collection = R::COLLECTION, %id, "record updated");
        Ok(updated)
    }

    pub async fn delete(&self, raw_id: &str) -> ResourceResult<R> {
        let id = RecordId::parse(raw_id)?;

        let removed = self
            .repo
            .remove(&id)
            .await?
            .ok_or_else(|| Self::not_found(raw_id))?;

        info!(collection = R::COLLECTION, %id, "record deleted");
        Ok(removed)
    }
}
