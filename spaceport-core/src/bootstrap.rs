use std::{fmt, sync::Arc};

use spaceport_model::{Identity, IdentityDraft, RecordId};
use tracing::info;

use crate::{
    auth::PasswordHasher,
    error::ResourceResult,
    store::{DocumentStore, Repository},
};

/// Credentials for the privileged identity seeded at startup.
#[derive(Clone)]
pub struct BootstrapIdentity {
    pub handle: String,
    pub email: String,
    pub secret: String,
}

impl fmt::Debug for BootstrapIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapIdentity")
            .field("handle", &self.handle)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Create the privileged identity unless its handle is already registered.
///
/// An existing identity is left untouched, including its secret. Returns
/// `true` when a record was created.
pub async fn ensure_privileged_identity(
    store: Arc<dyn DocumentStore>,
    hasher: &PasswordHasher,
    seed: &BootstrapIdentity,
) -> ResourceResult<bool> {
    let identities = Repository::<Identity>::new(store);

    if identities.find_by("handle", &seed.handle).await?.is_some() {
        return Ok(false);
    }

    // No caller exists yet, so the privilege check on `create` is bypassed.
    let required = IdentityDraft {
        handle: Some(seed.handle.clone()),
        email: Some(seed.email.clone()),
        secret: Some(seed.secret.clone()),
        is_privileged: Some(true),
    }
    .require()?;

    let identity = Identity {
        id: RecordId::generate(),
        handle: required.handle,
        email: required.email,
        secret_hash: hasher.hash(&required.secret)?,
        is_privileged: true,
    };
    identities.insert(&identity).await?;

    info!(target: "auth", identity_id = %identity.id, handle = %identity.handle, "seeded privileged identity");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn seeds_once_and_keeps_existing_secret() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let hasher = PasswordHasher::insecure_fast();
        let seed = BootstrapIdentity {
            handle: "admin".into(),
            email: "admin@example.com".into(),
            secret: "first".into(),
        };

        assert!(ensure_privileged_identity(Arc::clone(&store), &hasher, &seed).await.unwrap());

        let changed = BootstrapIdentity { secret: "second".into(), ..seed };
        assert!(!ensure_privileged_identity(Arc::clone(&store), &hasher, &changed).await.unwrap());

        let admin = Repository::<Identity>::new(store)
            .find_by("handle", "admin")
            .await
            .unwrap()
            .unwrap();
        assert!(admin.is_privileged);
        assert!(hasher.verify("first", &admin.secret_hash));
    }
}
