use std::{fmt, sync::Arc, time::Duration};

use spaceport_core::{
    auth::{Authenticator, PasswordHasher, TokenService},
    resource::{Resource, ResourceService},
    store::DocumentStore,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub hasher: Arc<PasswordHasher>,
    pub tokens: Arc<TokenService>,
    pub authenticator: Authenticator,
    /// `Max-Age` of the session cookie set at login
    pub cookie_max_age: Duration,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store.backend())
            .field("cookie_max_age", &self.cookie_max_age)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        hasher: Arc<PasswordHasher>,
        tokens: Arc<TokenService>,
        cookie_max_age: Duration,
    ) -> Self {
        let authenticator =
            Authenticator::new(Arc::clone(&store), Arc::clone(&hasher), Arc::clone(&tokens));
        Self {
            store,
            hasher,
            tokens,
            authenticator,
            cookie_max_age,
        }
    }

    pub fn resources<R: Resource>(&self) -> ResourceService<R> {
        ResourceService::new(Arc::clone(&self.store), Arc::clone(&self.hasher))
    }
}
