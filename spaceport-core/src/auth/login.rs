use std::sync::Arc;

use spaceport_model::Identity;
use thiserror::Error;
use tracing::{debug, info};

use super::{
    hasher::PasswordHasher,
    token::{IssuedToken, TokenError, TokenService},
};
use crate::{
    error::StoreError,
    store::{DocumentStore, Repository},
};

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Cannot find user: handle does not exist")]
    UnknownHandle,
    #[error("Login error: secret is not valid")]
    BadSecret,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Trades a handle and secret for a signed token.
#[derive(Debug, Clone)]
pub struct Authenticator {
    identities: Repository<Identity>,
    hasher: Arc<PasswordHasher>,
    tokens: Arc<TokenService>,
}

impl Authenticator {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        hasher: Arc<PasswordHasher>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            identities: Repository::new(store),
            hasher,
            tokens,
        }
    }

    pub async fn login(
        &self,
        handle: &str,
        secret: &str,
    ) -> Result<(Identity, IssuedToken), LoginError> {
        let Some(identity) = self.identities.find_by("handle", handle).await? else {
            debug!(target: "auth", handle, "login for unknown handle");
            return Err(LoginError::UnknownHandle);
        };

        if !self.hasher.verify(secret, &identity.secret_hash) {
            debug!(target: "auth", identity_id = %identity.id, "login with bad secret");
            return Err(LoginError::BadSecret);
        }

        let issued = self.tokens.issue(&identity)?;
        info!(target: "auth", identity_id = %identity.id, jti = %issued.claims.jti, "login succeeded");
        Ok((identity, issued))
    }
}
