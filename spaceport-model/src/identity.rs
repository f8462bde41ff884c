//! Registered accounts.
//!
//! [`Identity`] is the stored shape and carries the Argon2 PHC string of the
//! account secret. It is never sent to clients; handlers render
//! [`IdentityView`] instead.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{error::Result, ids::RecordId, presence::MissingFields};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: RecordId,
    /// Unique login handle
    pub handle: String,
    pub email: String,
    /// PHC-formatted password hash, never the plaintext secret
    pub secret_hash: String,
    #[serde(default)]
    pub is_privileged: bool,
}

impl Identity {
    pub fn view(&self) -> IdentityView {
        IdentityView {
            id: self.id,
            handle: self.handle.clone(),
            email: self.email.clone(),
            is_privileged: self.is_privileged,
        }
    }
}

/// Client-facing projection of an [`Identity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityView {
    pub id: RecordId,
    pub handle: String,
    pub email: String,
    pub is_privileged: bool,
}

/// Registration payload.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityDraft {
    pub handle: Option<String>,
    pub email: Option<String>,
    pub secret: Option<String>,
    pub is_privileged: Option<bool>,
}

impl fmt::Debug for IdentityDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityDraft")
            .field("handle", &self.handle)
            .field("email", &self.email)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("is_privileged", &self.is_privileged)
            .finish()
    }
}

/// A registration payload with every required field present.
pub struct RequiredIdentity {
    pub handle: String,
    pub email: String,
    pub secret: String,
    pub is_privileged: bool,
}

impl IdentityDraft {
    pub fn require(self) -> Result<RequiredIdentity> {
        let mut missing = MissingFields::default();
        let handle = missing.text("handle", self.handle);
        let email = missing.text("email", self.email);
        let secret = missing.text("secret", self.secret);

        let (Some(handle), Some(email), Some(secret)) = (handle, email, secret) else {
            return Err(missing.into_error());
        };

        Ok(RequiredIdentity {
            handle,
            email,
            secret,
            is_privileged: self.is_privileged.unwrap_or(false),
        })
    }
}

/// Partial update; only supplied fields are written.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityPatch {
    pub handle: Option<String>,
    pub email: Option<String>,
    pub secret: Option<String>,
    pub is_privileged: Option<bool>,
}

impl fmt::Debug for IdentityPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityPatch")
            .field("handle", &self.handle)
            .field("email", &self.email)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("is_privileged", &self.is_privileged)
            .finish()
    }
}

impl IdentityPatch {
    pub fn check_not_blank(&self) -> Result<()> {
        let mut missing = MissingFields::default();
        missing.not_blank("handle", self.handle.as_ref());
        missing.not_blank("email", self.email.as_ref());
        missing.not_blank("secret", self.secret.as_ref());
        missing.finish()
    }
}
