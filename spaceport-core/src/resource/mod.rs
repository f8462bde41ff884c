//! The record contract every collection honors.
//!
//! A collection is a [`Resource`]: a stored [`Document`] plus the draft and
//! patch shapes clients send, the view clients receive and the
//! [`AccessPolicy`] the HTTP layer enforces. [`ResourceService`] implements
//! list/get/create/update/delete once for all of them.

use std::fmt;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use spaceport_model::RecordId;

use crate::{
    auth::{Claims, PasswordHasher},
    error::ResourceResult,
    store::Document,
};

mod collections;
pub mod policy;
pub mod service;

pub use policy::{Access, AccessPolicy, Operation};
pub use service::ResourceService;

/// Inputs available while turning a client payload into stored fields.
#[derive(Clone, Copy)]
pub struct WriteContext<'a> {
    pub hasher: &'a PasswordHasher,
    pub caller: Option<&'a Claims>,
}

impl fmt::Debug for WriteContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteContext")
            .field("caller", &self.caller.map(|c| &c.handle))
            .finish_non_exhaustive()
    }
}

impl WriteContext<'_> {
    pub fn caller_is_privileged(&self) -> bool {
        self.caller.is_some_and(|claims| claims.is_privileged)
    }
}

pub trait Resource: Document + Clone + 'static {
    type Draft: DeserializeOwned + Send + fmt::Debug;
    type Patch: DeserializeOwned + Send + fmt::Debug;
    type View: Serialize + Send;

    const POLICY: AccessPolicy;

    /// Build a new record; every required field must be present.
    fn from_draft(
        id: RecordId,
        draft: Self::Draft,
        ctx: &WriteContext<'_>,
    ) -> ResourceResult<Self>;

    /// Stored fields to overwrite. An empty patch is a validation failure.
    fn patch_fields(
        patch: Self::Patch,
        ctx: &WriteContext<'_>,
    ) -> ResourceResult<Map<String, Value>>;

    fn into_view(self) -> Self::View;
}
