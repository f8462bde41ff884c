use serde::Serialize;
use serde_json::{Map, Value};
use spaceport_model::{
    Identity, IdentityDraft, IdentityPatch, IdentityView, Mission, MissionDraft,
    MissionPatch, RecordId, Rover, RoverDraft, RoverPatch,
};

use super::{Access, AccessPolicy, Resource, WriteContext};
use crate::{
    error::{ResourceError, ResourceResult},
    store::Document,
};

const EMPTY_PATCH: &str = "no fields to update";
const PRIVILEGE_REQUIRED: &str = "only privileged callers may set isPrivileged";

fn non_empty(fields: Map<String, Value>) -> ResourceResult<Map<String, Value>> {
    if fields.is_empty() {
        return Err(ResourceError::Validation(EMPTY_PATCH.to_string()));
    }
    Ok(fields)
}

fn patch_object<P: Serialize>(patch: &P) -> ResourceResult<Map<String, Value>> {
    match serde_json::to_value(patch).map_err(crate::StoreError::from)? {
        Value::Object(fields) => non_empty(fields),
        _ => Err(ResourceError::Validation(EMPTY_PATCH.to_string())),
    }
}

impl Document for Identity {
    const COLLECTION: &'static str = "users";
    const UNIQUE_FIELDS: &'static [&'static str] = &["handle"];

    fn id(&self) -> RecordId {
        self.id
    }
}

impl Resource for Identity {
    type Draft = IdentityDraft;
    type Patch = IdentityPatch;
    type View = IdentityView;

    const POLICY: AccessPolicy = AccessPolicy {
        list: Access::Privileged,
        get: Access::OwnerOrPrivileged,
        create: Access::OptionalSession,
        update: Access::OwnerOrPrivileged,
        delete: Access::OwnerOrPrivileged,
    };

    fn from_draft(
        id: RecordId,
        draft: IdentityDraft,
        ctx: &WriteContext<'_>,
    ) -> ResourceResult<Self> {
        let required = draft.require()?;
        if required.is_privileged && !ctx.caller_is_privileged() {
            return Err(ResourceError::Forbidden(PRIVILEGE_REQUIRED.to_string()));
        }

        Ok(Identity {
            id,
            handle: required.handle,
            email: required.email,
            secret_hash: ctx.hasher.hash(&required.secret)?,
            is_privileged: required.is_privileged,
        })
    }

    fn patch_fields(
        patch: IdentityPatch,
        ctx: &WriteContext<'_>,
    ) -> ResourceResult<Map<String, Value>> {
        patch.check_not_blank()?;
        if patch.is_privileged.is_some() && !ctx.caller_is_privileged() {
            return Err(ResourceError::Forbidden(PRIVILEGE_REQUIRED.to_string()));
        }

        let mut fields = Map::new();
        if let Some(handle) = patch.handle {
            fields.insert("handle".into(), Value::String(handle));
        }
        if let Some(email) = patch.email {
            fields.insert("email".into(), Value::String(email));
        }
        if let Some(secret) = patch.secret {
            fields.insert("secretHash".into(), Value::String(ctx.hasher.hash(&secret)?));
        }
        if let Some(is_privileged) = patch.is_privileged {
            fields.insert("isPrivileged".into(), Value::Bool(is_privileged));
        }
        non_empty(fields)
    }

    fn into_view(self) -> IdentityView {
        self.view()
    }
}

impl Document for Rover {
    const COLLECTION: &'static str = "rovers";

    fn id(&self) -> RecordId {
        self.id
    }
}

impl Resource for Rover {
    type Draft = RoverDraft;
    type Patch = RoverPatch;
    type View = Rover;

    const POLICY: AccessPolicy = AccessPolicy::PUBLIC_READ;

    fn from_draft(id: RecordId, draft: RoverDraft, _: &WriteContext<'_>) -> ResourceResult<Self> {
        Ok(Rover::from_draft(id, draft)?)
    }

    fn patch_fields(
        patch: RoverPatch,
        _: &WriteContext<'_>,
    ) -> ResourceResult<Map<String, Value>> {
        patch.check_not_blank()?;
        patch_object(&patch)
    }

    fn into_view(self) -> Rover {
        self
    }
}

impl Document for Mission {
    const COLLECTION: &'static str = "missions";

    fn id(&self) -> RecordId {
        self.id
    }
}

impl Resource for Mission {
    type Draft = MissionDraft;
    type Patch = MissionPatch;
    type View = Mission;

    const POLICY: AccessPolicy = AccessPolicy::PUBLIC_READ;

    fn from_draft(
        id: RecordId,
        draft: MissionDraft,
        _: &WriteContext<'_>,
    ) -> ResourceResult<Self> {
        Ok(Mission::from_draft(id, draft)?)
    }

    fn patch_fields(
        patch: MissionPatch,
        _: &WriteContext<'_>,
    ) -> ResourceResult<Map<String, Value>> {
        patch.check_not_blank()?;
        patch_object(&patch)
    }

    fn into_view(self) -> Mission {
        self
    }
}
