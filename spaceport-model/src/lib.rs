//! Core data model definitions shared across Spaceport crates.
#![allow(missing_docs)]

pub mod error;
pub mod identity;
pub mod ids;
pub mod mission;
pub mod presence;
pub mod rover;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use identity::{
    Identity, IdentityDraft, IdentityPatch, IdentityView, RequiredIdentity,
};
pub use ids::RecordId;
pub use mission::{Mission, MissionDraft, MissionPatch};
pub use presence::MissingFields;
pub use rover::{Rover, RoverDraft, RoverPatch};
