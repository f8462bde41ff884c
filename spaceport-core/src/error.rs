use spaceport_model::ModelError;
use thiserror::Error;

use crate::auth::HasherError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate value for unique field `{field}` in {collection}")]
    Conflict { collection: String, field: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt document {id} in {collection}: {source}")]
    Corrupt {
        collection: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures of the generic record operations.
///
/// `InvalidIdentifier`, `Validation` and `Forbidden` are always raised before
/// the store is touched.
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("{collection} record {id} not found")]
    NotFound { collection: &'static str, id: String },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("password hashing failed: {0}")]
    Hashing(#[from] HasherError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ResourceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { .. } => Self::Conflict(err.to_string()),
            other => Self::Store(other),
        }
    }
}

impl From<ModelError> for ResourceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidIdentifier(raw) => Self::InvalidIdentifier(raw),
            ModelError::MissingFields(_) => Self::Validation(err.to_string()),
        }
    }
}

pub type ResourceResult<T> = std::result::Result<T, ResourceError>;
