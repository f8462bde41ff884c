//! # Spaceport Core
//!
//! Credential verification, token issuance and the generic record contract
//! behind the Spaceport HTTP layer.
//!
//! ## Overview
//!
//! - **Password hashing**: Argon2id with a random salt and optional server pepper
//! - **Tokens**: HS256-signed claims, verified against the configured key ring,
//!   with optional lifetime and an in-memory revocation list
//! - **Stores**: a document-store port with PostgreSQL and in-memory adapters
//! - **Resources**: one generic list/get/create/update/delete service shared by
//!   every collection, each collection declaring its own access policy
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use spaceport_core::{
//!     auth::{PasswordHasher, TokenService, TokenSettings},
//!     resource::ResourceService,
//!     store::MemoryStore,
//! };
//! use spaceport_model::{IdentityDraft, Identity};
//!
//! async fn register_and_issue() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new());
//!     let hasher = Arc::new(PasswordHasher::new(None)?);
//!     let tokens = TokenService::new(TokenSettings::new("a-long-random-signing-secret"))?;
//!
//!     let identities = ResourceService::<Identity>::new(store, hasher);
//!     let draft = IdentityDraft {
//!         handle: Some("alice".into()),
//!         email: Some("alice@example.com".into()),
//!         secret: Some("pw1234".into()),
//!         is_privileged: None,
//!     };
//!     let alice = identities.create(draft, None).await?;
//!     let issued = tokens.issue(&alice)?;
//!     println!("token for {}: {}", alice.handle, issued.token);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Password hashing, token issuance/verification and the login flow
pub mod auth;

/// Seeding of a privileged identity at startup
pub mod bootstrap;

/// Error types shared by the store and resource layers
pub mod error;

/// Generic record contract and per-collection access policies
pub mod resource;

/// Document-store port and adapters
pub mod store;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use error::{ResourceError, StoreError};
