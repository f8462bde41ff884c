//! Configuration loading for Spaceport.
//!
//! Values resolve environment first, then the TOML file, then built-in
//! defaults. Loading also applies guard rails that refuse unsafe production
//! settings and collects softer findings as [`ConfigWarnings`].
#![allow(missing_docs)]

pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader};
pub use models::{
    AuthConfig, BootstrapConfig, Config, ConfigMetadata, CorsConfig, DatabaseConfig,
    ServerConfig,
    sources::{EnvConfig, FileConfig},
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
