use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{
    loader::ConfigLoadError,
    util::{non_empty_var, parse_bool_var, parse_csv_var, parse_number_var},
};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub auth: FileAuthConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_token_secrets: Option<Vec<String>>,
    /// humantime duration, e.g. `"12h"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_ttl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie_max_age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_pepper: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap_email: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_methods: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_headers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_credentials: Option<bool>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub database_url: Option<String>,
    pub database_max_connections: Option<u32>,
    pub auth_token_secret: Option<String>,
    pub auth_previous_token_secrets: Option<Vec<String>>,
    pub auth_token_ttl: Option<String>,
    pub auth_cookie_max_age: Option<String>,
    pub auth_password_pepper: Option<String>,
    pub auth_bootstrap_handle: Option<String>,
    pub auth_bootstrap_secret: Option<String>,
    pub auth_bootstrap_email: Option<String>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub cors_allowed_methods: Option<Vec<String>>,
    pub cors_allowed_headers: Option<Vec<String>>,
    pub cors_allow_credentials: Option<bool>,
    pub dev_mode: Option<bool>,
}

impl EnvConfig {
    pub fn gather() -> Result<Self, ConfigLoadError> {
        Ok(Self {
            config_path: non_empty_var("SPACEPORT_CONFIG").map(PathBuf::from),
            server_host: non_empty_var("SERVER_HOST"),
            server_port: parse_number_var("SERVER_PORT")?,
            database_url: non_empty_var("DATABASE_URL"),
            database_max_connections: parse_number_var("DATABASE_MAX_CONNECTIONS")?,
            auth_token_secret: non_empty_var("AUTH_TOKEN_SECRET"),
            auth_previous_token_secrets: parse_csv_var("AUTH_PREVIOUS_TOKEN_SECRETS"),
            auth_token_ttl: non_empty_var("AUTH_TOKEN_TTL"),
            auth_cookie_max_age: non_empty_var("AUTH_COOKIE_MAX_AGE"),
            auth_password_pepper: non_empty_var("AUTH_PASSWORD_PEPPER"),
            auth_bootstrap_handle: non_empty_var("AUTH_BOOTSTRAP_HANDLE"),
            auth_bootstrap_secret: non_empty_var("AUTH_BOOTSTRAP_SECRET"),
            auth_bootstrap_email: non_empty_var("AUTH_BOOTSTRAP_EMAIL"),
            cors_allowed_origins: parse_csv_var("CORS_ALLOWED_ORIGINS"),
            cors_allowed_methods: parse_csv_var("CORS_ALLOWED_METHODS"),
            cors_allowed_headers: parse_csv_var("CORS_ALLOWED_HEADERS"),
            cors_allow_credentials: parse_bool_var("CORS_ALLOW_CREDENTIALS"),
            dev_mode: parse_bool_var("DEV_MODE"),
        })
    }
}
