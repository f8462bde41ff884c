use std::{
    fs,
    path::PathBuf,
    time::Duration,
};

use thiserror::Error;

use crate::{
    models::{
        AuthConfig, BootstrapConfig, Config, ConfigMetadata, CorsConfig, DatabaseConfig,
        ServerConfig,
        sources::{EnvConfig, FileConfig},
    },
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};

const DEFAULT_CONFIG_LOCATIONS: [&str; 2] = ["spaceport.toml", "config/spaceport.toml"];

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_COOKIE_MAX_AGE: Duration = Duration::from_secs(3600);

#[derive(Debug, Default, Clone)]
struct ConfigLoaderOptions {
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(
        "no token signing secret configured; set AUTH_TOKEN_SECRET or [auth] token_secret"
    )]
    MissingTokenSecret,
    #[error("invalid duration `{value}` for {field}")]
    InvalidDuration {
        field: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error("invalid number `{value}` for {field}")]
    InvalidNumber { field: &'static str, value: String },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Load `.env`, gather the process environment and compose the config.
    ///
    /// An env file named with [`with_env_file`](Self::with_env_file) must
    /// exist; the default `.env` lookup is optional.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigLoadError::MissingConfig { path: path.clone() });
                }
                dotenvy::from_path(path)?;
                true
            }
            None => dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                dotenvy::Error::Io(_) => Ok(false),
                _ => Err(err),
            })?,
        };

        let mut load = self.load_with_env(EnvConfig::gather()?)?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Compose the config from an already gathered environment. Does not
    /// read `.env` or the process environment.
    pub fn load_with_env(&self, env: EnvConfig) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        self.compose_config(file_config, env, config_path)
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let (path, explicit) = match (&self.options.config_path, &env.config_path) {
            (Some(path), _) | (None, Some(path)) => (path.clone(), true),
            (None, None) => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(path) => (path, false),
                None => return Ok((None, None)),
            },
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigLoadError::Io {
            path: path.clone(),
            source,
        })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
                path: path.clone(),
                source,
            })?;

        Ok((Some(file_config), Some(path)))
    }

    fn compose_config(
        &self,
        file_config: Option<FileConfig>,
        env: EnvConfig,
        config_path: Option<PathBuf>,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        if file_config.is_none() {
            warnings.push_with_hint(
                "No spaceport.toml detected; falling back to environment variables",
                "Create spaceport.toml or point SPACEPORT_CONFIG at one",
            );
        }

        let FileConfig {
            server: file_server,
            database: file_database,
            auth: file_auth,
            cors: file_cors,
            dev_mode: file_dev_mode,
        } = file_config.unwrap_or_default();

        let server = ServerConfig {
            host: env
                .server_host
                .or(file_server.host)
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port: env.server_port.or(file_server.port).unwrap_or(DEFAULT_PORT),
        };

        let database = DatabaseConfig {
            url: env
                .database_url
                .or(file_database.url)
                .filter(|url| !url.trim().is_empty()),
            max_connections: env
                .database_max_connections
                .or(file_database.max_connections)
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
        };

        let token_secret = env
            .auth_token_secret
            .or(file_auth.token_secret)
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigLoadError::MissingTokenSecret)?;

        let token_ttl = env
            .auth_token_ttl
            .or(file_auth.token_ttl)
            .map(|raw| parse_duration("AUTH_TOKEN_TTL", &raw))
            .transpose()?;

        let cookie_max_age = env
            .auth_cookie_max_age
            .or(file_auth.cookie_max_age)
            .map(|raw| parse_duration("AUTH_COOKIE_MAX_AGE", &raw))
            .transpose()?
            .unwrap_or(DEFAULT_COOKIE_MAX_AGE);

        let bootstrap_handle = env.auth_bootstrap_handle.or(file_auth.bootstrap_handle);
        let bootstrap_secret = env.auth_bootstrap_secret.or(file_auth.bootstrap_secret);
        let bootstrap_email = env.auth_bootstrap_email.or(file_auth.bootstrap_email);
        let bootstrap = match (bootstrap_handle, bootstrap_secret) {
            (Some(handle), Some(secret)) => Some(BootstrapConfig {
                email: bootstrap_email.unwrap_or_else(|| format!("{handle}@localhost")),
                handle,
                secret,
            }),
            (None, None) => None,
            _ => {
                warnings.push(
                    "AUTH_BOOTSTRAP_HANDLE and AUTH_BOOTSTRAP_SECRET must be set together; no identity will be seeded",
                );
                None
            }
        };

        let auth = AuthConfig {
            token_secret,
            previous_token_secrets: env
                .auth_previous_token_secrets
                .or(file_auth.previous_token_secrets)
                .unwrap_or_default(),
            token_ttl,
            cookie_max_age,
            password_pepper: env
                .auth_password_pepper
                .or(file_auth.password_pepper)
                .filter(|pepper| !pepper.is_empty()),
            bootstrap,
        };

        let cors = CorsConfig {
            allowed_origins: env
                .cors_allowed_origins
                .or(file_cors.allowed_origins)
                .unwrap_or_else(default_cors_origins),
            allowed_methods: env
                .cors_allowed_methods
                .or(file_cors.allowed_methods)
                .unwrap_or_else(default_cors_methods),
            allowed_headers: env
                .cors_allowed_headers
                .or(file_cors.allowed_headers)
                .unwrap_or_else(default_cors_headers),
            allow_credentials: env
                .cors_allow_credentials
                .or(file_cors.allow_credentials)
                .unwrap_or(true),
        };

        let config = Config {
            server,
            database,
            auth,
            cors,
            dev_mode: env.dev_mode.or(file_dev_mode).unwrap_or(false),
            metadata: ConfigMetadata {
                config_path,
                env_file_loaded: false,
            },
        };

        warnings.extend(validation::apply_guard_rails(&config)?);

        Ok(ConfigLoad { config, warnings })
    }
}

/// humantime (`"12h"`, `"90m"`) or a bare number of seconds.
fn parse_duration(field: &'static str, raw: &str) -> Result<Duration, ConfigLoadError> {
    let trimmed = raw.trim();
    if let Ok(seconds) = trimmed.parse::<u64>() {
        return Ok(Duration::from_secs(seconds));
    }
    humantime::parse_duration(trimmed).map_err(|source| ConfigLoadError::InvalidDuration {
        field,
        value: raw.to_string(),
        source,
    })
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

fn default_cors_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_cors_headers() -> Vec<String> {
    vec!["Content-Type".to_string()]
}
