use axum::http::{Method, header::HeaderName};
use thiserror::Error;

use super::models::{AuthConfig, Config, CorsConfig};

/// Shortest token secret accepted outside dev mode, in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Verification keys beyond this many previous secrets are ignored.
pub const MAX_PREVIOUS_SECRETS: usize = 4;

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("authentication secret {field} {reason}")]
    WeakSecret { field: &'static str, reason: String },
    #[error("DATABASE_URL must be set when DEV_MODE is false")]
    MissingDatabase,
    #[error("CORS wildcard origins are not allowed when DEV_MODE is false")]
    DangerousCorsWildcard,
    #[error("invalid CORS configuration: {reason}")]
    InvalidCorsConfig { reason: String },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

pub fn apply_guard_rails(config: &Config) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    check_secrets(&config.auth, config.dev_mode, &mut warnings)?;

    if config.database.url.is_none() {
        if !config.dev_mode {
            return Err(ConfigGuardRailError::MissingDatabase);
        }
        warnings.push_with_hint(
            "DATABASE_URL not configured; records are kept in memory and lost on restart",
            "Set DATABASE_URL to a PostgreSQL connection string to persist records",
        );
    }

    if !config.dev_mode && config.cors.is_wildcard_included() {
        return Err(ConfigGuardRailError::DangerousCorsWildcard);
    }
    validate_cors(&config.cors)?;

    Ok(warnings)
}

fn check_secrets(
    auth: &AuthConfig,
    dev_mode: bool,
    warnings: &mut ConfigWarnings,
) -> Result<(), ConfigGuardRailError> {
    if auth.token_secret.len() < MIN_SECRET_LENGTH {
        if !dev_mode {
            return Err(ConfigGuardRailError::WeakSecret {
                field: "AUTH_TOKEN_SECRET",
                reason: format!("must be at least {MIN_SECRET_LENGTH} bytes"),
            });
        }
        warnings.push_with_hint(
            format!("AUTH_TOKEN_SECRET is shorter than {MIN_SECRET_LENGTH} bytes"),
            "Generate a longer random secret before leaving dev mode",
        );
    }

    if auth
        .previous_token_secrets
        .iter()
        .any(|secret| secret.len() < MIN_SECRET_LENGTH)
    {
        if !dev_mode {
            return Err(ConfigGuardRailError::WeakSecret {
                field: "AUTH_PREVIOUS_TOKEN_SECRETS",
                reason: format!("entries must each be at least {MIN_SECRET_LENGTH} bytes"),
            });
        }
        warnings.push_with_hint(
            format!("AUTH_PREVIOUS_TOKEN_SECRETS contains an entry shorter than {MIN_SECRET_LENGTH} bytes"),
            "Tokens signed with a short previous secret can be forged; drop it before leaving dev mode",
        );
    }

    if auth.previous_token_secrets.len() > MAX_PREVIOUS_SECRETS {
        warnings.push(format!(
            "only the first {MAX_PREVIOUS_SECRETS} previous token secrets are used for verification"
        ));
    }

    if auth.token_ttl.is_none() {
        warnings.push_with_hint(
            "AUTH_TOKEN_TTL not set; issued tokens never expire",
            "Set AUTH_TOKEN_TTL (e.g. `12h`) to bound session lifetime",
        );
    }

    if auth.password_pepper.is_none() {
        warnings.push_with_hint(
            "AUTH_PASSWORD_PEPPER not set; password digests are salted but not peppered",
            "Set AUTH_PASSWORD_PEPPER once, before any identity is registered",
        );
    }

    Ok(())
}

fn validate_cors(cors: &CorsConfig) -> Result<(), ConfigGuardRailError> {
    if cors.allow_credentials && cors.is_wildcard_included() {
        return Err(ConfigGuardRailError::InvalidCorsConfig {
            reason: "credentials cannot be allowed together with a wildcard origin".into(),
        });
    }

    if cors.allowed_methods.is_empty() {
        return Err(ConfigGuardRailError::InvalidCorsConfig {
            reason: "CORS_ALLOWED_METHODS must include at least one HTTP method".into(),
        });
    }

    for method in &cors.allowed_methods {
        Method::from_bytes(method.as_bytes()).map_err(|_| {
            ConfigGuardRailError::InvalidCorsConfig {
                reason: format!("invalid HTTP method `{method}` in CORS_ALLOWED_METHODS"),
            }
        })?;
    }

    for header in &cors.allowed_headers {
        HeaderName::from_bytes(header.as_bytes()).map_err(|_| {
            ConfigGuardRailError::InvalidCorsConfig {
                reason: format!("invalid header name `{header}` in CORS_ALLOWED_HEADERS"),
            }
        })?;
    }

    Ok(())
}
