use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use spaceport_model::{Identity, RecordId};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::revocation::RevocationList;

/// Maximum number of verification keys (current plus previous).
const MAX_KEYS: usize = 5;

/// Signing configuration for [`TokenService`].
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: String,
    /// Secrets that were current before a rotation; accepted for
    /// verification only.
    pub previous_secrets: Vec<String>,
    /// Token lifetime. `None` issues tokens without an `exp` claim.
    pub ttl: Option<Duration>,
}

impl TokenSettings {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            previous_secrets: Vec::new(),
            ttl: None,
        }
    }

    pub fn with_previous_secrets(mut self, previous: Vec<String>) -> Self {
        self.previous_secrets = previous;
        self
    }

    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("previous_secrets", &self.previous_secrets.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Claims carried by every issued token.
///
/// The secret digest is never embedded; a token proves who logged in and
/// whether they were privileged at that moment, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: RecordId,
    pub handle: String,
    pub is_privileged: bool,
    pub iat: i64,
    pub jti: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

#[derive(Debug, Error)]
pub enum TokenConfigError {
    #[error("token signing secret must not be empty")]
    EmptySecret,
}

#[derive(Debug, Error)]
#[error("failed to sign token: {0}")]
pub struct TokenError(#[from] jsonwebtoken::errors::Error);

/// Why a presented token was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("token signature does not match any configured key")]
    InvalidSignature,
    #[error("token is malformed")]
    Malformed,
    #[error("token has expired")]
    Expired,
    #[error("token has been revoked")]
    Revoked,
    #[error("token could not be verified: {0}")]
    Unverifiable(String),
}

/// Issues and verifies HS256 tokens against an immutable key ring.
///
/// New tokens are always signed with the current secret. Verification tries
/// the current secret first and then each previous one, so rotating the
/// secret does not sign everybody out at once.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: Vec<DecodingKey>,
    validation: Validation,
    ttl: Option<Duration>,
    revoked: RevocationList,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("keys", &self.decoding.len())
            .field("ttl", &self.ttl)
            .field("revoked", &self.revoked.len())
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(settings: TokenSettings) -> Result<Self, TokenConfigError> {
        if settings.secret.is_empty() {
            return Err(TokenConfigError::EmptySecret);
        }

        let decoding = std::iter::once(&settings.secret)
            .chain(settings.previous_secrets.iter().filter(|s| !s.is_empty()))
            .take(MAX_KEYS)
            .map(|secret| DecodingKey::from_secret(secret.as_bytes()))
            .collect();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;
        match settings.ttl {
            Some(_) => {
                validation.set_required_spec_claims(&["exp"]);
                validation.validate_exp = true;
            }
            None => {
                validation.required_spec_claims.clear();
                validation.validate_exp = false;
            }
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding,
            validation,
            ttl: settings.ttl,
            revoked: RevocationList::new(),
        })
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn issue(&self, identity: &Identity) -> Result<IssuedToken, TokenError> {
        let now = Utc::now().timestamp();
        let exp = self
            .ttl
            .map(|ttl| now.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)));

        let claims = Claims {
            sub: identity.id,
            handle: identity.handle.clone(),
            is_privileged: identity.is_privileged,
            iat: now,
            jti: Uuid::new_v4().to_string(),
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(IssuedToken { token, claims })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        let mut last = VerificationError::InvalidSignature;

        for key in &self.decoding {
            match decode::<Claims>(token, key, &self.validation) {
                Ok(data) => {
                    let claims = data.claims;
                    if self.revoked.is_revoked(&claims.jti) {
                        return Err(VerificationError::Revoked);
                    }
                    return Ok(claims);
                }
                Err(err) => {
                    last = classify(err.kind());
                    if last != VerificationError::InvalidSignature {
                        break;
                    }
                }
            }
        }

        debug!(reason = %last, "token rejected");
        Err(last)
    }

    /// Reject the token carrying these claims from now on.
    pub fn revoke(&self, claims: &Claims) {
        self.revoked.revoke(&claims.jti, claims.exp);
        self.revoked.prune(Utc::now().timestamp());
    }
}

fn classify(kind: &ErrorKind) -> VerificationError {
    match kind {
        ErrorKind::InvalidSignature => VerificationError::InvalidSignature,
        ErrorKind::ExpiredSignature => VerificationError::Expired,
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::MissingAlgorithm => VerificationError::Malformed,
        other => VerificationError::Unverifiable(format!("{other:?}")),
    }
}
