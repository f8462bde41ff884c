//! Session gate middleware.
//!
//! Each request is evaluated once: the `access_Token` cookie is read, the
//! token verified, and the request either admitted with its [`Claims`]
//! attached as an extension or rejected. Bearer headers are never consulted.

use axum::{
    extract::{FromRequestParts, RawPathParams, Request, State, rejection::RawPathParamsRejection},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use spaceport_core::auth::{Claims, TokenService, VerificationError};
use tracing::debug;

use super::cookie::extract_access_token;
use crate::infra::{app_state::AppState, errors::AppError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateRejection {
    /// No session cookie on the request.
    Unauthenticated,
    /// A cookie was present but its token did not verify.
    InvalidToken(VerificationError),
}

impl From<GateRejection> for AppError {
    fn from(rejection: GateRejection) -> Self {
        match rejection {
            GateRejection::Unauthenticated => AppError::unauthorized("Authentication required"),
            GateRejection::InvalidToken(_) => AppError::unauthorized("Invalid or expired token"),
        }
    }
}

pub fn evaluate(tokens: &TokenService, headers: &HeaderMap) -> Result<Claims, GateRejection> {
    let token = extract_access_token(headers).ok_or(GateRejection::Unauthenticated)?;
    tokens.verify(&token).map_err(|err| {
        debug!(target: "auth", reason = %err, "session token rejected");
        GateRejection::InvalidToken(err)
    })
}

fn admit(state: &AppState, request: &mut Request) -> Result<Claims, AppError> {
    let claims = evaluate(&state.tokens, request.headers())?;
    request.extensions_mut().insert(claims.clone());
    Ok(claims)
}

pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    admit(&state, &mut request)?;
    Ok(next.run(request).await)
}

/// Attaches claims when a valid cookie is present; never rejects.
pub async fn optional_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Ok(claims) = evaluate(&state.tokens, request.headers()) {
        request.extensions_mut().insert(claims);
    }
    next.run(request).await
}

pub async fn require_privileged(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = admit(&state, &mut request)?;
    if !claims.is_privileged {
        return Err(AppError::forbidden("Privileged access required"));
    }
    Ok(next.run(request).await)
}

/// The `{id}` path segment must name the caller, unless the caller is
/// privileged. Routes without `{id}` admit privileged callers only.
pub async fn require_owner_or_privileged(
    State(state): State<AppState>,
    params: Result<RawPathParams, RawPathParamsRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = admit(&state, &mut request)?;
    if claims.is_privileged {
        return Ok(next.run(request).await);
    }

    let is_owner = params.ok().is_some_and(|params| {
        params
            .iter()
            .any(|(key, value)| key == "id" && value.eq_ignore_ascii_case(&claims.sub.to_hex()))
    });
    if !is_owner {
        return Err(AppError::forbidden("Only the owner or a privileged caller may do this"));
    }
    Ok(next.run(request).await)
}

/// Claims of a caller admitted by a session gate.
#[derive(Debug, Clone)]
pub struct Caller(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(Caller)
            .ok_or_else(|| GateRejection::Unauthenticated.into())
    }
}

/// Claims when the request carried a valid session; `None` otherwise.
#[derive(Debug, Clone)]
pub struct OptionalCaller(pub Option<Claims>);

impl<S: Send + Sync> FromRequestParts<S> for OptionalCaller {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalCaller(parts.extensions.get::<Claims>().cloned()))
    }
}
