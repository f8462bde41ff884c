use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use spaceport_core::auth::LoginError;
use spaceport_model::{Identity, IdentityView};
use std::fmt;
use tracing::debug;

use super::{
    cookie::{clear_access_cookie, create_access_cookie},
    gate::Caller,
};
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub handle: Option<String>,
    pub secret: Option<String>,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("handle", &self.handle)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Credential failures answer 400 with a plain-text body.
fn rejected(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, message.into()).into_response()
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(target: "auth", error = %rejection.body_text(), "unreadable login body");
            return rejected("Login error: handle and secret are required");
        }
    };
    let (Some(handle), Some(secret)) = (request.handle, request.secret) else {
        return rejected("Login error: handle and secret are required");
    };

    match state.authenticator.login(&handle, &secret).await {
        Ok((_, issued)) => {
            let cookie = create_access_cookie(&issued.token, state.cookie_max_age);
            (
                StatusCode::OK,
                [(header::SET_COOKIE, cookie)],
                Json(json!({ "Access_Token": issued.token })),
            )
                .into_response()
        }
        Err(err @ (LoginError::UnknownHandle | LoginError::BadSecret)) => {
            rejected(err.to_string())
        }
        Err(err) => AppError::from(err).into_response(),
    }
}

/// Revokes the presented token and clears the cookie.
pub async fn logout(State(state): State<AppState>, Caller(claims): Caller) -> Response {
    state.tokens.revoke(&claims);
    debug!(target: "auth", identity_id = %claims.sub, jti = %claims.jti, "session revoked");

    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, clear_access_cookie())],
    )
        .into_response()
}

pub async fn me(
    State(state): State<AppState>,
    Caller(claims): Caller,
) -> AppResult<Json<IdentityView>> {
    let identity = state
        .resources::<Identity>()
        .get(&claims.sub.to_hex())
        .await?;
    Ok(Json(identity.view()))
}
