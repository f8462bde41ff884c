//! Router assembly.
//!
//! Each collection's routes are wired from its [`AccessPolicy`]: every
//! operation gets exactly the gate its policy names, so a route can't be
//! registered without stating who may call it.
//!
//! [`AccessPolicy`]: spaceport_core::resource::AccessPolicy

pub mod health;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{MethodRouter, get, post},
};
use spaceport_config::CorsConfig;
use spaceport_core::resource::{Access, Operation, Resource};
use spaceport_model::{Identity, Mission, Rover};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    auth::{gate, handlers as auth_handlers},
    infra::app_state::AppState,
    resources::handlers,
};

/// Attach the gate for `access` to one method route.
pub fn guard(
    route: MethodRouter<AppState>,
    access: Access,
    state: &AppState,
) -> MethodRouter<AppState> {
    match access {
        Access::Public => route,
        Access::OptionalSession => {
            route.route_layer(from_fn_with_state(state.clone(), gate::optional_session))
        }
        Access::Session => {
            route.route_layer(from_fn_with_state(state.clone(), gate::require_session))
        }
        Access::OwnerOrPrivileged => route.route_layer(from_fn_with_state(
            state.clone(),
            gate::require_owner_or_privileged,
        )),
        Access::Privileged => {
            route.route_layer(from_fn_with_state(state.clone(), gate::require_privileged))
        }
    }
}

/// `/{collection}` and `/{collection}/{id}` for one resource type.
pub fn resource_routes<R: Resource>(state: &AppState) -> Router<AppState> {
    let policy = R::POLICY;
    let collection = format!("/{}", R::COLLECTION);
    let item = format!("{collection}/{{id}}");

    Router::new()
        .route(
            &collection,
            guard(get(handlers::list::<R>), policy.access(Operation::List), state),
        )
        .route(
            &collection,
            guard(post(handlers::create::<R>), policy.access(Operation::Create), state),
        )
        .route(
            &item,
            guard(get(handlers::get::<R>), policy.access(Operation::Get), state),
        )
        .route(
            &item,
            guard(
                axum::routing::put(handlers::update::<R>),
                policy.access(Operation::Update),
                state,
            ),
        )
        .route(
            &item,
            guard(
                axum::routing::delete(handlers::delete::<R>),
                policy.access(Operation::Delete),
                state,
            ),
        )
}

/// The full application router, without CORS.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/login", post(auth_handlers::login))
        .route(
            "/logout",
            guard(post(auth_handlers::logout), Access::Session, &state),
        )
        .route(
            "/me",
            guard(get(auth_handlers::me), Access::Session, &state),
        )
        .merge(resource_routes::<Identity>(&state))
        .merge(resource_routes::<Rover>(&state))
        .merge(resource_routes::<Mission>(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Allow-list CORS from configuration. Entries that fail to parse are
/// skipped with a warning; guard rails reject them at load time.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allow_origin = if config.is_wildcard_included() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(%origin, "skipping unparseable CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|method| Method::from_bytes(method.as_bytes()).ok())
        .collect();

    let headers: Vec<HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|header| HeaderName::from_bytes(header.as_bytes()).ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::list(methods))
        .allow_headers(AllowHeaders::list(headers));

    if config.allow_credentials {
        layer.allow_credentials(true)
    } else {
        layer
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use spaceport_core::{
        auth::{PasswordHasher, TokenService, TokenSettings},
        store::MemoryStore,
    };
    use tower::ServiceExt;

    use super::*;

    fn state() -> AppState {
        AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(PasswordHasher::insecure_fast()),
            Arc::new(TokenService::new(TokenSettings::new("routes-test-secret")).unwrap()),
            Duration::from_secs(3600),
        )
    }

    fn cors(origins: &[&str]) -> CorsConfig {
        CorsConfig {
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
            allowed_methods: vec!["GET".into(), "POST".into()],
            allowed_headers: vec!["Content-Type".into()],
            allow_credentials: true,
        }
    }

    #[tokio::test]
    async fn each_operation_gets_its_own_gate() {
        let app = create_app(state());

        let listed = app
            .clone()
            .oneshot(Request::get("/users").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(listed.status(), StatusCode::UNAUTHORIZED);

        let rovers = app
            .oneshot(Request::get("/rovers").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(rovers.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn preflight_echoes_allowed_origin() {
        let app = create_app(state()).layer(cors_layer(&cors(&["http://localhost:3000", "bad\nvalue"])));

        let response = app
            .oneshot(
                Request::options("/login")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }
}
