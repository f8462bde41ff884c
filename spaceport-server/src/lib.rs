//! # Spaceport Server
//!
//! HTTP surface for the Spaceport session layer.
//!
//! - `POST /login` trades a handle and secret for a signed token, returned in
//!   the body and as the `access_Token` cookie
//! - every later request presents that cookie; each route declares the access
//!   level it needs and the gate middleware enforces it
//! - `/users`, `/rovers` and `/missions` share one generic CRUD handler set

pub mod auth;
pub mod infra;
pub mod resources;
pub mod routes;

pub use infra::app_state::AppState;
pub use routes::create_app;
