use std::time::Duration;

use axum::http::{HeaderMap, header};

/// Name of the session cookie. Case-sensitive.
pub const ACCESS_COOKIE: &str = "access_Token";

pub fn create_access_cookie(token: &str, max_age: Duration) -> String {
    format!(
        "{ACCESS_COOKIE}={token}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
        max_age.as_secs()
    )
}

pub fn clear_access_cookie() -> String {
    format!("{ACCESS_COOKIE}=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax")
}

/// Token carried by the `access_Token` cookie, across every `Cookie` header.
///
/// A present but empty cookie counts as absent.
pub fn extract_access_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            if name == ACCESS_COOKIE && !value.is_empty() {
                Some(value.to_string())
            } else {
                None
            }
        })
}
