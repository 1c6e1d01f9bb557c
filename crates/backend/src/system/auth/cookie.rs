use axum::http::{header, HeaderMap, HeaderValue};

use crate::shared::config::AuthConfig;

/// `Set-Cookie` value carrying a fresh session token
pub fn session_cookie(config: &AuthConfig, token: &str) -> Option<HeaderValue> {
    let max_age = config.session_hours * 3600;
    build_cookie(config, token, max_age)
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie(config: &AuthConfig) -> Option<HeaderValue> {
    build_cookie(config, "", 0)
}

fn build_cookie(config: &AuthConfig, value: &str, max_age: i64) -> Option<HeaderValue> {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        config.cookie_name, value, max_age
    );
    if config.secure_cookie {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).ok()
}

/// Session token from the named cookie, falling back to `Authorization: Bearer`
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}
