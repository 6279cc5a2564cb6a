//! Claim token <-> cookie
//!
//! The cookie value is the [`ClaimToken`] run through the core codec, so the
//! claimed name is not readable at a glance. A cookie that fails to decode is
//! treated exactly like no cookie.

use axum::http::header::COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use lottery_core::{codec, ClaimToken};

use crate::error::{Result, ServerError};

/// Name of the claim cookie
pub const COOKIE_NAME: &str = "jullotteri_claim";

/// Decode the claim token carried by a request, if any
pub fn read_token(headers: &HeaderMap) -> Option<ClaimToken> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, _)| *name == COOKIE_NAME)
        .find_map(|(_, value)| match codec::open::<ClaimToken>(value) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring undecodable claim cookie");
                None
            }
        })
}

/// `Set-Cookie` value that stores `token` until its expiry
pub fn issue_cookie(token: &ClaimToken, now: i64) -> Result<HeaderValue> {
    let value = codec::seal(token)?;
    let max_age = (token.expires_at - now).max(0);
    HeaderValue::from_str(&format!(
        "{COOKIE_NAME}={value}; Path=/; Max-Age={max_age}; HttpOnly; SameSite=Lax"
    ))
    .map_err(|e| ServerError::Internal(format!("invalid cookie header: {e}")))
}

/// `Set-Cookie` value that removes the claim cookie
pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static("jullotteri_claim=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}
