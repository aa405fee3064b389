//! Origin/referer soft-check and client IP resolution.
//!
//! The origin check only deters naive hot-linking; requests carrying
//! neither header pass.

use axum::http::{HeaderMap, header};
use std::net::SocketAddr;

use crate::error::ApiError;

pub const UNKNOWN_CLIENT: &str = "unknown";

pub fn check_origin(
    allowed: Option<&str>,
    origin: Option<&str>,
    referer: Option<&str>,
) -> Result<(), ApiError> {
    let Some(allowed) = allowed else {
        return Ok(());
    };
    let origin = origin.unwrap_or("");
    let referer = referer.unwrap_or("");

    if !origin.is_empty() {
        if origin != allowed {
            tracing::warn!(origin, "blocked origin");
            return Err(ApiError::Forbidden);
        }
        return Ok(());
    }
    if !referer.is_empty() && !referer.starts_with(allowed) {
        tracing::warn!(referer, "blocked referer");
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

/// First `X-Forwarded-For` hop, else the peer address, else `"unknown"`.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    match (forwarded, peer) {
        (Some(ip), _) => ip.to_string(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => UNKNOWN_CLIENT.to_string(),
    }
}

pub fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
