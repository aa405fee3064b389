use axum::{
    Json,
    extract::{ConnectInfo, Query, Request, State},
    http::{HeaderValue, Method, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{BUCKET, CACHE_CONTROL, SIGNED_URL_TTL};
use crate::error::ApiError;
use crate::metrics::{PROVIDER_LATENCY, REQUEST_TOTAL, SIGNED_URLS_ISSUED};
use crate::origin::{check_origin, client_ip, header_str};
use crate::state::AppState;
use crate::validation::validate_path;

#[derive(Deserialize, Default)]
pub struct SignedUrlQuery {
    pub path: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlResponse {
    pub signed_url: String,
}

pub async fn signed_url_handler(State(state): State<Arc<AppState>>, req: Request) -> Response {
    // preflight short-circuits every other check
    if req.method() == Method::OPTIONS {
        return preflight(&state);
    }

    REQUEST_TOTAL.inc();

    let (parts, _body) = req.into_parts();
    let mut response = match issue(&state, &parts).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    };
    if let Ok(value) = HeaderValue::from_str(state.allow_origin()) {
        response
            .headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    response
}

fn preflight(state: &AppState) -> Response {
    let allow_origin = HeaderValue::from_str(state.allow_origin())
        .unwrap_or_else(|_| HeaderValue::from_static("*"));
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin),
            (header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET")),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type")),
            (header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400")),
        ],
    )
        .into_response()
}

// Guards run in a fixed order; the first failure decides the response.
async fn issue(state: &AppState, req: &Parts) -> Result<Response, ApiError> {
    if req.method != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }

    let signer = state.signer.as_ref().ok_or(ApiError::Configuration)?;

    let headers = &req.headers;
    check_origin(
        state.site_origin.as_deref(),
        header_str(headers, header::ORIGIN),
        header_str(headers, header::REFERER),
    )?;

    let peer = req
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = client_ip(headers, peer);
    if !state.rate_limiter.check(&ip) {
        tracing::warn!(ip = %ip, "rate-limited client");
        return Err(ApiError::RateLimited);
    }

    let query = Query::<SignedUrlQuery>::try_from_uri(&req.uri)
        .map(|Query(q)| q)
        .unwrap_or_default();
    let path = validate_path(query.path.as_deref(), state.extension)?;

    // every call signs afresh: callers treat the URL as valid for the full TTL
    let start = Instant::now();
    let result = signer.create_signed_url(BUCKET, path, SIGNED_URL_TTL).await;
    PROVIDER_LATENCY.observe(start.elapsed().as_secs_f64());

    let signed_url = result.map_err(|e| {
        let err = ApiError::Provider(e.to_string());
        tracing::error!(
            provider = signer.name(),
            key = path,
            retryable = err.retryable(),
            error = %e,
            "failed to sign URL"
        );
        err
    })?;

    SIGNED_URLS_ISSUED.inc();
    Ok((
        [(header::CACHE_CONTROL, CACHE_CONTROL)],
        Json(SignedUrlResponse { signed_url }),
    )
        .into_response())
}
