//! Per-route-class rate-limit middleware.
//!
//! Three independent fixed-window policies keyed by client IP. The counter
//! is consulted before any handler logic runs; budget exhaustion gets a 429
//! with the route class's message, and every response (allowed or not)
//! carries the standard RateLimit-* headers.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Json;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use quotelist_core::ratelimit::{RateDecision, RatePolicy};

use crate::state::AppState;

/// Signin: 5 attempts per 10 minutes.
pub const SIGNIN_POLICY: RatePolicy = RatePolicy {
    name: "signin",
    window: Duration::from_secs(10 * 60),
    budget: 5,
};
const SIGNIN_MESSAGE: &str = "Too many login attempts. Please try again in 10 minutes.";

/// Signup: 3 attempts per hour.
pub const SIGNUP_POLICY: RatePolicy = RatePolicy {
    name: "signup",
    window: Duration::from_secs(60 * 60),
    budget: 3,
};
const SIGNUP_MESSAGE: &str = "Too many signup attempts. Try again later.";

/// General: 150 requests per 15 minutes across all quote-list routes.
pub const GENERAL_POLICY: RatePolicy = RatePolicy {
    name: "general",
    window: Duration::from_secs(15 * 60),
    budget: 150,
};
const GENERAL_MESSAGE: &str = "Too many requests, please try again later.";

pub async fn signin_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    enforce(&state, SIGNIN_POLICY, SIGNIN_MESSAGE, req, next).await
}

pub async fn signup_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    enforce(&state, SIGNUP_POLICY, SIGNUP_MESSAGE, req, next).await
}

pub async fn general_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    enforce(&state, GENERAL_POLICY, GENERAL_MESSAGE, req, next).await
}

async fn enforce(
    state: &AppState,
    policy: RatePolicy,
    message: &str,
    req: Request,
    next: Next,
) -> Response {
    let key = client_key(&req);
    let decision = state.rate_counter.hit(&key, policy);

    if decision.allowed {
        let mut resp = next.run(req).await;
        apply_headers(resp.headers_mut(), &decision);
        return resp;
    }

    let body = serde_json::json!({
        "success": false,
        "message": message,
    });
    let mut resp = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    apply_headers(resp.headers_mut(), &decision);
    resp
}

/// Client identity for counting: the first `x-forwarded-for` hop when the
/// service sits behind a proxy, else the peer socket address.
fn client_key(req: &Request) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return forwarded.to_owned();
    }
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

fn apply_headers(headers: &mut HeaderMap, decision: &RateDecision) {
    headers.insert(
        "ratelimit-limit",
        HeaderValue::from(decision.limit),
    );
    headers.insert(
        "ratelimit-remaining",
        HeaderValue::from(decision.remaining),
    );
    headers.insert(
        "ratelimit-reset",
        HeaderValue::from(decision.reset_after.as_secs()),
    );
}
