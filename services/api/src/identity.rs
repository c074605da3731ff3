//! Session-cookie identity extractor for protected routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use quotelist_auth_types::cookie::SESSION_COOKIE;
use quotelist_auth_types::token::validate_session_token;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated identity proven by a valid session cookie.
///
/// Possession of a validly-signed, unexpired token is the sole proof; any
/// missing, malformed, or expired cookie is a 401.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub user_id: Uuid,
}

/// Validate the session cookie in `jar` against the signing secret.
pub fn authenticate(jar: &CookieJar, secret: &str) -> Result<Uuid, ApiError> {
    let value = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_owned())
        .ok_or(ApiError::Unauthenticated)?;
    let info = validate_session_token(&value, secret).map_err(|_| ApiError::Unauthenticated)?;
    Ok(info.user_id)
}

impl FromRequestParts<AppState> for SessionIdentity {
    type Rejection = ApiError;

    // axum-core defines this as `fn -> impl Future + Send` (not `async fn`);
    // extract synchronously, return a 'static async block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let jar = CookieJar::from_headers(&parts.headers);
        let secret = state.jwt_secret.clone();
        async move { authenticate(&jar, &secret).map(|user_id| Self { user_id }) }
    }
}
