use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use quotelist_auth_types::cookie::{clear_session_cookie, set_session_cookie};

use crate::error::ApiError;
use crate::identity::SessionIdentity;
use crate::state::AppState;
use crate::usecase::account::{
    ResendOtpInput, ResendOtpUseCase, SigninInput, SigninUseCase, SignupInput, SignupUseCase,
    UserView, VerifyOtpInput, VerifyOtpUseCase,
};

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// ── POST /api/auth/signup ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpTokenResponse {
    pub success: bool,
    pub message: String,
    pub otp_token: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = SignupUseCase {
        users: state.user_repo(),
        mailer: state.mailer(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(SignupInput {
            username: body.username,
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok((
        StatusCode::OK,
        Json(OtpTokenResponse {
            success: true,
            message: "OTP sent to email. Verify your account.".to_owned(),
            otp_token: out.otp_token,
        }),
    ))
}

// ── POST /api/auth/verify-otp ────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub email: Option<String>,
    pub otp: Option<String>,
    pub otp_token: Option<String>,
}

#[derive(Serialize)]
pub struct UserViewResponse {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<UserView> for UserViewResponse {
    fn from(view: UserView) -> Self {
        Self {
            id: view.id.to_string(),
            username: view.username,
            email: view.email,
        }
    }
}

#[derive(Serialize)]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub message: String,
    pub user: UserViewResponse,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = VerifyOtpUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let view = usecase
        .execute(VerifyOtpInput {
            email: body.email,
            otp: body.otp,
            otp_token: body.otp_token,
        })
        .await?;

    Ok((
        StatusCode::OK,
        Json(VerifyOtpResponse {
            success: true,
            message: "User verified successfully".to_owned(),
            user: view.into(),
        }),
    ))
}

// ── POST /api/auth/resend-otp ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResendOtpRequest {
    pub email: Option<String>,
}

pub async fn resend_otp(
    State(state): State<AppState>,
    Json(body): Json<ResendOtpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = ResendOtpUseCase {
        mailer: state.mailer(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase.execute(ResendOtpInput { email: body.email }).await?;

    Ok((
        StatusCode::OK,
        Json(OtpTokenResponse {
            success: true,
            message: "New OTP sent to email".to_owned(),
            otp_token: out.otp_token,
        }),
    ))
}

// ── POST /api/auth/signin ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub verified: bool,
    #[serde(serialize_with = "quotelist_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "quotelist_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
pub struct SigninResponse {
    pub success: bool,
    pub message: String,
    pub user: UserResponse,
}

pub async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SigninRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = SigninUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(SigninInput {
            email: body.email,
            password: body.password,
        })
        .await?;

    let jar = set_session_cookie(jar, out.session_token, state.cookie_secure);
    let user = out.user;

    Ok((
        StatusCode::OK,
        jar,
        Json(SigninResponse {
            success: true,
            message: "Login Successful!".to_owned(),
            user: UserResponse {
                id: user.id.to_string(),
                username: user.username,
                email: user.email,
                verified: user.verified,
                created_at: user.created_at,
                updated_at: user.updated_at,
            },
        }),
    ))
}

// ── GET /api/auth/signout ────────────────────────────────────────────────────

pub async fn signout(
    _identity: SessionIdentity,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let jar = clear_session_cookie(jar, state.cookie_secure);
    Ok((
        StatusCode::OK,
        jar,
        Json(MessageResponse {
            success: true,
            message: "Log out successful".to_owned(),
        }),
    ))
}
