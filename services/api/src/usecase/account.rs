use anyhow::Context as _;
use chrono::Utc;
use uuid::Uuid;

use quotelist_auth_types::otp::{OtpError, issue_otp_token, verify_otp_token};
use quotelist_auth_types::token::issue_session_token;

use crate::domain::repository::{Mailer, UserRepository};
use crate::domain::types::{
    BCRYPT_COST, MIN_PASSWORD_LEN, User, validate_email, validate_username,
};
use crate::error::ApiError;

/// Public view of an account — what verify-otp returns to the client.
#[derive(Debug, Clone)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

// ── Signup ───────────────────────────────────────────────────────────────────

pub struct SignupInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct SignupOutput {
    pub otp_token: String,
}

pub struct SignupUseCase<U: UserRepository, M: Mailer> {
    pub users: U,
    pub mailer: M,
    pub jwt_secret: String,
}

impl<U: UserRepository, M: Mailer> SignupUseCase<U, M> {
    pub async fn execute(&self, input: SignupInput) -> Result<SignupOutput, ApiError> {
        let (Some(username), Some(email), Some(password)) =
            (input.username, input.email, input.password)
        else {
            return Err(ApiError::MissingFields);
        };

        let email = email.trim().to_lowercase();
        if !validate_email(&email) {
            return Err(ApiError::InvalidEmail);
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::WeakPassword);
        }
        let username = username.trim().to_owned();
        if !validate_username(&username) {
            return Err(ApiError::InvalidUsername);
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ApiError::EmailTaken);
        }

        let password_hash =
            bcrypt::hash(&password, BCRYPT_COST).context("hash signup password")?;

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            username,
            email: email.clone(),
            password_hash,
            verified: false,
            created_at: now,
            updated_at: now,
        };
        // A concurrent signup for the same email may pass the existence check
        // above; the store's unique index decides and the loser gets EmailTaken.
        self.users.create(&user).await?;

        // The user row stays even if the send below fails — resend-otp is the
        // recovery path for an unverified account that never got its mail.
        let (code, otp_token) =
            issue_otp_token(&email, &self.jwt_secret).map_err(|e| anyhow::anyhow!(e))?;
        self.mailer
            .send(
                &email,
                "Email Verification OTP",
                &format!("Your OTP code is: {code}. It is valid for 5 minutes."),
            )
            .await?;

        Ok(SignupOutput { otp_token })
    }
}

// ── Verify OTP ───────────────────────────────────────────────────────────────

pub struct VerifyOtpInput {
    pub email: Option<String>,
    pub otp: Option<String>,
    pub otp_token: Option<String>,
}

pub struct VerifyOtpUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> VerifyOtpUseCase<U> {
    pub async fn execute(&self, input: VerifyOtpInput) -> Result<UserView, ApiError> {
        let token = input.otp_token.ok_or(ApiError::OtpVerificationFailed)?;
        let email = input.email.ok_or(ApiError::OtpMismatch)?;
        let otp = input.otp.ok_or(ApiError::OtpMismatch)?;

        let email = email.trim().to_lowercase();
        verify_otp_token(&token, &email, &otp, &self.jwt_secret).map_err(|e| match e {
            OtpError::Expired => ApiError::OtpExpired,
            OtpError::Mismatch => ApiError::OtpMismatch,
            OtpError::Malformed | OtpError::Signing => ApiError::OtpVerificationFailed,
        })?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        self.users.mark_verified(user.id).await?;

        Ok(UserView::from(&user))
    }
}

// ── Resend OTP ───────────────────────────────────────────────────────────────

pub struct ResendOtpInput {
    pub email: Option<String>,
}

pub struct ResendOtpUseCase<M: Mailer> {
    pub mailer: M,
    pub jwt_secret: String,
}

impl<M: Mailer> ResendOtpUseCase<M> {
    /// Issues a fresh token for any syntactically valid email, whether or not
    /// an account exists — identical responses keep the endpoint from being
    /// an account-enumeration oracle.
    pub async fn execute(&self, input: ResendOtpInput) -> Result<SignupOutput, ApiError> {
        let email = input.email.ok_or(ApiError::InvalidEmail)?;
        let email = email.trim().to_lowercase();
        if !validate_email(&email) {
            return Err(ApiError::InvalidEmail);
        }

        let (code, otp_token) =
            issue_otp_token(&email, &self.jwt_secret).map_err(|_| ApiError::MailDelivery)?;
        self.mailer
            .send(
                &email,
                "Resend OTP - Email Verification",
                &format!("Your new OTP code is: {code}. It is valid for 5 minutes."),
            )
            .await
            .map_err(|_| ApiError::MailDelivery)?;

        Ok(SignupOutput { otp_token })
    }
}

// ── Signin ───────────────────────────────────────────────────────────────────

pub struct SigninInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct SigninOutput {
    pub user: User,
    pub session_token: String,
}

pub struct SigninUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> SigninUseCase<U> {
    pub async fn execute(&self, input: SigninInput) -> Result<SigninOutput, ApiError> {
        let (Some(email), Some(password)) = (input.email, input.password) else {
            return Err(ApiError::MissingFields);
        };

        let email = email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        // Checked before the password so an unverified account gets the same
        // answer regardless of credential correctness.
        if !user.verified {
            return Err(ApiError::Unverified);
        }

        let matches =
            bcrypt::verify(&password, &user.password_hash).context("verify password hash")?;
        if !matches {
            return Err(ApiError::WrongCredentials);
        }

        let (session_token, _) =
            issue_session_token(user.id, &self.jwt_secret).map_err(|e| anyhow::anyhow!(e))?;

        Ok(SigninOutput {
            user,
            session_token,
        })
    }
}
