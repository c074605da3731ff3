//! One-time-passcode token codec.
//!
//! The OTP credential is a self-contained signed token carrying the email
//! being verified and the 6-digit code that was mailed to it. Nothing is
//! stored server-side: verification is a signature + expiry + equality
//! check, so multiple outstanding tokens for the same email are each valid
//! until they individually expire.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngExt;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// OTP token lifetime in seconds (5 minutes).
pub const OTP_TTL_SECS: u64 = 300;

/// Inclusive range of the 6-digit code.
pub const OTP_MIN: u32 = 100_000;
pub const OTP_MAX: u32 = 999_999;

/// Errors returned by [`verify_otp_token`].
#[derive(Debug, thiserror::Error)]
pub enum OtpError {
    /// The token is past its expiry. An otherwise-valid late token always
    /// fails with this variant, never with `Mismatch`.
    #[error("otp token expired")]
    Expired,
    /// Signature or structure invalid.
    #[error("malformed otp token")]
    Malformed,
    /// Decoded email or code does not equal the supplied values.
    #[error("otp mismatch")]
    Mismatch,
    #[error("token signing failed")]
    Signing,
}

/// JWT claims of the OTP credential.
#[derive(Debug, Serialize, Deserialize)]
pub struct OtpClaims {
    pub email: String,
    pub otp: u32,
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

fn generate_code() -> u32 {
    let mut rng = rand::rng();
    rng.random_range(OTP_MIN..=OTP_MAX)
}

/// Issue an OTP credential for `email`: a uniformly random 6-digit code and
/// a signed token embedding it. The code goes out by email; the token goes
/// back to the client to be echoed at verification time.
pub fn issue_otp_token(email: &str, secret: &str) -> Result<(u32, String), OtpError> {
    let code = generate_code();
    let claims = OtpClaims {
        email: email.to_owned(),
        otp: code,
        exp: now_secs() + OTP_TTL_SECS,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| OtpError::Signing)?;
    Ok((code, token))
}

/// Verify an OTP credential against the email and code the client supplied.
///
/// Expiry is checked with zero leeway: these tokens live 5 minutes and a
/// clock-skew allowance would extend that noticeably. The supplied code is
/// the request's string field; anything that does not parse as a number
/// cannot match and is a `Mismatch`.
pub fn verify_otp_token(
    token: &str,
    email: &str,
    supplied_code: &str,
    secret: &str,
) -> Result<(), OtpError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp"]);

    let data = decode::<OtpClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => OtpError::Expired,
        _ => OtpError::Malformed,
    })?;

    let supplied: u32 = supplied_code
        .trim()
        .parse()
        .map_err(|_| OtpError::Mismatch)?;

    if data.claims.email != email || data.claims.otp != supplied {
        return Err(OtpError::Mismatch);
    }
    Ok(())
}
