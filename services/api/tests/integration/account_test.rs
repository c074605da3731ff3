use std::sync::Arc;

use quotelist_api::error::ApiError;
use quotelist_api::usecase::account::{
    ResendOtpInput, ResendOtpUseCase, SigninInput, SigninUseCase, SignupInput, SignupUseCase,
    VerifyOtpInput, VerifyOtpUseCase,
};
use quotelist_auth_types::token::validate_session_token;

use crate::helpers::{
    MockMailer, MockUserRepo, TEST_JWT_SECRET, decode_otp_claims, make_otp_token, now_secs,
    test_user,
};

fn signup_input(username: &str, email: &str, password: &str) -> SignupInput {
    SignupInput {
        username: Some(username.to_owned()),
        email: Some(email.to_owned()),
        password: Some(password.to_owned()),
    }
}

// ── Signup ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_persist_unverified_user_and_issue_matching_otp_token() {
    let repo = MockUserRepo::empty();
    let users_handle = repo.users_handle();
    let mailer = MockMailer::new();
    let sent_handle = mailer.sent_handle();

    let uc = SignupUseCase {
        users: repo,
        mailer,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let out = uc
        .execute(signup_input("abc", "A@B.com", "secret1"))
        .await
        .unwrap();

    // Exactly one user row, unverified, email case-folded, no plaintext password.
    let users = users_handle.lock().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "a@b.com");
    assert!(!users[0].verified);
    assert_ne!(users[0].password_hash, "secret1");

    // The returned token decodes to the same email.
    let claims = decode_otp_claims(&out.otp_token);
    assert_eq!(claims.email, "a@b.com");
    assert!((100_000..=999_999).contains(&claims.otp));

    // The code went out by mail, in plaintext.
    let sent = sent_handle.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "a@b.com");
    assert_eq!(sent[0].subject, "Email Verification OTP");
    assert!(sent[0].text.contains(&claims.otp.to_string()));
}

#[tokio::test]
async fn should_reject_signup_with_missing_fields() {
    let uc = SignupUseCase {
        users: MockUserRepo::empty(),
        mailer: MockMailer::new(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc
        .execute(SignupInput {
            username: Some("abc".to_owned()),
            email: None,
            password: Some("secret1".to_owned()),
        })
        .await;
    assert!(matches!(result, Err(ApiError::MissingFields)));
}

#[tokio::test]
async fn should_reject_signup_with_invalid_email() {
    let uc = SignupUseCase {
        users: MockUserRepo::empty(),
        mailer: MockMailer::new(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc.execute(signup_input("abc", "not-an-email", "secret1")).await;
    assert!(matches!(result, Err(ApiError::InvalidEmail)));
}

#[tokio::test]
async fn should_reject_signup_with_short_password() {
    let uc = SignupUseCase {
        users: MockUserRepo::empty(),
        mailer: MockMailer::new(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc.execute(signup_input("abc", "a@b.com", "five5")).await;
    assert!(matches!(result, Err(ApiError::WeakPassword)));
}

#[tokio::test]
async fn should_reject_signup_with_markup_in_username() {
    let uc = SignupUseCase {
        users: MockUserRepo::empty(),
        mailer: MockMailer::new(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc
        .execute(signup_input("<script>", "a@b.com", "secret1"))
        .await;
    assert!(matches!(result, Err(ApiError::InvalidUsername)));
}

#[tokio::test]
async fn should_reject_signup_for_existing_email_in_any_verification_state() {
    let existing = test_user("a@b.com", "whatever", false);
    let uc = SignupUseCase {
        users: MockUserRepo::new(vec![existing]),
        mailer: MockMailer::new(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc.execute(signup_input("abc", "a@b.com", "secret1")).await;
    assert!(matches!(result, Err(ApiError::EmailTaken)));
}

#[tokio::test]
async fn should_surface_conflict_when_concurrent_signup_loses_unique_race() {
    // The existence check saw no row, but the store's unique index rejects
    // the insert — the loser must get a clean conflict.
    let uc = SignupUseCase {
        users: MockUserRepo::with_unique_violation(),
        mailer: MockMailer::new(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc.execute(signup_input("abc", "a@b.com", "secret1")).await;
    assert!(matches!(result, Err(ApiError::EmailTaken)));
}

#[tokio::test]
async fn should_keep_user_row_when_otp_mail_fails() {
    let repo = MockUserRepo::empty();
    let users_handle = repo.users_handle();

    let uc = SignupUseCase {
        users: repo,
        mailer: MockMailer::failing(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc.execute(signup_input("abc", "a@b.com", "secret1")).await;

    assert!(matches!(result, Err(ApiError::Internal(_))));
    // No rollback: the account exists unverified; resend-otp is the recovery.
    let users = users_handle.lock().unwrap();
    assert_eq!(users.len(), 1);
    assert!(!users[0].verified);
}

// ── Verify OTP ───────────────────────────────────────────────────────────────

async fn signed_up_repo_and_token() -> (MockUserRepo, String) {
    let repo = MockUserRepo::empty();
    let users_handle = repo.users_handle();
    let uc = SignupUseCase {
        users: repo,
        mailer: MockMailer::new(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let out = uc
        .execute(signup_input("abc", "a@b.com", "secret1"))
        .await
        .unwrap();
    (
        MockUserRepo {
            users: users_handle,
            conflict_on_create: false,
        },
        out.otp_token,
    )
}

#[tokio::test]
async fn should_verify_user_with_correct_code_and_token() {
    let (repo, token) = signed_up_repo_and_token().await;
    let users_handle = repo.users_handle();
    let code = decode_otp_claims(&token).otp;

    let uc = VerifyOtpUseCase {
        users: repo,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let view = uc
        .execute(VerifyOtpInput {
            email: Some("a@b.com".to_owned()),
            otp: Some(code.to_string()),
            otp_token: Some(token),
        })
        .await
        .unwrap();

    assert_eq!(view.email, "a@b.com");
    assert_eq!(view.username, "abc");
    assert!(users_handle.lock().unwrap()[0].verified);
}

#[tokio::test]
async fn should_reject_verification_with_wrong_code() {
    let (repo, token) = signed_up_repo_and_token().await;
    let code = decode_otp_claims(&token).otp;
    let wrong = if code == 999_999 { 100_000 } else { code + 1 };

    let uc = VerifyOtpUseCase {
        users: repo,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc
        .execute(VerifyOtpInput {
            email: Some("a@b.com".to_owned()),
            otp: Some(wrong.to_string()),
            otp_token: Some(token),
        })
        .await;
    assert!(matches!(result, Err(ApiError::OtpMismatch)));
}

#[tokio::test]
async fn should_reject_verification_with_mismatched_email() {
    let (repo, token) = signed_up_repo_and_token().await;
    let code = decode_otp_claims(&token).otp;

    let uc = VerifyOtpUseCase {
        users: repo,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc
        .execute(VerifyOtpInput {
            email: Some("other@b.com".to_owned()),
            otp: Some(code.to_string()),
            otp_token: Some(token),
        })
        .await;
    assert!(matches!(result, Err(ApiError::OtpMismatch)));
}

#[tokio::test]
async fn should_report_expired_otp_distinctly() {
    let (repo, _) = signed_up_repo_and_token().await;
    let expired = make_otp_token("a@b.com", 123_456, now_secs() - 30);

    let uc = VerifyOtpUseCase {
        users: repo,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc
        .execute(VerifyOtpInput {
            email: Some("a@b.com".to_owned()),
            otp: Some("123456".to_owned()),
            otp_token: Some(expired),
        })
        .await;
    assert!(matches!(result, Err(ApiError::OtpExpired)));
}

#[tokio::test]
async fn should_reject_garbage_otp_token() {
    let (repo, _) = signed_up_repo_and_token().await;
    let uc = VerifyOtpUseCase {
        users: repo,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc
        .execute(VerifyOtpInput {
            email: Some("a@b.com".to_owned()),
            otp: Some("123456".to_owned()),
            otp_token: Some("not-a-token".to_owned()),
        })
        .await;
    assert!(matches!(result, Err(ApiError::OtpVerificationFailed)));
}

#[tokio::test]
async fn should_return_not_found_when_verifying_unknown_account() {
    // Valid token for an email that has no user row.
    let token = make_otp_token("ghost@b.com", 123_456, now_secs() + 300);
    let uc = VerifyOtpUseCase {
        users: MockUserRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc
        .execute(VerifyOtpInput {
            email: Some("ghost@b.com".to_owned()),
            otp: Some("123456".to_owned()),
            otp_token: Some(token),
        })
        .await;
    assert!(matches!(result, Err(ApiError::UserNotFound)));
}

// ── Resend OTP ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_resend_for_nonexistent_email_without_revealing_absence() {
    let mailer = MockMailer::new();
    let sent_handle = mailer.sent_handle();
    let uc = ResendOtpUseCase {
        mailer,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let out = uc
        .execute(ResendOtpInput {
            email: Some("ghost@b.com".to_owned()),
        })
        .await
        .unwrap();

    let claims = decode_otp_claims(&out.otp_token);
    assert_eq!(claims.email, "ghost@b.com");
    assert_eq!(sent_handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_resend_with_invalid_email() {
    let uc = ResendOtpUseCase {
        mailer: MockMailer::new(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc
        .execute(ResendOtpInput {
            email: Some("nope".to_owned()),
        })
        .await;
    assert!(matches!(result, Err(ApiError::InvalidEmail)));
}

#[tokio::test]
async fn should_map_resend_mailer_failure_to_resend_error() {
    let uc = ResendOtpUseCase {
        mailer: MockMailer::failing(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc
        .execute(ResendOtpInput {
            email: Some("a@b.com".to_owned()),
        })
        .await;
    assert!(matches!(result, Err(ApiError::MailDelivery)));
}

// ── Signin ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_sign_in_verified_user_and_mint_valid_session() {
    let user = test_user("a@b.com", "secret1", true);
    let user_id = user.id;
    let uc = SigninUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let out = uc
        .execute(SigninInput {
            email: Some("a@b.com".to_owned()),
            password: Some("secret1".to_owned()),
        })
        .await
        .unwrap();

    assert_eq!(out.user.id, user_id);
    let info = validate_session_token(&out.session_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, user_id);
}

#[tokio::test]
async fn should_reject_unverified_user_even_with_correct_password() {
    let user = test_user("a@b.com", "secret1", false);
    let uc = SigninUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc
        .execute(SigninInput {
            email: Some("a@b.com".to_owned()),
            password: Some("secret1".to_owned()),
        })
        .await;
    assert!(matches!(result, Err(ApiError::Unverified)));
}

#[tokio::test]
async fn should_reject_unverified_user_with_wrong_password_identically() {
    let user = test_user("a@b.com", "secret1", false);
    let uc = SigninUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc
        .execute(SigninInput {
            email: Some("a@b.com".to_owned()),
            password: Some("wrong-password".to_owned()),
        })
        .await;
    assert!(matches!(result, Err(ApiError::Unverified)));
}

#[tokio::test]
async fn should_reject_wrong_password_for_verified_user() {
    let user = test_user("a@b.com", "secret1", true);
    let uc = SigninUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc
        .execute(SigninInput {
            email: Some("a@b.com".to_owned()),
            password: Some("wrong-password".to_owned()),
        })
        .await;
    assert!(matches!(result, Err(ApiError::WrongCredentials)));
}

#[tokio::test]
async fn should_return_not_found_for_unknown_email() {
    let uc = SigninUseCase {
        users: MockUserRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc
        .execute(SigninInput {
            email: Some("ghost@b.com".to_owned()),
            password: Some("secret1".to_owned()),
        })
        .await;
    assert!(matches!(result, Err(ApiError::UserNotFound)));
}

#[tokio::test]
async fn should_reject_signin_with_missing_fields() {
    let uc = SigninUseCase {
        users: MockUserRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc
        .execute(SigninInput {
            email: Some("a@b.com".to_owned()),
            password: None,
        })
        .await;
    assert!(matches!(result, Err(ApiError::MissingFields)));
}

// ── Full lifecycle ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_walk_signup_verify_signin_lifecycle() {
    let repo = MockUserRepo::empty();
    let users_handle = repo.users_handle();

    // Signup.
    let signup = SignupUseCase {
        users: repo,
        mailer: MockMailer::new(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let out = signup
        .execute(signup_input("abc", "a@b.com", "secret1"))
        .await
        .unwrap();
    assert!(!users_handle.lock().unwrap()[0].verified);

    // Signin before verification is refused.
    let signin = SigninUseCase {
        users: MockUserRepo {
            users: Arc::clone(&users_handle),
            conflict_on_create: false,
        },
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let premature = signin
        .execute(SigninInput {
            email: Some("a@b.com".to_owned()),
            password: Some("secret1".to_owned()),
        })
        .await;
    assert!(matches!(premature, Err(ApiError::Unverified)));

    // Verify with the mailed code.
    let code = decode_otp_claims(&out.otp_token).otp;
    let verify = VerifyOtpUseCase {
        users: MockUserRepo {
            users: Arc::clone(&users_handle),
            conflict_on_create: false,
        },
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    verify
        .execute(VerifyOtpInput {
            email: Some("a@b.com".to_owned()),
            otp: Some(code.to_string()),
            otp_token: Some(out.otp_token),
        })
        .await
        .unwrap();
    assert!(users_handle.lock().unwrap()[0].verified);

    // Signin now succeeds; the public user object carries no password hash.
    let out = signin
        .execute(SigninInput {
            email: Some("a@b.com".to_owned()),
            password: Some("secret1".to_owned()),
        })
        .await
        .unwrap();
    let info = validate_session_token(&out.session_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, out.user.id);
}
