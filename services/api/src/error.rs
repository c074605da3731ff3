use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// API error variants. Every error renders as `{"success": false,
/// "message": …}`; credential-related messages stay generic so failed
/// verification does not reveal which check tripped.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // Account validation
    #[error("All fields are required")]
    MissingFields,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Password must be at least 6 characters")]
    WeakPassword,
    #[error("Username must be between 3 and 30 characters")]
    InvalidUsername,
    #[error("User with this email already exists")]
    EmailTaken,

    // OTP verification
    #[error("OTP has expired. Please request a new one.")]
    OtpExpired,
    #[error("Invalid or expired OTP")]
    OtpMismatch,
    #[error("OTP verification failed")]
    OtpVerificationFailed,
    #[error("Error resending OTP")]
    MailDelivery,

    // Signin / session
    #[error("User not found")]
    UserNotFound,
    #[error("Please verify your email address.")]
    Unverified,
    #[error("Wrong credentials")]
    WrongCredentials,
    #[error("Unauthorized")]
    Unauthenticated,

    // Quote lists
    #[error("Title is required")]
    TitleRequired,
    #[error("A quote list can have a maximum of 10 tags.")]
    TooManyTags,
    #[error("A quote list can have a maximum of 100 quotes.")]
    TooManyQuotes,
    #[error("You can only create up to 100 quote lists.")]
    TooManyLists,
    #[error("Both quote and origin are required")]
    QuoteFieldsRequired,
    #[error("Tags are required to generate quotes")]
    TagsRequired,
    #[error("Search query is required")]
    SearchQueryRequired,
    #[error("Quote list not found")]
    ListNotFound,
    #[error("Quote list not found or unauthorized")]
    ListNotFoundOrUnauthorized,
    #[error("You can only modify your own lists")]
    NotListOwner,
    #[error("No quote lists found matching the search query")]
    NoSearchMatches,

    // Generative AI
    #[error("Unexpected response format from AI")]
    AiResponseFormat,
    #[error("Error generating quotes")]
    QuoteGeneration,

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingFields
            | Self::InvalidEmail
            | Self::WeakPassword
            | Self::InvalidUsername
            | Self::EmailTaken
            | Self::OtpExpired
            | Self::OtpMismatch
            | Self::OtpVerificationFailed
            | Self::TitleRequired
            | Self::TooManyTags
            | Self::TooManyQuotes
            | Self::TooManyLists
            | Self::QuoteFieldsRequired
            | Self::TagsRequired
            | Self::SearchQueryRequired => StatusCode::BAD_REQUEST,
            Self::Unverified | Self::WrongCredentials | Self::Unauthenticated | Self::NotListOwner => {
                StatusCode::UNAUTHORIZED
            }
            Self::UserNotFound
            | Self::ListNotFound
            | Self::ListNotFoundOrUnauthorized
            | Self::NoSearchMatches => StatusCode::NOT_FOUND,
            Self::MailDelivery
            | Self::AiResponseFormat
            | Self::QuoteGeneration
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — the TraceLayer already records method/uri/status for
        // every request, and 4xx are expected client errors. Internal errors
        // carry an anyhow chain that must be logged to trace the root cause.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, "internal error");
        }
        let body = serde_json::json!({
            "success": false,
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
