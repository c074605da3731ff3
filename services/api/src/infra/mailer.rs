use anyhow::{Context as _, anyhow};
use serde::Serialize;

use crate::domain::repository::Mailer;
use crate::error::ApiError;

const MAIL_API_URL: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Debug, Serialize)]
struct EmailAddress<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody<'a> {
    sender: EmailAddress<'a>,
    to: Vec<EmailAddress<'a>>,
    subject: &'a str,
    text_content: &'a str,
}

/// Transactional-mail transport backed by the Brevo HTTP API.
#[derive(Clone)]
pub struct HttpMailer {
    pub http: reqwest::Client,
    pub api_key: String,
    pub sender: String,
}

impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, text: &str) -> Result<(), ApiError> {
        let body = SendEmailBody {
            sender: EmailAddress { email: &self.sender },
            to: vec![EmailAddress { email: to }],
            subject,
            text_content: text,
        };

        let resp = self
            .http
            .post(MAIL_API_URL)
            .header("api-key", &self.api_key)
            .header("accept", "application/json")
            .json(&body)
            .send()
            .await
            .context("send mail request")?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(ApiError::Internal(anyhow!(
                "mail api returned {status}: {detail}"
            )));
        }
        Ok(())
    }
}
