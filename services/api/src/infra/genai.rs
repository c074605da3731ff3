use serde_json::Value;

use crate::domain::repository::QuoteGenerator;
use crate::domain::types::GeneratedQuote;
use crate::error::ApiError;

const GENERATE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// Generative-AI collaborator backed by the Gemini `generateContent` API.
/// The model is asked for a JSON array of `{quote, origin}` objects.
#[derive(Clone)]
pub struct GeminiQuoteGenerator {
    pub http: reqwest::Client,
    pub api_key: String,
}

impl QuoteGenerator for GeminiQuoteGenerator {
    async fn generate(&self, tags: &[String]) -> Result<Vec<GeneratedQuote>, ApiError> {
        let prompt = format!(
            "Generate 3 inspirational, motivational quotes based on the following themes: {}. \
             Format the output as an array of objects with 'quote' and 'origin' fields.",
            tags.join(", ")
        );
        let body = serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": 0.3,
                "topP": 0.95,
                "topK": 40,
                "maxOutputTokens": 8192,
                "responseMimeType": "application/json",
            },
        });

        let resp = self
            .http
            .post(GENERATE_URL)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|_| ApiError::QuoteGeneration)?;
        if !resp.status().is_success() {
            return Err(ApiError::QuoteGeneration);
        }

        let payload: Value = resp.json().await.map_err(|_| ApiError::QuoteGeneration)?;
        let text = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or(ApiError::QuoteGeneration)?;

        parse_generated(text)
    }
}

/// Parse the model's response text. Anything other than a JSON array of
/// `{quote, origin}` objects is a format error.
fn parse_generated(text: &str) -> Result<Vec<GeneratedQuote>, ApiError> {
    let value: Value = serde_json::from_str(text).map_err(|_| ApiError::AiResponseFormat)?;
    if !value.is_array() {
        return Err(ApiError::AiResponseFormat);
    }
    serde_json::from_value(value).map_err(|_| ApiError::AiResponseFormat)
}
