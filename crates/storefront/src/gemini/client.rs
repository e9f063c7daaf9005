//! Email classifier backed by the Generative Language API.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use super::types::{
    ApiErrorResponse, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Part,
};
use crate::config::GeminiConfig;
use crate::services::email_gate::{
    CLASSIFIER_INSTRUCTION, ClassifierError, EmailClassifier, EmailVerdict,
};

/// Email classifier that asks a Gemini model for a structured verdict.
#[derive(Clone)]
pub struct GeminiClassifier {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl GeminiClassifier {
    /// Create a new classifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &GeminiConfig) -> Result<Self, ClassifierError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| ClassifierError::Malformed(format!("Invalid API key format: {e}")))?;
        api_key.set_sensitive(true);
        headers.insert("x-goog-api-key", api_key);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.base_url.as_str().trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            client: builder.build()?,
            endpoint,
            model: config.model.clone(),
        })
    }

    /// Full URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EmailClassifier for GeminiClassifier {
    #[instrument(skip(self, email), fields(model = %self.model))]
    async fn classify(&self, email: &str) -> Result<EmailVerdict, ClassifierError> {
        let request = build_request(email);

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&body).map_or(body, |api| {
                format!("{}: {}", api.error.status, api.error.message)
            });
            return Err(ClassifierError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let response: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| ClassifierError::Malformed(format!("Failed to parse response: {e}")))?;

        let text = response
            .first_text()
            .ok_or_else(|| ClassifierError::Malformed("No text content in response".to_string()))?;

        let verdict = parse_verdict(&text)?;
        debug!(score = verdict.reputation_score, "Email classified");
        Ok(verdict)
    }
}

/// Build the classification request for `email`.
fn build_request(email: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(build_prompt(email)),
            }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: verdict_schema(),
        },
    }
}

/// Prompt: the candidate address followed by the fixed instruction.
fn build_prompt(email: &str) -> String {
    format!("Analyze the following email address: \"{email}\".\n{CLASSIFIER_INSTRUCTION}")
}

/// Response schema the model must follow.
fn verdict_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "isValid": { "type": "BOOLEAN" },
            "message": { "type": "STRING" },
            "isDisposable": { "type": "BOOLEAN" },
            "reputationScore": { "type": "NUMBER", "description": "0 to 100" }
        },
        "required": ["isValid", "message", "isDisposable", "reputationScore"]
    })
}

/// Parse and contract-check the model's JSON answer.
fn parse_verdict(text: &str) -> Result<EmailVerdict, ClassifierError> {
    let verdict: EmailVerdict = serde_json::from_str(text.trim())
        .map_err(|e| ClassifierError::Malformed(format!("Invalid verdict JSON: {e}")))?;
    verdict.check_contract()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_endpoint_from_config() {
        let mut config = GeminiConfig::new(SecretString::from("k3y-With-Entropy".to_string()));
        config.model = "gemini-2.5-flash".to_string();
        let classifier = GeminiClassifier::new(&config).unwrap();
        assert_eq!(
            classifier.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_shape() {
        let request = serde_json::to_value(build_request("ana@gmail.com")).unwrap();
        let text = request["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.contains("\"ana@gmail.com\""));
        assert!(text.contains("disposable"));
        assert_eq!(
            request["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            request["generationConfig"]["responseSchema"]["required"][3],
            "reputationScore"
        );
    }

    #[test]
    fn test_parse_verdict() {
        let verdict = parse_verdict(
            r#" {"isValid": false, "message": "gibberish", "isDisposable": false, "reputationScore": 12.5} "#,
        )
        .unwrap();
        assert!(!verdict.is_valid);
        assert_eq!(verdict.message, "gibberish");
    }

    #[test]
    fn test_parse_verdict_missing_field() {
        let err = parse_verdict(r#"{"isValid": true, "message": "ok"}"#).unwrap_err();
        assert!(matches!(err, ClassifierError::Malformed(_)));
    }

    #[test]
    fn test_parse_verdict_out_of_range() {
        let err = parse_verdict(
            r#"{"isValid": true, "message": "ok", "isDisposable": false, "reputationScore": 250}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ClassifierError::Malformed(_)));
    }

    #[test]
    fn test_parse_verdict_keeps_disposable_with_bad_score() {
        let verdict = parse_verdict(
            r#"{"isValid": true, "message": "ok", "isDisposable": true, "reputationScore": 101}"#,
        )
        .unwrap();
        assert!(verdict.is_disposable);
    }

    #[test]
    fn test_classifier_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeminiClassifier>();
    }
}
