use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::TutorConfig;
use crate::errors::{TutorError, TutorResult};
use crate::gateway::GenerativeBackend;
use crate::types::{GenerateContentRequest, GenerateContentResponse};

/// Client for interacting with the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    /// Create a new Gemini API client
    pub fn new(config: &TutorConfig) -> TutorResult<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            TutorError::ConfigError(
                "API key is required to initialize the Gemini client".to_string(),
            )
        })?;

        let client = Client::new();

        Ok(Self { client, api_key })
    }

    /// Get the API URL for the given model
    fn endpoint(&self, model: &str) -> String {
        format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            model, self.api_key
        )
    }

    /// Generate content using the Gemini API
    pub async fn generate_content(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> TutorResult<GenerateContentResponse> {
        let url = self.endpoint(model);
        debug!(model, "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TutorError::RequestError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.map_err(|e| {
                TutorError::ResponseError(format!("Failed to read error response: {}", e))
            })?;

            return Err(TutorError::HttpError {
                status_code: status.as_u16(),
                message: format!("API request failed: {}", error_body),
            });
        }

        let response_body = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| TutorError::ParsingError(format!("Failed to parse response: {}", e)))?;

        Ok(response_body)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> TutorResult<GenerateContentResponse> {
        self.generate_content(model, request).await
    }
}
