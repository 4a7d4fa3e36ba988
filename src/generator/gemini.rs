use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::TextGenerator;
use crate::config::GeneratorConfig;
use crate::{Result, TravelPlannerError};

/// Google Gemini `generateContent` client
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout_seconds: u64,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a new client
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| TravelPlannerError::config("Missing generator API key"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("trip-planner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TravelPlannerError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout_seconds: config.timeout_seconds.into(),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!("Prompt: {}", prompt);
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TravelPlannerError::plan_generation(format!(
                        "model did not answer within {}s",
                        self.timeout_seconds
                    ))
                } else {
                    TravelPlannerError::plan_generation(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(%status, "Generator returned an error: {}", error_text);
            return Err(TravelPlannerError::plan_generation(format!(
                "model returned {status}"
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| TravelPlannerError::plan_generation(format!("unreadable response: {e}")))?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(TravelPlannerError::plan_generation("model returned no text"));
        }

        info!("Generated {} characters of itinerary", text.len());
        Ok(text)
    }
}
