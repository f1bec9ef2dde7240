//! Google Gemini `generateContent` backend.

use std::time::Duration;

use async_trait::async_trait;
use cic_config::GeminiConfig;
use cic_schema::ResponseSchema;
use serde::{Deserialize, Serialize};

use crate::backend::{GenerationBackend, GenerationRequest};
use crate::error::SearchError;
use crate::http::check_response;

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: WireContent<'a>,
    contents: Vec<WireContent<'a>>,
    generation_config: WireGenerationConfig<'a>,
}

#[derive(Serialize)]
struct WireContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<WirePart<'a>>,
}

#[derive(Serialize)]
struct WirePart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a ResponseSchema,
    temperature: f32,
}

impl<'a> From<&'a GenerationRequest> for GenerateContentRequest<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        Self {
            system_instruction: WireContent {
                role: None,
                parts: vec![WirePart {
                    text: &request.system_instruction,
                }],
            },
            contents: vec![WireContent {
                role: Some("user"),
                parts: vec![WirePart {
                    text: &request.user_prompt,
                }],
            }],
            generation_config: WireGenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.response_schema,
                temperature: request.temperature,
            },
        }
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, or `None` if there is
    /// no text at all.
    fn text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

// ── Backend ────────────────────────────────────────────────────────

/// HTTP client for the Generative Language API.
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    http: reqwest::Client,
    endpoint: String,
}

impl GeminiBackend {
    /// Build a backend from the Gemini config section.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Transport`] if the underlying `reqwest::Client`
    /// fails to build.
    pub fn new(config: &GeminiConfig) -> Result<Self, SearchError> {
        let mut builder = reqwest::Client::builder().user_agent("cic/0.1");
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.endpoint)
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<Option<String>, SearchError> {
        let url = self.url_for(&request.model);
        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&GenerateContentRequest::from(request))
            .send()
            .await?;
        let resp = check_response(resp).await?;

        let body = resp.text().await?;
        let data: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| SearchError::MalformedResponse {
                detail: format!("generateContent envelope: {e}"),
            })?;
        Ok(data.text())
    }
}
