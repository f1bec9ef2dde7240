//! Gemini generation service configuration.

use serde::{Deserialize, Serialize};

/// Default model used for catechism lookups.
fn default_model() -> String {
    String::from("gemini-2.5-flash")
}

/// Default Generative Language API base URL.
fn default_endpoint() -> String {
    String::from("https://generativelanguage.googleapis.com")
}

/// Low temperature keeps paragraph text close to the canonical wording.
const fn default_temperature() -> f32 {
    0.1
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeminiConfig {
    /// API key for the Generative Language API.
    #[serde(default)]
    pub api_key: String,

    /// Model identifier (e.g., `gemini-2.5-flash`).
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL, without the `/v1beta` path.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Sampling temperature sent with every request.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// HTTP client timeout. Unset means the call may block until the
    /// service answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            endpoint: default_endpoint(),
            temperature: default_temperature(),
            request_timeout_secs: None,
        }
    }
}

impl GeminiConfig {
    /// Check if a credential is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    /// The API key, or `None` when unset or blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        let key = self.api_key.trim();
        if key.is_empty() { None } else { Some(key) }
    }
}
