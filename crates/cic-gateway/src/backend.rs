//! The seam between the gateway and the text-generation service.

use async_trait::async_trait;
use cic_schema::ResponseSchema;

use crate::error::SearchError;

/// Everything the generation service needs for one call, minus the credential.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Model identifier (e.g., `gemini-2.5-flash`).
    pub model: String,
    pub system_instruction: String,
    pub user_prompt: String,
    /// Structured-output contract the model must follow.
    pub response_schema: ResponseSchema,
    pub temperature: f32,
}

/// A text-generation service that answers one request with an optional text
/// payload.
///
/// `Ok(None)` means the service answered but produced no text; the gateway
/// treats it as "no results", not as a failure.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Run one generation call. Implementations must not retry.
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<Option<String>, SearchError>;
}
