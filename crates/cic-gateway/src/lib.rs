//! # cic-gateway
//!
//! The search gateway: turns a query into a validated, ordered list of
//! catechism paragraphs by way of one text-generation call.
//!
//! A search:
//! 1. fails with [`SearchError::Configuration`] if no API key is configured,
//!    before anything touches the network
//! 2. builds the system instruction and user prompt ([`prompt`])
//! 3. calls the [`GenerationBackend`] exactly once, racing a [`CancelSignal`]
//! 4. treats an empty answer as "no results"
//! 5. strips code fences, parses, and validates each entry ([`decode`])
//!
//! [`GeminiBackend`] talks to the Generative Language API; tests substitute
//! their own backend.

pub mod backend;
pub mod cancel;
pub mod decode;
pub mod gemini;
pub mod prompt;

mod error;
mod http;

pub use backend::{GenerationBackend, GenerationRequest};
pub use cancel::{CancelHandle, CancelSignal};
pub use error::{CREDENTIAL_ERROR_MESSAGE, SearchError, UNKNOWN_ERROR_MESSAGE};
pub use gemini::GeminiBackend;

use cic_config::{CicConfig, GeminiConfig, SearchConfig};
use cic_core::CatechismEntry;
use cic_schema::SchemaContract;

/// Runs catechism searches against a generation backend.
///
/// All settings come from the [`CicConfig`] given at construction; nothing is
/// read from the environment during a search.
#[derive(Debug)]
pub struct SearchGateway<B> {
    backend: B,
    gemini: GeminiConfig,
    search: SearchConfig,
    contract: SchemaContract,
    system_instruction: String,
}

impl SearchGateway<GeminiBackend> {
    /// Build a gateway backed by the Gemini API.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the HTTP client or the result contract
    /// cannot be built.
    pub fn gemini(config: &CicConfig) -> Result<Self, SearchError> {
        let backend = GeminiBackend::new(&config.gemini)?;
        Self::new(config, backend)
    }
}

impl<B: GenerationBackend> SearchGateway<B> {
    /// Build a gateway over any backend.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Contract`] if the result contract fails to compile.
    pub fn new(config: &CicConfig, backend: B) -> Result<Self, SearchError> {
        Ok(Self {
            backend,
            gemini: config.gemini.clone(),
            search: config.search.clone(),
            contract: SchemaContract::new()?,
            system_instruction: prompt::system_instruction(
                config.search.min_results,
                config.search.max_results,
            ),
        })
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub const fn search_config(&self) -> &SearchConfig {
        &self.search
    }

    /// The request that [`SearchGateway::search`] would send for `query`.
    #[must_use]
    pub fn request_for(&self, query: &str) -> GenerationRequest {
        GenerationRequest {
            model: self.gemini.model.clone(),
            system_instruction: self.system_instruction.clone(),
            user_prompt: prompt::user_prompt(query),
            response_schema: self.contract.response_schema().clone(),
            temperature: self.gemini.temperature,
        }
    }

    /// Search without cancellation.
    ///
    /// # Errors
    ///
    /// See [`SearchGateway::search_with_cancel`].
    pub async fn search(&self, query: &str) -> Result<Vec<CatechismEntry>, SearchError> {
        self.search_with_cancel(query, &CancelSignal::never()).await
    }

    /// Search for catechism paragraphs matching `query`.
    ///
    /// Returns an empty vec when the service answers without text.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Configuration`] if no API key is configured
    /// - [`SearchError::Cancelled`] if `cancel` fires first
    /// - any error from the backend call or from [`decode::decode_entries`]
    pub async fn search_with_cancel(
        &self,
        query: &str,
        cancel: &CancelSignal,
    ) -> Result<Vec<CatechismEntry>, SearchError> {
        let Some(api_key) = self.gemini.api_key() else {
            tracing::warn!("search attempted without an API key");
            return Err(SearchError::Configuration);
        };

        let request = self.request_for(query);
        tracing::debug!(
            model = %request.model,
            query_len = query.len(),
            "dispatching catechism search"
        );

        let text = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!("catechism search cancelled");
                return Err(SearchError::Cancelled);
            }
            result = self.backend.generate(api_key, &request) => result?,
        };

        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            tracing::warn!("empty response from generation service");
            return Ok(Vec::new());
        };

        let entries = decode::decode_entries(&text, &self.contract, &self.search)?;
        tracing::debug!(results = entries.len(), "catechism search completed");
        Ok(entries)
    }
}
