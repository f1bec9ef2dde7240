//! Search error types.
//!
//! Each variant is produced where the failure actually happens (credential
//! check, HTTP status, body decode, payload validation), so callers never
//! have to sniff message text to tell a network problem from a bad key.

use thiserror::Error;

/// Shown when nothing more specific is known.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Ocorreu um erro desconhecido. Tente novamente.";

/// Shown when the service rejects the credential.
pub const CREDENTIAL_ERROR_MESSAGE: &str = "Chave de API inválida ou ausente.";

/// Errors that can occur while running a catechism search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// No API key is configured. Raised before any network attempt.
    #[error("API key is not configured")]
    Configuration,

    /// The generation service rejected the API key.
    #[error("API key rejected: {0}")]
    Credential(String),

    /// The response body was not valid JSON, or not an array of entries.
    #[error("malformed response: {detail}")]
    MalformedResponse {
        /// Parser or shape error, for logs only.
        detail: String,
    },

    /// The payload parsed but its entries failed validation.
    #[error("invalid entries: {}", .violations.join("; "))]
    InvalidEntries {
        /// One message per rejected item.
        violations: Vec<String>,
    },

    /// Connection, timeout, or body-read failure.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The service returned 429 Too Many Requests.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// The service returned a non-success status not covered above.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the service, or the raw body.
        message: String,
    },

    /// The search was superseded before it completed.
    #[error("search cancelled")]
    Cancelled,

    /// The local result contract failed to compile.
    #[error("result contract error: {0}")]
    Contract(#[from] cic_schema::SchemaError),
}

impl From<reqwest::Error> for SearchError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(Box::new(error))
    }
}

impl SearchError {
    /// Localized, non-technical message for the person who ran the search.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Configuration => {
                "API Key não configurada. Defina a variável de ambiente API_KEY.".to_string()
            }
            Self::Credential(_) => CREDENTIAL_ERROR_MESSAGE.to_string(),
            Self::MalformedResponse { .. } | Self::InvalidEntries { .. } => {
                "Falha ao processar dados retornados pela IA.".to_string()
            }
            Self::Transport(_) => "Erro de conexão. Verifique sua internet.".to_string(),
            Self::RateLimited { retry_after_secs } => format!(
                "Limite de requisições atingido. Tente novamente em {retry_after_secs} segundos."
            ),
            Self::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Cancelled => "Busca cancelada.".to_string(),
            Self::Api { .. } | Self::Contract(_) => UNKNOWN_ERROR_MESSAGE.to_string(),
        }
    }

    /// Whether the credential is missing or rejected.
    #[must_use]
    pub const fn is_credential_problem(&self) -> bool {
        matches!(self, Self::Configuration | Self::Credential(_))
    }
}
