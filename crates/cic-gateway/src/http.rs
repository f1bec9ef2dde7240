//! HTTP response classification for the generation service.
//!
//! Maps status codes and Gemini error bodies onto [`SearchError`] variants:
//! - **429** → [`SearchError::RateLimited`] (`Retry-After` seconds, 60 s fallback)
//! - **401 / 403**, or an error body with reason `API_KEY_INVALID` or status
//!   `UNAUTHENTICATED` / `PERMISSION_DENIED` → [`SearchError::Credential`]
//! - any other non-success → [`SearchError::Api`]

use serde::Deserialize;

use crate::error::SearchError;

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    reason: Option<String>,
}

const CREDENTIAL_REASONS: &[&str] = &["API_KEY_INVALID", "API_KEY_EXPIRED"];
const CREDENTIAL_STATUSES: &[&str] = &["UNAUTHENTICATED", "PERMISSION_DENIED"];

/// Check an HTTP response for error conditions, returning it unchanged on success.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, SearchError> {
    if resp.status() == 429 {
        return Err(SearchError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(classify_failure(status, &body));
    }
    Ok(resp)
}

/// Classify a non-success response from its status and body.
pub fn classify_failure(status: u16, body: &str) -> SearchError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);

    let credential_rejected = matches!(status, 401 | 403)
        || parsed.as_ref().is_some_and(|err| {
            CREDENTIAL_STATUSES.contains(&err.status.as_str())
                || err.details.iter().any(|d| {
                    d.reason
                        .as_deref()
                        .is_some_and(|r| CREDENTIAL_REASONS.contains(&r))
                })
        });

    let message = parsed
        .map(|err| err.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    if credential_rejected {
        tracing::warn!(status, "generation service rejected the API key");
        SearchError::Credential(message)
    } else {
        SearchError::Api { status, message }
    }
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}
