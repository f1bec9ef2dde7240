//! Search behavior configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_min_results() -> u32 {
    3
}

const fn default_max_results() -> u32 {
    6
}

/// Query offered when a search comes back empty.
fn default_fallback_query() -> String {
    String::from("Credo")
}

/// What to do with payload items that fail validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidEntryPolicy {
    /// Drop invalid items and keep the rest.
    #[default]
    Drop,
    /// Fail the whole batch if any item is invalid.
    Reject,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Lower bound requested from the model.
    #[serde(default = "default_min_results")]
    pub min_results: u32,

    /// Upper bound requested from the model; longer payloads are truncated.
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Suggested query for the empty-result state.
    #[serde(default = "default_fallback_query")]
    pub fallback_query: String,

    #[serde(default)]
    pub invalid_entries: InvalidEntryPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_results: default_min_results(),
            max_results: default_max_results(),
            fallback_query: default_fallback_query(),
            invalid_entries: InvalidEntryPolicy::default(),
        }
    }
}

impl SearchConfig {
    /// Check that the result bounds are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `min_results` is zero, exceeds
    /// `max_results`, or the fallback query is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_results == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.min_results".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.min_results > self.max_results {
            return Err(ConfigError::InvalidValue {
                field: "search.max_results".into(),
                reason: format!(
                    "must be >= min_results ({} < {})",
                    self.max_results, self.min_results
                ),
            });
        }
        if self.fallback_query.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "search.fallback_query".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}
