//! Read-only projection of a session for presentation.
//!
//! Carries the text a results page needs; layout and styling live elsewhere.

use cic_core::CatechismEntry;
use serde::Serialize;

use crate::state::SessionState;

pub const ERROR_TITLE: &str = "Não foi possível realizar a busca";
pub const EMPTY_TITLE: &str = "Nenhum resultado encontrado";
pub const EMPTY_HINT: &str =
    "Não encontramos parágrafos exatos para sua busca na base de dados. Tente termos mais gerais.";

/// A query the user can run with one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackSuggestion {
    pub query: String,
    pub label: String,
}

/// Shown when a search succeeded with zero results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub title: String,
    pub hint: String,
    pub suggestion: FallbackSuggestion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorNotice {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub has_searched: bool,
    pub loading: bool,
    /// `Resultados para: "<query>"` once a search has been submitted.
    pub status_text: Option<String>,
    pub result_count: usize,
    pub result_count_label: String,
    pub error: Option<ErrorNotice>,
    pub empty_state: Option<EmptyState>,
    pub entries: Vec<CatechismEntry>,
}

impl SessionView {
    #[must_use]
    pub fn project(state: &SessionState, fallback_query: &str) -> Self {
        let has_searched = state.has_searched();
        let loading = state.is_loading();
        let result_count = state.entries.len();

        let error = state.error.as_ref().map(|message| ErrorNotice {
            title: ERROR_TITLE.to_string(),
            message: message.clone(),
        });

        let empty_state = (has_searched && !loading && error.is_none() && result_count == 0)
            .then(|| EmptyState {
                title: EMPTY_TITLE.to_string(),
                hint: EMPTY_HINT.to_string(),
                suggestion: FallbackSuggestion {
                    query: fallback_query.to_string(),
                    label: format!("Tentar buscar \"{fallback_query}\""),
                },
            });

        Self {
            has_searched,
            loading,
            status_text: state
                .query
                .as_ref()
                .filter(|_| has_searched)
                .map(|q| format!("Resultados para: \"{q}\"")),
            result_count,
            result_count_label: result_count_label(result_count),
            error,
            empty_state,
            entries: state.entries.clone(),
        }
    }
}

fn result_count_label(count: usize) -> String {
    if count == 1 {
        "1 resultado".to_string()
    } else {
        format!("{count} resultados")
    }
}
