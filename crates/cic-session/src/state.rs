//! Session phases and the state a presentation layer observes.
//!
//! ```text
//! idle → searching → success
//!                  → failed
//!                  → searching (new submission cancels the in-flight one)
//! success | failed → searching
//! ```

use std::fmt;

use cic_core::CatechismEntry;
use serde::{Deserialize, Serialize};

/// Where a session is in its search lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Nothing searched yet.
    #[default]
    Idle,
    /// A request is in flight.
    Searching,
    /// The last search resolved, possibly with zero results.
    Success,
    /// The last search failed.
    Failed,
}

impl SessionPhase {
    /// Valid next states from the current state.
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Idle => &[Self::Searching],
            Self::Searching => &[Self::Success, Self::Failed, Self::Searching],
            Self::Success => &[Self::Searching],
            Self::Failed => &[Self::Searching],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Searching => "searching",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a search session.
///
/// `entries` is replaced wholesale on every search and cleared as soon as a
/// new one starts, so stale results are never shown next to a new query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: SessionPhase,
    /// Most recently submitted query.
    pub query: Option<String>,
    pub entries: Vec<CatechismEntry>,
    /// User-facing failure message, set only in [`SessionPhase::Failed`].
    pub error: Option<String>,
    /// Incremented on every submission; outcomes from older generations are discarded.
    pub generation: u64,
}

impl SessionState {
    #[must_use]
    pub fn has_searched(&self) -> bool {
        self.phase != SessionPhase::Idle
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Searching
    }
}
