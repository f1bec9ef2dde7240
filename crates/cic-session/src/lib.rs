//! # cic-session
//!
//! The search session controller: the state machine a presentation layer
//! drives with queries and observes for results.
//!
//! - [`SearchSession`] owns the current [`SessionState`] and publishes every
//!   change on a `tokio::sync::watch` channel
//! - [`PendingSearch`] is one submitted query; resolving it applies the
//!   outcome unless a newer query replaced it
//! - [`SessionView`] projects a state into the texts a results page shows
//!
//! Failures never cross into presentation as error values: they are turned
//! into one localized message at the session boundary.

mod controller;
mod state;
mod view;

pub use controller::{PendingSearch, SearchOutcome, SearchSession};
pub use state::{SessionPhase, SessionState};
pub use view::{EmptyState, ErrorNotice, FallbackSuggestion, SessionView};
