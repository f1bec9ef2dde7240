//! The catechism paragraph returned by a search.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::EntryViolation;

/// Paragraph pages on the reference site, addressed by number.
pub const SOURCE_BASE_URL: &str = "https://www.catecismodaigreja.com.br/paragrafo";

/// A single paragraph of the Catechism of the Catholic Church.
///
/// Entries are built per response and never mutated after validation. The
/// schemars constraints mirror [`CatechismEntry::validate`] so the derived
/// JSON Schema can reject structurally bad payload items before decoding.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CatechismEntry {
    /// Paragraph number (e.g., `1324`), without the `§` prefix.
    #[schemars(range(min = 1))]
    pub number: u32,
    /// Paragraph body, verbatim from the canonical translation.
    #[schemars(length(min = 1))]
    pub text: String,
    /// Short label for the paragraph's context.
    #[schemars(length(min = 1))]
    pub topic: String,
    /// Scriptural or conciliar citations, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl CatechismEntry {
    #[must_use]
    pub fn new(number: u32, text: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            topic: topic.into(),
            reference: None,
        }
    }

    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Link to this paragraph on the reference site.
    #[must_use]
    pub fn source_url(&self) -> String {
        format!("{SOURCE_BASE_URL}/{}", self.number)
    }

    /// Plain-text citation suitable for sharing: `Catecismo §N: "text"`.
    #[must_use]
    pub fn citation(&self) -> String {
        format!("Catecismo §{}: \"{}\"", self.number, self.text)
    }

    /// Trim surrounding whitespace and drop a blank `reference`.
    #[must_use]
    pub fn normalized(self) -> Self {
        let reference = self
            .reference
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        Self {
            number: self.number,
            text: self.text.trim().to_string(),
            topic: self.topic.trim().to_string(),
            reference,
        }
    }

    /// Check the data-model invariants: `number >= 1`, non-blank `text` and `topic`.
    ///
    /// # Errors
    ///
    /// Returns the first [`EntryViolation`] found.
    pub fn validate(&self) -> Result<(), EntryViolation> {
        if self.number == 0 {
            return Err(EntryViolation::ZeroNumber);
        }
        if self.text.trim().is_empty() {
            return Err(EntryViolation::EmptyText {
                number: self.number,
            });
        }
        if self.topic.trim().is_empty() {
            return Err(EntryViolation::EmptyTopic {
                number: self.number,
            });
        }
        Ok(())
    }
}

/// Keep the first entry for each paragraph number, preserving order.
///
/// Returns the kept entries and, for each dropped entry, its position in the
/// input paired with an [`EntryViolation::DuplicateNumber`].
#[must_use]
pub fn dedup_by_number(
    entries: Vec<CatechismEntry>,
) -> (Vec<CatechismEntry>, Vec<(usize, EntryViolation)>) {
    let mut seen = HashSet::with_capacity(entries.len());
    let mut kept = Vec::with_capacity(entries.len());
    let mut dropped = Vec::new();

    for (position, entry) in entries.into_iter().enumerate() {
        if seen.insert(entry.number) {
            kept.push(entry);
        } else {
            dropped.push((position, EntryViolation::DuplicateNumber(entry.number)));
        }
    }
    (kept, dropped)
}
