//! # cic-core
//!
//! Core types shared across the Catecismo search crates.
//!
//! This crate provides:
//! - [`CatechismEntry`], the paragraph shape returned by every search
//! - [`EntryViolation`], the typed reasons an entry fails its invariants
//! - [`dedup_by_number`], enforcing paragraph-number uniqueness within a result set

pub mod entry;
pub mod errors;

pub use entry::{CatechismEntry, SOURCE_BASE_URL, dedup_by_number};
pub use errors::EntryViolation;
