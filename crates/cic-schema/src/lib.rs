//! # cic-schema
//!
//! The result schema contract shared by the gateway and its tests.
//!
//! This crate provides:
//! - [`ResponseSchema`]: the Gemini structured-output schema sent with every
//!   generation request, constraining the model to an array of entries
//! - [`SchemaContract`]: the same shape as a JSON Schema derived from
//!   [`cic_core::CatechismEntry`], compiled once and used to re-check each
//!   payload item after the call returns
//!
//! The model can emit syntactically conformant JSON that still breaks the
//! contract's intent, so the local check is not optional.

mod contract;
mod error;
mod response;

pub use contract::SchemaContract;
pub use error::SchemaError;
pub use response::{ResponseSchema, SchemaType};
