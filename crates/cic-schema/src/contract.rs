//! Local enforcement of the result contract.

use cic_core::CatechismEntry;
use schemars::schema_for;

use crate::error::SchemaError;
use crate::response::ResponseSchema;

/// Both sides of the result contract: what the model is asked for and the
/// compiled validator that re-checks what came back.
pub struct SchemaContract {
    response: ResponseSchema,
    entry_schema: serde_json::Value,
    validator: jsonschema::Validator,
}

impl std::fmt::Debug for SchemaContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaContract")
            .field("response", &self.response)
            .finish_non_exhaustive()
    }
}

impl SchemaContract {
    /// Derive the entry JSON Schema from [`CatechismEntry`] and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Generation`] if the derived schema cannot be
    /// serialized or compiled.
    pub fn new() -> Result<Self, SchemaError> {
        let entry_schema = serde_json::to_value(schema_for!(CatechismEntry))
            .map_err(|e| SchemaError::Generation(e.to_string()))?;
        let validator = jsonschema::validator_for(&entry_schema)
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;

        Ok(Self {
            response: ResponseSchema::catechism_entries(),
            entry_schema,
            validator,
        })
    }

    /// Schema sent as `generationConfig.responseSchema`.
    #[must_use]
    pub const fn response_schema(&self) -> &ResponseSchema {
        &self.response
    }

    /// The JSON Schema for a single entry, for export.
    #[must_use]
    pub const fn entry_schema(&self) -> &serde_json::Value {
        &self.entry_schema
    }

    /// Check one payload item against the entry schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ValidationFailed`] with every violation found.
    pub fn check_entry(&self, item: &serde_json::Value) -> Result<(), SchemaError> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(item)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }
}
