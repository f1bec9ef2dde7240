//! Gemini structured-output schema.
//!
//! The Generative Language API accepts an OpenAPI subset with upper-case type
//! names and an optional `propertyOrdering`. Field descriptions are part of
//! the prompt the model sees, so they stay in Brazilian Portuguese.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Type names understood by `generationConfig.responseSchema`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    String,
    Integer,
    Object,
    Array,
}

/// A node of the structured-output schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ResponseSchema>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, ResponseSchema>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Field order the model should emit; `properties` itself is unordered.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_ordering: Vec<String>,
}

impl ResponseSchema {
    fn leaf(schema_type: SchemaType, description: &str) -> Self {
        Self {
            schema_type,
            description: Some(description.to_string()),
            items: None,
            properties: BTreeMap::new(),
            required: Vec::new(),
            property_ordering: Vec::new(),
        }
    }

    #[must_use]
    pub fn string(description: &str) -> Self {
        Self::leaf(SchemaType::String, description)
    }

    #[must_use]
    pub fn integer(description: &str) -> Self {
        Self::leaf(SchemaType::Integer, description)
    }

    #[must_use]
    pub fn array(description: &str, items: Self) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::leaf(SchemaType::Array, description)
        }
    }

    /// Build an object from `(name, schema, required)` triples, keeping their
    /// order as the `propertyOrdering`.
    #[must_use]
    pub fn object(fields: Vec<(&str, Self, bool)>) -> Self {
        let mut properties = BTreeMap::new();
        let mut required = Vec::new();
        let mut property_ordering = Vec::with_capacity(fields.len());

        for (name, schema, is_required) in fields {
            if is_required {
                required.push(name.to_string());
            }
            property_ordering.push(name.to_string());
            properties.insert(name.to_string(), schema);
        }

        Self {
            schema_type: SchemaType::Object,
            description: None,
            items: None,
            properties,
            required,
            property_ordering,
        }
    }

    /// The contract for a catechism search: an array of entries with required
    /// `number`, `text`, `topic` and optional `reference`.
    #[must_use]
    pub fn catechism_entries() -> Self {
        let entry = Self::object(vec![
            (
                "number",
                Self::integer("O número do parágrafo (apenas números)."),
                true,
            ),
            (
                "text",
                Self::string("O texto integral do parágrafo em Português do Brasil."),
                true,
            ),
            (
                "topic",
                Self::string("Um tópico breve ou título para o contexto deste parágrafo."),
                true,
            ),
            (
                "reference",
                Self::string("Referências bíblicas ou de concílios mencionadas no texto."),
                false,
            ),
        ]);

        Self::array(
            "Lista de parágrafos do Catecismo da Igreja Católica encontrados.",
            entry,
        )
    }
}
