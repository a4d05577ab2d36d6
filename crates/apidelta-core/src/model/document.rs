//! Raw service description document
//!
//! The document is decoded once with serde and then handed to
//! [`ShapeGraph::build`](crate::model::ShapeGraph::build). Shape definitions
//! stay as raw JSON objects because their full serialized text is the shape's
//! identity, and member references may merge extra traits into them.

use crate::errors::{DeltaError, Result};
use crate::model::metadata::ServiceMetadata;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One version of a service's API surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SchemaDescription {
    #[serde(default)]
    pub metadata: ServiceMetadata,
    #[serde(default)]
    pub shapes: BTreeMap<String, Map<String, Value>>,
    #[serde(default)]
    pub operations: BTreeMap<String, OperationDefinition>,
}

/// An operation entry as it appears in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OperationDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<ShapeReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<ShapeReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// Everything else (http binding, errors, ...) passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A `{"shape": name, ...traits}` reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeReference {
    pub shape: String,
    #[serde(flatten)]
    pub traits: Map<String, Value>,
}

impl SchemaDescription {
    /// Decode a description from an already-parsed JSON value
    ///
    /// # Errors
    ///
    /// - `InvalidDocument` if the root is not an object
    /// - `Serialization` if a section has the wrong layout
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(DeltaError::InvalidDocument {
                reason: "service description root must be a JSON object".to_string(),
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Decode a description from raw bytes
    ///
    /// # Errors
    ///
    /// Same as [`SchemaDescription::from_value`], plus `Serialization` for
    /// bytes that are not JSON.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Operation names in lexicographic order
    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }
}
