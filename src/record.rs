// src/record.rs

//! JSON Lines record format shared by the generator and the analyzer.
//!
//! Canonical shape (as emitted by the generator):
//!
//! ```json
//! {"types":["Post"],"operations":[{"operation":"create"}],"app":"bench",
//!  "current_user_id":"3","dependencies":{"write":["posts_id_7:1","users_id_3:2"],
//!  "read":["posts_id_1:1"]}}
//! ```
//!
//! Decoding is lenient about the older capture shapes: a top-level
//! `operation` / `type`, `types` nested in the first `operations` entry, and a
//! numeric `current_user_id`.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Result;
use crate::types::DepRef;

/// One entry of the `operations` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationEntry {
    pub operation: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

/// The `dependencies` object. Strings are kept raw here; parsing into
/// [`DepRef`]s happens at ingestion time so a bad string only rejects its own
/// record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependencies {
    #[serde(default)]
    pub write: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub read: Vec<String>,
}

/// A single operation record, one per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<OperationEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "user_id_from_any"
    )]
    pub current_user_id: Option<String>,

    #[serde(default)]
    pub dependencies: Dependencies,

    /// Legacy top-level operation name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,

    /// Legacy top-level type name.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl Record {
    /// Build a canonical `create` record.
    pub fn create(
        app: &str,
        current_user_id: impl ToString,
        type_name: &str,
        writes: &[DepRef],
        reads: &[DepRef],
    ) -> Self {
        Self {
            types: vec![type_name.to_string()],
            operations: vec![OperationEntry {
                operation: "create".to_string(),
                types: Vec::new(),
            }],
            app: Some(app.to_string()),
            current_user_id: Some(current_user_id.to_string()),
            dependencies: Dependencies {
                write: writes.iter().map(ToString::to_string).collect(),
                read: reads.iter().map(ToString::to_string).collect(),
            },
            operation: None,
            type_name: None,
            id: None,
        }
    }

    /// Decode one line of a captured stream.
    pub fn decode_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }

    /// Encode as a single line (no trailing newline).
    pub fn encode_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Operation name, preferring the legacy top-level field.
    pub fn operation_name(&self) -> Option<&str> {
        self.operation
            .as_deref()
            .or_else(|| self.operations.first().map(|o| o.operation.as_str()))
    }

    /// Most specific entity type of the record.
    pub fn entity_type(&self) -> Option<&str> {
        self.type_name
            .as_deref()
            .or_else(|| self.types.last().map(String::as_str))
            .or_else(|| {
                self.operations
                    .first()
                    .and_then(|o| o.types.last())
                    .map(String::as_str)
            })
    }
}

fn user_id_from_any<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "current_user_id must be a string or a number, got {other}"
        ))),
    }
}
