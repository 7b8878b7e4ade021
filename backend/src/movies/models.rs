//! Movie data models
//!
//! Defines the projection returned by the listing endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields projected out of a stored movie document
///
/// Documents are schemaless; any projected field missing from a document is
/// omitted from the serialized projection rather than emitted as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Movie title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Release year (numeric in most documents, occasionally a string)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Value>,
    /// Short plot summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    /// Genre, either a single string or a list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<Value>,
    /// Poster image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

impl Movie {
    /// Project a stored document onto the listed fields
    ///
    /// Fields of an unexpected type are dropped instead of failing the whole
    /// document.
    pub fn from_document(document: &Value) -> Self {
        let text = |field: &str| {
            document
                .get(field)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        let any = |field: &str| document.get(field).filter(|v| !v.is_null()).cloned();

        Self {
            title: text("title"),
            year: any("year"),
            plot: text("plot"),
            genre: any("genre"),
            poster: text("poster"),
        }
    }
}
