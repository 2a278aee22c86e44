//! Conversion between dataset JSON and the in-memory catalog.
//!
//! Import accepts either a top-level array of records or an object whose
//! values are records; export always writes a pretty-printed array that the
//! import path reads back to the same items.

use crate::catalog::{Catalog, Item, normalize_record};
use crate::error::EngineError;
use serde_json::Value;
use tracing::{debug, warn};

/// File name the export artifact is offered under.
pub const EXPORT_FILE_NAME: &str = "filtered_items.json";

/// MIME type of the export artifact.
pub const EXPORT_MIME_TYPE: &str = "application/json";

/// Parse dataset text and build a catalog from it.
pub fn build_catalog(raw: &str) -> Result<Catalog, EngineError> {
    let value: Value = serde_json::from_str(raw)?;
    build_catalog_from_value(value)
}

/// Build a catalog from an already-parsed JSON document.
///
/// Records that cannot be addressed by name are skipped and counted; only a
/// document that is neither an array nor an object is an error.
pub fn build_catalog_from_value(value: Value) -> Result<Catalog, EngineError> {
    let records: Vec<Value> = match value {
        Value::Array(records) => records,
        Value::Object(map) => map.into_iter().map(|(_, record)| record).collect(),
        other => {
            return Err(EngineError::MalformedInput(format!(
                "expected an array or object of item records, got {}",
                json_kind(&other)
            )));
        }
    };

    let mut items = Vec::with_capacity(records.len());
    let mut skipped = 0;
    for (idx, record) in records.into_iter().enumerate() {
        match normalize_record(record) {
            Ok(item) => items.push(item),
            Err(reason) => {
                warn!(record = idx, "skipping dataset record: {}", reason.describe());
                skipped += 1;
            }
        }
    }

    debug!(items = items.len(), skipped, "built catalog");
    Ok(Catalog::from_items(items).with_skipped(skipped))
}

/// Serialize items as a pretty-printed JSON array (two-space indent).
pub fn export_items<'a, I>(items: I) -> Result<String, EngineError>
where
    I: IntoIterator<Item = &'a Item>,
{
    let items: Vec<&Item> = items.into_iter().collect();
    Ok(serde_json::to_string_pretty(&items)?)
}

/// Downloadable export: contents plus the name and type a UI offers it as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub contents: String,
}

pub fn export_artifact<'a, I>(items: I) -> Result<ExportArtifact, EngineError>
where
    I: IntoIterator<Item = &'a Item>,
{
    Ok(ExportArtifact {
        file_name: EXPORT_FILE_NAME,
        mime_type: EXPORT_MIME_TYPE,
        contents: export_items(items)?,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
