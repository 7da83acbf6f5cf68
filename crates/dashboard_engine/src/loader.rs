//! One-shot collection fetches exported as JSON files.
//!
//! A file holds either an array of documents or an object keyed by document
//! id (the shape of a collection export). For the keyed form the key becomes
//! the record's `id` unless the document carries a non-empty one.

use std::fs;
use std::path::Path;

use models::{OrderRecord, ProjectRecord};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{EngineError, Result};

/// Reads a collection file into a list of JSON documents.
pub fn read_documents(path: &Path) -> Result<Vec<Value>> {
    let raw = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw)?;
    documents_from_value(value, &path.display().to_string())
}

/// Normalises an array or id-keyed object into a list of documents.
/// `source` only appears in error messages.
pub fn documents_from_value(value: Value, source: &str) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if !item.is_object() {
                    return Err(EngineError::shape(
                        source,
                        format!("document [{}] is not an object", i),
                    ));
                }
            }
            Ok(items)
        }
        Value::Object(map) => map
            .into_iter()
            .map(|(key, doc)| match doc {
                Value::Object(mut fields) => {
                    let has_id = fields
                        .get("id")
                        .and_then(Value::as_str)
                        .is_some_and(|id| !id.is_empty());
                    if !has_id {
                        fields.insert("id".to_string(), Value::String(key));
                    }
                    Ok(Value::Object(fields))
                }
                _ => Err(EngineError::shape(
                    source,
                    format!("document '{}' is not an object", key),
                )),
            })
            .collect(),
        other => Err(EngineError::shape(
            source,
            format!("expected an array or an object of documents, found {}", kind(&other)),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn records<T: DeserializeOwned>(docs: Vec<Value>) -> Result<Vec<T>> {
    docs.into_iter()
        .map(|doc| serde_json::from_value(doc).map_err(EngineError::from))
        .collect()
}

pub fn load_orders(path: &Path) -> Result<Vec<OrderRecord>> {
    let orders: Vec<OrderRecord> = records(read_documents(path)?)?;
    tracing::info!(path = %path.display(), count = orders.len(), "loaded orders");
    Ok(orders)
}

pub fn load_projects(path: &Path) -> Result<Vec<ProjectRecord>> {
    let projects: Vec<ProjectRecord> = records(read_documents(path)?)?;
    tracing::info!(path = %path.display(), count = projects.len(), "loaded projects");
    Ok(projects)
}

/// Number of documents in a collection file (products and users are only counted).
pub fn load_collection_size(path: &Path) -> Result<usize> {
    Ok(read_documents(path)?.len())
}
