//! Structural validation of raw collection documents.
//!
//! Both conversion directions are gated on a document that has the expected
//! tree shape. Validation runs on untyped JSON so that the error names the
//! exact node that is wrong, then hands a typed [`Collection`] back.

use serde_json::Value;
use tracing::instrument;

use crate::domain::Collection;

/// Validates a raw document and converts it into a [`Collection`].
///
/// # Errors
///
/// Returns a [`SchemaError`] if:
/// - the document is `null`
/// - `info` or `info.name` is missing
/// - `item` is not an array
/// - any node fails [`validate_node`]
/// - the document has the right shape but a field has the wrong type
#[instrument(level = "debug", skip(raw))]
pub fn validate_document(raw: &Value) -> Result<Collection, SchemaError> {
    if raw.is_null() {
        return Err(SchemaError::MissingDocument);
    }

    let info = raw.get("info").filter(|info| is_present(info));
    let Some(info) = info else {
        return Err(SchemaError::MissingInfo);
    };
    if !info.get("name").is_some_and(is_present) {
        return Err(SchemaError::MissingInfoName);
    }

    let Some(items) = raw.get("item").and_then(Value::as_array) else {
        return Err(SchemaError::ItemsNotArray);
    };
    for (index, node) in items.iter().enumerate() {
        validate_node(node, &format!("item[{index}]"))?;
    }

    serde_json::from_value(raw.clone()).map_err(|e| SchemaError::Malformed(e.to_string()))
}

/// Validates an already typed collection.
///
/// The typed model cannot express every structural rule (an empty method, an
/// empty URL), so the collection is checked in its serialized form.
///
/// # Errors
///
/// Returns a [`SchemaError`] under the same conditions as
/// [`validate_document`].
pub fn validate_collection(collection: &Collection) -> Result<(), SchemaError> {
    let raw = serde_json::to_value(collection).map_err(|e| SchemaError::Malformed(e.to_string()))?;
    validate_document(&raw).map(drop)
}

/// Validates a single node and, for folders, everything beneath it.
///
/// A node with a `request` field is a request, a node with an `item` field is a
/// folder. A node with neither, or with both, is rejected.
///
/// `location` names the node in error messages, e.g. `item[2].item[0]`.
///
/// # Errors
///
/// Returns a [`SchemaError`] describing the first problem found.
pub fn validate_node(node: &Value, location: &str) -> Result<(), SchemaError> {
    let Some(fields) = node.as_object() else {
        return Err(SchemaError::NodeNotObject(location.to_string()));
    };

    if !fields.get("name").is_some_and(is_present) {
        return Err(SchemaError::MissingName(location.to_string()));
    }

    match (fields.contains_key("request"), fields.contains_key("item")) {
        (true, true) => Err(SchemaError::AmbiguousNode(location.to_string())),
        (true, false) => validate_request(node, location),
        (false, true) => validate_folder(node, location),
        (false, false) => Err(SchemaError::UnknownNodeKind(location.to_string())),
    }
}

/// Validates a request node: the `request` object must carry a method and a
/// URL.
///
/// # Errors
///
/// Returns a [`SchemaError`] if `request`, `request.method` or `request.url`
/// is missing.
pub fn validate_request(node: &Value, location: &str) -> Result<(), SchemaError> {
    let Some(request) = node.get("request").filter(|request| is_present(request)) else {
        return Err(SchemaError::MissingRequest(location.to_string()));
    };

    if !request.get("method").is_some_and(is_present) {
        return Err(SchemaError::MissingMethod(location.to_string()));
    }
    if !request.get("url").is_some_and(is_present) {
        return Err(SchemaError::MissingUrl(location.to_string()));
    }

    Ok(())
}

/// Validates a folder node and recurses into its children.
///
/// # Errors
///
/// Returns a [`SchemaError`] if `item` is not an array or any child is
/// invalid.
pub fn validate_folder(node: &Value, location: &str) -> Result<(), SchemaError> {
    let Some(items) = node.get("item").and_then(Value::as_array) else {
        return Err(SchemaError::FolderItemsNotArray(location.to_string()));
    };

    for (index, child) in items.iter().enumerate() {
        validate_node(child, &format!("{location}.item[{index}]"))?;
    }

    Ok(())
}

/// A value counts as present unless it is `null`, `false`, zero or an empty
/// string.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::Bool(true) | Value::Array(_) | Value::Object(_) => true,
    }
}

/// A document does not have the shape of a collection.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    /// The document is absent.
    #[error("collection is null or undefined")]
    MissingDocument,

    /// The document has no `info` block.
    #[error("collection missing required \"info\" field")]
    MissingInfo,

    /// The `info` block has no name.
    #[error("collection info missing required \"name\" field")]
    MissingInfoName,

    /// The top-level `item` field is not an array.
    #[error("collection \"item\" field must be an array")]
    ItemsNotArray,

    /// A node is not a JSON object.
    #[error("{0}: item must be an object")]
    NodeNotObject(String),

    /// A node has no name.
    #[error("{0}: item missing required \"name\" field")]
    MissingName(String),

    /// A node has neither a `request` nor an `item` field.
    #[error("{0}: item must be either a request or a folder")]
    UnknownNodeKind(String),

    /// A node has both a `request` and an `item` field.
    #[error("{0}: item has both \"request\" and \"item\" fields")]
    AmbiguousNode(String),

    /// A request node has an empty `request` field.
    #[error("{0}: request item missing required \"request\" field")]
    MissingRequest(String),

    /// A request has no method.
    #[error("{0}: request missing required \"method\" field")]
    MissingMethod(String),

    /// A request has no URL.
    #[error("{0}: request missing required \"url\" field")]
    MissingUrl(String),

    /// A folder's `item` field is not an array.
    #[error("{0}: folder \"item\" field must be an array")]
    FolderItemsNotArray(String),

    /// The document has the right shape but a field has the wrong type.
    #[error("malformed collection: {0}")]
    Malformed(String),
}
