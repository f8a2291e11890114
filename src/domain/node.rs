//! Folder and request nodes of a collection tree.
//!
//! A collection is a rooted, ordered tree. Inner nodes are [`Folder`]s, leaves
//! are [`RequestItem`]s. Fields this crate has no use for are kept verbatim in
//! each type's `extra` map so nothing is lost on the way through the
//! filesystem.
//!
//! A key that is present with a `null` value is kept apart from a missing
//! key: optional values are `Some(Value::Null)` and optional typed fields
//! `Some(None)` when the document says `null`.

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::nullable::{deserialize_nullable, deserialize_value};

/// A node in the collection tree.
///
/// The JSON representation has no explicit tag; a node is a request when it
/// carries a `request` object and a folder when it carries an `item` array.
/// Documents that carry both are rejected by validation before they reach this
/// type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// A single request with its scripts, examples and variables.
    Request(RequestItem),
    /// A folder holding an ordered list of child nodes.
    Folder(Folder),
}

impl Node {
    /// The display name of the node.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Request(request) => request.name.as_str(),
            Self::Folder(folder) => folder.name.as_str(),
        }
    }

    /// Returns the folder if this node is one.
    #[must_use]
    pub const fn as_folder(&self) -> Option<&Folder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::Request(_) => None,
        }
    }

    /// Returns the request if this node is one.
    #[must_use]
    pub const fn as_request(&self) -> Option<&RequestItem> {
        match self {
            Self::Request(request) => Some(request),
            Self::Folder(_) => None,
        }
    }
}

impl From<Folder> for Node {
    fn from(folder: Folder) -> Self {
        Self::Folder(folder)
    }
}

impl From<RequestItem> for Node {
    fn from(request: RequestItem) -> Self {
        Self::Request(request)
    }
}

/// A folder of requests and nested folders.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    /// Optional stable identifier.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Option<String>>,

    /// The folder name.
    pub name: NonEmptyString,

    /// Free-form description (a string or a `{content, type}` object).
    #[serde(
        default,
        deserialize_with = "deserialize_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Value>,

    /// Child nodes in document order. Always present, possibly empty.
    pub item: Vec<Node>,

    /// Folder level lifecycle scripts.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub event: Option<Option<Vec<Event>>>,

    /// Folder level auth descriptor.
    #[serde(
        default,
        deserialize_with = "deserialize_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub auth: Option<Value>,

    /// Folder level variables.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub variable: Option<Option<Vec<Variable>>>,

    /// Protocol specific settings.
    #[serde(
        rename = "protocolProfileBehavior",
        default,
        deserialize_with = "deserialize_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub protocol_profile_behavior: Option<Value>,

    /// Any other fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Folder {
    /// Creates an empty folder.
    #[must_use]
    pub fn new(name: NonEmptyString) -> Self {
        Self {
            id: None,
            name,
            description: None,
            item: Vec::new(),
            event: None,
            auth: None,
            variable: None,
            protocol_profile_behavior: None,
            extra: Map::new(),
        }
    }

    /// Appends a child node, returning `self` for chaining.
    #[must_use]
    pub fn with_child(mut self, node: impl Into<Node>) -> Self {
        self.item.push(node.into());
        self
    }
}

/// A request together with its per-request attachments.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestItem {
    /// Optional stable identifier.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Option<String>>,

    /// The request name.
    pub name: NonEmptyString,

    /// The HTTP request definition.
    pub request: RequestSpec,

    /// Example responses.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub response: Option<Option<Vec<Response>>>,

    /// Pre-request and test scripts.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub event: Option<Option<Vec<Event>>>,

    /// Request level variables.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub variable: Option<Option<Vec<Variable>>>,

    /// Any other fields (description, auth, `protocolProfileBehavior`, ...),
    /// preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RequestItem {
    /// Creates a request item with no attachments.
    #[must_use]
    pub fn new(name: NonEmptyString, method: impl Into<String>, url: impl Into<Url>) -> Self {
        Self {
            id: None,
            name,
            request: RequestSpec::new(method, url),
            response: None,
            event: None,
            variable: None,
            extra: Map::new(),
        }
    }
}

/// The HTTP request definition of a [`RequestItem`].
#[allow(clippy::option_option)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method, e.g. `GET`.
    pub method: String,

    /// Target URL.
    pub url: Url,

    /// Request headers.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub header: Option<Option<Vec<Value>>>,

    /// Request body definition.
    #[serde(
        default,
        deserialize_with = "deserialize_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub body: Option<Value>,

    /// Request level auth descriptor.
    #[serde(
        default,
        deserialize_with = "deserialize_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub auth: Option<Value>,

    /// Free-form description.
    #[serde(
        default,
        deserialize_with = "deserialize_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Value>,

    /// Any other fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RequestSpec {
    /// Creates a request with only a method and a URL.
    #[must_use]
    pub fn new(method: impl Into<String>, url: impl Into<Url>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            header: None,
            body: None,
            auth: None,
            description: None,
            extra: Map::new(),
        }
    }
}

/// A request URL, either a raw string or a structured object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Url {
    /// A plain URL string.
    Raw(String),
    /// A structured URL (`raw`, `host`, `path`, `query`, ...).
    Structured(Map<String, Value>),
}

impl Url {
    /// The raw URL text, if one is available.
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Raw(raw) => Some(raw),
            Self::Structured(parts) => parts.get("raw").and_then(Value::as_str),
        }
    }
}

impl From<&str> for Url {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for Url {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

/// A lifecycle script hook (`prerequest`, `test`, ...).
#[allow(clippy::option_option)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Optional stable identifier.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Option<String>>,

    /// The lifecycle hook this script listens on.
    pub listen: String,

    /// The script itself.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub script: Option<Option<Script>>,

    /// Any other fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Script source attached to an [`Event`].
#[allow(clippy::option_option)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Optional stable identifier.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Option<String>>,

    /// Script MIME type, usually `text/javascript`.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<Option<String>>,

    /// Script source lines.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub exec: Option<Option<Exec>>,

    /// Reference to an external script.
    #[serde(
        default,
        deserialize_with = "deserialize_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub src: Option<Value>,

    /// Script name.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<Option<String>>,

    /// Any other fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Script source, stored either as a list of lines or as one string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Exec {
    /// One entry per source line.
    Lines(Vec<String>),
    /// The whole script as a single string.
    Source(String),
}

/// A variable declared on the collection, a folder or a request.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Optional stable identifier.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Option<String>>,

    /// Variable name.
    pub key: String,

    /// Variable value (string, number, boolean or object).
    #[serde(
        default,
        deserialize_with = "deserialize_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,

    /// Declared value type.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<Option<String>>,

    /// Whether the variable is disabled.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub disabled: Option<Option<bool>>,

    /// Any other fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An example response saved alongside a request.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Optional stable identifier.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Option<String>>,

    /// Example name.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<Option<String>>,

    /// The request that produced this response.
    #[serde(
        rename = "originalRequest",
        default,
        deserialize_with = "deserialize_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_request: Option<Value>,

    /// HTTP status text.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<Option<String>>,

    /// HTTP status code.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub code: Option<Option<u16>>,

    /// Response headers.
    #[serde(
        default,
        deserialize_with = "deserialize_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub header: Option<Value>,

    /// Response body text.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub body: Option<Option<String>>,

    /// Any other fields (cookies, preview language, ...), preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
