//! The collection document and its environment files.

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{
    node::{Event, Node, Variable},
    nullable::{deserialize_nullable, deserialize_value},
};

/// A complete collection document: info block, ordered item tree and
/// collection-wide extras.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Collection metadata.
    pub info: Info,

    /// Top-level nodes in document order.
    pub item: Vec<Node>,

    /// Collection level lifecycle scripts.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub event: Option<Option<Vec<Event>>>,

    /// Collection level variables.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub variable: Option<Option<Vec<Variable>>>,

    /// Collection level auth descriptor.
    #[serde(
        default,
        deserialize_with = "deserialize_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub auth: Option<Value>,

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

impl Collection {
    /// Creates an empty collection with the given name.
    #[must_use]
    pub fn new(name: NonEmptyString) -> Self {
        Self {
            info: Info::new(name),
            item: Vec::new(),
            event: None,
            variable: None,
            auth: None,
            protocol_profile_behavior: None,
            extra: Map::new(),
        }
    }

    /// Appends a top-level node, returning `self` for chaining.
    #[must_use]
    pub fn with_item(mut self, node: impl Into<Node>) -> Self {
        self.item.push(node.into());
        self
    }

    /// The collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.info.name.as_str()
    }

    /// Counts the folders and requests in the whole tree.
    #[must_use]
    pub fn count_nodes(&self) -> NodeCount {
        let mut count = NodeCount::default();
        count.add_all(&self.item);
        count
    }
}

/// Number of folders and requests in a tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NodeCount {
    /// Folders at any depth.
    pub folders: usize,
    /// Requests at any depth.
    pub requests: usize,
}

impl NodeCount {
    fn add_all(&mut self, nodes: &[Node]) {
        for node in nodes {
            match node {
                Node::Folder(folder) => {
                    self.folders += 1;
                    self.add_all(&folder.item);
                }
                Node::Request(_) => self.requests += 1,
            }
        }
    }
}

/// The `info` block of a collection.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// Identifier assigned by Postman.
    #[serde(
        rename = "_postman_id",
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub postman_id: Option<Option<String>>,

    /// The collection name. Never empty.
    pub name: NonEmptyString,

    /// Free-form description.
    #[serde(
        default,
        deserialize_with = "deserialize_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Value>,

    /// The schema URL the document conforms to.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub schema: Option<Option<String>>,

    /// Any other fields (`_exporter_id`, ...), preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Info {
    /// Creates an info block with only a name.
    #[must_use]
    pub fn new(name: NonEmptyString) -> Self {
        Self {
            postman_id: None,
            name,
            description: None,
            schema: None,
            extra: Map::new(),
        }
    }

    /// The description as plain text, whichever form it was stored in.
    #[must_use]
    pub fn description_text(&self) -> Option<&str> {
        match self.description.as_ref()? {
            Value::String(text) => Some(text),
            Value::Object(rich) => rich.get("content").and_then(Value::as_str),
            _ => None,
        }
    }
}

/// An environment file: a named set of variable values.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Optional stable identifier.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Option<String>>,

    /// Environment name.
    pub name: String,

    /// Variable values.
    #[serde(default)]
    pub values: Vec<EnvironmentValue>,

    /// Any other fields (`_postman_variable_scope`, ...), preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single variable value in an [`Environment`].
#[allow(clippy::option_option)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentValue {
    /// Variable name.
    pub key: String,

    /// Variable value.
    #[serde(
        default,
        deserialize_with = "deserialize_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,

    /// Whether the value is active.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub enabled: Option<Option<bool>>,

    /// Any other fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
