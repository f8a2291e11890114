//! Domain models for collection conversion.
//!
//! This module contains the in-memory collection tree, the ordinal type that
//! encodes sibling order on disk, structural validation and configuration.

/// The collection document and environment files.
pub mod collection;
pub use collection::{Collection, Environment, EnvironmentValue, Info, NodeCount};

/// Folder and request nodes.
pub mod node;
pub use node::{Event, Exec, Folder, Node, RequestItem, RequestSpec, Response, Script, Url, Variable};

/// Sibling ordinals and their on-disk encoding.
pub mod ordinal;
pub use ordinal::{decode_ordinal, encode_ordinal, Ordinal, ParseOrdinalError};

/// Structural validation of raw documents.
pub mod validation;
pub use validation::{validate_collection, validate_document, SchemaError};

pub(crate) mod nullable;

mod config;
pub use config::{Config, CONFIG_FILE_NAME};
