//! Postman collections as plain files
//!
//! A collection is a single JSON document holding a tree of folders and
//! requests. This crate converts it to and from a directory tree with one
//! file per request and one directory per folder, named so that a sorted
//! listing reproduces the original order.

pub mod domain;
pub use domain::{
    validate_document, Collection, Config, Environment, Folder, Node, Ordinal, RequestItem,
    SchemaError,
};

/// Documentation files written next to an imported tree.
pub mod docs;

/// The directory-tree representation and its conversions.
pub mod storage;
pub use storage::{export, import, validate_filesystem_layout, Export, ExportError, ImportError};
