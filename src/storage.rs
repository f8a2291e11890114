//! The directory-tree representation of a collection.
//!
//! [`import`] writes a collection out as one file per request and one
//! directory per folder, [`export`] reads such a tree back. The naming
//! functions encode each node's position among its siblings so that the
//! round trip preserves order.

/// Per-directory allocation of child names.
pub mod allocation;
pub use allocation::NameTable;

/// Reading a directory tree back into a collection.
pub mod exporter;
pub use exporter::{export, Export, ExportError, Exporter};

/// Classification of directory entries.
pub mod file_role;
pub use file_role::{FileRole, SidecarKind};

/// Writing a collection out as a directory tree.
pub mod importer;
pub use importer::{import, ImportError, ImportSummary, Importer};

/// Whole-file JSON reads and writes.
pub mod json;
pub use json::{read_json, to_pretty_json, write_json, FileError};

/// Fixed names of the layout.
pub mod layout;
pub use layout::{validate_filesystem_layout, LayoutError};

/// On-disk names for folders and requests.
pub mod naming;
pub use naming::{
    base_name_from_file_name, base_name_from_folder_name, build_folder_dir_name,
    build_request_file_name, ordinal_from_name, sanitize,
};

mod records;
