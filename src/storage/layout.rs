//! Fixed names of the directory layout and its shallow pre-check.
//!
//! ```text
//! <root>/collection.json
//! <root>/variables.json                 (optional)
//! <root>/environments/*.json            (optional)
//! <root>/requests/001-GET-Name.json
//! <root>/requests/001-GET-Name.script.json            (optional)
//! <root>/requests/001-GET-Name.response-example.json  (optional)
//! <root>/requests/001-GET-Name.variables.json         (optional)
//! <root>/requests/002-Folder/metadata.json
//! <root>/requests/002-Folder/...
//! ```

use std::path::{Path, PathBuf};

/// Collection metadata (info, scripts, auth) without the item tree.
pub const COLLECTION_FILE: &str = "collection.json";

/// Collection level variables.
pub const VARIABLES_FILE: &str = "variables.json";

/// Directory of environment files.
pub const ENVIRONMENTS_DIR: &str = "environments";

/// Directory holding the item tree.
pub const REQUESTS_DIR: &str = "requests";

/// Folder metadata, one per folder directory.
pub const METADATA_FILE: &str = "metadata.json";

/// Checks that `root` has the entries every layout needs.
///
/// Only `collection.json` and `requests/` are checked. Problems deeper in the
/// tree surface while exporting.
///
/// # Errors
///
/// Returns a [`LayoutError`] naming the first missing entry.
pub fn validate_filesystem_layout(root: &Path) -> Result<(), LayoutError> {
    if !root.is_dir() {
        return Err(LayoutError::MissingRoot(root.to_path_buf()));
    }

    let collection = root.join(COLLECTION_FILE);
    if !collection.is_file() {
        return Err(LayoutError::MissingCollectionFile(collection));
    }

    let requests = root.join(REQUESTS_DIR);
    if !requests.is_dir() {
        return Err(LayoutError::MissingRequestsDir(requests));
    }

    Ok(())
}

/// A directory does not have the shape of a collection layout.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The root directory does not exist.
    #[error("invalid file system structure: {} is not a directory", .0.display())]
    MissingRoot(PathBuf),

    /// `collection.json` is missing.
    #[error("invalid file system structure: missing {}", .0.display())]
    MissingCollectionFile(PathBuf),

    /// `requests/` is missing.
    #[error("invalid file system structure: missing requests directory {}", .0.display())]
    MissingRequestsDir(PathBuf),
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn accepts_minimal_layout() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(COLLECTION_FILE), "{}").unwrap();
        fs::create_dir(tmp.path().join(REQUESTS_DIR)).unwrap();

        assert_eq!(validate_filesystem_layout(tmp.path()), Ok(()));
    }

    #[test]
    fn rejects_missing_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("nope");

        assert_eq!(
            validate_filesystem_layout(&root),
            Err(LayoutError::MissingRoot(root))
        );
    }

    #[test]
    fn rejects_missing_collection_file() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(REQUESTS_DIR)).unwrap();

        assert_eq!(
            validate_filesystem_layout(tmp.path()),
            Err(LayoutError::MissingCollectionFile(
                tmp.path().join(COLLECTION_FILE)
            ))
        );
    }

    #[test]
    fn rejects_missing_requests_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(COLLECTION_FILE), "{}").unwrap();

        assert_eq!(
            validate_filesystem_layout(tmp.path()),
            Err(LayoutError::MissingRequestsDir(tmp.path().join(REQUESTS_DIR)))
        );
    }

    #[test]
    fn requests_must_be_a_directory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(COLLECTION_FILE), "{}").unwrap();
        fs::write(tmp.path().join(REQUESTS_DIR), "").unwrap();

        assert!(matches!(
            validate_filesystem_layout(tmp.path()),
            Err(LayoutError::MissingRequestsDir(_))
        ));
    }
}
