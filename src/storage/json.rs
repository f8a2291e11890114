//! Whole-file JSON reads and writes.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

/// Serializes `value` the way every file of a tree is written: pretty
/// printed with `indent` spaces and ending with a newline.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn to_pretty_json<T>(value: &T, indent: usize) -> Result<Vec<u8>, serde_json::Error>
where
    T: Serialize + ?Sized,
{
    let indent = vec![b' '; indent];
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(&indent));
    value.serialize(&mut serializer)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Serializes `value` with [`to_pretty_json`] and writes it to `path` in one
/// write.
///
/// # Errors
///
/// Returns an error if serialization fails or the file cannot be written.
pub fn write_json<T>(path: &Path, value: &T, indent: usize) -> Result<(), FileError>
where
    T: Serialize + ?Sized,
{
    let buffer = to_pretty_json(value, indent).map_err(|source| FileError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, buffer).map_err(|source| FileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

/// Reads and deserializes the JSON file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not deserialize into
/// `T`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FileError> {
    let content = fs::read_to_string(path).map_err(|source| FileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| FileError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads an optional JSON file.
///
/// Any failure, a missing file included, is reported as `None`. Failures other
/// than a missing file are logged.
#[must_use]
pub fn read_optional_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    match read_json(path) {
        Ok(value) => Some(value),
        Err(e) if e.is_not_found() => None,
        Err(e) => {
            tracing::warn!("Ignoring unreadable optional file: {e}");
            None
        }
    }
}

/// A JSON file could not be read or written.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// The filesystem operation failed.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The content is not the expected JSON.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        /// The file involved.
        path: PathBuf,
        /// The underlying parse or serialization error.
        #[source]
        source: serde_json::Error,
    },
}

impl FileError {
    /// Wraps an I/O error on `path`.
    #[must_use]
    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether the error is a missing file.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }

    /// The file or directory the error happened on.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Json { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn writes_with_configured_indent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.json");

        write_json(&path, &json!({"a": 1}), 4).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{\n    \"a\": 1\n}\n");
    }

    #[test]
    fn pretty_output_follows_indent() {
        let value = json!({"a": [1]});

        assert_eq!(
            to_pretty_json(&value, 1).unwrap(),
            b"{\n \"a\": [\n  1\n ]\n}\n"
        );
        assert_eq!(
            to_pretty_json(&value, 4).unwrap(),
            b"{\n    \"a\": [\n        1\n    ]\n}\n"
        );
    }

    #[test]
    fn read_returns_written_value() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.json");
        let value = json!({"name": "T", "list": [1, 2, 3]});

        write_json(&path, &value, 2).unwrap();

        assert_eq!(read_json::<Value>(&path).unwrap(), value);
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let error = read_json::<Value>(&tmp.path().join("missing.json")).unwrap_err();

        assert!(error.is_not_found());
        assert_eq!(error.path(), tmp.path().join("missing.json"));
    }

    #[test]
    fn invalid_json_names_the_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();

        let error = read_json::<Value>(&path).unwrap_err();

        assert!(matches!(error, FileError::Json { .. }));
        assert!(error.to_string().contains("bad.json"));
    }

    #[test]
    fn optional_read_degrades_to_none() {
        let tmp = TempDir::new().unwrap();
        let bad = tmp.path().join("bad.json");
        fs::write(&bad, "[").unwrap();

        assert_eq!(read_optional_json::<Value>(&tmp.path().join("missing.json")), None);
        assert_eq!(read_optional_json::<Value>(&bad), None);
    }
}
