//! Reads a directory tree back into a collection.
//!
//! The walk mirrors the importer: every directory is listed once, sorted by
//! file name, and its children are ordered by the ordinal at the front of
//! their names. Entries without an ordinal sort first; ties keep listing order.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use non_empty_string::NonEmptyString;
use serde_json::Value;
use tracing::instrument;
use walkdir::WalkDir;

use crate::{
    domain::{
        validation::validate_collection, Collection, Config, Environment, Event, Folder, Node,
        RequestItem, Response, SchemaError, Variable,
    },
    storage::{
        file_role::{FileRole, SidecarKind},
        json::{read_json, read_optional_json, FileError},
        layout::{
            validate_filesystem_layout, LayoutError, COLLECTION_FILE, ENVIRONMENTS_DIR,
            METADATA_FILE, REQUESTS_DIR, VARIABLES_FILE,
        },
        naming::{
            base_name_from_file_name, base_name_from_folder_name, ordinal_from_name, JSON_EXTENSION,
            UNTITLED,
        },
        records::{CollectionRecord, FolderRecord},
    },
};

/// Reads the directory tree at `root` back into a collection.
///
/// # Errors
///
/// Returns an error if:
/// - `root` is not a valid layout
/// - `collection.json`, a primary request file or a folder's `metadata.json`
///   cannot be read
/// - the reassembled collection does not pass validation
///
/// Unreadable variables, environment and sidecar files are logged and treated
/// as absent.
#[instrument(skip(config), fields(root = %root.display()))]
pub fn export(root: &Path, config: &Config) -> Result<Export, ExportError> {
    Exporter::new(root.to_path_buf(), config).export()
}

/// The result of an export.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    /// The reassembled collection.
    pub collection: Collection,
    /// The environments found under `environments/`, in file name order.
    pub environments: Vec<Environment>,
}

/// Reads collections from the filesystem.
#[derive(Debug)]
pub struct Exporter<'a> {
    root: PathBuf,
    config: &'a Config,
}

/// One entry of a directory listing.
struct Entry {
    path: PathBuf,
    name: String,
    is_dir: bool,
}

impl<'a> Exporter<'a> {
    /// Creates an exporter reading from `root`.
    #[must_use]
    pub const fn new(root: PathBuf, config: &'a Config) -> Self {
        Self { root, config }
    }

    /// Reads the collection and its environments.
    ///
    /// # Errors
    ///
    /// See [`export`].
    pub fn export(&self) -> Result<Export, ExportError> {
        validate_filesystem_layout(&self.root)?;

        let record: CollectionRecord = read_json(&self.root.join(COLLECTION_FILE))?;
        let variables: Option<Vec<Variable>> =
            read_optional_json(&self.root.join(VARIABLES_FILE));
        let item = self.read_nodes(&self.root.join(REQUESTS_DIR))?;

        let collection = record.into_collection(item, variables);
        validate_collection(&collection)?;

        let environments = self.read_environments()?;

        let count = collection.count_nodes();
        tracing::info!(
            "Exported '{}': {} folders, {} requests, {} environments",
            collection.name(),
            count.folders,
            count.requests,
            environments.len()
        );

        Ok(Export {
            collection,
            environments,
        })
    }

    fn read_nodes(&self, dir: &Path) -> Result<Vec<Node>, ExportError> {
        let entries = list(dir)?;

        let primary_stems: HashSet<&str> = entries
            .iter()
            .filter(|entry| !entry.is_dir)
            .filter_map(|entry| match FileRole::parse(&entry.name) {
                FileRole::Primary { stem } => Some(stem),
                _ => None,
            })
            .collect();

        let mut nodes = Vec::new();
        for entry in &entries {
            if entry.is_dir {
                if entry.name.starts_with('.') {
                    tracing::debug!("Skipping hidden directory {}", entry.path.display());
                    continue;
                }
                let folder = self.read_folder(&entry.path, &entry.name)?;
                nodes.push((ordinal_from_name(&entry.name), Node::Folder(folder)));
                continue;
            }

            match FileRole::parse(&entry.name) {
                FileRole::Primary { stem } => {
                    let request = self.read_request(&entry.path, &entry.name, stem)?;
                    nodes.push((ordinal_from_name(&entry.name), Node::Request(request)));
                }
                FileRole::Sidecar { primary_stem, .. } if !primary_stems.contains(primary_stem) => {
                    tracing::warn!("Ignoring orphan sidecar {}", entry.path.display());
                }
                FileRole::Sidecar { .. } | FileRole::FolderMetadata | FileRole::Ignored => {}
            }
        }

        nodes.sort_by_key(|(ordinal, _)| *ordinal);
        Ok(nodes.into_iter().map(|(_, node)| node).collect())
    }

    fn read_folder(&self, dir: &Path, dir_name: &str) -> Result<Folder, ExportError> {
        let metadata = dir.join(METADATA_FILE);
        let record: FolderRecord = read_json(&metadata).map_err(|e| {
            if e.is_not_found() {
                ExportError::NotFound(metadata.clone())
            } else {
                e.into()
            }
        })?;

        let item = self.read_nodes(dir)?;

        let base_name = base_name_from_folder_name(dir_name);
        let fallback = if base_name.is_empty() {
            dir_name.to_string()
        } else {
            base_name
        };
        Ok(record.into_folder(non_empty(fallback), item))
    }

    fn read_request(
        &self,
        path: &Path,
        file_name: &str,
        stem: &str,
    ) -> Result<RequestItem, ExportError> {
        let mut raw: Value = read_json(path)?;
        if let Some(fields) = raw.as_object_mut() {
            let named = fields
                .get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| !name.is_empty());
            if !named {
                let name = non_empty(base_name_from_file_name(file_name));
                tracing::debug!("Recovered name '{}' for {}", name.as_str(), path.display());
                fields.insert("name".to_string(), Value::String(name.as_str().to_string()));
            }
        }
        let mut request: RequestItem =
            serde_json::from_value(raw).map_err(|source| FileError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let sidecar = |kind: SidecarKind| path.with_file_name(kind.file_name(stem));

        let event = read_optional_json::<Vec<Event>>(&sidecar(SidecarKind::Script)).or_else(|| {
            self.config
                .legacy_event_sidecars
                .then(|| read_optional_json(&sidecar(SidecarKind::LegacyEvent)))
                .flatten()
        });
        if let Some(event) = event {
            request.event = Some(Some(event));
        }
        if let Some(response) =
            read_optional_json::<Vec<Response>>(&sidecar(SidecarKind::ResponseExample))
        {
            request.response = Some(Some(response));
        }
        if let Some(variable) = read_optional_json::<Vec<Variable>>(&sidecar(SidecarKind::Variables))
        {
            request.variable = Some(Some(variable));
        }

        Ok(request)
    }

    fn read_environments(&self) -> Result<Vec<Environment>, ExportError> {
        let dir = self.root.join(ENVIRONMENTS_DIR);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let environments = list(&dir)?
            .into_iter()
            .filter(|entry| {
                !entry.is_dir && !entry.name.starts_with('.') && entry.name.ends_with(JSON_EXTENSION)
            })
            .filter_map(|entry| match read_json::<Environment>(&entry.path) {
                Ok(environment) => Some(environment),
                Err(e) => {
                    tracing::warn!("Skipping environment file: {e}");
                    None
                }
            })
            .collect();
        Ok(environments)
    }
}

/// Lists the immediate children of `dir`, sorted by file name.
fn list(dir: &Path) -> Result<Vec<Entry>, FileError> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| FileError::io(dir, e.into()))?;
        let Some(name) = entry.file_name().to_str() else {
            tracing::warn!("Skipping non UTF-8 file name {}", entry.path().display());
            continue;
        };
        entries.push(Entry {
            name: name.to_string(),
            is_dir: entry.file_type().is_dir(),
            path: entry.into_path(),
        });
    }
    Ok(entries)
}

fn non_empty(name: String) -> NonEmptyString {
    NonEmptyString::new(name).unwrap_or_else(|_| {
        NonEmptyString::new(UNTITLED.to_string()).expect("placeholder name is not empty")
    })
}

/// Reading a collection from the filesystem failed.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The root is not a collection layout.
    #[error("Export failed: {0}")]
    Layout(#[from] LayoutError),

    /// A required file is missing.
    #[error("Export failed: missing required file {}", .0.display())]
    NotFound(PathBuf),

    /// A required file could not be read or parsed.
    #[error("Export failed: {0}")]
    File(#[from] FileError),

    /// The reassembled collection is not a valid tree.
    #[error("Export failed: {0}")]
    Schema(#[from] SchemaError),
}
