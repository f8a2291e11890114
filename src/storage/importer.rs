//! Writes a collection out as a directory tree.
//!
//! The [`Importer`] walks the item tree depth first, in document order, and
//! numbers the children of every directory from 1. Each request becomes one
//! primary file plus optional sidecars, each folder a directory holding a
//! `metadata.json`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::instrument;

use crate::{
    domain::{
        validation::validate_collection, Collection, Config, Folder, Node, Ordinal, RequestItem,
        SchemaError,
    },
    storage::{
        allocation::NameTable,
        file_role::SidecarKind,
        json::{write_json, FileError},
        layout::{COLLECTION_FILE, ENVIRONMENTS_DIR, METADATA_FILE, REQUESTS_DIR, VARIABLES_FILE},
        naming::{build_folder_dir_name, build_request_file_name, JSON_EXTENSION},
        records::{CollectionRecord, FolderRecord},
    },
};

/// Writes `collection` to a new directory tree at `root`.
///
/// `root` must not exist yet. On failure the partially written tree is left in
/// place; the caller should remove it before trying again.
///
/// # Errors
///
/// Returns an error if:
/// - `root` already exists
/// - the collection does not pass validation
/// - any directory or file cannot be written
#[instrument(skip(collection, config), fields(root = %root.display()))]
pub fn import(
    collection: &Collection,
    root: &Path,
    config: &Config,
) -> Result<ImportSummary, ImportError> {
    Importer::new(root.to_path_buf(), config).import(collection)
}

/// Writes collections to the filesystem.
#[derive(Debug)]
pub struct Importer<'a> {
    /// The root of the directory tree being written.
    root: PathBuf,
    config: &'a Config,
    summary: ImportSummary,
}

/// What an import wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Folder directories created.
    pub folders: usize,
    /// Primary request files written.
    pub requests: usize,
    /// Sidecar files written.
    pub sidecars: usize,
}

/// The numbering scope of one directory: its path and the names allocated in
/// it.
struct Scope {
    dir: PathBuf,
    names: NameTable,
}

impl Scope {
    fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            names: NameTable::new(),
        }
    }

    /// Allocates the on-disk path of every child before anything is written.
    fn plan<'n>(&mut self, nodes: &'n [Node]) -> Vec<(&'n Node, PathBuf)> {
        let mut ordinal = Ordinal::FIRST;
        let mut plan = Vec::with_capacity(nodes.len());
        for node in nodes {
            let name = match node {
                Node::Request(request) => self.names.allocate_file(&build_request_file_name(
                    request.name.as_str(),
                    &request.request.method,
                    Some(ordinal),
                )),
                Node::Folder(folder) => self
                    .names
                    .allocate_dir(&build_folder_dir_name(folder.name.as_str(), Some(ordinal))),
            };
            plan.push((node, self.dir.join(name)));
            ordinal = ordinal.next();
        }
        plan
    }
}

impl<'a> Importer<'a> {
    /// Creates an importer writing to `root`.
    #[must_use]
    pub fn new(root: PathBuf, config: &'a Config) -> Self {
        Self {
            root,
            config,
            summary: ImportSummary::default(),
        }
    }

    /// Writes the collection.
    ///
    /// # Errors
    ///
    /// See [`import`].
    pub fn import(mut self, collection: &Collection) -> Result<ImportSummary, ImportError> {
        validate_collection(collection)?;

        if self.root.symlink_metadata().is_ok() {
            return Err(ImportError::Conflict(self.root));
        }
        create_dir(&self.root)?;

        self.write(
            &self.root.join(COLLECTION_FILE),
            &CollectionRecord::of(collection),
        )?;

        if let Some(variables) = collection
            .variable
            .as_ref()
            .and_then(Option::as_ref)
            .filter(|v| !v.is_empty())
        {
            self.write(&self.root.join(VARIABLES_FILE), variables)?;
        }

        // populated separately, if at all
        create_dir(&self.root.join(ENVIRONMENTS_DIR))?;

        let requests = self.root.join(REQUESTS_DIR);
        create_dir(&requests)?;
        self.write_nodes(&collection.item, requests)?;

        tracing::info!(
            "Imported '{}': {} folders, {} requests",
            collection.name(),
            self.summary.folders,
            self.summary.requests
        );
        Ok(self.summary)
    }

    fn write_nodes(&mut self, nodes: &[Node], dir: PathBuf) -> Result<(), ImportError> {
        let mut scope = Scope::new(dir);
        for (node, path) in scope.plan(nodes) {
            match node {
                Node::Request(request) => self.write_request(request, &path)?,
                Node::Folder(folder) => self.write_folder(folder, path)?,
            }
        }
        Ok(())
    }

    fn write_request(&mut self, request: &RequestItem, path: &Path) -> Result<(), ImportError> {
        let mut primary = request.clone();
        let event = take_non_empty(&mut primary.event);
        let response = take_non_empty(&mut primary.response);
        let variable = take_non_empty(&mut primary.variable);

        self.write(path, &primary)?;
        self.summary.requests += 1;

        let stem = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_suffix(JSON_EXTENSION))
            .unwrap_or_default();
        let sidecar = |kind: SidecarKind| path.with_file_name(kind.file_name(stem));

        if let Some(event) = event {
            self.write(&sidecar(SidecarKind::Script), &event)?;
            self.summary.sidecars += 1;
        }
        if let Some(response) = response {
            self.write(&sidecar(SidecarKind::ResponseExample), &response)?;
            self.summary.sidecars += 1;
        }
        if let Some(variable) = variable {
            self.write(&sidecar(SidecarKind::Variables), &variable)?;
            self.summary.sidecars += 1;
        }

        Ok(())
    }

    fn write_folder(&mut self, folder: &Folder, dir: PathBuf) -> Result<(), ImportError> {
        create_dir(&dir)?;
        self.write(&dir.join(METADATA_FILE), &FolderRecord::of(folder))?;
        self.summary.folders += 1;

        self.write_nodes(&folder.item, dir)
    }

    fn write<T: serde::Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<(), ImportError> {
        write_json(path, value, self.config.indent())?;
        Ok(())
    }
}

fn create_dir(path: &Path) -> Result<(), FileError> {
    fs::create_dir_all(path).map_err(|e| FileError::io(path, e))
}

/// Moves a list out of `field` if it has entries. Empty and `null` lists
/// stay where they are.
#[allow(clippy::option_option)]
fn take_non_empty<T>(field: &mut Option<Option<Vec<T>>>) -> Option<Vec<T>> {
    field
        .take_if(|list| list.as_ref().is_some_and(|list| !list.is_empty()))
        .flatten()
}

/// Writing a collection to the filesystem failed.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The destination directory already exists.
    #[error("Import failed: directory already exists: {}", .0.display())]
    Conflict(PathBuf),

    /// The collection is not a valid tree.
    #[error("Import failed: {0}")]
    Schema(#[from] SchemaError),

    /// A file or directory could not be written.
    #[error("Import failed: {0}")]
    File(#[from] FileError),
}

#[cfg(test)]
mod tests {
    use non_empty_string::NonEmptyString;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    use super::*;
    use crate::domain::validate_document;

    fn name(s: &str) -> NonEmptyString {
        NonEmptyString::new(s.to_string()).unwrap()
    }

    fn read(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn import_raw(raw: &Value) -> (TempDir, PathBuf, ImportSummary) {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("out");
        let collection = validate_document(raw).unwrap();
        let summary = import(&collection, &root, &Config::default()).unwrap();
        (tmp, root, summary)
    }

    #[test]
    fn writes_single_request_without_sidecars() {
        let (_tmp, root, summary) = import_raw(&json!({
            "info": {"name": "T"},
            "item": [{"name": "Get Users", "request": {"method": "GET", "url": "https://x/users"}}]
        }));

        assert_eq!(listing(&root.join(REQUESTS_DIR)), ["001-GET-Get-Users.json"]);
        assert_eq!(
            read(&root.join(REQUESTS_DIR).join("001-GET-Get-Users.json")),
            json!({"name": "Get Users", "request": {"method": "GET", "url": "https://x/users"}})
        );
        assert_eq!(
            summary,
            ImportSummary {
                folders: 0,
                requests: 1,
                sidecars: 0
            }
        );
    }

    #[test]
    fn writes_root_files() {
        let (_tmp, root, _) = import_raw(&json!({
            "info": {"name": "T", "schema": "s"},
            "item": [],
            "auth": {"type": "bearer"},
            "variable": [{"key": "base", "value": "https://x"}]
        }));

        assert_eq!(
            listing(&root),
            ["collection.json", "environments", "requests", "variables.json"]
        );
        assert_eq!(
            read(&root.join(COLLECTION_FILE)),
            json!({"info": {"name": "T", "schema": "s"}, "auth": {"type": "bearer"}})
        );
        assert_eq!(
            read(&root.join(VARIABLES_FILE)),
            json!([{"key": "base", "value": "https://x"}])
        );
        assert!(listing(&root.join(ENVIRONMENTS_DIR)).is_empty());
    }

    #[test]
    fn moves_attachments_into_sidecars() {
        let (_tmp, root, summary) = import_raw(&json!({
            "info": {"name": "T"},
            "item": [{
                "name": "Login",
                "request": {"method": "POST", "url": "https://x/login"},
                "event": [{"listen": "test", "script": {"exec": ["pm.test()"]}}],
                "response": [{"name": "ok", "code": 200}],
                "variable": [{"key": "user", "value": "alice"}]
            }]
        }));

        let requests = root.join(REQUESTS_DIR);
        assert_eq!(
            listing(&requests),
            [
                "001-POST-Login.json",
                "001-POST-Login.response-example.json",
                "001-POST-Login.script.json",
                "001-POST-Login.variables.json"
            ]
        );
        let primary = read(&requests.join("001-POST-Login.json"));
        assert!(primary.get("event").is_none());
        assert!(primary.get("response").is_none());
        assert!(primary.get("variable").is_none());
        assert_eq!(
            read(&requests.join("001-POST-Login.script.json")),
            json!([{"listen": "test", "script": {"exec": ["pm.test()"]}}])
        );
        assert_eq!(summary.sidecars, 3);
    }

    #[test]
    fn empty_attachments_stay_in_primary_file() {
        let (_tmp, root, _) = import_raw(&json!({
            "info": {"name": "T"},
            "item": [{"name": "a", "request": {"method": "GET", "url": "u"}, "event": []}]
        }));

        let requests = root.join(REQUESTS_DIR);
        assert_eq!(listing(&requests), ["001-GET-a.json"]);
        assert_eq!(read(&requests.join("001-GET-a.json"))["event"], json!([]));
    }

    #[test]
    fn null_attachments_stay_in_primary_file() {
        let (_tmp, root, _) = import_raw(&json!({
            "info": {"name": "T"},
            "item": [{
                "name": "a",
                "request": {"method": "GET", "url": "u", "body": null},
                "event": null,
                "response": null
            }]
        }));

        let requests = root.join(REQUESTS_DIR);
        assert_eq!(listing(&requests), ["001-GET-a.json"]);
        assert_eq!(
            read(&requests.join("001-GET-a.json")),
            json!({
                "name": "a",
                "request": {"method": "GET", "url": "u", "body": null},
                "event": null,
                "response": null
            })
        );
    }

    #[test]
    fn folders_restart_numbering() {
        let (_tmp, root, summary) = import_raw(&json!({
            "info": {"name": "T"},
            "item": [
                {"name": "First", "request": {"method": "GET", "url": "u"}},
                {"name": "Auth (v2)", "description": "auth", "item": [
                    {"name": "Login", "request": {"method": "POST", "url": "u"}},
                    {"name": "Nested", "item": []}
                ]}
            ]
        }));

        let requests = root.join(REQUESTS_DIR);
        assert_eq!(listing(&requests), ["001-GET-First.json", "002-Auth-(v2)"]);
        assert_eq!(
            listing(&requests.join("002-Auth-(v2)")),
            ["001-POST-Login.json", "002-Nested", "metadata.json"]
        );
        assert_eq!(
            read(&requests.join("002-Auth-(v2)").join(METADATA_FILE)),
            json!({"name": "Auth (v2)", "description": "auth"})
        );
        assert_eq!(
            listing(&requests.join("002-Auth-(v2)").join("002-Nested")),
            ["metadata.json"]
        );
        assert_eq!(summary.folders, 2);
        assert_eq!(summary.requests, 2);
    }

    #[test]
    fn same_names_are_told_apart_by_ordinal() {
        let (_tmp, root, _) = import_raw(&json!({
            "info": {"name": "T"},
            "item": [
                {"name": "Same", "request": {"method": "GET", "url": "u"}},
                {"name": "Same", "request": {"method": "GET", "url": "u"}}
            ]
        }));

        assert_eq!(
            listing(&root.join(REQUESTS_DIR)),
            ["001-GET-Same.json", "002-GET-Same.json"]
        );
    }

    #[test]
    fn request_named_like_a_sidecar_gets_a_counter() {
        let (_tmp, root, _) = import_raw(&json!({
            "info": {"name": "T"},
            "item": [{"name": "settings.variables", "request": {"method": "GET", "url": "u"}}]
        }));

        assert_eq!(
            listing(&root.join(REQUESTS_DIR)),
            ["001-GET-settings.variables(1).json"]
        );
    }

    #[test]
    fn existing_destination_is_a_conflict() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("marker"), "keep").unwrap();
        let collection = Collection::new(name("T"));

        let error = import(&collection, tmp.path(), &Config::default()).unwrap_err();

        assert!(matches!(error, ImportError::Conflict(_)));
        assert!(error.to_string().starts_with("Import failed:"));
        assert_eq!(listing(tmp.path()), ["marker"]);
    }

    #[test]
    fn invalid_collection_is_rejected_before_writing() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("out");
        let collection =
            Collection::new(name("T")).with_item(RequestItem::new(name("a"), "", "https://x"));

        let error = import(&collection, &root, &Config::default()).unwrap_err();

        assert!(matches!(error, ImportError::Schema(SchemaError::MissingMethod(_))));
        assert!(!root.exists());
    }

    #[test]
    fn indent_follows_config() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("out");
        let mut config = Config::default();
        config.set_indent(4);

        import(&Collection::new(name("T")), &root, &config).unwrap();

        assert_eq!(
            fs::read_to_string(root.join(COLLECTION_FILE)).unwrap(),
            "{\n    \"info\": {\n        \"name\": \"T\"\n    }\n}\n"
        );
    }
}
