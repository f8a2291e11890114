//! Documentation written next to an imported tree.
//!
//! Three files describe the layout and its numbering rules to whoever edits
//! the tree by hand (or by tool):
//!
//! - `README.md`: an overview of the layout
//! - `ai-context.json`: the same rules in machine readable form
//! - `ai-instructions.md`: step by step renumbering instructions

use std::{fs, path::Path};

use serde_json::{json, Value};

use crate::{
    domain::Collection,
    storage::{
        layout::{COLLECTION_FILE, ENVIRONMENTS_DIR, METADATA_FILE, REQUESTS_DIR, VARIABLES_FILE},
        write_json, FileError,
    },
};

/// The overview file name.
pub const README_FILE: &str = "README.md";

/// The machine readable context file name.
pub const AI_CONTEXT_FILE: &str = "ai-context.json";

/// The editing instructions file name.
pub const AI_INSTRUCTIONS_FILE: &str = "ai-instructions.md";

/// Writes all three documentation files into `root`.
///
/// # Errors
///
/// Returns an error if any file cannot be written.
pub fn write_docs(collection: &Collection, root: &Path, indent: usize) -> Result<(), FileError> {
    write_text(&root.join(README_FILE), &readme(collection))?;
    write_json(&root.join(AI_CONTEXT_FILE), &ai_context(collection), indent)?;
    write_text(&root.join(AI_INSTRUCTIONS_FILE), &ai_instructions())?;
    Ok(())
}

fn write_text(path: &Path, content: &str) -> Result<(), FileError> {
    fs::write(path, content).map_err(|e| FileError::io(path, e))?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

/// Renders `README.md`.
#[must_use]
pub fn readme(collection: &Collection) -> String {
    let description = collection
        .info
        .description_text()
        .unwrap_or("Postman collection converted to file structure");

    format!(
        r"# {name}

{description}

## File structure

- `{COLLECTION_FILE}`: collection metadata and configuration
- `{VARIABLES_FILE}`: collection level variables
- `{ENVIRONMENTS_DIR}/`: environment configurations
- `{REQUESTS_DIR}/`: requests, organised by folder
  - `{{name}}.json`: the request
  - `{{name}}.script.json`: pre-request and test scripts
  - `{{name}}.response-example.json`: example responses
  - `{{name}}.variables.json`: request level variables
  - `{METADATA_FILE}`: folder settings, one per folder

## Variables

Variables use Postman's `{{{{variable_name}}}}` syntax. Collection variables are
defined in `{VARIABLES_FILE}`.

## Ordering

Every file and folder starts with a three digit number that fixes its position
among its siblings:

- requests: `001-METHOD-Name.json`, `002-METHOD-Name.json`, ...
- folders: `001-FolderName/`, `002-FolderName/`, ...

Past 999, letters are appended: `999a`, `999b`, ... `999z`, `999aa`.

When inserting an item, renumber every sibling after the insertion point. See
`{AI_INSTRUCTIONS_FILE}` for worked examples.
",
        name = collection.name(),
    )
}

/// Builds the contents of `ai-context.json`.
#[must_use]
pub fn ai_context(collection: &Collection) -> Value {
    let info = &collection.info;
    json!({
        "collection": {
            "name": collection.name(),
            "description": info.description,
            "schema": info.schema,
            "id": info.postman_id,
        },
        "structure": {
            "type": "postman-collection",
            "format": "file-based",
            "numbering_system": "sequential",
            "max_number": 999,
            "overflow_format": "999a, 999b, 999c",
        },
        "files": {
            "collection_metadata": COLLECTION_FILE,
            "variables": VARIABLES_FILE,
            "environments": format!("{ENVIRONMENTS_DIR}/"),
            "requests": format!("{REQUESTS_DIR}/"),
            "folder_metadata": METADATA_FILE,
            "documentation": README_FILE,
        },
        "rules": {
            "critical": [
                "ALL files and folders MUST be numbered sequentially",
                "When inserting new items, renumber ALL existing items after insertion point",
                "Use format: 001-METHOD-Name.json for requests",
                "Use format: 001-FolderName/ for folders",
            ],
            "numbering": {
                "format": "001, 002, 003...",
                "max_standard": 999,
                "overflow": "999a, 999b, ..., 999z, 999aa, 999ab...",
                "padding": 3,
            },
            "operations": {
                "insert": "1. Check existing numbers 2. Renumber items after insertion 3. Create new item with correct number",
                "delete": "1. Remove item 2. Renumber remaining items to fill gaps",
                "reorder": "1. Renumber all items to match new order",
            },
        },
        "examples": {
            "insert_request": {
                "before": ["001-GET-Users.json", "002-POST-Create-User.json", "003-DELETE-User.json"],
                "action": "Insert PUT-Update-User between GET and POST",
                "after": [
                    "001-GET-Users.json",
                    "002-PUT-Update-User.json",
                    "003-POST-Create-User.json",
                    "004-DELETE-User.json",
                ],
            },
            "insert_folder": {
                "before": ["001-Auth/", "002-Users/", "003-Products/"],
                "action": "Insert Orders folder between Auth and Users",
                "after": ["001-Auth/", "002-Orders/", "003-Users/", "004-Products/"],
            },
        },
    })
}

/// Renders `ai-instructions.md`.
#[must_use]
pub fn ai_instructions() -> String {
    format!(
        r"# Editing instructions

This collection uses sequential numbering to preserve order when it is
converted back into a single collection file.

## Numbering

- Format: `001`, `002`, `003`, ...
- Requests: `001-METHOD-Name.json`
- Folders: `001-FolderName/`
- After `999`: `999a`, `999b`, ... `999z`, `999aa`, ...

Numbering restarts at `001` inside every folder.

## Inserting

1. Find the insertion point.
2. Add one to the number of every item after it.
3. Create the new item with the freed number.

```text
before: 001-GET-Users.json, 002-POST-Create-User.json, 003-DELETE-User.json
insert: PUT-Update-User between GET and POST
after:  001-GET-Users.json, 002-PUT-Update-User.json, 003-POST-Create-User.json, 004-DELETE-User.json
```

## Deleting

Remove the item, then renumber the remaining items to close the gap.

## Reordering

Renumber every item to match the new order.

## Files

- request: `001-METHOD-Name.json`
- scripts: `001-METHOD-Name.script.json`
- response examples: `001-METHOD-Name.response-example.json`
- variables: `001-METHOD-Name.variables.json`
- folder settings: `{METADATA_FILE}`

Rename a request's sidecar files together with the request itself.

## Checklist

- numbers are sequential
- no gaps
- no duplicates
"
    )
}

#[cfg(test)]
mod tests {
    use non_empty_string::NonEmptyString;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn collection() -> Collection {
        let mut collection = Collection::new(NonEmptyString::new("Pet Store".to_string()).unwrap());
        collection.info.description = Some(json!("All the pets"));
        collection
    }

    #[test]
    fn readme_names_the_collection() {
        let readme = readme(&collection());

        assert!(readme.starts_with("# Pet Store\n\nAll the pets\n"));
        assert!(readme.contains("`{{variable_name}}`"));
        assert!(readme.contains("`{name}.script.json`"));
    }

    #[test]
    fn readme_falls_back_to_generic_description() {
        let collection = Collection::new(NonEmptyString::new("T".to_string()).unwrap());

        assert!(readme(&collection).contains("Postman collection converted to file structure"));
    }

    #[test]
    fn context_describes_numbering() {
        let context = ai_context(&collection());

        assert_eq!(context["collection"]["name"], "Pet Store");
        assert_eq!(context["structure"]["max_number"], 999);
        assert_eq!(context["rules"]["numbering"]["padding"], 3);
    }

    #[test]
    fn writes_all_files() {
        let tmp = TempDir::new().unwrap();

        write_docs(&collection(), tmp.path(), 2).unwrap();

        for file in [README_FILE, AI_CONTEXT_FILE, AI_INSTRUCTIONS_FILE] {
            assert!(tmp.path().join(file).is_file(), "{file} missing");
        }
        let context: Value =
            serde_json::from_str(&fs::read_to_string(tmp.path().join(AI_CONTEXT_FILE)).unwrap())
                .unwrap();
        assert_eq!(context["files"]["requests"], "requests/");
    }
}
