//! Classification of the files found in a request directory.
//!
//! Each file name is parsed exactly once into a [`FileRole`] by its suffix, so
//! a request whose name merely contains `variables` or `script` is never
//! mistaken for a sidecar.

use crate::storage::{layout::METADATA_FILE, naming::JSON_EXTENSION};

/// An auxiliary file belonging to one primary request file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SidecarKind {
    /// Lifecycle scripts (`*.script.json`).
    Script,
    /// Lifecycle scripts under their older name (`*.event.json`).
    LegacyEvent,
    /// Example responses (`*.response-example.json`).
    ResponseExample,
    /// Request level variables (`*.variables.json`).
    Variables,
}

impl SidecarKind {
    /// The sidecars written on import.
    pub const WRITTEN: [Self; 3] = [Self::Script, Self::ResponseExample, Self::Variables];

    /// The suffix replacing `.json` on the primary file name.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Script => ".script.json",
            Self::LegacyEvent => ".event.json",
            Self::ResponseExample => ".response-example.json",
            Self::Variables => ".variables.json",
        }
    }

    /// Builds the sidecar file name for a primary file stem.
    ///
    /// ```
    /// use postman_fs::storage::SidecarKind;
    ///
    /// assert_eq!(SidecarKind::Script.file_name("001-GET-a"), "001-GET-a.script.json");
    /// ```
    #[must_use]
    pub fn file_name(self, primary_stem: &str) -> String {
        format!("{primary_stem}{}", self.suffix())
    }

    const ALL: [Self; 4] = [
        Self::ResponseExample,
        Self::Variables,
        Self::Script,
        Self::LegacyEvent,
    ];
}

/// What a file in a request directory is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole<'a> {
    /// A primary request file. Holds the file name without `.json`.
    Primary {
        /// The file name without its `.json` extension.
        stem: &'a str,
    },
    /// A sidecar of the primary file whose stem is `primary_stem`.
    Sidecar {
        /// Which attachment the sidecar holds.
        kind: SidecarKind,
        /// The stem of the primary file the sidecar belongs to.
        primary_stem: &'a str,
    },
    /// The `metadata.json` file of a folder.
    FolderMetadata,
    /// Hidden files and anything not ending in `.json`.
    Ignored,
}

impl<'a> FileRole<'a> {
    /// Classifies a file by name.
    ///
    /// ```
    /// use postman_fs::storage::{FileRole, SidecarKind};
    ///
    /// assert_eq!(
    ///     FileRole::parse("001-GET-a.variables.json"),
    ///     FileRole::Sidecar { kind: SidecarKind::Variables, primary_stem: "001-GET-a" }
    /// );
    /// assert_eq!(FileRole::parse("001-GET-a.json"), FileRole::Primary { stem: "001-GET-a" });
    /// ```
    #[must_use]
    pub fn parse(file_name: &'a str) -> Self {
        if file_name == METADATA_FILE {
            return Self::FolderMetadata;
        }
        if file_name.starts_with('.') {
            return Self::Ignored;
        }

        for kind in SidecarKind::ALL {
            if let Some(primary_stem) = file_name.strip_suffix(kind.suffix()) {
                if !primary_stem.is_empty() {
                    return Self::Sidecar { kind, primary_stem };
                }
            }
        }

        match file_name.strip_suffix(JSON_EXTENSION) {
            Some(stem) if !stem.is_empty() => Self::Primary { stem },
            _ => Self::Ignored,
        }
    }

    /// Whether a file with this role would be read as a request.
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        matches!(self, Self::Primary { .. })
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("001-GET-a.script.json", SidecarKind::Script)]
    #[test_case("001-GET-a.event.json", SidecarKind::LegacyEvent)]
    #[test_case("001-GET-a.response-example.json", SidecarKind::ResponseExample)]
    #[test_case("001-GET-a.variables.json", SidecarKind::Variables)]
    fn recognises_sidecars(file_name: &str, kind: SidecarKind) {
        assert_eq!(
            FileRole::parse(file_name),
            FileRole::Sidecar {
                kind,
                primary_stem: "001-GET-a"
            }
        );
    }

    #[test]
    fn substrings_inside_a_name_do_not_make_a_sidecar() {
        assert_eq!(
            FileRole::parse("001-GET-update.variables.and.scripts.json"),
            FileRole::Primary {
                stem: "001-GET-update.variables.and.scripts"
            }
        );
        assert_eq!(
            FileRole::parse("002-GET-my.event.log.json"),
            FileRole::Primary {
                stem: "002-GET-my.event.log"
            }
        );
    }

    #[test]
    fn counter_suffix_breaks_a_sidecar_suffix() {
        assert!(FileRole::parse("001-GET-a.variables(1).json").is_primary());
    }

    #[test]
    fn metadata_is_not_a_request() {
        assert_eq!(FileRole::parse("metadata.json"), FileRole::FolderMetadata);
    }

    #[test_case("README.md")]
    #[test_case(".json")]
    #[test_case(".script.json")]
    #[test_case("notes.txt")]
    fn ignores_non_request_files(file_name: &str) {
        assert_eq!(FileRole::parse(file_name), FileRole::Ignored);
    }

    #[test]
    fn sidecar_file_names_follow_primary_stem() {
        let names: Vec<_> = SidecarKind::WRITTEN
            .iter()
            .map(|kind| kind.file_name("003-POST-Login"))
            .collect();
        assert_eq!(
            names,
            [
                "003-POST-Login.script.json",
                "003-POST-Login.response-example.json",
                "003-POST-Login.variables.json"
            ]
        );
    }
}
