//! Per-directory allocation of child names.
//!
//! Every name in one directory is allocated before the first file in that
//! directory is written. A candidate that is already taken, or that would be
//! read back as something other than a primary request file, gets a `(<n>)`
//! counter appended until it is free.

use std::collections::HashSet;

use crate::storage::{
    file_role::{FileRole, SidecarKind},
    layout::METADATA_FILE,
    naming::{with_counter, JSON_EXTENSION},
};

/// The names allocated so far in one directory.
///
/// Names are compared case-insensitively so that a layout written on a
/// case-sensitive filesystem can be checked out on a case-insensitive one.
#[derive(Debug)]
pub struct NameTable {
    taken: HashSet<String>,
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NameTable {
    /// Creates a table with only the folder metadata file reserved.
    #[must_use]
    pub fn new() -> Self {
        let mut table = Self {
            taken: HashSet::new(),
        };
        table.reserve(METADATA_FILE);
        table
    }

    /// Allocates a primary request file name and reserves its sidecar names.
    ///
    /// `candidate` must end in `.json`.
    pub fn allocate_file(&mut self, candidate: &str) -> String {
        let name = self.first_free(candidate, |table, name| {
            let FileRole::Primary { stem } = FileRole::parse(name) else {
                return false;
            };
            table.is_free(name) && sidecar_names(stem).all(|sidecar| table.is_free(&sidecar))
        });

        let stem = name.strip_suffix(JSON_EXTENSION).unwrap_or(&name).to_string();
        self.reserve(&name);
        for sidecar in sidecar_names(&stem) {
            self.reserve(&sidecar);
        }
        name
    }

    /// Allocates a folder directory name.
    pub fn allocate_dir(&mut self, candidate: &str) -> String {
        self.allocate_plain(candidate)
    }

    /// Allocates a name that only has to be unique, such as an environment
    /// file. Sidecar suffixes carry no meaning for it.
    pub fn allocate_plain(&mut self, candidate: &str) -> String {
        let name = self.first_free(candidate, |table, name| table.is_free(name));
        self.reserve(&name);
        name
    }

    fn first_free(&self, candidate: &str, accept: impl Fn(&Self, &str) -> bool) -> String {
        if accept(self, candidate) {
            return candidate.to_string();
        }
        (1..)
            .map(|counter| with_counter(candidate, counter))
            .find(|name| accept(self, name))
            .unwrap_or_else(|| unreachable!("counters are unbounded"))
    }

    fn is_free(&self, name: &str) -> bool {
        !self.taken.contains(&name.to_lowercase())
    }

    fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_lowercase());
    }
}

fn sidecar_names(stem: &str) -> impl Iterator<Item = String> + '_ {
    SidecarKind::WRITTEN
        .into_iter()
        .chain([SidecarKind::LegacyEvent])
        .map(move |kind| kind.file_name(stem))
}
