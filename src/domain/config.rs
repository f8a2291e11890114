use std::path::Path;

use serde::{Deserialize, Serialize};

/// The file name a configuration is looked up under when none is given.
pub const CONFIG_FILE_NAME: &str = "postman-fs.toml";

/// Configuration for collection conversion.
///
/// These settings only affect how files are written and which legacy names
/// are recognised. They never change the numbering contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The number of spaces JSON files are indented with.
    indent: usize,

    /// Whether an import also writes `README.md`, `ai-context.json` and
    /// `ai-instructions.md` into the collection root.
    pub write_docs: bool,

    /// Whether `*.event.json` files are read as the script sidecar of a
    /// request when no `*.script.json` file exists.
    pub legacy_event_sidecars: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            write_docs: true,
            legacy_event_sidecars: true,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads the configuration from `path`, falling back to the default
    /// configuration if it is missing or invalid.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config: {e}");
            Self::default()
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the JSON indentation width.
    #[must_use]
    pub const fn indent(&self) -> usize {
        self.indent
    }

    /// Sets the JSON indentation width.
    pub const fn set_indent(&mut self, indent: usize) {
        self.indent = indent;
    }
}

const fn default_indent() -> usize {
    2
}

const fn default_true() -> bool {
    true
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        /// The number of spaces JSON files are indented with.
        #[serde(default = "default_indent")]
        indent: usize,

        #[serde(default = "default_true")]
        write_docs: bool,

        #[serde(default = "default_true")]
        legacy_event_sidecars: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                indent,
                write_docs,
                legacy_event_sidecars,
            } => Self {
                indent,
                write_docs,
                legacy_event_sidecars,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            indent: config.indent,
            write_docs: config.write_docs,
            legacy_event_sidecars: config.legacy_event_sidecars,
        }
    }
}
