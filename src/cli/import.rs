use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use postman_fs::{
    docs::write_docs,
    storage::{layout::ENVIRONMENTS_DIR, read_json, sanitize, write_json, NameTable},
    validate_document, Config, Environment,
};
use serde_json::Value;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
pub struct Import {
    /// The collection file to convert
    collection: PathBuf,

    /// The directory to create. Must not exist yet.
    output: PathBuf,

    /// Environment files to copy into the tree (repeatable)
    #[arg(long = "environment", short, value_name = "FILE")]
    environments: Vec<PathBuf>,

    /// Don't write README.md and the AI context files
    #[arg(long)]
    no_docs: bool,
}

impl Import {
    #[instrument(level = "debug", skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let content = fs::read_to_string(&self.collection)
            .with_context(|| format!("failed to read {}", self.collection.display()))?;
        let raw: Value = serde_json::from_str(&content)
            .with_context(|| format!("{} is not valid JSON", self.collection.display()))?;
        let collection = validate_document(&raw)
            .with_context(|| format!("{} is not a valid collection", self.collection.display()))?;

        let summary = postman_fs::import(&collection, &self.output, config)?;

        let environments_dir = self.output.join(ENVIRONMENTS_DIR);
        let mut names = NameTable::new();
        for path in &self.environments {
            copy_environment(path, &environments_dir, &mut names, config)?;
        }

        if config.write_docs && !self.no_docs {
            write_docs(&collection, &self.output, config.indent())
                .context("failed to write documentation")?;
        }

        println!(
            "{} Imported '{}' into {}",
            "✓".success(),
            collection.name(),
            self.output.display()
        );
        println!(
            "{}",
            format!(
                "  {} folders, {} requests, {} sidecar files, {} environments",
                summary.folders,
                summary.requests,
                summary.sidecars,
                self.environments.len()
            )
            .dim()
        );

        Ok(())
    }
}

/// Copies an environment file into the tree, named after the environment.
fn copy_environment(
    source: &Path,
    dir: &Path,
    names: &mut NameTable,
    config: &Config,
) -> anyhow::Result<()> {
    let environment: Environment = read_json(source)
        .with_context(|| format!("failed to read environment {}", source.display()))?;

    let stem = sanitize(&environment.name);
    let stem = if stem.is_empty() {
        source
            .file_stem()
            .map_or_else(|| "environment".to_string(), |s| sanitize(&s.to_string_lossy()))
    } else {
        stem
    };
    let file_name = names.allocate_plain(&format!("{stem}.json"));

    write_json(&dir.join(&file_name), &environment, config.indent())?;
    tracing::info!("Copied environment '{}' to {file_name}", environment.name);
    Ok(())
}
