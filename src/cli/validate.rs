use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use postman_fs::{validate_document, validate_filesystem_layout};
use serde_json::Value;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
pub struct Validate {
    /// A collection file or the root of a directory tree
    path: PathBuf,
}

impl Validate {
    #[instrument(level = "debug")]
    pub fn run(self) -> anyhow::Result<()> {
        if self.path.is_dir() {
            validate_filesystem_layout(&self.path)?;
            println!(
                "{} {} is a valid collection tree",
                "✓".success(),
                self.path.display()
            );
            return Ok(());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let raw: Value = serde_json::from_str(&content)
            .with_context(|| format!("{} is not valid JSON", self.path.display()))?;
        let collection = validate_document(&raw)?;

        let count = collection.count_nodes();
        println!(
            "{} '{}' is a valid collection",
            "✓".success(),
            collection.name()
        );
        println!(
            "{}",
            format!("  {} folders, {} requests", count.folders, count.requests).dim()
        );
        if count.requests == 0 {
            println!("{}", "  the collection has no requests".warning());
        }

        Ok(())
    }
}
