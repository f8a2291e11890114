use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use postman_fs::{
    storage::{sanitize, to_pretty_json, write_json, NameTable},
    Config,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
pub struct Export {
    /// The root of the directory tree
    root: PathBuf,

    /// Where to write the collection file. Printed to stdout if omitted.
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write the environments found in the tree into this directory
    #[arg(long, value_name = "DIR")]
    environments_dir: Option<PathBuf>,
}

impl Export {
    #[instrument(level = "debug", skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let export = postman_fs::export(&self.root, config)?;

        if let Some(dir) = &self.environments_dir {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            let mut names = NameTable::new();
            for environment in &export.environments {
                let mut stem = sanitize(&environment.name);
                if stem.is_empty() {
                    stem = "environment".to_string();
                }
                let file_name = names.allocate_plain(&format!("{stem}.json"));
                write_json(&dir.join(file_name), environment, config.indent())?;
            }
        }

        match &self.output {
            Some(path) => {
                write_json(path, &export.collection, config.indent())?;
                let count = export.collection.count_nodes();
                eprintln!(
                    "{} Exported '{}' to {}",
                    "✓".success(),
                    export.collection.name(),
                    path.display()
                );
                eprintln!(
                    "{}",
                    format!(
                        "  {} folders, {} requests, {} environments",
                        count.folders,
                        count.requests,
                        export.environments.len()
                    )
                    .dim()
                );
            }
            None => {
                let json = to_pretty_json(&export.collection, config.indent())?;
                io::stdout().lock().write_all(&json)?;
            }
        }

        Ok(())
    }
}
