use std::path::{Path, PathBuf};

mod export;
mod import;
mod terminal;
mod validate;

use clap::ArgAction;
use export::Export;
use import::Import;
use postman_fs::{domain::CONFIG_FILE_NAME, Config};
use validate::Validate;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a configuration file
    ///
    /// Defaults to `postman-fs.toml` in the working directory, if present.
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = match &self.config {
            Some(path) => Config::load(path)
                .map_err(|e| anyhow::anyhow!("{e} ({})", path.display()))?,
            None => Config::load_or_default(Path::new(CONFIG_FILE_NAME)),
        };

        self.command.run(&config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Convert a collection file into a directory tree
    Import(Import),

    /// Convert a directory tree back into a collection file
    Export(Export),

    /// Check a collection file or a directory tree
    ///
    /// A directory is checked for the files every tree needs. Anything else
    /// is read as a collection file and checked for a valid item tree.
    Validate(Validate),
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Import(command) => command.run(config)?,
            Self::Export(command) => command.run(config)?,
            Self::Validate(command) => command.run()?,
        }
        Ok(())
    }
}
