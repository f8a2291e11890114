//! Command-line interface for converting Postman collections to and from
//! directory trees.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
