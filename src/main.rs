//! Palm - assemble server-rendered pages from component fixtures.

mod cli;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use palm::config::PalmConfig;
use palm::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = PalmConfig::load_or_default(&cli.config)?;

    match &cli.command {
        Commands::Assemble { page, output } => cli::assemble::run(page, output.as_deref(), &config),
        Commands::Scripts { page } => cli::scripts::run(page, &config),
    }
}
