//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Palm page assembler CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: palm.toml)
    #[arg(short = 'C', long, global = true, default_value = "palm.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Print debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render a page fixture into a complete HTML document
    #[command(visible_alias = "a")]
    Assemble {
        #[command(flatten)]
        page: PageArgs,

        /// Write the document here instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Print the deduplicated scripts of a page fixture as JSON
    #[command(visible_alias = "s")]
    Scripts {
        #[command(flatten)]
        page: PageArgs,
    },
}

/// Arguments shared by every command that renders a fixture
#[derive(clap::Args, Debug, Clone)]
pub struct PageArgs {
    /// Page fixture (JSON)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub fixture: PathBuf,

    /// Slug of the view that boots on the client (default: fixture's `slug`)
    #[arg(short, long)]
    pub slug: Option<String>,

    /// Minify compiled scripts
    #[arg(long)]
    pub minify: bool,

    /// Disable the compile cache
    #[arg(long)]
    pub no_cache: bool,
}
