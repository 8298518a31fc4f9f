//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AlternatePolicy;

/// Inject direction-aware stylesheet loading into HTML heads
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: rtl.toml)
    #[arg(short = 'C', long, global = true, default_value = "rtl.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Decision logic: a regex literal (`/lang=ar/`) or a function source
    #[arg(long = "is-rtl", global = true)]
    pub is_rtl: Option<String>,

    /// Function applied to each runtime `<link>` before it is appended
    #[arg(long = "modify-tag", global = true)]
    pub modify_tag: Option<String>,

    /// What to do with `*.rtl.css` links already in the head
    #[arg(long, global = true, value_enum)]
    pub alternate: Option<AlternatePolicy>,

    /// Minify the injected script
    #[arg(short, long, global = true, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Transform one host payload (JSON on stdin, JSON on stdout)
    #[command(visible_alias = "t")]
    Tags {
        /// JSON file declaring the host's hooks (`{"hooks": [...]}`); omit for event-style hosts
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        hooks: Option<PathBuf>,

        /// Read the payload from a file instead of stdin
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        payload: Option<PathBuf>,
    },

    /// Rewrite built HTML files in place
    #[command(visible_alias = "h")]
    Html {
        /// Files or directories to rewrite. Use `-` to read paths from stdin.
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// Report what would change without writing
        #[arg(long)]
        dry: bool,
    },
}
