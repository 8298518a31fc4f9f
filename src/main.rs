//! rtl-inject - direction-aware stylesheet injection for HTML heads.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use rtl_inject::cli::{self, Cli, Commands, html::run_html, tags::run_tags};
use rtl_inject::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = cli::load_config(&cli)?;

    match &cli.command {
        Commands::Tags { hooks, payload } => {
            run_tags(hooks.as_deref(), payload.as_deref(), config)
        }
        Commands::Html { paths, dry } => run_html(paths, &config, *dry).map(|_| ()),
    }
}
