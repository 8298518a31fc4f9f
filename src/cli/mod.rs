//! Command-line interface module.

mod args;
pub mod common;
pub mod html;
pub mod tags;

pub use args::{Cli, Commands};

use serde_json::Value;

use crate::config::{ConfigDiagnostics, ConfigError, InjectConfig, RawOptions};

/// Load `rtl.toml`, apply CLI overrides, then validate.
pub fn load_config(cli: &Cli) -> Result<InjectConfig, ConfigError> {
    let mut diag = ConfigDiagnostics::new();
    let mut raw = RawOptions::load(&cli.config, &mut diag)?;
    apply_overrides(&mut raw, cli);
    raw.finish(diag)
}

fn apply_overrides(raw: &mut RawOptions, cli: &Cli) {
    let is_rtl = cli.is_rtl.clone().map(|s| Some(Value::String(s)));
    let modify_tag = cli.modify_tag.clone().map(|s| Some(Value::String(s)));

    RawOptions::update_option(&mut raw.is_rtl, is_rtl.as_ref());
    RawOptions::update_option(&mut raw.modify_tag, modify_tag.as_ref());
    RawOptions::update_option(&mut raw.alternate, cli.alternate.as_ref());
    RawOptions::update_option(&mut raw.minify, cli.minify.as_ref());
}
