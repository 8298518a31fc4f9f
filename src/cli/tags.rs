//! `tags` command: transform one host payload.

use std::io::{Write, stdout};
use std::path::Path;

use anyhow::Result;
use serde_json::Value;

use super::common::read_json;
use crate::config::InjectConfig;
use crate::host::{ExtensionPoints, RtlInjectPlugin};

/// Read hooks and payload, write the transformed payload to stdout.
pub fn run_tags(hooks: Option<&Path>, payload: Option<&Path>, config: InjectConfig) -> Result<()> {
    let out = transform(hooks, payload, config)?;
    let mut stdout = stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &out)?;
    writeln!(stdout)?;
    Ok(())
}

fn transform(hooks: Option<&Path>, payload: Option<&Path>, config: InjectConfig) -> Result<Value> {
    let points = match hooks {
        Some(path) => read_json::<ExtensionPoints>(Some(path))?,
        None => ExtensionPoints::events(),
    };
    let plugin = RtlInjectPlugin::with_config(config, &points)?;
    let payload: Value = read_json(payload)?;
    Ok(plugin.alter_asset_tags(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capsule::DecisionLogic;
    use crate::error::InjectError;
    use std::fs;
    use tempfile::TempDir;

    fn config() -> InjectConfig {
        InjectConfig::new(DecisionLogic::parse("/ar/").unwrap())
    }

    #[test]
    fn test_transform_current_payload() {
        let dir = TempDir::new().unwrap();
        let hooks = dir.path().join("hooks.json");
        let payload = dir.path().join("payload.json");
        fs::write(&hooks, r#"{ "hooks": ["alterAssetTagGroups"] }"#).unwrap();
        fs::write(
            &payload,
            r#"{ "headTags": [{ "tagName": "link", "attributes": { "href": "a.css" } }], "bodyTags": [] }"#,
        )
        .unwrap();

        let out = transform(Some(&hooks), Some(&payload), config()).unwrap();
        assert_eq!(out["headTags"][0]["tagName"], "script");
        assert_eq!(out["bodyTags"], serde_json::json!([]));
    }

    #[test]
    fn test_transform_missing_hook() {
        let dir = TempDir::new().unwrap();
        let hooks = dir.path().join("hooks.json");
        fs::write(&hooks, r#"{ "hooks": [] }"#).unwrap();

        let err = transform(Some(&hooks), None, config()).unwrap_err();
        assert_eq!(err.downcast_ref::<InjectError>(), Some(&InjectError::MissingHook));
    }
}
