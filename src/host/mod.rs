//! Host integration.
//!
//! ```text
//! setup:  RawOptions ─► validate ─► InjectConfig ┐
//!         ExtensionPoints ─► detect ─► HostAdapter ┴─► RtlInjectPlugin
//!
//! render: payload ─► normalize ─► process ─► denormalize ─► done(result)
//! ```
//!
//! Options are validated before the host is inspected, so a bad `isRtl`
//! is reported even when the host also lacks the required hook.

mod adapter;

pub use adapter::{CURRENT_HOOK, ExtensionPoints, HostAdapter, LEGACY_EVENT, LEGACY_HOOK};

use serde_json::Value;
use tokio::sync::oneshot;

use crate::config::{InjectConfig, RawOptions};
use crate::error::Result;
use crate::pipeline::process;

/// Completion callback; invoked exactly once per render.
pub type Done = Box<dyn FnOnce(Result<Value>) + Send>;

/// Deferred result, for hosts that wait on a value instead of a callback.
pub type Deferred = oneshot::Receiver<Result<Value>>;

/// An injector bound to one host.
#[derive(Debug, Clone)]
pub struct RtlInjectPlugin {
    config: InjectConfig,
    adapter: HostAdapter,
}

impl RtlInjectPlugin {
    /// Validate `options`, then pick the adapter for `points`.
    pub fn new(options: &RawOptions, points: &ExtensionPoints) -> Result<Self> {
        let config = options.validate()?;
        Self::with_config(config, points)
    }

    pub fn with_config(config: InjectConfig, points: &ExtensionPoints) -> Result<Self> {
        let adapter = HostAdapter::detect(points)?;
        crate::debug!(
            "host";
            "attached to `{}`, deciding by {}",
            adapter.extension_point(points.hooks.is_some()),
            config.is_rtl.label()
        );
        Ok(Self { config, adapter })
    }

    pub fn config(&self) -> &InjectConfig {
        &self.config
    }

    pub fn adapter(&self) -> HostAdapter {
        self.adapter
    }

    /// Transform one host payload.
    pub fn alter_asset_tags(&self, payload: Value) -> Result<Value> {
        let snapshot = self.adapter.normalize(payload)?;
        let snapshot = process(snapshot, &self.config)?;
        self.adapter.denormalize(snapshot)
    }

    /// Transform and signal completion.
    ///
    /// With a callback the result goes to `done` and `None` is returned.
    /// Without one the result is returned through a [`Deferred`].
    pub fn dispatch(&self, payload: Value, done: Option<Done>) -> Option<Deferred> {
        let result = self.alter_asset_tags(payload);
        match done {
            Some(done) => {
                done(result);
                None
            }
            None => {
                let (tx, rx) = oneshot::channel();
                // The receiver is still held here, so this cannot fail.
                let _ = tx.send(result);
                Some(rx)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InjectError;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn options(is_rtl: Value) -> RawOptions {
        RawOptions {
            is_rtl: Some(is_rtl),
            ..Default::default()
        }
    }

    fn legacy_payload() -> Value {
        json!({
            "head": [
                { "tagName": "meta", "attributes": { "charset": "utf-8" } },
                { "tagName": "link", "selfClosingTag": false, "attributes": { "href": "style.css", "rel": "stylesheet" } },
                { "tagName": "link", "selfClosingTag": false, "attributes": { "href": "style.rtl.css", "rel": "stylesheet" } }
            ],
            "body": [],
            "plugin": {},
            "chunks": ["main"],
            "outputName": "index.html"
        })
    }

    #[test]
    fn test_validation_before_hook_detection() {
        let points = ExtensionPoints::with_hooks(["compilation"]);
        let err = RtlInjectPlugin::new(&RawOptions::default(), &points).unwrap_err();
        assert_eq!(err, InjectError::MissingDecisionLogic);

        let err = RtlInjectPlugin::new(&options(json!("/ar/")), &points).unwrap_err();
        assert_eq!(err, InjectError::MissingHook);
    }

    #[test]
    fn test_invalid_decision_logic() {
        let err = RtlInjectPlugin::new(&options(json!(42)), &ExtensionPoints::events()).unwrap_err();
        assert!(matches!(err, InjectError::InvalidDecisionLogic(_)));
    }

    #[test]
    fn test_legacy_host() {
        let plugin = RtlInjectPlugin::new(&options(json!("/lang_type=ar/")), &ExtensionPoints::events())
            .unwrap();
        assert_eq!(plugin.adapter(), HostAdapter::Legacy);

        let out = plugin.alter_asset_tags(legacy_payload()).unwrap();
        let head = out["head"].as_array().unwrap();
        assert_eq!(head.len(), 3);
        assert_eq!(head[0]["tagName"], "script");
        assert_eq!(head[1]["attributes"]["href"], "style.rtl.css");
        assert_eq!(head[2]["tagName"], "meta");
        assert_eq!(out["chunks"], json!(["main"]));
        assert_eq!(out["outputName"], "index.html");
    }

    #[test]
    fn test_current_host() {
        let points = ExtensionPoints::with_hooks([CURRENT_HOOK]);
        let plugin = RtlInjectPlugin::new(&options(json!("/lang_type=ar/")), &points).unwrap();

        let payload = json!({
            "headTags": [{ "tagName": "link", "voidTag": true, "attributes": { "href": "app.css" } }],
            "bodyTags": [{ "tagName": "script", "attributes": { "src": "app.js" } }],
            "outputName": "index.html",
            "publicPath": "/"
        });
        let out = plugin.alter_asset_tags(payload.clone()).unwrap();

        let head = out["headTags"].as_array().unwrap();
        assert_eq!(head.len(), 1);
        assert_eq!(head[0]["tagName"], "script");
        assert!(head[0]["innerHTML"].as_str().unwrap().contains(r#"["app"]"#));
        assert_eq!(out["bodyTags"], payload["bodyTags"]);
        assert_eq!(out["publicPath"], payload["publicPath"]);
        assert!(out.get("head").is_none());
    }

    #[test]
    fn test_callback_called_once() {
        let plugin =
            RtlInjectPlugin::new(&options(json!("/ar/")), &ExtensionPoints::events()).unwrap();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);

        let deferred = plugin.dispatch(
            legacy_payload(),
            Some(Box::new(move |result| sink.lock().unwrap().push(result))),
        );

        assert!(deferred.is_none());
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].is_ok());
    }

    #[test]
    fn test_callback_receives_error() {
        let plugin =
            RtlInjectPlugin::new(&options(json!("/ar/")), &ExtensionPoints::events()).unwrap();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);

        plugin.dispatch(
            json!({ "headTags": [] }),
            Some(Box::new(move |result| sink.lock().unwrap().push(result))),
        );

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(matches!(calls[0], Err(InjectError::MalformedSnapshot(_))));
    }

    #[test]
    fn test_deferred_result() {
        let plugin =
            RtlInjectPlugin::new(&options(json!("/ar/")), &ExtensionPoints::events()).unwrap();
        let mut rx = plugin.dispatch(legacy_payload(), None).unwrap();

        let out = rx.try_recv().unwrap().unwrap();
        assert_eq!(out["head"][0]["tagName"], "script");
        // Single value only
        assert!(rx.try_recv().is_err());
    }
}
