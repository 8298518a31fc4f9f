//! Host adapters: payload shape per host version.
//!
//! | Host                                   | Adapter   | Head key   |
//! |----------------------------------------|-----------|------------|
//! | event registration (no hook registry)  | `Legacy`  | `head`     |
//! | registry with `htmlWebpackPluginAlterAssetTags` | `Legacy` | `head` |
//! | registry with `alterAssetTagGroups`    | `Current` | `headTags` |
//!
//! Adapters only move fields in and out of [`DocumentSnapshot`]; the
//! transformation itself never sees which host it serves.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{InjectError, Result};
use crate::pipeline::DocumentSnapshot;
use crate::tag::HeadElement;

/// Event name used by hosts without a hook registry.
pub const LEGACY_EVENT: &str = "html-webpack-plugin-alter-asset-tags";
/// Registry hook carrying the `head` payload shape.
pub const LEGACY_HOOK: &str = "htmlWebpackPluginAlterAssetTags";
/// Registry hook carrying the `headTags` payload shape.
pub const CURRENT_HOOK: &str = "alterAssetTagGroups";

/// Fields a legacy host reads back from the result.
const LEGACY_FIELDS: [&str; 4] = ["body", "plugin", "chunks", "outputName"];

/// Extension points a host declares.
///
/// `hooks: None` means the host registers plugins by event name only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionPoints {
    #[serde(default)]
    pub hooks: Option<Vec<String>>,
}

impl ExtensionPoints {
    /// Event-style host without a hook registry.
    pub fn events() -> Self {
        Self { hooks: None }
    }

    pub fn with_hooks<I, S>(hooks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hooks: Some(hooks.into_iter().map(Into::into).collect()),
        }
    }

    fn has_hook(&self, name: &str) -> bool {
        self.hooks
            .as_ref()
            .is_some_and(|hooks| hooks.iter().any(|h| h == name))
    }
}

/// Payload shape of the host's alter-asset-tags extension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAdapter {
    /// Head under `head`; result is `{ head, body, plugin, chunks, outputName }`.
    Legacy,
    /// Head under `headTags`; every other field passed through.
    Current,
}

impl HostAdapter {
    /// Select the adapter once, at setup.
    pub fn detect(points: &ExtensionPoints) -> Result<Self> {
        if points.hooks.is_none() {
            return Ok(Self::Legacy);
        }
        if points.has_hook(CURRENT_HOOK) {
            Ok(Self::Current)
        } else if points.has_hook(LEGACY_HOOK) {
            Ok(Self::Legacy)
        } else {
            Err(InjectError::MissingHook)
        }
    }

    /// Key holding the head sequence in this host's payload.
    pub const fn head_key(self) -> &'static str {
        match self {
            Self::Legacy => "head",
            Self::Current => "headTags",
        }
    }

    /// Extension point the adapter attaches to.
    pub const fn extension_point(self, registry: bool) -> &'static str {
        match (self, registry) {
            (Self::Legacy, false) => LEGACY_EVENT,
            (Self::Legacy, true) => LEGACY_HOOK,
            (Self::Current, _) => CURRENT_HOOK,
        }
    }

    /// Host payload → snapshot.
    pub fn normalize(self, payload: Value) -> Result<DocumentSnapshot> {
        let Value::Object(mut extra) = payload else {
            return Err(InjectError::MalformedSnapshot(
                "payload is not an object".into(),
            ));
        };
        let key = self.head_key();
        let head = extra
            .remove(key)
            .ok_or_else(|| InjectError::MalformedSnapshot(format!("missing `{key}`")))?;
        let head: Vec<HeadElement> = serde_json::from_value(head)
            .map_err(|err| InjectError::MalformedSnapshot(format!("invalid `{key}`: {err}")))?;
        Ok(DocumentSnapshot { head, extra })
    }

    /// Snapshot → host payload.
    pub fn denormalize(self, snapshot: DocumentSnapshot) -> Result<Value> {
        let DocumentSnapshot { head, mut extra } = snapshot;
        let key = self.head_key();
        let head = head
            .iter()
            .map(|elem| {
                serde_json::to_value(elem).map_err(|err| {
                    InjectError::MalformedSnapshot(format!("cannot serialize `{key}`: {err}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let head = Value::Array(head);

        match self {
            Self::Legacy => {
                let mut out = Map::new();
                out.insert("head".into(), head);
                for field in LEGACY_FIELDS {
                    if let Some(value) = extra.remove(field) {
                        out.insert(field.into(), value);
                    }
                }
                Ok(Value::Object(out))
            }
            Self::Current => {
                extra.insert("headTags".into(), head);
                Ok(Value::Object(extra))
            }
        }
    }
}
