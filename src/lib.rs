//! RTL stylesheet injection for generated HTML heads.
//!
//! Base stylesheet links (`*.css`, not `*.rtl.css`) are removed from a
//! document head and replaced by one inline script that recreates them in
//! the browser, picking `base.css` or `base.rtl.css` per visitor.
//!
//! ```text
//! host payload ─► host::HostAdapter ─► pipeline::process ─► host payload
//!                                           │
//!                     config::InjectConfig ─┘ (capsule + embed)
//! ```

pub mod logger;

pub mod capsule;
pub mod cli;
pub mod config;
pub mod embed;
pub mod error;
pub mod host;
pub mod pipeline;
pub mod tag;
pub mod utils;

pub use config::{AlternatePolicy, InjectConfig, RawOptions};
pub use error::{InjectError, Result};
pub use host::{ExtensionPoints, HostAdapter, RtlInjectPlugin};
pub use pipeline::{DocumentSnapshot, process};
pub use tag::{Attrs, HeadElement};
