//! Errors raised by the tag transformation.

use thiserror::Error;

/// Failures surfaced to the host's build.
///
/// Every variant is fatal for the current document: there is no partial
/// result, the host reports a failed build step.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InjectError {
    #[error("The isRtl option is required.")]
    MissingDecisionLogic,

    #[error("The isRtl must be a Regexp or a function, got {0}.")]
    InvalidDecisionLogic(String),

    #[error("The modifyTag must be a function, got {0}.")]
    InvalidPostProcessor(String),

    #[error(
        "The expected HtmlWebpackPlugin hook was not found! Ensure HtmlWebpackPlugin is installed and was initialized before this plugin."
    )]
    MissingHook,

    #[error("stylesheet href `{0}` does not end in `.css`")]
    MalformedAssetReference(String),

    #[error("malformed document snapshot: {0}")]
    MalformedSnapshot(String),
}

pub type Result<T> = std::result::Result<T, InjectError>;
