//! Error types shared by the codec, the proof engine boundary and configuration.

use thiserror::Error;

/// Failure to turn wire bytes or hex strings into protocol values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("truncated input: need {needed} bytes, have {available}")]
    TruncatedInput { needed: usize, available: usize },
}

impl CodecError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        CodecError::MalformedInput(msg.into())
    }
}

/// Outcome of a proof engine call that did not succeed.
///
/// `Rejected` is the ordinary "this proof does not verify" answer; `Internal`
/// means the engine itself could not do its job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("proof rejected: {0}")]
    Rejected(&'static str),
    #[error("proof engine failure: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}
