//! Error types for the fronting CLI.

use thiserror::Error;

use crate::config::ConfigError;
use crate::error::DecodeError;
use crate::url_param::UrlParamError;

/// Errors surfaced by the CLI flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// Key, IV, or validity configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    /// The URL could not be parsed.
    #[error("url error: {0}")]
    Url(#[from] UrlParamError),
    /// The URL carried no payload parameter.
    #[error("no '{param}' query parameter in URL")]
    MissingPayload {
        /// Query parameter that was looked up.
        param: String,
    },
    /// JSON passed to `encode` is not a valid officer object.
    #[error("invalid officer JSON: {message}")]
    InvalidJson {
        /// Parser or validation message.
        message: String,
    },
    /// The decoded record could not be rendered.
    #[error("failed to render record: {message}")]
    Serialise {
        /// Serializer message.
        message: String,
    },
}
