//! Error types for the fronting codec.
//!
//! Every failure on the decode path is surfaced as one of the classified
//! [`DecodeError`] variants so callers can present a "no valid session" state
//! instead of crashing the hosting page.

use std::fmt;

use thiserror::Error;

/// Which of the two base64 layers failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingLayer {
    /// The layer applied last by the producer and removed first here.
    Outer,
    /// The layer wrapping the raw ciphertext.
    Inner,
}

impl fmt::Display for EncodingLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outer => f.write_str("outer"),
            Self::Inner => f.write_str("inner"),
        }
    }
}

/// Reasons a decrypted plaintext was rejected.
///
/// Decrypting with the wrong key or IV still "succeeds" in CTR mode; the
/// resulting noise is only caught here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The plaintext bytes are not valid UTF-8.
    #[error("plaintext is not valid UTF-8")]
    NotUtf8,

    /// The plaintext is not valid JSON.
    #[error("plaintext is not valid JSON: {message}")]
    NotJson {
        /// Parser error message.
        message: String,
    },

    /// The JSON value is not an object.
    #[error("payload JSON must be an object")]
    NotAnObject,

    /// A required field is absent, blank, or not a scalar.
    #[error("payload field '{field}' is missing or empty")]
    MissingField {
        /// Wire name of the field.
        field: &'static str,
    },
}

/// Errors returned by [`crate::FrontingPayloadCodec`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The caller supplied an empty or whitespace-only payload.
    #[error("encoded payload must not be empty")]
    EmptyInput,

    /// One of the two base64 layers did not decode.
    #[error("malformed {layer} base64 layer: {message}")]
    MalformedEncoding {
        /// Layer that failed.
        layer: EncodingLayer,
        /// Decoder error message.
        message: String,
    },

    /// The cipher primitive could not produce plaintext.
    #[error("decryption failed: {message}")]
    DecryptionFailed {
        /// Description of the primitive failure.
        message: String,
    },

    /// Plaintext was produced but is not a valid officer payload.
    #[error("invalid payload format: {0}")]
    InvalidPayloadFormat(#[from] PayloadError),
}

impl DecodeError {
    /// Short, stable label for the error class, safe to log.
    ///
    /// # Examples
    ///
    /// ```
    /// use fronting_codec::DecodeError;
    ///
    /// assert_eq!(DecodeError::EmptyInput.kind(), "empty_input");
    /// ```
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::MalformedEncoding { .. } => "malformed_encoding",
            Self::DecryptionFailed { .. } => "decryption_failed",
            Self::InvalidPayloadFormat(_) => "invalid_payload_format",
        }
    }
}

/// Errors raised by a keystream backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// Key or IV was not the 16 bytes AES-128-CTR requires.
    #[error("invalid {what} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// `key` or `iv`.
        what: &'static str,
        /// Required length in bytes.
        expected: usize,
        /// Supplied length in bytes.
        actual: usize,
    },

    /// The stream cipher refused to produce more keystream.
    #[error("keystream exhausted")]
    KeystreamExhausted,

    /// Every backend was tried and none produced output.
    #[error("no keystream backend succeeded: {last}")]
    NoBackend {
        /// Error reported by the last backend tried.
        last: Box<CipherError>,
    },
}

impl From<CipherError> for DecodeError {
    fn from(error: CipherError) -> Self {
        Self::DecryptionFailed {
            message: error.to_string(),
        }
    }
}
