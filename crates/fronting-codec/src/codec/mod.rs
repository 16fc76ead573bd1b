//! Decode (and, for fixtures and tooling, produce) fronting payloads.
//!
//! A payload is `base64(base64(aes128_ctr(json)))`, handed over as a URL
//! query parameter. [`FrontingPayloadCodec::decode`] reverses that in a fixed
//! order, short-circuiting on the first failure:
//!
//! 1. sanitize (spaces back to `+`, trim);
//! 2. outer base64;
//! 3. inner base64;
//! 4. AES-128-CTR with the configured key and initial counter block;
//! 5. UTF-8 and trim;
//! 6. JSON;
//! 7. required fields;
//! 8. stamp `retrieved_at`.
//!
//! Nothing on this path logs plaintext or key material.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use serde_json::Value;
use tracing::debug;

use crate::cipher::{CtrBackend, apply_with};
use crate::error::{DecodeError, PayloadError};
use crate::framing::{decode_layers, encode_layers, sanitize};
use crate::params::CipherParams;
use crate::record::{OfficerRecord, parse_plaintext};

/// Stateless decoder for officer payloads.
///
/// Holds only immutable configuration, so one instance may be shared across
/// threads and called concurrently.
///
/// # Examples
///
/// ```
/// use fronting_codec::{CipherParams, FrontingPayloadCodec, OfficerRecord};
///
/// let codec = FrontingPayloadCodec::with_default_clock(CipherParams::fronting());
/// let payload = codec
///     .encode_plaintext(r#"{"nippos":"991406965","name":"CEPI YUDI AFRIZAL"}"#)
///     .expect("encode");
/// let record = codec.decode(&payload).expect("decode");
/// assert_eq!(record.identifier, "991406965");
/// ```
#[derive(Clone)]
pub struct FrontingPayloadCodec {
    params: CipherParams,
    clock: Arc<dyn Clock>,
    backends: Vec<CtrBackend>,
}

impl FrontingPayloadCodec {
    /// Build a codec around explicit cipher parameters and a clock.
    #[must_use]
    pub fn new(params: CipherParams, clock: Arc<dyn Clock>) -> Self {
        Self {
            params,
            clock,
            backends: CtrBackend::PREFERENCE.to_vec(),
        }
    }

    /// Build a codec that stamps records with the system clock.
    #[must_use]
    pub fn with_default_clock(params: CipherParams) -> Self {
        Self::new(params, Arc::new(DefaultClock))
    }

    /// Restrict or reorder the keystream backends tried on each call.
    #[must_use]
    pub fn with_backends(mut self, backends: &[CtrBackend]) -> Self {
        self.backends = backends.to_vec();
        self
    }

    /// Cipher parameters in use.
    #[must_use]
    pub const fn params(&self) -> &CipherParams {
        &self.params
    }

    /// Decode an encoded payload into a validated [`OfficerRecord`].
    ///
    /// # Errors
    ///
    /// - [`DecodeError::EmptyInput`] for empty or whitespace-only input.
    /// - [`DecodeError::MalformedEncoding`] when either base64 layer fails.
    /// - [`DecodeError::DecryptionFailed`] when no keystream backend accepts
    ///   the key and IV.
    /// - [`DecodeError::InvalidPayloadFormat`] when the plaintext is not a JSON
    ///   object with non-empty `name` and `nippos`. This is also what a wrong
    ///   key or IV looks like, since CTR decryption always yields bytes.
    pub fn decode(&self, encoded: &str) -> Result<OfficerRecord, DecodeError> {
        let decrypted = self.decrypt(encoded)?;
        let plaintext = decrypted.plaintext()?;
        let value = parse_plaintext(plaintext)?;
        let record = self.record_from_wire(&value)?;
        debug!(
            payload_len = encoded.len(),
            ciphertext_len = decrypted.ciphertext_len,
            backend = %decrypted.backend,
            "fronting payload decoded"
        );
        Ok(record)
    }

    /// Sanitise, unframe, and decrypt `encoded`, returning the raw bytes.
    ///
    /// Used by diagnostics that need layer sizes without parsing.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Self::decode`] up to and including
    /// decryption.
    pub fn decrypt(&self, encoded: &str) -> Result<Decrypted, DecodeError> {
        if encoded.trim().is_empty() {
            return Err(DecodeError::EmptyInput);
        }
        let sanitized = sanitize(encoded);
        let ciphertext = decode_layers(&sanitized).inspect_err(|err| {
            debug!(payload_len = encoded.len(), kind = err.kind(), "payload framing rejected");
        })?;
        self.decrypt_ciphertext(ciphertext)
    }

    /// Apply the keystream to ciphertext whose framing was already removed.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::DecryptionFailed`] when no keystream backend
    /// accepts the key and IV.
    pub fn decrypt_ciphertext(&self, ciphertext: Vec<u8>) -> Result<Decrypted, DecodeError> {
        let mut bytes = ciphertext;
        let ciphertext_len = bytes.len();
        let backend = apply_with(&self.backends, &self.params, &mut bytes)?;
        Ok(Decrypted {
            bytes,
            ciphertext_len,
            backend,
        })
    }

    /// Validate a parsed wire object and stamp it with this codec's clock.
    ///
    /// # Errors
    ///
    /// Returns the [`PayloadError`] describing why `value` is not an officer
    /// record.
    pub fn record_from_wire(&self, value: &Value) -> Result<OfficerRecord, PayloadError> {
        OfficerRecord::from_wire(value, self.clock.utc())
    }

    /// Produce the payload the host application would send for `record`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::DecryptionFailed`] when the cipher parameters
    /// are rejected.
    pub fn encode(&self, record: &OfficerRecord) -> Result<String, DecodeError> {
        self.encode_plaintext(&record.to_wire_json().to_string())
    }

    /// Encrypt and frame arbitrary plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::DecryptionFailed`] when the cipher parameters
    /// are rejected.
    pub fn encode_plaintext(&self, plaintext: &str) -> Result<String, DecodeError> {
        let mut bytes = plaintext.as_bytes().to_vec();
        apply_with(&self.backends, &self.params, &mut bytes)?;
        Ok(encode_layers(&bytes))
    }
}

impl std::fmt::Debug for FrontingPayloadCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrontingPayloadCodec")
            .field("params", &self.params)
            .field("backends", &self.backends)
            .finish_non_exhaustive()
    }
}

/// Output of the decrypt step, before any parsing.
#[derive(Clone, PartialEq, Eq)]
pub struct Decrypted {
    bytes: Vec<u8>,
    ciphertext_len: usize,
    backend: CtrBackend,
}

impl Decrypted {
    /// Number of ciphertext bytes after both base64 layers.
    #[must_use]
    pub const fn ciphertext_len(&self) -> usize {
        self.ciphertext_len
    }

    /// Backend that produced the plaintext.
    #[must_use]
    pub const fn backend(&self) -> CtrBackend {
        self.backend
    }

    /// Decrypted bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decrypted bytes as trimmed UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::NotUtf8`] for non-UTF-8 output.
    pub fn plaintext(&self) -> Result<&str, PayloadError> {
        std::str::from_utf8(&self.bytes)
            .map(str::trim)
            .map_err(|_| PayloadError::NotUtf8)
    }
}

impl std::fmt::Debug for Decrypted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decrypted")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("ciphertext_len", &self.ciphertext_len)
            .field("backend", &self.backend)
            .finish()
    }
}
