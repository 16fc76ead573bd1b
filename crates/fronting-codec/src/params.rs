//! Key and initial counter block for the fronting cipher.
//!
//! The producer uses the raw bytes of two fixed 16-character strings as the
//! AES-128 key and the initial CTR counter block. No key derivation happens
//! on either side, and the pair never changes between messages, so the
//! keystream is reused across every payload. That weakness belongs to the
//! producer's wire format and is kept here for interoperability.

use std::fmt;

use zeroize::Zeroizing;

use crate::error::CipherError;

/// AES-128 key length and CTR block length in bytes.
pub const BLOCK_LEN: usize = 16;

/// Key string shared with the host application.
pub const FRONTING_KEY: &str = "KEYSMMFR23012026";

/// Initial counter block string shared with the host application.
pub const FRONTING_IV: &str = "XIVMMFRI23012026";

/// Key and IV bytes handed to the codec at construction time.
///
/// Lengths are not checked on construction. Use
/// [`CipherParams::ensure_block_sized`] when loading configuration; the codec
/// itself reports a wrong length as a decryption failure.
///
/// # Examples
///
/// ```
/// use fronting_codec::CipherParams;
///
/// let params = CipherParams::fronting();
/// assert!(params.ensure_block_sized().is_ok());
/// assert!(!format!("{params:?}").contains("KEYS"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct CipherParams {
    key: Zeroizing<Vec<u8>>,
    iv: Vec<u8>,
}

impl CipherParams {
    /// Use the raw bytes of `key` and `iv` verbatim.
    #[must_use]
    pub fn new(key: impl AsRef<[u8]>, iv: impl AsRef<[u8]>) -> Self {
        Self {
            key: Zeroizing::new(key.as_ref().to_vec()),
            iv: iv.as_ref().to_vec(),
        }
    }

    /// Protocol constants used by the production host application.
    #[must_use]
    pub fn fronting() -> Self {
        Self::new(FRONTING_KEY, FRONTING_IV)
    }

    /// Key bytes.
    #[must_use]
    pub fn key(&self) -> &[u8] {
        self.key.as_slice()
    }

    /// Initial counter block bytes.
    #[must_use]
    pub fn iv(&self) -> &[u8] {
        self.iv.as_slice()
    }

    /// Check that both key and IV are exactly one AES block long.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidLength`] naming the first offending value.
    pub fn ensure_block_sized(&self) -> Result<(), CipherError> {
        check_len("key", self.key())?;
        check_len("iv", self.iv())
    }
}

impl Default for CipherParams {
    fn default() -> Self {
        Self::fronting()
    }
}

impl fmt::Debug for CipherParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherParams")
            .field("key", &format_args!("<{} bytes redacted>", self.key.len()))
            .field("iv", &format_args!("<{} bytes redacted>", self.iv.len()))
            .finish()
    }
}

pub(crate) const fn check_len(what: &'static str, bytes: &[u8]) -> Result<(), CipherError> {
    if bytes.len() == BLOCK_LEN {
        Ok(())
    } else {
        Err(CipherError::InvalidLength {
            what,
            expected: BLOCK_LEN,
            actual: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn protocol_constants_are_one_block_each() {
        assert_eq!(FRONTING_KEY.len(), BLOCK_LEN);
        assert_eq!(FRONTING_IV.len(), BLOCK_LEN);
        assert_eq!(CipherParams::default(), CipherParams::fronting());
    }

    #[test]
    fn raw_string_bytes_are_used_verbatim() {
        let params = CipherParams::fronting();
        assert_eq!(params.key(), b"KEYSMMFR23012026");
        assert_eq!(params.iv(), b"XIVMMFRI23012026");
    }

    #[rstest]
    #[case("short", FRONTING_IV, "key", 5)]
    #[case(FRONTING_KEY, "XIVMMFRI230120261", "iv", 17)]
    fn wrong_lengths_are_reported(
        #[case] key: &str,
        #[case] iv: &str,
        #[case] what: &'static str,
        #[case] actual: usize,
    ) {
        let err = CipherParams::new(key, iv)
            .ensure_block_sized()
            .expect_err("length mismatch must fail");
        assert_eq!(
            err,
            CipherError::InvalidLength {
                what,
                expected: BLOCK_LEN,
                actual,
            }
        );
    }

    #[test]
    fn debug_output_hides_key_material() {
        let rendered = format!("{:?}", CipherParams::fronting());
        assert!(!rendered.contains(FRONTING_KEY));
        assert!(!rendered.contains(FRONTING_IV));
        assert!(rendered.contains("16 bytes redacted"));
    }
}
