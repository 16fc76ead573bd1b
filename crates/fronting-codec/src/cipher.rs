//! AES-128-CTR keystream backends.
//!
//! CTR mode is symmetric, so the same operation encrypts and decrypts. The
//! scheme carries no authentication tag: corruption is only ever noticed
//! when the plaintext fails to parse.
//!
//! Two interchangeable backends exist. [`CtrBackend::Stream`] drives the
//! `ctr` crate's stream cipher; [`CtrBackend::Block`] runs the counter loop
//! directly over the AES block primitive. They are tried in
//! [`CtrBackend::PREFERENCE`] order and must agree byte for byte whenever both
//! succeed.

use std::fmt;

use aes::Aes128;
use aes::cipher::{BlockEncrypt, KeyInit, KeyIvInit, StreamCipher};
use tracing::warn;

use crate::error::CipherError;
use crate::params::{BLOCK_LEN, CipherParams, check_len};

type Aes128Ctr = ctr::Ctr128BE<Aes128>;

/// Keystream implementation used for a decrypt or encrypt call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtrBackend {
    /// `ctr::Ctr128BE` over `aes::Aes128`.
    Stream,
    /// Software counter loop over the AES block primitive.
    Block,
}

impl CtrBackend {
    /// Order in which backends are attempted.
    pub const PREFERENCE: [Self; 2] = [Self::Stream, Self::Block];

    /// XOR the keystream for `params` into `data` in place.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError`] if the key or IV is rejected or the keystream
    /// can not cover `data`.
    pub fn apply(self, params: &CipherParams, data: &mut [u8]) -> Result<(), CipherError> {
        match self {
            Self::Stream => apply_stream(params, data),
            Self::Block => apply_block(params, data),
        }
    }
}

impl fmt::Display for CtrBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream => f.write_str("stream"),
            Self::Block => f.write_str("block"),
        }
    }
}

/// Apply the keystream with the first backend that accepts the input.
///
/// On success `data` holds the transformed bytes and the backend that
/// produced them is returned. A failing backend leaves `data` untouched, so
/// the next one sees the original input.
///
/// # Errors
///
/// Returns [`CipherError::NoBackend`] wrapping the last backend's error when
/// none succeeds.
///
/// # Examples
///
/// ```
/// use fronting_codec::CipherParams;
/// use fronting_codec::cipher::{CtrBackend, apply_keystream};
///
/// let params = CipherParams::fronting();
/// let mut data = b"hello".to_vec();
/// let backend = apply_keystream(&params, &mut data).expect("keystream applies");
/// assert_eq!(backend, CtrBackend::Stream);
/// apply_keystream(&params, &mut data).expect("keystream applies");
/// assert_eq!(data, b"hello");
/// ```
pub fn apply_keystream(params: &CipherParams, data: &mut [u8]) -> Result<CtrBackend, CipherError> {
    apply_with(&CtrBackend::PREFERENCE, params, data)
}

pub(crate) fn apply_with(
    backends: &[CtrBackend],
    params: &CipherParams,
    data: &mut [u8],
) -> Result<CtrBackend, CipherError> {
    let mut last = CipherError::KeystreamExhausted;
    for &backend in backends {
        let mut scratch = data.to_vec();
        match backend.apply(params, &mut scratch) {
            Ok(()) => {
                data.copy_from_slice(&scratch);
                return Ok(backend);
            }
            Err(error) => {
                warn!(%backend, error = %error, "keystream backend unavailable; trying next");
                last = error;
            }
        }
    }
    Err(CipherError::NoBackend {
        last: Box::new(last),
    })
}

fn apply_stream(params: &CipherParams, data: &mut [u8]) -> Result<(), CipherError> {
    check_len("key", params.key())?;
    check_len("iv", params.iv())?;
    let mut cipher = Aes128Ctr::new_from_slices(params.key(), params.iv()).map_err(|_| {
        CipherError::InvalidLength {
            what: "key",
            expected: BLOCK_LEN,
            actual: params.key().len(),
        }
    })?;
    cipher
        .try_apply_keystream(data)
        .map_err(|_| CipherError::KeystreamExhausted)
}

#[expect(
    clippy::big_endian_bytes,
    reason = "the CTR counter block is a big-endian integer"
)]
fn apply_block(params: &CipherParams, data: &mut [u8]) -> Result<(), CipherError> {
    check_len("iv", params.iv())?;
    let cipher = Aes128::new_from_slice(params.key()).map_err(|_| CipherError::InvalidLength {
        what: "key",
        expected: BLOCK_LEN,
        actual: params.key().len(),
    })?;
    let mut counter = initial_counter(params.iv())?;
    for chunk in data.chunks_mut(BLOCK_LEN) {
        let mut block = aes::Block::from(counter.to_be_bytes());
        cipher.encrypt_block(&mut block);
        for (byte, pad) in chunk.iter_mut().zip(block.iter()) {
            *byte ^= pad;
        }
        counter = counter.wrapping_add(1);
    }
    Ok(())
}

#[expect(
    clippy::big_endian_bytes,
    reason = "the CTR counter block is a big-endian integer"
)]
fn initial_counter(iv: &[u8]) -> Result<u128, CipherError> {
    let bytes: [u8; BLOCK_LEN] = iv.try_into().map_err(|_| CipherError::InvalidLength {
        what: "iv",
        expected: BLOCK_LEN,
        actual: iv.len(),
    })?;
    Ok(u128::from_be_bytes(bytes))
}
