//! Codec configuration loaded via OrthoConfig.
//!
//! Values are layered from configuration files and `FRONTING_*` environment
//! variables. Anything left unset falls back to the protocol constants the
//! host application uses in production.

use std::fmt;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::error::CipherError;
use crate::params::{CipherParams, FRONTING_IV, FRONTING_KEY};
use crate::url_param::DEFAULT_QUERY_PARAM;

/// Errors raised while turning settings into codec inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Key or IV is not 16 bytes long.
    #[error("invalid cipher configuration: {0}")]
    Cipher(#[from] CipherError),
    /// The validity window must be at least one hour.
    #[error("validity_hours must be positive, got {hours}")]
    InvalidValidity {
        /// Configured hours.
        hours: u32,
    },
}

/// Settings for the fronting codec and session cache.
#[derive(Clone, PartialEq, Eq, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FRONTING")]
pub struct CodecSettings {
    /// Key string whose raw bytes form the AES-128 key.
    pub key: Option<String>,
    /// IV string whose raw bytes form the initial counter block.
    pub iv: Option<String>,
    /// Query parameter carrying the payload.
    pub query_param: Option<String>,
    /// Hours a decoded record stays valid in the session cache.
    #[ortho_config(default = 24)]
    pub validity_hours: u32,
}

impl CodecSettings {
    /// Cipher parameters, checked to be one AES block each.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Cipher`] when the key or IV has the wrong
    /// length.
    pub fn cipher_params(&self) -> Result<CipherParams, ConfigError> {
        let params = CipherParams::new(
            self.key.as_deref().unwrap_or(FRONTING_KEY),
            self.iv.as_deref().unwrap_or(FRONTING_IV),
        );
        params.ensure_block_sized()?;
        Ok(params)
    }

    /// Return the configured query parameter, falling back to `data`.
    #[must_use]
    pub fn query_param(&self) -> &str {
        self.query_param.as_deref().unwrap_or(DEFAULT_QUERY_PARAM)
    }

    /// Return the session validity window.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValidity`] for a zero-hour window.
    pub fn validity(&self) -> Result<TimeDelta, ConfigError> {
        match self.validity_hours {
            0 => Err(ConfigError::InvalidValidity { hours: 0 }),
            hours => Ok(TimeDelta::hours(i64::from(hours))),
        }
    }
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            key: None,
            iv: None,
            query_param: None,
            validity_hours: 24,
        }
    }
}

impl fmt::Debug for CodecSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecSettings")
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("iv", &self.iv.as_ref().map(|_| "<redacted>"))
            .field("query_param", &self.query_param)
            .field("validity_hours", &self.validity_hours)
            .finish()
    }
}
