//! Caller-side persistence for decoded officer records.
//!
//! The portal keeps the last decoded record in a single session slot and
//! treats it as valid for a fixed window after `retrieved_at`. The codec
//! itself stays stateless; this module is what sits around it.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::{debug, warn};

use crate::codec::FrontingPayloadCodec;
use crate::config::{CodecSettings, ConfigError};
use crate::error::DecodeError;
use crate::record::OfficerRecord;

/// How long a decoded record stays usable.
pub const DEFAULT_VALIDITY: TimeDelta = TimeDelta::hours(24);

/// Whether a record stamped at `retrieved_at` has expired at `now`.
///
/// Expiry is inclusive: a record is expired once exactly `validity` has
/// passed.
///
/// # Examples
///
/// ```
/// use chrono::{TimeDelta, Utc};
/// use fronting_codec::session::{DEFAULT_VALIDITY, is_expired};
///
/// let stamped = Utc::now();
/// assert!(!is_expired(stamped, stamped + TimeDelta::hours(23), DEFAULT_VALIDITY));
/// assert!(is_expired(stamped, stamped + TimeDelta::hours(24), DEFAULT_VALIDITY));
/// ```
#[must_use]
pub fn is_expired(retrieved_at: DateTime<Utc>, now: DateTime<Utc>, validity: TimeDelta) -> bool {
    now - retrieved_at >= validity
}

/// A single string slot, such as browser local storage or a cookie.
pub trait SessionStore: Send + Sync {
    /// Current slot contents, if any.
    fn load(&self) -> Option<String>;
    /// Replace the slot contents.
    fn save(&self, value: String);
    /// Empty the slot.
    fn clear(&self);
}

/// In-process [`SessionStore`].
#[derive(Debug, Default)]
pub struct MemorySessionStore(Mutex<Option<String>>);

impl MemorySessionStore {
    fn lock_slot(&self) -> MutexGuard<'_, Option<String>> {
        // Poisoning can not leave a half-written `Option<String>` behind.
        self.0
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<String> {
        self.lock_slot().clone()
    }

    fn save(&self, value: String) {
        *self.lock_slot() = Some(value);
    }

    fn clear(&self) {
        *self.lock_slot() = None;
    }
}

/// Keeps the most recent officer record in a [`SessionStore`].
pub struct OfficerSessionCache<S> {
    store: S,
    clock: Arc<dyn Clock>,
    validity: TimeDelta,
}

impl<S: SessionStore> OfficerSessionCache<S> {
    /// Wrap `store` with the default 24-hour validity window.
    #[must_use]
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            validity: DEFAULT_VALIDITY,
        }
    }

    /// Wrap `store` with the validity window from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValidity`] when the configured window is
    /// zero hours.
    pub fn from_settings(
        store: S,
        clock: Arc<dyn Clock>,
        settings: &CodecSettings,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(store, clock).with_validity(settings.validity()?))
    }

    /// Override the validity window.
    #[must_use]
    pub fn with_validity(mut self, validity: TimeDelta) -> Self {
        self.validity = validity;
        self
    }

    /// Underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Save `record` as the current session.
    pub fn persist(&self, record: &OfficerRecord) {
        match serde_json::to_string(record) {
            Ok(json) => self.store.save(json),
            Err(error) => warn!(error = %error, "failed to serialise officer session"),
        }
    }

    /// Return the stored record if it is readable and still valid.
    ///
    /// Expired or unreadable entries are cleared.
    #[must_use]
    pub fn current(&self) -> Option<OfficerRecord> {
        let raw = self.store.load()?;
        let record = match serde_json::from_str::<OfficerRecord>(&raw) {
            Ok(record) => record,
            Err(error) => {
                warn!(error = %error, "discarding unreadable officer session");
                self.store.clear();
                return None;
            }
        };
        if is_expired(record.retrieved_at, self.clock.utc(), self.validity) {
            debug!(retrieved_at = %record.retrieved_at, "officer session expired");
            self.store.clear();
            return None;
        }
        Some(record)
    }

    /// Drop the stored record.
    pub fn clear(&self) {
        self.store.clear();
    }

    /// Resolve the officer for a page load.
    ///
    /// A fresh `encoded` payload always wins: it is decoded and persisted,
    /// replacing whatever was stored. Without one, the stored record is used
    /// if still valid.
    ///
    /// # Errors
    ///
    /// Returns the codec's [`DecodeError`] when a payload was supplied and
    /// failed to decode. The stored session is left untouched in that case.
    pub fn establish(
        &self,
        codec: &FrontingPayloadCodec,
        encoded: Option<&str>,
    ) -> Result<Option<OfficerRecord>, DecodeError> {
        let Some(encoded) = encoded.filter(|value| !value.trim().is_empty()) else {
            return Ok(self.current());
        };
        let record = codec.decode(encoded).inspect_err(|err| {
            warn!(kind = err.kind(), "fronting payload rejected");
        })?;
        self.persist(&record);
        Ok(Some(record))
    }
}

impl<S> std::fmt::Debug for OfficerSessionCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfficerSessionCache")
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}
