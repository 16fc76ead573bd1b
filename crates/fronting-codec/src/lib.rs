//! Decoder for the encrypted officer payload handed to the fronting portal.
//!
//! The POS officer portal runs inside a WebView of the host mobile app. The
//! host appends the signed-in officer to the portal URL as a query parameter
//! holding `base64(base64(aes128_ctr(json)))`. This crate turns that string
//! back into an [`OfficerRecord`] or a classified [`DecodeError`].
//!
//! # Overview
//!
//! - [`FrontingPayloadCodec`] performs the decode (and, for tooling, the
//!   inverse encode) with explicit [`CipherParams`].
//! - [`cipher`] holds the two interchangeable AES-128-CTR keystream backends.
//! - [`session`] keeps the decoded record for a 24-hour validity window.
//! - [`url_param`] extracts the payload from the portal URL.
//! - [`CodecSettings`] loads key, IV, and session settings from the
//!   environment.
//!
//! The scheme has no authentication and reuses one key/IV pair for every
//! message. It is implemented as-is for compatibility with the host app.
//!
//! # Example
//!
//! ```
//! use fronting_codec::{CipherParams, FrontingPayloadCodec};
//!
//! let codec = FrontingPayloadCodec::with_default_clock(CipherParams::fronting());
//! let payload = concat!(
//!     "SlNmcXE3QlRyZ3kvUWRDRVVCbjE0RENQVUkzY011ZFAyMENGYVBQaENJYmFJcXhyL09FZkxncDdYeWtGaGlBZjVQL1ZL",
//!     "MGtFdnIzQ01meHQvOURzV1R0SUVRb25CdkZYTkNJV0FSY216bTlCQ3pGSWswZGVreU02VTZld2Jyb3FjZDZ3ODczU3pH",
//!     "MzhXd0lZOTFHMlJjam5heE1PNzNDZzZneXZUdVB1ODkweXloTEtJTGRTcDVNWUNOOGdrYk9PcW11YmZEWnhrTEZwR1BB",
//!     "TE1BYmR3Nms9",
//! );
//!
//! let record = codec.decode(payload).expect("valid payload");
//! assert_eq!(record.identifier, "991406965");
//! assert_eq!(record.name, "CEPI YUDI AFRIZAL");
//! ```

pub mod cipher;
pub mod cli;
mod codec;
mod config;
mod error;
pub mod framing;
mod params;
mod record;
pub mod session;
pub mod url_param;

pub use codec::{Decrypted, FrontingPayloadCodec};
pub use config::{CodecSettings, ConfigError};
pub use error::{CipherError, DecodeError, EncodingLayer, PayloadError};
pub use params::{BLOCK_LEN, CipherParams, FRONTING_IV, FRONTING_KEY};
pub use record::{
    ACCOUNT_NUMBER_KEY, BRANCH_GROUP_NAME_KEY, BRANCH_NAME_KEY, IDENTIFIER_KEY, NAME_KEY,
    OfficerRecord, ROLE_KEY, parse_plaintext,
};
