//! Extract the encoded payload from the URL the host application opens.

use thiserror::Error;
use url::Url;

/// Query parameter the host application uses for the payload.
pub const DEFAULT_QUERY_PARAM: &str = "data";

/// Errors raised while reading the payload out of a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlParamError {
    /// The URL could not be parsed.
    #[error("invalid URL: {message}")]
    InvalidUrl {
        /// Parser error message.
        message: String,
    },
}

/// Return the first non-empty value of `param` in `url`'s query string.
///
/// Values are form-decoded, so a literal `+` in the URL arrives here as a
/// space. [`crate::FrontingPayloadCodec::decode`] undoes that.
///
/// # Errors
///
/// Returns [`UrlParamError::InvalidUrl`] when `url` is not an absolute URL.
///
/// # Examples
///
/// ```
/// use fronting_codec::url_param::payload_from_url;
///
/// let payload = payload_from_url("https://portal.example/fronting?data=ab+cd%3D%3D", "data")
///     .expect("valid URL");
/// assert_eq!(payload.as_deref(), Some("ab cd=="));
/// ```
pub fn payload_from_url(url: &str, param: &str) -> Result<Option<String>, UrlParamError> {
    let parsed = Url::parse(url).map_err(|err| UrlParamError::InvalidUrl {
        message: err.to_string(),
    })?;
    Ok(parsed
        .query_pairs()
        .find(|(key, value)| key == param && !value.is_empty())
        .map(|(_, value)| value.into_owned()))
}
