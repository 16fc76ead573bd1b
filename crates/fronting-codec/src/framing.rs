//! Double base64 transport framing.
//!
//! The producer encodes the ciphertext as base64, then encodes that text as
//! base64 again. The payload then travels as a URL query parameter, where
//! form decoding may have turned literal `+` into spaces.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::error::{DecodeError, EncodingLayer};

/// Standard alphabet, padded on encode, padding optional on decode.
///
/// Browsers' `atob` accepts unpadded input, so the host may strip `=`.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Undo URL form decoding of `+` and strip surrounding whitespace.
///
/// Only literal spaces are replaced, so applying this twice is the same as
/// applying it once.
///
/// # Examples
///
/// ```
/// use fronting_codec::framing::sanitize;
///
/// assert_eq!(sanitize("ab cd=="), "ab+cd==");
/// assert_eq!(sanitize("\nabcd\n"), "abcd");
/// ```
#[must_use]
pub fn sanitize(encoded: &str) -> String {
    encoded.replace(' ', "+").trim().to_owned()
}

/// Remove both base64 layers from an already sanitized payload.
///
/// # Errors
///
/// Returns [`DecodeError::MalformedEncoding`] naming the layer that failed.
/// Outer output that is not UTF-8 is reported against the inner layer, since
/// it can not be inner base64 text.
pub fn decode_layers(sanitized: &str) -> Result<Vec<u8>, DecodeError> {
    let outer = STANDARD_LENIENT
        .decode(sanitized)
        .map_err(|err| malformed(EncodingLayer::Outer, &err))?;
    let inner_text =
        String::from_utf8(outer).map_err(|err| malformed(EncodingLayer::Inner, &err))?;
    STANDARD_LENIENT
        .decode(inner_text.trim())
        .map_err(|err| malformed(EncodingLayer::Inner, &err))
}

/// Apply both base64 layers to raw ciphertext, outer layer last.
#[must_use]
pub fn encode_layers(ciphertext: &[u8]) -> String {
    let inner = STANDARD_LENIENT.encode(ciphertext);
    STANDARD_LENIENT.encode(inner.as_bytes())
}

/// Decode a single standard base64 layer.
///
/// # Errors
///
/// Returns [`DecodeError::MalformedEncoding`] for the outer layer.
pub fn decode_single(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    STANDARD_LENIENT
        .decode(encoded)
        .map_err(|err| malformed(EncodingLayer::Outer, &err))
}

fn malformed(layer: EncodingLayer, err: &dyn std::error::Error) -> DecodeError {
    DecodeError::MalformedEncoding {
        layer,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    //! Framing behaviour independent of the cipher.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("abcd", "abcd")]
    #[case("a b c", "a+b+c")]
    #[case("\tabcd\r\n", "abcd")]
    #[case(" abcd", "+abcd")]
    #[case("+/8=", "+/8=")]
    #[case("", "")]
    fn sanitize_replaces_spaces_and_trims(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(sanitize(raw), expected);
    }

    #[rstest]
    #[case("a b c")]
    #[case(" +x y+ ")]
    #[case("no-spaces")]
    fn sanitize_is_idempotent(#[case] raw: &str) {
        let once = sanitize(raw);
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn spaces_in_place_of_plus_decode_like_the_original() {
        // 0xfb 0xff encodes to "+/8=", a layer that actually carries a '+'.
        let original = decode_single("+/8=").expect("clean input decodes");
        let corrupted = decode_single(&sanitize(" /8=")).expect("sanitized input decodes");
        assert_eq!(original, vec![0xfb, 0xff]);
        assert_eq!(corrupted, original);
    }

    #[test]
    fn layers_round_trip() {
        let ciphertext = [0_u8, 1, 2, 0xfe, 0xff, 0x7f];
        let framed = encode_layers(&ciphertext);
        assert_eq!(
            decode_layers(&framed).expect("framed bytes decode"),
            ciphertext
        );
    }

    #[test]
    fn unpadded_layers_are_accepted() {
        // base64(base64([1, 2])) == base64("AQI=") == "QVFJPQ=="
        assert_eq!(decode_layers("QVFJPQ").expect("unpadded decodes"), vec![1, 2]);
    }

    #[test]
    fn invalid_outer_layer_is_reported() {
        let err = decode_layers("not base64!!").expect_err("must fail");
        assert!(matches!(
            err,
            DecodeError::MalformedEncoding {
                layer: EncodingLayer::Outer,
                ..
            }
        ));
    }

    #[rstest]
    // base64("not*base64")
    #[case("bm90KmJhc2U2NA==")]
    // base64([0xff, 0xfe]) is not UTF-8 text.
    #[case("//4=")]
    fn invalid_inner_layer_is_reported(#[case] framed: &str) {
        let err = decode_layers(framed).expect_err("must fail");
        assert!(matches!(
            err,
            DecodeError::MalformedEncoding {
                layer: EncodingLayer::Inner,
                ..
            }
        ));
    }
}
