//! Base64 payload cleanup, padding repair and decoding.
//!
//! Producers of fingerprint blobs often strip trailing `=` padding, wrap lines
//! or prefix a data URL. All three are tolerated before decoding.

use crate::util::DecodeError;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, PAD};
use base64::Engine;

const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    PAD.with_decode_allow_trailing_bits(true),
);

/// Returns the number of `=` characters needed to reach a multiple of 4.
pub fn missing_padding(len: usize) -> usize {
    (4 - len % 4) % 4
}

/// Appends `=` until the payload length is a multiple of 4.
pub fn repair_padding(payload: &str) -> String {
    let pad = missing_padding(payload.len());
    let mut out = String::with_capacity(payload.len() + pad);
    out.push_str(payload);
    out.extend(std::iter::repeat('=').take(pad));
    out
}

/// Strips a `data:<mime>;base64,` prefix if present.
pub fn strip_data_url(text: &str) -> &str {
    if !text.starts_with("data:") {
        return text;
    }
    match text.find(";base64,") {
        Some(pos) => &text[pos + ";base64,".len()..],
        None => text,
    }
}

/// Decodes base64 text into raw bytes after whitespace removal and padding repair.
pub fn decode_base64_lenient(text: &str) -> Result<Vec<u8>, DecodeError> {
    let payload: String = strip_data_url(text.trim())
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if payload.is_empty() {
        return Err(DecodeError::Empty);
    }
    let repaired = repair_padding(&payload);
    LENIENT_STANDARD
        .decode(repaired.as_bytes())
        .map_err(|err| DecodeError::Padding {
            reason: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::{decode_base64_lenient, missing_padding, repair_padding, strip_data_url};
    use crate::util::DecodeError;

    #[test]
    fn missing_padding_counts() {
        assert_eq!(missing_padding(0), 0);
        assert_eq!(missing_padding(4), 0);
        assert_eq!(missing_padding(5), 3);
        assert_eq!(missing_padding(6), 2);
        assert_eq!(missing_padding(7), 1);
    }

    #[test]
    fn repair_appends_equals() {
        assert_eq!(repair_padding("QQ"), "QQ==");
        assert_eq!(repair_padding("QUI"), "QUI=");
        assert_eq!(repair_padding("QUJD"), "QUJD");
    }

    #[test]
    fn unpadded_payloads_decode_like_padded() {
        assert_eq!(decode_base64_lenient("QQ").unwrap(), b"A");
        assert_eq!(decode_base64_lenient("QQ==").unwrap(), b"A");
        assert_eq!(decode_base64_lenient("QUI").unwrap(), b"AB");
        assert_eq!(decode_base64_lenient("QUI=").unwrap(), b"AB");
    }

    #[test]
    fn partial_padding_is_completed() {
        assert_eq!(decode_base64_lenient("QQ=").unwrap(), b"A");
    }

    #[test]
    fn wrapped_and_data_url_payloads_decode() {
        assert_eq!(
            decode_base64_lenient("data:image/png;base64,QUJD\nREVG").unwrap(),
            b"ABCDEF"
        );
        assert_eq!(strip_data_url("QUJD"), "QUJD");
        assert_eq!(strip_data_url("data:text/plain,QUJD"), "data:text/plain,QUJD");
    }

    #[test]
    fn unrepairable_payload_is_padding_error() {
        let err = decode_base64_lenient("QUJDR").unwrap_err();
        assert!(matches!(err, DecodeError::Padding { .. }));
        let err = decode_base64_lenient("QU*D").unwrap_err();
        assert!(matches!(err, DecodeError::Padding { .. }));
    }

    #[test]
    fn blank_payload_is_empty() {
        assert_eq!(decode_base64_lenient("  \n").unwrap_err(), DecodeError::Empty);
    }
}
