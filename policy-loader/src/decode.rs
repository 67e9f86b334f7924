//! Payload decoding shared by every loader.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use tracing::debug;

use crate::source::Encoding;
use crate::traits::{LoaderError, LoaderResult};

/// Turns a raw payload into schema text according to `encoding`.
///
/// Base64 payloads may be wrapped across lines; ASCII whitespace is ignored.
/// A leading byte-order mark is dropped.
pub(crate) fn decode_payload(
    location: &str,
    payload: Bytes,
    encoding: Encoding,
) -> LoaderResult<String> {
    let bytes = match encoding {
        Encoding::Plain => payload.to_vec(),
        Encoding::Base64 => {
            let compact: Vec<u8> = payload
                .iter()
                .copied()
                .filter(|byte| !byte.is_ascii_whitespace())
                .collect();
            let decoded = STANDARD
                .decode(&compact)
                .map_err(|err| LoaderError::decode(location, format!("invalid base64: {err}")))?;
            debug!(
                location,
                encoded = compact.len(),
                decoded = decoded.len(),
                "decoded base64 payload"
            );
            decoded
        }
    };

    let text = String::from_utf8(bytes)
        .map_err(|err| LoaderError::decode(location, format!("payload is not UTF-8: {err}")))?;

    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_owned(),
        None => text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_passes_through() {
        let text = decode_payload("p.json", Bytes::from_static(b"[1, 2]"), Encoding::Plain).unwrap();
        assert_eq!(text, "[1, 2]");
    }

    #[test]
    fn base64_tolerates_line_wrapping() {
        // "[{'name': 'Foo'}]"
        let wrapped = Bytes::from_static(b"W3snbmFtZSc6\nICdGb28nfV0=\n");
        let text = decode_payload("p.b64", wrapped, Encoding::Base64).unwrap();
        assert_eq!(text, "[{'name': 'Foo'}]");
    }

    #[test]
    fn malformed_base64_is_a_decode_error() {
        let err = decode_payload("p.b64", Bytes::from_static(b"not*base64"), Encoding::Base64)
            .expect_err("invalid alphabet");
        assert!(matches!(err, LoaderError::Decode { .. }));
    }

    #[test]
    fn non_utf8_is_a_decode_error() {
        let err = decode_payload("p.json", Bytes::from_static(&[0xff, 0xfe, 0x00]), Encoding::Plain)
            .expect_err("invalid utf-8");
        assert!(matches!(err, LoaderError::Decode { .. }));
    }

    #[test]
    fn strips_byte_order_mark() {
        let text = decode_payload(
            "p.json",
            Bytes::from("\u{feff}{}".as_bytes().to_vec()),
            Encoding::Plain,
        )
        .unwrap();
        assert_eq!(text, "{}");
    }
}
