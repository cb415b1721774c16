//! Wire codec for the three-segment credential format.
//!
//! Pure data transformation: splitting the compact string and
//! base64url-decoding its segments. A successful decode only proves the
//! credential is well-formed; it implies no trust whatsoever.

use crate::error::TokenError;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// A structurally valid (but unverified) credential.
#[derive(Debug, Clone)]
pub struct DecodedToken {
    /// Header segment as transmitted (base64url text).
    pub header_seg: String,
    /// Payload segment as transmitted (base64url text).
    pub payload_seg: String,
    /// Signature segment as transmitted (base64url text).
    pub signature_seg: String,
    /// Decoded header bytes (JSON).
    pub header: Vec<u8>,
    /// Decoded payload bytes (JSON). Untrusted until verified.
    pub payload: Vec<u8>,
}

/// Split a compact credential into its segments and decode them.
///
/// Fails with [`TokenError::Malformed`] unless the input is exactly
/// three non-empty dot-separated segments with header and payload
/// decoding as base64url. Padding characters are tolerated on input
/// even though credentials are transmitted without them.
pub fn decode(token: &str) -> Result<DecodedToken, TokenError> {
    let mut parts = token.split('.');
    let (Some(header_seg), Some(payload_seg), Some(signature_seg), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Malformed);
    };

    if header_seg.is_empty() || payload_seg.is_empty() || signature_seg.is_empty() {
        return Err(TokenError::Malformed);
    }

    let header = decode_segment(header_seg)?;
    let payload = decode_segment(payload_seg)?;
    // The signature segment is never decoded here: verification compares
    // it in encoded form, and rejecting it early (e.g. on stray trailing
    // bits) would misreport a tampered signature as malformed.

    Ok(DecodedToken {
        header_seg: header_seg.to_string(),
        payload_seg: payload_seg.to_string(),
        signature_seg: signature_seg.to_string(),
        header,
        payload,
    })
}

/// Decode one base64url segment, tolerating trailing padding.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenError> {
    URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|_| TokenError::Malformed)
}

/// Encode raw bytes as an unpadded base64url segment.
pub fn encode_segment(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_well_formed() {
        let token = format!(
            "{}.{}.{}",
            encode_segment(br#"{"alg":"HS256","typ":"JWT"}"#),
            encode_segment(br#"{"email":"a@b.c"}"#),
            encode_segment(&[0u8; 32]),
        );
        let decoded = decode(&token).unwrap();
        assert_eq!(decoded.header, br#"{"alg":"HS256","typ":"JWT"}"#);
        assert_eq!(decoded.payload, br#"{"email":"a@b.c"}"#);
    }

    #[test]
    fn test_decode_two_segments_is_malformed() {
        assert!(matches!(decode("abc.def"), Err(TokenError::Malformed)));
    }

    #[test]
    fn test_decode_four_segments_is_malformed() {
        assert!(matches!(decode("a.b.c.d"), Err(TokenError::Malformed)));
    }

    #[test]
    fn test_decode_empty_segment_is_malformed() {
        assert!(matches!(decode("a..c"), Err(TokenError::Malformed)));
        assert!(matches!(decode(".b.c"), Err(TokenError::Malformed)));
        assert!(matches!(decode("a.b."), Err(TokenError::Malformed)));
    }

    #[test]
    fn test_decode_invalid_base64_is_malformed() {
        assert!(matches!(decode("!!!.def.ghi"), Err(TokenError::Malformed)));
    }

    #[test]
    fn test_decode_segment_tolerates_padding() {
        // "hi" encodes to "aGk" unpadded, "aGk=" padded.
        assert_eq!(decode_segment("aGk").unwrap(), b"hi");
        assert_eq!(decode_segment("aGk=").unwrap(), b"hi");
    }

    #[test]
    fn test_segment_roundtrip_has_no_padding() {
        let encoded = encode_segment(b"hi");
        assert!(!encoded.contains('='));
        assert_eq!(decode_segment(&encoded).unwrap(), b"hi");
    }
}
