//! Content-hash codec
//!
//! Object-storage providers report content digests base64-encoded; the
//! reputation service is keyed by the lowercase hexadecimal form. The hash is
//! the sole correlation key between a submission and later verdict polls, so
//! decoding must be deterministic and must never fall back to an empty string.

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Canonical lowercase-hex content digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

#[derive(Debug, thiserror::Error)]
pub enum HashDecodeError {
    #[error("provider hash is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("provider hash decoded to an empty digest")]
    EmptyDigest,
}

impl ContentHash {
    /// Decode a provider-encoded (base64) digest into its canonical
    /// lowercase-hex form.
    ///
    /// Callers must abort routing on failure rather than query the
    /// reputation service with a degenerate key.
    pub fn from_provider_encoding(encoded: &str) -> Result<Self, HashDecodeError> {
        let raw = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
        if raw.is_empty() {
            return Err(HashDecodeError::EmptyDigest);
        }
        Ok(ContentHash(hex::encode(raw)))
    }

    /// Build from an already-hex digest (test fixtures, CLI input).
    /// Normalizes to lowercase.
    pub fn from_hex(hex_digest: &str) -> Self {
        ContentHash(hex_digest.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw digest bytes, if the stored hex is well-formed.
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        hex::decode(&self.0).ok()
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    #[test]
    fn decodes_base64_digest_to_lowercase_hex() {
        // md5("") = d41d8cd98f00b204e9800998ecf8427e
        let digest = hex::decode("d41d8cd98f00b204e9800998ecf8427e").unwrap();
        let encoded = base64::engine::general_purpose::STANDARD.encode(&digest);

        let hash = ContentHash::from_provider_encoding(&encoded).unwrap();
        assert_eq!(hash.as_str(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn decode_is_deterministic() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"0123456789abcdef");
        let a = ContentHash::from_provider_encoding(&encoded).unwrap();
        let b = ContentHash::from_provider_encoding(&encoded).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn round_trips_raw_digest_bytes() {
        let raw: Vec<u8> = (0u8..16).collect();
        let encoded = base64::engine::general_purpose::STANDARD.encode(&raw);

        let hash = ContentHash::from_provider_encoding(&encoded).unwrap();
        assert_eq!(hash.to_bytes().unwrap(), raw);

        let re_encoded =
            base64::engine::general_purpose::STANDARD.encode(hash.to_bytes().unwrap());
        assert_eq!(re_encoded, encoded);
    }

    #[test]
    fn rejects_malformed_base64() {
        let result = ContentHash::from_provider_encoding("not base64!!!");
        assert!(matches!(result, Err(HashDecodeError::InvalidBase64(_))));
    }

    #[test]
    fn rejects_empty_digest() {
        let result = ContentHash::from_provider_encoding("");
        assert!(matches!(result, Err(HashDecodeError::EmptyDigest)));
    }

    #[test]
    fn from_hex_normalizes_case() {
        let hash = ContentHash::from_hex("D41D8CD98F00B204E9800998ECF8427E");
        assert_eq!(hash.as_str(), "d41d8cd98f00b204e9800998ecf8427e");
    }
}
