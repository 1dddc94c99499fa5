//! # Content Digest — Content-Addressed Archive Identifiers
//!
//! Defines `ContentDigest`, the SHA-256 identity of a package archive blob.
//!
//! ## Invariant
//!
//! A digest is a pure function of the raw archive bytes. It is never cached
//! across a blob change; the archive types memoize it only because their
//! blobs are immutable after construction.
//!
//! The wire format fixes the algorithm: lowercase hex SHA-256, exactly 64
//! characters, with the first 10 characters doubling as the `digest` label
//! value on persisted package documents.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::KpkgError;

/// Number of leading hex characters surfaced as an index/label value.
pub const SHORT_HEX_LEN: usize = 10;

/// A SHA-256 content digest of a raw archive blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Compute the digest of a byte slice.
    pub fn compute(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        Self(bytes)
    }

    /// Render the digest as a lowercase hex string (64 characters).
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// The first [`SHORT_HEX_LEN`] hex characters, used as a label value.
    pub fn short_hex(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(SHORT_HEX_LEN);
        hex
    }

    /// Parse a digest from a 64-character lowercase hex string.
    pub fn from_hex(s: &str) -> Result<Self, KpkgError> {
        if s.len() != 64 {
            return Err(KpkgError::Encoding(format!(
                "digest must be 64 hex characters, got {}",
                s.len()
            )));
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk)
                .map_err(|_| KpkgError::Encoding("digest is not valid UTF-8".into()))?;
            bytes[i] = u8::from_str_radix(pair, 16)
                .map_err(|_| KpkgError::Encoding(format!("invalid hex in digest: {pair:?}")))?;
        }
        Ok(Self(bytes))
    }

    /// The raw 32-byte digest value.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Computing a digest twice on the same bytes yields identical values.
        #[test]
        fn digest_deterministic(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            prop_assert_eq!(ContentDigest::compute(&data), ContentDigest::compute(&data));
        }

        /// Hex render/parse is a lossless round trip.
        #[test]
        fn hex_round_trip(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            let digest = ContentDigest::compute(&data);
            prop_assert_eq!(ContentDigest::from_hex(&digest.to_hex()).unwrap(), digest);
        }
    }
}
