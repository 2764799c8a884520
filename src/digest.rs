//! Digest strategies.
//!
//! [`Md5Sum`](crate::elements::Md5Sum) hashes each buffer through a boxed
//! [`DigestAlgorithm`]. MD5 is the default and is kept for compatibility
//! with existing tooling, not for collision resistance; pick [`Blake3`] when
//! that matters.

use crate::error::{Error, Result};
use md5::{Digest as _, Md5 as Md5Hasher};
use std::str::FromStr;

/// A hash function that renders its output as a hex string.
pub trait DigestAlgorithm: Send + Sync {
    /// Short lowercase identifier (`"md5"`, `"blake3"`).
    fn name(&self) -> &'static str;

    /// Hash `data` and return the canonical lowercase hex digest.
    fn digest(&self, data: &[u8]) -> String;

    /// Length of the hex string [`digest`](Self::digest) returns.
    fn hex_len(&self) -> usize;
}

/// MD5 (RFC 1321). 32 hex characters.
///
/// ```rust
/// use md5sum::digest::{DigestAlgorithm, Md5};
///
/// assert_eq!(Md5.digest(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5;

impl DigestAlgorithm for Md5 {
    fn name(&self) -> &'static str {
        "md5"
    }

    fn digest(&self, data: &[u8]) -> String {
        hex::encode(Md5Hasher::digest(data))
    }

    fn hex_len(&self) -> usize {
        32
    }
}

/// BLAKE3 with the default 256-bit output. 64 hex characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3;

impl DigestAlgorithm for Blake3 {
    fn name(&self) -> &'static str {
        "blake3"
    }

    fn digest(&self, data: &[u8]) -> String {
        hex::encode(blake3::hash(data).as_bytes())
    }

    fn hex_len(&self) -> usize {
        64
    }
}

/// Algorithm selector used by the `algorithm` property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DigestKind {
    /// [`Md5`].
    #[default]
    Md5,
    /// [`Blake3`].
    Blake3,
}

impl DigestKind {
    /// Every supported kind.
    pub const ALL: [DigestKind; 2] = [DigestKind::Md5, DigestKind::Blake3];

    /// Instantiate the strategy.
    pub fn algorithm(self) -> Box<dyn DigestAlgorithm> {
        match self {
            DigestKind::Md5 => Box::new(Md5),
            DigestKind::Blake3 => Box::new(Blake3),
        }
    }

    /// Identifier accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            DigestKind::Md5 => "md5",
            DigestKind::Blake3 => "blake3",
        }
    }
}

impl FromStr for DigestKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DigestKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Error::invalid_property(
                    "md5sum",
                    "algorithm",
                    format!("unsupported digest '{s}' (expected md5 or blake3)"),
                )
            })
    }
}

impl std::fmt::Display for DigestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
