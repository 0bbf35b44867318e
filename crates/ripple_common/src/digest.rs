//! SHA-256 digests for target hashing.

use std::fmt;

use sha2::{Digest as _, Sha256};

/// A 256-bit SHA-256 digest.
///
/// Two targets with the same `Digest` are assumed to have identical effective
/// inputs. The value is rendered as 64 lowercase hex characters wherever it
/// crosses into a snapshot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; Digest::LEN]);

impl Digest {
    /// Width of the digest in bytes.
    pub const LEN: usize = 32;

    /// Computes the digest of a single byte slice.
    pub fn of(data: &[u8]) -> Self {
        let mut builder = DigestBuilder::new();
        builder.update(data);
        builder.finish()
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; Digest::LEN] {
        &self.0
    }

    /// Returns the digest as a lowercase hex string, two characters per byte.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

/// Incremental accumulator that hashes everything written into it.
///
/// Feeding slices one after another produces the same digest as hashing
/// their concatenation in one call.
#[derive(Clone, Default)]
pub struct DigestBuilder {
    hasher: Sha256,
}

impl DigestBuilder {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends bytes to the accumulator.
    pub fn update(&mut self, data: impl AsRef<[u8]>) -> &mut Self {
        self.hasher.update(data.as_ref());
        self
    }

    /// Consumes the accumulator and returns the digest of everything written.
    pub fn finish(self) -> Digest {
        let mut out = [0u8; Digest::LEN];
        out.copy_from_slice(&self.hasher.finalize());
        Digest(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = Digest::of(b"hello world");
        let b = Digest::of(b"hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn different_inputs_differ() {
        let a = Digest::of(b"hello");
        let b = Digest::of(b"world");
        assert_ne!(a, b);
    }

    #[test]
    fn known_empty_digest() {
        assert_eq!(
            Digest::of(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn hex_is_lowercase_and_fixed_width() {
        let h = Digest::of(b"test");
        let s = h.to_hex();
        assert_eq!(s.len(), 64);
        assert!(s.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn builder_matches_concatenation() {
        let mut builder = DigestBuilder::new();
        builder.update(b"foo").update(b"").update(b"bar");
        assert_eq!(builder.finish(), Digest::of(b"foobar"));
    }

    #[test]
    fn debug_abbreviated() {
        let s = format!("{:?}", Digest::of(b"test"));
        assert!(s.starts_with("Digest("));
        assert!(s.ends_with("..)"));
    }
}
