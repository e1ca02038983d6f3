//! Hash functions used by the canonicalization algorithm.

use sha2::Digest;

/// The hash algorithms selectable through
/// [`C14nOptions`](crate::C14nOptions).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// SHA-256, the algorithm RDFC-1.0 mandates by default.
    #[default]
    Sha256,
    /// SHA-384.
    Sha384,
}

/// Abstraction of the hash functions used by the canonicalization algorithm.
///
/// Digests are returned as lowercase hexadecimal strings,
/// which is the only form the algorithm ever compares or re-hashes.
pub trait HashFunction {
    /// Start the computation of a hash.
    fn initialize() -> Self;

    /// Update the internal state by hashing `data`.
    fn update(&mut self, data: impl AsRef<[u8]>);

    /// Return the digest as a lowercase hexadecimal string.
    fn finalize(self) -> String;
}

/// The [SHA-256](https://en.wikipedia.org/wiki/SHA-2) [`HashFunction`].
pub struct Sha256(sha2::Sha256);

impl HashFunction for Sha256 {
    fn initialize() -> Self {
        Self(sha2::Sha256::new())
    }

    fn update(&mut self, data: impl AsRef<[u8]>) {
        self.0.update(data.as_ref());
    }

    fn finalize(self) -> String {
        format!("{:x}", self.0.finalize())
    }
}

/// The [SHA-384](https://en.wikipedia.org/wiki/SHA-2) [`HashFunction`].
pub struct Sha384(sha2::Sha384);

impl HashFunction for Sha384 {
    fn initialize() -> Self {
        Self(sha2::Sha384::new())
    }

    fn update(&mut self, data: impl AsRef<[u8]>) {
        self.0.update(data.as_ref());
    }

    fn finalize(self) -> String {
        format!("{:x}", self.0.finalize())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sha256_digest_is_lowercase_hex() {
        let mut h = Sha256::initialize();
        h.update("abc");
        assert_eq!(
            h.finalize(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        );
    }

    #[test]
    fn sha384_digest_is_lowercase_hex() {
        let mut h = Sha384::initialize();
        h.update("abc");
        assert_eq!(
            h.finalize(),
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed\
             8086072ba1e7cc2358baeca134c825a7",
        );
    }

    #[test]
    fn update_is_chunking_insensitive() {
        let mut h1 = Sha256::initialize();
        h1.update("hello ");
        h1.update("world");
        let mut h2 = Sha256::initialize();
        h2.update("hello world");
        assert_eq!(h1.finalize(), h2.finalize());
    }
}
