//! Hash function abstraction (§6): "a reset/update/sum interface producing
//! fixed-width byte strings." The RDF hash engine (C5) and canonicaliser
//! (C6) are generic over this trait so that URDNA2015 (SHA-256) and
//! URGNA2012 (SHA-1) share one implementation, differing only in which
//! concrete digest — and a few marker-byte/graph-label conventions — they
//! plug in.

use sha1::Sha1;
use sha2::Sha256;
use sha2::Digest as Sha2DigestTrait;
use sha1::Digest as Sha1DigestTrait;

/// A resettable hash function producing a fixed-width digest.
pub trait Digest: Default {
    /// The digest's output width in bytes (32 for SHA-256, 20 for SHA-1).
    const OUTPUT_LEN: usize;

    fn new() -> Self {
        Self::default()
    }
    fn update(&mut self, bytes: &[u8]);
    fn finish(self) -> Vec<u8>;

    /// Convenience: hash `bytes` in one call.
    fn digest(bytes: &[u8]) -> Vec<u8>
    where
        Self: Sized,
    {
        let mut d = Self::new();
        d.update(bytes);
        d.finish()
    }
}

#[derive(Default)]
pub struct Sha256Digest(Sha256);

impl Digest for Sha256Digest {
    const OUTPUT_LEN: usize = 32;
    fn update(&mut self, bytes: &[u8]) {
        Sha2DigestTrait::update(&mut self.0, bytes);
    }
    fn finish(self) -> Vec<u8> {
        self.0.finalize().to_vec()
    }
}

#[derive(Default)]
pub struct Sha1Digest(Sha1);

impl Digest for Sha1Digest {
    const OUTPUT_LEN: usize = 20;
    fn update(&mut self, bytes: &[u8]) {
        Sha1DigestTrait::update(&mut self.0, bytes);
    }
    fn finish(self) -> Vec<u8> {
        self.0.finalize().to_vec()
    }
}

/// Which canonicalisation algorithm to run (§4.6): they differ in digest,
/// related-blank marker bytes, and graph-label handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CanonAlgorithm {
    /// SHA-1, predecessor/successor markers, graph-label blanks folded in
    /// directly.
    Urgna2012,
    /// SHA-256, subject/object/label markers, graph-label blanks replaced
    /// with a fixed placeholder.
    Urdna2015,
}

impl CanonAlgorithm {
    pub fn hash(self, bytes: &[u8]) -> Vec<u8> {
        match self {
            CanonAlgorithm::Urgna2012 => Sha1Digest::digest(bytes),
            CanonAlgorithm::Urdna2015 => Sha256Digest::digest(bytes),
        }
    }

    pub fn output_len(self) -> usize {
        match self {
            CanonAlgorithm::Urgna2012 => Sha1Digest::OUTPUT_LEN,
            CanonAlgorithm::Urdna2015 => Sha256Digest::OUTPUT_LEN,
        }
    }

    pub fn issuer_prefix(self) -> &'static str {
        "c14n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn sha256_of_empty_input_matches_the_known_vector() {
        let got = Sha256Digest::digest(b"");
        assert_eq!(hex(&got), "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
    }

    #[test]
    fn sha1_of_empty_input_matches_the_known_vector() {
        let got = Sha1Digest::digest(b"");
        assert_eq!(hex(&got), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }
}
