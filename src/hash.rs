//! Hashing utilities bundled alongside the accumulator core.
//!
//! The accumulator core itself only ever reaches for SHA-256, via
//! [`crate::primerep::OraclePrimeRep`]; `blake2s` is kept here because the
//! teacher (`bellperson`) pulls in `blake2s_simd` for its own hashing needs,
//! and the Merkle-tree utility below wants a second, faster option for
//! large leaf sets.

use sha2::{Digest, Sha256};

pub const DIGEST_LENGTH: usize = 32;

/// `SHA256(input)`.
pub fn sha256(input: &[u8]) -> [u8; DIGEST_LENGTH] {
    let digest = Sha256::digest(input);
    let mut out = [0u8; DIGEST_LENGTH];
    out.copy_from_slice(&digest);
    out
}

/// `blake2s(input)`, a faster alternative hash for large leaf sets; not
/// used by the accumulator core itself.
pub fn blake2s(input: &[u8]) -> [u8; DIGEST_LENGTH] {
    let hash = blake2s_simd::blake2s(input);
    let mut out = [0u8; DIGEST_LENGTH];
    out.copy_from_slice(hash.as_bytes());
    out
}
