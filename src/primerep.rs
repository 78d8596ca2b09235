//! Deterministic prime-representative generation for the RSA accumulator.

use sha2::{Digest, Sha256};

use crate::bigint::FieldInt;

/// Bytes of random-looking salt appended to the element before hashing.
const SALT_BYTES: usize = 2;
/// Bits shifted into the low-order end of the hash before `next_prime`.
const PADDING_LENGTH: u32 = 12;
/// LCG multiplier from `std::linear_congruential_engine<uint64_t, 48271, 0, 2^31-1>`.
const LCG_MULTIPLIER: u64 = 48271;
const LCG_MODULUS: u64 = 2_147_483_647; // 2^31 - 1

/// Strategy that deterministically maps an element to a prime representative.
///
/// Implementations must be stateless, or carry only per-call local state, so
/// multiple pool workers can call `gen` concurrently without coordination.
pub trait PrimeRepGen: Send + Sync {
    fn gen(&self, element: &FieldInt) -> FieldInt;
}

/// A salted-random-oracle prime representative generator:
///
/// 1. Encode the element as big-endian bytes.
/// 2. Seed a 64-bit LCG from the element's top 64 bits and draw a 16-bit salt.
/// 3. SHA-256 the element bytes concatenated with the salt.
/// 4. Interpret the digest big-endian, left-shift by `PADDING_LENGTH` bits.
/// 5. Return the next probable prime at or above that value.
#[derive(Debug, Default, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct OraclePrimeRep;

impl OraclePrimeRep {
    pub fn new() -> Self {
        OraclePrimeRep
    }

    /// The 16-bit salt the LCG produces for `element`, exposed for tests
    /// that want to check intermediate steps directly.
    fn salt_for(element: &FieldInt) -> u16 {
        let seed = element.top_64_bits();
        // `std::linear_congruential_engine` discards a seed of exactly 0.
        let mut state = if seed == 0 { 1 } else { seed % LCG_MODULUS };
        state = (state.wrapping_mul(LCG_MULTIPLIER)) % LCG_MODULUS;
        (state & 0xFFFF) as u16
    }
}

impl PrimeRepGen for OraclePrimeRep {
    fn gen(&self, element: &FieldInt) -> FieldInt {
        let element_bytes = element.to_bytes_be();
        let salt = Self::salt_for(element);

        let mut to_hash = Vec::with_capacity(element_bytes.len() + SALT_BYTES);
        to_hash.extend_from_slice(&element_bytes);
        to_hash.extend_from_slice(&salt.to_le_bytes());

        let digest = Sha256::digest(&to_hash);
        let hashed = FieldInt::from_bytes_be(&digest);
        let padded = hashed.shl(PADDING_LENGTH);
        padded.next_prime()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn deterministic_for_equal_elements() {
        let gen = OraclePrimeRep::new();
        let e = FieldInt::from_u64(42);
        assert_eq!(gen.gen(&e), gen.gen(&e));
    }

    #[test]
    fn differs_across_distinct_elements_with_overwhelming_probability() {
        let gen = OraclePrimeRep::new();
        let a = gen.gen(&FieldInt::from_u64(2));
        let b = gen.gen(&FieldInt::from_u64(3));
        assert_ne!(a, b);
    }

    #[test]
    fn representative_has_at_least_268_bits() {
        let gen = OraclePrimeRep::new();
        let r = gen.gen(&FieldInt::from_u64(1));
        assert!(r.bit_length() >= 256 + 12 - 8);
    }

    #[test]
    fn representative_is_prime() {
        use num_bigint::BigUint;
        let gen = OraclePrimeRep::new();
        let r = gen.gen(&FieldInt::from_bigint(BigInt::from(123456789u64)));
        let (_, mag) = r.as_bigint().to_bytes_be();
        let unsigned = BigUint::from_bytes_be(&mag);
        assert!(num_bigint::prime::probably_prime(&unsigned, 20));
    }
}
