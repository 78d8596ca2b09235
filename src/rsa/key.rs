//! RSA key material.

use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::One;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bigint::FieldInt;
use crate::error::{AccumulatorError, Result};
use crate::primerep::{OraclePrimeRep, PrimeRepGen};

/// The RSA base used to exponentiate the accumulated set; 65537 by
/// convention, reduced mod N.
const BASE: u32 = 65537;

/// Number of (p, q) candidate pairs tried before giving up with
/// `CryptoFailure`.
const MAX_KEYGEN_ATTEMPTS: usize = 64;

/// `(N = p*q, base, PrimeRepGen)`, shareable read-only after keygen.
#[derive(Clone, Serialize, Deserialize)]
pub struct RSAPublicKey {
    pub modulus: BigUint,
    pub base: BigUint,
    #[serde(skip, default = "default_rep_gen")]
    pub rep_gen: Arc<dyn PrimeRepGen>,
}

fn default_rep_gen() -> Arc<dyn PrimeRepGen> {
    Arc::new(OraclePrimeRep::new())
}

impl RSAPublicKey {
    pub fn rep_for(&self, element: &FieldInt) -> FieldInt {
        self.rep_gen.gen(element)
    }
}

/// `RSAKey`: secret primes `p, q` plus the public key.
#[derive(Clone, Serialize, Deserialize)]
pub struct RSAKey {
    pub p: BigUint,
    pub q: BigUint,
    pub public: RSAPublicKey,
}

impl RSAKey {
    /// `phi(N) = (p-1)(q-1)`, used to reduce exponents under the secret key.
    pub fn phi_n(&self) -> BigUint {
        (&self.p - BigUint::one()) * (&self.q - BigUint::one())
    }

    /// Generates an RSA key whose modulus has at least
    /// `max(3*element_bits+1, modulus_bits)` bits.
    ///
    /// `element_bits` bounds the size of elements the accumulator will be
    /// asked to hold (prime representatives are ~268 bits, so
    /// `3*element_bits+1` keeps the modulus comfortably larger than the
    /// product of any three representatives an adversary could present).
    pub fn generate<R: Rng>(rng: &mut R, element_bits: usize, modulus_bits: usize) -> Result<Self> {
        let target_bits = std::cmp::max(3 * element_bits + 1, modulus_bits);
        let half = target_bits / 2;
        let p_bits = half;
        let q_bits = target_bits - half;

        for _ in 0..MAX_KEYGEN_ATTEMPTS {
            let p = FieldInt::random_prime(rng, p_bits).into_bigint();
            let q = FieldInt::random_prime(rng, q_bits).into_bigint();
            let (_, p_mag) = p.to_bytes_be();
            let (_, q_mag) = q.to_bytes_be();
            let p_u = BigUint::from_bytes_be(&p_mag);
            let q_u = BigUint::from_bytes_be(&q_mag);
            if p_u == q_u {
                continue;
            }
            let modulus = &p_u * &q_u;
            if modulus.bits() as usize >= target_bits {
                let base = BigUint::from(BASE) % &modulus;
                return Ok(RSAKey {
                    p: p_u,
                    q: q_u,
                    public: RSAPublicKey {
                        modulus,
                        base,
                        rep_gen: default_rep_gen(),
                    },
                });
            }
        }
        Err(AccumulatorError::CryptoFailure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    #[test]
    fn keygen_respects_bit_length_floor() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let key = RSAKey::generate(&mut rng, 32, 256).unwrap();
        assert!(key.public.modulus.bits() as usize >= 256);
        assert_eq!(key.public.base, BigUint::from(BASE) % &key.public.modulus);
    }

    #[test]
    fn element_bits_can_dominate_modulus_bits() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        // 3*100+1 = 301 > 256
        let key = RSAKey::generate(&mut rng, 100, 256).unwrap();
        assert!(key.public.modulus.bits() as usize >= 301);
    }
}
