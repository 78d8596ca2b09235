//! RSA accumulator operations.

use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::One;
use log::{debug, warn};

use crate::bigint::FieldInt;
use crate::pool::TaskPool;
use crate::rsa::key::{RSAKey, RSAPublicKey};

/// RSA set accumulator: operations over `(Z/NZ)*` keyed on prime
/// representatives of the accumulated elements.
pub struct RSAAccumulator;

impl RSAAccumulator {
    /// Maps each element of `set` to its prime representative, in parallel.
    pub fn generate_representatives(set: &[FieldInt], pk: &RSAPublicKey, pool: &TaskPool) -> Vec<FieldInt> {
        let handles: Vec<_> = set
            .iter()
            .cloned()
            .map(|e| {
                let rep_gen = Arc::clone(&pk.rep_gen);
                pool.submit(move || rep_gen.gen(&e))
            })
            .collect();
        handles.into_iter().map(|h| h.get()).collect()
    }

    /// `out = base^(prod(reps) mod phi(N)) mod N`. Requires `key`'s secret
    /// primes; exponent reduction mod `phi(N)` is
    /// exactly what makes the private path cheaper than the public one.
    pub fn accumulate_private(reps: &[FieldInt], key: &RSAKey) -> BigUint {
        let phi_n = key.phi_n();
        let mut exponent = BigUint::one() % &phi_n;
        for rep in reps {
            let (_, mag) = rep.as_bigint().to_bytes_be();
            let rep_u = BigUint::from_bytes_be(&mag);
            exponent = (exponent * rep_u) % &phi_n;
        }
        key.public.base.modpow(&exponent, &key.public.modulus)
    }

    /// `out = base^(reps[0]) ^ ... ^ reps[n-1] mod N`, sequential: without
    /// `phi(N)` the exponents can't be combined first.
    pub fn accumulate_public(reps: &[FieldInt], pk: &RSAPublicKey) -> BigUint {
        Self::accumulate_public_excluding(reps, reps.len(), pk)
    }

    /// Accumulates `reps`, skipping index `skip` if it is in range. Shared
    /// helper behind both public accumulation and public witness
    /// generation, folding "accumulate everything" and "accumulate all but
    /// one index" into a single function.
    fn accumulate_public_excluding(reps: &[FieldInt], skip: usize, pk: &RSAPublicKey) -> BigUint {
        let mut out = pk.base.clone();
        let end = skip.min(reps.len());
        for rep in &reps[..end] {
            let (_, mag) = rep.as_bigint().to_bytes_be();
            out = out.modpow(&BigUint::from_bytes_be(&mag), &pk.modulus);
        }
        for rep in reps.iter().skip(skip + 1) {
            let (_, mag) = rep.as_bigint().to_bytes_be();
            out = out.modpow(&BigUint::from_bytes_be(&mag), &pk.modulus);
        }
        out
    }

    /// Left/right prefix-product sweeps over `Z/phi(N)Z`, run in parallel,
    /// then `witness_i = base^(left[i]*right[i+1]) mod N`.
    pub fn witnesses_private(reps: &[FieldInt], key: &RSAKey, pool: &TaskPool) -> Vec<BigUint> {
        let phi_n = key.phi_n();
        let reps_owned = reps.to_vec();
        let reps_for_right = reps.to_vec();
        let phi_left = phi_n.clone();
        let phi_right = phi_n.clone();

        let left_handle = pool.submit(move || Self::left_products(&reps_owned, &phi_left));
        let right_handle = pool.submit(move || Self::right_products(&reps_for_right, &phi_right));
        let left = left_handle.get();
        let right = right_handle.get();

        (0..reps.len())
            .map(|i| {
                let exponent = (&left[i] * &right[i + 1]) % &phi_n;
                key.public.base.modpow(&exponent, &key.public.modulus)
            })
            .collect()
    }

    fn left_products(reps: &[FieldInt], modulus: &BigUint) -> Vec<BigUint> {
        let mut products = vec![BigUint::one() % modulus; reps.len() + 1];
        for i in 1..=reps.len() {
            let (_, mag) = reps[i - 1].as_bigint().to_bytes_be();
            products[i] = (&products[i - 1] * BigUint::from_bytes_be(&mag)) % modulus;
        }
        products
    }

    fn right_products(reps: &[FieldInt], modulus: &BigUint) -> Vec<BigUint> {
        let mut products = vec![BigUint::one() % modulus; reps.len() + 1];
        for i in (0..reps.len()).rev() {
            let (_, mag) = reps[i].as_bigint().to_bytes_be();
            products[i] = (&products[i + 1] * BigUint::from_bytes_be(&mag)) % modulus;
        }
        products
    }

    /// `out[i] = accumulate_public(reps \ {reps[i]})`, one task per element,
    /// brute force, since without `phi(N)` there is no shortcut.
    pub fn witnesses_public(reps: &[FieldInt], pk: &RSAPublicKey, pool: &TaskPool) -> Vec<BigUint> {
        let handles: Vec<_> = (0..reps.len())
            .map(|i| {
                let reps = reps.to_vec();
                let modulus = pk.modulus.clone();
                let base = pk.base.clone();
                let rep_gen = Arc::clone(&pk.rep_gen);
                pool.submit(move || {
                    let pk = RSAPublicKey { modulus, base, rep_gen };
                    Self::accumulate_public_excluding(&reps, i, &pk)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.get()).collect()
    }

    /// `witness^rep(element) mod N == acc`, rejecting on modulus mismatch
    /// rather than panicking.
    pub fn verify(element: &FieldInt, witness: &BigUint, acc: &BigUint, pk: &RSAPublicKey) -> bool {
        if witness >= &pk.modulus || acc >= &pk.modulus {
            warn!("RSA verification failed: witness/accumulator modulus mismatch against public key");
            return false;
        }
        let rep = pk.rep_for(element);
        let (_, mag) = rep.as_bigint().to_bytes_be();
        let candidate = witness.modpow(&BigUint::from_bytes_be(&mag), &pk.modulus);
        let valid = &candidate == acc;
        if !valid {
            debug!("RSA verification failed for element with representative bit length {}", rep.bit_length());
        }
        valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    fn small_key() -> RSAKey {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        RSAKey::generate(&mut rng, 16, 512).unwrap()
    }

    #[test]
    fn private_and_public_accumulation_agree() {
        let key = small_key();
        let pool = TaskPool::new(4);
        let set = vec![FieldInt::from_u64(2), FieldInt::from_u64(3), FieldInt::from_u64(5)];
        let reps = RSAAccumulator::generate_representatives(&set, &key.public, &pool);

        let acc_private = RSAAccumulator::accumulate_private(&reps, &key);
        let acc_public = RSAAccumulator::accumulate_public(&reps, &key.public);
        assert_eq!(acc_private, acc_public);
    }

    #[test]
    fn witness_verifies_for_member_and_rejects_nonmember() {
        let key = small_key();
        let pool = TaskPool::new(4);
        let set = vec![FieldInt::from_u64(2), FieldInt::from_u64(3), FieldInt::from_u64(5)];
        let reps = RSAAccumulator::generate_representatives(&set, &key.public, &pool);
        let acc = RSAAccumulator::accumulate_private(&reps, &key);
        let witnesses = RSAAccumulator::witnesses_private(&reps, &key, &pool);

        assert!(RSAAccumulator::verify(&set[1], &witnesses[1], &acc, &key.public));
        assert!(!RSAAccumulator::verify(&FieldInt::from_u64(9), &witnesses[1], &acc, &key.public));
    }

    #[test]
    fn private_and_public_witnesses_agree() {
        let key = small_key();
        let pool = TaskPool::new(4);
        let set: Vec<FieldInt> = (2..8).map(FieldInt::from_u64).collect();
        let reps = RSAAccumulator::generate_representatives(&set, &key.public, &pool);
        let priv_w = RSAAccumulator::witnesses_private(&reps, &key, &pool);
        let pub_w = RSAAccumulator::witnesses_public(&reps, &key.public, &pool);
        assert_eq!(priv_w, pub_w);
    }

    #[test]
    fn empty_set_accumulates_to_base() {
        let key = small_key();
        let acc = RSAAccumulator::accumulate_private(&[], &key);
        assert_eq!(acc, key.public.base.clone() % &key.public.modulus);
    }
}
