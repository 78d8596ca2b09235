//! Bilinear-map accumulator operations.

use ff::Field;
use group::Group;
use log::debug;

use crate::bm::key::BMPublicKey;
use crate::curve::{pairing, scalar_to_biguint, Scalar, G1, G2};
use crate::modpoly::ModPoly;
use crate::multiexp;
use crate::pool::TaskPool;

/// Coefficient ranges smaller than this are each handed a dedicated task.
const MAX_TASKS: usize = 50;
/// Below this many operations, a single task handles the whole range.
const MIN_OPS_PER_TASK: usize = 1000;
/// Worker count for the secondary pool public-witness generation spins up,
/// to avoid deadlocking the caller's own pool.
const WITNESS_SUBPOOL_THREADS: usize = 16;

pub struct BMAccumulator;

impl BMAccumulator {
    /// `acc <- acc^E` where `E = prod_i (s + a_i) mod n`. The caller must
    /// pre-initialize `acc` to the group generator, not the identity, so
    /// that this matches what public accumulation computes from scratch.
    /// An empty set leaves `acc` unchanged (`acc^1 = acc`).
    pub fn accumulate_private(set: &[Scalar], secret: &Scalar, acc: &mut G1) {
        let mut power = Scalar::one();
        for element in set {
            let sum = *secret + *element;
            power *= sum;
        }
        *acc = *acc * power;
    }

    /// Expands `P(x) = prod_i (x + a_i) mod n` and computes
    /// `acc = pk[0]^c0 * pk[1]^c1 * ... * pk[deg]^c_deg`, partitioning the
    /// coefficient range across `pool`.
    pub fn accumulate_public(set: &[Scalar], pk: &BMPublicKey, pool: &TaskPool) -> G1 {
        let coeffs = Self::expand_coefficients(set);
        Self::accumulate_from_coeffs::<G1>(&coeffs, &pk.g1_powers, pool)
    }

    /// Same as `accumulate_public` but produces a `G2` element, used by
    /// public witness generation, which accumulates in G2.
    pub fn accumulate_public_g2(set: &[Scalar], pk: &BMPublicKey, pool: &TaskPool) -> G2 {
        let coeffs = Self::expand_coefficients(set);
        Self::accumulate_from_coeffs::<G2>(&coeffs, &pk.g2_powers, pool)
    }

    fn expand_coefficients(set: &[Scalar]) -> Vec<Scalar> {
        let modulus = crate::curve::scalar_field_order();
        let roots: Vec<_> = set.iter().map(scalar_to_biguint).collect();
        let poly = ModPoly::product_of_linear_factors(&roots, &modulus);
        poly.coeffs().iter().map(crate::curve::biguint_to_scalar).collect()
    }

    /// `acc = prod_i pk[i]^{coeffs[i]}`, partitioned into ranges, each
    /// computed by a batched multi-scalar multiply submitted to `pool`.
    fn accumulate_from_coeffs<G>(coeffs: &[Scalar], powers: &[G], pool: &TaskPool) -> G
    where
        G: Group<Scalar = Scalar> + Send + 'static,
    {
        let mut acc = powers[0] * coeffs[0];

        let size = coeffs.len() - 1; // degree
        if size == 0 {
            return acc;
        }

        let (range_len, num_tasks, leftover) = Self::partition(size);
        debug!(
            "BM accumulate_from_coeffs: degree={} tasks={} range_len={} leftover={}",
            size, num_tasks, range_len, leftover
        );

        let mut handles = Vec::with_capacity(num_tasks);
        let mut offset = 1usize;
        let mut total_assigned = 0usize;
        for i in 0..num_tasks {
            let mut len = if i < leftover { range_len + 1 } else { range_len };
            let remaining = size - total_assigned;
            if remaining < len {
                len = remaining;
            }
            if len == 0 {
                continue;
            }
            let end = offset + len;
            let range_points: Vec<G> = powers[offset..end].to_vec();
            let range_scalars: Vec<Scalar> = coeffs[offset..end].to_vec();
            handles.push(pool.submit(move || multiexp::multiscalar_mul(range_points, range_scalars)));
            offset = end;
            total_assigned += len;
        }

        for handle in handles {
            acc += handle.get();
        }
        acc
    }

    fn partition(size: usize) -> (usize, usize, usize) {
        let (mut range_len, mut num_tasks, mut leftover);
        if size <= MAX_TASKS {
            range_len = 1;
            num_tasks = size;
            leftover = 0;
        } else if size <= MIN_OPS_PER_TASK {
            range_len = size;
            num_tasks = 1;
            leftover = 0;
        } else {
            range_len = size / MAX_TASKS;
            num_tasks = MAX_TASKS;
            leftover = size % MAX_TASKS;
        }
        if range_len < MIN_OPS_PER_TASK && size > MIN_OPS_PER_TASK {
            range_len = MIN_OPS_PER_TASK;
            num_tasks = (size + range_len - 1) / range_len;
            leftover = size % num_tasks;
        }
        (range_len, num_tasks, leftover)
    }

    /// Left/right prefix-product sweeps over `(s + a_i)`, run in parallel;
    /// element `i`'s witness is `g2_base^(left[i]*right[i+1])`.
    pub fn witnesses_private(set: &[Scalar], secret: &Scalar, g2_base: &G2, pool: &TaskPool) -> Vec<G2> {
        let set_left = set.to_vec();
        let set_right = set.to_vec();
        let secret_left = *secret;
        let secret_right = *secret;
        let left_handle = pool.submit(move || Self::left_products(&set_left, &secret_left));
        let right_handle = pool.submit(move || Self::right_products(&set_right, &secret_right));
        let left = left_handle.get();
        let right = right_handle.get();

        (0..set.len())
            .map(|i| {
                let exponent = left[i] * right[i + 1];
                *g2_base * exponent
            })
            .collect()
    }

    fn left_products(set: &[Scalar], secret: &Scalar) -> Vec<Scalar> {
        let mut products = vec![Scalar::one(); set.len() + 1];
        for i in 1..=set.len() {
            products[i] = products[i - 1] * (*secret + set[i - 1]);
        }
        products
    }

    fn right_products(set: &[Scalar], secret: &Scalar) -> Vec<Scalar> {
        let mut products = vec![Scalar::one(); set.len() + 1];
        for i in (0..set.len()).rev() {
            products[i] = products[i + 1] * (*secret + set[i]);
        }
        products
    }

    /// For each element, accumulates the set excluding it under the public
    /// key in G2. Each task uses a *secondary* pool for its own call into
    /// `accumulate_public_g2`, so the outer pool never blocks on work
    /// queued back into itself.
    pub fn witnesses_public(set: &[Scalar], pk: &std::sync::Arc<BMPublicKey>, pool: &TaskPool) -> Vec<G2> {
        let handles: Vec<_> = (0..set.len())
            .map(|i| {
                let set = set.to_vec();
                let pk = pk.clone();
                pool.submit(move || {
                    let mut subset = set.clone();
                    subset.remove(i);
                    let inner_pool = TaskPool::new(WITNESS_SUBPOOL_THREADS);
                    Self::accumulate_public_g2(&subset, &pk, &inner_pool)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.get()).collect()
    }

    /// `e(g1^element * pk1[1], witness) == e(acc, g2_generator)`:
    /// `pk1[1] = g1^s`, so the left operand is `g1^(element+s)`.
    pub fn verify(element: &Scalar, witness: &G2, acc: &G1, pk: &BMPublicKey) -> bool {
        let x = G1::generator() * *element + pk.g1_powers[1];
        let lhs = pairing(&x, witness);
        let rhs = pairing(acc, &G2::generator());
        let valid = lhs == rhs;
        if !valid {
            debug!("BM verification failed: pairing mismatch");
        }
        valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bm::key::BMKey;
    use rand_core::SeedableRng;
    use rand_xorshift::XorShiftRng;
    use std::sync::Arc;

    fn scalars(vals: &[u64]) -> Vec<Scalar> {
        vals.iter().map(|v| Scalar::from(*v)).collect()
    }

    #[test]
    fn tiny_scenario_private_matches_worked_example() {
        let mut rng = XorShiftRng::from_seed([1u8; 16]);
        let pool = TaskPool::new(4);
        let key = BMKey::generate(&mut rng, 4, &pool);
        let set = scalars(&[5, 7, 11]);

        let mut acc = G1::generator();
        BMAccumulator::accumulate_private(&set, &key.secret, &mut acc);

        let witnesses = BMAccumulator::witnesses_private(&set, &key.secret, &G2::generator(), &pool);
        assert!(BMAccumulator::verify(&Scalar::from(7u64), &witnesses[1], &acc, &key.public));
        assert!(!BMAccumulator::verify(&Scalar::from(9u64), &witnesses[1], &acc, &key.public));
    }

    #[test]
    fn private_and_public_accumulation_agree() {
        let mut rng = XorShiftRng::from_seed([2u8; 16]);
        let pool = TaskPool::new(4);
        let key = BMKey::generate(&mut rng, 8, &pool);
        let set = scalars(&[5, 7, 11]);

        let mut acc_private = G1::generator();
        BMAccumulator::accumulate_private(&set, &key.secret, &mut acc_private);
        let acc_public = BMAccumulator::accumulate_public(&set, &key.public, &pool);
        assert_eq!(acc_private, acc_public);
    }

    #[test]
    fn tiny_scenario_public_coefficients_match() {
        // (x+5)(x+7)(x+11) = x^3 + 23x^2 + 167x + 385
        let coeffs = BMAccumulator::expand_coefficients(&scalars(&[5, 7, 11]));
        assert_eq!(coeffs.len(), 4);
        assert_eq!(coeffs[0], Scalar::from(385u64));
        assert_eq!(coeffs[1], Scalar::from(167u64));
        assert_eq!(coeffs[2], Scalar::from(23u64));
        assert_eq!(coeffs[3], Scalar::from(1u64));
    }

    #[test]
    fn private_and_public_witnesses_agree_on_a_larger_set() {
        let mut rng = XorShiftRng::from_seed([6u8; 16]);
        let pool = TaskPool::new(4);
        let key = BMKey::generate(&mut rng, 100, &pool);
        let set: Vec<Scalar> = (0..20u64).map(Scalar::from).collect();

        let priv_w = BMAccumulator::witnesses_private(&set, &key.secret, &G2::generator(), &pool);
        let pk = Arc::new(key.public);
        let pub_w = BMAccumulator::witnesses_public(&set, &pk, &pool);
        assert_eq!(priv_w, pub_w);
    }

    #[test]
    fn large_set_partitioning_does_not_overshoot_coefficients() {
        let mut rng = XorShiftRng::from_seed([12u8; 16]);
        let pool = TaskPool::new(8);
        let size = 1500usize;
        let key = BMKey::generate(&mut rng, size as u64, &pool);
        let set: Vec<Scalar> = (0..size as u64).map(Scalar::from).collect();

        let mut acc_private = G1::generator();
        BMAccumulator::accumulate_private(&set, &key.secret, &mut acc_private);
        let acc_public = BMAccumulator::accumulate_public(&set, &key.public, &pool);
        assert_eq!(acc_private, acc_public);
    }

    #[test]
    fn empty_set_leaves_accumulator_at_generator() {
        let set: Vec<Scalar> = vec![];
        let mut acc = G1::generator();
        BMAccumulator::accumulate_private(&set, &Scalar::from(9u64), &mut acc);
        assert_eq!(acc, G1::generator());
    }
}
