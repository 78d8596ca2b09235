//! Bilinear-map key material.

use ff::Field;
use group::Group;
use log::debug;
use rand_core::RngCore;

use crate::curve::{Scalar, G1, G2};
use crate::pool::TaskPool;

/// `([g1^(s^i)]_{i=0..q}, [g2^(s^i)]_{i=0..q})`; the first element of each
/// list is the plain generator.
pub struct BMPublicKey {
    pub g1_powers: Vec<G1>,
    pub g2_powers: Vec<G2>,
}

impl BMPublicKey {
    /// The maximum set size this key supports (`q`).
    pub fn max_set_size(&self) -> usize {
        self.g1_powers.len().saturating_sub(1)
    }
}

/// `BMKey`: the secret trapdoor scalar `s` plus the public key.
///
/// `s` must remain secret; anyone who learns it can forge membership for
/// elements never accumulated.
pub struct BMKey {
    pub secret: Scalar,
    pub public: BMPublicKey,
}

impl BMKey {
    /// Samples `s` uniformly and computes both power vectors in parallel on
    /// `pool`.
    pub fn generate<R: RngCore>(rng: &mut R, max_set_size: u64, pool: &TaskPool) -> Self {
        let s = Scalar::random(rng);
        debug!("generating BM key with q = {}", max_set_size);

        let q = max_set_size as usize;
        let s1 = s;
        let s2 = s;
        let g1_handle = pool.submit(move || compute_powers::<G1>(&s1, q));
        let g2_handle = pool.submit(move || compute_powers::<G2>(&s2, q));
        let g1_powers = g1_handle.get();
        let g2_powers = g2_handle.get();

        BMKey {
            secret: s,
            public: BMPublicKey { g1_powers, g2_powers },
        }
    }
}

/// `[generator, generator^s, generator^(s^2), ..., generator^(s^q)]`,
/// built by iterated multiplication of the previous element by `s`.
fn compute_powers<G: Group<Scalar = Scalar>>(s: &Scalar, q: usize) -> Vec<G> {
    let mut powers = Vec::with_capacity(q + 1);
    powers.push(G::generator());
    for i in 0..q {
        let next = powers[i] * *s;
        powers.push(next);
    }
    powers
}
