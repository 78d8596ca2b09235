//! Polynomials over ℤ/mℤ, and the divide-and-conquer product construction
//! used to expand `Π (x + aᵢ)` into a coefficient vector.

use num_bigint::BigUint;
use num_traits::Zero;

/// A polynomial over `ℤ/modulus ℤ`, stored as `coeffs[i]` = coefficient of `x^i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModPoly {
    modulus: BigUint,
    coeffs: Vec<BigUint>,
}

impl ModPoly {
    /// The constant polynomial `1`.
    pub fn one(modulus: BigUint) -> Self {
        ModPoly {
            coeffs: vec![BigUint::from(1u32) % &modulus],
            modulus,
        }
    }

    /// The monic linear polynomial `x + a`.
    pub fn linear(a: &BigUint, modulus: BigUint) -> Self {
        ModPoly {
            coeffs: vec![a % &modulus, BigUint::from(1u32) % &modulus],
            modulus,
        }
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Highest index with a nonzero coefficient; the zero polynomial has
    /// degree 0 (a single zero coefficient).
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    pub fn at(&self, i: usize) -> &BigUint {
        &self.coeffs[i]
    }

    pub fn coeffs(&self) -> &[BigUint] {
        &self.coeffs
    }

    fn reduce(&mut self) {
        for c in self.coeffs.iter_mut() {
            *c %= &self.modulus;
        }
    }

    /// Schoolbook product; used for the small polynomials at the bottom of
    /// the recursion in `product_of_linear_factors`.
    pub fn mul(&self, other: &ModPoly) -> ModPoly {
        debug_assert_eq!(self.modulus, other.modulus);
        let mut out = vec![BigUint::zero(); self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coeffs.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        let mut p = ModPoly {
            modulus: self.modulus.clone(),
            coeffs: out,
        };
        p.reduce();
        p
    }

    /// Build `P(x) = Π_{i} (x + roots[i]) mod modulus` via divide-and-conquer:
    /// split `[lo, hi)` at the midpoint, recurse on both halves, and
    /// multiply the results. An empty root set yields the constant `1`.
    pub fn product_of_linear_factors(roots: &[BigUint], modulus: &BigUint) -> ModPoly {
        fn go(roots: &[BigUint], modulus: &BigUint) -> ModPoly {
            match roots.len() {
                0 => ModPoly::one(modulus.clone()),
                1 => ModPoly::linear(&roots[0], modulus.clone()),
                n => {
                    let mid = n / 2;
                    let (left_roots, right_roots) = roots.split_at(mid);
                    let (left, right) = if n > 64 {
                        rayon::join(|| go(left_roots, modulus), || go(right_roots, modulus))
                    } else {
                        (go(left_roots, modulus), go(right_roots, modulus))
                    };
                    left.mul(&right)
                }
            }
        }
        go(roots, modulus)
    }
}
