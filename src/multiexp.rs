//! Batched variable-time multi-scalar multiplication: computes
//! `sum_i s_i * P_i` using a Bos-Coster/Pippenger-style greedy reduction
//! over the heap module instead of `n` independent scalar-multiplies.
//!
//! `MAX_HEAP_SIZE = 8191`, the `(ctr-1)|1` odd-ify for the residual chunk,
//! and the `ctr > 5` naive fallback threshold are preserved bit-for-bit
//! for reproducibility against known test vectors.

use ff::Field;
use group::Group;

use crate::curve::Scalar;
use crate::heap;

/// Chunk size for the heap-reduction loop; chosen odd via `(ctr-1)|1` so
/// every internal heap node has two children.
const MAX_HEAP_SIZE: usize = 8191;
/// Below this many leftover points, fall back to a naive sum.
const NAIVE_FALLBACK_THRESHOLD: usize = 5;

/// `sum_i scalars[i] * points[i]`, variable-time.
///
/// Consumes `points`/`scalars`: the reduction mutates both arrays in place,
/// and each chunk owns the slice it was handed. `points.len() !=
/// scalars.len()` panics.
pub fn multiscalar_mul<G>(mut points: Vec<G>, mut scalars: Vec<Scalar>) -> G
where
    G: Group<Scalar = Scalar>,
{
    assert_eq!(points.len(), scalars.len());
    let mut rop = G::identity();
    let mut offset = 0usize;
    let total = points.len();

    while total - offset >= MAX_HEAP_SIZE {
        rop += reduce_chunk(&mut points[offset..offset + MAX_HEAP_SIZE], &mut scalars[offset..offset + MAX_HEAP_SIZE]);
        offset += MAX_HEAP_SIZE;
    }

    let remaining = total - offset;
    if remaining > NAIVE_FALLBACK_THRESHOLD {
        let tctr = (remaining - 1) | 1;
        rop += reduce_chunk(&mut points[offset..offset + tctr], &mut scalars[offset..offset + tctr]);
        offset += tctr;
    }

    for i in offset..total {
        rop += points[i] * scalars[i];
    }

    rop
}

/// One heap-reduction pass over a chunk of at most `MAX_HEAP_SIZE` points:
/// repeatedly subtract the second-largest scalar from the largest, fold the
/// corresponding point addition, and finish with a single scalar-mul.
fn reduce_chunk<G>(points: &mut [G], scalars: &mut [Scalar]) -> G
where
    G: Group<Scalar = Scalar>,
{
    let len = scalars.len();
    if len == 0 {
        return G::identity();
    }
    if len == 1 {
        return points[0] * scalars[0];
    }

    let mut pos: Vec<usize> = (0..len).collect();
    heap::init(&mut pos, scalars);

    let (mut max1, mut max2) = heap::get_top_two(&pos, scalars);
    loop {
        if bool::from(scalars[max2].is_zero()) {
            break;
        }
        scalars[max1] -= scalars[max2];
        let p1 = points[max1];
        points[max2] += p1;
        heap::root_replaced(&mut pos, scalars);
        let next = heap::get_top_two(&pos, scalars);
        max1 = next.0;
        max2 = next.1;
    }

    points[max1] * scalars[max1]
}

/// Naive `sum_i s_i * P_i`, used by `reduce_chunk` callers for tiny chunks
/// and as the reference implementation in tests.
pub fn naive_multiscalar_mul<G>(points: &[G], scalars: &[Scalar]) -> G
where
    G: Group<Scalar = Scalar>,
{
    assert_eq!(points.len(), scalars.len());
    points
        .iter()
        .zip(scalars.iter())
        .fold(G::identity(), |acc, (p, s)| acc + *p * *s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::G1;
    use rand_core::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn rng() -> XorShiftRng {
        XorShiftRng::from_seed([9u8; 16])
    }

    #[test]
    fn empty_input_is_identity() {
        let r: G1 = multiscalar_mul(vec![], vec![]);
        assert_eq!(r, G1::identity());
    }

    #[test]
    fn matches_naive_sum_small() {
        let mut rng = rng();
        let points: Vec<G1> = (0..8).map(|_| G1::random(&mut rng)).collect();
        let scalars: Vec<Scalar> = (1..=8u64).map(Scalar::from).collect();
        let expected = naive_multiscalar_mul(&points, &scalars);
        let got = multiscalar_mul(points, scalars);
        assert_eq!(expected, got);
    }

    #[test]
    fn matches_naive_sum_with_zero_scalar() {
        let mut rng = rng();
        let points: Vec<G1> = (0..6).map(|_| G1::random(&mut rng)).collect();
        let mut scalars: Vec<Scalar> = (1..=6u64).map(Scalar::from).collect();
        scalars[2] = Scalar::zero();
        let expected = naive_multiscalar_mul(&points, &scalars);
        let got = multiscalar_mul(points, scalars);
        assert_eq!(expected, got);
    }

    #[test]
    fn matches_naive_sum_across_chunk_boundary() {
        let mut rng = rng();
        let n = 20usize;
        let points: Vec<G1> = (0..n).map(|_| G1::random(&mut rng)).collect();
        let scalars: Vec<Scalar> = (0..n).map(|i| Scalar::from((i as u64) + 1)).collect();
        let expected = naive_multiscalar_mul(&points, &scalars);
        let got = multiscalar_mul(points, scalars);
        assert_eq!(expected, got);
    }
}
