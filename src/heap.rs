//! Max-heap over an external array of scalars, keyed by magnitude.
//!
//! Positions and scalars are kept in two separate slices on purpose:
//! `pos[i]` is an index into the caller-owned `s` slice, never a scalar
//! itself, so the sift logic stays purely index-based.

use num_bigint::BigUint;

use crate::curve::{scalar_to_biguint, Scalar};

fn key(pos: &[usize], i: usize, s: &[Scalar]) -> BigUint {
    scalar_to_biguint(&s[pos[i]])
}

fn sift_down(pos: &mut [usize], mut idx: usize, s: &[Scalar]) {
    let len = pos.len();
    loop {
        let l = 2 * idx + 1;
        let r = 2 * idx + 2;
        let mut largest = idx;
        if l < len && key(pos, l, s) > key(pos, largest, s) {
            largest = l;
        }
        if r < len && key(pos, r, s) > key(pos, largest, s) {
            largest = r;
        }
        if largest == idx {
            break;
        }
        pos.swap(idx, largest);
        idx = largest;
    }
}

/// Builds a max-heap in `pos` (in place) with respect to the current
/// values of `s`, via repeated sift-down from `floor(L/2)` downward.
/// Callers must odd-ify `L` beforehand (`tctr = (ctr-1)|1`) so every
/// internal node has two children.
pub fn init(pos: &mut [usize], s: &[Scalar]) {
    let len = pos.len();
    if len < 2 {
        return;
    }
    for idx in (0..=(len / 2).saturating_sub(1)).rev() {
        sift_down(pos, idx, s);
    }
}

/// Returns the external indices of the root and the larger of its two
/// children (ties prefer the left child). Does not mutate `pos` or `s`.
pub fn get_top_two(pos: &[usize], s: &[Scalar]) -> (usize, usize) {
    let len = pos.len();
    let max1 = pos[0];
    if len == 1 {
        return (max1, max1);
    }
    let l = 1;
    let r = 2;
    let max2 = if r < len {
        if key(pos, r, s) > key(pos, l, s) {
            pos[r]
        } else {
            pos[l]
        }
    } else {
        pos[l]
    };
    (max1, max2)
}

/// Sifts the (externally mutated) root back down. Must be called after
/// the caller subtracts the second-largest scalar from the root's value.
pub fn root_replaced(pos: &mut [usize], s: &[Scalar]) {
    sift_down(pos, 0, s);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::biguint_to_scalar;

    fn scalars(vals: &[u64]) -> Vec<Scalar> {
        vals.iter().map(|v| biguint_to_scalar(&BigUint::from(*v))).collect()
    }

    #[test]
    fn heap_property_holds_after_init() {
        let s = scalars(&[3, 9, 1, 7, 4, 8, 2]);
        let mut pos: Vec<usize> = (0..s.len()).collect();
        init(&mut pos, &s);
        for i in 0..pos.len() {
            let l = 2 * i + 1;
            let r = 2 * i + 2;
            if l < pos.len() {
                assert!(key(&pos, i, &s) >= key(&pos, l, &s));
            }
            if r < pos.len() {
                assert!(key(&pos, i, &s) >= key(&pos, r, &s));
            }
        }
    }

    #[test]
    fn get_top_two_returns_root_and_larger_child() {
        let s = scalars(&[3, 9, 1, 7, 4, 8, 2]);
        let mut pos: Vec<usize> = (0..s.len()).collect();
        init(&mut pos, &s);
        let (max1, max2) = get_top_two(&pos, &s);
        assert_eq!(max1, pos[0]);
        assert!(scalar_to_biguint(&s[max1]) >= scalar_to_biguint(&s[max2]));
    }

    #[test]
    fn root_replaced_restores_heap_property() {
        let mut s = scalars(&[3, 9, 1, 7, 4, 8, 2]);
        let mut pos: Vec<usize> = (0..s.len()).collect();
        init(&mut pos, &s);
        let (max1, max2) = get_top_two(&pos, &s);
        let v1 = scalar_to_biguint(&s[max1]);
        let v2 = scalar_to_biguint(&s[max2]);
        s[max1] = biguint_to_scalar(&(v1 - v2));
        root_replaced(&mut pos, &s);
        for i in 0..pos.len() {
            let l = 2 * i + 1;
            let r = 2 * i + 2;
            if l < pos.len() {
                assert!(key(&pos, i, &s) >= key(&pos, l, &s));
            }
            if r < pos.len() {
                assert!(key(&pos, i, &s) >= key(&pos, r, &s));
            }
        }
    }
}
