//! The three opaque curve-group types and the Scalar field, backed by
//! `blstrs`'s BLS12-381 implementation.

use blstrs::{Bls12, G1Affine, G1Projective, G2Affine, G2Prepared, G2Projective};
use ff::{Field, PrimeField};
use group::{Curve, Group as _};
use num_bigint::BigUint;
use pairing::{MillerLoopResult, MultiMillerLoop};
use rand_core::RngCore;
use std::convert::TryInto;

pub use blstrs::{Gt, Scalar};

/// `G1` as used by the public key's first vector and by set accumulators.
pub type G1 = G1Projective;
/// `G2` as used by the public key's second vector and by witnesses.
pub type G2 = G2Projective;

/// The order of the BLS12-381 scalar field, hardcoded for Scalar<->ModInt
/// conversions.
pub const SCALAR_FIELD_ORDER_DEC: &str =
    "52435875175126190479447740508185965837690552500527637822603658699938581184513";

pub fn scalar_field_order() -> BigUint {
    SCALAR_FIELD_ORDER_DEC.parse().expect("hardcoded constant parses")
}

/// Converts a `Scalar` to the big-endian-agnostic `BigUint` representation
/// used by `ModPoly`/`ModInt` coefficient arithmetic.
pub fn scalar_to_biguint(s: &Scalar) -> BigUint {
    let bytes = s.to_bytes_le();
    BigUint::from_bytes_le(&bytes)
}

/// Reduces `v` modulo the scalar field order and converts to a `Scalar`.
pub fn biguint_to_scalar(v: &BigUint) -> Scalar {
    let reduced = v % scalar_field_order();
    let mut bytes = reduced.to_bytes_le();
    bytes.resize(32, 0u8);
    let arr: [u8; 32] = bytes.try_into().expect("resized to 32 bytes");
    Scalar::from_bytes_le(&arr).expect("value was reduced mod the field order")
}

pub fn random_scalar<R: RngCore>(rng: &mut R) -> Scalar {
    Scalar::random(rng)
}

/// `e(a, b)`, the non-degenerate bilinear pairing `G1 x G2 -> GT`.
pub fn pairing(a: &G1, b: &G2) -> Gt {
    let a_affine = a.to_affine();
    let b_affine = b.to_affine();
    let prepared = G2Prepared::from(b_affine);
    let miller = <Bls12 as MultiMillerLoop>::multi_miller_loop(&[(&a_affine, &prepared)]);
    miller.final_exponentiation()
}

/// Serialized byte length of a `G1` element as used in the public-key file
/// format (compressed affine encoding).
pub const G1_BYTE_SIZE: usize = 48;
/// Serialized byte length of a `G2` element.
pub const G2_BYTE_SIZE: usize = 96;

pub fn g1_to_bytes(p: &G1) -> [u8; G1_BYTE_SIZE] {
    G1Affine::from(p).to_compressed()
}

pub fn g1_from_bytes(bytes: &[u8; G1_BYTE_SIZE]) -> Option<G1> {
    let affine = G1Affine::from_compressed(bytes);
    if affine.is_some().into() {
        Some(affine.unwrap().into())
    } else {
        None
    }
}

pub fn g2_to_bytes(p: &G2) -> [u8; G2_BYTE_SIZE] {
    G2Affine::from(p).to_compressed()
}

pub fn g2_from_bytes(bytes: &[u8; G2_BYTE_SIZE]) -> Option<G2> {
    let affine = G2Affine::from_compressed(bytes);
    if affine.is_some().into() {
        Some(affine.unwrap().into())
    } else {
        None
    }
}
