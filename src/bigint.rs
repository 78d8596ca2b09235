//! Arbitrary-precision integers and residues modulo `m`.
//!
//! `FieldInt` and `ModInt` are thin wrappers over `num-bigint-dig` so the
//! rest of the crate never reaches for `num_bigint` types directly.

use num_bigint::prime::probably_prime;
use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::Rng;

use crate::error::{AccumulatorError, Result};

/// Number of Miller-Rabin rounds used by `next_prime`'s primality check.
/// 20 rounds is the value `num-bigint-dig`'s own RSA keygen path uses.
const PRIME_CHECK_ROUNDS: usize = 20;

/// A signed arbitrary-precision integer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct FieldInt(BigInt);

impl FieldInt {
    pub fn from_bigint(v: BigInt) -> Self {
        FieldInt(v)
    }

    pub fn from_u64(v: u64) -> Self {
        FieldInt(BigInt::from(v))
    }

    pub fn zero() -> Self {
        FieldInt(BigInt::zero())
    }

    pub fn one() -> Self {
        FieldInt(BigInt::one())
    }

    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }

    pub fn into_bigint(self) -> BigInt {
        self.0
    }

    /// Big-endian byte encoding of `|self|`, using exactly
    /// `ceil(bit_length / 8)` bytes.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let (_, mag) = self.0.to_bytes_be();
        let want = (self.bit_length() + 7) / 8;
        if mag.len() >= want.max(1) {
            mag
        } else {
            let mut out = vec![0u8; want.max(1) - mag.len()];
            out.extend_from_slice(&mag);
            out
        }
    }

    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        FieldInt(BigInt::from_bytes_be(Sign::Plus, bytes))
    }

    /// Number of bits needed to represent `|self|` (0 for zero).
    pub fn bit_length(&self) -> usize {
        self.0.magnitude().bits() as usize
    }

    pub fn to_hex(&self) -> String {
        format!("{:x}", self.0.magnitude())
    }

    /// The top 64 bits of `self`'s magnitude, taken from the 16 most
    /// significant hex digits of its hex form. Short integers are
    /// implicitly zero-padded on the left.
    pub fn top_64_bits(&self) -> u64 {
        let hex = self.to_hex();
        let top16 = if hex.len() >= 16 { &hex[..16] } else { &hex[..] };
        u64::from_str_radix(top16, 16).unwrap_or(0)
    }

    pub fn shl(&self, bits: u32) -> Self {
        FieldInt(&self.0 << bits)
    }

    /// Smallest probable prime `p >= self`.
    pub fn next_prime(&self) -> Self {
        let mut candidate = self.0.clone();
        if candidate < BigInt::from(2) {
            return FieldInt(BigInt::from(2));
        }
        if candidate.is_even() {
            candidate += 1;
        }
        loop {
            let (_, mag) = candidate.to_bytes_be();
            let unsigned = BigUint::from_bytes_be(&mag);
            if probably_prime(&unsigned, PRIME_CHECK_ROUNDS) {
                return FieldInt(candidate);
            }
            candidate += 2;
        }
    }

    /// A random probable prime with exactly `bits` bits, used by RSA keygen.
    pub fn random_prime<R: Rng>(rng: &mut R, bits: usize) -> Self {
        loop {
            let candidate: BigUint =
                rng.gen_biguint(bits) | (BigUint::one() << (bits - 1)) | BigUint::one();
            if probably_prime(&candidate, PRIME_CHECK_ROUNDS) {
                return FieldInt(BigInt::from_biguint(Sign::Plus, candidate));
            }
        }
    }
}

impl std::ops::Add for &FieldInt {
    type Output = FieldInt;
    fn add(self, rhs: &FieldInt) -> FieldInt {
        FieldInt(&self.0 + &rhs.0)
    }
}

impl std::ops::Mul for &FieldInt {
    type Output = FieldInt;
    fn mul(self, rhs: &FieldInt) -> FieldInt {
        FieldInt(&self.0 * &rhs.0)
    }
}

/// A residue modulo `modulus`, always kept reduced into `[0, modulus)`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ModInt {
    value: BigUint,
    modulus: BigUint,
}

impl ModInt {
    pub fn new(value: BigUint, modulus: BigUint) -> Self {
        let value = value % &modulus;
        ModInt { value, modulus }
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Reassign the modulus, re-reducing the stored value.
    pub fn set_modulus(&mut self, modulus: BigUint) {
        self.value %= &modulus;
        self.modulus = modulus;
    }

    fn check_same_modulus(&self, other: &ModInt) -> Result<()> {
        if self.modulus != other.modulus {
            return Err(AccumulatorError::ArithmeticMismatch {
                lhs: self.modulus.to_string(),
                rhs: other.modulus.to_string(),
            });
        }
        Ok(())
    }

    pub fn add(&self, other: &ModInt) -> Result<ModInt> {
        self.check_same_modulus(other)?;
        Ok(ModInt::new(&self.value + &other.value, self.modulus.clone()))
    }

    pub fn mul(&self, other: &ModInt) -> Result<ModInt> {
        self.check_same_modulus(other)?;
        Ok(ModInt::new(&self.value * &other.value, self.modulus.clone()))
    }

    /// `self^exp mod modulus`.
    pub fn pow(&self, exp: &BigUint) -> ModInt {
        ModInt::new(self.value.modpow(exp, &self.modulus), self.modulus.clone())
    }
}

impl std::fmt::Display for ModInt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (mod {})", self.value, self.modulus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_prime_of_small_values() {
        assert_eq!(FieldInt::from_u64(8).next_prime(), FieldInt::from_u64(11));
        assert_eq!(FieldInt::from_u64(2).next_prime(), FieldInt::from_u64(2));
        assert_eq!(FieldInt::from_u64(1).next_prime(), FieldInt::from_u64(2));
    }

    #[test]
    fn top_64_bits_matches_most_significant_hex_digits() {
        // 0x0123456789abcdef_0000 -> top 16 hex digits are 0123456789abcdef
        let v = FieldInt::from_bigint(BigInt::parse_bytes(b"0123456789abcdef0000", 16).unwrap());
        assert_eq!(v.top_64_bits(), 0x0123456789abcdef);
    }

    #[test]
    fn mod_int_rejects_mismatched_moduli() {
        let a = ModInt::new(BigUint::from(3u32), BigUint::from(7u32));
        let b = ModInt::new(BigUint::from(3u32), BigUint::from(11u32));
        assert!(a.add(&b).is_err());
    }

    #[test]
    fn mod_int_add_reduces() {
        let a = ModInt::new(BigUint::from(5u32), BigUint::from(7u32));
        let b = ModInt::new(BigUint::from(4u32), BigUint::from(7u32));
        let c = a.add(&b).unwrap();
        assert_eq!(*c.value(), BigUint::from(2u32));
    }
}
