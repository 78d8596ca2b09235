//! Bilinear-map set accumulator: the set is encoded as a polynomial in
//! the secret trapdoor `s`, accumulated as a group element via a pairing.

mod accumulator;
mod key;

pub use accumulator::BMAccumulator;
pub use key::{BMKey, BMPublicKey};
