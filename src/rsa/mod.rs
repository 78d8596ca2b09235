//! RSA set accumulator: elements are mapped to prime representatives and
//! accumulated as an exponent product in `(Z/NZ)*`.

mod accumulator;
mod key;

pub use accumulator::RSAAccumulator;
pub use key::{RSAKey, RSAPublicKey};
