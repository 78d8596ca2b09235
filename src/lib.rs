//! Two cryptographic set accumulators, compact commitments to a set that
//! admit short, publicly verifiable membership witnesses, over an RSA
//! group (`rsa`) and a pairing-friendly elliptic curve (`bm`). `bigint`,
//! `modpoly`, `curve`, `heap`, `multiexp`, `primerep` and `pool` are the
//! field/group arithmetic and concurrency primitives the two
//! constructions orchestrate.

pub mod bigint;
pub mod bm;
pub mod curve;
pub mod error;
pub mod hash;
pub mod heap;
pub mod io;
pub mod merkle;
pub mod modpoly;
pub mod multiexp;
pub mod pool;
pub mod primerep;
pub mod profiler;
pub mod rsa;
pub mod suffix;

pub use error::{AccumulatorError, Result};
