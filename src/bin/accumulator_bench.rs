//! `accumulator_bench <bilinear|rsa> <set_size>`: builds a random set,
//! accumulates it both privately and publicly, generates witnesses both
//! ways, and verifies, printing one timing line per phase and diffing the
//! two accumulator values on mismatch rather than aborting.
//!
//! Exit codes: 0 success, 1 invalid arguments, 2 verification failed.

use std::env;
use std::process::ExitCode;

use ff::Field;
use rand::Rng;
use rand_core::SeedableRng;

use crypto_accumulators::bigint::FieldInt;
use crypto_accumulators::bm::{BMAccumulator, BMKey};
use crypto_accumulators::curve::{Scalar, G1, G2};
use crypto_accumulators::pool::TaskPool;
use crypto_accumulators::profiler::{generate_random_set, PhaseTimer};
use crypto_accumulators::rsa::{RSAAccumulator, RSAKey};
use group::Group;

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: accumulator_bench <bilinear|rsa> <set_size>");
        return ExitCode::from(1);
    }
    let set_size: usize = match args[2].parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("invalid set_size: {}", args[2]);
            return ExitCode::from(1);
        }
    };

    let ok = match args[1].as_str() {
        "bilinear" => run_bilinear(set_size),
        "rsa" => run_rsa(set_size),
        other => {
            eprintln!("unknown accumulator kind: {} (expected bilinear|rsa)", other);
            return ExitCode::from(1);
        }
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}

fn run_bilinear(set_size: usize) -> bool {
    let pool = TaskPool::new_default();
    let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(0xACC0 as u64);

    let timer = PhaseTimer::start("bm keygen");
    let key = BMKey::generate(&mut rng, set_size as u64, &pool);
    timer.finish();

    let set: Vec<Scalar> = generate_random_set(&mut rng, set_size)
        .into_iter()
        .map(|v| Scalar::from(v as u64))
        .collect();

    let timer = PhaseTimer::start("bm accumulate (private)");
    let mut acc_private = G1::generator();
    BMAccumulator::accumulate_private(&set, &key.secret, &mut acc_private);
    timer.finish();

    let timer = PhaseTimer::start("bm accumulate (public)");
    let acc_public = BMAccumulator::accumulate_public(&set, &key.public, &pool);
    timer.finish();

    if acc_private != acc_public {
        println!(
            "MISMATCH: private accumulator and public accumulator disagree\n  private: {:?}\n  public:  {:?}",
            acc_private, acc_public
        );
        return false;
    }

    let timer = PhaseTimer::start("bm witnesses (private)");
    let witnesses = BMAccumulator::witnesses_private(&set, &key.secret, &G2::generator(), &pool);
    timer.finish();

    let timer = PhaseTimer::start("bm verify");
    let ok = set
        .iter()
        .zip(witnesses.iter())
        .all(|(e, w)| BMAccumulator::verify(e, w, &acc_private, &key.public));
    timer.finish();

    ok
}

fn run_rsa(set_size: usize) -> bool {
    let pool = TaskPool::new_default();
    let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(0xACC1 as u64);

    let timer = PhaseTimer::start("rsa keygen");
    let key = match RSAKey::generate(&mut rng, 300, 2048) {
        Ok(k) => k,
        Err(e) => {
            eprintln!("keygen failed: {}", e);
            return false;
        }
    };
    timer.finish();

    let elements: Vec<FieldInt> = generate_random_set(&mut rng, set_size)
        .into_iter()
        .map(|v| FieldInt::from_u64(v.unsigned_abs()))
        .collect();

    let timer = PhaseTimer::start("rsa representatives");
    let reps = RSAAccumulator::generate_representatives(&elements, &key.public, &pool);
    timer.finish();

    let timer = PhaseTimer::start("rsa accumulate (private)");
    let acc_private = RSAAccumulator::accumulate_private(&reps, &key);
    timer.finish();

    let timer = PhaseTimer::start("rsa accumulate (public)");
    let acc_public = RSAAccumulator::accumulate_public(&reps, &key.public);
    timer.finish();

    if acc_private != acc_public {
        println!(
            "MISMATCH: private accumulator and public accumulator disagree\n  private: {:x}\n  public:  {:x}",
            acc_private, acc_public
        );
        return false;
    }

    let timer = PhaseTimer::start("rsa witnesses (private)");
    let witnesses = RSAAccumulator::witnesses_private(&reps, &key, &pool);
    timer.finish();

    let timer = PhaseTimer::start("rsa verify");
    let ok = elements
        .iter()
        .zip(witnesses.iter())
        .all(|(e, w)| RSAAccumulator::verify(e, w, &acc_private, &key.public));
    timer.finish();

    ok
}
