//! Wall-clock phase timers and random-set generation for the benchmark
//! harness.

use std::time::Instant;

use rand::Rng;

/// Measures one named phase of the benchmark.
pub struct PhaseTimer {
    label: String,
    start: Instant,
}

impl PhaseTimer {
    pub fn start(label: impl Into<String>) -> Self {
        PhaseTimer {
            label: label.into(),
            start: Instant::now(),
        }
    }

    /// Ends the phase, printing `"<label>: <elapsed>"` and returning the
    /// elapsed duration for callers that also want it programmatically.
    pub fn finish(self) -> std::time::Duration {
        let elapsed = self.start.elapsed();
        println!("{}: {:?}", self.label, elapsed);
        elapsed
    }
}

/// `size` random non-negative 63-bit integers, without replacement
/// (`Profiler::generateRandomSet`).
pub fn generate_random_set<R: Rng>(rng: &mut R, size: usize) -> Vec<i64> {
    let mut seen = std::collections::HashSet::with_capacity(size);
    let mut out = Vec::with_capacity(size);
    while out.len() < size {
        let v = rng.gen_range(0..i64::MAX);
        if seen.insert(v) {
            out.push(v);
        }
    }
    out
}
