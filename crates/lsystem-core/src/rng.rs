//! The engine's single global PRNG stream.
//!
//! A single global stream, reseeded once at program start, shared by successor selection
//! (`Produce`) and the `rand`/`srand` builtin functions — so a condition expression that
//! calls `srand(n)` is observable by later stochastic productions in the same run.

use rand::{Rng as _, SeedableRng};

/// Wraps the engine's PRNG state so derivation and the `rand`/`srand` builtins draw from
/// exactly one stream.
#[derive(Debug, Clone)]
pub struct Rng {
    inner: rand::rngs::StdRng,
    seed: u64,
}

impl Rng {
    /// Seeds from an explicit value (the `-s`/`--seed` CLI flag, or a reproducible test).
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: rand::rngs::StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seeds from the wall clock, matching the CLI's default seed behavior.
    #[must_use]
    pub fn from_entropy() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::from_seed(seed)
    }

    /// Reseeds in place; used by the `srand(n)` builtin. Returns the seed that was applied.
    pub fn reseed(&mut self, seed: u64) -> u64 {
        self.inner = rand::rngs::StdRng::seed_from_u64(seed);
        self.seed = seed;
        seed
    }

    /// The seed this stream was last (re)seeded with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws a uniform value in `[0, 1)`, used by both successor selection and `rand()`.
    pub fn uniform_unit(&mut self) -> f64 {
        self.inner.gen_range(0.0..1.0)
    }

    /// Draws a uniform value in `[0, n)`, used by `rand(n)`.
    pub fn uniform(&mut self, n: f64) -> f64 {
        self.uniform_unit() * n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_reproduces_the_same_stream() {
        let mut a = Rng::from_seed(42);
        let mut b = Rng::from_seed(42);
        let draws_a: Vec<_> = (0..10).map(|_| a.uniform_unit()).collect();
        let draws_b: Vec<_> = (0..10).map(|_| b.uniform_unit()).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn different_seeds_usually_differ() {
        let mut a = Rng::from_seed(42);
        let mut b = Rng::from_seed(43);
        assert_ne!(a.uniform_unit(), b.uniform_unit());
    }

    #[test]
    fn reseed_reroutes_the_stream() {
        let mut a = Rng::from_seed(42);
        let first = a.uniform_unit();
        a.reseed(42);
        let after_reseed = a.uniform_unit();
        assert_eq!(first, after_reseed);
    }
}
