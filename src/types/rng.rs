//! Seeded random-stream discipline (spec §5).
//!
//! Exactly two named streams drive every decision in the model:
//! `pop_random` (population construction and partner selection) and
//! `run_random` (time-stepped dynamics). A third, `np_random`, is
//! derived from the same population seed but kept as a *distinct*
//! generator so that Poisson/bin draws never perturb the sequence of
//! plain uniform draws `pop_random` produces — mirroring
//! `original_source/titan/population.py`'s `self.pop_random` /
//! `self.np_random` split.
//!
//! All three are `ChaCha12Rng`, seeded deterministically, the way
//! `TheIllusionOfLife-digital_life` seeds its simulation RNGs
//! (`ChaCha12Rng::seed_from_u64`).

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// A single named, seeded random stream.
///
/// Thin wrapper around `ChaCha12Rng` so call sites read `stream.bernoulli(p)`
/// instead of reaching for `rand::Rng` methods directly, keeping the
/// sampling vocabulary centralized (spec §9: unify distribution access
/// behind one interface).
#[derive(Debug, Clone)]
pub struct RandomStream {
    rng: ChaCha12Rng,
    seed: u64,
}

impl RandomStream {
    /// Creates a stream seeded deterministically from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        RandomStream {
            rng: ChaCha12Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Returns the seed this stream was constructed with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws a uniform float in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Returns `true` with probability `p` (clamped to `[0, 1]`).
    pub fn bernoulli(&mut self, p: f64) -> bool {
        self.uniform() < p.clamp(0.0, 1.0)
    }

    /// Draws a uniform integer in `[min, max)`. Returns `min` if
    /// `max <= min`.
    pub fn uniform_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..max)
    }

    /// Draws a sample from a Poisson distribution with mean `mu`.
    ///
    /// Uses Knuth's algorithm, which is exact for the small-to-moderate
    /// means this model uses (partner counts, act counts); mirrors
    /// `original_source/titan/utils.py`'s `poisson` wrapper around
    /// `numpy`'s generator.
    pub fn poisson(&mut self, mu: f64) -> u64 {
        if mu <= 0.0 {
            return 0;
        }
        let l = (-mu).exp();
        let mut k: u64 = 0;
        let mut p = 1.0;
        loop {
            k += 1;
            p *= self.uniform();
            if p <= l {
                break;
            }
        }
        k - 1
    }

    /// Picks an index into `weights` proportional to the weights given,
    /// or `None` if `weights` is empty or all-zero.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().sum();
        if weights.is_empty() || total <= 0.0 {
            return None;
        }
        let mut target = self.uniform() * total;
        for (i, w) in weights.iter().enumerate() {
            if target < *w {
                return Some(i);
            }
            target -= w;
        }
        Some(weights.len() - 1)
    }

    /// Picks a uniformly random element from a slice, or `None` if empty.
    ///
    /// Equivalent to `original_source/titan/utils.py`'s
    /// `safe_random_choice` with no weights.
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..items.len());
        items.get(idx)
    }

    /// Returns the bin index (0-based) whose cumulative probability
    /// first reaches or exceeds a uniform draw, given cumulative
    /// probabilities already summed through each bin.
    ///
    /// Mirrors `original_source/titan/utils.py`'s `get_cumulative_bin`.
    /// Returns the last bin index if no cumulative probability reaches
    /// the draw (e.g. due to floating point short-falls).
    pub fn cumulative_bin(&mut self, cumulative_probs: &[f64]) -> usize {
        let draw = self.uniform();
        for (i, p) in cumulative_probs.iter().enumerate() {
            if draw <= *p {
                return i;
            }
        }
        cumulative_probs.len().saturating_sub(1)
    }
}

/// The full set of random streams a running model needs.
///
/// `Population` owns `pop` and `np`; `Model` owns `run`. They are kept
/// in one struct only for convenient construction/seeding from
/// `Params.model.seed`; ownership still follows spec §5 exactly once
/// split apart by the caller.
#[derive(Debug, Clone)]
pub struct RandomStreams {
    /// Used for population construction, agent creation, partner
    /// selection, and any other pop-seed-derived uniform draw.
    pub pop: RandomStream,
    /// Distinct distribution stream, derived from the population seed,
    /// used for Poisson/bin draws so they never perturb `pop`'s
    /// sequence of uniform draws.
    pub np: RandomStream,
    /// Used for all decisions during time-stepped dynamics.
    pub run: RandomStream,
}

impl RandomStreams {
    /// Builds the three streams from the two model seeds (spec §6:
    /// `model.seed.{ppl, run}`). The distribution stream is derived by
    /// offsetting the population seed by one, keeping it reproducible
    /// from the same seed without colliding with `pop`'s sequence.
    #[must_use]
    pub fn new(ppl_seed: u64, run_seed: u64) -> Self {
        RandomStreams {
            pop: RandomStream::new(ppl_seed),
            np: RandomStream::new(ppl_seed.wrapping_add(1)),
            run: RandomStream::new(run_seed),
        }
    }
}

/// Given a per-act probability and a number of acts, returns the total
/// probability of at least one transmission event: `1 - (1-p)^n`.
///
/// Mirrors `original_source/titan/utils.py`'s `total_probability` /
/// `binom_0`.
#[must_use]
pub fn total_probability(p: f64, num_acts: u64) -> f64 {
    if num_acts == 0 {
        0.0
    } else {
        1.0 - (1.0 - p).powi(num_acts.min(i32::MAX as u64) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RandomStream::new(123);
        let mut b = RandomStream::new(123);
        for _ in 0..50 {
            assert_eq!(a.uniform(), b.uniform());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = RandomStream::new(1);
        let mut b = RandomStream::new(2);
        let seq_a: Vec<f64> = (0..10).map(|_| a.uniform()).collect();
        let seq_b: Vec<f64> = (0..10).map(|_| b.uniform()).collect();
        assert_ne!(seq_a, seq_b);
    }

    #[test]
    fn bernoulli_always_true_at_one() {
        let mut s = RandomStream::new(5);
        for _ in 0..20 {
            assert!(s.bernoulli(1.0));
        }
    }

    #[test]
    fn bernoulli_always_false_at_zero() {
        let mut s = RandomStream::new(5);
        for _ in 0..20 {
            assert!(!s.bernoulli(0.0));
        }
    }

    #[test]
    fn uniform_range_respects_bounds() {
        let mut s = RandomStream::new(9);
        for _ in 0..200 {
            let v = s.uniform_range(3, 8);
            assert!((3..8).contains(&v));
        }
    }

    #[test]
    fn uniform_range_degenerate_returns_min() {
        let mut s = RandomStream::new(9);
        assert_eq!(s.uniform_range(5, 5), 5);
        assert_eq!(s.uniform_range(5, 2), 5);
    }

    #[test]
    fn poisson_zero_mean_is_zero() {
        let mut s = RandomStream::new(1);
        for _ in 0..20 {
            assert_eq!(s.poisson(0.0), 0);
        }
    }

    #[test]
    fn poisson_mean_is_roughly_centered() {
        let mut s = RandomStream::new(1);
        let draws: Vec<u64> = (0..2000).map(|_| s.poisson(5.0)).collect();
        let mean = draws.iter().sum::<u64>() as f64 / draws.len() as f64;
        assert!((mean - 5.0).abs() < 0.5, "mean was {mean}");
    }

    #[test]
    fn weighted_index_picks_only_nonzero_weight() {
        let mut s = RandomStream::new(2);
        for _ in 0..20 {
            assert_eq!(s.weighted_index(&[0.0, 1.0, 0.0]), Some(1));
        }
    }

    #[test]
    fn weighted_index_empty_is_none() {
        let mut s = RandomStream::new(2);
        assert_eq!(s.weighted_index(&[]), None);
    }

    #[test]
    fn choice_from_empty_is_none() {
        let mut s = RandomStream::new(2);
        let empty: Vec<i32> = vec![];
        assert_eq!(s.choice(&empty), None);
    }

    #[test]
    fn choice_single_element() {
        let mut s = RandomStream::new(2);
        let items = vec![42];
        assert_eq!(s.choice(&items), Some(&42));
    }

    #[test]
    fn cumulative_bin_picks_first_reaching_bin() {
        let mut s = RandomStream::new(77);
        for _ in 0..50 {
            let bin = s.cumulative_bin(&[0.2, 0.5, 1.0]);
            assert!(bin <= 2);
        }
    }

    #[test]
    fn random_streams_are_independent() {
        let streams = RandomStreams::new(10, 20);
        assert_eq!(streams.pop.seed(), 10);
        assert_eq!(streams.np.seed(), 11);
        assert_eq!(streams.run.seed(), 20);
    }

    #[test]
    fn total_probability_single_act_is_p() {
        assert!((total_probability(0.3, 1) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn total_probability_zero_acts_is_zero() {
        assert_eq!(total_probability(0.3, 0), 0.0);
    }

    #[test]
    fn total_probability_many_acts_approaches_one() {
        let p = total_probability(0.5, 20);
        assert!(p > 0.999_999);
    }
}
