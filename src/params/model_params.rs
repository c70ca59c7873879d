//! `model.*` parameter branch (spec §6).

/// `model.time.*`: step counts for a run.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeParams {
    /// Number of main-loop steps to run after burn-in.
    pub num_steps: u32,
    /// Number of burn-in steps run before the main loop (spec §4.4.1).
    pub burn_steps: u32,
    /// Number of steps considered one simulated year, for target-
    /// partner-count redraws (spec §4.3).
    pub steps_per_year: u32,
}

/// `model.network.*`: partnership-graph configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NetworkParams {
    /// Whether a graph mirroring relationships is maintained.
    pub enable: bool,
    /// Network topology label, kept as a free string (no core behavior
    /// currently branches on it beyond `enable`/`static_network`).
    pub network_type: String,
    /// Maximum size of a connected component, used by the
    /// `same_component` mixing restriction (spec §4.3, step 5).
    pub component_size_max: usize,
}

/// `model.seed.*`: the two named random seeds (spec §5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SeedParams {
    /// Seeds `pop_random` (and, offset by one, `np_random`).
    pub ppl: u64,
    /// Seeds `run_random`.
    pub run: u64,
}

/// `model.*`: the top-level run configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ModelParams {
    /// Target total population size.
    pub num_pop: u64,
    /// Step-count configuration.
    pub time: TimeParams,
    /// Partnership-graph configuration.
    pub network: NetworkParams,
    /// Random seeds.
    pub seed: SeedParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_params_construct() {
        let params = ModelParams {
            num_pop: 100,
            time: TimeParams { num_steps: 52, burn_steps: 10, steps_per_year: 52 },
            network: NetworkParams {
                enable: true,
                network_type: "scale_free".into(),
                component_size_max: 50,
            },
            seed: SeedParams { ppl: 1, run: 2 },
        };
        assert_eq!(params.num_pop, 100);
        assert_eq!(params.seed.ppl, 1);
    }
}
