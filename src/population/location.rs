//! Named locations, each with a parameter overlay and precomputed
//! per-race weight tables (spec §2: "Location / Geography").

use crate::enums::{DrugType, Race, SexRole, SexType};
use crate::params::Params;
use crate::types::RandomStream;
use std::collections::HashMap;
use std::sync::Arc;

/// A named location: a parameter overlay plus precomputed weight
/// tables used to draw a new agent's sex type, drug type, and sex role
/// given its race (spec §2, §4: "`location.pop_weights[race]`/
/// `drug_weights`/`role_weights`").
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Location {
    /// This location's name.
    pub name: String,
    /// Location-specific parameter overrides, consulted in place of
    /// the global [`Params`] tree wherever set (spec §2: "each carries
    /// its own parameter overlay"). `None` means this location defers
    /// entirely to the global tree.
    pub overlay: Option<Arc<Params>>,
    sex_type_weights: HashMap<Race, Vec<(SexType, f64)>>,
    drug_type_weights: HashMap<Race, Vec<(DrugType, f64)>>,
    role_weights: HashMap<Race, Vec<(SexRole, f64)>>,
}

impl Location {
    /// Creates a location with no overlay and empty weight tables
    /// (sampling falls back to a uniform draw over the declared
    /// classes until tables are populated via the `set_*` methods).
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Location {
            name: name.into(),
            overlay: None,
            sex_type_weights: HashMap::new(),
            drug_type_weights: HashMap::new(),
            role_weights: HashMap::new(),
        }
    }

    /// Declares this location's sex-type weights for `race`.
    pub fn set_sex_type_weights(&mut self, race: Race, weights: Vec<(SexType, f64)>) {
        self.sex_type_weights.insert(race, weights);
    }

    /// Declares this location's drug-type weights for `race`.
    pub fn set_drug_type_weights(&mut self, race: Race, weights: Vec<(DrugType, f64)>) {
        self.drug_type_weights.insert(race, weights);
    }

    /// Declares this location's sex-role weights for `race`.
    pub fn set_role_weights(&mut self, race: Race, weights: Vec<(SexRole, f64)>) {
        self.role_weights.insert(race, weights);
    }

    /// Returns the effective parameter tree: this location's overlay,
    /// if set, otherwise `global`.
    #[must_use]
    pub fn effective_params<'a>(&'a self, global: &'a Params) -> &'a Params {
        self.overlay.as_deref().unwrap_or(global)
    }

    /// Draws a sex type for a new agent of `race`, using this
    /// location's weight table, falling back to [`SexType::HM`] if
    /// nothing is declared for `race`.
    #[must_use]
    pub fn sample_sex_type(&self, race: Race, stream: &mut RandomStream) -> SexType {
        sample_weighted(self.sex_type_weights.get(&race), stream).unwrap_or(SexType::HM)
    }

    /// Draws a drug type for a new agent of `race`, falling back to
    /// [`DrugType::None`] if nothing is declared for `race`.
    #[must_use]
    pub fn sample_drug_type(&self, race: Race, stream: &mut RandomStream) -> DrugType {
        sample_weighted(self.drug_type_weights.get(&race), stream).unwrap_or(DrugType::None)
    }

    /// Draws a sex role for a new agent of `race`, falling back to
    /// [`SexRole::Versatile`] if nothing is declared for `race`.
    #[must_use]
    pub fn sample_sex_role(&self, race: Race, stream: &mut RandomStream) -> SexRole {
        sample_weighted(self.role_weights.get(&race), stream).unwrap_or(SexRole::Versatile)
    }
}

fn sample_weighted<T: Copy>(table: Option<&Vec<(T, f64)>>, stream: &mut RandomStream) -> Option<T> {
    let entries = table?;
    let weights: Vec<f64> = entries.iter().map(|(_, w)| *w).collect();
    let idx = stream.weighted_index(&weights)?;
    entries.get(idx).map(|(value, _)| *value)
}
