//! `assort_mix[key].*` parameter branch (spec §6, §4.3 step 6).

use crate::enums::AssortableAttribute;
use std::collections::HashMap;

/// One assortative-mixing definition: a preference, on a fixed
/// attribute, for candidates matching (or deliberately not matching)
/// the requester's value.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AssortMixDef {
    /// The attribute this definition matches on.
    pub attribute: AssortableAttribute,
    /// The requester's attribute value this definition applies to.
    pub agent_value: String,
    /// Weighted map from candidate attribute value to selection weight.
    /// The sentinel key [`crate::enums::OTHER_KEY`] matches any value
    /// not explicitly listed (spec §4.3, step 6).
    pub partner_values: HashMap<String, f64>,
}

/// `assort_mix.*`: the declared assortative-mixing definitions, keyed
/// by an arbitrary definition label.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct AssortMixParams {
    entries: HashMap<String, AssortMixDef>,
}

impl AssortMixParams {
    /// Creates an empty table. Populate with [`Self::insert`].
    #[must_use]
    pub fn new() -> Self {
        AssortMixParams { entries: HashMap::new() }
    }

    /// Declares (or replaces) the assortative-mixing definition under `key`.
    pub fn insert(&mut self, key: impl Into<String>, def: AssortMixDef) {
        self.entries.insert(key.into(), def);
    }

    /// Iterates every declared definition, sorted by key for
    /// deterministic traversal (spec §5).
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AssortMixDef)> {
        let mut keys: Vec<&String> = self.entries.keys().collect();
        keys.sort();
        keys.into_iter().map(move |k| (k, &self.entries[k]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::OTHER_KEY;

    #[test]
    fn insert_then_iter_is_sorted() {
        let mut params = AssortMixParams::new();
        params.insert(
            "b_def",
            AssortMixDef {
                attribute: AssortableAttribute::Race,
                agent_value: "Black".into(),
                partner_values: HashMap::from([("Black".to_string(), 1.0)]),
            },
        );
        params.insert(
            "a_def",
            AssortMixDef {
                attribute: AssortableAttribute::SexType,
                agent_value: "MSM".into(),
                partner_values: HashMap::from([(OTHER_KEY.to_string(), 1.0)]),
            },
        );
        let order: Vec<&String> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["a_def", "b_def"]);
    }
}
