//! Fixed accessor for assortative-mixing attributes (spec §9: replaces
//! TITAN's `getattr(agent, assort_def.attribute)` dynamic access).

use crate::agent::Agent;
use crate::enums::{DrugType, Race, SexType};

/// An attribute assortative mixing can match candidates on.
///
/// `params.assort_mix[key].attribute` names one of these variants
/// instead of an arbitrary string; [`AssortableAttribute::value_of`]
/// replaces the dynamic `getattr` call with a fixed match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AssortableAttribute {
    /// Match on race.
    Race,
    /// Match on sex type.
    SexType,
    /// Match on drug type.
    DrugType,
    /// Match on HIV status.
    HivStatus,
}

/// The value of an [`AssortableAttribute`] read off a specific agent,
/// rendered as a string key so it can be compared against the
/// string-keyed `partner_values` weight map in params (spec §6:
/// `assort_mix[key].partner_values{value: weight}`).
impl AssortableAttribute {
    /// Reads this attribute's value off `agent`, as the string key used
    /// in `partner_values`.
    #[must_use]
    pub fn value_of(&self, agent: &Agent) -> String {
        match self {
            AssortableAttribute::Race => race_key(agent.race),
            AssortableAttribute::SexType => sex_type_key(agent.sex_type),
            AssortableAttribute::DrugType => drug_type_key(agent.drug_type),
            AssortableAttribute::HivStatus => agent.hiv.to_string(),
        }
    }
}

fn race_key(race: Race) -> String {
    race.name().to_string()
}

fn sex_type_key(sex_type: SexType) -> String {
    sex_type.name().to_string()
}

fn drug_type_key(drug_type: DrugType) -> String {
    drug_type.name().to_string()
}

/// Sentinel key in `partner_values` meaning "any value not explicitly
/// listed" (spec §4.3, step 6).
pub const OTHER_KEY: &str = "__other__";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::enums::DrugType;
    use crate::population::Location;
    use std::sync::Arc;

    fn test_agent() -> Agent {
        Agent::new(
            crate::types::AgentId::new(1),
            SexType::MSM,
            30,
            Race::Black,
            DrugType::None,
            Arc::new(Location::new("default")),
        )
    }

    #[test]
    fn race_attribute_reads_agent_race() {
        let agent = test_agent();
        assert_eq!(AssortableAttribute::Race.value_of(&agent), "Black");
    }

    #[test]
    fn sex_type_attribute_reads_agent_sex_type() {
        let agent = test_agent();
        assert_eq!(AssortableAttribute::SexType.value_of(&agent), "MSM");
    }

    #[test]
    fn drug_type_attribute_reads_agent_drug_type() {
        let agent = test_agent();
        assert_eq!(AssortableAttribute::DrugType.value_of(&agent), "None");
    }

    #[test]
    fn hiv_status_attribute_reads_agent_hiv_flag() {
        let mut agent = test_agent();
        assert_eq!(AssortableAttribute::HivStatus.value_of(&agent), "false");
        agent.hiv = true;
        assert_eq!(AssortableAttribute::HivStatus.value_of(&agent), "true");
    }

    #[test]
    fn other_key_is_the_documented_sentinel() {
        assert_eq!(OTHER_KEY, "__other__");
    }
}
