//! PrEP formulation (spec §4.6: "oral" / "injectable").

/// The formulation of PrEP an agent is enrolled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PrepType {
    /// Daily oral PrEP.
    Oral,
    /// Long-acting injectable PrEP.
    Injectable,
}

impl std::fmt::Display for PrepType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PrepType::Oral => "Oral",
            PrepType::Injectable => "Injectable",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        assert_eq!(format!("{}", PrepType::Oral), "Oral");
        assert_eq!(format!("{}", PrepType::Injectable), "Injectable");
    }
}
