//! The kinds of acts a bond type may permit (spec §4.3: "acts_allowed").

/// An act a bond type may permit between its two agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ActKind {
    /// Sexual acts.
    Sex,
    /// Injection-drug-sharing acts.
    Injection,
}

impl std::fmt::Display for ActKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActKind::Sex => "sex",
            ActKind::Injection => "injection",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_lowercase() {
        assert_eq!(format!("{}", ActKind::Sex), "sex");
        assert_eq!(format!("{}", ActKind::Injection), "injection");
    }
}
