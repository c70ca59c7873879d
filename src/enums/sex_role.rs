//! Birth-time sex role classification (spec §3: "birth-time sex role";
//! §6: `location.role_weights` per race).

/// An agent's sex role, assigned at creation and held fixed thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SexRole {
    /// Insertive-only role.
    Insertive,
    /// Receptive-only role.
    Receptive,
    /// Both insertive and receptive.
    Versatile,
}

impl SexRole {
    /// Returns all sex-role variants.
    #[must_use]
    pub const fn all() -> [SexRole; 3] {
        [SexRole::Insertive, SexRole::Receptive, SexRole::Versatile]
    }

    /// Returns a human-readable name for this sex role.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            SexRole::Insertive => "Insertive",
            SexRole::Receptive => "Receptive",
            SexRole::Versatile => "Versatile",
        }
    }
}

impl std::fmt::Display for SexRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_roles_have_names() {
        for role in SexRole::all() {
            assert!(!role.name().is_empty());
        }
    }

    #[test]
    fn display_matches_name() {
        assert_eq!(format!("{}", SexRole::Versatile), "Versatile");
    }
}
