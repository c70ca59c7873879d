//! Configuration errors (spec §7: "Configuration error").

/// A parameter-tree construction or lookup failure, reported at
/// construction time; the run aborts rather than silently substituting
/// a default (spec §7).
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `num_pop` was zero or negative.
    NonPositiveNumPop(i64),
    /// A demographic key (race/sex-type combination) was referenced but
    /// not present in `demographics`.
    MissingDemographics {
        /// The race that was looked up.
        race: String,
        /// The sex type that was looked up.
        sex_type: String,
    },
    /// A bond type was referenced but not declared in `classes.bond_types`.
    UnknownBondType(String),
    /// A bin table was malformed (e.g. empty, or cumulative
    /// probabilities that do not reach 1.0).
    MalformedBinTable(String),
    /// A random seed was not a non-negative integer.
    InvalidSeed(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NonPositiveNumPop(n) => {
                write!(f, "model.num_pop must be positive, got {}", n)
            }
            ConfigError::MissingDemographics { race, sex_type } => write!(
                f,
                "no demographics entry for race={} sex_type={}",
                race, sex_type
            ),
            ConfigError::UnknownBondType(name) => {
                write!(f, "bond type '{}' is not declared in classes.bond_types", name)
            }
            ConfigError::MalformedBinTable(reason) => {
                write!(f, "malformed bin table: {}", reason)
            }
            ConfigError::InvalidSeed(reason) => write!(f, "invalid seed: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = ConfigError::MissingDemographics {
            race: "Black".into(),
            sex_type: "MSM".into(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Black"));
        assert!(msg.contains("MSM"));
    }

    #[test]
    fn non_positive_num_pop_message() {
        let err = ConfigError::NonPositiveNumPop(0);
        assert!(format!("{}", err).contains('0'));
    }
}
