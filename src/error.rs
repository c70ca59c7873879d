//! Crate-wide error types for invariant violations.
//!
//! Configuration errors live in [`crate::params::error`]; depleted-pool
//! conditions during partner selection are not errors at all (they
//! return `None`, per [`crate::population::Population`]'s partner-
//! selection methods).

/// An attempt to perform an operation that would violate a core model
/// invariant (spec §7: "Invariant violation").
///
/// These are programming errors, not runtime conditions callers should
/// expect to recover from in production; they exist so tests can assert
/// the core rejects impossible biological/clinical states instead of
/// silently producing garbage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Transmission was attempted on a relationship whose endpoints are
    /// not exactly one HIV-positive and one HIV-negative.
    NotTransmissible {
        /// Whether agent one is HIV-positive.
        agent_one_hiv: bool,
        /// Whether agent two is HIV-positive.
        agent_two_hiv: bool,
    },
    /// AIDS progression was attempted on an HIV-negative agent.
    AidsOnHivNegative,
    /// PrEP initiation was attempted on an HIV-positive or already
    /// enrolled agent.
    InvalidPrepInitiation,
    /// A sexual bond was attempted between a sex-type pair that is not
    /// mutually compatible per `sleeps_with`.
    IncompatibleSexTypes,
    /// A bond requiring injection was attempted between agents where at
    /// least one is not an injection drug user.
    IncompatibleDrugTypes,
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::NotTransmissible {
                agent_one_hiv,
                agent_two_hiv,
            } => write!(
                f,
                "relationship is not transmissible (hiv: {}, {})",
                agent_one_hiv, agent_two_hiv
            ),
            SimError::AidsOnHivNegative => {
                write!(f, "cannot progress to AIDS: agent is HIV-negative")
            }
            SimError::InvalidPrepInitiation => {
                write!(f, "cannot initiate PrEP: agent is HIV-positive or already enrolled")
            }
            SimError::IncompatibleSexTypes => {
                write!(f, "sex types are not mutually compatible for this bond")
            }
            SimError::IncompatibleDrugTypes => {
                write!(f, "injection bond requires both agents to be injection drug users")
            }
        }
    }
}

impl std::error::Error for SimError {}
