//! PrEP targeting models (spec §4.6: "Targeting models (enumerated)").

/// A named strategy for selecting which agents receive PrEP initiation
/// each step (GLOSSARY: "Targeting model").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PrepTargetingModel {
    /// Enroll HIV-negative partners of newly diagnosed/high-risk agents
    /// encountered in a clinical setting.
    Clinical,
    /// Enroll a fixed fraction of the eligible population at random,
    /// regardless of other risk factors.
    RandomTrial,
    /// Enroll HIV-negative partners of agents entering incarceration.
    Incar,
    /// Enroll HIV-negative partners of agents entering incarceration,
    /// restricted to partners who are also high-risk.
    IncarHr,
    /// Enroll based on race-specific coverage targets.
    Racial,
    /// No specialized targeting; enroll uniformly up to `prep.target`.
    Default,
}

impl std::fmt::Display for PrepTargetingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PrepTargetingModel::Clinical => "Clinical",
            PrepTargetingModel::RandomTrial => "RandomTrial",
            PrepTargetingModel::Incar => "Incar",
            PrepTargetingModel::IncarHr => "IncarHR",
            PrepTargetingModel::Racial => "Racial",
            PrepTargetingModel::Default => "Default",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        assert_eq!(format!("{}", PrepTargetingModel::IncarHr), "IncarHR");
        assert_eq!(format!("{}", PrepTargetingModel::Default), "Default");
    }
}
