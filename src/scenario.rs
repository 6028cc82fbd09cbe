//! Named degradation scenarios and the catalog that orders them.
//!
//! A catalog always carries exactly one baseline scenario, stored apart from
//! the degradations so downstream comparisons never have to handle a missing
//! reference curve. Degradations keep their insertion order; generated
//! datasets and reports follow it.

use crate::circuits::model::CircuitModel;
use crate::errors::{EisError, Result};

/// Name reserved for the healthy-cell reference scenario.
pub const BASELINE_SCENARIO: &str = "baseline";

/// A labeled cell condition: a scenario name, the equivalent circuit that
/// models it, and an optional free-text description for reports.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    name: String,
    model: CircuitModel,
    description: Option<String>,
}

impl Scenario {
    /// Creates a scenario without a description.
    #[must_use]
    pub fn new(name: impl Into<String>, model: CircuitModel) -> Self {
        Self {
            name: name.into(),
            model,
            description: None,
        }
    }

    /// Attaches a human-readable description, consuming and returning the
    /// scenario.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Scenario name used as the dataset label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Equivalent circuit modeling this condition.
    #[must_use]
    pub const fn model(&self) -> &CircuitModel {
        &self.model
    }

    /// Description for reports, if one was provided.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Ordered collection of scenarios with a structurally guaranteed baseline.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioCatalog {
    baseline: Scenario,
    degradations: Vec<Scenario>,
}

impl ScenarioCatalog {
    /// Creates a catalog whose baseline is modeled by `baseline_model`.
    #[must_use]
    pub fn new(baseline_model: CircuitModel) -> Self {
        Self {
            baseline: Scenario::new(BASELINE_SCENARIO, baseline_model),
            degradations: Vec::new(),
        }
    }

    /// The healthy-cell degradation catalog: an RC-CPE baseline plus
    /// increased ohmic resistance, increased charge-transfer resistance,
    /// and a Warburg-limited mass-transfer condition.
    #[must_use]
    pub fn reference() -> Self {
        Self {
            baseline: Scenario::new(
                BASELINE_SCENARIO,
                CircuitModel::RcCpe {
                    r_ohmic: 0.1,
                    r_ct: 0.5,
                    q: 1.0e-3,
                    n: 0.9,
                },
            ),
            degradations: vec![
                Scenario::new(
                    "increased_ohmic",
                    CircuitModel::RcCpe {
                        r_ohmic: 0.5,
                        r_ct: 0.5,
                        q: 1.0e-3,
                        n: 0.9,
                    },
                )
                .with_description("Membrane contamination or contact issues"),
                Scenario::new(
                    "increased_ct",
                    CircuitModel::RcCpe {
                        r_ohmic: 0.1,
                        r_ct: 2.0,
                        q: 1.0e-3,
                        n: 0.9,
                    },
                )
                .with_description("Catalyst degradation"),
                Scenario::new(
                    "mass_transfer",
                    CircuitModel::RandlesWarburg {
                        r_ohmic: 0.1,
                        r_ct: 0.5,
                        c_dl: 1.0e-3,
                        sigma: 5.0,
                    },
                )
                .with_description("Mass transfer limitations"),
            ],
        }
    }

    /// Registers a degradation scenario.
    ///
    /// # Errors
    ///
    /// Returns [`EisError::DuplicateScenario`] when the name is already
    /// taken, including the reserved baseline name.
    pub fn add(&mut self, scenario: Scenario) -> Result<()> {
        let taken = scenario.name() == BASELINE_SCENARIO
            || self.degradations.iter().any(|s| s.name() == scenario.name());
        if taken {
            return Err(EisError::DuplicateScenario(scenario.name().to_owned()));
        }
        self.degradations.push(scenario);
        Ok(())
    }

    /// The baseline scenario. Always present.
    #[must_use]
    pub const fn baseline(&self) -> &Scenario {
        &self.baseline
    }

    /// Degradation scenarios in registration order.
    #[must_use]
    pub fn degradations(&self) -> &[Scenario] {
        &self.degradations
    }

    /// Looks up a scenario by name, baseline included.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Scenario> {
        if name == self.baseline.name() {
            return Some(&self.baseline);
        }
        self.degradations.iter().find(|s| s.name() == name)
    }

    /// Iterates every scenario, baseline first, degradations in
    /// registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        std::iter::once(&self.baseline).chain(self.degradations.iter())
    }

    /// Total number of scenarios including the baseline.
    #[must_use]
    pub fn scenario_count(&self) -> usize {
        1 + self.degradations.len()
    }
}
