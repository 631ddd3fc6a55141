use crate::AnalysisError;
use crate::enumeration::{EnumerationResult, Organism, SolutionId};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// The JSON document produced by the community solver for one target category.
///
/// Lists are coerced into sets here, so duplicate entries in the solver output are
/// harmless. Keys not listed below are ignored. The community keys may be absent when the
/// solver gave up on unproducible targets.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SolverOutput {
    /// One minimal community.
    #[serde(rename = "bacteria", default)]
    pub minimal_solution: BTreeSet<Organism>,
    /// Union of all minimal communities.
    #[serde(rename = "union_bacteria", default)]
    pub union: BTreeSet<Organism>,
    /// Intersection of all minimal communities.
    #[serde(rename = "inter_bacteria", default)]
    pub intersection: BTreeSet<Organism>,
    /// All minimal communities.
    #[serde(rename = "enum_bacteria", default)]
    pub enumeration: Option<BTreeMap<SolutionId, BTreeSet<Organism>>>,
    /// Targets that became producible thanks to the community.
    #[serde(default)]
    pub newly_prod: BTreeSet<String>,
    /// Targets that stay unproducible even with the whole community.
    #[serde(default)]
    pub still_unprod: BTreeSet<String>,
}

impl SolverOutput {
    pub fn from_file(path: &Path) -> Result<SolverOutput, AnalysisError> {
        let content = std::fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| AnalysisError::json(path, e))
    }

    /// Validate the solver output and convert it into an [`EnumerationResult`].
    ///
    /// Fails with [`AnalysisError::UnproducibleTargets`] if any target is still unproducible:
    /// in that case, no community explains the whole target set and the input must be
    /// corrected upstream. Otherwise, a missing enumeration is an
    /// [`AnalysisError::InconsistentEnumeration`].
    pub fn into_enumeration(self, category: &str) -> Result<EnumerationResult, AnalysisError> {
        if !self.still_unprod.is_empty() {
            warn!(
                "Category `{}`: {} targets are not producible.",
                category,
                self.still_unprod.len()
            );
            return Err(AnalysisError::UnproducibleTargets {
                category: category.to_string(),
                targets: self.still_unprod,
            });
        }

        let Some(enumeration) = self.enumeration else {
            return Err(AnalysisError::InconsistentEnumeration {
                category: category.to_string(),
                message: "missing `enum_bacteria`".to_string(),
            });
        };

        EnumerationResult::new(
            category,
            self.minimal_solution,
            self.union,
            self.intersection,
            enumeration,
        )
    }
}
