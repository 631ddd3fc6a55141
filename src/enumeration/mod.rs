//! Normalized view of one solver run for one target category.
//!
//! The solver reports a single minimal community, the union and intersection of all minimal
//! communities, and (optionally) the full enumeration. [`SolverOutput`] mirrors the JSON
//! document written by the solver, [`EnumerationResult`] is the validated form used by
//! all analyses in this crate.

mod solver_output;

#[cfg(test)]
mod tests;

use crate::AnalysisError;
use log::debug;
pub use solver_output::SolverOutput;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Opaque organism identifier.
pub type Organism = String;

/// Opaque identifier of one enumerated solution.
pub type SolutionId = String;

/// One minimal community: a set of organisms that makes all targets producible.
pub type Solution = BTreeSet<Organism>;

/// A validated enumeration of minimal communities for a single target category.
///
/// Once created, the result is never mutated. All invariants are checked by the
/// constructors:
///  - `intersection ⊆ union`;
///  - `minimal_solution ⊆ union`;
///  - every enumerated solution is a superset of `intersection` and a subset of `union`;
///  - no two enumerated solutions are equal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumerationResult {
    category: String,
    minimal_solution: Solution,
    union: BTreeSet<Organism>,
    intersection: BTreeSet<Organism>,
    enumeration: BTreeMap<SolutionId, Solution>,
}

impl EnumerationResult {
    /// Create a new [`EnumerationResult`], checking the containment invariants.
    pub fn new(
        category: &str,
        minimal_solution: Solution,
        union: BTreeSet<Organism>,
        intersection: BTreeSet<Organism>,
        enumeration: BTreeMap<SolutionId, Solution>,
    ) -> Result<EnumerationResult, AnalysisError> {
        let inconsistent = |message: String| AnalysisError::InconsistentEnumeration {
            category: category.to_string(),
            message,
        };

        if let Some(organism) = intersection.difference(&union).next() {
            return Err(inconsistent(format!(
                "intersection member `{organism}` is not in the union"
            )));
        }
        if let Some(organism) = minimal_solution.difference(&union).next() {
            return Err(inconsistent(format!(
                "minimal solution member `{organism}` is not in the union"
            )));
        }
        let mut seen: BTreeMap<&Solution, &SolutionId> = BTreeMap::new();
        for (id, solution) in &enumeration {
            if let Some(first) = seen.insert(solution, id) {
                return Err(inconsistent(format!("solutions `{first}` and `{id}` are identical")));
            }
            if let Some(organism) = solution.difference(&union).next() {
                return Err(inconsistent(format!(
                    "solution `{id}` contains `{organism}` which is not in the union"
                )));
            }
            if let Some(organism) = intersection.difference(solution).next() {
                return Err(inconsistent(format!(
                    "solution `{id}` misses intersection member `{organism}`"
                )));
            }
        }

        debug!(
            "Category `{}`: {} solutions over ({}).",
            category,
            enumeration.len(),
            crate::log_organisms(&union)
        );

        Ok(EnumerationResult {
            category: category.to_string(),
            minimal_solution,
            union,
            intersection,
            enumeration,
        })
    }

    /// Build an [`EnumerationResult`] from a plain list of solutions.
    ///
    /// Union and intersection are derived from the solutions, the first solution of the
    /// smallest size is used as the representative minimal solution. Repeated solutions
    /// are dropped, the remaining ones get their (1-based) positions as ids.
    pub fn from_solutions<I, S>(category: &str, solutions: I) -> EnumerationResult
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator,
        S::Item: Into<Organism>,
    {
        let mut distinct = BTreeSet::new();
        let solutions: Vec<Solution> = solutions
            .into_iter()
            .map(|it| it.into_iter().map(Into::into).collect::<Solution>())
            .filter(|it| distinct.insert(it.clone()))
            .collect();

        let union: BTreeSet<Organism> = solutions.iter().flatten().cloned().collect();
        let intersection: BTreeSet<Organism> = match solutions.split_first() {
            None => BTreeSet::new(),
            Some((first, rest)) => rest.iter().fold(first.clone(), |acc, solution| {
                acc.intersection(solution).cloned().collect()
            }),
        };
        let minimal_solution = solutions
            .iter()
            .min_by_key(|it| it.len())
            .cloned()
            .unwrap_or_default();
        let enumeration = solutions
            .into_iter()
            .enumerate()
            .map(|(i, solution)| ((i + 1).to_string(), solution))
            .collect();

        EnumerationResult {
            category: category.to_string(),
            minimal_solution,
            union,
            intersection,
            enumeration,
        }
    }

    /// Read and validate a solver output JSON document.
    ///
    /// The category name is the file stem.
    pub fn from_file(path: &Path) -> Result<EnumerationResult, AnalysisError> {
        let category = path
            .file_stem()
            .map(|it| it.to_string_lossy().into_owned())
            .unwrap_or_default();
        SolverOutput::from_file(path)?.into_enumeration(&category)
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// One representative minimal community.
    pub fn minimal_solution(&self) -> &Solution {
        &self.minimal_solution
    }

    /// Union of all minimal communities (the key species).
    pub fn union(&self) -> &BTreeSet<Organism> {
        &self.union
    }

    /// Intersection of all minimal communities (the essential symbionts).
    pub fn intersection(&self) -> &BTreeSet<Organism> {
        &self.intersection
    }

    /// All enumerated minimal communities, by solution id.
    pub fn enumeration(&self) -> &BTreeMap<SolutionId, Solution> {
        &self.enumeration
    }

    /// Iterate over the enumerated solutions (ordered by solution id).
    pub fn solutions(&self) -> impl Iterator<Item = &Solution> {
        self.enumeration.values()
    }

    /// The number of enumerated solutions (the "true" combination count).
    pub fn solution_count(&self) -> usize {
        self.enumeration.len()
    }

    /// The set of distinct enumerated solutions.
    pub fn distinct_solutions(&self) -> BTreeSet<Solution> {
        self.enumeration.values().cloned().collect()
    }

    /// True if all enumerated solutions have the same number of organisms.
    ///
    /// Only in this case are "organisms without competitors" guaranteed to coincide with the
    /// intersection of all solutions.
    pub fn has_uniform_solution_size(&self) -> bool {
        let mut sizes = self.enumeration.values().map(|it| it.len());
        match sizes.next() {
            None => true,
            Some(first) => sizes.all(|it| it == first),
        }
    }
}
