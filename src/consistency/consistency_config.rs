use crate::consistency::{EquationTerm, MinimalEquation};
use crate::enumeration::{EnumerationResult, Organism, Solution};
use crate::labels::GroupLabels;
use crate::powergraph::{PowerNodeId, Powergraph};
use cancel_this::{Cancellable, is_cancelled};
use log::trace;
use std::collections::BTreeSet;

/// A configuration object for checking a powergraph against an enumeration.
#[derive(Clone, Debug)]
pub struct ConsistencyConfig {
    /// The compressed solution graph of the category.
    pub powergraph: Powergraph,
    /// The enumeration the powergraph was computed from.
    pub enumeration: EnumerationResult,
    /// Labels used for the secondary rendering of the boolean equation (default: none).
    pub labels: Option<GroupLabels>,
    /// Cancel the procedure if the powergraph implies more than the given number of
    /// combinations (default: `usize::MAX`).
    ///
    /// All implied combinations are materialized during reconstruction, so this effectively
    /// limits the memory used by the check.
    pub max_combinations: usize,
}

impl ConsistencyConfig {
    /// Create a new [`ConsistencyConfig`] without labels and without a combination limit.
    pub fn new(powergraph: Powergraph, enumeration: EnumerationResult) -> ConsistencyConfig {
        ConsistencyConfig {
            powergraph,
            enumeration,
            labels: None,
            max_combinations: usize::MAX,
        }
    }

    pub fn with_labels(mut self, labels: Option<GroupLabels>) -> ConsistencyConfig {
        self.labels = labels;
        self
    }

    pub fn with_max_combinations(mut self, max_combinations: usize) -> ConsistencyConfig {
        self.max_combinations = max_combinations;
        self
    }

    /// Power nodes containing at least one essential symbiont (an intersection member).
    pub fn essential_power_nodes(&self) -> BTreeSet<PowerNodeId> {
        let intersection = self.enumeration.intersection();
        self.powergraph
            .node_ids()
            .filter(|id| !self.powergraph.descendants(*id).is_disjoint(intersection))
            .collect()
    }

    /// Map a solution to the smallest set of terms covering it: the outermost power node of
    /// every compressed organism, and the organism itself otherwise.
    pub fn minimal_equation(&self, solution: &Solution) -> MinimalEquation {
        solution
            .iter()
            .map(|organism| match self.powergraph.root_containing(organism) {
                Some(root) => EquationTerm::PowerNode(root),
                None => EquationTerm::Organism(organism.clone()),
            })
            .collect()
    }

    /// The number of combinations implied by a minimal equation: the product of the fan-outs
    /// of its non-essential power nodes (saturating at `usize::MAX`).
    pub fn theoretical_count(
        &self,
        equation: &MinimalEquation,
        essential: &BTreeSet<PowerNodeId>,
    ) -> usize {
        equation
            .iter()
            .filter_map(|term| match term {
                EquationTerm::PowerNode(id) if !essential.contains(id) => {
                    Some(self.powergraph.fan_out(*id))
                }
                _ => None,
            })
            .fold(1usize, |acc, fan_out| acc.saturating_mul(fan_out))
    }

    /// All organism combinations implied by a minimal equation.
    ///
    /// Essential power nodes and uncompressed organisms are fixed, every non-essential power
    /// node contributes one of its alternatives.
    pub fn expand(
        &self,
        equation: &MinimalEquation,
        essential: &BTreeSet<PowerNodeId>,
    ) -> Cancellable<Vec<Solution>> {
        let mut fixed: BTreeSet<Organism> = BTreeSet::new();
        let mut choices: Vec<Vec<BTreeSet<Organism>>> = Vec::new();
        for term in equation {
            match term {
                EquationTerm::Organism(organism) => {
                    fixed.insert(organism.clone());
                }
                EquationTerm::PowerNode(id) if essential.contains(id) => {
                    fixed.extend(self.powergraph.descendants(*id).iter().cloned());
                }
                EquationTerm::PowerNode(id) => {
                    choices.push(self.powergraph.alternatives(*id));
                }
            }
        }

        let mut combinations = vec![fixed];
        for alternatives in choices {
            is_cancelled!()?;
            let mut extended = Vec::with_capacity(combinations.len() * alternatives.len());
            for combination in &combinations {
                for alternative in &alternatives {
                    let mut next = combination.clone();
                    next.extend(alternative.iter().cloned());
                    extended.push(next);
                }
            }
            trace!("Expanded to {} partial combinations.", extended.len());
            combinations = extended;
        }
        Ok(combinations)
    }
}
