//! Consistency of a powergraph with the enumeration it was computed from.
//!
//! The graph compression engine is heuristic: grouping organisms into power nodes can
//! imply organism combinations that are not minimal communities, or lose some of them.
//! The check works as follows:
//!
//!  - A power node is *essential* if it contains an essential symbiont.
//!  - Every enumerated solution is mapped to its *minimal equation*: the outermost power
//!    nodes containing its organisms (uncompressed organisms stand for themselves).
//!  - The *theoretical count* of a minimal equation is the product of the fan-outs of its
//!    non-essential power nodes; the powergraph count is the sum over distinct equations.
//!  - Minimal equations are expanded into organism combinations: essential power nodes
//!    contribute all their organisms, other power nodes one of their direct children.
//!  - Three counts are compared: (a) the theoretical count, (b) the number of reconstructed
//!    combinations that are enumerated solutions, and (c) the number of enumerated solutions.
//!
//! When `a == b == c`, the powergraph is [`Verdict::Faithful`] and the boolean equation of
//! the enumeration is synthesized from its competitor groups. Otherwise the verdict is
//! [`Verdict::Approximate`] and the report lists the diverging combinations.

mod consistency_config;
mod consistency_step;


use crate::enumeration::{EnumerationResult, Organism};
use crate::equation::BooleanEquation;
use crate::labels::GroupLabels;
use crate::powergraph::{PowerNodeId, Powergraph};
use cancel_this::Cancellable;
use computation_process::{Computable, Computation, Stateful};
pub use consistency_config::ConsistencyConfig;
pub use consistency_step::{ConsistencyState, ConsistencyStep};
use serde::Serialize;
use std::collections::BTreeSet;

/// A term of a minimal equation: an outermost power node, or an uncompressed organism.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EquationTerm {
    PowerNode(PowerNodeId),
    Organism(Organism),
}

/// A combination of power nodes (and uncompressed organisms) covering a solution.
pub type MinimalEquation = BTreeSet<EquationTerm>;

/// Checks a powergraph against an enumeration, see the module documentation.
pub type ConsistencyCheck =
    Computation<ConsistencyConfig, ConsistencyState, ConsistencyReport, ConsistencyStep>;

/// Final state of the consistency check.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The powergraph describes exactly the enumerated solutions.
    Faithful,
    /// The compression lost information; see the diverging counts.
    Approximate,
}

/// One distinct minimal equation observed in the enumeration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EquationSummary {
    /// Power node names and uncompressed organisms of the equation.
    pub terms: Vec<String>,
    /// Number of enumerated solutions mapped to this equation.
    pub solutions: usize,
    /// Number of combinations implied by this equation.
    pub theoretical_count: usize,
}

/// Outcome of a [`ConsistencyCheck`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    pub category: String,
    pub verdict: Verdict,
    /// (a) Number of combinations implied by the powergraph structure.
    pub theoretical_count: usize,
    /// (b) Number of reconstructed combinations that are enumerated solutions.
    pub reconstructed_matching: usize,
    /// (c) Number of enumerated solutions.
    pub enumerated_count: usize,
    /// `a == c`
    pub cardinality_predicted: bool,
    /// `b == c`
    pub solutions_reconstructed: bool,
    /// `a == b`
    pub no_spurious_combinations: bool,
    pub essential_power_nodes: Vec<String>,
    pub minimal_equations: Vec<EquationSummary>,
    /// All combinations implied by the powergraph.
    pub reconstructed: Vec<Vec<Organism>>,
    /// Enumerated solutions that the powergraph cannot reconstruct.
    pub missing_solutions: Vec<Vec<Organism>>,
    /// Reconstructed combinations that are not enumerated solutions.
    pub spurious_combinations: Vec<Vec<Organism>>,
    /// The boolean equation, when the powergraph is faithful and the competitor groups
    /// explain the enumeration.
    pub equation: Option<BooleanEquation>,
}

impl ConsistencyReport {
    pub fn is_faithful(&self) -> bool {
        self.verdict == Verdict::Faithful
    }
}

/// Run a [`ConsistencyCheck`] of `powergraph` against `result` to completion.
pub fn check_consistency(
    powergraph: &Powergraph,
    result: &EnumerationResult,
    labels: Option<&GroupLabels>,
) -> Cancellable<ConsistencyReport> {
    let config =
        ConsistencyConfig::new(powergraph.clone(), result.clone()).with_labels(labels.cloned());
    run_check(config)
}

/// Run a [`ConsistencyCheck`] for an existing configuration.
pub fn run_check(config: ConsistencyConfig) -> Cancellable<ConsistencyReport> {
    let mut check = ConsistencyCheck::configure(config, ConsistencyState::default());
    check.compute()
}
