use crate::competitors::{PartitionOutcome, extract_groups};
use crate::consistency::{
    ConsistencyConfig, ConsistencyReport, EquationSummary, EquationTerm, MinimalEquation, Verdict,
};
use crate::enumeration::Solution;
use crate::equation::{BooleanEquation, build_equation};
use crate::powergraph::PowerNodeId;
use crate::sorted_lists;
use cancel_this::Cancelled;
use computation_process::Incomplete::Suspended;
use computation_process::{Completable, ComputationStep};
use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet};

/// Internal state of the [`ConsistencyCheck`](crate::consistency::ConsistencyCheck).
///
/// The check advances through the phases
/// `MinimalEquations → CountTheoretical → Reconstruct → Compare → Done`;
/// reconstruction expands one minimal equation per step.
#[derive(Default)]
pub struct ConsistencyState {
    computing: Step,
}

/// Step implementation of the powergraph consistency check.
pub struct ConsistencyStep;

impl From<&ConsistencyConfig> for ConsistencyState {
    fn from(_value: &ConsistencyConfig) -> Self {
        ConsistencyState::default()
    }
}

impl ConsistencyStep {
    /// Compute essential power nodes and the minimal equation of every solution.
    fn minimal_equations(context: &ConsistencyConfig) -> Step {
        let essential = context.essential_power_nodes();
        let mut equations: BTreeMap<MinimalEquation, usize> = BTreeMap::new();
        for solution in context.enumeration.solutions() {
            *equations.entry(context.minimal_equation(solution)).or_default() += 1;
        }
        info!(
            "Category `{}`: {} essential power nodes, {} distinct minimal equations.",
            context.enumeration.category(),
            essential.len(),
            equations.len()
        );
        Step::CountTheoretical(Equations {
            essential,
            equations,
        })
    }

    /// Count the combinations implied by every minimal equation.
    fn count_theoretical(context: &ConsistencyConfig, step: &mut Equations) -> Completable<Step> {
        let mut summaries = Vec::with_capacity(step.equations.len());
        let mut theoretical_count = 0usize;
        for (equation, solutions) in &step.equations {
            let count = context.theoretical_count(equation, &step.essential);
            debug!(
                "Minimal equation [{}] covers {} solutions and implies {} combinations.",
                render_terms(context, equation).join(", "),
                solutions,
                count
            );
            theoretical_count = theoretical_count.saturating_add(count);
            summaries.push(EquationSummary {
                terms: render_terms(context, equation),
                solutions: *solutions,
                theoretical_count: count,
            });
        }

        if theoretical_count > context.max_combinations {
            debug!(
                "Theoretical count {} exceeds the combination limit {}.",
                theoretical_count, context.max_combinations
            );
            return Err(Cancelled::new("ConsistencyConfig::max_combinations").into());
        }

        info!(
            "Category `{}`: powergraph implies {} combinations.",
            context.enumeration.category(),
            theoretical_count
        );

        Ok(Step::Reconstruct(Box::new(Reconstruction {
            essential: std::mem::take(&mut step.essential),
            pending: std::mem::take(&mut step.equations).into_keys().collect(),
            summaries,
            theoretical_count,
            combinations: BTreeSet::new(),
        })))
    }

    /// Compare the three counts and synthesize the boolean equation if they agree.
    fn compare(
        context: &ConsistencyConfig,
        step: &Reconstruction,
    ) -> Completable<ConsistencyReport> {
        let enumeration = &context.enumeration;
        let enumerated: BTreeSet<Solution> = enumeration.distinct_solutions();

        let theoretical_count = step.theoretical_count;
        let enumerated_count = enumeration.solution_count();
        let reconstructed_matching = step
            .combinations
            .iter()
            .filter(|it| enumerated.contains(*it))
            .count();
        let missing: BTreeSet<Solution> =
            enumerated.difference(&step.combinations).cloned().collect();
        let spurious: BTreeSet<Solution> =
            step.combinations.difference(&enumerated).cloned().collect();

        let cardinality_predicted = theoretical_count == enumerated_count;
        let solutions_reconstructed = reconstructed_matching == enumerated_count;
        let no_spurious_combinations = theoretical_count == reconstructed_matching;

        let faithful = cardinality_predicted && solutions_reconstructed && no_spurious_combinations;

        let verdict = if faithful {
            info!(
                "Category `{}`: powergraph is faithful ({} combinations).",
                enumeration.category(),
                enumerated_count
            );
            Verdict::Faithful
        } else {
            warn!(
                "Category `{}`: powergraph is approximate: theoretical={}, reconstructed={}, enumerated={} ({} missing, {} spurious).",
                enumeration.category(),
                theoretical_count,
                reconstructed_matching,
                enumerated_count,
                missing.len(),
                spurious.len()
            );
            Verdict::Approximate
        };

        let equation = match verdict {
            Verdict::Faithful => Self::synthesize_equation(context)?,
            Verdict::Approximate => None,
        };

        Ok(ConsistencyReport {
            category: enumeration.category().to_string(),
            verdict,
            theoretical_count,
            reconstructed_matching,
            enumerated_count,
            cardinality_predicted,
            solutions_reconstructed,
            no_spurious_combinations,
            essential_power_nodes: step
                .essential
                .iter()
                .map(|id| context.powergraph.name(*id).to_string())
                .collect(),
            minimal_equations: step.summaries.clone(),
            reconstructed: sorted_lists(&step.combinations),
            missing_solutions: sorted_lists(&missing),
            spurious_combinations: sorted_lists(&spurious),
            equation,
        })
    }

    /// Build the boolean equation from competitor groups, cross-checking its combination
    /// count against the enumeration.
    fn synthesize_equation(context: &ConsistencyConfig) -> Completable<Option<BooleanEquation>> {
        let enumeration = &context.enumeration;
        let partition = match extract_groups(enumeration)? {
            PartitionOutcome::Partition(partition) => partition,
            PartitionOutcome::Inconclusive(_) => {
                info!(
                    "Category `{}`: competitor groups are inconclusive; no equation.",
                    enumeration.category()
                );
                return Ok(None);
            }
        };
        let equation = build_equation(
            &partition,
            enumeration.solution_count(),
            context.labels.as_ref(),
        );
        if let Some(equation) = &equation {
            debug_assert_eq!(equation.combination_count, enumeration.solution_count());
            info!("Category `{}`: {}", enumeration.category(), equation.formula);
        }
        Ok(equation)
    }
}

impl ComputationStep<ConsistencyConfig, ConsistencyState, ConsistencyReport> for ConsistencyStep {
    fn step(
        context: &ConsistencyConfig,
        state: &mut ConsistencyState,
    ) -> Completable<ConsistencyReport> {
        match &mut state.computing {
            Step::MinimalEquations => {
                state.computing = Self::minimal_equations(context);
                Err(Suspended)
            }
            Step::CountTheoretical(step) => {
                state.computing = Self::count_theoretical(context, step)?;
                Err(Suspended)
            }
            Step::Reconstruct(step) => {
                let Some(equation) = step.pending.pop() else {
                    debug!("Reconstructed {} distinct combinations.", step.combinations.len());
                    let step = std::mem::take(step);
                    state.computing = Step::Compare(step);
                    return Err(Suspended);
                };

                // Re-queue the equation if the expansion is cancelled.
                let expanded = match context.expand(&equation, &step.essential) {
                    Ok(expanded) => expanded,
                    Err(cancelled) => {
                        step.pending.push(equation);
                        return Err(cancelled.into());
                    }
                };
                debug!(
                    "Equation [{}] expanded into {} combinations.",
                    render_terms(context, &equation).join(", "),
                    expanded.len()
                );
                step.combinations.extend(expanded);
                Err(Suspended)
            }
            Step::Compare(step) => {
                let report = Self::compare(context, step)?;
                state.computing = Step::Done(Box::new(report.clone()));
                Ok(report)
            }
            Step::Done(report) => Ok((**report).clone()),
        }
    }
}

#[derive(Default)]
enum Step {
    #[default]
    MinimalEquations,
    CountTheoretical(Equations),
    Reconstruct(Box<Reconstruction>),
    Compare(Box<Reconstruction>),
    Done(Box<ConsistencyReport>),
}

struct Equations {
    essential: BTreeSet<PowerNodeId>,
    equations: BTreeMap<MinimalEquation, usize>,
}

#[derive(Default)]
struct Reconstruction {
    essential: BTreeSet<PowerNodeId>,
    pending: Vec<MinimalEquation>,
    summaries: Vec<EquationSummary>,
    theoretical_count: usize,
    combinations: BTreeSet<Solution>,
}

/// Human-readable names of the terms of a minimal equation.
fn render_terms(context: &ConsistencyConfig, equation: &MinimalEquation) -> Vec<String> {
    equation
        .iter()
        .map(|term| match term {
            EquationTerm::PowerNode(id) => context.powergraph.name(*id).to_string(),
            EquationTerm::Organism(organism) => organism.clone(),
        })
        .collect()
}
