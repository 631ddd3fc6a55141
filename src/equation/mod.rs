//! Boolean equations summarising an enumeration of minimal communities.
//!
//! A [`BooleanEquation`] is a conjunction of disjunctions over the groups of a
//! [`CompetitorPartition`]: a community is valid when it picks exactly one organism from
//! every group. The equation is only emitted when this model explains the enumeration,
//! i.e. when the number of such picks equals the number of enumerated solutions.

mod symbolic;

#[cfg(test)]
mod tests;

use crate::competitors::CompetitorPartition;
use crate::enumeration::Organism;
use crate::labels::{GroupLabel, GroupLabels};
use log::info;
use serde::Serialize;
pub use symbolic::{SymbolicFamily, matches_enumeration};

/// A conjunction-of-disjunctions formula over competitor groups.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BooleanEquation {
    /// The rendered formula, e.g. `(a | b) & x & y`.
    pub formula: String,
    /// The groups of the formula, in rendering order.
    pub groups: Vec<Vec<Organism>>,
    /// The number of communities described by the formula.
    pub combination_count: usize,
    /// The same equation with organisms replaced by their group labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labelled: Option<LabelledEquation>,
}

/// A [`BooleanEquation`] rendered with group labels instead of organism identifiers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LabelledEquation {
    pub formula: String,
    pub groups: Vec<Vec<GroupLabel>>,
}

/// Build the boolean equation of `partition`.
///
/// Returns `None` when the number of combinations implied by the partition differs from
/// `true_enumeration_count`: the enumeration is then too entangled to be summarised by
/// independent groups of alternatives.
pub fn build_equation(
    partition: &CompetitorPartition,
    true_enumeration_count: usize,
    labels: Option<&GroupLabels>,
) -> Option<BooleanEquation> {
    let Some(combination_count) = partition.combination_count() else {
        info!("Competitor groups imply more combinations than can be counted.");
        return None;
    };
    if combination_count != true_enumeration_count {
        info!(
            "Competitor groups imply {} combinations, but {} solutions were enumerated; no equation.",
            combination_count, true_enumeration_count
        );
        return None;
    }

    let groups: Vec<Vec<Organism>> = partition
        .groups()
        .iter()
        .map(|group| group.iter().cloned().collect())
        .collect();
    let labelled = labels.map(|labels| {
        let groups: Vec<Vec<GroupLabel>> = groups
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|organism| labels.label_of(organism).to_string())
                    .collect()
            })
            .collect();
        LabelledEquation {
            formula: render(&groups),
            groups,
        }
    });

    Some(BooleanEquation {
        formula: render(&groups),
        groups,
        combination_count,
        labelled,
    })
}

/// Render groups as `(a | b) & c`. Single-member groups are not parenthesised.
fn render(groups: &[Vec<String>]) -> String {
    if groups.is_empty() {
        return "true".to_string();
    }
    groups
        .iter()
        .map(|group| {
            if group.len() == 1 {
                group[0].clone()
            } else {
                format!("({})", group.join(" | "))
            }
        })
        .collect::<Vec<_>>()
        .join(" & ")
}
