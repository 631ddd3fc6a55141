//! Extraction of competitor groups from an enumeration of minimal communities.
//!
//! For an organism `o`, its *partners* are all organisms that share at least one solution
//! with `o`, and its *competitors* are the organisms that appear in solutions without `o`
//! but never together with `o`. Competitors substitute for `o` across the enumeration.
//!
//! Each organism yields the group `{o} ∪ competitors(o)` (a singleton when `o` has no
//! competitors) and equal groups are merged. For "simple" enumerations, where organisms
//! are interchangeable in disjoint blocks, this yields a partition of the key species. For
//! entangled enumerations the groups can overlap or miss organisms, which is why the
//! partition property is verified and reported as [`PartitionOutcome::Inconclusive`]
//! when it fails.
//!
//! ```
//! use mincom_analysis::competitors::{PartitionOutcome, extract_groups};
//! use mincom_analysis::enumeration::EnumerationResult;
//!
//! let result = EnumerationResult::from_solutions("x", [["e", "a"], ["e", "b"]]);
//! let PartitionOutcome::Partition(partition) = extract_groups(&result).unwrap() else {
//!     panic!("Expected a partition");
//! };
//! assert_eq!(partition.len(), 2);
//! assert_eq!(partition.combination_count(), Some(2));
//! ```

mod competitor_step;

#[cfg(test)]
mod tests;

use crate::enumeration::{EnumerationResult, Organism};
use cancel_this::Cancellable;
pub use competitor_step::{CompetitorState, CompetitorStep};
use computation_process::{Generator, Stateful};
use log::{info, warn};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A set of mutually interchangeable organisms.
pub type CompetitorGroup = BTreeSet<Organism>;

/// Generator of distinct competitor groups, one organism of the key species per step.
pub type CompetitorGroups =
    Generator<EnumerationResult, CompetitorState, CompetitorGroup, CompetitorStep>;

/// Disjoint competitor groups that cover the key species exactly once.
///
/// Groups are kept in a canonical order (by their sorted member lists).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompetitorPartition {
    groups: Vec<CompetitorGroup>,
}

/// Competitor groups that fail to partition the key species.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InconclusivePartition {
    /// The groups as extracted, in canonical order.
    pub groups: Vec<CompetitorGroup>,
    /// Organisms that belong to more than one group.
    pub overlapping: BTreeSet<Organism>,
    /// Key species that belong to no group.
    pub uncovered: BTreeSet<Organism>,
}

/// Result of [`extract_groups`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PartitionOutcome {
    Partition(CompetitorPartition),
    Inconclusive(InconclusivePartition),
}

/// Compute the competitors of `organism`: organisms appearing in a solution without
/// `organism`, but never in a solution together with it.
pub fn competitors_of(result: &EnumerationResult, organism: &str) -> BTreeSet<Organism> {
    let mut partners = BTreeSet::new();
    let mut absent = BTreeSet::new();
    for solution in result.solutions() {
        if solution.contains(organism) {
            partners.extend(solution.iter().cloned());
        } else {
            absent.extend(solution.iter().cloned());
        }
    }
    absent.difference(&partners).cloned().collect()
}

/// Compute the competitor set of every key species.
pub fn competitor_sets(result: &EnumerationResult) -> BTreeMap<Organism, BTreeSet<Organism>> {
    result
        .union()
        .iter()
        .map(|organism| (organism.clone(), competitors_of(result, organism)))
        .collect()
}

/// Extract competitor groups of `result` and verify they partition its key species.
pub fn extract_groups(result: &EnumerationResult) -> Cancellable<PartitionOutcome> {
    let mut groups = Vec::new();
    for group in CompetitorGroups::configure(result.clone(), result) {
        groups.push(group?);
    }
    groups.sort();

    let mut seen = BTreeSet::new();
    let mut overlapping = BTreeSet::new();
    for organism in groups.iter().flatten() {
        if !seen.insert(organism) {
            overlapping.insert(organism.clone());
        }
    }
    let uncovered: BTreeSet<Organism> = result
        .union()
        .iter()
        .filter(|it| !seen.contains(it))
        .cloned()
        .collect();

    if overlapping.is_empty() && uncovered.is_empty() {
        info!(
            "Category `{}`: {} competitor groups.",
            result.category(),
            groups.len()
        );
        Ok(PartitionOutcome::Partition(CompetitorPartition { groups }))
    } else {
        warn!(
            "Category `{}`: competitor groups are not a partition ({} overlapping, {} uncovered).",
            result.category(),
            overlapping.len(),
            uncovered.len()
        );
        Ok(PartitionOutcome::Inconclusive(InconclusivePartition {
            groups,
            overlapping,
            uncovered,
        }))
    }
}

impl CompetitorPartition {
    pub fn groups(&self) -> &[CompetitorGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The number of communities obtained by picking one organism from every group, or
    /// `None` if the number does not fit into `usize`.
    pub fn combination_count(&self) -> Option<usize> {
        self.groups
            .iter()
            .try_fold(1usize, |acc, group| acc.checked_mul(group.len()))
    }

    /// Organisms without competitors.
    pub fn singletons(&self) -> BTreeSet<Organism> {
        self.groups
            .iter()
            .filter(|it| it.len() == 1)
            .flatten()
            .cloned()
            .collect()
    }

    /// The group containing `organism`, if any.
    pub fn group_of(&self, organism: &str) -> Option<&CompetitorGroup> {
        self.groups.iter().find(|it| it.contains(organism))
    }
}

impl PartitionOutcome {
    pub fn partition(&self) -> Option<&CompetitorPartition> {
        match self {
            PartitionOutcome::Partition(x) => Some(x),
            PartitionOutcome::Inconclusive(_) => None,
        }
    }
}
