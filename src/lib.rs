//! Analysis of enumerated minimal communities.
//!
//! A producibility solver enumerates all *minimal communities*, i.e. the smallest sets of
//! organisms that together make a set of target metabolites producible. This crate takes
//! such an enumeration (one [`EnumerationResult`](enumeration::EnumerationResult) per target
//! category) and:
//!
//!  - classifies organisms into key species, essential symbionts and alternative symbionts
//!    ([`key_species`]);
//!  - groups organisms that substitute for each other across solutions ([`competitors`]);
//!  - summarises the enumeration as a boolean equation over these groups ([`equation`]);
//!  - verifies that a compressed powergraph of the solution graph ([`powergraph`]) describes
//!    exactly the same family of communities ([`consistency`]).
//!
//! The [`pipeline`] module ties these together for whole directories of solver outputs.

#[cfg(test)]
mod test_utils;

pub mod competitors;
pub mod consistency;
pub mod enumeration;
pub mod equation;
pub mod error;
pub mod key_species;
pub mod labels;
pub mod pipeline;
pub mod powergraph;
pub mod solution_graph;

pub use error::AnalysisError;

use std::collections::BTreeSet;

/// The number of organism names included in log messages before the output is truncated.
const LOG_PREVIEW: usize = 5;

/// A utility method for printing useful metadata of organism sets.
fn log_organisms<'a, I>(set: I) -> String
where
    I: IntoIterator<Item = &'a String>,
    I::IntoIter: ExactSizeIterator,
{
    let iter = set.into_iter();
    let count = iter.len();
    let preview = iter.take(LOG_PREVIEW).cloned().collect::<Vec<_>>();
    if count > LOG_PREVIEW {
        format!("organisms={}; [{}, ...]", count, preview.join(", "))
    } else {
        format!("organisms={}; [{}]", count, preview.join(", "))
    }
}

/// Render a set of organism sets as sorted lists (used by reports and test assertions).
fn sorted_lists(sets: &BTreeSet<BTreeSet<String>>) -> Vec<Vec<String>> {
    sets.iter()
        .map(|set| set.iter().cloned().collect())
        .collect()
}
