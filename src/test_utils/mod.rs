use crate::enumeration::EnumerationResult;
use crate::labels::GroupLabels;
use crate::powergraph::Powergraph;
use std::collections::{BTreeMap, BTreeSet};

/// Initialize env_logger for tests. Safe to call multiple times.
pub fn init_logger() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

/// Build an enumeration from a list of solutions given as string slices.
pub fn mk_enumeration(solutions: &[&[&str]]) -> EnumerationResult {
    EnumerationResult::from_solutions("test", solutions.iter().map(|it| it.iter().copied()))
}

/// Build an organism set from string slices.
pub fn mk_set(organisms: &[&str]) -> BTreeSet<String> {
    organisms.iter().map(|it| it.to_string()).collect()
}

/// Build a powergraph from `(power node, children)` pairs.
pub fn mk_powergraph(inclusion: &[(&str, &[&str])]) -> Powergraph {
    let inclusion: BTreeMap<String, Vec<String>> = inclusion
        .iter()
        .map(|(node, children)| {
            let children = children.iter().map(|it| it.to_string()).collect();
            (node.to_string(), children)
        })
        .collect();
    Powergraph::from_inclusion(inclusion, Vec::new()).expect("Failed to create powergraph")
}

/// Build a label table from `(organism, label)` pairs.
pub fn mk_labels(pairs: &[(&str, &str)]) -> GroupLabels {
    pairs
        .iter()
        .map(|(organism, label)| (organism.to_string(), label.to_string()))
        .collect()
}

/// The enumeration of scenario A: 12 essential organisms (`e01`..`e12`) completed by exactly
/// one of 5 alternatives (`a1`..`a5`).
pub fn mk_essential_plus_alternatives() -> EnumerationResult {
    let essentials: Vec<String> = (1..=12).map(|i| format!("e{i:02}")).collect();
    let solutions = (1..=5).map(|i| {
        let mut solution = essentials.clone();
        solution.push(format!("a{i}"));
        solution
    });
    EnumerationResult::from_solutions("scenario_a", solutions)
}
