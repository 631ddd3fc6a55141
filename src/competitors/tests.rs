use crate::competitors::{
    CompetitorGroups, PartitionOutcome, competitor_sets, competitors_of, extract_groups,
};
use crate::test_utils::{init_logger, mk_enumeration, mk_essential_plus_alternatives, mk_set};
use computation_process::Stateful;
use std::collections::BTreeSet;

#[test]
fn intersection_member_is_a_singleton() {
    init_logger();
    let result = mk_essential_plus_alternatives();
    assert!(result.intersection().contains("e07"));

    let outcome = extract_groups(&result).unwrap();
    let partition = outcome.partition().expect("Expected a partition");

    assert_eq!(partition.group_of("e07"), Some(&mk_set(&["e07"])));
    assert_eq!(
        partition.group_of("a3"),
        Some(&mk_set(&["a1", "a2", "a3", "a4", "a5"]))
    );
    assert_eq!(partition.len(), 13);
    assert_eq!(partition.combination_count(), Some(5));
    assert_eq!(&partition.singletons(), result.intersection());
}

#[test]
fn single_substitution_forms_one_group() {
    init_logger();
    let result = mk_enumeration(&[&["a", "x", "y"], &["b", "x", "y"]]);

    let outcome = extract_groups(&result).unwrap();
    let partition = outcome.partition().expect("Expected a partition");

    let groups: Vec<BTreeSet<String>> = partition.groups().to_vec();
    assert_eq!(
        groups,
        vec![mk_set(&["a", "b"]), mk_set(&["x"]), mk_set(&["y"])]
    );
    assert_eq!(partition.combination_count(), Some(2));
}

#[test]
fn competitor_sets_are_symmetric_for_simple_enumerations() {
    let result = mk_enumeration(&[
        &["a", "c", "x"],
        &["a", "d", "x"],
        &["b", "c", "x"],
        &["b", "d", "x"],
    ]);

    assert_eq!(competitors_of(&result, "a"), mk_set(&["b"]));
    assert_eq!(competitors_of(&result, "d"), mk_set(&["c"]));
    assert!(competitors_of(&result, "x").is_empty());

    let sets = competitor_sets(&result);
    assert_eq!(sets.len(), 5);
    for (organism, competitors) in &sets {
        for competitor in competitors {
            assert!(sets[competitor].contains(organism));
        }
    }

    let outcome = extract_groups(&result).unwrap();
    let partition = outcome.partition().expect("Expected a partition");
    assert_eq!(partition.combination_count(), Some(4));
}

#[test]
fn entangled_enumeration_is_inconclusive() {
    init_logger();
    // `a` competes with `b` and `c`, but `b` and `c` can appear together.
    let result = mk_enumeration(&[&["a", "x"], &["b", "c"]]);

    let PartitionOutcome::Inconclusive(inconclusive) = extract_groups(&result).unwrap() else {
        panic!("Expected an inconclusive partition");
    };
    assert!(inconclusive.overlapping.contains("a"));
    assert!(inconclusive.uncovered.is_empty());
    assert!(!inconclusive.groups.is_empty());
}

#[test]
fn groups_cover_union_exactly_once() {
    let result = mk_enumeration(&[
        &["e", "a1", "b1"],
        &["e", "a1", "b2"],
        &["e", "a2", "b1"],
        &["e", "a2", "b2"],
        &["e", "a3", "b1"],
        &["e", "a3", "b2"],
    ]);
    let outcome = extract_groups(&result).unwrap();
    let partition = outcome.partition().expect("Expected a partition");

    let mut covered = BTreeSet::new();
    for group in partition.groups() {
        assert!(!group.is_empty());
        for organism in group {
            assert!(covered.insert(organism.clone()), "{organism} covered twice");
        }
    }
    assert_eq!(&covered, result.union());
    assert_eq!(partition.combination_count(), Some(6));
}

#[test]
fn generator_skips_duplicate_groups() {
    let result = mk_enumeration(&[&["a"], &["b"], &["c"]]);
    let groups: Vec<_> = CompetitorGroups::configure(result.clone(), &result)
        .map(|it| it.unwrap())
        .collect();
    assert_eq!(groups, vec![mk_set(&["a", "b", "c"])]);
}

#[test]
fn extraction_is_deterministic() {
    let result = mk_essential_plus_alternatives();
    let first = serde_json::to_string(&extract_groups(&result).unwrap()).unwrap();
    let second = serde_json::to_string(&extract_groups(&result).unwrap()).unwrap();
    assert_eq!(first, second);
}
