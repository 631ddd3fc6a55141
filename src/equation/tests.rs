use crate::competitors::{CompetitorPartition, extract_groups};
use crate::enumeration::EnumerationResult;
use crate::equation::{SymbolicFamily, build_equation, matches_enumeration};
use crate::test_utils::{init_logger, mk_enumeration, mk_essential_plus_alternatives, mk_labels};

fn partition_of(result: &EnumerationResult) -> CompetitorPartition {
    extract_groups(result)
        .unwrap()
        .partition()
        .cloned()
        .expect("Expected a partition")
}

#[test]
fn single_substitution_equation() {
    init_logger();
    let result = mk_enumeration(&[&["a", "x", "y"], &["b", "x", "y"]]);
    let partition = partition_of(&result);

    let equation = build_equation(&partition, result.solution_count(), None).unwrap();
    assert_eq!(equation.formula, "(a | b) & x & y");
    assert_eq!(equation.combination_count, 2);
    assert_eq!(equation.groups.len(), 3);
    assert!(equation.labelled.is_none());
    assert_eq!(matches_enumeration(&equation, &result), Some(true));
}

#[test]
fn count_mismatch_withholds_equation() {
    init_logger();
    let result = mk_enumeration(&[&["a", "x", "y"], &["b", "x", "y"]]);
    let partition = partition_of(&result);
    assert!(build_equation(&partition, 3, None).is_none());
}

#[test]
fn emitted_equation_count_equals_enumeration() {
    let result = mk_essential_plus_alternatives();
    let partition = partition_of(&result);
    let equation = build_equation(&partition, result.solution_count(), None).unwrap();

    assert_eq!(equation.combination_count, result.solution_count());
    assert!(
        equation
            .formula
            .starts_with("(a1 | a2 | a3 | a4 | a5) & e01 & e02")
    );
    assert_eq!(matches_enumeration(&equation, &result), Some(true));
}

#[test]
fn labelled_rendering_keeps_structure() {
    let result = mk_enumeration(&[&["a", "x"], &["b", "x"]]);
    let labels = mk_labels(&[("a", "Firmicutes"), ("b", "Bacteroidetes"), ("x", "Firmicutes")]);
    let partition = partition_of(&result);

    let equation = build_equation(&partition, 2, Some(&labels)).unwrap();
    let labelled = equation.labelled.as_ref().unwrap();
    assert_eq!(equation.formula, "(a | b) & x");
    assert_eq!(labelled.formula, "(Firmicutes | Bacteroidetes) & Firmicutes");
    assert_eq!(labelled.groups.len(), equation.groups.len());
    assert_eq!(equation.combination_count, 2);
}

#[test]
fn rendering_is_deterministic() {
    let result = mk_enumeration(&[
        &["z", "c", "a"],
        &["z", "d", "a"],
        &["z", "c", "b"],
        &["z", "d", "b"],
    ]);
    let first = build_equation(&partition_of(&result), 4, None).unwrap();
    let second = build_equation(&partition_of(&result), 4, None).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.formula, "(a | b) & (c | d) & z");
}

#[test]
fn symbolic_check_detects_missing_combination() {
    // Three of the four combinations of (a | b) & (c | d): the counts differ, but the
    // symbolic check is also stronger than counting.
    let result = mk_enumeration(&[&["a", "c"], &["a", "d"], &["b", "c"]]);
    let family = SymbolicFamily::new(&result).unwrap();
    let groups = vec![
        vec!["a".to_string(), "b".to_string()],
        vec!["c".to_string(), "d".to_string()],
    ];
    let product = family.exactly_one_of_each(&groups).unwrap();
    assert_eq!(product.cardinality(), 4.0);
    assert_eq!(family.enumeration(&result).cardinality(), 3.0);
    assert_ne!(product, family.enumeration(&result));
}
