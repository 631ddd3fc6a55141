use crate::AnalysisError;
use crate::enumeration::{EnumerationResult, SolverOutput};
use crate::test_utils::{init_logger, mk_enumeration, mk_essential_plus_alternatives, mk_set};
use std::collections::BTreeMap;

const SOLVER_OUTPUT: &str = r#"{
    "bacteria": ["e1", "a"],
    "union_bacteria": ["e1", "a", "b"],
    "inter_bacteria": ["e1"],
    "enum_bacteria": { "1": ["e1", "a"], "2": ["b", "e1"] },
    "newly_prod": ["M_x_c"],
    "still_unprod": [],
    "targets_producers": { "M_x_c": ["a", "b"] }
}"#;

#[test]
fn solver_output_is_normalized() {
    init_logger();
    let output: SolverOutput = serde_json::from_str(SOLVER_OUTPUT).unwrap();
    let result = output.into_enumeration("targets").unwrap();

    assert_eq!(result.category(), "targets");
    assert_eq!(result.union(), &mk_set(&["a", "b", "e1"]));
    assert_eq!(result.intersection(), &mk_set(&["e1"]));
    assert_eq!(result.minimal_solution(), &mk_set(&["a", "e1"]));
    assert_eq!(result.solution_count(), 2);
    assert_eq!(result.enumeration()["2"], mk_set(&["b", "e1"]));
}

#[test]
fn unproducible_targets_are_fatal() {
    let mut output: SolverOutput = serde_json::from_str(SOLVER_OUTPUT).unwrap();
    output.still_unprod = mk_set(&["M_y_c", "M_z_c"]);

    match output.into_enumeration("targets") {
        Err(AnalysisError::UnproducibleTargets { category, targets }) => {
            assert_eq!(category, "targets");
            assert_eq!(targets, mk_set(&["M_y_c", "M_z_c"]));
        }
        other => panic!("Expected unproducible targets error, got {other:?}"),
    }
}

#[test]
fn missing_enumeration_is_rejected() {
    let json = r#"{ "bacteria": [], "union_bacteria": [], "inter_bacteria": [] }"#;
    let output: SolverOutput = serde_json::from_str(json).unwrap();
    match output.into_enumeration("targets") {
        Err(AnalysisError::InconsistentEnumeration { category, message }) => {
            assert_eq!(category, "targets");
            assert!(message.contains("enum_bacteria"));
        }
        other => panic!("Expected inconsistent enumeration error, got {other:?}"),
    }
}

#[test]
fn unproducible_output_without_communities() {
    let json = r#"{ "newly_prod": [], "still_unprod": ["M_lac_e"] }"#;
    let output: SolverOutput = serde_json::from_str(json).unwrap();
    assert!(output.enumeration.is_none());
    match output.into_enumeration("lactate") {
        Err(AnalysisError::UnproducibleTargets { category, targets }) => {
            assert_eq!(category, "lactate");
            assert_eq!(targets, mk_set(&["M_lac_e"]));
        }
        other => panic!("Expected unproducible targets error, got {other:?}"),
    }
}

#[test]
fn intersection_outside_union_is_rejected() {
    let result = EnumerationResult::new(
        "broken",
        mk_set(&["a"]),
        mk_set(&["a"]),
        mk_set(&["a", "z"]),
        BTreeMap::new(),
    );
    assert!(matches!(
        result,
        Err(AnalysisError::InconsistentEnumeration { .. })
    ));
}

#[test]
fn solution_missing_intersection_member_is_rejected() {
    let mut enumeration = BTreeMap::new();
    enumeration.insert("1".to_string(), mk_set(&["a", "b"]));
    enumeration.insert("2".to_string(), mk_set(&["b"]));
    let result = EnumerationResult::new(
        "broken",
        mk_set(&["b"]),
        mk_set(&["a", "b"]),
        mk_set(&["a", "b"]),
        enumeration,
    );
    assert!(matches!(
        result,
        Err(AnalysisError::InconsistentEnumeration { .. })
    ));
}

#[test]
fn duplicate_solutions_are_rejected() {
    let mut enumeration = BTreeMap::new();
    enumeration.insert("1".to_string(), mk_set(&["e", "a"]));
    enumeration.insert("2".to_string(), mk_set(&["e", "b"]));
    enumeration.insert("3".to_string(), mk_set(&["a", "e"]));
    let result = EnumerationResult::new(
        "duplicates",
        mk_set(&["a", "e"]),
        mk_set(&["a", "b", "e"]),
        mk_set(&["e"]),
        enumeration,
    );
    match result {
        Err(AnalysisError::InconsistentEnumeration { category, message }) => {
            assert_eq!(category, "duplicates");
            assert_eq!(message, "solutions `1` and `3` are identical");
        }
        other => panic!("Expected inconsistent enumeration error, got {other:?}"),
    }
}

#[test]
fn from_solutions_drops_repeated_solutions() {
    let result = mk_enumeration(&[&["e", "a"], &["e", "b"], &["a", "e"]]);
    assert_eq!(result.solution_count(), 2);
    assert_eq!(result.enumeration()["2"], mk_set(&["b", "e"]));
    assert_eq!(result.distinct_solutions().len(), result.solution_count());
}

#[test]
fn from_solutions_derives_union_and_intersection() {
    let result = mk_enumeration(&[&["x", "a"], &["x", "b", "c"], &["x", "a", "c"]]);

    assert_eq!(result.union(), &mk_set(&["a", "b", "c", "x"]));
    assert_eq!(result.intersection(), &mk_set(&["x"]));
    assert_eq!(result.minimal_solution(), &mk_set(&["a", "x"]));
    assert!(result.intersection().is_subset(result.union()));
    assert!(result.minimal_solution().is_subset(result.union()));
    assert!(!result.has_uniform_solution_size());
}

#[test]
fn scenario_a_shape() {
    let result = mk_essential_plus_alternatives();
    assert_eq!(result.union().len(), 17);
    assert_eq!(result.intersection().len(), 12);
    assert_eq!(result.solution_count(), 5);
    assert!(result.solutions().all(|it| it.len() == 13));
    assert!(result.has_uniform_solution_size());
}
