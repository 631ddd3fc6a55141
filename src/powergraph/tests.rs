use crate::AnalysisError;
use crate::powergraph::{PowerNodeContent, Powergraph, PowergraphDocument, parse_bbl};
use crate::test_utils::{init_logger, mk_powergraph, mk_set};
use std::collections::BTreeMap;

fn inclusion(pairs: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    pairs
        .iter()
        .map(|(node, children)| {
            (
                node.to_string(),
                children.iter().map(|it| it.to_string()).collect(),
            )
        })
        .collect()
}

#[test]
fn nested_power_nodes() {
    init_logger();
    let graph = mk_powergraph(&[
        ("P1", &["a", "b"]),
        ("P2", &["c", "d"]),
        ("P3", &["P1", "P2"]),
        ("P4", &["x"]),
    ]);

    let p1 = graph.id_of("P1").unwrap();
    let p3 = graph.id_of("P3").unwrap();
    assert_eq!(graph.len(), 4);
    assert_eq!(graph.descendants(p3), &mk_set(&["a", "b", "c", "d"]));
    assert_eq!(graph.parent(p1), Some(p3));
    assert_eq!(graph.root_of(p1), p3);
    assert_eq!(graph.container_of("a"), Some(p1));
    assert_eq!(graph.root_containing("c"), Some(p3));
    assert_eq!(graph.root_containing("z"), None);
    assert_eq!(graph.fan_out(p3), 2);
    assert_eq!(
        graph.alternatives(p3),
        vec![mk_set(&["a", "b"]), mk_set(&["c", "d"])]
    );
    assert_eq!(graph.alternatives(p1), vec![mk_set(&["a"]), mk_set(&["b"])]);
    assert!(matches!(graph.content(p3), PowerNodeContent::Nodes(x) if x.len() == 2));

    let roots: Vec<&str> = graph.roots().map(|it| graph.name(it)).collect();
    assert_eq!(roots, vec!["P3", "P4"]);
}

#[test]
fn deep_nesting_resolves_descendants() {
    let graph = mk_powergraph(&[
        ("A", &["B"]),
        ("B", &["C", "D"]),
        ("C", &["x", "y"]),
        ("D", &["z"]),
    ]);
    let a = graph.id_of("A").unwrap();
    assert_eq!(graph.descendants(a), &mk_set(&["x", "y", "z"]));
    assert_eq!(graph.root_containing("x"), Some(a));
}

#[test]
fn cycles_are_rejected() {
    let result = Powergraph::from_inclusion(
        inclusion(&[("P1", &["P2"]), ("P2", &["P1"])]),
        Vec::new(),
    );
    assert!(matches!(result, Err(AnalysisError::InvalidPowergraph(_))));

    let result = Powergraph::from_inclusion(inclusion(&[("P1", &["P1"])]), Vec::new());
    assert!(matches!(result, Err(AnalysisError::InvalidPowergraph(_))));
}

#[test]
fn mixed_content_is_rejected() {
    let result = Powergraph::from_inclusion(
        inclusion(&[("P1", &["a", "P2"]), ("P2", &["b"])]),
        Vec::new(),
    );
    assert!(matches!(result, Err(AnalysisError::InvalidPowergraph(_))));
}

#[test]
fn ambiguous_container_is_rejected() {
    let result = Powergraph::from_inclusion(
        inclusion(&[("P1", &["a", "b"]), ("P2", &["b", "c"])]),
        Vec::new(),
    );
    assert!(matches!(result, Err(AnalysisError::InvalidPowergraph(_))));
}

#[test]
fn empty_power_node_is_rejected() {
    let result = Powergraph::from_inclusion(inclusion(&[("P1", &[])]), Vec::new());
    assert!(matches!(result, Err(AnalysisError::InvalidPowergraph(_))));
}

#[test]
fn json_documents() {
    let bare: PowergraphDocument = serde_json::from_str(r#"{ "P1": ["a", "b"] }"#).unwrap();
    let (inclusion, edges) = bare.into_parts();
    assert_eq!(inclusion["P1"], vec!["a", "b"]);
    assert!(edges.is_empty());

    let structured: PowergraphDocument = serde_json::from_str(
        r#"{ "inclusion": { "P1": ["a", "b"], "P2": ["e"] }, "edges": [["P1", "P2"]] }"#,
    )
    .unwrap();
    let (inclusion, edges) = structured.into_parts();
    assert_eq!(inclusion.len(), 2);
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].source, "P1");
    assert_eq!(edges[0].target, "P2");
}

#[test]
fn bbl_parsing() {
    let content = "# powergraph\n\
                   NODE a\n\
                   NODE b\n\
                   NODE e\n\
                   SET PWRN-1 1.0\n\
                   SET PWRN-2 1.0\n\
                   IN a PWRN-1\n\
                   IN b PWRN-1\n\
                   IN e PWRN-2\n\
                   EDGE PWRN-1 PWRN-2 1.0\n\
                   COMMENT ignored\n";
    let (inclusion, edges) = parse_bbl(content).unwrap();
    assert_eq!(inclusion["PWRN-1"], vec!["a", "b"]);
    assert_eq!(inclusion["PWRN-2"], vec!["e"]);
    assert_eq!(edges.len(), 1);

    let graph = Powergraph::from_inclusion(inclusion, edges).unwrap();
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.edges().len(), 1);
}

#[test]
fn bbl_membership_in_unknown_set() {
    let error = parse_bbl("SET P 1.0\nIN a Q\n").unwrap_err();
    assert!(matches!(error, AnalysisError::BblSyntax { line: 2, .. }));
}

#[test]
fn bbl_truncated_statement() {
    let error = parse_bbl("NODE a\nIN a\n").unwrap_err();
    assert!(matches!(error, AnalysisError::BblSyntax { line: 2, .. }));
}
