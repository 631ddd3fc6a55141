use crate::AnalysisError;
use crate::powergraph::PowerEdge;
use log::{trace, warn};
use std::collections::{BTreeMap, BTreeSet};

/// Parse a BBL ("bubble") powergraph into an inclusion mapping and a list of power edges.
///
/// Recognized statements (one per line, whitespace separated):
///  - `NODE <name>` declares a base node;
///  - `SET <name> [weight]` declares a power node;
///  - `IN <child> <power node>` states that `child` is directly contained in a power node;
///  - `EDGE <source> <target> [weight]` declares an edge.
///
/// Empty lines and `#` comments are skipped, as are unknown statements (with a warning).
/// A `SET` that never receives children is kept, and later rejected as an empty power node.
pub fn parse_bbl(
    content: &str,
) -> Result<(BTreeMap<String, Vec<String>>, Vec<PowerEdge>), AnalysisError> {
    let mut sets: BTreeSet<String> = BTreeSet::new();
    let mut memberships: Vec<(usize, String, String)> = Vec::new();
    let mut edges = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let line_number = i + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let syntax_error = || AnalysisError::BblSyntax {
            line: line_number,
            content: line.to_string(),
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields[0] {
            "NODE" => {
                if fields.len() < 2 {
                    return Err(syntax_error());
                }
            }
            "SET" => {
                let Some(name) = fields.get(1) else {
                    return Err(syntax_error());
                };
                sets.insert(name.to_string());
            }
            "IN" => {
                let (Some(child), Some(parent)) = (fields.get(1), fields.get(2)) else {
                    return Err(syntax_error());
                };
                memberships.push((line_number, child.to_string(), parent.to_string()));
            }
            "EDGE" => {
                let (Some(source), Some(target)) = (fields.get(1), fields.get(2)) else {
                    return Err(syntax_error());
                };
                edges.push(PowerEdge {
                    source: source.to_string(),
                    target: target.to_string(),
                });
            }
            other => {
                warn!("Skipping unknown BBL statement `{other}` on line {line_number}.");
            }
        }
    }

    let mut inclusion: BTreeMap<String, Vec<String>> =
        sets.iter().map(|it| (it.clone(), Vec::new())).collect();
    for (line, child, parent) in memberships {
        let Some(children) = inclusion.get_mut(&parent) else {
            return Err(AnalysisError::BblSyntax {
                line,
                content: format!("IN {child} {parent} (`{parent}` is not a SET)"),
            });
        };
        trace!("`{child}` in `{parent}`.");
        children.push(child);
    }

    Ok((inclusion, edges))
}
