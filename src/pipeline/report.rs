use crate::AnalysisError;
use crate::key_species::Classification;
use crate::labels::GroupLabel;
use crate::pipeline::AnalysisResults;
use log::{debug, info};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

const KEY_SPECIES_TSV: &str = "key_species.tsv";
const KEY_SPECIES_JSON: &str = "key_species.json";
const EQUATION_JSON: &str = "equation.json";
const CONSISTENCY_JSON: &str = "consistency.json";
const SOLUTION_GRAPH_GML: &str = "solution_graph.gml";

/// Write the reports of all successfully analysed categories into `output_dir`:
///
///  - `key_species.tsv` with one row per category and organism class (one count column per
///    label in the grouped mode);
///  - `key_species.json` with the full classification of every category;
///  - `<category>/equation.json`, `<category>/solution_graph.gml`, and
///    `<category>/consistency.json` when a powergraph was checked.
pub fn write_reports(output_dir: &Path, results: &AnalysisResults) -> Result<(), AnalysisError> {
    std::fs::create_dir_all(output_dir).map_err(|e| AnalysisError::io(output_dir, e))?;

    let analyses: Vec<_> = results.values().filter_map(|it| it.as_ref().ok()).collect();

    let columns: Vec<GroupLabel> = analyses
        .iter()
        .flat_map(|it| it.classification.columns())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let mut table = String::new();
    table.push_str(&key_species_header(&columns));
    for analysis in &analyses {
        for row in analysis
            .classification
            .table_rows(&analysis.category, &columns)
        {
            let mut fields = vec![row.category, row.kind.to_string()];
            fields.extend(row.counts.iter().map(|it| it.to_string()));
            fields.push(row.total.to_string());
            table.push_str(&fields.join("\t"));
            table.push('\n');
        }
    }
    write_file(&output_dir.join(KEY_SPECIES_TSV), &table)?;

    let classifications: BTreeMap<&str, &Classification> = analyses
        .iter()
        .map(|it| (it.category.as_str(), &it.classification))
        .collect();
    write_json(&output_dir.join(KEY_SPECIES_JSON), &classifications)?;

    for analysis in &analyses {
        let dir = output_dir.join(&analysis.category);
        std::fs::create_dir_all(&dir).map_err(|e| AnalysisError::io(&dir, e))?;
        write_json(&dir.join(EQUATION_JSON), &analysis.equation)?;
        if let Some(consistency) = &analysis.consistency {
            write_json(&dir.join(CONSISTENCY_JSON), consistency)?;
        }
        write_file(
            &dir.join(SOLUTION_GRAPH_GML),
            &analysis.solution_graph.to_gml(),
        )?;
        debug!("Reports of `{}` written.", analysis.category);
    }

    info!(
        "Wrote reports of {} categories into `{}`.",
        analyses.len(),
        output_dir.display()
    );
    Ok(())
}

fn key_species_header(columns: &[GroupLabel]) -> String {
    let mut header = vec!["category", "kind"];
    header.extend(columns.iter().map(|it| it.as_str()));
    header.push("total");
    format!("{}\n", header.join("\t"))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), AnalysisError> {
    let content = serde_json::to_string_pretty(value).map_err(|e| AnalysisError::json(path, e))?;
    write_file(path, &content)
}

fn write_file(path: &Path, content: &str) -> Result<(), AnalysisError> {
    std::fs::write(path, content).map_err(|e| AnalysisError::io(path, e))
}
