//! End-to-end analysis of a directory of solver outputs.
//!
//! Every target category is analysed independently: key species classification, competitor
//! groups and boolean equation, the solution graph, and (when a powergraph is available) the
//! powergraph consistency check. Categories run in parallel, each under its own timeout.

mod report;


use crate::AnalysisError;
use crate::competitors::{PartitionOutcome, extract_groups};
use crate::consistency::{ConsistencyConfig, ConsistencyReport, run_check};
use crate::enumeration::{EnumerationResult, Organism, SolverOutput};
use crate::equation::{BooleanEquation, build_equation, matches_enumeration};
use crate::key_species::{Classification, classify};
use crate::labels::{GroupLabel, GroupLabels};
use crate::powergraph::Powergraph;
use crate::solution_graph::SolutionGraph;
use cancel_this::Cancellable;
use log::{debug, info, warn};
use rayon::prelude::*;
pub use report::write_reports;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File extensions accepted for powergraphs, in order of preference.
const POWERGRAPH_EXTENSIONS: [&str; 2] = ["bbl", "json"];

/// Options of an analysis run.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    /// Group labels for the grouped classification and the labelled equations.
    pub labels: Option<GroupLabels>,
    /// Label columns shared by all categories (default: every label of `labels`).
    pub label_universe: Option<BTreeSet<GroupLabel>>,
    /// See [`ConsistencyConfig::max_combinations`].
    pub max_combinations: usize,
    /// Cancel the analysis of a category after the given time (default: no limit).
    pub timeout: Option<Duration>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            labels: None,
            label_universe: None,
            max_combinations: usize::MAX,
            timeout: None,
        }
    }
}

impl AnalysisConfig {
    pub fn with_labels(mut self, labels: GroupLabels) -> AnalysisConfig {
        self.label_universe = Some(labels.labels());
        self.labels = Some(labels);
        self
    }

    pub fn with_max_combinations(mut self, max_combinations: usize) -> AnalysisConfig {
        self.max_combinations = max_combinations;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> AnalysisConfig {
        self.timeout = timeout;
        self
    }
}

/// Inputs of one target category.
#[derive(Clone, Debug)]
pub struct CategoryInput {
    pub enumeration: EnumerationResult,
    pub powergraph: Option<Powergraph>,
}

/// The boolean equation of a category, with the context needed to interpret it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EquationDocument {
    pub category: String,
    pub enumerated_count: usize,
    /// All solutions have the same number of organisms.
    pub uniform_solution_size: bool,
    pub competitors: PartitionOutcome,
    /// `None` when the competitor groups do not explain the enumeration, or when the
    /// powergraph of the category is approximate.
    pub equation: Option<BooleanEquation>,
    /// Whether the equation denotes exactly the enumerated solutions (BDD comparison).
    pub symbolically_exact: Option<bool>,
    /// Organisms without competitors that are not in every solution. Non-empty only when
    /// solution sizes differ.
    pub competitor_free_outside_intersection: BTreeSet<Organism>,
}

/// Complete analysis of one target category.
#[derive(Clone, Debug)]
pub struct CategoryAnalysis {
    pub category: String,
    pub classification: Classification,
    pub equation: EquationDocument,
    pub consistency: Option<ConsistencyReport>,
    pub solution_graph: SolutionGraph,
}

/// Per-category results of a run, by category name.
pub type AnalysisResults = BTreeMap<String, Result<CategoryAnalysis, AnalysisError>>;

/// Load all categories of an enumeration directory (one `<category>.json` file each).
///
/// When `powergraph_dir` is given, it must contain a `<category>.bbl` or `<category>.json`
/// powergraph for every category. Missing or unreadable files fail the whole load. Errors
/// that only concern one category (unproducible targets, invalid powergraph structure) are
/// returned for that category.
pub fn load_categories(
    enumeration_dir: &Path,
    powergraph_dir: Option<&Path>,
) -> Result<BTreeMap<String, Result<CategoryInput, AnalysisError>>, AnalysisError> {
    let mut inputs = BTreeMap::new();
    for path in json_files(enumeration_dir)? {
        let Some(category) = path.file_stem().map(|it| it.to_string_lossy().into_owned()) else {
            continue;
        };
        let input = load_category(&category, &path, powergraph_dir);
        match input {
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("Category `{category}` skipped: {e}");
                inputs.insert(category, Err(e));
            }
            Ok(input) => {
                inputs.insert(category, Ok(input));
            }
        }
    }
    info!(
        "Loaded {} categories from `{}`.",
        inputs.len(),
        enumeration_dir.display()
    );
    Ok(inputs)
}

fn load_category(
    category: &str,
    enumeration_path: &Path,
    powergraph_dir: Option<&Path>,
) -> Result<CategoryInput, AnalysisError> {
    let enumeration = SolverOutput::from_file(enumeration_path)?.into_enumeration(category)?;
    let powergraph = match powergraph_dir {
        None => None,
        Some(dir) => Some(Powergraph::from_file(&find_powergraph(dir, category)?)?),
    };
    Ok(CategoryInput {
        enumeration,
        powergraph,
    })
}

fn find_powergraph(dir: &Path, category: &str) -> Result<PathBuf, AnalysisError> {
    POWERGRAPH_EXTENSIONS
        .iter()
        .map(|extension| dir.join(format!("{category}.{extension}")))
        .find(|path| path.is_file())
        .ok_or_else(|| AnalysisError::MissingInput {
            path: dir.join(format!("{category}.{}", POWERGRAPH_EXTENSIONS[0])),
        })
}

/// Sorted `*.json` files of a directory.
fn json_files(dir: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
    let entries = std::fs::read_dir(dir).map_err(|e| AnalysisError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| AnalysisError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|it| it == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Analyse a single category.
///
/// With a powergraph, the boolean equation is only reported when the powergraph is
/// faithful to the enumeration.
pub fn analyze_category(
    input: &CategoryInput,
    config: &AnalysisConfig,
) -> Cancellable<CategoryAnalysis> {
    let result = &input.enumeration;
    let labels = config.labels.as_ref();

    let classification = classify(result, labels, config.label_universe.as_ref());
    let solution_graph = SolutionGraph::from_enumeration(result);

    let consistency = match &input.powergraph {
        None => {
            debug!(
                "Category `{}`: no powergraph, consistency check skipped.",
                result.category()
            );
            None
        }
        Some(powergraph) => {
            let config = ConsistencyConfig::new(powergraph.clone(), result.clone())
                .with_labels(config.labels.clone())
                .with_max_combinations(config.max_combinations);
            Some(run_check(config)?)
        }
    };
    let equation = equation_document(result, labels, consistency.as_ref())?;

    Ok(CategoryAnalysis {
        category: result.category().to_string(),
        classification,
        equation,
        consistency,
        solution_graph,
    })
}

fn equation_document(
    result: &EnumerationResult,
    labels: Option<&GroupLabels>,
    consistency: Option<&ConsistencyReport>,
) -> Cancellable<EquationDocument> {
    let competitors = extract_groups(result)?;
    let competitor_free_outside_intersection = match competitors.partition() {
        None => BTreeSet::new(),
        Some(partition) => {
            let outside: BTreeSet<Organism> = partition
                .singletons()
                .difference(result.intersection())
                .cloned()
                .collect();
            if !outside.is_empty() {
                info!(
                    "Category `{}`: {} organisms without competitors are not essential.",
                    result.category(),
                    outside.len()
                );
            }
            outside
        }
    };

    let equation = match consistency {
        // The check only synthesizes an equation for a faithful powergraph.
        Some(report) => {
            if !report.is_faithful() {
                debug!(
                    "Category `{}`: approximate powergraph, equation withheld.",
                    result.category()
                );
            }
            report.equation.clone()
        }
        None => competitors
            .partition()
            .and_then(|it| build_equation(it, result.solution_count(), labels)),
    };

    let symbolically_exact = equation.as_ref().and_then(|it| matches_enumeration(it, result));
    if symbolically_exact == Some(false) {
        warn!(
            "Category `{}`: equation has the right size but describes other communities.",
            result.category()
        );
    }

    Ok(EquationDocument {
        category: result.category().to_string(),
        enumerated_count: result.solution_count(),
        uniform_solution_size: result.has_uniform_solution_size(),
        competitors,
        equation,
        symbolically_exact,
        competitor_free_outside_intersection,
    })
}

/// Analyse all categories in parallel.
///
/// Categories that failed to load keep their error. With a timeout, a category that runs
/// out of time fails with [`AnalysisError::Cancelled`] without affecting the others.
pub fn analyze_all(
    inputs: BTreeMap<String, Result<CategoryInput, AnalysisError>>,
    config: &AnalysisConfig,
) -> AnalysisResults {
    inputs
        .into_par_iter()
        .map(|(category, input)| {
            let analysis = input.and_then(|input| {
                let analysis = match config.timeout {
                    None => analyze_category(&input, config),
                    Some(timeout) => {
                        cancel_this::on_timeout(timeout, || analyze_category(&input, config))
                    }
                };
                analysis.map_err(|e| {
                    warn!("Category `{category}` failed: {e}");
                    AnalysisError::from(e)
                })
            });
            (category, analysis)
        })
        .collect()
}
