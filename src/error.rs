use cancel_this::Cancelled;
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating analysis inputs.
///
/// Divergences found by the analysis itself (a powergraph that over-approximates the
/// enumeration, a competitor partition that does not explain all solutions) are *not*
/// errors. They are part of the regular output.
#[derive(Error, Debug)]
pub enum AnalysisError {
    // Input artifacts
    #[error("Cannot read `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in `{path}`: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Missing input `{path}`")]
    MissingInput { path: PathBuf },

    // Solver output
    #[error(
        "Category `{category}` has unproducible targets {targets:?}; fix the targets file and rerun the solver"
    )]
    UnproducibleTargets {
        category: String,
        targets: BTreeSet<String>,
    },

    #[error("Category `{category}` has an inconsistent enumeration: {message}")]
    InconsistentEnumeration { category: String, message: String },

    // Powergraph
    #[error("Invalid powergraph: {0}")]
    InvalidPowergraph(String),

    #[error("Malformed BBL line {line}: `{content}`")]
    BblSyntax { line: usize, content: String },

    // Label table
    #[error("Malformed label table `{path}` at line {line}: {message}")]
    LabelSyntax {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Analysis cancelled: {0}")]
    Cancelled(Cancelled),
}

impl From<Cancelled> for AnalysisError {
    fn from(value: Cancelled) -> Self {
        AnalysisError::Cancelled(value)
    }
}

impl AnalysisError {
    /// Errors caused by missing or unreadable input files. These abort the whole run,
    /// while other errors only affect the category they were raised for.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AnalysisError::Io { .. }
                | AnalysisError::Json { .. }
                | AnalysisError::MissingInput { .. }
                | AnalysisError::BblSyntax { .. }
                | AnalysisError::LabelSyntax { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> AnalysisError {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            AnalysisError::MissingInput { path }
        } else {
            AnalysisError::Io { path, source }
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> AnalysisError {
        AnalysisError::Json {
            path: path.into(),
            source,
        }
    }
}
