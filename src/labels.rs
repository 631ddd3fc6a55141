//! Optional grouping of organisms under categorical labels (usually a taxonomic rank).

use crate::AnalysisError;
use crate::enumeration::Organism;
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// A categorical label of an organism (e.g. its phylum).
pub type GroupLabel = String;

/// The label assigned to organisms missing from a [`GroupLabels`] table.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Mapping from organisms to their group labels.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupLabels {
    labels: BTreeMap<Organism, GroupLabel>,
}

impl FromIterator<(Organism, GroupLabel)> for GroupLabels {
    fn from_iter<T: IntoIterator<Item = (Organism, GroupLabel)>>(iter: T) -> Self {
        GroupLabels {
            labels: iter.into_iter().collect(),
        }
    }
}

impl GroupLabels {
    /// Read a tab-separated label table.
    ///
    /// The first row is a header. The first column holds organism identifiers and the label
    /// is taken from the column named `column` (default: the second column). Empty lines
    /// and lines starting with `#` are skipped.
    pub fn from_tsv_file(path: &Path, column: Option<&str>) -> Result<GroupLabels, AnalysisError> {
        let content = std::fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        Self::from_tsv(&content, column).map_err(|(line, message)| AnalysisError::LabelSyntax {
            path: path.to_path_buf(),
            line,
            message,
        })
    }

    fn from_tsv(content: &str, column: Option<&str>) -> Result<GroupLabels, (usize, String)> {
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with('#'));

        let Some((header_line, header)) = lines.next() else {
            return Err((1, "missing header row".to_string()));
        };
        let header: Vec<&str> = header.split('\t').collect();
        let index = match column {
            None if header.len() >= 2 => 1,
            None => return Err((header_line, "expected at least two columns".to_string())),
            Some(name) => header
                .iter()
                .position(|it| it.trim() == name)
                .ok_or_else(|| (header_line, format!("no column named `{name}`")))?,
        };

        let mut labels = BTreeMap::new();
        for (line_number, line) in lines {
            let fields: Vec<&str> = line.split('\t').collect();
            let Some(label) = fields.get(index) else {
                return Err((line_number, format!("missing column {}", index + 1)));
            };
            let organism = fields[0].trim();
            let label = label.trim();
            if organism.is_empty() || label.is_empty() {
                return Err((line_number, "empty organism or label".to_string()));
            }
            if let Some(previous) = labels.insert(organism.to_string(), label.to_string()) {
                warn!("Organism `{organism}` relabelled from `{previous}` to `{label}`.");
            }
        }

        debug!("Loaded labels for {} organisms.", labels.len());
        Ok(GroupLabels { labels })
    }

    /// The label of an organism, or [`UNKNOWN_LABEL`] if it has none.
    pub fn label_of(&self, organism: &str) -> &str {
        self.labels
            .get(organism)
            .map(|it| it.as_str())
            .unwrap_or(UNKNOWN_LABEL)
    }

    /// All labels used by the table.
    pub fn labels(&self) -> BTreeSet<GroupLabel> {
        self.labels.values().cloned().collect()
    }

    /// The label universe needed to report on `organisms`: all labels of the table, plus
    /// [`UNKNOWN_LABEL`] if some organism has no label.
    pub fn label_universe<'a, I>(&self, organisms: I) -> BTreeSet<GroupLabel>
    where
        I: IntoIterator<Item = &'a Organism>,
    {
        let mut universe = self.labels();
        for organism in organisms {
            if !self.labels.contains_key(organism) {
                universe.insert(UNKNOWN_LABEL.to_string());
                break;
            }
        }
        universe
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
