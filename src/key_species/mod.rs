//! Classification of organisms by how essential they are to producibility.
//!
//!  - *Key species* appear in at least one minimal community (the union).
//!  - *Essential symbionts* appear in every minimal community (the intersection).
//!  - *Alternative symbionts* are key species that are not essential.
//!
//! The classification is either flat, or bucketed by a [`GroupLabels`] table. In the
//! grouped mode, every label of the requested label universe is present in the output
//! (possibly with an empty set), so that reports over many target categories share the
//! same columns.


use crate::enumeration::{EnumerationResult, Organism};
use crate::labels::{GroupLabel, GroupLabels};
use log::info;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

/// The three organism classes computed by [`classify`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KeySpecies<T> {
    pub key_species: T,
    pub essential_symbionts: T,
    pub alternative_symbionts: T,
}

/// Organism classes, bucketed by group label.
pub type GroupedKeySpecies = KeySpecies<BTreeMap<GroupLabel, BTreeSet<Organism>>>;

/// Result of [`classify`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Classification {
    Ungrouped(KeySpecies<BTreeSet<Organism>>),
    Grouped(GroupedKeySpecies),
}

/// The row kinds of a key species table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeySpeciesKind {
    KeySpecies,
    EssentialSymbionts,
    AlternativeSymbionts,
}

impl KeySpeciesKind {
    pub const ALL: [KeySpeciesKind; 3] = [
        KeySpeciesKind::KeySpecies,
        KeySpeciesKind::EssentialSymbionts,
        KeySpeciesKind::AlternativeSymbionts,
    ];
}

impl Display for KeySpeciesKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySpeciesKind::KeySpecies => write!(f, "key_species"),
            KeySpeciesKind::EssentialSymbionts => write!(f, "essential_symbionts"),
            KeySpeciesKind::AlternativeSymbionts => write!(f, "alternative_symbionts"),
        }
    }
}

/// One row of a key species table: organism counts per label, plus a total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    pub category: String,
    pub kind: KeySpeciesKind,
    pub counts: Vec<usize>,
    pub total: usize,
}

/// Classify the organisms of an [`EnumerationResult`].
///
/// Without `labels`, the result is [`Classification::Ungrouped`]. With `labels`, organisms
/// are bucketed by their label; `all_labels` (if given) extends the buckets to a fixed
/// label universe.
pub fn classify(
    result: &EnumerationResult,
    labels: Option<&GroupLabels>,
    all_labels: Option<&BTreeSet<GroupLabel>>,
) -> Classification {
    let key_species = result.union().clone();
    let essential_symbionts = result.intersection().clone();
    let alternative_symbionts: BTreeSet<Organism> = key_species
        .difference(&essential_symbionts)
        .cloned()
        .collect();

    info!(
        "Category `{}`: {} key species, {} essential, {} alternative.",
        result.category(),
        key_species.len(),
        essential_symbionts.len(),
        alternative_symbionts.len()
    );

    let Some(labels) = labels else {
        return Classification::Ungrouped(KeySpecies {
            key_species,
            essential_symbionts,
            alternative_symbionts,
        });
    };

    let mut universe = labels.label_universe(&key_species);
    universe.extend(all_labels.into_iter().flatten().cloned());

    let key_species = bucket(&key_species, labels, &universe);
    let essential_symbionts = bucket(&essential_symbionts, labels, &universe);
    let alternative_symbionts = bucket(&alternative_symbionts, labels, &universe);

    Classification::Grouped(KeySpecies {
        key_species,
        essential_symbionts,
        alternative_symbionts,
    })
}

/// Split `organisms` by label. Every label of `universe` is a key of the result.
fn bucket(
    organisms: &BTreeSet<Organism>,
    labels: &GroupLabels,
    universe: &BTreeSet<GroupLabel>,
) -> BTreeMap<GroupLabel, BTreeSet<Organism>> {
    let mut result: BTreeMap<GroupLabel, BTreeSet<Organism>> = universe
        .iter()
        .map(|label| (label.clone(), BTreeSet::new()))
        .collect();
    for organism in organisms {
        result
            .entry(labels.label_of(organism).to_string())
            .or_default()
            .insert(organism.clone());
    }
    result
}

impl Classification {
    /// Get the organism set of one class, flattened over all labels.
    pub fn organisms(&self, kind: KeySpeciesKind) -> BTreeSet<Organism> {
        match self {
            Classification::Ungrouped(x) => x.get(kind).clone(),
            Classification::Grouped(x) => x.get(kind).values().flatten().cloned().collect(),
        }
    }

    /// The labels used as table columns (empty in the ungrouped mode).
    pub fn columns(&self) -> Vec<GroupLabel> {
        match self {
            Classification::Ungrouped(_) => Vec::new(),
            Classification::Grouped(x) => x.key_species.keys().cloned().collect(),
        }
    }

    /// Convert the classification into table rows, one per [`KeySpeciesKind`].
    ///
    /// The `columns` give the label order of the table. Labels missing from this
    /// classification are reported as zero.
    pub fn table_rows(&self, category: &str, columns: &[GroupLabel]) -> Vec<TableRow> {
        KeySpeciesKind::ALL
            .iter()
            .map(|kind| {
                let (counts, total) = match self {
                    Classification::Ungrouped(x) => (Vec::new(), x.get(*kind).len()),
                    Classification::Grouped(x) => {
                        let buckets = x.get(*kind);
                        let counts = columns
                            .iter()
                            .map(|label| buckets.get(label).map(|it| it.len()).unwrap_or(0))
                            .collect::<Vec<_>>();
                        (counts, buckets.values().map(|it| it.len()).sum())
                    }
                };
                TableRow {
                    category: category.to_string(),
                    kind: *kind,
                    counts,
                    total,
                }
            })
            .collect()
    }
}

impl<T> KeySpecies<T> {
    pub fn get(&self, kind: KeySpeciesKind) -> &T {
        match kind {
            KeySpeciesKind::KeySpecies => &self.key_species,
            KeySpeciesKind::EssentialSymbionts => &self.essential_symbionts,
            KeySpeciesKind::AlternativeSymbionts => &self.alternative_symbionts,
        }
    }
}
