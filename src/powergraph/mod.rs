//! Powergraphs: compressed solution graphs made of nested power nodes.
//!
//! A graph compression engine groups organisms of the solution graph into *power nodes*,
//! which can themselves be grouped into larger power nodes. The inclusion relation forms
//! a forest, stored here as an arena of nodes indexed by [`PowerNodeId`]. Each power node
//! owns either base organisms or other power nodes, never both.
//!
//! Two encodings are supported:
//!  - JSON, either a bare `{ "node": ["child", ...] }` object, or an object with
//!    `inclusion` and `edges` fields;
//!  - BBL ("bubble") text files, see [`parse_bbl`].

mod bbl;

#[cfg(test)]
mod tests;

use crate::AnalysisError;
use crate::enumeration::Organism;
pub use bbl::parse_bbl;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Index of a power node in a [`Powergraph`] arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PowerNodeId(usize);

impl Display for PowerNodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The direct children of a power node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PowerNodeContent {
    Organisms(BTreeSet<Organism>),
    Nodes(BTreeSet<PowerNodeId>),
}

/// A power node of the inclusion forest.
#[derive(Clone, Debug)]
pub struct PowerNode {
    name: String,
    content: PowerNodeContent,
    parent: Option<PowerNodeId>,
    descendants: BTreeSet<Organism>,
}

/// A power edge. Endpoints are power node names or organisms.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PowerEdge {
    pub source: String,
    pub target: String,
}

/// The serialized JSON form of a powergraph.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum PowergraphDocument {
    Structured {
        inclusion: BTreeMap<String, Vec<String>>,
        #[serde(default)]
        edges: Vec<(String, String)>,
    },
    Inclusion(BTreeMap<String, Vec<String>>),
}

/// A validated power node inclusion forest, together with its power edges.
#[derive(Clone, Debug)]
pub struct Powergraph {
    nodes: Vec<PowerNode>,
    by_name: BTreeMap<String, PowerNodeId>,
    container: BTreeMap<Organism, PowerNodeId>,
    edges: Vec<PowerEdge>,
}

impl PowergraphDocument {
    /// Split the document into the inclusion mapping and the power edges.
    pub fn into_parts(self) -> (BTreeMap<String, Vec<String>>, Vec<PowerEdge>) {
        match self {
            PowergraphDocument::Structured { inclusion, edges } => {
                let edges = edges
                    .into_iter()
                    .map(|(source, target)| PowerEdge { source, target })
                    .collect();
                (inclusion, edges)
            }
            PowergraphDocument::Inclusion(inclusion) => (inclusion, Vec::new()),
        }
    }
}

impl Powergraph {
    /// Build a powergraph from a power node → children mapping.
    ///
    /// A child is a power node if it is a key of `inclusion`, otherwise it is a base
    /// organism. Fails if a power node is empty, mixes organisms and power nodes, if a
    /// child has several direct containers, or if the inclusion relation has a cycle.
    pub fn from_inclusion(
        inclusion: BTreeMap<String, Vec<String>>,
        edges: Vec<PowerEdge>,
    ) -> Result<Powergraph, AnalysisError> {
        let by_name: BTreeMap<String, PowerNodeId> = inclusion
            .keys()
            .enumerate()
            .map(|(i, name)| (name.clone(), PowerNodeId(i)))
            .collect();

        let mut nodes = Vec::with_capacity(inclusion.len());
        let mut container: BTreeMap<Organism, PowerNodeId> = BTreeMap::new();
        let mut parents: Vec<Option<PowerNodeId>> = vec![None; inclusion.len()];
        for (name, children) in &inclusion {
            let id = by_name[name];
            let (nested, organisms): (Vec<&String>, Vec<&String>) =
                children.iter().partition(|it| by_name.contains_key(*it));

            if nested.is_empty() && organisms.is_empty() {
                return Err(invalid(format!("power node `{name}` is empty")));
            }
            if !nested.is_empty() && !organisms.is_empty() {
                return Err(invalid(format!(
                    "power node `{name}` contains both organisms and power nodes"
                )));
            }

            for child in &nested {
                let child_id = by_name[*child];
                if let Some(other) = parents[child_id.0].replace(id) {
                    if other != id {
                        return Err(invalid(format!(
                            "power node `{child}` is contained in several power nodes"
                        )));
                    }
                }
            }
            for organism in &organisms {
                if let Some(other) = container.insert((*organism).clone(), id) {
                    if other != id {
                        return Err(invalid(format!(
                            "organism `{organism}` is contained in several power nodes"
                        )));
                    }
                }
            }

            let content = if nested.is_empty() {
                PowerNodeContent::Organisms(organisms.into_iter().cloned().collect())
            } else {
                PowerNodeContent::Nodes(nested.into_iter().map(|it| by_name[it]).collect())
            };
            nodes.push(PowerNode {
                name: name.clone(),
                content,
                parent: None,
                descendants: BTreeSet::new(),
            });
        }

        for (node, parent) in nodes.iter_mut().zip(parents) {
            node.parent = parent;
        }
        check_acyclic(&nodes)?;

        // Children always have to be resolved before their parents.
        let mut order: Vec<PowerNodeId> = (0..nodes.len()).map(PowerNodeId).collect();
        order.sort_by_cached_key(|it| std::cmp::Reverse(depth(&nodes, *it)));
        for id in order {
            let descendants = match &nodes[id.0].content {
                PowerNodeContent::Organisms(organisms) => organisms.clone(),
                PowerNodeContent::Nodes(children) => children
                    .iter()
                    .flat_map(|child| nodes[child.0].descendants.iter().cloned())
                    .collect(),
            };
            nodes[id.0].descendants = descendants;
        }

        debug!(
            "Loaded powergraph with {} power nodes, {} compressed organisms and {} edges.",
            nodes.len(),
            container.len(),
            edges.len()
        );

        Ok(Powergraph {
            nodes,
            by_name,
            container,
            edges,
        })
    }

    /// Read a powergraph file. Files with the `bbl` extension are parsed as BBL, all other
    /// files as JSON.
    pub fn from_file(path: &Path) -> Result<Powergraph, AnalysisError> {
        let content = std::fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        let is_bbl = path
            .extension()
            .map(|it| it.eq_ignore_ascii_case("bbl"))
            .unwrap_or(false);
        let (inclusion, edges) = if is_bbl {
            parse_bbl(&content)?
        } else {
            serde_json::from_str::<PowergraphDocument>(&content)
                .map_err(|e| AnalysisError::json(path, e))?
                .into_parts()
        };
        Powergraph::from_inclusion(inclusion, edges)
    }

    /// Number of power nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all power node ids.
    pub fn node_ids(&self) -> impl Iterator<Item = PowerNodeId> + '_ {
        (0..self.nodes.len()).map(PowerNodeId)
    }

    /// Power nodes that are not contained in another power node.
    pub fn roots(&self) -> impl Iterator<Item = PowerNodeId> + '_ {
        self.node_ids().filter(|it| self.nodes[it.0].parent.is_none())
    }

    pub fn edges(&self) -> &[PowerEdge] {
        &self.edges
    }

    pub fn id_of(&self, name: &str) -> Option<PowerNodeId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: PowerNodeId) -> &str {
        &self.nodes[id.0].name
    }

    pub fn content(&self, id: PowerNodeId) -> &PowerNodeContent {
        &self.nodes[id.0].content
    }

    pub fn parent(&self, id: PowerNodeId) -> Option<PowerNodeId> {
        self.nodes[id.0].parent
    }

    /// All base organisms below a power node.
    pub fn descendants(&self, id: PowerNodeId) -> &BTreeSet<Organism> {
        &self.nodes[id.0].descendants
    }

    /// The number of direct children of a power node.
    pub fn fan_out(&self, id: PowerNodeId) -> usize {
        match &self.nodes[id.0].content {
            PowerNodeContent::Organisms(x) => x.len(),
            PowerNodeContent::Nodes(x) => x.len(),
        }
    }

    /// The organism sets a power node offers as alternatives: one set per direct child
    /// (a single organism, or all organisms below a nested power node).
    pub fn alternatives(&self, id: PowerNodeId) -> Vec<BTreeSet<Organism>> {
        match &self.nodes[id.0].content {
            PowerNodeContent::Organisms(x) => {
                x.iter().map(|it| BTreeSet::from([it.clone()])).collect()
            }
            PowerNodeContent::Nodes(x) => {
                x.iter().map(|it| self.descendants(*it).clone()).collect()
            }
        }
    }

    /// The power node directly containing `organism`.
    pub fn container_of(&self, organism: &str) -> Option<PowerNodeId> {
        self.container.get(organism).copied()
    }

    /// The outermost power node containing `id`.
    pub fn root_of(&self, id: PowerNodeId) -> PowerNodeId {
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            current = parent;
        }
        current
    }

    /// The outermost power node containing `organism`, if it is compressed at all.
    pub fn root_containing(&self, organism: &str) -> Option<PowerNodeId> {
        self.container_of(organism).map(|it| self.root_of(it))
    }
}

fn invalid(message: String) -> AnalysisError {
    AnalysisError::InvalidPowergraph(message)
}

/// Every power node must reach a root by following its parents.
fn check_acyclic(nodes: &[PowerNode]) -> Result<(), AnalysisError> {
    for (i, node) in nodes.iter().enumerate() {
        let mut current = node.parent;
        let mut steps = 0;
        while let Some(parent) = current {
            steps += 1;
            if parent.0 == i || steps > nodes.len() {
                return Err(invalid(format!(
                    "power node `{}` is part of an inclusion cycle",
                    node.name
                )));
            }
            current = nodes[parent.0].parent;
        }
    }
    Ok(())
}

/// Number of ancestors of a power node (the forest must be acyclic).
fn depth(nodes: &[PowerNode], id: PowerNodeId) -> usize {
    let mut depth = 0;
    let mut current = nodes[id.0].parent;
    while let Some(parent) = current {
        depth += 1;
        current = nodes[parent.0].parent;
    }
    depth
}
