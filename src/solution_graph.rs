//! The organism co-occurrence graph of an enumeration.
//!
//! This is the graph handed to the powergraph compression engine: every key species is a
//! node, and two organisms are connected when they appear together in at least one minimal
//! community. Edges are weighted by the number of such communities.

use crate::enumeration::{EnumerationResult, Organism};
use log::debug;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::BTreeMap;
use std::fmt::Write;

#[derive(Clone, Debug)]
pub struct SolutionGraph {
    graph: UnGraph<Organism, usize>,
    /// Nodes are inserted in organism order, so indices follow the sorted union.
    index: BTreeMap<Organism, NodeIndex>,
}

impl SolutionGraph {
    pub fn from_enumeration(result: &EnumerationResult) -> SolutionGraph {
        let mut graph = UnGraph::with_capacity(result.union().len(), 0);
        let index: BTreeMap<Organism, NodeIndex> = result
            .union()
            .iter()
            .map(|organism| (organism.clone(), graph.add_node(organism.clone())))
            .collect();

        for solution in result.solutions() {
            let members: Vec<NodeIndex> = solution.iter().map(|it| index[it]).collect();
            for (i, source) in members.iter().enumerate() {
                for target in &members[i + 1..] {
                    let weight = graph.find_edge(*source, *target).map_or(0, |e| graph[e]);
                    graph.update_edge(*source, *target, weight + 1);
                }
            }
        }

        debug!(
            "Category `{}`: solution graph with {} nodes and {} edges.",
            result.category(),
            graph.node_count(),
            graph.edge_count()
        );
        SolutionGraph { graph, index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_weights().map(|it| it.as_str())
    }

    /// The number of solutions containing both organisms (zero if they never co-occur).
    pub fn weight(&self, a: &str, b: &str) -> usize {
        let (Some(a), Some(b)) = (self.index.get(a), self.index.get(b)) else {
            return 0;
        };
        self.graph.find_edge(*a, *b).map_or(0, |e| self.graph[e])
    }

    /// Iterate over `(source, target, weight)` triples in a deterministic order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, usize)> + '_ {
        self.sorted_edges().into_iter().map(move |(source, target, weight)| {
            (
                self.graph[source].as_str(),
                self.graph[target].as_str(),
                weight,
            )
        })
    }

    /// Edges as `(source, target, weight)` with `source < target`, sorted by endpoints.
    fn sorted_edges(&self) -> Vec<(NodeIndex, NodeIndex, usize)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_references()
            .map(|edge| {
                let (a, b) = (edge.source(), edge.target());
                let (source, target) = if a < b { (a, b) } else { (b, a) };
                (source, target, *edge.weight())
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Render the graph in the GML format.
    pub fn to_gml(&self) -> String {
        let mut gml = String::from("graph [\n  directed 0\n");
        for id in self.graph.node_indices() {
            let label = self.graph[id].replace('"', "'");
            let id = id.index();
            // Writing into a `String` cannot fail.
            let _ = writeln!(gml, "  node [\n    id {id}\n    label \"{label}\"\n  ]");
        }
        for (source, target, weight) in self.sorted_edges() {
            let (source, target) = (source.index(), target.index());
            let _ = writeln!(
                gml,
                "  edge [\n    source {source}\n    target {target}\n    weight {weight}\n  ]"
            );
        }
        gml.push_str("]\n");
        gml
    }
}
