//! Dependency graph and wave planning.
//!
//! The graph lives in a `petgraph` `DiGraph` with edges pointing from a
//! dependency to its dependent. Node indices follow declaration order.
//! Wave `k` holds every node whose dependencies all sit in waves `< k`,
//! sorted by declaration order, so the plan is identical on every run for
//! the same graph.

use petgraph::algo::{kosaraju_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, Reversed};
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DagError {
    #[error("node '{node}' depends on unknown node '{dependency}'")]
    UnknownDependency { node: String, dependency: String },
    #[error("duplicate node '{0}'")]
    Duplicate(String),
    #[error("dependency cycle among: {}", .0.join(", "))]
    Cycle(Vec<String>),
}

/// A validated acyclic graph over named nodes.
#[derive(Debug, Clone)]
pub struct Dag {
    graph: DiGraph<String, ()>,
    waves: Vec<Vec<usize>>,
}

impl Dag {
    /// Build from `(name, dependency names)` pairs in declaration order.
    pub fn build<'a, I, D>(nodes: I) -> Result<Self, DagError>
    where
        I: IntoIterator<Item = (&'a str, D)>,
        D: IntoIterator<Item = &'a str>,
    {
        let nodes: Vec<(&str, Vec<&str>)> = nodes
            .into_iter()
            .map(|(name, deps)| (name, deps.into_iter().collect()))
            .collect();

        let mut graph = DiGraph::with_capacity(nodes.len(), nodes.len());
        let mut index: HashMap<&str, NodeIndex> = HashMap::with_capacity(nodes.len());
        for (name, _) in &nodes {
            let node = graph.add_node(name.to_string());
            if index.insert(*name, node).is_some() {
                return Err(DagError::Duplicate(name.to_string()));
            }
        }

        for (name, deps) in &nodes {
            let node = index[name];
            for dep in deps {
                let &parent = index.get(dep).ok_or_else(|| DagError::UnknownDependency {
                    node: name.to_string(),
                    dependency: dep.to_string(),
                })?;
                graph.add_edge(parent, node, ());
            }
        }

        let waves = plan_waves(&graph)?;
        Ok(Self { graph, waves })
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn name(&self, node: usize) -> &str {
        &self.graph[NodeIndex::new(node)]
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.graph
            .node_indices()
            .find(|&n| self.graph[n] == name)
            .map(NodeIndex::index)
    }

    /// Direct dependencies of `node`, in declaration order.
    pub fn parents(&self, node: usize) -> Vec<usize> {
        let mut parents: Vec<usize> = self
            .graph
            .neighbors_directed(NodeIndex::new(node), Direction::Incoming)
            .map(NodeIndex::index)
            .collect();
        parents.sort_unstable();
        parents.dedup();
        parents
    }

    /// All waves of the full graph.
    pub fn waves(&self) -> &[Vec<usize>] {
        &self.waves
    }

    /// The selected nodes plus every transitive dependency.
    pub fn with_ancestors(&self, selected: &[usize]) -> BTreeSet<usize> {
        let mut out = BTreeSet::new();
        let reversed = Reversed(&self.graph);
        for &start in selected {
            let mut dfs = Dfs::new(reversed, NodeIndex::new(start));
            while let Some(n) = dfs.next(reversed) {
                out.insert(n.index());
            }
        }
        out
    }

    /// Every transitive dependent of `node`, excluding the node itself.
    pub fn descendants(&self, node: usize) -> BTreeSet<usize> {
        let start = NodeIndex::new(node);
        let mut dfs = Dfs::new(&self.graph, start);
        let mut out = BTreeSet::new();
        while let Some(n) = dfs.next(&self.graph) {
            if n != start {
                out.insert(n.index());
            }
        }
        out
    }

    /// Waves restricted to `included`, dropping waves that become empty.
    ///
    /// A closed-under-ancestors subset keeps the dependency order intact.
    pub fn plan(&self, included: &BTreeSet<usize>) -> Vec<Vec<usize>> {
        self.waves
            .iter()
            .map(|w| w.iter().copied().filter(|n| included.contains(n)).collect::<Vec<_>>())
            .filter(|w| !w.is_empty())
            .collect()
    }
}

/// Group a topological order into waves by longest dependency chain.
fn plan_waves(graph: &DiGraph<String, ()>) -> Result<Vec<Vec<usize>>, DagError> {
    let order = toposort(graph, None).map_err(|cycle| cycle_error(graph, cycle.node_id()))?;

    let mut depth = vec![0usize; graph.node_count()];
    for &node in &order {
        depth[node.index()] = graph
            .neighbors_directed(node, Direction::Incoming)
            .map(|p| depth[p.index()] + 1)
            .max()
            .unwrap_or(0);
    }

    let mut waves: Vec<Vec<usize>> = Vec::new();
    for (node, &d) in depth.iter().enumerate() {
        if waves.len() <= d {
            waves.resize_with(d + 1, Vec::new);
        }
        waves[d].push(node);
    }
    Ok(waves)
}

/// Members of the strongly connected component that closes the cycle.
fn cycle_error(graph: &DiGraph<String, ()>, at: NodeIndex) -> DagError {
    let mut members: Vec<NodeIndex> = kosaraju_scc(graph)
        .into_iter()
        .find(|scc| scc.contains(&at))
        .unwrap_or_else(|| vec![at]);
    members.sort_unstable();
    DagError::Cycle(members.into_iter().map(|n| graph[n].clone()).collect())
}
