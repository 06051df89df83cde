//! A minimal arena-backed undirected simple graph.
//!
//! This is a reference implementation of the [`visit`](crate::visit)
//! capability traits, analogous to how `petgraph::Graph` is one of several
//! possible implementations of `petgraph::visit`. Callers with their own
//! graph type are never required to convert into this one: every algorithm
//! in [`crate::coloring`] and [`crate::cliques`] is generic over the traits
//! instead.
//!
//! Node identifiers are stable, densely packed `i64`s assigned in insertion
//! order, matching §3's "stable 64-bit integers." Self-loops are rejected;
//! parallel edges collapse (the adjacency relation is a set, not a
//! multiset), which is harmless for coloring since only the *existence* of
//! an edge matters.

use hashbrown::HashSet;

use crate::visit::{
    EdgeRef as EdgeRefTrait, GetAdjacencyMatrix, GraphBase, IntoEdges, IntoNeighbors,
    IntoNodeIdentifiers, NodeIndexable, VisitMap, Visitable,
};

/// A node identifier: a stable, densely-packed 64-bit integer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub i64);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Default)]
struct Node {
    neighbors: HashSet<NodeId>,
}

/// An undirected simple graph over [`NodeId`]s.
#[derive(Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    pub fn new() -> Self {
        Graph { nodes: Vec::new() }
    }

    pub fn with_capacity(n: usize) -> Self {
        Graph {
            nodes: Vec::with_capacity(n),
        }
    }

    /// Add a new node and return its id.
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len() as i64);
        self.nodes.push(Node::default());
        id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.neighbors.len()).sum::<usize>() / 2
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        id.0 >= 0 && (id.0 as usize) < self.nodes.len()
    }

    /// Add an undirected edge between `a` and `b`.
    ///
    /// # Panics
    /// Panics if `a == b` (self-loops are not supported, per §1) or if
    /// either endpoint does not exist.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) {
        assert_ne!(a, b, "graph coloring does not support self-loops");
        assert!(self.contains_node(a) && self.contains_node(b), "edge endpoint out of bounds");
        self.nodes[a.index()].neighbors.insert(b);
        self.nodes[b.index()].neighbors.insert(a);
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.nodes[id.index()].neighbors.len()
    }

    pub fn is_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.nodes[a.index()].neighbors.contains(&b)
    }

    /// Build a graph from an edge list over `0..n` node indices.
    pub fn from_edges(n: usize, edges: impl IntoIterator<Item = (i64, i64)>) -> Self {
        let mut g = Graph::with_capacity(n);
        for _ in 0..n {
            g.add_node();
        }
        for (a, b) in edges {
            g.add_edge(NodeId(a), NodeId(b));
        }
        g
    }
}

pub struct NodeIndices {
    next: i64,
    end: i64,
}

impl Iterator for NodeIndices {
    type Item = NodeId;
    fn next(&mut self) -> Option<NodeId> {
        if self.next >= self.end {
            return None;
        }
        let id = NodeId(self.next);
        self.next += 1;
        Some(id)
    }
}

pub struct Neighbors<'a> {
    inner: hashbrown::hash_set::Iter<'a, NodeId>,
}

impl<'a> Iterator for Neighbors<'a> {
    type Item = NodeId;
    fn next(&mut self) -> Option<NodeId> {
        self.inner.next().copied()
    }
}

#[derive(Copy, Clone)]
pub struct EdgeRef {
    pub source: NodeId,
    pub target: NodeId,
}

impl EdgeRefTrait for EdgeRef {
    type NodeId = NodeId;
    fn source(&self) -> NodeId {
        self.source
    }
    fn target(&self) -> NodeId {
        self.target
    }
}

pub struct Edges<'a> {
    source: NodeId,
    inner: hashbrown::hash_set::Iter<'a, NodeId>,
}

impl<'a> Iterator for Edges<'a> {
    type Item = EdgeRef;
    fn next(&mut self) -> Option<EdgeRef> {
        self.inner.next().map(|&target| EdgeRef {
            source: self.source,
            target,
        })
    }
}

impl GraphBase for Graph {
    type NodeId = NodeId;
}

impl<'a> GraphBase for &'a Graph {
    type NodeId = NodeId;
}

impl<'a> IntoNodeIdentifiers for &'a Graph {
    type NodeIdentifiers = NodeIndices;
    fn node_identifiers(self) -> NodeIndices {
        NodeIndices {
            next: 0,
            end: self.nodes.len() as i64,
        }
    }
    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl<'a> IntoNeighbors for &'a Graph {
    type Neighbors = Neighbors<'a>;
    fn neighbors(self, a: NodeId) -> Neighbors<'a> {
        Neighbors {
            inner: self.nodes[a.index()].neighbors.iter(),
        }
    }
}

impl<'a> IntoEdges for &'a Graph {
    type EdgeRef = EdgeRef;
    type Edges = Edges<'a>;
    fn edges(self, a: NodeId) -> Edges<'a> {
        Edges {
            source: a,
            inner: self.nodes[a.index()].neighbors.iter(),
        }
    }
}

impl<'a> NodeIndexable for &'a Graph {
    fn node_bound(&self) -> usize {
        self.nodes.len()
    }
    fn to_index(&self, a: NodeId) -> usize {
        a.index()
    }
}

impl<'a> Visitable for &'a Graph {
    type Map = fixedbitset::FixedBitSet;
    fn visit_map(&self) -> fixedbitset::FixedBitSet {
        fixedbitset::FixedBitSet::with_capacity(self.nodes.len())
    }
    fn reset_map(&self, map: &mut fixedbitset::FixedBitSet) {
        map.clear();
        map.grow(self.nodes.len());
    }
}

impl VisitMap<NodeId> for fixedbitset::FixedBitSet {
    fn visit(&mut self, n: NodeId) -> bool {
        let present = self.contains(n.index());
        self.insert(n.index());
        !present
    }
    fn is_visited(&self, n: &NodeId) -> bool {
        self.contains(n.index())
    }
}

impl<'a> GetAdjacencyMatrix for &'a Graph {
    type AdjMatrix = ();
    fn adjacency_matrix(&self) {}
    fn is_adjacent(&self, (): &(), a: NodeId, b: NodeId) -> bool {
        Graph::is_adjacent(self, a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_is_built_correctly() {
        let g = Graph::from_edges(3, [(0, 1), (1, 2), (2, 0)]);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.degree(NodeId(0)), 2);
        assert!(g.is_adjacent(NodeId(0), NodeId(1)));
        assert!(!g.is_adjacent(NodeId(0), NodeId(0)));
    }

    #[test]
    #[should_panic(expected = "self-loops")]
    fn self_loop_panics() {
        let mut g = Graph::new();
        let a = g.add_node();
        g.add_edge(a, a);
    }
}
