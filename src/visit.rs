//! Graph capability traits.
//!
//! The coloring and clique algorithms in this crate do not own a graph
//! storage type; they are generic over these traits instead, so that a
//! caller's own graph representation can be colored directly without
//! conversion. A single arena-backed [`Graph`](crate::graph::Graph) is
//! provided in [`crate::graph`] as a reference implementation and for use in
//! tests, the same way `petgraph::Graph` is one concrete implementation of
//! `petgraph::visit`'s traits among many possible ones.
//!
//! Only the capabilities §6 of the specification actually names are
//! exposed: enumerate all node ids, enumerate a node's neighbours, test
//! existence, and (for the clique finder) answer adjacency queries in O(1).

use fixedbitset::FixedBitSet;

/// Base trait shared by all graph references: fixes the node identifier
/// type used throughout a call.
pub trait GraphBase {
    /// Node identifier type. Cheap to copy (an index or small integer).
    type NodeId: Copy;
}

impl<'a, G: GraphBase> GraphBase for &'a G {
    type NodeId = G::NodeId;
}

/// Enumerate all node ids of a graph.
pub trait IntoNodeIdentifiers: GraphBase {
    type NodeIdentifiers: Iterator<Item = Self::NodeId>;
    fn node_identifiers(self) -> Self::NodeIdentifiers;
    fn node_count(&self) -> usize;
}

/// Enumerate the neighbours of a node (undirected: both endpoints of any
/// edge touching the node, deduplication not required).
pub trait IntoNeighbors: GraphBase {
    type Neighbors: Iterator<Item = Self::NodeId>;
    fn neighbors(self, a: Self::NodeId) -> Self::Neighbors;
}

/// A reference to an edge, exposing its two endpoints.
pub trait EdgeRef: Copy {
    type NodeId;
    fn source(&self) -> Self::NodeId;
    fn target(&self) -> Self::NodeId;
}

/// Enumerate the edges incident to a node.
pub trait IntoEdges: IntoNeighbors {
    type EdgeRef: EdgeRef<NodeId = Self::NodeId>;
    type Edges: Iterator<Item = Self::EdgeRef>;
    fn edges(self, a: Self::NodeId) -> Self::Edges;
}

/// The graph's node ids map into a dense `0..node_bound()` index space,
/// possibly with holes (if nodes were removed). Coloring uses this to size
/// per-node arrays (degree table, adjacent-color sets).
pub trait NodeIndexable: GraphBase {
    fn node_bound(&self) -> usize;
    fn to_index(&self, a: Self::NodeId) -> usize;
}

/// A map recording which nodes have been visited, used by traversals and by
/// the DSATUR selector to know which nodes remain uncoloured.
pub trait VisitMap<N> {
    /// Mark `n` visited. Returns `true` if it was not already visited.
    fn visit(&mut self, n: N) -> bool;
    fn is_visited(&self, n: &N) -> bool;
}

impl VisitMap<usize> for FixedBitSet {
    fn visit(&mut self, n: usize) -> bool {
        let present = self.contains(n);
        self.insert(n);
        !present
    }
    fn is_visited(&self, n: &usize) -> bool {
        self.contains(*n)
    }
}

/// A graph that can produce a fresh visit map sized to its node set.
pub trait Visitable: GraphBase {
    type Map: VisitMap<Self::NodeId>;
    fn visit_map(&self) -> Self::Map;
    fn reset_map(&self, map: &mut Self::Map);
}

/// O(1) adjacency queries via a precomputed matrix. Used by maximum-clique
/// search (§4.4), which repeatedly asks "are u and v adjacent" inside a
/// tight recursive loop where an edge-list scan would dominate runtime.
pub trait GetAdjacencyMatrix: GraphBase {
    type AdjMatrix;
    fn adjacency_matrix(&self) -> Self::AdjMatrix;
    fn is_adjacent(&self, matrix: &Self::AdjMatrix, a: Self::NodeId, b: Self::NodeId) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    #[test]
    fn node_indexable_round_trips() {
        let mut g = Graph::new();
        let a = g.add_node();
        let b = g.add_node();
        assert_eq!((&g).to_index(a), 0);
        assert_eq!((&g).to_index(b), 1);
        assert_eq!((&g).node_bound(), 2);
    }
}
