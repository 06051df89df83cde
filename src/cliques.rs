//! Maximal-clique enumeration, the external collaborator §1 names for the
//! exact coloring solver's lower bound (§4.3, §4.4): "Produces all maximal
//! cliques of an undirected graph as a list of node lists."
//!
//! Uses the [Bron–Kerbosch algorithm][1] with pivoting, the same approach
//! this codebase already uses elsewhere for clique finding. Candidate sets
//! are kept in a `BTreeSet` rather than a hash set: §5 requires every
//! iteration that affects observable output to be preceded by an explicit
//! lexicographic sort, and a hash set's iteration order is not that.
//!
//! [1]: https://en.wikipedia.org/wiki/Bron%E2%80%93Kerbosch_algorithm

use std::collections::BTreeSet;

use crate::visit::{GetAdjacencyMatrix, IntoNeighbors, IntoNodeIdentifiers};

fn bron_kerbosch_pivot<G>(
    g: G,
    adj: &G::AdjMatrix,
    r: BTreeSet<G::NodeId>,
    mut p: BTreeSet<G::NodeId>,
    mut x: BTreeSet<G::NodeId>,
    out: &mut Vec<BTreeSet<G::NodeId>>,
) where
    G: GetAdjacencyMatrix + IntoNeighbors + Copy,
    G::NodeId: Ord,
{
    if p.is_empty() {
        if x.is_empty() {
            out.push(r);
        }
        return;
    }

    // Pivot on the candidate with the most neighbours (ties broken toward
    // the largest node id, since `max_by_key` over a sorted iterator keeps
    // the last maximum), to prune the branch set down to the candidates
    // that are *not* adjacent to it.
    let pivot = *p
        .iter()
        .max_by_key(|&&v| g.neighbors(v).count())
        .expect("p is non-empty");
    let branch: Vec<G::NodeId> = p
        .iter()
        .filter(|&&v| v == pivot || !g.is_adjacent(adj, pivot, v))
        .copied()
        .collect();

    for v in branch {
        let neighbors: BTreeSet<G::NodeId> = g.neighbors(v).collect();
        p.remove(&v);

        let mut next_r = r.clone();
        next_r.insert(v);
        let next_p: BTreeSet<G::NodeId> = p.intersection(&neighbors).copied().collect();
        let next_x: BTreeSet<G::NodeId> = x.intersection(&neighbors).copied().collect();

        bron_kerbosch_pivot(g, adj, next_r, next_p, next_x, out);

        x.insert(v);
    }
}

/// Find all maximal cliques of an undirected graph.
///
/// A clique is a set of pairwise-adjacent nodes; a maximal clique cannot be
/// extended by any further adjacent node. A graph may have many maximal
/// cliques, up to `3^(n/3)` of them in the worst case.
pub fn maximal_cliques<G>(g: G) -> Vec<BTreeSet<G::NodeId>>
where
    G: GetAdjacencyMatrix + IntoNodeIdentifiers + IntoNeighbors + Copy,
    G::NodeId: Ord,
{
    let adj = g.adjacency_matrix();
    let r = BTreeSet::new();
    let p: BTreeSet<G::NodeId> = g.node_identifiers().collect();
    let x = BTreeSet::new();
    let mut out = Vec::new();
    bron_kerbosch_pivot(g, &adj, r, p, x, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    #[test]
    fn finds_the_triangle_and_the_pendant() {
        // 0 - 1 - 2
        //  \ /
        //   (0,1,2 triangle) plus pendant edge 2-3
        let g = Graph::from_edges(4, [(0, 1), (1, 2), (2, 0), (2, 3)]);
        let cliques = maximal_cliques(&g);
        let as_sets: Vec<BTreeSet<i64>> = cliques
            .into_iter()
            .map(|c| c.into_iter().map(|n| n.0).collect())
            .collect();
        assert!(as_sets.contains(&[0i64, 1, 2].into_iter().collect()));
        assert!(as_sets.contains(&[2i64, 3].into_iter().collect()));
        assert_eq!(as_sets.len(), 2);
    }

    #[test]
    fn runs_deterministically() {
        let g = Graph::from_edges(6, [(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5), (5, 3)]);
        let first = maximal_cliques(&g);
        let second = maximal_cliques(&g);
        assert_eq!(first, second);
    }
}
