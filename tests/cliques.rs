use std::collections::BTreeSet;

use graphcanon::cliques::maximal_cliques;
use graphcanon::graph::{Graph, NodeId};

fn as_index_sets(cliques: Vec<BTreeSet<NodeId>>) -> Vec<BTreeSet<i64>> {
    cliques.into_iter().map(|c| c.into_iter().map(|n| n.0).collect()).collect()
}

#[test]
fn two_disjoint_triangles_yield_exactly_two_maximal_cliques() {
    let g = Graph::from_edges(6, [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);
    let cliques = as_index_sets(maximal_cliques(&g));
    assert_eq!(cliques.len(), 2);
    assert!(cliques.contains(&[0, 1, 2].into_iter().collect()));
    assert!(cliques.contains(&[3, 4, 5].into_iter().collect()));
}

#[test]
fn a_single_edge_with_no_triangle_is_its_own_maximal_clique() {
    let g = Graph::from_edges(4, [(0, 1), (2, 3)]);
    let cliques = as_index_sets(maximal_cliques(&g));
    assert_eq!(cliques.len(), 2);
    assert!(cliques.contains(&[0, 1].into_iter().collect()));
    assert!(cliques.contains(&[2, 3].into_iter().collect()));
}

#[test]
fn a_complete_graph_on_five_nodes_has_one_maximal_clique_containing_all_of_it() {
    let n = 5i64;
    let edges: Vec<(i64, i64)> = (0..n).flat_map(|a| (a + 1..n).map(move |b| (a, b))).collect();
    let g = Graph::from_edges(n as usize, edges);
    let cliques = as_index_sets(maximal_cliques(&g));
    assert_eq!(cliques.len(), 1);
    assert_eq!(cliques[0], (0..n).collect());
}

/// The graph used by the exact coloring test suite to check the
/// clique-seeded lower bound: a 4-clique glued to a pendant triangle
/// through a shared edge should surface both as maximal cliques, with the
/// 4-clique strictly larger.
#[test]
fn overlapping_cliques_are_all_reported() {
    let g = Graph::from_edges(5, [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3), (3, 4), (2, 4)]);
    let cliques = as_index_sets(maximal_cliques(&g));
    assert!(cliques.contains(&[0, 1, 2, 3].into_iter().collect()));
    assert!(cliques.contains(&[2, 3, 4].into_iter().collect()));
}
