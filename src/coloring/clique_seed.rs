//! Turning a maximum clique into a branch-and-bound seed (§4.4).
//!
//! The exact solver's lower bound comes from the largest clique in the
//! graph: no proper coloring can use fewer colors than the clique's size,
//! since every pair of its members is pairwise adjacent and so must receive
//! distinct colors. Once a clique is chosen, its members are pre-colored
//! `0..|C|-1`, fixing that many branch decisions before the search proper
//! begins.

use std::collections::BTreeSet;

use hashbrown::HashMap;

use crate::visit::IntoNeighbors;

/// Among the maximal cliques of a graph, choose the one to seed the exact
/// solver with: greatest size first; ties broken toward the clique whose
/// members have the smallest total degree outside the clique itself (fewer
/// external constraints to propagate); remaining ties broken by the
/// enumeration order `cliques` was given in.
///
/// Returns the chosen clique's members along with a coloring that assigns
/// them colors `0..members.len()`, in ascending node-id order (our
/// definition of "enumeration order" for a set whose own iteration order is
/// already sorted, being a `BTreeSet`).
pub fn seed_from_best_clique<G>(
    g: G,
    cliques: &[BTreeSet<G::NodeId>],
) -> Option<(BTreeSet<G::NodeId>, HashMap<G::NodeId, usize>)>
where
    G: IntoNeighbors + Copy,
    G::NodeId: Eq + std::hash::Hash + Ord,
{
    let mut best: Option<(usize, usize, usize)> = None; // (size, -outer_degree as usize flip, index)
    for (i, clique) in cliques.iter().enumerate() {
        let outer_neighbors: BTreeSet<G::NodeId> = clique
            .iter()
            .flat_map(|&v| g.neighbors(v))
            .filter(|n| !clique.contains(n))
            .collect();
        let outer_degree = outer_neighbors.len();
        // Bigger size wins; among equal size, smaller outer degree wins, so
        // negate it into the comparison by inverting the ordering below.
        let candidate = (clique.len(), outer_degree, i);
        let better = match best {
            None => true,
            Some((bsize, bouter, _)) => {
                candidate.0 > bsize || (candidate.0 == bsize && candidate.1 < bouter)
            }
        };
        if better {
            best = Some(candidate);
        }
    }

    let (_, _, idx) = best?;
    let clique = cliques[idx].clone();
    let coloring = clique
        .iter()
        .enumerate()
        .map(|(color, &node)| (node, color))
        .collect();
    Some((clique, coloring))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cliques::maximal_cliques;
    use crate::graph::Graph;

    #[test]
    fn picks_the_larger_clique() {
        // Triangle 0-1-2 plus a pendant edge 2-3: the triangle is the
        // unique largest clique.
        let g = Graph::from_edges(4, [(0, 1), (1, 2), (2, 0), (2, 3)]);
        let cliques = maximal_cliques(&g);
        let (clique, coloring) = seed_from_best_clique(&g, &cliques).unwrap();
        assert_eq!(clique.len(), 3);
        let mut colors: Vec<usize> = coloring.values().copied().collect();
        colors.sort_unstable();
        assert_eq!(colors, vec![0, 1, 2]);
    }

    #[test]
    fn breaks_ties_by_lower_outer_degree() {
        // Two disjoint triangles, one of whose members also touches an
        // extra outside node. The clique with no outside edges should win.
        let g = Graph::from_edges(
            7,
            [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (3, 6)],
        );
        let cliques = maximal_cliques(&g);
        let (clique, _) = seed_from_best_clique(&g, &cliques).unwrap();
        let ids: BTreeSet<i64> = clique.iter().map(|n| n.0).collect();
        assert_eq!(ids, [0i64, 1, 2].into_iter().collect());
    }

    #[test]
    fn outer_degree_counts_distinct_outside_neighbors_not_sum_of_edges() {
        // Two disjoint triangles. 0-1-2's two outside edges both land on
        // the same node (6), so its outer degree is 1 distinct neighbor,
        // not 2; 3-4-5's two outside edges land on two distinct nodes (6
        // and 7), so its outer degree is 2. The first triangle must win
        // the tie-break, even though both triangles have the same number
        // of outside *edges*.
        let g = Graph::from_edges(
            8,
            [
                (0, 1), (1, 2), (2, 0), (0, 6), (1, 6),
                (3, 4), (4, 5), (5, 3), (3, 6), (4, 7),
            ],
        );
        let cliques = maximal_cliques(&g);
        let (clique, _) = seed_from_best_clique(&g, &cliques).unwrap();
        let ids: BTreeSet<i64> = clique.iter().map(|n| n.0).collect();
        assert_eq!(ids, [0i64, 1, 2].into_iter().collect());
    }
}
