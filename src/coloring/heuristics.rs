//! Static-order and constructive coloring heuristics (§4.10): Welsh–Powell,
//! Recursive Largest First, and Randomized. Unlike DSATUR/PASS (see
//! [`selector`](crate::coloring::selector)), these pick the whole visiting
//! order up front rather than adapting it to the partial coloring as it
//! grows, so each is expressed as a plain `Vec<N>` fed to
//! [`StaticOrder`](crate::coloring::StaticOrder) and [`greedy`].

use hashbrown::HashSet;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::coloring::{greedy, Coloring, StaticOrder};
use crate::visit::{IntoNeighbors, IntoNodeIdentifiers, NodeIndexable};

/// Welsh–Powell: nodes visited once, in descending degree order (ties
/// broken by node index, for determinism). Simpler and cheaper than DSATUR,
/// usually a little worse.
pub fn welsh_powell<G>(g: G) -> (usize, Coloring<G::NodeId>)
where
    G: IntoNeighbors + IntoNodeIdentifiers + NodeIndexable + Copy,
    G::NodeId: Eq + std::hash::Hash,
{
    let mut order: Vec<(usize, usize, G::NodeId)> = g
        .node_identifiers()
        .map(|n| (g.neighbors(n).count(), g.to_index(n), n))
        .collect();
    order.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    let order = order.into_iter().map(|(_, _, n)| n).collect();
    greedy(g, StaticOrder::new(order), Coloring::new()).expect("an empty seed is always valid")
}

/// Recursive Largest First: build one color class at a time. Seed each
/// class with the remaining node of highest degree, then greedily add
/// remaining nodes that are non-adjacent to the class and, among those,
/// most strongly connected to nodes *excluded* from the class so far —
/// the classic RLF tie-break, which tends to finish classes that are hard
/// to extend before starting new ones.
pub fn recursive_largest_first<G>(g: G) -> (usize, Coloring<G::NodeId>)
where
    G: IntoNeighbors + IntoNodeIdentifiers + NodeIndexable + Copy,
    G::NodeId: Eq + std::hash::Hash,
{
    let mut remaining: HashSet<G::NodeId> = g.node_identifiers().collect();
    let mut colors: Coloring<G::NodeId> = Coloring::new();
    let mut color = 0usize;

    while !remaining.is_empty() {
        let mut class: HashSet<G::NodeId> = HashSet::new();
        // candidates not yet in the class and not adjacent to any class member
        let mut candidates: HashSet<G::NodeId> = remaining.clone();
        // excluded: remaining nodes adjacent to the class (can't join it)
        let mut excluded: HashSet<G::NodeId> = HashSet::new();

        while !candidates.is_empty() {
            let pick = *candidates
                .iter()
                .max_by_key(|&&n| {
                    let degree_to_excluded = g.neighbors(n).filter(|m| excluded.contains(m)).count();
                    let degree_in_remaining = g.neighbors(n).filter(|m| remaining.contains(m)).count();
                    (degree_to_excluded, degree_in_remaining, usize::MAX - g.to_index(n))
                })
                .expect("candidates is non-empty");

            class.insert(pick);
            candidates.remove(&pick);
            remaining.remove(&pick);

            for nbor in g.neighbors(pick) {
                if candidates.remove(&nbor) {
                    excluded.insert(nbor);
                }
            }
        }

        for &node in &class {
            colors.insert(node, color);
        }
        color += 1;
    }

    (color, colors)
}

/// Randomized: a uniformly shuffled visiting order, for sampling the
/// distribution of greedy outcomes (e.g. to pick the best of several runs,
/// or to seed restarts). The caller supplies the RNG so results are
/// reproducible when seeded deterministically.
pub fn randomized<G, R>(g: G, rng: &mut R) -> (usize, Coloring<G::NodeId>)
where
    G: IntoNeighbors + IntoNodeIdentifiers + NodeIndexable + Copy,
    G::NodeId: Eq + std::hash::Hash,
    R: Rng + ?Sized,
{
    let mut order: Vec<G::NodeId> = g.node_identifiers().collect();
    order.shuffle(rng);
    greedy(g, StaticOrder::new(order), Coloring::new()).expect("an empty seed is always valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn assert_proper(g: &Graph, colors: &Coloring<crate::graph::NodeId>) {
        for node in g.node_identifiers() {
            for nbor in g.neighbors(node) {
                assert_ne!(colors[&node], colors[&nbor]);
            }
        }
    }

    #[test]
    fn welsh_powell_colors_the_star_with_two_colors() {
        let g = Graph::from_edges(5, [(0, 1), (0, 2), (0, 3), (0, 4)]);
        let (k, colors) = welsh_powell(&g);
        assert_eq!(k, 2);
        assert_proper(&g, &colors);
    }

    #[test]
    fn rlf_properly_colors_an_odd_cycle() {
        let g = Graph::from_edges(5, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);
        let (k, colors) = recursive_largest_first(&g);
        assert_eq!(k, 3);
        assert_proper(&g, &colors);
    }

    #[test]
    fn randomized_is_reproducible_given_the_same_seed() {
        let g = Graph::from_edges(6, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]);
        let mut rng_a = ChaCha8Rng::seed_from_u64(7);
        let mut rng_b = ChaCha8Rng::seed_from_u64(7);
        let (ka, colors_a) = randomized(&g, &mut rng_a);
        let (kb, colors_b) = randomized(&g, &mut rng_b);
        assert_eq!(ka, kb);
        assert_eq!(colors_a, colors_b);
        assert_proper(&g, &colors_a);
    }
}
