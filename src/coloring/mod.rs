//! Greedy sequential coloring (§4.1) and friends.
//!
//! The entry points here are generic over the [`visit`](crate::visit)
//! capability traits, so any graph type implementing them — including a
//! caller's own — can be colored without adapting to a particular storage
//! layout.

pub mod clique_seed;
pub mod error;
pub mod exact;
pub mod heuristics;
pub mod selector;

use hashbrown::{HashMap, HashSet};

use crate::visit::{GraphBase, IntoNeighbors, NodeIndexable};
use error::{InvalidPartialColoring, InvalidReason};

/// A (possibly partial) coloring: node id to non-negative color index.
pub type Coloring<N> = HashMap<N, usize>;

/// A producer of the next node to color, used by [`greedy`]. Implementors
/// may be stateful (the saturation-degree selectors in
/// [`selector`](crate::coloring::selector)) or stateless (a precomputed
/// static order, for Welsh–Powell and Randomized).
pub trait OrderCursor<G: GraphBase> {
    /// Return the next node to color, or `None` when no uncoloured node
    /// remains.
    fn advance(&mut self, g: G) -> Option<G::NodeId>;

    /// Told the color just assigned to the node previously returned by
    /// `advance`, so stateful cursors can update before the next pick.
    /// Stateless cursors may ignore this.
    fn notify(&mut self, g: G, node: G::NodeId, color: usize);
}

/// A cursor over a fixed, precomputed node order (Welsh–Powell, Randomized):
/// `advance` just walks the list; the current coloring state plays no part
/// in choosing the next node.
pub struct StaticOrder<N> {
    order: std::vec::IntoIter<N>,
}

impl<N> StaticOrder<N> {
    pub fn new(order: Vec<N>) -> Self {
        StaticOrder {
            order: order.into_iter(),
        }
    }
}

impl<G: GraphBase> OrderCursor<G> for StaticOrder<G::NodeId> {
    fn advance(&mut self, _g: G) -> Option<G::NodeId> {
        self.order.next()
    }
    fn notify(&mut self, _g: G, _node: G::NodeId, _color: usize) {}
}

/// Run the greedy sequential coloring algorithm of §4.1: repeatedly ask
/// `cursor` for the next node and assign it the least color not used by
/// any already-coloured neighbour.
///
/// `seed` is a validated partial coloring to extend; pass an empty map to
/// color the whole graph from scratch. Returns `(k, colors)` where `k` is
/// the chromatic count as defined in §3: `1 + max color index` when the
/// seed was empty (colors come out contiguous from 0), otherwise the number
/// of distinct colors actually used.
///
/// # Errors
/// Returns [`InvalidPartialColoring`] if `seed` assigns the same color to
/// two adjacent nodes (detected when `cursor` yields one of them and its
/// stored color conflicts with an already-coloured neighbour).
pub fn greedy<G, C>(
    g: G,
    mut cursor: C,
    seed: Coloring<G::NodeId>,
) -> Result<(usize, Coloring<G::NodeId>), InvalidPartialColoring>
where
    G: IntoNeighbors + NodeIndexable + Copy,
    G::NodeId: Eq + std::hash::Hash,
    C: OrderCursor<G>,
{
    let seed_was_empty = seed.is_empty();
    let mut colors = seed;
    let mut max_color: Option<usize> = colors.values().copied().max();

    while let Some(u) = cursor.advance(g) {
        let used: HashSet<usize> = g
            .neighbors(u)
            .filter_map(|v| colors.get(&v).copied())
            .collect();

        let c = if let Some(&existing) = colors.get(&u) {
            if used.contains(&existing) {
                return Err(InvalidPartialColoring {
                    reason: InvalidReason::AdjacentConflict,
                });
            }
            existing
        } else {
            let mut c = 0usize;
            while used.contains(&c) {
                c += 1;
            }
            colors.insert(u, c);
            c
        };

        max_color = Some(max_color.map_or(c, |m| m.max(c)));
        cursor.notify(g, u, c);
    }

    let k = if seed_was_empty {
        max_color.map_or(0, |m| m + 1)
    } else {
        colors.values().copied().collect::<HashSet<_>>().len()
    };
    Ok((k, colors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Graph, NodeId};

    #[test]
    fn greedy_with_static_order_colors_triangle() {
        let g = Graph::from_edges(3, [(0, 1), (1, 2), (2, 0)]);
        let order = StaticOrder::new(vec![NodeId(0), NodeId(1), NodeId(2)]);
        let (k, colors) = greedy(&g, order, Coloring::new()).unwrap();
        assert_eq!(k, 3);
        assert_eq!(colors.len(), 3);
        for edge in [(0, 1), (1, 2), (2, 0)] {
            assert_ne!(colors[&NodeId(edge.0)], colors[&NodeId(edge.1)]);
        }
    }

    #[test]
    fn greedy_rejects_conflicting_seed() {
        let g = Graph::from_edges(2, [(0, 1)]);
        let mut seed = Coloring::new();
        seed.insert(NodeId(0), 0);
        seed.insert(NodeId(1), 0);
        let order = StaticOrder::new(vec![NodeId(0), NodeId(1)]);
        let err = greedy(&g, order, seed).unwrap_err();
        assert_eq!(err.reason, InvalidReason::AdjacentConflict);
    }
}
