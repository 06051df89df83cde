//! Saturation-degree node selection (§4.2): DSATUR and PASS.
//!
//! Both strategies maintain, per uncoloured node, the set of distinct
//! colors currently assigned to its coloured neighbours (its "adjacent-color
//! set"); the saturation degree is the cardinality of that set. The
//! selector is driven by [`crate::coloring::greedy`] through the
//! [`OrderCursor`](crate::coloring::OrderCursor) trait: `advance` picks the
//! next node, `notify` folds the color just assigned into the neighbours'
//! adjacent-color sets before the next pick.

use std::collections::BTreeSet;

use hashbrown::HashSet;

use crate::coloring::OrderCursor;
use crate::visit::{GraphBase, IntoNeighbors, IntoNodeIdentifiers, NodeIndexable};

/// Which member of the saturation-degree family to run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Maximum saturation degree, ties broken by degree in G, then by
    /// iteration order (first node seen at that tier wins).
    Dsatur,
    /// Like DSATUR, but ties among maximum-saturation nodes are broken by
    /// how many colors assigning each candidate would still leave free for
    /// the others (San Segundo's PASS heuristic).
    Pass,
}

/// Saturation-degree state for every node of a graph, indexed by
/// [`NodeIndexable::to_index`].
pub struct SaturationSelector<N> {
    strategy: Strategy,
    id_at: Vec<N>,
    degree: Vec<usize>,
    adjacent_colors: Vec<HashSet<usize>>,
    colored: fixedbitset::FixedBitSet,
    issued_colors: BTreeSet<usize>,
}

impl<N: Copy> SaturationSelector<N> {
    /// Build a fresh selector for `g`, with no coloured nodes.
    pub fn new<G>(strategy: Strategy, g: G) -> Self
    where
        G: IntoNeighbors<NodeId = N> + IntoNodeIdentifiers<NodeId = N> + NodeIndexable<NodeId = N> + Copy,
        N: Eq + std::hash::Hash,
    {
        let n = g.node_bound();
        let mut id_at = vec![None; n];
        let mut degree = vec![0usize; n];
        for node in g.node_identifiers() {
            let idx = g.to_index(node);
            id_at[idx] = Some(node);
            degree[idx] = g.neighbors(node).count();
        }
        let id_at: Vec<N> = id_at
            .into_iter()
            .map(|o| o.expect("NodeIndexable must cover every node_identifiers() entry"))
            .collect();
        SaturationSelector {
            strategy,
            id_at,
            degree,
            adjacent_colors: vec![HashSet::new(); n],
            colored: fixedbitset::FixedBitSet::with_capacity(n),
            issued_colors: BTreeSet::new(),
        }
    }

    /// Snapshot-restore: wipe all adjacent-color sets and rebuild them from
    /// `coloring`, as used by the exact solver (§4.3) between branches.
    pub fn reset<G>(&mut self, g: G, coloring: &hashbrown::HashMap<N, usize>)
    where
        G: IntoNeighbors<NodeId = N> + NodeIndexable<NodeId = N> + Copy,
        N: Eq + std::hash::Hash,
    {
        for set in &mut self.adjacent_colors {
            set.clear();
        }
        self.colored.clear();
        self.issued_colors.clear();
        for (&node, &color) in coloring {
            let idx = g.to_index(node);
            self.colored.insert(idx);
            self.issued_colors.insert(color);
            for nbor in g.neighbors(node) {
                let nidx = g.to_index(nbor);
                if !self.colored.contains(nidx) {
                    self.adjacent_colors[nidx].insert(color);
                }
            }
        }
    }

    fn saturation(&self, idx: usize) -> usize {
        self.adjacent_colors[idx].len()
    }

    fn pick_dsatur(&self) -> Option<usize> {
        let mut best: Option<(usize, usize, usize)> = None;
        for idx in 0..self.id_at.len() {
            if self.colored.contains(idx) {
                continue;
            }
            let key = (self.saturation(idx), self.degree[idx]);
            let better = match best {
                None => true,
                Some((sat, deg, _)) => key > (sat, deg),
            };
            if better {
                best = Some((key.0, key.1, idx));
            }
        }
        best.map(|(_, _, idx)| idx)
    }

    fn pick_pass(&self) -> Option<usize> {
        let max_sat = (0..self.id_at.len())
            .filter(|&idx| !self.colored.contains(idx))
            .map(|idx| self.saturation(idx))
            .max()?;
        let tier: Vec<usize> = (0..self.id_at.len())
            .filter(|&idx| !self.colored.contains(idx) && self.saturation(idx) == max_sat)
            .collect();
        if tier.len() == 1 {
            return Some(tier[0]);
        }

        let mut best_idx = tier[0];
        let mut best_score: Option<usize> = None;
        for &vt in &tier {
            let mut score = 0usize;
            for &vs in &tier {
                if vs == vt {
                    continue;
                }
                let free = self
                    .issued_colors
                    .iter()
                    .filter(|c| !self.adjacent_colors[vs].contains(c) && !self.adjacent_colors[vt].contains(c))
                    .count();
                score += free;
            }
            let better = match best_score {
                None => true,
                Some(b) => score > b,
            };
            if better {
                best_score = Some(score);
                best_idx = vt;
            }
        }
        Some(best_idx)
    }
}

impl<G> OrderCursor<G> for SaturationSelector<G::NodeId>
where
    G: IntoNeighbors + NodeIndexable + Copy,
    G::NodeId: Eq + std::hash::Hash,
{
    fn advance(&mut self, _g: G) -> Option<G::NodeId> {
        let idx = match self.strategy {
            Strategy::Dsatur => self.pick_dsatur(),
            Strategy::Pass => self.pick_pass(),
        }?;
        Some(self.id_at[idx])
    }

    fn notify(&mut self, g: G, node: G::NodeId, color: usize) {
        let idx = g.to_index(node);
        self.colored.insert(idx);
        self.issued_colors.insert(color);
        for nbor in g.neighbors(node) {
            let nidx = g.to_index(nbor);
            if !self.colored.contains(nidx) {
                self.adjacent_colors[nidx].insert(color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coloring::greedy;
    use crate::graph::Graph;

    #[test]
    fn dsatur_picks_max_degree_first() {
        // Star: center adjacent to 4 leaves. Center has the highest degree
        // and, with nothing coloured yet, the highest (tied, zero)
        // saturation, so it must be selected first.
        let g = Graph::from_edges(5, [(0, 1), (0, 2), (0, 3), (0, 4)]);
        let selector = SaturationSelector::new(Strategy::Dsatur, &g);
        let (k, colors) = greedy(&g, selector, hashbrown::HashMap::new()).unwrap();
        assert_eq!(k, 2);
        let center = colors[&crate::graph::NodeId(0)];
        for leaf in 1..5 {
            assert_ne!(colors[&crate::graph::NodeId(leaf)], center);
        }
    }
}
