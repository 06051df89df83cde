//! A disjoint-set ("union-find") data structure with path compression and
//! union by rank.
//!
//! Used internally by the RDF hash engine's decomposition mode (§4.5) to
//! split a dataset into connected components on its blank nodes before
//! refining each component independently.

#[derive(Copy, Clone, Debug)]
struct Elt {
    rank: u32,
    parent: u32,
}

/// See <https://en.wikipedia.org/wiki/Disjoint-set_data_structure>.
#[derive(Clone, Debug)]
pub struct UnionFind {
    elts: Vec<Elt>,
}

impl UnionFind {
    /// Create a new `UnionFind` of `n` singleton sets `0..n`.
    pub fn new(n: usize) -> Self {
        let elts = (0..n)
            .map(|i| Elt {
                rank: 0,
                parent: i as u32,
            })
            .collect();
        UnionFind { elts }
    }

    /// Return the representative of the set containing `x`, without
    /// mutating the structure.
    ///
    /// # Panics
    /// Panics if `x` is out of bounds.
    pub fn find(&self, x: usize) -> usize {
        let mut x = x;
        while self.elts[x].parent as usize != x {
            x = self.elts[x].parent as usize;
        }
        x
    }

    /// Return the representative of the set containing `x`, compressing
    /// the path from `x` to the root so future lookups are cheaper.
    ///
    /// # Panics
    /// Panics if `x` is out of bounds.
    pub fn find_mut(&mut self, x: usize) -> usize {
        let root = self.find(x);
        let mut cur = x;
        while self.elts[cur].parent as usize != root {
            let next = self.elts[cur].parent as usize;
            self.elts[cur].parent = root as u32;
            cur = next;
        }
        root
    }

    /// Unify the sets containing `x` and `y`.
    ///
    /// Returns `true` if they were in different sets (and are now merged),
    /// `false` if they already belonged to the same set.
    ///
    /// # Panics
    /// Panics if `x` or `y` is out of bounds.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let xrep = self.find_mut(x);
        let yrep = self.find_mut(y);
        if xrep == yrep {
            return false;
        }
        match self.elts[xrep].rank.cmp(&self.elts[yrep].rank) {
            core::cmp::Ordering::Less => self.elts[xrep].parent = yrep as u32,
            core::cmp::Ordering::Greater => self.elts[yrep].parent = xrep as u32,
            core::cmp::Ordering::Equal => {
                self.elts[yrep].parent = xrep as u32;
                self.elts[xrep].rank += 1;
            }
        }
        true
    }

    /// Return `true` if `x` and `y` are currently in the same set.
    pub fn equiv(&self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }

    /// Collect the partition into groups of original indices, keyed by
    /// representative. The order of groups and of members within a group
    /// is not significant; callers that need determinism should sort.
    pub fn into_labeling(mut self) -> Vec<usize> {
        for i in 0..self.elts.len() {
            self.find_mut(i);
        }
        self.elts.iter().map(|e| e.parent as usize).collect()
    }
}
