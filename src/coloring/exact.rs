//! Exact branch-and-bound DSATUR (§4.3), seeded by the maximum-clique lower
//! bound and heuristic upper bound (§4.4).
//!
//! Unlike [`crate::coloring::greedy`], this solver backtracks, so it is
//! written as an explicit stack machine instead of native recursion: each
//! [`Frame`] pushed records exactly the undo information needed to retract a
//! color choice, and the outer loop alternates between descending (pick the
//! next node, try its first candidate color) and backtracking (undo the
//! topmost choice, try its next candidate).
//!
//! The search tries increasing values of k starting from the clique lower
//! bound: the first k for which a proper k-coloring exists is the chromatic
//! number, since no smaller k can work (the lower bound) and the heuristic
//! upper bound already demonstrates one exists for the largest k tried.

use hashbrown::HashMap;

use crate::cancellation::{Cancel, CancelReason};
use crate::cliques::maximal_cliques;
use crate::coloring::clique_seed::seed_from_best_clique;
use crate::coloring::selector::{SaturationSelector, Strategy};
use crate::coloring::{greedy, Coloring};
use crate::visit::{GetAdjacencyMatrix, IntoNeighbors, IntoNodeIdentifiers, NodeIndexable};

/// Outcome of an exact search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExactOutcome<N> {
    /// The chromatic number and a coloring that achieves it, with a proof
    /// of optimality (the clique lower bound met the found k, or every
    /// smaller k was exhausted).
    Optimal(usize, Coloring<N>),
    /// Cancelled before optimality could be proven. Carries the best
    /// coloring found so far (the heuristic's, or a better one found before
    /// cancellation fired) and why the search stopped.
    Cancelled {
        reason: CancelReason,
        best: Option<(usize, Coloring<N>)>,
    },
}

struct Frame {
    idx: usize,
    candidates: std::vec::IntoIter<usize>,
    applied: usize,
}

enum SearchOutcome {
    Found(Vec<usize>),
    NotFound,
    Cancelled,
}

fn pick_next(n: usize, color: &[Option<usize>], adjacent: &[HashMap<usize, usize>], degree: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    let mut best_idx = None;
    for idx in 0..n {
        if color[idx].is_some() {
            continue;
        }
        let key = (adjacent[idx].len(), degree[idx]);
        let better = match best {
            None => true,
            Some(b) => key > b,
        };
        if better {
            best = Some(key);
            best_idx = Some(idx);
        }
    }
    best_idx
}

fn advance_frame<G>(
    g: G,
    id_at: &[G::NodeId],
    idx: usize,
    candidates: &mut std::vec::IntoIter<usize>,
    color: &mut [Option<usize>],
    adjacent: &mut [HashMap<usize, usize>],
) -> Option<usize>
where
    G: IntoNeighbors + NodeIndexable + Copy,
{
    let c = candidates.next()?;
    color[idx] = Some(c);
    for nbor in g.neighbors(id_at[idx]) {
        let nidx = g.to_index(nbor);
        if color[nidx].is_none() {
            *adjacent[nidx].entry(c).or_insert(0) += 1;
        }
    }
    Some(c)
}

fn undo_frame<G>(
    g: G,
    id_at: &[G::NodeId],
    idx: usize,
    c: usize,
    color: &mut [Option<usize>],
    adjacent: &mut [HashMap<usize, usize>],
) where
    G: IntoNeighbors + NodeIndexable + Copy,
{
    color[idx] = None;
    for nbor in g.neighbors(id_at[idx]) {
        let nidx = g.to_index(nbor);
        if color[nidx].is_none() {
            if let Some(cnt) = adjacent[nidx].get_mut(&c) {
                *cnt -= 1;
                if *cnt == 0 {
                    adjacent[nidx].remove(&c);
                }
            }
        }
    }
}

/// Search for a proper k-coloring, with the clique seed's members held
/// fixed at the colors [`seed_from_best_clique`] assigned them.
fn find_k_coloring<G, C>(
    g: G,
    id_at: &[G::NodeId],
    degree: &[usize],
    k: usize,
    seed: &Coloring<G::NodeId>,
    cancel: &C,
) -> SearchOutcome
where
    G: IntoNeighbors + NodeIndexable + Copy,
    G::NodeId: Eq + std::hash::Hash,
    C: Cancel,
{
    let n = id_at.len();
    let mut color: Vec<Option<usize>> = vec![None; n];
    let mut adjacent: Vec<HashMap<usize, usize>> = (0..n).map(|_| HashMap::new()).collect();

    for idx in 0..n {
        if let Some(&c) = seed.get(&id_at[idx]) {
            color[idx] = Some(c);
        }
    }
    for idx in 0..n {
        if let Some(c) = color[idx] {
            for nbor in g.neighbors(id_at[idx]) {
                let nidx = g.to_index(nbor);
                if color[nidx].is_none() {
                    *adjacent[nidx].entry(c).or_insert(0) += 1;
                }
            }
        }
    }

    let mut stack: Vec<Frame> = Vec::new();
    let mut descending = true;

    loop {
        if cancel.is_done() {
            return SearchOutcome::Cancelled;
        }

        if descending {
            match pick_next(n, &color, &adjacent, degree) {
                None => {
                    return SearchOutcome::Found(
                        color
                            .into_iter()
                            .map(|c| c.expect("pick_next returned None only once every node is colored"))
                            .collect(),
                    );
                }
                Some(idx) => {
                    let current_max = color.iter().filter_map(|c| *c).max();
                    let bound = current_max.map_or(0, |m| m + 1).min(k.saturating_sub(1));
                    let candidates: Vec<usize> = (0..=bound).filter(|c| !adjacent[idx].contains_key(c)).collect();
                    let mut iter = candidates.into_iter();
                    match advance_frame(g, id_at, idx, &mut iter, &mut color, &mut adjacent) {
                        Some(applied) => stack.push(Frame { idx, candidates: iter, applied }),
                        None => descending = false,
                    }
                }
            }
        } else {
            match stack.pop() {
                None => return SearchOutcome::NotFound,
                Some(mut frame) => {
                    undo_frame(g, id_at, frame.idx, frame.applied, &mut color, &mut adjacent);
                    match advance_frame(g, id_at, frame.idx, &mut frame.candidates, &mut color, &mut adjacent) {
                        Some(applied) => {
                            frame.applied = applied;
                            stack.push(frame);
                            descending = true;
                        }
                        None => descending = false,
                    }
                }
            }
        }
    }
}

/// Compute the exact chromatic number of `g` and a coloring that achieves
/// it.
///
/// Seeds the search with the largest maximal clique found (§4.4) as both a
/// lower bound and a set of pre-fixed color assignments, and with a greedy
/// DSATUR run as an upper bound. If the two already agree, the heuristic
/// result is returned directly with no backtracking search at all.
pub fn exact<G, C>(g: G, cancel: &C) -> ExactOutcome<G::NodeId>
where
    G: IntoNeighbors + IntoNodeIdentifiers + NodeIndexable + GetAdjacencyMatrix + Copy,
    G::NodeId: Eq + std::hash::Hash + Ord,
    C: Cancel,
{
    let n = g.node_bound();
    if n == 0 {
        return ExactOutcome::Optimal(0, Coloring::new());
    }

    let mut id_at_slots: Vec<Option<G::NodeId>> = vec![None; n];
    let mut degree = vec![0usize; n];
    for node in g.node_identifiers() {
        let idx = g.to_index(node);
        id_at_slots[idx] = Some(node);
        degree[idx] = g.neighbors(node).count();
    }
    let id_at: Vec<G::NodeId> = id_at_slots
        .into_iter()
        .map(|o| o.expect("NodeIndexable must cover every node_identifiers() entry"))
        .collect();

    let cliques = maximal_cliques(g);
    let (clique_size, seed) = seed_from_best_clique(g, &cliques)
        .map(|(clique, seed)| (clique.len(), seed))
        .unwrap_or((0, Coloring::new()));

    let selector = SaturationSelector::new(Strategy::Dsatur, g);
    let (heuristic_k, heuristic_colors) =
        greedy(g, selector, Coloring::new()).expect("a freshly built selector never rejects an empty seed");

    let lower = clique_size.max(1);
    let upper = heuristic_k;

    if lower >= upper {
        return ExactOutcome::Optimal(upper, heuristic_colors);
    }

    let mut best = Some((upper, heuristic_colors));

    for k in lower..upper {
        if cancel.is_done() {
            return ExactOutcome::Cancelled {
                reason: cancel.reason().unwrap_or(CancelReason::Requested),
                best,
            };
        }
        match find_k_coloring(g, &id_at, &degree, k, &seed, cancel) {
            SearchOutcome::Found(colors_by_idx) => {
                let coloring: Coloring<G::NodeId> =
                    id_at.iter().copied().zip(colors_by_idx).collect();
                return ExactOutcome::Optimal(k, coloring);
            }
            SearchOutcome::NotFound => continue,
            SearchOutcome::Cancelled => {
                return ExactOutcome::Cancelled {
                    reason: cancel.reason().unwrap_or(CancelReason::Requested),
                    best,
                };
            }
        }
    }

    ExactOutcome::Optimal(upper, best.take().expect("heuristic result always available").1)
}
