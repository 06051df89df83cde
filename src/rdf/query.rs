//! The query layer (§4.8): set-algebraic traversal over a directed RDF
//! multigraph. A [`Query`] is an immutable value — every operation returns
//! a new one — holding a reference to the graph and the current set of
//! "current" terms (by UID, a stable index assigned the first time a term
//! is seen).

use std::rc::Rc;

use indexmap::IndexSet;

use crate::rdf::quad::{Dataset, Quad};
use crate::rdf::term::Term;

/// A directed RDF multigraph built once from a dataset, giving the query
/// layer O(1) term→uid lookups and sorted adjacency lists. A term's UID is
/// its insertion index into `terms` — the first time it's seen, exactly as
/// §3 specifies ("each unique term text may be assigned a stable 64-bit UID
/// within one decoder session"); `IndexSet` gives both directions of that
/// lookup (term → index, index → term) for free.
pub struct RdfGraph {
    quads: Vec<Quad>,
    terms: IndexSet<Term>,
}

impl RdfGraph {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut terms = IndexSet::new();
        let quads: Vec<Quad> = dataset.quads().to_vec();
        for q in &quads {
            terms.insert(q.subject.clone());
            terms.insert(q.predicate.clone());
            terms.insert(q.object.clone());
        }
        RdfGraph { quads, terms }
    }

    fn uid(&self, term: &Term) -> Option<usize> {
        self.terms.get_index_of(term)
    }

    pub fn term(&self, uid: usize) -> &Term {
        self.terms.get_index(uid).expect("uid was returned by a prior call to Self::uid")
    }
}

/// A predicate-edge filter: which statements `out`/`in` may traverse.
pub type PredicateFilter<'a> = dyn Fn(&Term) -> bool + 'a;

/// An immutable set of "current" terms over a graph, supporting the
/// combinators of §4.8.
#[derive(Clone)]
pub struct Query<'g> {
    graph: &'g RdfGraph,
    current: Rc<Vec<usize>>,
}

impl<'g> Query<'g> {
    pub fn start(graph: &'g RdfGraph, terms: impl IntoIterator<Item = Term>) -> Self {
        let mut uids: Vec<usize> = terms.into_iter().filter_map(|t| graph.uid(&t)).collect();
        uids.sort_unstable();
        uids.dedup();
        Query { graph, current: Rc::new(uids) }
    }

    fn same_graph(&self, other: &Query<'g>) -> bool {
        std::ptr::eq(self.graph, other.graph)
    }

    pub fn terms(&self) -> Vec<&Term> {
        self.current.iter().map(|&u| self.graph.term(u)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Traverse outgoing edges whose predicate passes `filter`.
    pub fn out(&self, filter: &PredicateFilter<'_>) -> Self {
        let mut next: Vec<usize> = self
            .current
            .iter()
            .flat_map(|&u| {
                let subject_text = self.graph.term(u).to_nquads();
                self.graph.quads.iter().filter(move |q| q.subject.to_nquads() == subject_text && filter(&q.predicate))
            })
            .filter_map(|q| self.graph.uid(&q.object))
            .collect();
        next.sort_unstable();
        next.dedup();
        Query { graph: self.graph, current: Rc::new(next) }
    }

    /// Traverse incoming edges whose predicate passes `filter`.
    pub fn r#in(&self, filter: &PredicateFilter<'_>) -> Self {
        let mut next: Vec<usize> = self
            .current
            .iter()
            .flat_map(|&u| {
                let object_text = self.graph.term(u).to_nquads();
                self.graph.quads.iter().filter(move |q| q.object.to_nquads() == object_text && filter(&q.predicate))
            })
            .filter_map(|q| self.graph.uid(&q.subject))
            .collect();
        next.sort_unstable();
        next.dedup();
        Query { graph: self.graph, current: Rc::new(next) }
    }

    fn outgoing_matches(&self, uid: usize, filter: &PredicateFilter<'_>) -> impl Iterator<Item = &Quad> + '_ {
        let subject_text = self.graph.term(uid).to_nquads();
        self.graph.quads.iter().filter(move |q| q.subject.to_nquads() == subject_text && filter(&q.predicate))
    }

    fn incoming_matches(&self, uid: usize, filter: &PredicateFilter<'_>) -> impl Iterator<Item = &Quad> + '_ {
        let object_text = self.graph.term(uid).to_nquads();
        self.graph.quads.iter().filter(move |q| q.object.to_nquads() == object_text && filter(&q.predicate))
    }

    /// Restrict to terms where every matching outgoing edge satisfies
    /// `pred` — vacuously true if there are no matching edges.
    pub fn has_all_out(&self, filter: &PredicateFilter<'_>, pred: impl Fn(&Quad) -> bool) -> Self {
        self.filter_terms(|q, uid| q.outgoing_matches(uid, filter).all(|quad| pred(quad)))
    }

    /// Restrict to terms where at least one matching outgoing edge
    /// satisfies `pred`.
    pub fn has_any_out(&self, filter: &PredicateFilter<'_>, pred: impl Fn(&Quad) -> bool) -> Self {
        self.filter_terms(|q, uid| q.outgoing_matches(uid, filter).any(|quad| pred(quad)))
    }

    pub fn has_all_in(&self, filter: &PredicateFilter<'_>, pred: impl Fn(&Quad) -> bool) -> Self {
        self.filter_terms(|q, uid| q.incoming_matches(uid, filter).all(|quad| pred(quad)))
    }

    pub fn has_any_in(&self, filter: &PredicateFilter<'_>, pred: impl Fn(&Quad) -> bool) -> Self {
        self.filter_terms(|q, uid| q.incoming_matches(uid, filter).any(|quad| pred(quad)))
    }

    fn filter_terms(&self, keep: impl Fn(&Self, usize) -> bool) -> Self {
        let kept: Vec<usize> = self.current.iter().copied().filter(|&u| keep(self, u)).collect();
        Query { graph: self.graph, current: Rc::new(kept) }
    }

    /// Set union by UID (sort-merge), panicking if `other` is over a
    /// different graph.
    pub fn or(&self, other: &Self) -> Self {
        assert!(self.same_graph(other), "and/or/not require both operands to reference the same graph");
        let mut merged: Vec<usize> = self.current.iter().chain(other.current.iter()).copied().collect();
        merged.sort_unstable();
        merged.dedup();
        Query { graph: self.graph, current: Rc::new(merged) }
    }

    pub fn and(&self, other: &Self) -> Self {
        assert!(self.same_graph(other), "and/or/not require both operands to reference the same graph");
        let other_set: hashbrown::HashSet<usize> = other.current.iter().copied().collect();
        let kept: Vec<usize> = self.current.iter().copied().filter(|u| other_set.contains(u)).collect();
        Query { graph: self.graph, current: Rc::new(kept) }
    }

    pub fn not(&self, other: &Self) -> Self {
        assert!(self.same_graph(other), "and/or/not require both operands to reference the same graph");
        let other_set: hashbrown::HashSet<usize> = other.current.iter().copied().collect();
        let kept: Vec<usize> = self.current.iter().copied().filter(|u| !other_set.contains(u)).collect();
        Query { graph: self.graph, current: Rc::new(kept) }
    }

    /// Deduplicate by UID (a no-op here since every combinator already
    /// keeps `current` sorted and deduplicated; kept for interface parity
    /// with §4.8).
    pub fn unique(&self) -> Self {
        self.clone()
    }

    /// Apply `f` repeatedly until it signals no further change or the set
    /// becomes empty.
    pub fn repeat(&self, f: impl Fn(&Self) -> (Self, bool)) -> Self {
        let mut current = self.clone();
        loop {
            if current.is_empty() {
                return current;
            }
            let (next, keep_going) = f(&current);
            if !keep_going {
                return next;
            }
            current = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(t: &str) -> Term {
        Term::iri(t)
    }

    #[test]
    fn out_follows_a_named_predicate() {
        let mut ds = Dataset::new();
        ds.add(Quad::new(iri("http://a"), iri("http://knows"), iri("http://b"), None));
        ds.add(Quad::new(iri("http://b"), iri("http://knows"), iri("http://c"), None));
        let g = RdfGraph::from_dataset(&ds);

        let q = Query::start(&g, [iri("http://a")]);
        let knows = |p: &Term| *p == iri("http://knows");
        let one_hop = q.out(&knows);
        assert_eq!(one_hop.terms(), vec![&iri("http://b")]);

        let two_hop = q.repeat(|cur| {
            let next = cur.out(&knows);
            let changed = !next.is_empty();
            (cur.or(&next), changed && next.terms() != cur.terms())
        });
        let mut reached: Vec<String> = two_hop.terms().iter().map(|t| t.to_nquads()).collect();
        reached.sort();
        assert_eq!(reached, vec!["<http://a>".to_string(), "<http://b>".to_string(), "<http://c>".to_string()]);
    }

    #[test]
    fn and_or_not_combine_by_uid() {
        let mut ds = Dataset::new();
        ds.add(Quad::new(iri("http://a"), iri("http://p"), iri("http://x"), None));
        ds.add(Quad::new(iri("http://a"), iri("http://q"), iri("http://y"), None));
        let g = RdfGraph::from_dataset(&ds);

        let all = |_: &Term| true;
        let start = Query::start(&g, [iri("http://a")]);
        let xs = start.out(&all);
        let left = Query::start(&g, [iri("http://x"), iri("http://y")]);
        let right = Query::start(&g, [iri("http://x")]);

        assert_eq!(left.and(&right).terms(), vec![&iri("http://x")]);
        assert_eq!(left.not(&right).terms(), vec![&iri("http://y")]);
        let _ = xs;
    }
}
