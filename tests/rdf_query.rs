use graphcanon::rdf::{Dataset, Quad, RdfGraph, Term};
use graphcanon::rdf::query::Query;

fn iri(t: &str) -> Term {
    Term::iri(t)
}

/// §4.8 scenario: a `repeat` traversal over a `knows` chain reaches every
/// node transitively connected, and stops growing once the set is a fixed
/// point.
#[test]
fn repeat_reaches_the_full_transitive_closure_of_a_chain() {
    let mut ds = Dataset::new();
    ds.add(Quad::new(iri("http://a"), iri("http://knows"), iri("http://b"), None));
    ds.add(Quad::new(iri("http://b"), iri("http://knows"), iri("http://c"), None));
    ds.add(Quad::new(iri("http://c"), iri("http://knows"), iri("http://d"), None));
    // an unrelated edge that must not be reached from "a"
    ds.add(Quad::new(iri("http://x"), iri("http://knows"), iri("http://y"), None));

    let g = RdfGraph::from_dataset(&ds);
    let knows = |p: &Term| *p == iri("http://knows");

    let start = Query::start(&g, [iri("http://a")]);
    let reached = start.repeat(|cur| {
        let next = cur.out(&knows);
        let merged = cur.or(&next);
        let grew = merged.terms().len() != cur.terms().len();
        (merged, grew)
    });

    let mut texts: Vec<String> = reached.terms().iter().map(|t| t.to_nquads()).collect();
    texts.sort();
    assert_eq!(
        texts,
        vec!["<http://a>".to_string(), "<http://b>".to_string(), "<http://c>".to_string(), "<http://d>".to_string()]
    );
}

/// §4.8 scenario: `hasAllOut`/`hasAnyOut` restrict a set by a predicate on
/// each member's outgoing edges.
#[test]
fn has_all_out_restricts_to_terms_where_every_matching_edge_satisfies_the_predicate() {
    let mut ds = Dataset::new();
    // "alice" knows only people who are "admin"
    ds.add(Quad::new(iri("http://alice"), iri("http://knows"), iri("http://bob"), None));
    ds.add(Quad::new(iri("http://bob"), iri("http://role"), iri("http://admin"), None));
    // "carol" knows someone who is not an admin
    ds.add(Quad::new(iri("http://carol"), iri("http://knows"), iri("http://dave"), None));
    ds.add(Quad::new(iri("http://dave"), iri("http://role"), iri("http://user"), None));

    let g = RdfGraph::from_dataset(&ds);
    let knows = |p: &Term| *p == iri("http://knows");
    let role = |p: &Term| *p == iri("http://role");

    let people = Query::start(&g, [iri("http://alice"), iri("http://carol")]);
    let knows_only_admins = people.has_all_out(&knows, |quad| {
        let friend = Query::start(&g, [quad.object.clone()]);
        let admin_role = friend.has_any_out(&role, |r| r.object == iri("http://admin"));
        !admin_role.is_empty()
    });

    assert_eq!(knows_only_admins.terms(), vec![&iri("http://alice")]);
}

/// `unique` is idempotent: calling it again never changes an already
/// deduplicated set.
#[test]
fn unique_is_idempotent() {
    let mut ds = Dataset::new();
    ds.add(Quad::new(iri("http://a"), iri("http://p"), iri("http://x"), None));
    let g = RdfGraph::from_dataset(&ds);
    let q = Query::start(&g, [iri("http://a"), iri("http://a")]);
    assert_eq!(q.terms().len(), 1);
    assert_eq!(q.unique().terms(), q.terms());
}
