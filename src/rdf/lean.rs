//! Graph leaning (§4.7): reduce an RDF graph to one of its cores by finding
//! a substitution that maps blank nodes onto other terms (blank or ground)
//! while preserving every statement, then applying it and deduplicating.
//!
//! Simplifications relative to the full W3C core-computation literature,
//! recorded here rather than in `DESIGN.md` since they're local to this
//! module: candidate pruning runs to a fixed point before any search, and
//! the endomorphism search tries query statements in the order they were
//! collected rather than re-deriving a selectivity estimate after every
//! extension. Both are conservative — they can make the search slower, not
//! incorrect — and are easy to tighten later if a pathological input needs
//! it.

use hashbrown::{HashMap, HashSet};

use crate::rdf::error::LeanError;
use crate::rdf::quad::{Dataset, Quad};
use crate::rdf::term::Term;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Direction {
    Out,
    In,
}

fn term_text(term: &Term) -> String {
    term.to_nquads()
}

/// The (predicate, other-endpoint, direction) multiset identifying a
/// term's edges, used both for redundant-blank removal and to order blank
/// nodes stably when comparing multisets of equal size.
fn signature(term_text_value: &str, quads: &[Quad]) -> Vec<(String, String, Direction)> {
    let mut sig = Vec::new();
    for q in quads {
        let s = term_text(&q.subject);
        let o = term_text(&q.object);
        let p = term_text(&q.predicate);
        if s == term_text_value {
            sig.push((p.clone(), o.clone(), Direction::Out));
        }
        if o == term_text_value {
            sig.push((p, s, Direction::In));
        }
    }
    sig.sort();
    sig
}

fn is_proper_submultiset(a: &[(String, String, Direction)], b: &[(String, String, Direction)]) -> bool {
    if a.len() >= b.len() {
        return false;
    }
    let mut b_remaining = b.to_vec();
    for item in a {
        match b_remaining.iter().position(|x| x == item) {
            Some(idx) => {
                b_remaining.remove(idx);
            }
            None => return false,
        }
    }
    true
}

/// Remove redundant blank nodes (§4.7 step 2) to a fixed point.
fn remove_redundant_blanks(quads: &mut Vec<Quad>) {
    loop {
        let blanks: Vec<String> = {
            let mut seen = HashSet::new();
            let mut order = Vec::new();
            for q in quads.iter() {
                for label in q.blank_labels() {
                    if seen.insert(label.to_string()) {
                        order.push(label.to_string());
                    }
                }
            }
            order
        };
        if blanks.is_empty() {
            return;
        }

        let terms: Vec<String> = {
            let mut seen = HashSet::new();
            let mut order = Vec::new();
            for q in quads.iter() {
                for t in [&q.subject, &q.object] {
                    let text = term_text(t);
                    if seen.insert(text.clone()) {
                        order.push(text);
                    }
                }
            }
            order
        };

        let mut redundant = None;
        'search: for (bi, b) in blanks.iter().enumerate() {
            let b_key = format!("_:{b}");
            let b_sig = signature(&b_key, quads);
            for (xi, x) in terms.iter().enumerate() {
                if *x == b_key {
                    continue;
                }
                let x_sig = signature(x, quads);
                let dominates = is_proper_submultiset(&b_sig, &x_sig)
                    || (b_sig.len() == x_sig.len() && b_sig == x_sig && xi < bi);
                if dominates {
                    redundant = Some(b_key.clone());
                    break 'search;
                }
            }
        }

        match redundant {
            Some(b) => quads.retain(|q| term_text(&q.subject) != b && term_text(&q.object) != b),
            None => return,
        }
    }
}

struct Pruner<'a> {
    quads: &'a [Quad],
    all_terms: Vec<String>,
}

impl<'a> Pruner<'a> {
    fn new(quads: &'a [Quad]) -> Self {
        let mut seen = HashSet::new();
        let mut all_terms = Vec::new();
        for q in quads {
            for t in [&q.subject, &q.predicate, &q.object] {
                let text = term_text(t);
                if seen.insert(text.clone()) {
                    all_terms.push(text);
                }
            }
        }
        Pruner { quads, all_terms }
    }

    fn has_statement(&self, s: &str, p: &str, o: &str) -> bool {
        self.quads
            .iter()
            .any(|q| term_text(&q.subject) == s && term_text(&q.predicate) == p && term_text(&q.object) == o)
    }

    /// Prune candidate sets to a fixed point (§4.7 step 3).
    fn candidates(&self, blanks: &[String]) -> HashMap<String, HashSet<String>> {
        let mut cands: HashMap<String, HashSet<String>> =
            blanks.iter().map(|b| (b.clone(), self.all_terms.iter().cloned().collect())).collect();

        let is_fixed =
            |cands: &HashMap<String, HashSet<String>>, key: &str| match cands.get(key) {
                Some(set) => set.len() == 1 && set.contains(key),
                None => true, // not a blank at all: a ground term is always "fixed"
            };

        loop {
            let mut changed = false;
            for q in self.quads {
                let s_text = term_text(&q.subject);
                let o_text = term_text(&q.object);
                let p_text = term_text(&q.predicate);

                if let Some(b) = q.subject.as_blank_label() {
                    let b_key = format!("_:{b}");
                    if is_fixed(&cands, &o_text) {
                        let before = cands[&b_key].len();
                        cands.get_mut(&b_key).unwrap().retain(|x| self.has_statement(x, &p_text, &o_text));
                        if cands[&b_key].len() != before {
                            changed = true;
                        }
                    }
                }
                if let Some(b) = q.object.as_blank_label() {
                    let b_key = format!("_:{b}");
                    if is_fixed(&cands, &s_text) {
                        let before = cands[&b_key].len();
                        cands.get_mut(&b_key).unwrap().retain(|x| self.has_statement(&s_text, &p_text, x));
                        if cands[&b_key].len() != before {
                            changed = true;
                        }
                    }
                }
            }
            if !changed {
                return cands;
            }
        }
    }
}

fn is_automorphic(mapping: &HashMap<String, String>) -> bool {
    let domain: HashSet<&String> = mapping.keys().collect();
    let codomain: HashSet<&String> = mapping.values().collect();
    domain == codomain
}

fn apply_and_dedup(quads: &[Quad], mapping: &HashMap<String, String>) -> Vec<Quad> {
    let map_term = |t: &Term| -> Term {
        if let Term::Blank(label) = t {
            let key = format!("_:{label}");
            if let Some(target) = mapping.get(&key) {
                return parse_mapped_term(target);
            }
        }
        t.clone()
    };

    let mut out: Vec<Quad> = quads
        .iter()
        .map(|q| Quad::new(map_term(&q.subject), q.predicate.clone(), map_term(&q.object), q.label.clone()))
        .collect();
    out.sort();
    out.dedup();
    out
}

fn parse_mapped_term(text: &str) -> Term {
    if let Some(label) = text.strip_prefix("_:") {
        Term::blank(label)
    } else if let Some(iri) = text.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        Term::iri(iri)
    } else {
        Term::literal(text)
    }
}

/// Compute a core of `dataset` (§4.7). Returns the leaned dataset and, if
/// the input carried any non-default graph labels, an error describing
/// that they were ignored (the computed result is still meaningful and is
/// returned regardless).
pub fn lean(dataset: &Dataset) -> (Dataset, Option<LeanError>) {
    let warning = if dataset.has_named_graphs() {
        Some(LeanError::GraphLabelsUnsupported {
            statement_count: dataset.quads().iter().filter(|q| q.label.is_some()).count(),
        })
    } else {
        None
    };

    let mut quads: Vec<Quad> = dataset.quads().to_vec();
    let has_blanks = quads.iter().any(|q| q.blank_labels().next().is_some());
    if !has_blanks {
        return (dataset.clone(), warning);
    }

    remove_redundant_blanks(&mut quads);

    let blanks: Vec<String> = {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        for q in &quads {
            for label in q.blank_labels() {
                if seen.insert(label.to_string()) {
                    order.push(label.to_string());
                }
            }
        }
        order
    };

    let pruner = Pruner::new(&quads);
    let cands = pruner.candidates(&blanks);

    let fixed: HashSet<String> = blanks
        .iter()
        .filter(|b| {
            let key = format!("_:{b}");
            cands[&key].len() == 1 && cands[&key].contains(&key)
        })
        .map(|b| format!("_:{b}"))
        .collect();

    if fixed.len() == blanks.len() {
        return (Dataset::from_iter(quads), warning);
    }

    // Blank-blank statements to join on, per §4.7 step 4, ordered by a
    // selectivity estimate (smaller candidate-product first).
    let mut queries: Vec<&Quad> = quads
        .iter()
        .filter(|q| q.subject.is_blank() && q.object.is_blank())
        .collect();
    queries.sort_by_key(|q| {
        let s = format!("_:{}", q.subject.as_blank_label().unwrap());
        let o = format!("_:{}", q.object.as_blank_label().unwrap());
        cands[&s].len() * cands[&o].len()
    });

    let mut mapping: HashMap<String, String> = fixed.iter().map(|b| (b.clone(), b.clone())).collect();
    if search(&queries, 0, &mut mapping, &cands, &pruner) {
        let leaned = apply_and_dedup(&quads, &mapping);
        (Dataset::from_iter(leaned), warning)
    } else {
        (Dataset::from_iter(quads), warning)
    }
}

fn search(
    queries: &[&Quad],
    idx: usize,
    mapping: &mut HashMap<String, String>,
    cands: &HashMap<String, HashSet<String>>,
    pruner: &Pruner<'_>,
) -> bool {
    if idx == queries.len() {
        return !is_automorphic(mapping);
    }

    let q = queries[idx];
    let s_key = format!("_:{}", q.subject.as_blank_label().expect("query statements have a blank subject"));
    let o_key = format!("_:{}", q.object.as_blank_label().expect("query statements have a blank object"));
    let p_text = term_text(&q.predicate);

    let s_options: Vec<String> = match mapping.get(&s_key) {
        Some(fixed) => vec![fixed.clone()],
        None => {
            let mut v: Vec<String> = cands[&s_key].iter().cloned().collect();
            v.sort();
            v
        }
    };

    for s_choice in s_options {
        let o_options: Vec<String> = match mapping.get(&o_key) {
            Some(fixed) => vec![fixed.clone()],
            None => {
                let mut v: Vec<String> = cands[&o_key].iter().cloned().collect();
                v.sort_by_key(|o| (cands.get(o).map_or(1, HashSet::len), o.clone()));
                v
            }
        };

        for o_choice in o_options {
            if !pruner.has_statement(&s_choice, &p_text, &o_choice) {
                continue;
            }
            let inserted_s = mapping.insert(s_key.clone(), s_choice.clone()).is_none();
            let inserted_o = mapping.insert(o_key.clone(), o_choice.clone()).is_none();

            if search(queries, idx + 1, mapping, cands, pruner) {
                return true;
            }

            if inserted_s {
                mapping.remove(&s_key);
            }
            if inserted_o {
                mapping.remove(&o_key);
            }
        }
    }

    false
}
