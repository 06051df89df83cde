//! First-degree blank-node hashing (§4.6): "Gather every statement
//! mentioning b, construct a canonicalised copy by replacing occurrences
//! of b with the sentinel `_:a` and every other blank with `_:z`
//! (URGNA2012 replaces graph-label blanks with a third sentinel `_:g`),
//! sort lexicographically, hash the concatenation."

use crate::rdf::digest::CanonAlgorithm;
use crate::rdf::quad::Quad;
use crate::rdf::term::Term;

fn sentinel_for(algorithm: CanonAlgorithm, b: &str, label: &str, in_graph_label_position: bool) -> Term {
    if label == b {
        Term::blank("a")
    } else if algorithm == CanonAlgorithm::Urgna2012 && in_graph_label_position {
        Term::blank("g")
    } else {
        Term::blank("z")
    }
}

fn canonicalize_term(algorithm: CanonAlgorithm, b: &str, term: &Term, in_graph_label_position: bool) -> Term {
    match term {
        Term::Blank(label) => sentinel_for(algorithm, b, label, in_graph_label_position),
        other => other.clone(),
    }
}

fn canonicalize_quad(algorithm: CanonAlgorithm, b: &str, quad: &Quad) -> Quad {
    let subject = canonicalize_term(algorithm, b, &quad.subject, false);
    let object = canonicalize_term(algorithm, b, &quad.object, false);
    let label = quad.label.as_ref().map(|l| canonicalize_term(algorithm, b, l, true));
    Quad::new(subject, quad.predicate.clone(), object, label)
}

/// Compute the first-degree hash of blank node `b` given all statements
/// that mention it.
pub fn hash_first_degree_quads(algorithm: CanonAlgorithm, b: &str, statements: &[&Quad]) -> Vec<u8> {
    let mut lines: Vec<String> = statements
        .iter()
        .map(|q| canonicalize_quad(algorithm, b, q).to_nquads())
        .collect();
    lines.sort();
    algorithm.hash(lines.join("\n").as_bytes())
}

pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_the_subject_blank_and_other_blanks_differently() {
        let q = Quad::new(Term::blank("a"), Term::iri("http://p"), Term::blank("b"), None);
        let canon = canonicalize_quad(CanonAlgorithm::Urdna2015, "a", &q);
        assert_eq!(canon.subject, Term::blank("a"));
        assert_eq!(canon.object, Term::blank("z"));
    }

    #[test]
    fn is_independent_of_input_statement_order() {
        let q1 = Quad::new(Term::blank("a"), Term::iri("http://p"), Term::literal("1"), None);
        let q2 = Quad::new(Term::blank("a"), Term::iri("http://q"), Term::literal("2"), None);
        let h1 = hash_first_degree_quads(CanonAlgorithm::Urdna2015, "a", &[&q1, &q2]);
        let h2 = hash_first_degree_quads(CanonAlgorithm::Urdna2015, "a", &[&q2, &q1]);
        assert_eq!(h1, h2);
    }
}
