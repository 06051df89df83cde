//! URDNA2015 / URGNA2012 dataset canonicalisation (§4.6).
//!
//! Grounded on the structure of a production RDFC-1.0 implementation: a
//! simple first-degree refinement loop that peels off any blank whose hash
//! is already unique, followed by an n-degree phase for the rest.

pub mod hash_first_degree;
pub mod hash_ndegree;
pub mod issuer;

use std::collections::BTreeMap;

use hashbrown::HashMap;

use crate::rdf::canon::hash_first_degree::{hash_first_degree_quads, hex_encode};
use crate::rdf::canon::hash_ndegree::hash_ndegree_quads;
use crate::rdf::canon::issuer::IdentifierIssuer;
use crate::rdf::digest::CanonAlgorithm;
use crate::rdf::nquads;
use crate::rdf::quad::{Dataset, Quad};
use crate::rdf::term::Term;

fn blank_key(label: &str) -> String {
    format!("_:{label}")
}

fn blank_to_quads(quads: &[Quad]) -> HashMap<String, Vec<Quad>> {
    let mut map: HashMap<String, Vec<Quad>> = HashMap::new();
    for quad in quads {
        for label in quad.blank_labels() {
            map.entry(blank_key(label)).or_default().push(quad.clone());
        }
    }
    map
}

fn relabel_term(term: &Term, issuer: &IdentifierIssuer) -> Term {
    match term {
        Term::Blank(label) => {
            let key = blank_key(label);
            match issuer.get(&key) {
                Some(canonical) => Term::Blank(canonical.trim_start_matches("_:").to_string()),
                None => term.clone(),
            }
        }
        other => other.clone(),
    }
}

fn relabel_quad(quad: &Quad, issuer: &IdentifierIssuer) -> Quad {
    Quad::new(
        relabel_term(&quad.subject, issuer),
        quad.predicate.clone(),
        relabel_term(&quad.object, issuer),
        quad.label.as_ref().map(|l| relabel_term(l, issuer)),
    )
}

/// Canonicalise `dataset` under `algorithm` and return the canonical
/// N-Quads text (§4.6 step 4: "Relabel every statement by the canonical
/// issuer and sort lexicographically").
pub fn canonicalize(algorithm: CanonAlgorithm, dataset: &Dataset) -> String {
    let quads = dataset.quads();
    let by_blank = blank_to_quads(quads);

    if by_blank.is_empty() {
        return nquads::serialize_dataset(quads);
    }

    let mut first_degree_cache: HashMap<String, Vec<u8>> = HashMap::new();
    let mut hash_to_blanks: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (label, mentions) in &by_blank {
        let bare = label.trim_start_matches("_:");
        let refs: Vec<&Quad> = mentions.iter().collect();
        let hash = hash_first_degree_quads(algorithm, bare, &refs);
        let hex = hex_encode(&hash);
        first_degree_cache.insert(label.clone(), hash);
        hash_to_blanks.entry(hex).or_default().push(label.clone());
    }

    let mut canonical_issuer = IdentifierIssuer::new(algorithm.issuer_prefix());

    for (hash, labels) in &hash_to_blanks {
        if labels.len() == 1 {
            tracing::debug!(hash = %hash, blank = %labels[0], "unique first-degree hash");
            canonical_issuer.issue(&labels[0]);
        }
    }

    for labels in hash_to_blanks.values() {
        if labels.len() <= 1 {
            continue;
        }

        let mut hash_path_list: Vec<(Vec<u8>, IdentifierIssuer)> = Vec::new();
        for label in labels {
            if canonical_issuer.is_issued(label) {
                continue;
            }
            let bare = label.trim_start_matches("_:");
            let mut local_issuer = IdentifierIssuer::new("b");
            local_issuer.issue(label);
            let (hash, result_issuer) = hash_ndegree_quads(
                algorithm,
                bare,
                &by_blank,
                &canonical_issuer,
                &local_issuer,
                &first_degree_cache,
            );
            hash_path_list.push((hash, result_issuer));
        }
        hash_path_list.sort_by(|a, b| a.0.cmp(&b.0));
        for (_, result_issuer) in hash_path_list {
            for label in result_issuer.issued_order() {
                canonical_issuer.issue(label);
            }
        }
    }

    let relabeled: Vec<Quad> = quads.iter().map(|q| relabel_quad(q, &canonical_issuer)).collect();
    let mut lines: Vec<String> = relabeled.iter().map(|q| q.to_nquads()).collect();
    lines.sort();
    let mut out = String::new();
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Canonicalise and hash the result with `algorithm`'s digest.
pub fn canonicalize_and_hash(algorithm: CanonAlgorithm, dataset: &Dataset) -> Vec<u8> {
    algorithm.hash(canonicalize(algorithm, dataset).as_bytes())
}

pub fn canonicalize_and_hash_hex(algorithm: CanonAlgorithm, dataset: &Dataset) -> String {
    hex_encode(&canonicalize_and_hash(algorithm, dataset))
}
