//! N-degree blank-node hashing (§4.6): the recursive procedure run for
//! blanks whose first-degree hash is shared by more than one node. Builds
//! a related-blank hash-to-set map, walks every permutation of each hash
//! class to construct a candidate path, and keeps the lexicographically
//! smallest one — the same permutation-search structure the leaning search
//! (§4.7) uses for candidate endomorphisms, just over label strings
//! instead of candidate sets.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use itertools::Itertools;

use crate::rdf::canon::hash_first_degree::hex_encode;
use crate::rdf::canon::issuer::IdentifierIssuer;
use crate::rdf::digest::CanonAlgorithm;
use crate::rdf::quad::Quad;
use crate::rdf::term::Term;

fn related_positions(quad: &Quad) -> Vec<(&Term, u8)> {
    let mut out = Vec::new();
    if quad.subject.is_blank() {
        out.push((&quad.subject, b's'));
    }
    if quad.object.is_blank() {
        out.push((&quad.object, b'o'));
    }
    if let Some(label) = &quad.label {
        if label.is_blank() {
            out.push((label, b'g'));
        }
    }
    out
}

fn hash_related_blank(
    algorithm: CanonAlgorithm,
    related: &str,
    predicate: &Term,
    position: u8,
    canonical_issuer: &IdentifierIssuer,
    issuer: &IdentifierIssuer,
    first_degree_cache: &HashMap<String, Vec<u8>>,
) -> Vec<u8> {
    let related_key = format!("_:{related}");
    let id = canonical_issuer
        .get(&related_key)
        .or_else(|| issuer.get(&related_key))
        .map(str::to_string)
        .unwrap_or_else(|| hex_encode(&first_degree_cache[&related_key]));

    let mut input = vec![position];
    input.extend_from_slice(predicate.to_nquads().as_bytes());
    input.extend_from_slice(id.as_bytes());
    algorithm.hash(&input)
}

/// Compute the n-degree hash of `identifier` and the issuer state produced
/// along the winning path, following the outline in §4.6.
pub fn hash_ndegree_quads(
    algorithm: CanonAlgorithm,
    identifier: &str,
    blank_to_quads: &HashMap<String, Vec<Quad>>,
    canonical_issuer: &IdentifierIssuer,
    issuer: &IdentifierIssuer,
    first_degree_cache: &HashMap<String, Vec<u8>>,
) -> (Vec<u8>, IdentifierIssuer) {
    let mut hash_to_related: BTreeMap<Vec<u8>, Vec<String>> = BTreeMap::new();

    let identifier_key = format!("_:{identifier}");
    if let Some(quads) = blank_to_quads.get(&identifier_key) {
        for quad in quads {
            for (term, position) in related_positions(quad) {
                let Term::Blank(label) = term else { continue };
                if label == identifier {
                    continue;
                }
                let h = hash_related_blank(
                    algorithm,
                    label,
                    &quad.predicate,
                    position,
                    canonical_issuer,
                    issuer,
                    first_degree_cache,
                );
                hash_to_related.entry(h).or_default().push(label.clone());
            }
        }
    }

    let mut data_to_hash = Vec::new();
    let mut chosen_issuer = issuer.clone();

    for (related_hash, mut related) in hash_to_related {
        related.sort();
        related.dedup();
        data_to_hash.extend_from_slice(&related_hash);

        let mut best_path: Option<String> = None;
        let mut best_issuer: Option<IdentifierIssuer> = None;
        let n = related.len();

        for perm in related.iter().cloned().permutations(n) {
            let mut issuer_copy = chosen_issuer.clone();
            let mut path = String::new();
            let mut recursion_list = Vec::new();

            for r in &perm {
                let r_key = format!("_:{r}");
                if let Some(c) = canonical_issuer.get(&r_key) {
                    path.push_str(c);
                } else {
                    if !issuer_copy.is_issued(&r_key) {
                        recursion_list.push(r.clone());
                    }
                    path.push_str(&issuer_copy.issue(&r_key));
                }
            }

            let mut pruned = false;
            for r in &recursion_list {
                let (sub_hash, sub_issuer) =
                    hash_ndegree_quads(algorithm, r, blank_to_quads, canonical_issuer, &issuer_copy, first_degree_cache);
                path.push('<');
                path.push_str(&hex_encode(&sub_hash));
                path.push('>');
                issuer_copy = sub_issuer;
                if let Some(bp) = &best_path {
                    if path.len() >= bp.len() && &path > bp {
                        pruned = true;
                        break;
                    }
                }
            }
            if pruned {
                continue;
            }

            let better = match &best_path {
                None => true,
                Some(bp) => &path < bp,
            };
            if better {
                best_path = Some(path);
                best_issuer = Some(issuer_copy);
            }
        }

        if let Some(bp) = best_path {
            data_to_hash.extend_from_slice(bp.as_bytes());
            chosen_issuer = best_issuer.expect("best_path implies best_issuer was recorded alongside it");
        }
    }

    let hash = algorithm.hash(&data_to_hash);
    (hash, chosen_issuer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::canon::hash_first_degree::hash_first_degree_quads;

    #[test]
    fn two_structurally_symmetric_blanks_get_distinguishable_paths() {
        // a -p-> b, a -p-> c: b and c are symmetric under automorphism, but
        // the n-degree procedure must still produce a deterministic
        // (lexicographically-smallest) path for each permutation.
        let q1 = Quad::new(Term::blank("a"), Term::iri("http://p"), Term::blank("b"), None);
        let q2 = Quad::new(Term::blank("a"), Term::iri("http://p"), Term::blank("c"), None);

        let mut blank_to_quads: HashMap<String, Vec<Quad>> = HashMap::new();
        blank_to_quads.insert("_:a".into(), vec![q1.clone(), q2.clone()]);
        blank_to_quads.insert("_:b".into(), vec![q1]);
        blank_to_quads.insert("_:c".into(), vec![q2]);

        let mut first_degree_cache = HashMap::new();
        for (label, quads) in &blank_to_quads {
            let refs: Vec<&Quad> = quads.iter().collect();
            let bare = label.trim_start_matches("_:");
            first_degree_cache.insert(label.clone(), hash_first_degree_quads(CanonAlgorithm::Urdna2015, bare, &refs));
        }

        let canonical_issuer = IdentifierIssuer::new("c14n");
        let issuer = IdentifierIssuer::new("b");
        let (hash_1, issuer_1) =
            hash_ndegree_quads(CanonAlgorithm::Urdna2015, "a", &blank_to_quads, &canonical_issuer, &issuer, &first_degree_cache);
        let (hash_2, issuer_2) =
            hash_ndegree_quads(CanonAlgorithm::Urdna2015, "a", &blank_to_quads, &canonical_issuer, &issuer, &first_degree_cache);

        assert_eq!(hash_1, hash_2);
        assert_eq!(issuer_1.len(), issuer_2.len());
    }
}
