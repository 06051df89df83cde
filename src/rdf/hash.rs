//! Blank-node hash refinement (§4.5): iterative colour-refinement by
//! neighbour multisets, the engine underlying both isomorphism hashing and
//! (via [`crate::rdf::canon`]) dataset canonicalisation.

use hashbrown::HashMap;

use crate::rdf::digest::Digest;
use crate::rdf::quad::Quad;
use crate::rdf::term::Term;

/// Result of running the refinement to a fixed point.
pub struct HashResult {
    /// Final hash for every term that appears in the input (blanks, IRIs,
    /// literals alike).
    pub hashes: HashMap<String, Vec<u8>>,
    /// `true` once every blank node has a hash unique to it.
    pub disjoint: bool,
}

fn term_key(term: &Term) -> String {
    term.to_nquads()
}

fn seed_hash<D: Digest>(term: &Term) -> Vec<u8> {
    match term {
        Term::Blank(_) => Vec::new(),
        Term::Iri(text) => D::digest(text.as_bytes()),
        Term::Literal { .. } => D::digest(term.to_nquads().as_bytes()),
    }
}

/// Run the refinement described in §4.5 to a fixed point (or until every
/// blank node has a unique hash, whichever comes first).
pub fn refine<D: Digest>(statements: &[Quad]) -> HashResult {
    refine_with_seed::<D>(statements, &HashMap::new())
}

/// Like [`refine`], but blanks named in `seed_overrides` start the
/// refinement at the given hash instead of the empty byte string — the
/// hook the distinguishing phase (§4.5) uses to perturb one blank's seed
/// and re-run the whole refinement.
fn refine_with_seed<D: Digest>(statements: &[Quad], seed_overrides: &HashMap<String, Vec<u8>>) -> HashResult {
    let mut curr: HashMap<String, Vec<u8>> = HashMap::new();
    let mut blanks: Vec<String> = Vec::new();

    for quad in statements {
        for term in [&quad.subject, &quad.predicate, &quad.object]
            .into_iter()
            .chain(quad.label.as_ref())
        {
            let key = term_key(term);
            curr.entry(key.clone()).or_insert_with(|| {
                seed_overrides.get(&key).cloned().unwrap_or_else(|| seed_hash::<D>(term))
            });
            if term.is_blank() && !blanks.contains(&key) {
                blanks.push(key);
            }
        }
    }

    if blanks.is_empty() {
        return HashResult {
            hashes: curr,
            disjoint: true,
        };
    }

    loop {
        let last = curr.clone();

        let mut bag: HashMap<String, Vec<Vec<u8>>> =
            blanks.iter().map(|b| (b.clone(), vec![last[b].clone()])).collect();

        for quad in statements {
            let s = term_key(&quad.subject);
            let p = term_key(&quad.predicate);
            let o = term_key(&quad.object);
            let l = quad.label.as_ref().map(term_key).unwrap_or_default();
            let l_hash = quad.label.as_ref().map_or_else(Vec::new, |t| last[&term_key(t)].clone());

            if quad.subject.is_blank() {
                let mut tuple = Vec::new();
                tuple.extend_from_slice(&last[&o]);
                tuple.extend_from_slice(&last[&p]);
                tuple.extend_from_slice(&l_hash);
                tuple.push(b'+');
                bag.get_mut(&s).expect("subject blank registered above").push(D::digest(&tuple));
            }
            if quad.object.is_blank() {
                let mut tuple = Vec::new();
                tuple.extend_from_slice(&last[&s]);
                tuple.extend_from_slice(&last[&p]);
                tuple.extend_from_slice(&l_hash);
                tuple.push(b'-');
                bag.get_mut(&o).expect("object blank registered above").push(D::digest(&tuple));
            }
            if quad.label.as_ref().is_some_and(Term::is_blank) {
                let mut tuple = Vec::new();
                tuple.extend_from_slice(&last[&s]);
                tuple.extend_from_slice(&last[&p]);
                tuple.extend_from_slice(&last[&o]);
                tuple.push(b'.');
                bag.get_mut(&l).expect("label blank registered above").push(D::digest(&tuple));
            }
        }

        for b in &blanks {
            let entries = bag.get_mut(b).expect("every blank has a bag entry");
            entries.sort();
            let mut concatenated = Vec::new();
            for entry in entries.iter() {
                concatenated.extend_from_slice(entry);
            }
            curr.insert(b.clone(), D::digest(&concatenated));
        }

        if partition_classes(&curr, &blanks).iter().all(|class| class.len() == 1) {
            return HashResult {
                hashes: curr,
                disjoint: true,
            };
        }
        if same_partition(&curr, &last, &blanks) {
            return HashResult {
                hashes: curr,
                disjoint: false,
            };
        }
    }
}

/// Group blank node keys by their current hash, sorted lexicographically
/// by hash so iteration order is deterministic (§5).
pub fn partition_classes(hashes: &HashMap<String, Vec<u8>>, blanks: &[String]) -> Vec<Vec<String>> {
    let mut by_hash: std::collections::BTreeMap<Vec<u8>, Vec<String>> = std::collections::BTreeMap::new();
    for b in blanks {
        by_hash.entry(hashes[b].clone()).or_default().push(b.clone());
    }
    for class in by_hash.values_mut() {
        class.sort();
    }
    by_hash.into_values().collect()
}

fn collect_blanks(statements: &[Quad]) -> Vec<String> {
    let mut seen = hashbrown::HashSet::new();
    let mut blanks = Vec::new();
    for quad in statements {
        for label in quad.blank_labels() {
            let key = format!("_:{label}");
            if seen.insert(key.clone()) {
                blanks.push(key);
            }
        }
    }
    blanks
}

/// Split `statements` into connected components on blank nodes (§4.5
/// "decomposition mode"): union-find over statements where subject and
/// object are both blank joins the two blanks directly; a statement with
/// exactly one blank endpoint stays with that blank's component; a
/// statement with no blank endpoint at all cannot affect any blank's hash
/// and is dropped (it contributes nothing to any bag).
fn split_components(statements: &[Quad]) -> Vec<Vec<Quad>> {
    let blanks = collect_blanks(statements);
    let index_of: HashMap<&str, usize> =
        blanks.iter().enumerate().map(|(i, b)| (b.as_str(), i)).collect();
    let mut uf = crate::unionfind::UnionFind::new(blanks.len());

    for quad in statements {
        if quad.subject.is_blank() && quad.object.is_blank() {
            let s = format!("_:{}", quad.subject.as_blank_label().expect("checked is_blank"));
            let o = format!("_:{}", quad.object.as_blank_label().expect("checked is_blank"));
            uf.union(index_of[s.as_str()], index_of[o.as_str()]);
        }
    }

    let mut by_component: std::collections::BTreeMap<usize, Vec<Quad>> = std::collections::BTreeMap::new();
    for quad in statements {
        let component = quad
            .blank_labels()
            .map(|label| uf.find(index_of[format!("_:{label}").as_str()]))
            .min();
        if let Some(c) = component {
            by_component.entry(c).or_default().push(quad.clone());
        }
    }
    by_component.into_values().collect()
}

/// Run the refinement independently on each blank-connected component of
/// `statements` (§4.5 decomposition mode), then merge the per-component
/// hashes. Components that are structurally isomorphic to one another are
/// deliberately left sharing identical hashes rather than perturbed apart
/// — that is the point of decomposition, not a bug in it.
pub fn refine_decomposed<D: Digest>(statements: &[Quad]) -> HashResult {
    let components = split_components(statements);
    let mut hashes: HashMap<String, Vec<u8>> = HashMap::new();
    let mut disjoint = true;

    for component in &components {
        let result = refine::<D>(component);
        disjoint &= result.disjoint;
        hashes.extend(result.hashes);
    }

    // Ground (non-blank) terms that never co-occur with a blank statement
    // still need a hash in the merged table.
    for quad in statements {
        for term in [&quad.subject, &quad.predicate, &quad.object].into_iter().chain(quad.label.as_ref()) {
            let key = term_key(term);
            hashes.entry(key).or_insert_with(|| seed_hash::<D>(term));
        }
    }

    HashResult { hashes, disjoint }
}

fn relabel_by_hash(statements: &[Quad], hashes: &HashMap<String, Vec<u8>>) -> Vec<Quad> {
    let relabel_term = |term: &Term| -> Term {
        match term {
            Term::Blank(label) => {
                let key = format!("_:{label}");
                Term::blank(crate::rdf::canon::hash_first_degree::hex_encode(&hashes[&key]))
            }
            other => other.clone(),
        }
    };
    let mut out: Vec<Quad> = statements
        .iter()
        .map(|q| {
            Quad::new(
                relabel_term(&q.subject),
                q.predicate.clone(),
                relabel_term(&q.object),
                q.label.as_ref().map(relabel_term),
            )
        })
        .collect();
    out.sort_by_key(Quad::to_nquads);
    out
}

/// Sentinel byte hashed into a perturbed blank's seed to break a
/// non-trivial partition class apart (§4.5 "distinguishing phase").
const DISTINGUISH_SENTINEL: u8 = 0xFF;

/// Distinguish a non-disjoint refinement to a canonical labelling (§4.5):
/// when [`refine`] stops short of every blank having a unique hash, perturb
/// one member of the smallest remaining non-trivial partition class, rerun
/// the refinement, recurse, and keep the lexicographically smallest
/// resulting statement list (statements relabeled by the new hashes, then
/// sorted) among every member tried.
///
/// If the "smallest non-trivial class" rule ever finds no non-trivial class
/// while the partition is still reported non-disjoint (which should not
/// happen, since non-disjoint implies at least one class has more than one
/// member), this falls back to any remaining non-trivial class rather than
/// panicking — the recovery path §9's design notes call out explicitly.
pub fn distinguish<D: Digest>(statements: &[Quad]) -> (HashResult, Vec<Quad>) {
    let result = refine::<D>(statements);
    distinguish_from::<D>(statements, result)
}

fn distinguish_from<D: Digest>(statements: &[Quad], result: HashResult) -> (HashResult, Vec<Quad>) {
    if result.disjoint {
        let relabeled = relabel_by_hash(statements, &result.hashes);
        return (result, relabeled);
    }

    let blanks = collect_blanks(statements);
    let mut classes = partition_classes(&result.hashes, &blanks);
    classes.sort_by_key(Vec::len);

    let chosen = classes
        .iter()
        .find(|c| c.len() > 1)
        .cloned()
        .unwrap_or_else(|| {
            tracing::debug!("distinguishing phase found no non-trivial class despite a non-disjoint partition");
            classes.into_iter().find(|c| c.len() > 1).unwrap_or_default()
        });

    if chosen.is_empty() {
        let relabeled = relabel_by_hash(statements, &result.hashes);
        return (result, relabeled);
    }

    let mut best: Option<(HashResult, Vec<Quad>)> = None;
    for member in &chosen {
        let mut seed = result.hashes.clone();
        let mut perturbed = seed[member].clone();
        perturbed.push(DISTINGUISH_SENTINEL);
        seed.insert(member.clone(), D::digest(&perturbed));

        let sub_result = refine_with_seed::<D>(statements, &seed);
        let candidate = distinguish_from::<D>(statements, sub_result);

        let better = match &best {
            None => true,
            Some((_, best_relabeled)) => candidate.1 < *best_relabeled,
        };
        if better {
            best = Some(candidate);
        }
    }
    best.expect("chosen is non-empty, so the loop runs at least once")
}

fn same_partition(curr: &HashMap<String, Vec<u8>>, last: &HashMap<String, Vec<u8>>, blanks: &[String]) -> bool {
    for a in blanks {
        for b in blanks {
            let curr_same = curr[a] == curr[b];
            let last_same = last[a] == last[b];
            if curr_same != last_same {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::digest::Sha256Digest;

    #[test]
    fn refinement_is_stable_across_repeated_runs() {
        let statements = vec![
            Quad::new(Term::blank("a"), Term::iri("http://p"), Term::blank("b"), None),
            Quad::new(Term::blank("b"), Term::iri("http://q"), Term::literal("v"), None),
        ];
        let first = refine::<Sha256Digest>(&statements);
        let second = refine::<Sha256Digest>(&statements);
        assert_eq!(first.hashes["_:a"], second.hashes["_:a"]);
        assert_eq!(first.hashes["_:b"], second.hashes["_:b"]);
    }

    #[test]
    fn structurally_distinct_blanks_separate() {
        // a has an outgoing edge to a literal-bearing node; c does not.
        let statements = vec![
            Quad::new(Term::blank("a"), Term::iri("http://p"), Term::blank("b"), None),
            Quad::new(Term::blank("b"), Term::iri("http://q"), Term::literal("v"), None),
            Quad::new(Term::blank("c"), Term::iri("http://r"), Term::literal("w"), None),
        ];
        let result = refine::<Sha256Digest>(&statements);
        assert_ne!(result.hashes["_:a"], result.hashes["_:c"]);
    }

    #[test]
    fn isomorphic_graphs_yield_the_same_sorted_hash_multiset() {
        let g = vec![
            Quad::new(Term::blank("a"), Term::iri("http://p"), Term::blank("b"), None),
            Quad::new(Term::blank("b"), Term::iri("http://q"), Term::literal("v"), None),
        ];
        let h = vec![
            Quad::new(Term::blank("x"), Term::iri("http://p"), Term::blank("y"), None),
            Quad::new(Term::blank("y"), Term::iri("http://q"), Term::literal("v"), None),
        ];
        let rg = refine::<Sha256Digest>(&g);
        let rh = refine::<Sha256Digest>(&h);
        assert!(rg.disjoint && rh.disjoint);
        let mut hg: Vec<&Vec<u8>> = rg.hashes.values().collect();
        let mut hh: Vec<&Vec<u8>> = rh.hashes.values().collect();
        hg.sort();
        hh.sort();
        assert_eq!(hg, hh);
    }

    #[test]
    fn decomposed_refinement_matches_plain_refinement_for_a_single_component() {
        let statements = vec![
            Quad::new(Term::blank("a"), Term::iri("http://p"), Term::blank("b"), None),
            Quad::new(Term::blank("b"), Term::iri("http://q"), Term::literal("v"), None),
        ];
        let plain = refine::<Sha256Digest>(&statements);
        let decomposed = refine_decomposed::<Sha256Digest>(&statements);
        assert_eq!(plain.hashes["_:a"], decomposed.hashes["_:a"]);
        assert_eq!(plain.hashes["_:b"], decomposed.hashes["_:b"]);
    }

    #[test]
    fn decomposed_refinement_leaves_isomorphic_components_sharing_a_hash() {
        // Two disjoint, structurally identical a-p->b chains: decomposition
        // must not distinguish them from one another.
        let statements = vec![
            Quad::new(Term::blank("a1"), Term::iri("http://p"), Term::blank("b1"), None),
            Quad::new(Term::blank("a2"), Term::iri("http://p"), Term::blank("b2"), None),
        ];
        let result = refine_decomposed::<Sha256Digest>(&statements);
        assert_eq!(result.hashes["_:a1"], result.hashes["_:a2"]);
        assert_eq!(result.hashes["_:b1"], result.hashes["_:b2"]);
        assert!(!result.disjoint);
    }

    #[test]
    fn distinguishing_phase_breaks_a_symmetric_pair_apart() {
        // a -p-> b, a -p-> c: b and c are indistinguishable by plain
        // refinement (both are "the object of a's only outgoing edge").
        let statements = vec![
            Quad::new(Term::blank("a"), Term::iri("http://p"), Term::blank("b"), None),
            Quad::new(Term::blank("a"), Term::iri("http://p"), Term::blank("c"), None),
        ];
        let plain = refine::<Sha256Digest>(&statements);
        assert!(!plain.disjoint, "b and c should start out sharing a hash");

        let (result, relabeled) = distinguish::<Sha256Digest>(&statements);
        assert!(result.disjoint);
        assert_ne!(result.hashes["_:b"], result.hashes["_:c"]);
        assert_eq!(relabeled.len(), statements.len());
    }

    #[test]
    fn distinguishing_phase_is_deterministic_across_repeated_runs() {
        let statements = vec![
            Quad::new(Term::blank("a"), Term::iri("http://p"), Term::blank("b"), None),
            Quad::new(Term::blank("a"), Term::iri("http://p"), Term::blank("c"), None),
        ];
        let (_, first) = distinguish::<Sha256Digest>(&statements);
        let (_, second) = distinguish::<Sha256Digest>(&statements);
        assert_eq!(first, second);
    }

    #[test]
    fn distinguishing_a_graph_that_is_already_disjoint_is_a_no_op() {
        let statements = vec![
            Quad::new(Term::blank("a"), Term::iri("http://p"), Term::blank("b"), None),
            Quad::new(Term::blank("b"), Term::iri("http://q"), Term::literal("v"), None),
        ];
        let plain = refine::<Sha256Digest>(&statements);
        let (distinguished, _) = distinguish::<Sha256Digest>(&statements);
        assert_eq!(plain.hashes["_:a"], distinguished.hashes["_:a"]);
        assert_eq!(plain.hashes["_:b"], distinguished.hashes["_:b"]);
    }
}
