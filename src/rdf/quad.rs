//! RDF statements (§3): an ordered (subject, predicate, object, label)
//! tuple of [`Term`]s, and the dataset they form.

use crate::rdf::term::Term;

/// One RDF statement. `label` is `None` for the default graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Quad {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
    pub label: Option<Term>,
}

impl Quad {
    pub fn new(subject: Term, predicate: Term, object: Term, label: Option<Term>) -> Self {
        Quad {
            subject,
            predicate,
            object,
            label,
        }
    }

    /// The N-Quads serialisation of this statement, per §6: `subject SP
    /// predicate SP object (SP label)? WS '.'`.
    pub fn to_nquads(&self) -> String {
        match &self.label {
            None => format!("{} {} {} .", self.subject.to_nquads(), self.predicate.to_nquads(), self.object.to_nquads()),
            Some(label) => format!(
                "{} {} {} {} .",
                self.subject.to_nquads(),
                self.predicate.to_nquads(),
                self.object.to_nquads(),
                label.to_nquads()
            ),
        }
    }

    /// The blank node labels this statement mentions, across subject,
    /// object, and graph label.
    pub fn blank_labels(&self) -> impl Iterator<Item = &str> {
        [
            self.subject.as_blank_label(),
            self.object.as_blank_label(),
            self.label.as_ref().and_then(Term::as_blank_label),
        ]
        .into_iter()
        .flatten()
    }
}

/// An unordered collection of statements (§3: "Graph (undirected
/// simple)"... here the RDF sense: a set of quads, not the coloring
/// graph).
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    quads: Vec<Quad>,
}

impl Dataset {
    pub fn new() -> Self {
        Dataset { quads: Vec::new() }
    }

    pub fn add(&mut self, quad: Quad) {
        self.quads.push(quad);
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    /// Whether any statement carries a non-default graph label. Leaning
    /// (§4.7) rejects such datasets.
    pub fn has_named_graphs(&self) -> bool {
        self.quads.iter().any(|q| q.label.is_some())
    }
}

impl FromIterator<Quad> for Dataset {
    fn from_iter<T: IntoIterator<Item = Quad>>(iter: T) -> Self {
        Dataset {
            quads: iter.into_iter().collect(),
        }
    }
}
