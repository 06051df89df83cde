//! RDF terms (§3): a tagged value of kind IRI / Blank / Literal, each
//! carrying its text and, for literals, an optional language tag or
//! datatype IRI. Equality and ordering between terms compare text only,
//! exactly as statement equality is defined to in §3 ("equality of
//! statements ignores UIDs and uses term text").

use std::cmp::Ordering;
use std::fmt;

/// A literal's optional qualifier: a language tag or a datatype IRI. At
/// most one may be present, matching N-Quads' `@lang` / `^^<iri>` syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralQualifier {
    Language(String),
    Datatype(String),
}

/// An RDF term: an IRI, a blank node, or a literal.
#[derive(Debug, Clone, Eq)]
pub enum Term {
    Iri(String),
    Blank(String),
    Literal {
        value: String,
        qualifier: Option<LiteralQualifier>,
    },
}

impl Term {
    pub fn iri(text: impl Into<String>) -> Self {
        Term::Iri(text.into())
    }

    pub fn blank(label: impl Into<String>) -> Self {
        Term::Blank(label.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            qualifier: None,
        }
    }

    pub fn literal_with_language(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            qualifier: Some(LiteralQualifier::Language(lang.into())),
        }
    }

    pub fn literal_with_datatype(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            qualifier: Some(LiteralQualifier::Datatype(datatype.into())),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    /// The blank node label, if this is a blank node.
    pub fn as_blank_label(&self) -> Option<&str> {
        match self {
            Term::Blank(label) => Some(label),
            _ => None,
        }
    }

    /// The N-Quads serialisation of this term, as defined in §6.
    pub fn to_nquads(&self) -> String {
        match self {
            Term::Iri(text) => format!("<{text}>"),
            Term::Blank(label) => format!("_:{label}"),
            Term::Literal { value, qualifier } => {
                let escaped = escape_literal(value);
                match qualifier {
                    None => format!("\"{escaped}\""),
                    Some(LiteralQualifier::Language(lang)) => format!("\"{escaped}\"@{lang}"),
                    Some(LiteralQualifier::Datatype(dt)) => format!("\"{escaped}\"^^<{dt}>"),
                }
            }
        }
    }
}

fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{c}' => out.push_str("\\f"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.to_nquads() == other.to_nquads()
    }
}

impl std::hash::Hash for Term {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.to_nquads().hash(state);
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_nquads().cmp(&other.to_nquads())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_nquads())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_everything_but_text() {
        assert_eq!(Term::iri("http://example.org/s"), Term::iri("http://example.org/s"));
        assert_ne!(Term::blank("a"), Term::blank("b"));
    }

    #[test]
    fn literal_escapes_control_characters() {
        let t = Term::literal("line one\nline two\t\"quoted\"");
        assert_eq!(t.to_nquads(), "\"line one\\nline two\\t\\\"quoted\\\"\"");
    }

    #[test]
    fn ordering_is_lexicographic_on_nquads_text() {
        let mut terms = vec![Term::iri("http://b"), Term::blank("a"), Term::iri("http://a")];
        terms.sort();
        assert_eq!(terms[0].to_nquads(), "<http://a>");
    }
}
