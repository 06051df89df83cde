//! N-Quads reader and writer (§6).
//!
//! Line-oriented: one statement per non-empty, non-comment line, `#`
//! introduces a line comment. A statement is `subject SP predicate SP
//! object (SP label)? WS '.'  WS?`. This reader is a tokeniser over a
//! single line rather than a full parser combinator pipeline — the format
//! has no statement that spans multiple lines, so there is nothing for a
//! lower layer to stream incrementally.

use crate::rdf::error::NquadsError;
use crate::rdf::quad::{Dataset, Quad};
use crate::rdf::term::Term;

/// Parse a full N-Quads document into a [`Dataset`]. Blank lines and
/// comment-only lines are skipped silently, per §7's propagation policy.
pub fn parse_dataset(input: &str) -> Result<Dataset, NquadsError> {
    let mut dataset = Dataset::new();
    for (line_no, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some(quad) = parse_line(trimmed, line_no + 1)? {
            dataset.add(quad);
        }
    }
    Ok(dataset)
}

fn parse_line(line: &str, line_no: usize) -> Result<Option<Quad>, NquadsError> {
    let mut chars = line.char_indices().peekable();
    let subject = parse_term(line, &mut chars)?;
    skip_ws(&mut chars);
    let predicate = parse_term(line, &mut chars)?;
    skip_ws(&mut chars);
    let object = parse_term(line, &mut chars)?;
    skip_ws(&mut chars);

    // Either a graph label followed by '.', or '.' directly.
    let mut label = None;
    match chars.peek() {
        Some(&(_, '.')) => {
            chars.next();
        }
        Some(_) => {
            label = Some(parse_term(line, &mut chars)?);
            skip_ws(&mut chars);
            match chars.next() {
                Some((_, '.')) => {}
                _ => {
                    return Err(NquadsError::InvalidQuad {
                        line: line_no,
                        detail: "statement not terminated with '.'".into(),
                    })
                }
            }
        }
        None => {
            return Err(NquadsError::IncompleteQuad);
        }
    }

    let subject = require_subject(subject, line_no)?;
    let predicate = require_predicate(predicate, line_no)?;

    Ok(Some(Quad::new(subject, predicate, object, label)))
}

fn require_subject(term: Term, line_no: usize) -> Result<Term, NquadsError> {
    match term {
        Term::Iri(_) | Term::Blank(_) => Ok(term),
        Term::Literal { .. } => Err(NquadsError::InvalidQuad {
            line: line_no,
            detail: "subject must be an IRI or blank node".into(),
        }),
    }
}

fn require_predicate(term: Term, line_no: usize) -> Result<Term, NquadsError> {
    match term {
        Term::Iri(_) => Ok(term),
        _ => Err(NquadsError::InvalidQuad {
            line: line_no,
            detail: "predicate must be an IRI".into(),
        }),
    }
}

type Chars<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

fn skip_ws(chars: &mut Chars<'_>) {
    while matches!(chars.peek(), Some(&(_, c)) if c == ' ' || c == '\t') {
        chars.next();
    }
}

fn parse_term(line: &str, chars: &mut Chars<'_>) -> Result<Term, NquadsError> {
    skip_ws(chars);
    match chars.peek().copied() {
        Some((_, '<')) => parse_iri(line, chars),
        Some((_, '_')) => parse_blank(line, chars),
        Some((_, '"')) => parse_literal(line, chars),
        Some((offset, other)) => Err(NquadsError::InvalidTerm {
            offset,
            detail: format!("unexpected character '{other}'"),
        }),
        None => Err(NquadsError::IncompleteTerm {
            detail: "expected a term, found end of line".into(),
        }),
    }
}

fn parse_iri(line: &str, chars: &mut Chars<'_>) -> Result<Term, NquadsError> {
    let (start, _) = chars.next().expect("caller peeked '<'");
    let mut text = String::new();
    loop {
        match chars.next() {
            Some((_, '>')) => return Ok(Term::Iri(unescape(&text))),
            Some((_, c)) => text.push(c),
            None => {
                return Err(NquadsError::InvalidTerm {
                    offset: start,
                    detail: "unterminated IRI reference".into(),
                })
            }
        }
    }
}

fn parse_blank(line: &str, chars: &mut Chars<'_>) -> Result<Term, NquadsError> {
    let (start, _) = chars.next().expect("caller peeked '_'");
    match chars.next() {
        Some((_, ':')) => {}
        _ => {
            return Err(NquadsError::InvalidTerm {
                offset: start,
                detail: "blank node label must start with '_:'".into(),
            })
        }
    }
    let mut label = String::new();
    match chars.peek() {
        Some(&(_, c)) if c.is_alphanumeric() || c == '_' || c == ':' => {
            let (_, c) = chars.next().expect("peeked");
            label.push(c);
        }
        _ => {
            return Err(NquadsError::InvalidTerm {
                offset: start,
                detail: "empty blank node label".into(),
            })
        }
    }
    loop {
        match chars.peek() {
            Some(&(_, c)) if c.is_alphanumeric() || c == '-' || c == '_' => {
                let (_, c) = chars.next().expect("peeked");
                label.push(c);
            }
            // A '.' only belongs to the label if another label character
            // follows it; a trailing '.' is the statement terminator, not
            // part of the label.
            Some(&(_, '.')) => {
                let mut lookahead = chars.clone();
                lookahead.next();
                match lookahead.peek() {
                    Some(&(_, c)) if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' => {
                        chars.next();
                        label.push('.');
                    }
                    _ => break,
                }
            }
            _ => break,
        }
    }
    let _ = line;
    Ok(Term::Blank(label))
}

fn parse_literal(line: &str, chars: &mut Chars<'_>) -> Result<Term, NquadsError> {
    let (start, _) = chars.next().expect("caller peeked '\"'");
    let mut value = String::new();
    loop {
        match chars.next() {
            Some((_, '"')) => break,
            Some((_, '\\')) => value.push(read_escape(start, chars)?),
            Some((_, c)) => value.push(c),
            None => {
                return Err(NquadsError::InvalidTerm {
                    offset: start,
                    detail: "unterminated string literal".into(),
                })
            }
        }
    }
    let value = value;

    match chars.peek().copied() {
        Some((_, '@')) => {
            chars.next();
            let mut lang = String::new();
            while matches!(chars.peek(), Some(&(_, c)) if c.is_alphanumeric() || c == '-') {
                let (_, c) = chars.next().expect("peeked");
                lang.push(c);
            }
            Ok(Term::literal_with_language(value, lang))
        }
        Some((_, '^')) => {
            chars.next();
            match chars.next() {
                Some((_, '^')) => {}
                _ => {
                    return Err(NquadsError::InvalidTerm {
                        offset: start,
                        detail: "expected '^^' before a datatype IRI".into(),
                    })
                }
            }
            let datatype = parse_iri(line, chars)?;
            let Term::Iri(datatype) = datatype else {
                unreachable!("parse_iri always returns Term::Iri")
            };
            Ok(Term::literal_with_datatype(value, datatype))
        }
        _ => Ok(Term::literal(value)),
    }
}

fn read_escape(start: usize, chars: &mut Chars<'_>) -> Result<char, NquadsError> {
    match chars.next() {
        Some((_, 't')) => Ok('\t'),
        Some((_, 'b')) => Ok('\u{8}'),
        Some((_, 'n')) => Ok('\n'),
        Some((_, 'r')) => Ok('\r'),
        Some((_, 'f')) => Ok('\u{c}'),
        Some((_, '"')) => Ok('"'),
        Some((_, '\\')) => Ok('\\'),
        Some((_, 'u')) => read_unicode_escape(start, chars, 4),
        Some((_, 'U')) => read_unicode_escape(start, chars, 8),
        _ => Err(NquadsError::InvalidTerm {
            offset: start,
            detail: "invalid escape sequence".into(),
        }),
    }
}

fn read_unicode_escape(start: usize, chars: &mut Chars<'_>, digits: usize) -> Result<char, NquadsError> {
    let mut hex = String::with_capacity(digits);
    for _ in 0..digits {
        match chars.next() {
            Some((_, c)) if c.is_ascii_hexdigit() => hex.push(c),
            _ => {
                return Err(NquadsError::InvalidTerm {
                    offset: start,
                    detail: "invalid \\u escape".into(),
                })
            }
        }
    }
    let code = u32::from_str_radix(&hex, 16).map_err(|_| NquadsError::InvalidTerm {
        offset: start,
        detail: "invalid \\u escape".into(),
    })?;
    char::from_u32(code).ok_or_else(|| NquadsError::InvalidTerm {
        offset: start,
        detail: "escape does not encode a valid unicode scalar value".into(),
    })
}

/// IRIs are stored unescaped internally (§3: "IRI text is
/// escape-processed"); this undoes `\uXXXX`/`\UXXXXXXXX` escapes the same
/// way string literals do.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if c == '\\' {
            if let Ok(decoded) = read_escape(0, &mut chars) {
                out.push(decoded);
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Serialise one statement to its N-Quads line, without a trailing
/// newline.
pub fn serialize_quad(quad: &Quad) -> String {
    quad.to_nquads()
}

/// Serialise a whole dataset, one statement per line, each newline
/// terminated.
pub fn serialize_dataset(quads: &[Quad]) -> String {
    let mut out = String::new();
    for quad in quads {
        out.push_str(&serialize_quad(quad));
        out.push('\n');
    }
    out
}
