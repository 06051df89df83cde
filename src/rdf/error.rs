//! The RDF-side error taxonomy (§7), built with `thiserror` — deliberately
//! a different style from the coloring engine's hand-rolled errors
//! (`crate::coloring::error`), matching how this corpus varies its error
//! idiom by subsystem rather than imposing one pattern everywhere.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NquadsError {
    #[error("invalid term at byte {offset}: {detail}")]
    InvalidTerm { offset: usize, detail: String },
    #[error("incomplete term at end of input: {detail}")]
    IncompleteTerm { detail: String },
    #[error("invalid quad at line {line}: {detail}")]
    InvalidQuad { line: usize, detail: String },
    #[error("incomplete quad at end of input")]
    IncompleteQuad,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeanError {
    #[error("leaning does not support datasets with named graphs; {statement_count} statement(s) carried a graph label and were ignored")]
    GraphLabelsUnsupported { statement_count: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CanonError {
    #[error("destination slice has length {actual}, expected {expected}")]
    SliceLengthMismatch { expected: usize, actual: usize },
}
