//! Hand-rolled error types for the coloring engine, in the style this
//! codebase already uses for its own invariant-violation errors (a plain
//! struct/enum implementing `Display` + `Error`, no derive macro) rather
//! than the `thiserror`-based taxonomy used on the RDF side.

use core::fmt;

/// A caller-supplied seed coloring violated the proper-coloring invariant:
/// either it assigns the same color to two adjacent nodes, or it names a
/// node that does not exist in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPartialColoring {
    pub reason: InvalidReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// Two adjacent nodes were assigned the same color.
    AdjacentConflict,
    /// The seed names a node that is not present in the graph.
    UnknownNode,
}

impl fmt::Display for InvalidPartialColoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            InvalidReason::AdjacentConflict => {
                write!(f, "invalid partial coloring: adjacent nodes share a color")
            }
            InvalidReason::UnknownNode => {
                write!(f, "invalid partial coloring: seed references a node not in the graph")
            }
        }
    }
}

impl std::error::Error for InvalidPartialColoring {}
