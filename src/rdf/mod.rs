//! RDF dataset canonicalisation, leaning, and querying (§4.5–§4.8).
//!
//! A [`Dataset`] is a flat, unordered collection of [`Quad`]s over [`Term`]s.
//! The submodules implement the pipeline a caller typically runs in order:
//! parse N-Quads text ([`nquads`]), optionally [`lean`] the dataset to its
//! core, [`canon`]icalise it to a stable textual form, and [`query`] it.

pub mod canon;
pub mod digest;
pub mod error;
pub mod hash;
pub mod lean;
pub mod nquads;
pub mod query;
pub mod quad;
pub mod term;

pub use digest::{CanonAlgorithm, Digest, Sha1Digest, Sha256Digest};
pub use error::{CanonError, LeanError, NquadsError};
pub use hash::{distinguish, refine, refine_decomposed, HashResult};
pub use quad::{Dataset, Quad};
pub use query::{Query, RdfGraph};
pub use term::{LiteralQualifier, Term};
