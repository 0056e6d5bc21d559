//! Weighted finite-state automaton and transducer engine.
//!
//! This crate provides an in-memory automaton model over a pluggable weight
//! semiring, the rational operations on it, weighted determinization,
//! Brzozowski minimization and string transduction (lookup).
//!
//! # Architecture
//!
//! - [`semiring`] -- Weight algebra (tropical, log, real, boolean)
//! - [`arc`] -- Arc record and arc sort modes
//! - [`fsm`] -- Automaton container, connection, renumbering, sorting
//! - [`cursor`] -- Arc iteration protocol (seek, remove)
//! - [`rational`] -- Union, concatenation, closure, reversal, complement, ...
//! - [`compose`] -- Transducer composition and acceptor intersection
//! - [`epsilon`] -- Epsilon closure, epsilon removal, epsilon cycle check
//! - [`determinize`] -- Weighted subset construction
//! - [`minimize`] -- Brzozowski minimization and compaction
//! - [`encode`] -- Bijective arc encoding for compaction
//! - [`lookup`] -- Transduction of a label sequence
//! - [`heap`] -- Indexed priority queue
//! - [`shortest`] -- Shortest distance, best path and path enumeration
//! - [`config`] -- Algorithm configuration
//! - [`alphabet`] -- Symbol table (symbol-to-label and label-to-symbol mapping)
//! - [`format`] -- Binary serialization
//! - [`text`] -- AT&T-style text serialization
//! - [`dot`] -- Graphviz rendering

pub mod alphabet;
pub mod arc;
pub mod compose;
pub mod config;
pub mod cursor;
pub mod determinize;
pub mod dot;
pub mod encode;
pub mod epsilon;
pub mod format;
pub mod fsm;
pub mod heap;
pub mod lookup;
pub mod minimize;
pub mod rational;
pub mod semiring;
pub mod shortest;
pub mod text;

pub use arc::{Arc, ArcSort};
pub use fsm::Fsm;
pub use semiring::{Semiring, Weight};

/// Integer identifier of an arc label.
pub type Label = u32;

/// Dense integer identifier of a state.
pub type StateId = u32;

/// The empty-string label.
pub const EPSILON: Label = 0;

/// Sentinel for "no such label"; acts as a wildcard in cursor seeks.
pub const NO_LABEL: Label = u32::MAX;

/// Sentinel for "no such state"; the root of an empty automaton.
pub const NO_STATE: StateId = u32::MAX;

/// Error type for automaton operations and serialization.
#[derive(Debug, thiserror::Error)]
pub enum FstError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid magic number in automaton header")]
    InvalidMagic,
    #[error("file too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u8),
    #[error("unknown semiring id {0}")]
    InvalidSemiring(u8),
    #[error("corrupt automaton data: {0}")]
    Corrupt(String),
    #[error("parse error on line {line}: {msg}")]
    Parse { line: usize, msg: String },
    #[error("state {0} does not exist")]
    InvalidState(StateId),
    #[error("epsilon closure did not converge after {iterations} relaxations")]
    NonConvergent { iterations: usize },
    #[error("state limit of {limit} exceeded")]
    CapacityExceeded { limit: usize },
    #[error("label {0} is reserved and cannot appear in an input string")]
    ReservedLabel(Label),
    #[error("label {0} is not in the encode table")]
    UnknownCode(Label),
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),
    #[error("invalid alphabet: {0}")]
    Alphabet(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FstError>;

/// Largest state id or label a text input of `len` bytes may name. Storage
/// is dense, so larger ids would allocate far beyond the input size.
pub(crate) fn text_id_limit(len: usize) -> usize {
    len.saturating_add(1 << 16)
}
