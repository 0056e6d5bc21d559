// Arc record and arc sort modes.

use std::cmp::Ordering;

use bytemuck::{Pod, Zeroable};

use crate::semiring::{Semiring, Weight};
use crate::{EPSILON, Label, StateId};

/// A weighted transition (24 bytes).
///
/// Layout is fixed so the binary format can write arcs verbatim:
/// - `source` (u32): state the arc leaves
/// - `target` (u32): state the arc enters
/// - `lower` (u32): input-side label
/// - `upper` (u32): output-side label
/// - `weight` (f64): weight under the automaton's semiring
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Arc {
    pub source: StateId,
    pub target: StateId,
    pub lower: Label,
    pub upper: Label,
    pub weight: Weight,
}

impl Arc {
    pub fn new(source: StateId, target: StateId, lower: Label, upper: Label, weight: Weight) -> Self {
        Self {
            source,
            target,
            lower,
            upper,
            weight,
        }
    }

    /// An epsilon arc carrying `weight`.
    pub fn epsilon(source: StateId, target: StateId, weight: Weight) -> Self {
        Self::new(source, target, EPSILON, EPSILON, weight)
    }

    /// Both sides are epsilon.
    #[inline]
    pub fn is_epsilon(&self) -> bool {
        self.lower == EPSILON && self.upper == EPSILON
    }

    /// Lower and upper labels agree.
    #[inline]
    pub fn is_acceptor(&self) -> bool {
        self.lower == self.upper
    }
}

/// Declared order of every state's outgoing arcs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArcSort {
    #[default]
    Unsorted,
    /// By `(lower, upper, target)`.
    Lower,
    /// By `(upper, lower, target)`.
    Upper,
    /// By weight under the semiring's natural order.
    Weight,
}

impl ArcSort {
    /// Compare two arcs under this order. `Unsorted` treats all arcs as equal.
    pub fn compare(self, sr: Semiring, a: &Arc, b: &Arc) -> Ordering {
        match self {
            ArcSort::Unsorted => Ordering::Equal,
            ArcSort::Lower => (a.lower, a.upper, a.target).cmp(&(b.lower, b.upper, b.target)),
            ArcSort::Upper => (a.upper, a.lower, a.target).cmp(&(b.upper, b.lower, b.target)),
            ArcSort::Weight => {
                if sr.less_than(a.weight, b.weight) {
                    Ordering::Less
                } else if sr.less_than(b.weight, a.weight) {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            }
        }
    }

    /// Mode after swapping the lower and upper sides.
    pub fn inverted(self) -> Self {
        match self {
            ArcSort::Lower => ArcSort::Upper,
            ArcSort::Upper => ArcSort::Lower,
            other => other,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            ArcSort::Unsorted => 0,
            ArcSort::Lower => 1,
            ArcSort::Upper => 2,
            ArcSort::Weight => 3,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(ArcSort::Unsorted),
            1 => Some(ArcSort::Lower),
            2 => Some(ArcSort::Upper),
            3 => Some(ArcSort::Weight),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" | "unsorted" => Some(ArcSort::Unsorted),
            "lower" | "ilabel" => Some(ArcSort::Lower),
            "upper" | "olabel" => Some(ArcSort::Upper),
            "weight" => Some(ArcSort::Weight),
            _ => None,
        }
    }
}

const _: () = assert!(size_of::<Arc>() == 24);
