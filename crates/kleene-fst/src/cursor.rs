// Arc iteration protocol: positioned cursors over one state's arcs.
//
// Seeks binary-search when the automaton is sorted on the sought side and
// fall back to a linear scan otherwise, so both work on any storage order.

use crate::arc::{Arc, ArcSort};
use crate::fsm::Fsm;
use crate::{Label, NO_LABEL, StateId};

/// Find the first arc at or after `from` matching `lower`/`upper`
/// (`NO_LABEL` is a wildcard). Returns `arcs.len()` if there is none.
fn seek(arcs: &[Arc], from: usize, sort: ArcSort, lower: Label, upper: Label) -> usize {
    let matches = |a: &Arc| {
        (lower == NO_LABEL || a.lower == lower) && (upper == NO_LABEL || a.upper == upper)
    };
    let tail = match arcs.get(from..) {
        Some(tail) => tail,
        None => return arcs.len(),
    };
    let start = match sort {
        ArcSort::Lower if lower != NO_LABEL => tail.partition_point(|a| a.lower < lower),
        ArcSort::Upper if upper != NO_LABEL => tail.partition_point(|a| a.upper < upper),
        _ => 0,
    };
    for (i, a) in tail[start..].iter().enumerate() {
        if matches(a) {
            return from + start + i;
        }
        // Past the sorted run for the key; nothing further can match.
        match sort {
            ArcSort::Lower if lower != NO_LABEL && a.lower > lower => break,
            ArcSort::Upper if upper != NO_LABEL && a.upper > upper => break,
            _ => {}
        }
    }
    arcs.len()
}

/// Read-only cursor over the outgoing arcs of one state.
///
/// A cursor opened on an invalid or arc-less state is exhausted.
#[derive(Debug, Clone)]
pub struct Arcs<'a> {
    arcs: &'a [Arc],
    pos: usize,
    sort: ArcSort,
}

impl<'a> Arcs<'a> {
    pub fn open(fsm: &'a Fsm, state: StateId) -> Self {
        Self {
            arcs: fsm.arcs(state),
            pos: 0,
            sort: fsm.sort(),
        }
    }

    /// The cursor refers to an arc.
    #[inline]
    pub fn ok(&self) -> bool {
        self.pos < self.arcs.len()
    }

    #[inline]
    pub fn arc(&self) -> Option<&'a Arc> {
        self.arcs.get(self.pos)
    }

    /// Move to the following arc.
    #[inline]
    pub fn advance(&mut self) {
        if self.pos < self.arcs.len() {
            self.pos += 1;
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Advance to the next arc (including the current one) with this lower
    /// label. Returns [`ok`](Self::ok).
    pub fn seek_lower(&mut self, lower: Label) -> bool {
        self.seek_both(lower, NO_LABEL)
    }

    pub fn seek_upper(&mut self, upper: Label) -> bool {
        self.seek_both(NO_LABEL, upper)
    }

    /// `NO_LABEL` on either side matches any label.
    pub fn seek_both(&mut self, lower: Label, upper: Label) -> bool {
        self.pos = seek(self.arcs, self.pos, self.sort, lower, upper);
        self.ok()
    }
}

/// Mutable cursor over the outgoing arcs of one state, supporting in-place
/// removal and weight updates.
#[derive(Debug)]
pub struct ArcCursor<'a> {
    fsm: &'a mut Fsm,
    state: StateId,
    pos: usize,
}

impl<'a> ArcCursor<'a> {
    pub fn open(fsm: &'a mut Fsm, state: StateId) -> Self {
        Self { fsm, state, pos: 0 }
    }

    fn arcs(&self) -> &[Arc] {
        self.fsm.arcs(self.state)
    }

    #[inline]
    pub fn ok(&self) -> bool {
        self.pos < self.arcs().len()
    }

    pub fn arc(&self) -> Option<&Arc> {
        self.arcs().get(self.pos)
    }

    #[inline]
    pub fn advance(&mut self) {
        if self.ok() {
            self.pos += 1;
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
    }

    pub fn seek_lower(&mut self, lower: Label) -> bool {
        self.seek_both(lower, NO_LABEL)
    }

    pub fn seek_upper(&mut self, upper: Label) -> bool {
        self.seek_both(NO_LABEL, upper)
    }

    pub fn seek_both(&mut self, lower: Label, upper: Label) -> bool {
        self.pos = seek(self.arcs(), self.pos, self.fsm.sort(), lower, upper);
        self.ok()
    }

    /// Remove the current arc; the cursor then refers to the arc that
    /// followed it.
    pub fn remove(&mut self) -> Option<Arc> {
        if !self.ok() {
            return None;
        }
        self.fsm.is_deterministic = false;
        Some(self.fsm.states[self.state as usize].arcs.remove(self.pos))
    }

    /// Overwrite the weight of the current arc. Demotes a weight sort.
    pub fn set_weight(&mut self, weight: crate::Weight) {
        if !self.ok() {
            return;
        }
        if self.fsm.sort == ArcSort::Weight {
            self.fsm.sort = ArcSort::Unsorted;
        }
        self.fsm.states[self.state as usize].arcs[self.pos].weight = weight;
    }
}
