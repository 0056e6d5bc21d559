// Transducer composition and acceptor intersection.
//
// Result states are (left state, right state, filter) triples explored
// breadth-first from the pair of roots. The filter orders epsilon moves
// between two label matches: the left operand's epsilon-output moves come
// first, and once the right operand has moved alone on an epsilon input the
// left may not move alone again until the next match. Every pair of operand
// paths therefore yields exactly one result path.

use std::collections::VecDeque;

use hashbrown::HashMap;

use crate::arc::Arc;
use crate::cursor::Arcs;
use crate::fsm::Fsm;
use crate::{EPSILON, StateId};

/// Filter state: both operands may still move alone.
const FREE: u8 = 0;
/// The right operand has moved alone; only it may continue alone.
const RIGHT_ONLY: u8 = 1;

type Triple = (StateId, StateId, u8);

/// Result state for `triple`, allocating and queueing it on first sight.
fn state_for(
    triple: Triple,
    ids: &mut HashMap<Triple, StateId>,
    out: &mut Fsm,
    queue: &mut VecDeque<(Triple, StateId)>,
) -> StateId {
    *ids.entry(triple).or_insert_with(|| {
        let id = out.add_state();
        queue.push_back((triple, id));
        id
    })
}

/// Compose `a` (upper side) with `b` (lower side): the result maps `a`'s
/// lower strings to `b`'s upper strings, with path weights multiplied.
pub fn compose(a: &Fsm, b: &Fsm) -> Fsm {
    debug_assert_eq!(a.semiring(), b.semiring());
    let sr = a.semiring();
    let mut out = Fsm::new(sr);
    if a.is_empty() || b.is_empty() {
        return out;
    }

    let mut ids: HashMap<Triple, StateId> = HashMap::new();
    let mut queue: VecDeque<(Triple, StateId)> = VecDeque::new();
    let mut arcs: Vec<Arc> = Vec::new();

    let start = (a.root(), b.root(), FREE);
    out.root = state_for(start, &mut ids, &mut out, &mut queue);

    while let Some(((p, q, filter), from)) = queue.pop_front() {
        if a.is_final(p) && b.is_final(q) {
            out.set_final(from, sr.times(a.final_weight(p), b.final_weight(q)));
        }

        arcs.clear();
        for x in a.arcs(p) {
            if x.upper == EPSILON {
                if filter == FREE {
                    let to = state_for((x.target, q, FREE), &mut ids, &mut out, &mut queue);
                    arcs.push(Arc::new(from, to, x.lower, EPSILON, x.weight));
                }
                continue;
            }
            let mut cur = Arcs::open(b, q);
            while cur.seek_lower(x.upper) {
                if let Some(y) = cur.arc() {
                    let to = state_for((x.target, y.target, FREE), &mut ids, &mut out, &mut queue);
                    arcs.push(Arc::new(from, to, x.lower, y.upper, sr.times(x.weight, y.weight)));
                }
                cur.advance();
            }
        }
        let mut cur = Arcs::open(b, q);
        while cur.seek_lower(EPSILON) {
            if let Some(y) = cur.arc() {
                let to = state_for((p, y.target, RIGHT_ONLY), &mut ids, &mut out, &mut queue);
                arcs.push(Arc::new(from, to, EPSILON, y.upper, y.weight));
            }
            cur.advance();
        }
        for &arc in &arcs {
            out.push_arc(arc);
        }
    }

    out.recompute_kind();
    out.connect();
    out.renumber();
    log::debug!(
        "compose: {} x {} states -> {} states",
        a.num_valid_states(),
        b.num_valid_states(),
        out.num_states()
    );
    out
}

/// Intersection of two acceptors: composition where lower and upper labels
/// coincide on both sides.
pub fn intersect(a: &Fsm, b: &Fsm) -> Fsm {
    debug_assert!(!a.is_transducer() && !b.is_transducer());
    compose(a, b)
}
