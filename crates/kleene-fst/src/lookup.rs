// Transduction of a label sequence through an automaton.

use crate::arc::Arc;
use crate::config::LookupConfig;
use crate::cursor::Arcs;
use crate::fsm::Fsm;
use crate::{EPSILON, FstError, Label, NO_LABEL, Result, StateId};

/// Walk `fsm` along `input` and collect every output as an acceptor over the
/// upper labels.
///
/// Each traversal step creates a fresh result state, so the result is a tree
/// of output paths (up to epsilon-input loops, which the state cap bounds).
/// Arcs with an epsilon lower label are followed without consuming input;
/// other arcs must match the next input label. The result keeps the source
/// arc weights and, where the whole input has been consumed on a final
/// state, that state's final weight. Dead branches are trimmed, so an input
/// that is not accepted yields an empty automaton.
///
/// `EPSILON` and `NO_LABEL` are not symbols and are rejected with
/// [`FstError::ReservedLabel`].
pub fn lookup(fsm: &Fsm, input: &[Label], cfg: &LookupConfig) -> Result<Fsm> {
    if let Some(&label) = input.iter().find(|&&l| l == EPSILON || l == NO_LABEL) {
        return Err(FstError::ReservedLabel(label));
    }
    let sr = fsm.semiring();
    let mut out = Fsm::new(sr);
    if fsm.is_empty() {
        return Ok(out);
    }
    let new_state = |out: &mut Fsm| -> Result<StateId> {
        match cfg.max_states {
            Some(limit) if out.num_states() >= limit => Err(FstError::CapacityExceeded { limit }),
            _ => Ok(out.add_state()),
        }
    };

    let root = new_state(&mut out)?;
    out.root = root;
    // (source state, result state, input position)
    let mut stack: Vec<(StateId, StateId, usize)> = vec![(fsm.root(), root, 0)];

    while let Some((s, r, pos)) = stack.pop() {
        if pos == input.len() && fsm.is_final(s) {
            out.set_final(r, fsm.final_weight(s));
        }
        let mut steps: Vec<(&Arc, usize)> = Vec::new();
        let mut cur = Arcs::open(fsm, s);
        while cur.seek_lower(EPSILON) {
            if let Some(a) = cur.arc() {
                steps.push((a, pos));
            }
            cur.advance();
        }
        if let Some(&label) = input.get(pos) {
            cur.reset();
            while cur.seek_lower(label) {
                if let Some(a) = cur.arc() {
                    steps.push((a, pos + 1));
                }
                cur.advance();
            }
        }
        for (a, next_pos) in steps {
            let t = new_state(&mut out)?;
            out.push_arc(Arc::new(r, t, a.upper, a.upper, a.weight));
            stack.push((a.target, t, next_pos));
        }
    }

    let created = out.num_states();
    out.connect();
    out.renumber();
    log::trace!(
        "lookup: {} labels, {} states explored, {} kept",
        input.len(),
        created,
        out.num_states()
    );
    Ok(out)
}
