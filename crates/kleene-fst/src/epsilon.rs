// Epsilon closure, epsilon removal and epsilon cycle detection.

use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};

use crate::arc::Arc;
use crate::config::EpsilonConfig;
use crate::cursor::ArcCursor;
use crate::fsm::Fsm;
use crate::semiring::Weight;
use crate::{FstError, Result, StateId};

/// States reachable from `state` through epsilon arcs, with the `plus` of
/// all epsilon path weights. `state` itself is included (weight `one`, plus
/// any epsilon cycles through it). Sorted by state id.
///
/// Weights are computed by relaxation; an automaton whose epsilon cycles do
/// not converge under its semiring yields [`FstError::NonConvergent`].
pub fn epsilon_closure(
    fsm: &Fsm,
    state: StateId,
    cfg: &EpsilonConfig,
) -> Result<Vec<(StateId, Weight)>> {
    let sr = fsm.semiring();
    let budget = cfg.budget(fsm.num_states());
    let mut distance: HashMap<StateId, Weight> = HashMap::new();
    let mut residual: HashMap<StateId, Weight> = HashMap::new();
    let mut queue = VecDeque::from([state]);
    let mut queued: HashSet<StateId> = HashSet::from([state]);
    distance.insert(state, sr.one());
    residual.insert(state, sr.one());
    let mut relaxations = 0usize;

    while let Some(q) = queue.pop_front() {
        queued.remove(&q);
        let r = residual.insert(q, sr.zero()).unwrap_or_else(|| sr.zero());
        for a in fsm.arcs(q).iter().filter(|a| a.is_epsilon()) {
            let delta = sr.times(r, a.weight);
            let old = distance.get(&a.target).copied().unwrap_or_else(|| sr.zero());
            let new = sr.plus(old, delta);
            if sr.approx_eq(old, new) {
                continue;
            }
            relaxations += 1;
            if relaxations > budget {
                return Err(FstError::NonConvergent {
                    iterations: relaxations,
                });
            }
            distance.insert(a.target, new);
            let pending = residual.get(&a.target).copied().unwrap_or_else(|| sr.zero());
            residual.insert(a.target, sr.plus(pending, delta));
            if queued.insert(a.target) {
                queue.push_back(a.target);
            }
        }
    }

    let mut closure: Vec<(StateId, Weight)> = distance.into_iter().collect();
    closure.sort_unstable_by_key(|&(s, _)| s);
    Ok(closure)
}

/// Remove every arc whose lower and upper labels are both epsilon, without
/// changing the weighted language.
pub fn remove_epsilons(fsm: &mut Fsm, cfg: &EpsilonConfig) -> Result<()> {
    let sr = fsm.semiring();
    let states: Vec<StateId> = fsm.states().collect();
    let mut new_arcs: Vec<(StateId, Vec<Arc>)> = Vec::with_capacity(states.len());
    let mut new_finals: Vec<(StateId, Option<Weight>)> = Vec::new();

    for &q in &states {
        if !fsm.arcs(q).iter().any(Arc::is_epsilon) {
            continue;
        }
        let closure = epsilon_closure(fsm, q, cfg)?;
        let mut arcs = Vec::new();
        let mut final_weight = sr.zero();
        for &(p, d) in &closure {
            for a in fsm.arcs(p).iter().filter(|a| !a.is_epsilon()) {
                arcs.push(Arc {
                    source: q,
                    weight: sr.times(d, a.weight),
                    ..*a
                });
            }
            if fsm.is_final(p) {
                final_weight = sr.plus(final_weight, sr.times(d, fsm.final_weight(p)));
            }
        }
        new_arcs.push((q, arcs));
        new_finals.push((q, (!sr.is_zero(final_weight)).then_some(final_weight)));
    }

    let replaced = new_arcs.len();
    for (q, arcs) in new_arcs {
        let mut cur = ArcCursor::open(fsm, q);
        while cur.ok() {
            cur.remove();
        }
        for a in arcs {
            fsm.push_arc(a);
        }
    }
    for (q, w) in new_finals {
        match w {
            Some(w) => fsm.set_final(q, w),
            None => fsm.clear_final(q),
        }
    }
    fsm.connect();
    fsm.is_deterministic = false;
    log::debug!("remove_epsilons: rewrote {replaced} states");
    Ok(())
}

/// The automaton contains a cycle made only of epsilon arcs.
pub fn has_epsilon_cycle(fsm: &Fsm) -> bool {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        White,
        Grey,
        Black,
    }
    let mut mark = vec![Mark::White; fsm.num_states()];
    for start in fsm.states() {
        if mark[start as usize] != Mark::White {
            continue;
        }
        // (state, next arc index)
        let mut stack: Vec<(StateId, usize)> = vec![(start, 0)];
        mark[start as usize] = Mark::Grey;
        while let Some(top) = stack.last_mut() {
            let (s, next) = *top;
            let arcs = fsm.arcs(s);
            if next >= arcs.len() {
                mark[s as usize] = Mark::Black;
                stack.pop();
                continue;
            }
            top.1 += 1;
            let a = &arcs[next];
            if !a.is_epsilon() {
                continue;
            }
            match mark[a.target as usize] {
                Mark::Grey => return true,
                Mark::White => {
                    mark[a.target as usize] = Mark::Grey;
                    stack.push((a.target, 0));
                }
                Mark::Black => {}
            }
        }
    }
    false
}
