// Shortest distance, best path and bounded path enumeration.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::arc::Arc;
use crate::config::{EpsilonConfig, PathConfig};
use crate::fsm::Fsm;
use crate::heap::IndexedHeap;
use crate::semiring::{Semiring, Weight};
use crate::{EPSILON, FstError, Label, Result, StateId};

/// One accepted path: its non-epsilon lower and upper labels and the total
/// weight including the final weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub lower: Vec<Label>,
    pub upper: Vec<Label>,
    pub weight: Weight,
}

/// Weighted language keyed by `(lower string, upper string)`.
pub type Language = BTreeMap<(Vec<Label>, Vec<Label>), Weight>;

/// Enumerate accepted paths with an explicit stack.
///
/// A path holds at most `max_length` labeled arcs. Runs of pure epsilon arcs
/// never revisit a state within one path, so epsilon cycles are cut instead
/// of followed forever.
pub fn paths(fsm: &Fsm, cfg: &PathConfig) -> Vec<Path> {
    struct Frame {
        state: StateId,
        lower: Vec<Label>,
        upper: Vec<Label>,
        weight: Weight,
        length: usize,
        epsilon_run: Vec<StateId>,
    }

    let sr = fsm.semiring();
    let mut found = Vec::new();
    if fsm.is_empty() {
        return found;
    }
    let mut stack = vec![Frame {
        state: fsm.root(),
        lower: Vec::new(),
        upper: Vec::new(),
        weight: sr.one(),
        length: 0,
        epsilon_run: vec![fsm.root()],
    }];

    while let Some(frame) = stack.pop() {
        if found.len() >= cfg.max_paths {
            break;
        }
        if fsm.is_final(frame.state) {
            found.push(Path {
                lower: frame.lower.clone(),
                upper: frame.upper.clone(),
                weight: sr.times(frame.weight, fsm.final_weight(frame.state)),
            });
        }
        // Reverse so the first arc is explored first.
        for a in fsm.arcs(frame.state).iter().rev() {
            let labeled = !a.is_epsilon();
            if labeled && frame.length >= cfg.max_length {
                continue;
            }
            if !labeled && frame.epsilon_run.contains(&a.target) {
                continue;
            }
            let mut next = Frame {
                state: a.target,
                lower: frame.lower.clone(),
                upper: frame.upper.clone(),
                weight: sr.times(frame.weight, a.weight),
                length: frame.length + usize::from(labeled),
                epsilon_run: if labeled {
                    vec![a.target]
                } else {
                    let mut run = frame.epsilon_run.clone();
                    run.push(a.target);
                    run
                },
            };
            if a.lower != EPSILON {
                next.lower.push(a.lower);
            }
            if a.upper != EPSILON {
                next.upper.push(a.upper);
            }
            stack.push(next);
        }
    }
    found
}

/// Collect [`paths`] into a weighted language, combining paths with equal
/// label strings via `plus`.
pub fn language(fsm: &Fsm, cfg: &PathConfig) -> Language {
    let sr = fsm.semiring();
    let mut lang = Language::new();
    for p in paths(fsm, cfg) {
        if sr.is_zero(p.weight) {
            continue;
        }
        lang.entry((p.lower, p.upper))
            .and_modify(|w| *w = sr.plus(*w, p.weight))
            .or_insert(p.weight);
    }
    lang
}

/// Two languages have the same strings and weights equal up to the
/// semiring's comparison delta.
pub fn same_language(sr: Semiring, a: &Language, b: &Language) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|((ka, wa), (kb, wb))| ka == kb && sr.approx_eq(*wa, *wb))
}

fn natural_order(sr: Semiring) -> impl Fn(&Weight, &Weight) -> Ordering {
    move |a, b| {
        if sr.less_than(*a, *b) {
            Ordering::Less
        } else if sr.less_than(*b, *a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// Single-source shortest distance from the root to every state, indexed by
/// state id (`zero` for unreachable states).
///
/// Uses the generic relaxation scheme with an indexed heap as the queue
/// discipline, so states are settled in best-first order. The relaxation
/// budget of `cfg` guards against semirings where cycles do not converge.
pub fn shortest_distance(fsm: &Fsm, cfg: &EpsilonConfig) -> Result<Vec<Weight>> {
    let (distance, _) = relax_from_root(fsm, cfg)?;
    Ok(distance)
}

/// Distances plus, for each state, the arc that last improved it.
fn relax_from_root(fsm: &Fsm, cfg: &EpsilonConfig) -> Result<(Vec<Weight>, Vec<Option<Arc>>)> {
    let sr = fsm.semiring();
    let n = fsm.num_states();
    let mut distance = vec![sr.zero(); n];
    let mut residual = vec![sr.zero(); n];
    let mut parent: Vec<Option<Arc>> = vec![None; n];
    if fsm.is_empty() {
        return Ok((distance, parent));
    }
    let budget = cfg.budget(n).saturating_mul(fsm.num_arcs().max(1));
    let mut relaxations = 0usize;
    let root = fsm.root();
    distance[root as usize] = sr.one();
    residual[root as usize] = sr.one();
    let mut heap = IndexedHeap::new(natural_order(sr));
    heap.push(root, sr.one());

    while let Some((q, _)) = heap.pop() {
        let r = std::mem::replace(&mut residual[q as usize], sr.zero());
        for a in fsm.arcs(q) {
            let t = a.target as usize;
            let delta = sr.times(r, a.weight);
            let new = sr.plus(distance[t], delta);
            if sr.approx_eq(distance[t], new) {
                continue;
            }
            relaxations += 1;
            if relaxations > budget {
                return Err(FstError::NonConvergent {
                    iterations: relaxations,
                });
            }
            if sr.less_than(delta, distance[t]) || sr.is_zero(distance[t]) {
                parent[t] = Some(*a);
            }
            distance[t] = new;
            residual[t] = sr.plus(residual[t], delta);
            heap.push(a.target, new);
        }
    }
    Ok((distance, parent))
}

/// The single best accepted path as a linear automaton; empty if nothing is
/// accepted. Requires a semiring with the path property.
pub fn best_path(fsm: &Fsm, cfg: &EpsilonConfig) -> Result<Fsm> {
    let sr = fsm.semiring();
    let mut out = Fsm::new(sr);
    let (distance, parent) = relax_from_root(fsm, cfg)?;

    let mut best: Option<(StateId, Weight)> = None;
    for (f, fw) in fsm.finals() {
        let total = sr.times(distance[f as usize], fw);
        if sr.is_zero(total) {
            continue;
        }
        if best.is_none_or(|(_, w)| sr.less_than(total, w)) {
            best = Some((f, total));
        }
    }
    let Some((last, _)) = best else {
        return Ok(out);
    };

    let mut chain: Vec<Arc> = Vec::new();
    let mut s = last;
    while s != fsm.root() {
        let Some(a) = parent[s as usize] else {
            return Err(FstError::Corrupt(format!("no predecessor for state {s}")));
        };
        chain.push(a);
        s = a.source;
        if chain.len() > fsm.num_states() {
            return Err(FstError::Corrupt("best path predecessor cycle".to_string()));
        }
    }
    chain.reverse();

    let mut prev = out.add_state();
    out.set_root(prev);
    for a in &chain {
        let next = out.add_state();
        out.add_arc(Arc::new(prev, next, a.lower, a.upper, a.weight));
        prev = next;
    }
    out.set_final(prev, fsm.final_weight(last));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two routes to final state 3: 0-a/1->1-b/1->3 and 0-a/5->2-c/0->3.
    fn diamond(sr: Semiring) -> Fsm {
        let mut fsm = Fsm::new(sr);
        for _ in 0..4 {
            fsm.add_state();
        }
        fsm.set_root(0);
        fsm.add_arc(Arc::new(0, 1, 1, 1, 1.0));
        fsm.add_arc(Arc::new(1, 3, 2, 2, 1.0));
        fsm.add_arc(Arc::new(0, 2, 1, 1, 5.0));
        fsm.add_arc(Arc::new(2, 3, 3, 3, 0.0));
        fsm.set_final(3, 0.5);
        fsm
    }

    #[test]
    fn enumerates_all_paths() {
        let fsm = diamond(Semiring::Tropical);
        let mut found = paths(&fsm, &PathConfig::default());
        found.sort_by(|a, b| a.lower.cmp(&b.lower));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].lower, vec![1, 2]);
        assert_eq!(found[0].weight, 2.5);
        assert_eq!(found[1].lower, vec![1, 3]);
        assert_eq!(found[1].weight, 5.5);
    }

    #[test]
    fn path_enumeration_is_bounded_on_cycles() {
        let mut fsm = Fsm::new(Semiring::Tropical);
        let s = fsm.add_state();
        fsm.set_root(s);
        fsm.set_final(s, 0.0);
        fsm.add_arc(Arc::new(s, s, 1, 1, 1.0));
        fsm.add_arc(Arc::epsilon(s, s, 0.0));
        let cfg = PathConfig {
            max_length: 3,
            max_paths: 100,
        };
        let lang = language(&fsm, &cfg);
        assert_eq!(lang.len(), 4);
        assert_eq!(lang[&(vec![1, 1, 1], vec![1, 1, 1])], 3.0);
    }

    #[test]
    fn language_combines_equal_strings() {
        let mut fsm = Fsm::new(Semiring::Real);
        let s0 = fsm.add_state();
        let s1 = fsm.add_state();
        fsm.set_root(s0);
        fsm.add_arc(Arc::new(s0, s1, 1, 1, 0.25));
        fsm.add_arc(Arc::new(s0, s1, 1, 1, 0.5));
        fsm.set_final(s1, 1.0);
        let lang = language(&fsm, &PathConfig::default());
        assert_eq!(lang[&(vec![1], vec![1])], 0.75);
    }

    #[test]
    fn distances_follow_cheapest_route() {
        let fsm = diamond(Semiring::Tropical);
        let d = shortest_distance(&fsm, &EpsilonConfig::default()).unwrap();
        assert_eq!(d, vec![0.0, 1.0, 5.0, 2.0]);
    }

    #[test]
    fn unreachable_states_are_zero() {
        let mut fsm = diamond(Semiring::Tropical);
        let lonely = fsm.add_state();
        let d = shortest_distance(&fsm, &EpsilonConfig::default()).unwrap();
        assert_eq!(d[lonely as usize], f64::INFINITY);
    }

    #[test]
    fn best_path_picks_cheapest() {
        let fsm = diamond(Semiring::Tropical);
        let best = best_path(&fsm, &EpsilonConfig::default()).unwrap();
        let found = paths(&best, &PathConfig::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].lower, vec![1, 2]);
        assert_eq!(found[0].weight, 2.5);
    }

    #[test]
    fn best_path_of_empty_is_empty() {
        let fsm = Fsm::new(Semiring::Tropical);
        assert!(best_path(&fsm, &EpsilonConfig::default()).unwrap().is_empty());
    }
}
