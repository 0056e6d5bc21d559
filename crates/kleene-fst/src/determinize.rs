// Weighted subset construction.
//
// Each result state stands for a subset of source states paired with
// residual weights. Subsets are epsilon-closed, so the source may contain
// epsilon arcs. Arcs are grouped by their (lower, upper) pair, which makes
// transducers deterministic on label pairs.

use std::collections::{BTreeMap, VecDeque};

use hashbrown::HashMap;

use crate::arc::{Arc, ArcSort};
use crate::config::{DeterminizeConfig, EpsilonConfig};
use crate::epsilon::epsilon_closure;
use crate::fsm::Fsm;
use crate::semiring::{Semiring, Weight};
use crate::{EPSILON, FstError, Label, Result, StateId};

/// Source states with residual weights, sorted by state.
type Subset = Vec<(StateId, Weight)>;

/// Hashable identity of a subset: residuals are quantized so that weights
/// equal within the comparison delta map to the same result state.
fn subset_key(sr: Semiring, subset: &Subset) -> Vec<(StateId, i64)> {
    subset.iter().map(|&(s, w)| (s, sr.quantize(w))).collect()
}

/// Epsilon-close `seeds`, scaling each closure by the seed's residual.
fn close(fsm: &Fsm, seeds: &BTreeMap<StateId, Weight>, cfg: &EpsilonConfig) -> Result<Subset> {
    let sr = fsm.semiring();
    let mut closed: BTreeMap<StateId, Weight> = BTreeMap::new();
    for (&s, &r) in seeds {
        for (t, d) in epsilon_closure(fsm, s, cfg)? {
            let w = sr.times(r, d);
            closed
                .entry(t)
                .and_modify(|old| *old = sr.plus(*old, w))
                .or_insert(w);
        }
    }
    Ok(closed.into_iter().filter(|&(_, w)| !sr.is_zero(w)).collect())
}

/// Determinize `fsm` in place.
pub fn determinize(fsm: &mut Fsm, cfg: &DeterminizeConfig) -> Result<()> {
    *fsm = determinized(fsm, cfg)?;
    Ok(())
}

/// Deterministic equivalent of `fsm`.
///
/// The result has state 0 as root, arcs sorted by lower label and is
/// marked deterministic. Weighted automata that are not determinizable
/// would grow without bound; `cfg.max_states` turns that into
/// [`FstError::CapacityExceeded`].
pub fn determinized(fsm: &Fsm, cfg: &DeterminizeConfig) -> Result<Fsm> {
    let sr = fsm.semiring();
    let mut out = Fsm::new(sr);
    out.is_transducer = fsm.is_transducer();
    if fsm.is_empty() {
        out.is_deterministic = true;
        return Ok(out);
    }

    let mut ids: HashMap<Vec<(StateId, i64)>, StateId> = HashMap::new();
    let mut queue: VecDeque<(StateId, Subset)> = VecDeque::new();

    let start = close(fsm, &BTreeMap::from([(fsm.root(), sr.one())]), &cfg.epsilon)?;
    let root = out.add_state();
    out.root = root;
    ids.insert(subset_key(sr, &start), root);
    queue.push_back((root, start));

    while let Some((d, subset)) = queue.pop_front() {
        let mut final_weight = sr.zero();
        // (lower, upper) -> target -> accumulated weight
        let mut groups: BTreeMap<(Label, Label), BTreeMap<StateId, Weight>> = BTreeMap::new();
        for &(s, r) in &subset {
            if fsm.is_final(s) {
                final_weight = sr.plus(final_weight, sr.times(r, fsm.final_weight(s)));
            }
            for a in fsm.arcs(s) {
                if a.lower == EPSILON && a.upper == EPSILON {
                    continue;
                }
                let w = sr.times(r, a.weight);
                if sr.is_zero(w) {
                    continue;
                }
                groups
                    .entry((a.lower, a.upper))
                    .or_default()
                    .entry(a.target)
                    .and_modify(|old| *old = sr.plus(*old, w))
                    .or_insert(w);
            }
        }
        if !sr.is_zero(final_weight) {
            out.set_final(d, final_weight);
        }

        for ((lower, upper), targets) in groups {
            let image = close(fsm, &targets, &cfg.epsilon)?;
            let total = image.iter().fold(sr.zero(), |acc, &(_, w)| sr.plus(acc, w));
            if sr.is_zero(total) {
                continue;
            }
            let next: Subset = image
                .into_iter()
                .map(|(s, w)| (s, sr.divide(w, total)))
                .collect();
            let key = subset_key(sr, &next);
            let target = match ids.get(&key) {
                Some(&t) => t,
                None => {
                    if let Some(limit) = cfg.max_states.filter(|&l| out.num_states() >= l) {
                        return Err(FstError::CapacityExceeded { limit });
                    }
                    let t = out.add_state();
                    ids.insert(key, t);
                    queue.push_back((t, next));
                    t
                }
            };
            // Groups are visited in (lower, upper) order, so appending keeps
            // every state's arcs sorted.
            out.states[d as usize]
                .arcs
                .push(Arc::new(d, target, lower, upper, total));
        }
    }

    out.sort = ArcSort::Lower;
    out.is_deterministic = true;
    log::debug!(
        "determinize: {} states -> {} states",
        fsm.num_valid_states(),
        out.num_states()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathConfig;
    use crate::rational::union;
    use crate::shortest::{language, same_language};

    fn is_deterministic_on_pairs(fsm: &Fsm) -> bool {
        fsm.states().all(|s| {
            let arcs = fsm.arcs(s);
            arcs.iter().all(|a| !a.is_epsilon())
                && arcs
                    .windows(2)
                    .all(|w| (w[0].lower, w[0].upper) < (w[1].lower, w[1].upper))
        })
    }

    /// Two paths sharing the prefix `1`: `1 2` and `1 3`.
    fn shared_prefix(sr: Semiring, w1: Weight, w2: Weight) -> Fsm {
        let mut fsm = Fsm::acceptor(sr, &[1, 2], w1);
        union(&mut fsm, &Fsm::acceptor(sr, &[1, 3], w2));
        fsm
    }

    #[test]
    fn merges_common_prefixes() {
        let fsm = shared_prefix(Semiring::Tropical, 1.0, 3.0);
        let det = determinized(&fsm, &DeterminizeConfig::default()).unwrap();
        assert!(det.is_deterministic());
        assert!(is_deterministic_on_pairs(&det));
        assert_eq!(det.arcs(det.root()).len(), 1);
        // Tropical residuals push the cheaper weight forward.
        assert_eq!(det.arcs(det.root())[0].weight, 1.0);
        let cfg = PathConfig::default();
        assert!(same_language(
            Semiring::Tropical,
            &language(&fsm, &cfg),
            &language(&det, &cfg)
        ));
    }

    #[test]
    fn preserves_language_in_every_semiring() {
        for sr in [Semiring::Tropical, Semiring::Log, Semiring::Real] {
            let fsm = shared_prefix(sr, 0.5, 0.25);
            let det = determinized(&fsm, &DeterminizeConfig::default()).unwrap();
            let cfg = PathConfig::default();
            assert!(same_language(sr, &language(&fsm, &cfg), &language(&det, &cfg)), "{sr:?}");
        }
    }

    #[test]
    fn real_weights_of_ambiguous_paths_are_summed() {
        let mut fsm = Fsm::acceptor(Semiring::Real, &[1], 0.25);
        union(&mut fsm, &Fsm::acceptor(Semiring::Real, &[1], 0.5));
        let det = determinized(&fsm, &DeterminizeConfig::default()).unwrap();
        let lang = language(&det, &PathConfig::default());
        assert_eq!(lang.len(), 1);
        assert!((lang[&(vec![1], vec![1])] - 0.75).abs() < 1e-9);
    }

    #[test]
    fn is_idempotent() {
        let fsm = shared_prefix(Semiring::Tropical, 2.0, 1.0);
        let once = determinized(&fsm, &DeterminizeConfig::default()).unwrap();
        let twice = determinized(&once, &DeterminizeConfig::default()).unwrap();
        assert_eq!(once.num_states(), twice.num_states());
        assert_eq!(once.num_arcs(), twice.num_arcs());
        let cfg = PathConfig::default();
        assert!(same_language(
            Semiring::Tropical,
            &language(&once, &cfg),
            &language(&twice, &cfg)
        ));
    }

    #[test]
    fn transducers_are_deterministic_on_label_pairs() {
        let mut fsm = Fsm::linear(Semiring::Tropical, &[(1, 5)], 0.0);
        union(&mut fsm, &Fsm::linear(Semiring::Tropical, &[(1, 6)], 0.0));
        let det = determinized(&fsm, &DeterminizeConfig::default()).unwrap();
        assert!(det.is_transducer());
        assert_eq!(det.arcs(det.root()).len(), 2);
        assert!(is_deterministic_on_pairs(&det));
    }

    #[test]
    fn handles_cycles() {
        // (1 | 1 2)*
        let mut fsm = Fsm::acceptor(Semiring::Tropical, &[1], 0.0);
        union(&mut fsm, &Fsm::acceptor(Semiring::Tropical, &[1, 2], 0.0));
        crate::rational::closure(&mut fsm, false);
        let det = determinized(&fsm, &DeterminizeConfig::default()).unwrap();
        assert!(is_deterministic_on_pairs(&det));
        let cfg = PathConfig {
            max_length: 5,
            max_paths: 10_000,
        };
        assert!(same_language(
            Semiring::Tropical,
            &language(&fsm, &cfg),
            &language(&det, &cfg)
        ));
    }

    #[test]
    fn empty_stays_empty() {
        let det = determinized(&Fsm::new(Semiring::Tropical), &DeterminizeConfig::default()).unwrap();
        assert!(det.is_empty());
        assert!(det.is_deterministic());
    }

    #[test]
    fn state_cap_aborts() {
        let fsm = shared_prefix(Semiring::Tropical, 0.0, 0.0);
        let cfg = DeterminizeConfig {
            max_states: Some(1),
            ..DeterminizeConfig::default()
        };
        let err = determinized(&fsm, &cfg).unwrap_err();
        assert!(matches!(err, FstError::CapacityExceeded { limit: 1 }));
    }
}
