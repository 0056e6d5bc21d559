// Brzozowski minimization and compaction.

use crate::config::DeterminizeConfig;
use crate::determinize::determinize;
use crate::encode::{decode, encode};
use crate::epsilon::remove_epsilons;
use crate::fsm::Fsm;
use crate::rational::reverse;
use crate::Result;

/// Minimize by determinizing the reversal twice.
///
/// A nondeterministic input is determinized first. With `remove_eps`,
/// epsilons are removed before each determinization
/// instead of being closed over during subset construction. Transducers are
/// minimized as automata over label pairs; see [`compact`] to also merge
/// arcs that differ only in how weights and labels are split.
pub fn minimize(fsm: &mut Fsm, remove_eps: bool, cfg: &DeterminizeConfig) -> Result<()> {
    let before = fsm.num_valid_states();
    if !fsm.is_deterministic() {
        if remove_eps {
            remove_epsilons(fsm, &cfg.epsilon)?;
        }
        determinize(fsm, cfg)?;
    }
    for _ in 0..2 {
        reverse(fsm);
        if remove_eps {
            remove_epsilons(fsm, &cfg.epsilon)?;
        }
        determinize(fsm, cfg)?;
    }
    log::debug!("minimize: {before} states -> {} states", fsm.num_states());
    Ok(())
}

/// Encode every arc as a single acceptor label, minimize, then decode.
pub fn compact(fsm: &mut Fsm, remove_eps: bool, cfg: &DeterminizeConfig) -> Result<()> {
    let table = encode(fsm);
    minimize(fsm, remove_eps, cfg)?;
    decode(fsm, &table)
}
