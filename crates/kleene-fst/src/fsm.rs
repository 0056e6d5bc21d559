// Automaton container: states, arcs, finals and bookkeeping flags.

use std::collections::VecDeque;

use hashbrown::HashMap;

use crate::arc::{Arc, ArcSort};
use crate::semiring::{Semiring, Weight};
use crate::{EPSILON, Label, NO_STATE, StateId};

/// One state of an automaton.
///
/// Invalid states are never reused; their ids stay reserved until the
/// automaton is renumbered.
#[derive(Debug, Clone, Default)]
pub struct State {
    pub(crate) valid: bool,
    pub(crate) is_final: bool,
    pub(crate) arcs: Vec<Arc>,
}

impl State {
    fn new() -> Self {
        Self {
            valid: true,
            is_final: false,
            arcs: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }
}

/// A weighted finite-state automaton or transducer.
///
/// States are addressed by dense ids assigned in creation order. The finals
/// map holds exactly the final states and their weights. `sort` always
/// describes the physical order of every state's arcs: inserting through
/// [`add_arc`](Self::add_arc) keeps that order, and operations that break it
/// reset the mode to [`ArcSort::Unsorted`].
#[derive(Debug, Clone)]
pub struct Fsm {
    pub(crate) states: Vec<State>,
    pub(crate) root: StateId,
    pub(crate) finals: HashMap<StateId, Weight>,
    pub(crate) semiring: Semiring,
    pub(crate) is_transducer: bool,
    pub(crate) is_deterministic: bool,
    pub(crate) sort: ArcSort,
}

impl Default for Fsm {
    fn default() -> Self {
        Self::new(Semiring::default())
    }
}

impl Fsm {
    /// Create an empty automaton (no states, `root == NO_STATE`).
    pub fn new(semiring: Semiring) -> Self {
        Self {
            states: Vec::new(),
            root: NO_STATE,
            finals: HashMap::new(),
            semiring,
            is_transducer: false,
            is_deterministic: false,
            sort: ArcSort::Unsorted,
        }
    }

    /// Build a linear automaton spelling `pairs` with total weight `weight`
    /// on the first arc. An empty `pairs` accepts only the empty string.
    pub fn linear(semiring: Semiring, pairs: &[(Label, Label)], weight: Weight) -> Self {
        let mut fsm = Self::new(semiring);
        let mut prev = fsm.add_state();
        fsm.root = prev;
        for (i, &(lower, upper)) in pairs.iter().enumerate() {
            let next = fsm.add_state();
            let w = if i == 0 { weight } else { semiring.one() };
            fsm.add_arc(Arc::new(prev, next, lower, upper, w));
            prev = next;
        }
        let final_weight = if pairs.is_empty() { weight } else { semiring.one() };
        fsm.set_final(prev, final_weight);
        fsm.is_deterministic = true;
        fsm
    }

    /// Linear acceptor over `labels`.
    pub fn acceptor(semiring: Semiring, labels: &[Label], weight: Weight) -> Self {
        let pairs: Vec<(Label, Label)> = labels.iter().map(|&l| (l, l)).collect();
        Self::linear(semiring, &pairs, weight)
    }

    pub fn semiring(&self) -> Semiring {
        self.semiring
    }

    pub fn root(&self) -> StateId {
        self.root
    }

    pub fn set_root(&mut self, state: StateId) {
        debug_assert!(state == NO_STATE || self.is_valid(state));
        self.root = state;
    }

    /// The automaton accepts nothing because it has no root.
    pub fn is_empty(&self) -> bool {
        self.root == NO_STATE
    }

    pub fn is_transducer(&self) -> bool {
        self.is_transducer
    }

    pub fn set_transducer(&mut self, is_transducer: bool) {
        self.is_transducer = is_transducer;
    }

    pub fn is_deterministic(&self) -> bool {
        self.is_deterministic
    }

    pub fn set_deterministic(&mut self, is_deterministic: bool) {
        self.is_deterministic = is_deterministic;
    }

    pub fn sort(&self) -> ArcSort {
        self.sort
    }

    /// Number of allocated state ids, including invalidated ones.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_valid_states(&self) -> usize {
        self.states.iter().filter(|s| s.valid).count()
    }

    pub fn num_arcs(&self) -> usize {
        self.states.iter().map(|s| s.arcs.len()).sum()
    }

    pub fn is_valid(&self, state: StateId) -> bool {
        self.states.get(state as usize).is_some_and(|s| s.valid)
    }

    pub fn state(&self, state: StateId) -> Option<&State> {
        self.states.get(state as usize).filter(|s| s.valid)
    }

    /// Ids of all valid states in ascending order.
    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.valid)
            .map(|(i, _)| i as StateId)
    }

    /// Outgoing arcs of `state`; empty for invalid states.
    pub fn arcs(&self, state: StateId) -> &[Arc] {
        self.state(state).map_or(&[], |s| &s.arcs)
    }

    /// Append a new state and return its id.
    pub fn add_state(&mut self) -> StateId {
        let id = self.states.len();
        debug_assert!(id < NO_STATE as usize, "state id space exhausted");
        self.states.push(State::new());
        id as StateId
    }

    /// Invalidate `state`, dropping its arcs, its finality, and every arc
    /// that enters it.
    pub fn remove_state(&mut self, state: StateId) {
        let Some(s) = self.states.get_mut(state as usize) else {
            return;
        };
        s.valid = false;
        s.is_final = false;
        s.arcs = Vec::new();
        self.finals.remove(&state);
        if self.root == state {
            self.root = NO_STATE;
        }
        for s in &mut self.states {
            s.arcs.retain(|a| a.target != state);
        }
    }

    /// Add an arc leaving `arc.source`.
    ///
    /// If the automaton declares a sort mode the arc is inserted at its
    /// ordered position, otherwise it is appended.
    pub fn add_arc(&mut self, arc: Arc) {
        debug_assert!(self.is_valid(arc.source), "arc source {} is invalid", arc.source);
        debug_assert!(self.is_valid(arc.target), "arc target {} is invalid", arc.target);
        if arc.lower != arc.upper {
            self.is_transducer = true;
        }
        self.is_deterministic = false;
        let sort = self.sort;
        let sr = self.semiring;
        let arcs = &mut self.states[arc.source as usize].arcs;
        if sort == ArcSort::Unsorted {
            arcs.push(arc);
        } else {
            let at = arcs.partition_point(|a| sort.compare(sr, a, &arc).is_le());
            arcs.insert(at, arc);
        }
    }

    /// Append an arc without maintaining the sort order; demotes the sort
    /// mode to unsorted.
    pub(crate) fn push_arc(&mut self, arc: Arc) {
        if arc.lower != arc.upper {
            self.is_transducer = true;
        }
        self.sort = ArcSort::Unsorted;
        self.states[arc.source as usize].arcs.push(arc);
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.state(state).is_some_and(|s| s.is_final)
    }

    /// Final weight of `state`, or `zero` if it is not final.
    pub fn final_weight(&self, state: StateId) -> Weight {
        self.finals
            .get(&state)
            .copied()
            .unwrap_or_else(|| self.semiring.zero())
    }

    /// Make `state` final with exactly `weight`.
    pub fn set_final(&mut self, state: StateId, weight: Weight) {
        debug_assert!(self.is_valid(state));
        self.states[state as usize].is_final = true;
        self.finals.insert(state, weight);
    }

    /// Make `state` final, combining with an existing final weight via `plus`.
    pub fn add_final(&mut self, state: StateId, weight: Weight) {
        let sr = self.semiring;
        let w = match self.finals.get(&state) {
            Some(&old) => sr.plus(old, weight),
            None => weight,
        };
        self.set_final(state, w);
    }

    pub fn clear_final(&mut self, state: StateId) {
        if let Some(s) = self.states.get_mut(state as usize) {
            s.is_final = false;
        }
        self.finals.remove(&state);
    }

    /// Final states and their weights in ascending state order.
    pub fn finals(&self) -> Vec<(StateId, Weight)> {
        let mut finals: Vec<(StateId, Weight)> =
            self.finals.iter().map(|(&s, &w)| (s, w)).collect();
        finals.sort_unstable_by_key(|&(s, _)| s);
        finals
    }

    /// Physically sort every state's arcs and record the mode.
    pub fn arc_sort(&mut self, mode: ArcSort) {
        let sr = self.semiring;
        if mode != ArcSort::Unsorted {
            for s in &mut self.states {
                s.arcs.sort_by(|a, b| mode.compare(sr, a, b));
            }
        }
        self.sort = mode;
    }

    /// Sorted, deduplicated non-epsilon lower labels.
    pub fn lower_alphabet(&self) -> Vec<Label> {
        self.collect_labels(|a| a.lower)
    }

    /// Sorted, deduplicated non-epsilon upper labels.
    pub fn upper_alphabet(&self) -> Vec<Label> {
        self.collect_labels(|a| a.upper)
    }

    fn collect_labels(&self, side: impl Fn(&Arc) -> Label) -> Vec<Label> {
        let mut labels: Vec<Label> = self
            .states
            .iter()
            .flat_map(|s| s.arcs.iter().map(&side))
            .filter(|&l| l != EPSILON)
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    /// Recompute `is_transducer` from the arcs.
    pub fn recompute_kind(&mut self) {
        self.is_transducer = self
            .states
            .iter()
            .any(|s| s.arcs.iter().any(|a| !a.is_acceptor()));
    }

    /// Copy every state of `other` into `self`, shifting ids by the current
    /// state count. Returns the offset. Finals are copied with the offset.
    pub(crate) fn append_copy(&mut self, other: &Fsm) -> StateId {
        let offset = self.states.len() as StateId;
        self.states.reserve(other.states.len());
        for s in &other.states {
            let arcs = s
                .arcs
                .iter()
                .map(|a| Arc {
                    source: a.source + offset,
                    target: a.target + offset,
                    ..*a
                })
                .collect();
            self.states.push(State {
                valid: s.valid,
                is_final: s.is_final,
                arcs,
            });
        }
        for (&s, &w) in &other.finals {
            self.finals.insert(s + offset, w);
        }
        self.is_transducer |= other.is_transducer;
        offset
    }

    /// Reset to the empty automaton, keeping the semiring.
    pub fn clear(&mut self) {
        *self = Self::new(self.semiring);
    }

    /// Remove states that are not both accessible from the root and
    /// coaccessible to a final state. Ids are left in place; call
    /// [`renumber`](Self::renumber) to compact them.
    pub fn connect(&mut self) {
        let n = self.states.len();
        let mut accessible = vec![false; n];
        if self.root != NO_STATE && self.is_valid(self.root) {
            let mut stack = vec![self.root];
            accessible[self.root as usize] = true;
            while let Some(s) = stack.pop() {
                for a in &self.states[s as usize].arcs {
                    let t = a.target as usize;
                    if !accessible[t] {
                        accessible[t] = true;
                        stack.push(a.target);
                    }
                }
            }
        }

        let mut incoming: Vec<Vec<StateId>> = vec![Vec::new(); n];
        for s in &self.states {
            for a in &s.arcs {
                incoming[a.target as usize].push(a.source);
            }
        }
        let mut coaccessible = vec![false; n];
        let mut stack: Vec<StateId> = self.finals.keys().copied().collect();
        for &f in &stack {
            coaccessible[f as usize] = true;
        }
        while let Some(s) = stack.pop() {
            for &p in &incoming[s as usize] {
                if !coaccessible[p as usize] {
                    coaccessible[p as usize] = true;
                    stack.push(p);
                }
            }
        }

        let keep: Vec<bool> = (0..n)
            .map(|i| self.states[i].valid && accessible[i] && coaccessible[i])
            .collect();
        for (i, s) in self.states.iter_mut().enumerate() {
            if keep[i] {
                s.arcs.retain(|a| keep[a.target as usize]);
            } else {
                *s = State::default();
            }
        }
        self.finals.retain(|&s, _| keep[s as usize]);
        if self.root != NO_STATE && !keep[self.root as usize] {
            self.root = NO_STATE;
        }
        log::trace!(
            "connect: kept {} of {} states",
            keep.iter().filter(|&&k| k).count(),
            n
        );
    }

    /// Compact valid states into dense ids in breadth-first order from the
    /// root; states unreachable from the root follow in their old order.
    pub fn renumber(&mut self) {
        let n = self.states.len();
        let mut order: Vec<StateId> = Vec::with_capacity(n);
        let mut seen = vec![false; n];
        if self.root != NO_STATE {
            let mut queue = VecDeque::from([self.root]);
            seen[self.root as usize] = true;
            while let Some(s) = queue.pop_front() {
                order.push(s);
                for a in &self.states[s as usize].arcs {
                    if !seen[a.target as usize] {
                        seen[a.target as usize] = true;
                        queue.push_back(a.target);
                    }
                }
            }
        }
        for (i, s) in self.states.iter().enumerate() {
            if s.valid && !seen[i] {
                order.push(i as StateId);
            }
        }

        let mut map = vec![NO_STATE; n];
        for (new, &old) in order.iter().enumerate() {
            map[old as usize] = new as StateId;
        }
        let mut old_states = std::mem::take(&mut self.states);
        self.states = order
            .iter()
            .map(|&old| {
                let mut s = std::mem::take(&mut old_states[old as usize]);
                for a in &mut s.arcs {
                    a.source = map[a.source as usize];
                    a.target = map[a.target as usize];
                }
                s
            })
            .collect();
        self.finals = self
            .finals
            .iter()
            .map(|(&s, &w)| (map[s as usize], w))
            .collect();
        if self.root != NO_STATE {
            self.root = map[self.root as usize];
        }
        // Target ids changed, so only label and weight orders survive.
        if self.sort != ArcSort::Unsorted {
            let mode = self.sort;
            self.arc_sort(mode);
        }
    }
}
