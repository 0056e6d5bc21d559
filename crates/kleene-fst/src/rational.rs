// Rational operations: union, concatenation, closure, reversal, complement,
// difference, product, projection, inversion, replacement and final-weight
// arithmetic.
//
// Every operation mutates its first operand in place. The second operand is
// borrowed and copied with a state-id offset, so passing the same automaton
// twice means cloning it first.

use crate::arc::{Arc, ArcSort};
use crate::compose;
use crate::config::DeterminizeConfig;
use crate::cursor::{ArcCursor, Arcs};
use crate::determinize::determinize;
use crate::fsm::Fsm;
use crate::semiring::Weight;
use crate::{EPSILON, Label, NO_STATE, Result, StateId};

/// Side of an arc label pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Lower,
    Upper,
}

/// `a = a | b`.
pub fn union(a: &mut Fsm, b: &Fsm) {
    debug_assert_eq!(a.semiring(), b.semiring());
    if b.is_empty() {
        return;
    }
    let one = a.semiring().one();
    let old_root = a.root();
    let new_root = a.add_state();
    if old_root != NO_STATE {
        a.push_arc(Arc::epsilon(new_root, old_root, one));
    }
    let offset = a.append_copy(b);
    a.push_arc(Arc::epsilon(new_root, b.root() + offset, one));
    a.root = new_root;
    a.is_deterministic = false;
}

/// `a = a b`.
pub fn concat(a: &mut Fsm, b: &Fsm) {
    debug_assert_eq!(a.semiring(), b.semiring());
    if a.is_empty() {
        let mut copy = b.clone();
        copy.renumber();
        *a = copy;
        return;
    }
    if b.is_empty() {
        a.clear();
        return;
    }
    let finals = a.finals();
    for &(q, _) in &finals {
        a.clear_final(q);
    }
    let offset = a.append_copy(b);
    a.sort = ArcSort::Unsorted;
    let b_root = b.root() + offset;
    for (q, w) in finals {
        a.push_arc(Arc::epsilon(q, b_root, w));
    }
    a.is_deterministic = false;
}

/// `a = a b^n`.
pub fn n_concat(a: &mut Fsm, b: &Fsm, n: usize) {
    for _ in 0..n {
        concat(a, b);
    }
}

/// Make sure no arc enters the root, adding a fresh root if needed.
fn isolate_root(a: &mut Fsm) {
    let root = a.root();
    let entered = a
        .states
        .iter()
        .any(|s| s.arcs.iter().any(|arc| arc.target == root));
    if entered {
        let one = a.semiring().one();
        let new_root = a.add_state();
        a.push_arc(Arc::epsilon(new_root, root, one));
        a.root = new_root;
    }
}

/// `a = a?`: also accept the empty string with weight `one`.
pub fn optional(a: &mut Fsm) {
    let one = a.semiring().one();
    if a.is_empty() {
        let root = a.add_state();
        a.root = root;
        a.set_final(root, one);
        return;
    }
    // Making an entered root final would also accept the strings that
    // lead back into it.
    isolate_root(a);
    let root = a.root();
    a.add_final(root, one);
    a.is_deterministic = false;
}

/// `a = a+` when `is_plus`, else `a = a*`.
pub fn closure(a: &mut Fsm, is_plus: bool) {
    if a.is_empty() {
        if !is_plus {
            optional(a);
        }
        return;
    }
    let root = a.root();
    for (q, w) in a.finals() {
        if q != root {
            a.push_arc(Arc::epsilon(q, root, w));
        }
    }
    a.is_deterministic = false;
    if !is_plus {
        optional(a);
    }
}

/// `n == 0`: `a*`; `n == 1`: `a+`; otherwise `(a^n)+`.
pub fn n_closure(a: &mut Fsm, n: usize) {
    match n {
        0 => closure(a, false),
        1 => closure(a, true),
        _ => {
            let copy = a.clone();
            n_concat(a, &copy, n - 1);
            closure(a, true);
        }
    }
}

/// Reverse every path: arcs move to the list of their former target with
/// source and target swapped, old finals become epsilon successors of a new
/// root, and the old root becomes final with weight `one`.
pub fn reverse(a: &mut Fsm) {
    if a.is_empty() {
        return;
    }
    let one = a.semiring().one();
    let old_root = a.root();
    let finals = a.finals();
    for &(q, _) in &finals {
        a.clear_final(q);
    }
    let new_root = a.add_state();

    let mut moved: Vec<Arc> = Vec::with_capacity(a.num_arcs());
    for s in &mut a.states {
        moved.append(&mut s.arcs);
    }
    for arc in moved {
        let reversed = Arc {
            source: arc.target,
            target: arc.source,
            ..arc
        };
        a.states[arc.target as usize].arcs.push(reversed);
    }
    for (q, w) in finals {
        a.states[new_root as usize].arcs.push(Arc::epsilon(new_root, q, w));
    }

    a.set_final(old_root, one);
    a.root = new_root;
    a.sort = ArcSort::Unsorted;
    a.is_deterministic = false;
}

/// Make `a` deterministic and complete over `sigma`: every state gets an
/// arc for every label of `sigma`, missing ones leading to a non-final sink.
///
/// Arcs are sorted by lower label before the missing labels are found, so
/// completion never depends on the incoming arc order.
pub fn complete(a: &mut Fsm, sigma: &[Label], cfg: &DeterminizeConfig) -> Result<()> {
    let one = a.semiring().one();
    if !a.is_deterministic() {
        determinize(a, cfg)?;
    }
    if a.is_empty() {
        let root = a.add_state();
        a.root = root;
    }
    let mut sigma: Vec<Label> = sigma.iter().copied().filter(|&l| l != EPSILON).collect();
    sigma.sort_unstable();
    sigma.dedup();

    a.arc_sort(ArcSort::Lower);
    let sink = a.add_state();
    let states: Vec<StateId> = a.states().collect();
    for s in states {
        let mut missing = Vec::new();
        let mut cur = Arcs::open(a, s);
        for &label in &sigma {
            while let Some(arc) = cur.arc() {
                if arc.lower < label {
                    cur.advance();
                } else {
                    break;
                }
            }
            if cur.arc().is_none_or(|arc| arc.lower != label) {
                missing.push(label);
            }
        }
        for label in missing {
            a.add_arc(Arc::new(s, sink, label, label, one));
        }
    }
    a.is_deterministic = true;
    Ok(())
}

/// Complement over `sigma`: complete, then flip finality. The result is
/// unweighted: every arc and final weight becomes `one`.
pub fn complement(a: &mut Fsm, sigma: &[Label], cfg: &DeterminizeConfig) -> Result<()> {
    complete(a, sigma, cfg)?;
    let one = a.semiring().one();
    for s in &mut a.states {
        for arc in &mut s.arcs {
            arc.weight = one;
        }
    }
    if a.sort == ArcSort::Weight {
        a.sort = ArcSort::Unsorted;
    }
    let states: Vec<StateId> = a.states().collect();
    for s in states {
        if a.is_final(s) {
            a.clear_final(s);
        } else {
            a.set_final(s, one);
        }
    }
    Ok(())
}

/// `a = a & b` for acceptors.
pub fn intersect(a: &mut Fsm, b: &Fsm) {
    *a = compose::intersect(a, b);
}

/// `a = a - b`: intersect `a` with the complement of `b` over the lower
/// labels observed on `a`.
pub fn difference(a: &mut Fsm, b: &Fsm, cfg: &DeterminizeConfig) -> Result<()> {
    let mut not_b = b.clone();
    complement(&mut not_b, &a.lower_alphabet(), cfg)?;
    intersect(a, &not_b);
    Ok(())
}

/// Straight-line transducer from two acceptors: `a` keeps only its lower
/// side, `b` only its upper side, and the two are concatenated.
pub fn product(a: &mut Fsm, b: &Fsm) {
    for s in &mut a.states {
        for arc in &mut s.arcs {
            arc.upper = EPSILON;
        }
    }
    let mut b = b.clone();
    for s in &mut b.states {
        for arc in &mut s.arcs {
            arc.lower = EPSILON;
        }
    }
    a.sort = ArcSort::Unsorted;
    b.sort = ArcSort::Unsorted;
    concat(a, &b);
    a.is_transducer = true;
    a.is_deterministic = false;
}

/// Keep one side of every arc, collapsing the automaton to an acceptor.
pub fn project(a: &mut Fsm, side: Side) {
    for s in &mut a.states {
        for arc in &mut s.arcs {
            match side {
                Side::Lower => arc.upper = arc.lower,
                Side::Upper => arc.lower = arc.upper,
            }
        }
    }
    let still_ordered = match (side, a.sort) {
        (Side::Lower, ArcSort::Lower) | (Side::Upper, ArcSort::Upper) => Some(ArcSort::Lower),
        (_, ArcSort::Weight) => Some(ArcSort::Weight),
        _ => None,
    };
    match still_ordered {
        // Tie-breaks on the overwritten side changed; re-sort within runs.
        Some(mode) => a.arc_sort(mode),
        None => a.sort = ArcSort::Unsorted,
    }
    a.is_transducer = false;
    a.is_deterministic = false;
}

/// Swap lower and upper labels on every arc.
pub fn invert(a: &mut Fsm) {
    for s in &mut a.states {
        for arc in &mut s.arcs {
            std::mem::swap(&mut arc.lower, &mut arc.upper);
        }
    }
    a.sort = a.sort.inverted();
}

/// Replace every final weight `f` with `plus(f, w)`.
pub fn plus_weight(a: &mut Fsm, w: Weight) {
    let sr = a.semiring();
    for f in a.finals.values_mut() {
        *f = sr.plus(*f, w);
    }
}

/// Replace every final weight `f` with `times(f, w)`.
pub fn times_weight(a: &mut Fsm, w: Weight) {
    let sr = a.semiring();
    for f in a.finals.values_mut() {
        *f = sr.times(*f, w);
    }
}

/// Substitute a copy of `b` for every arc of `a` whose lower label is
/// `label`. The copy is entered by an epsilon arc carrying the replaced
/// arc's weight and left by epsilon arcs carrying `b`'s final weights.
pub fn replace(a: &mut Fsm, label: Label, b: &Fsm) {
    let states: Vec<StateId> = a.states().collect();
    let mut replaced: Vec<Arc> = Vec::new();
    for s in states {
        let mut cur = ArcCursor::open(a, s);
        while cur.seek_lower(label) {
            if let Some(arc) = cur.remove() {
                replaced.push(arc);
            }
        }
    }
    if replaced.is_empty() || b.is_empty() {
        return;
    }
    let b_finals = b.finals();
    for arc in replaced {
        let offset = a.append_copy(b);
        a.push_arc(Arc::epsilon(arc.source, b.root() + offset, arc.weight));
        for &(f, w) in &b_finals {
            a.clear_final(f + offset);
            a.push_arc(Arc::epsilon(f + offset, arc.target, w));
        }
    }
    a.is_deterministic = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathConfig;
    use crate::semiring::Semiring;
    use crate::shortest::{Language, language, same_language};

    fn lang(fsm: &Fsm) -> Language {
        language(fsm, &PathConfig { max_length: 6, max_paths: 10_000 })
    }

    fn key(labels: &[Label]) -> (Vec<Label>, Vec<Label>) {
        (labels.to_vec(), labels.to_vec())
    }

    fn word(labels: &[Label], w: Weight) -> Fsm {
        Fsm::acceptor(Semiring::Tropical, labels, w)
    }

    #[test]
    fn union_with_empty_is_identity() {
        let a = word(&[1, 2], 1.0);
        let mut u = a.clone();
        union(&mut u, &Fsm::new(Semiring::Tropical));
        assert!(same_language(Semiring::Tropical, &lang(&a), &lang(&u)));

        let mut e = Fsm::new(Semiring::Tropical);
        union(&mut e, &a);
        assert!(same_language(Semiring::Tropical, &lang(&a), &lang(&e)));
    }

    #[test]
    fn union_accumulates_shared_paths() {
        let a = Fsm::acceptor(Semiring::Real, &[1], 0.25);
        let mut u = a.clone();
        union(&mut u, &a);
        let l = lang(&u);
        assert_eq!(l.len(), 1);
        assert_eq!(l[&key(&[1])], 0.5);

        let t = word(&[1], 2.0);
        let mut ut = t.clone();
        union(&mut ut, &t);
        assert!(same_language(Semiring::Tropical, &lang(&t), &lang(&ut)));
    }

    #[test]
    fn concat_joins_strings_and_weights() {
        let mut a = word(&[1], 1.0);
        concat(&mut a, &word(&[2, 3], 2.0));
        let l = lang(&a);
        assert_eq!(l.len(), 1);
        assert_eq!(l[&key(&[1, 2, 3])], 3.0);
    }

    #[test]
    fn concat_is_associative() {
        let (x, y, z) = (word(&[1], 1.0), word(&[2], 2.0), word(&[3], 4.0));
        let mut left = x.clone();
        concat(&mut left, &y);
        concat(&mut left, &z);
        let mut yz = y.clone();
        concat(&mut yz, &z);
        let mut right = x.clone();
        concat(&mut right, &yz);
        assert!(same_language(Semiring::Tropical, &lang(&left), &lang(&right)));
    }

    #[test]
    fn concat_with_empty_operands() {
        let mut e = Fsm::new(Semiring::Tropical);
        concat(&mut e, &word(&[4], 0.5));
        assert_eq!(lang(&e)[&key(&[4])], 0.5);

        let mut a = word(&[4], 0.5);
        concat(&mut a, &Fsm::new(Semiring::Tropical));
        assert!(a.is_empty());
    }

    #[test]
    fn concat_without_finals_drops_sort_mode() {
        let mut a = word(&[1], 0.0);
        a.arc_sort(ArcSort::Lower);
        a.clear_final(1);
        let mut b = Fsm::new(Semiring::Tropical);
        let s0 = b.add_state();
        let s1 = b.add_state();
        b.set_root(s0);
        b.add_arc(Arc::new(s0, s1, 3, 3, 0.0));
        b.add_arc(Arc::new(s0, s1, 1, 1, 0.0));
        b.set_final(s1, 0.0);

        concat(&mut a, &b);
        assert_eq!(a.sort(), ArcSort::Unsorted);
        assert_eq!(a.arcs(2)[0].lower, 3);
    }

    #[test]
    fn n_concat_repeats() {
        let mut a = word(&[1], 1.0);
        n_concat(&mut a, &word(&[2], 1.0), 3);
        assert_eq!(lang(&a)[&key(&[1, 2, 2, 2])], 4.0);
    }

    #[test]
    fn star_plus_and_optional() {
        let mut star = word(&[1], 1.0);
        closure(&mut star, false);
        let l = lang(&star);
        assert_eq!(l[&key(&[])], 0.0);
        assert_eq!(l[&key(&[1, 1, 1])], 3.0);

        let mut plus = word(&[1], 1.0);
        closure(&mut plus, true);
        let l = lang(&plus);
        assert!(!l.contains_key(&key(&[])));
        assert_eq!(l[&key(&[1, 1])], 2.0);

        let mut opt = word(&[1, 2], 1.0);
        optional(&mut opt);
        let l = lang(&opt);
        assert_eq!(l.len(), 2);
        assert_eq!(l[&key(&[])], 0.0);
    }

    #[test]
    fn star_of_entered_root_does_not_overaccept() {
        // a (b a)*
        let mut fsm = Fsm::new(Semiring::Tropical);
        let s0 = fsm.add_state();
        let s1 = fsm.add_state();
        fsm.set_root(s0);
        fsm.add_arc(Arc::new(s0, s1, 1, 1, 0.0));
        fsm.add_arc(Arc::new(s1, s0, 2, 2, 0.0));
        fsm.set_final(s1, 0.0);
        closure(&mut fsm, false);
        let l = lang(&fsm);
        assert!(l.contains_key(&key(&[])));
        assert!(l.contains_key(&key(&[1, 2, 1])));
        assert!(!l.contains_key(&key(&[1, 2])));
    }

    #[test]
    fn n_closure_variants() {
        let mut two = word(&[1], 0.0);
        n_closure(&mut two, 2);
        let l = lang(&two);
        assert!(l.contains_key(&key(&[1, 1])));
        assert!(l.contains_key(&key(&[1, 1, 1, 1])));
        assert!(!l.contains_key(&key(&[1])));
        assert!(!l.contains_key(&key(&[1, 1, 1])));

        let mut zero = word(&[1], 0.0);
        n_closure(&mut zero, 0);
        assert!(lang(&zero).contains_key(&key(&[])));
    }

    #[test]
    fn closure_of_empty() {
        let mut e = Fsm::new(Semiring::Tropical);
        closure(&mut e, true);
        assert!(e.is_empty());
        closure(&mut e, false);
        assert_eq!(lang(&e).len(), 1);
    }

    #[test]
    fn reverse_reverses_strings() {
        let mut a = word(&[1, 2, 3], 1.5);
        union(&mut a, &word(&[4], 0.5));
        reverse(&mut a);
        let l = lang(&a);
        assert_eq!(l[&key(&[3, 2, 1])], 1.5);
        assert_eq!(l[&key(&[4])], 0.5);
    }

    #[test]
    fn reverse_is_an_involution() {
        let mut a = word(&[1, 2], 1.0);
        union(&mut a, &word(&[3], 2.0));
        closure(&mut a, true);
        let before = lang(&a);
        let mut twice = a.clone();
        reverse(&mut twice);
        reverse(&mut twice);
        assert!(same_language(Semiring::Tropical, &before, &lang(&twice)));
    }

    #[test]
    fn complete_adds_sink_for_missing_labels() {
        let mut a = word(&[2], 0.0);
        complete(&mut a, &[3, 1, 2], &DeterminizeConfig::default()).unwrap();
        for s in a.states() {
            let labels: Vec<Label> = a.arcs(s).iter().map(|arc| arc.lower).collect();
            assert_eq!(labels, vec![1, 2, 3]);
        }
        assert!(a.is_deterministic());
        assert_eq!(a.sort(), ArcSort::Lower);
    }

    #[test]
    fn complete_sorts_unordered_arcs_first() {
        let mut a = Fsm::new(Semiring::Tropical);
        let s0 = a.add_state();
        let s1 = a.add_state();
        a.set_root(s0);
        a.set_final(s1, 0.0);
        a.add_arc(Arc::new(s0, s1, 3, 3, 0.0));
        a.add_arc(Arc::new(s0, s1, 1, 1, 0.0));
        a.set_deterministic(true);

        complete(&mut a, &[1, 2, 3], &DeterminizeConfig::default()).unwrap();
        let labels: Vec<Label> = a.arcs(s0).iter().map(|arc| arc.lower).collect();
        assert_eq!(labels, vec![1, 2, 3]);
        assert_eq!(a.arcs(s0)[1].target, 2);
    }

    #[test]
    fn complement_flips_acceptance() {
        let sigma = [1, 2];
        let mut a = word(&[1], 0.0);
        complement(&mut a, &sigma, &DeterminizeConfig::default()).unwrap();
        let l = lang(&a);
        assert!(!l.contains_key(&key(&[1])));
        assert!(l.contains_key(&key(&[])));
        assert!(l.contains_key(&key(&[2])));
        assert!(l.contains_key(&key(&[1, 1])));
    }

    #[test]
    fn complement_is_an_involution() {
        let sigma = [1, 2];
        let mut a = word(&[1, 2], 0.0);
        union(&mut a, &word(&[2], 0.0));
        let before = lang(&a);
        let cfg = DeterminizeConfig::default();
        complement(&mut a, &sigma, &cfg).unwrap();
        complement(&mut a, &sigma, &cfg).unwrap();
        a.connect();
        assert!(same_language(Semiring::Tropical, &before, &lang(&a)));
    }

    #[test]
    fn complement_of_empty_is_universal() {
        let mut e = Fsm::new(Semiring::Tropical);
        complement(&mut e, &[1], &DeterminizeConfig::default()).unwrap();
        let l = lang(&e);
        assert!(l.contains_key(&key(&[])));
        assert!(l.contains_key(&key(&[1, 1, 1])));
    }

    #[test]
    fn difference_removes_strings() {
        let mut a = word(&[1], 1.0);
        union(&mut a, &word(&[2], 2.0));
        union(&mut a, &word(&[1, 2], 3.0));
        let mut b = word(&[2], 0.0);
        union(&mut b, &word(&[5], 0.0));
        difference(&mut a, &b, &DeterminizeConfig::default()).unwrap();
        let l = lang(&a);
        assert_eq!(l.len(), 2);
        assert_eq!(l[&key(&[1])], 1.0);
        assert_eq!(l[&key(&[1, 2])], 3.0);
    }

    #[test]
    fn product_builds_a_transducer() {
        let mut a = word(&[1, 2], 1.0);
        product(&mut a, &word(&[7], 2.0));
        assert!(a.is_transducer());
        let l = lang(&a);
        assert_eq!(l.len(), 1);
        assert_eq!(l[&(vec![1, 2], vec![7])], 3.0);
    }

    #[test]
    fn project_and_invert() {
        let mut t = Fsm::linear(Semiring::Tropical, &[(1, 5), (2, 6)], 0.0);
        t.arc_sort(ArcSort::Upper);
        let mut lower = t.clone();
        project(&mut lower, Side::Lower);
        assert!(!lower.is_transducer());
        assert_eq!(lower.sort(), ArcSort::Unsorted);
        assert!(lang(&lower).contains_key(&key(&[1, 2])));

        let mut upper = t.clone();
        project(&mut upper, Side::Upper);
        assert_eq!(upper.sort(), ArcSort::Lower);
        assert!(lang(&upper).contains_key(&key(&[5, 6])));

        let mut inv = t.clone();
        invert(&mut inv);
        assert!(inv.is_transducer());
        assert_eq!(inv.sort(), ArcSort::Lower);
        assert!(lang(&inv).contains_key(&(vec![5, 6], vec![1, 2])));
    }

    #[test]
    fn final_weight_arithmetic() {
        let mut a = Fsm::acceptor(Semiring::Real, &[1], 1.0);
        times_weight(&mut a, 0.5);
        assert_eq!(lang(&a)[&key(&[1])], 0.5);
        plus_weight(&mut a, 0.25);
        assert_eq!(lang(&a)[&key(&[1])], 0.75);
    }

    #[test]
    fn replace_splices_sub_automaton() {
        // 1 NT 3, with NT := 4 5 | 6
        let nonterminal = 100;
        let mut a = word(&[1, nonterminal, 3], 1.0);
        let mut sub = word(&[4, 5], 0.5);
        union(&mut sub, &word(&[6], 0.25));
        replace(&mut a, nonterminal, &sub);
        let l = lang(&a);
        assert_eq!(l.len(), 2);
        assert_eq!(l[&key(&[1, 4, 5, 3])], 1.5);
        assert_eq!(l[&key(&[1, 6, 3])], 1.25);
    }
}
