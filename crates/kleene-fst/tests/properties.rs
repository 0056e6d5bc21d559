//! Algebraic properties of the automaton operations, checked on randomly
//! generated finite languages.
//!
//! Languages are compared through bounded path enumeration, so every
//! automaton checked here is acyclic or trimmed to be.
//!
//! Run: cargo test -p kleene-fst --test properties

use kleene_fst::config::{DeterminizeConfig, LookupConfig, PathConfig};
use kleene_fst::rational::{self, Side};
use kleene_fst::shortest::{Language, language, same_language};
use kleene_fst::{Fsm, Label, Semiring, compose, determinize, format, lookup, minimize, text};
use proptest::prelude::*;

const SR: Semiring = Semiring::Tropical;

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// A weighted entry: label pairs plus an integral tropical weight, so sums
/// are exact.
type Entry = (Vec<(Label, Label)>, u8);

fn acceptor_entries() -> impl Strategy<Value = Vec<Entry>> {
    prop::collection::vec(
        (prop::collection::vec((1u32..4).prop_map(|l| (l, l)), 0..4), 0u8..8),
        1..5,
    )
}

fn transducer_entries() -> impl Strategy<Value = Vec<Entry>> {
    prop::collection::vec(
        (prop::collection::vec((0u32..4, 0u32..4), 0..4), 0u8..8),
        1..5,
    )
}

fn build(entries: &[Entry]) -> Fsm {
    let mut fsm = Fsm::new(SR);
    for (pairs, w) in entries {
        rational::union(&mut fsm, &Fsm::linear(SR, pairs, f64::from(*w)));
    }
    fsm
}

fn lang(fsm: &Fsm) -> Language {
    language(fsm, &PathConfig::default())
}

fn same(a: &Fsm, b: &Fsm) -> bool {
    same_language(SR, &lang(a), &lang(b))
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn union_is_idempotent(entries in acceptor_entries()) {
        let a = build(&entries);
        let mut u = a.clone();
        rational::union(&mut u, &a);
        prop_assert!(same(&a, &u));
    }

    #[test]
    fn concat_is_associative(x in acceptor_entries(), y in acceptor_entries(), z in acceptor_entries()) {
        let (x, y, z) = (build(&x), build(&y), build(&z));
        let mut left = x.clone();
        rational::concat(&mut left, &y);
        rational::concat(&mut left, &z);
        let mut yz = y.clone();
        rational::concat(&mut yz, &z);
        let mut right = x;
        rational::concat(&mut right, &yz);
        prop_assert!(same(&left, &right));
    }

    #[test]
    fn reverse_is_an_involution(entries in transducer_entries()) {
        let a = build(&entries);
        let mut twice = a.clone();
        rational::reverse(&mut twice);
        rational::reverse(&mut twice);
        prop_assert!(same(&a, &twice));
    }

    #[test]
    fn determinize_preserves_language_and_is_idempotent(entries in transducer_entries()) {
        let a = build(&entries);
        let cfg = DeterminizeConfig::default();
        let once = determinize::determinized(&a, &cfg).unwrap();
        prop_assert!(same(&a, &once));
        let twice = determinize::determinized(&once, &cfg).unwrap();
        prop_assert_eq!(once.num_states(), twice.num_states());
        prop_assert_eq!(once.num_arcs(), twice.num_arcs());
    }

    #[test]
    fn minimize_reaches_a_fixpoint(entries in acceptor_entries()) {
        let a = build(&entries);
        let cfg = DeterminizeConfig::default();
        let mut m = a.clone();
        minimize::minimize(&mut m, true, &cfg).unwrap();
        prop_assert!(same(&a, &m));
        let (states, arcs) = (m.num_states(), m.num_arcs());
        minimize::minimize(&mut m, true, &cfg).unwrap();
        prop_assert_eq!(m.num_states(), states);
        prop_assert_eq!(m.num_arcs(), arcs);
    }

    #[test]
    fn compact_preserves_weighted_language(entries in transducer_entries(), extra in 1u8..6) {
        let mut a = build(&entries);
        rational::times_weight(&mut a, f64::from(extra));
        let mut c = a.clone();
        minimize::compact(&mut c, true, &DeterminizeConfig::default()).unwrap();
        prop_assert!(same(&a, &c));
    }

    #[test]
    fn complement_is_an_involution(words in prop::collection::vec(prop::collection::vec(1u32..4, 0..4), 1..5)) {
        let entries: Vec<Entry> = words
            .iter()
            .map(|w| (w.iter().map(|&l| (l, l)).collect(), 0))
            .collect();
        let a = build(&entries);
        let sigma = [1, 2, 3];
        let cfg = DeterminizeConfig::default();
        let mut c = a.clone();
        rational::complement(&mut c, &sigma, &cfg).unwrap();
        rational::complement(&mut c, &sigma, &cfg).unwrap();
        c.connect();
        prop_assert!(same(&a, &c));
    }

    #[test]
    fn lookup_agrees_with_composition(entries in transducer_entries(), input in prop::collection::vec(1u32..4, 0..4)) {
        let t = build(&entries);
        let looked_up = lookup::lookup(&t, &input, &LookupConfig::default()).unwrap();

        let word = Fsm::acceptor(SR, &input, SR.one());
        let mut composed = compose::compose(&word, &t);
        rational::project(&mut composed, Side::Upper);
        prop_assert!(same(&looked_up, &composed));
    }

    #[test]
    fn binary_format_round_trips(entries in transducer_entries()) {
        let a = build(&entries);
        let (loaded, _) = format::from_bytes(&format::to_bytes(&a, None)).unwrap();
        prop_assert_eq!(text::print(&loaded, None), text::print(&a, None));
        prop_assert_eq!(loaded.finals(), a.finals());
    }

    #[test]
    fn text_format_round_trips(entries in transducer_entries()) {
        let a = build(&entries);
        let printed = text::print(&a, None);
        let parsed = text::parse(&printed, SR, None, !a.is_transducer()).unwrap();
        prop_assert_eq!(text::print(&parsed, None), printed);
        prop_assert!(same(&a, &parsed));
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn compose_with_inverse_restricts_to_domain() {
    let t = build(&[(vec![(1, 2), (3, 4)], 1), (vec![(1, 5)], 2)]);
    let mut inverse = t.clone();
    rational::invert(&mut inverse);
    let mut round = compose::compose(&t, &inverse);
    rational::project(&mut round, Side::Lower);
    let l = lang(&round);
    assert_eq!(l.len(), 2);
    assert_eq!(l[&(vec![1, 3], vec![1, 3])], 2.0);
    assert_eq!(l[&(vec![1], vec![1])], 4.0);
}

#[test]
fn weighted_pipeline_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lexicon.fsm");

    let mut lexicon = build(&[
        (vec![(1, 1), (2, 2)], 3),
        (vec![(1, 1), (3, 3)], 1),
        (vec![(1, 1), (2, 2)], 2),
    ]);
    let before = lang(&lexicon);
    minimize::minimize(&mut lexicon, true, &DeterminizeConfig::default()).unwrap();
    format::save(&path, &lexicon, None).unwrap();

    let (loaded, _) = format::load(&path).unwrap();
    assert!(loaded.is_deterministic());
    assert!(same_language(SR, &before, &lang(&loaded)));
    assert_eq!(before[&(vec![1, 2], vec![1, 2])], 2.0);
}
