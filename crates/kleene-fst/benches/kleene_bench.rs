// Criterion benchmarks for kleene-fst.
//
// The automata are generated: a lexicon of pseudo-random words over a small
// alphabet, mapped to outputs by a letter-shifting transducer.
//
// Run:
//   cargo bench -p kleene-fst

use criterion::{Criterion, criterion_group, criterion_main};
use kleene_fst::config::{DeterminizeConfig, LookupConfig};
use kleene_fst::{Fsm, Label, Semiring, compose, determinize, format, lookup, minimize, rational};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const ALPHABET: Label = 8;

/// Deterministic word list (linear congruential generator).
fn words(count: usize, max_len: usize) -> Vec<Vec<Label>> {
    let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next = move || {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (seed >> 33) as usize
    };
    (0..count)
        .map(|_| {
            let len = 1 + next() % max_len;
            (0..len).map(|_| 1 + (next() % ALPHABET as usize) as Label).collect()
        })
        .collect()
}

fn lexicon(count: usize) -> Fsm {
    let mut fsm = Fsm::new(Semiring::Tropical);
    for (i, w) in words(count, 8).iter().enumerate() {
        rational::union(&mut fsm, &Fsm::acceptor(Semiring::Tropical, w, (i % 5) as f64));
    }
    fsm
}

/// One-state transducer mapping each letter to the next one.
fn shifter() -> Fsm {
    let mut fsm = Fsm::new(Semiring::Tropical);
    let s = fsm.add_state();
    fsm.set_root(s);
    fsm.set_final(s, 0.0);
    for l in 1..=ALPHABET {
        fsm.add_arc(kleene_fst::Arc::new(s, s, l, l % ALPHABET + 1, 0.0));
    }
    fsm
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Determinize a 500-word lexicon built by union.
fn bench_determinize(c: &mut Criterion) {
    let fsm = lexicon(500);
    let cfg = DeterminizeConfig::default();
    c.bench_function("determinize_500_words", |b| {
        b.iter(|| std::hint::black_box(determinize::determinized(&fsm, &cfg)))
    });
}

/// Brzozowski-minimize a 200-word lexicon.
fn bench_minimize(c: &mut Criterion) {
    let fsm = lexicon(200);
    let cfg = DeterminizeConfig::default();
    c.bench_function("minimize_200_words", |b| {
        b.iter(|| {
            let mut m = fsm.clone();
            std::hint::black_box(minimize::minimize(&mut m, true, &cfg))
        })
    });
}

/// Compose a minimized lexicon with the shifting transducer.
fn bench_compose(c: &mut Criterion) {
    let mut lex = lexicon(200);
    if minimize::minimize(&mut lex, true, &DeterminizeConfig::default()).is_err() {
        eprintln!("[bench_compose] minimization failed, skipping");
        return;
    }
    let shift = shifter();
    c.bench_function("compose_200_words", |b| {
        b.iter(|| std::hint::black_box(compose::compose(&lex, &shift)))
    });
}

/// Look up 100 words through lexicon ∘ shifter.
fn bench_lookup(c: &mut Criterion) {
    let lex = lexicon(300);
    let composed = compose::compose(&lex, &shifter());
    let inputs = words(100, 8);
    let cfg = LookupConfig::default();
    c.bench_function("lookup_100_words", |b| {
        b.iter(|| {
            for input in &inputs {
                std::hint::black_box(lookup::lookup(&composed, input, &cfg).ok());
            }
        })
    });
}

/// Serialize and reload a 1000-word lexicon.
fn bench_binary_round_trip(c: &mut Criterion) {
    let fsm = lexicon(1000);
    c.bench_function("binary_round_trip_1000_words", |b| {
        b.iter(|| {
            let bytes = format::to_bytes(&fsm, None);
            std::hint::black_box(format::from_bytes(&bytes).ok())
        })
    });
}

criterion_group!(
    benches,
    bench_determinize,
    bench_minimize,
    bench_compose,
    bench_lookup,
    bench_binary_round_trip
);
criterion_main!(benches);
