// fsm-compose: Compose two transducers.
//
// The result maps the first automaton's lower strings to the second's
// upper strings. The first automaton's symbol table is kept.
//
// Usage:
//   fsm-compose A B [OUT]
//
// Options:
//   -h, --help             Print help

use kleene_fst::compose;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (verbose, args) = kleene_cli::parse_verbosity(&args);

    if kleene_cli::wants_help(&args) {
        println!("fsm-compose: Compose two transducers.");
        println!();
        println!("Usage: fsm-compose A B [OUT]");
        println!();
        println!("Options:");
        println!("  -h, --help             Print this help");
        return;
    }
    kleene_cli::init_logging(verbose);

    let files = kleene_cli::positional(&args);
    if files.len() < 2 {
        kleene_cli::fatal("fsm-compose needs two input automata");
    }
    let (a, alphabet) =
        kleene_cli::load_fsm(Some(files[0].as_str())).unwrap_or_else(|e| kleene_cli::fatal(&e));
    let (b, _) = kleene_cli::load_fsm(Some(files[1].as_str())).unwrap_or_else(|e| kleene_cli::fatal(&e));
    if a.semiring() != b.semiring() {
        kleene_cli::fatal(&format!(
            "semiring mismatch: {} vs {}",
            a.semiring().name(),
            b.semiring().name()
        ));
    }

    let c = compose::compose(&a, &b);
    kleene_cli::save_fsm(files.get(2).map(String::as_str), &c, alphabet.as_ref())
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
}
