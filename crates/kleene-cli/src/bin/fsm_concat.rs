// fsm-concat: Concatenate two automata.
//
// Usage:
//   fsm-concat A B [OUT]
//
// Options:
//   -h, --help             Print help

use kleene_fst::rational;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (verbose, args) = kleene_cli::parse_verbosity(&args);

    if kleene_cli::wants_help(&args) {
        println!("fsm-concat: Concatenate two automata.");
        println!();
        println!("Usage: fsm-concat A B [OUT]");
        println!();
        println!("Options:");
        println!("  -h, --help             Print this help");
        return;
    }
    kleene_cli::init_logging(verbose);

    let files = kleene_cli::positional(&args);
    if files.len() < 2 {
        kleene_cli::fatal("fsm-concat needs two input automata");
    }
    let (mut a, alphabet) =
        kleene_cli::load_fsm(Some(files[0].as_str())).unwrap_or_else(|e| kleene_cli::fatal(&e));
    let (b, _) = kleene_cli::load_fsm(Some(files[1].as_str())).unwrap_or_else(|e| kleene_cli::fatal(&e));
    if a.semiring() != b.semiring() {
        kleene_cli::fatal("semiring mismatch");
    }

    rational::concat(&mut a, &b);
    kleene_cli::save_fsm(files.get(2).map(String::as_str), &a, alphabet.as_ref())
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
}
