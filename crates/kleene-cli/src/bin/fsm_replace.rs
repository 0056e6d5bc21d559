// fsm-replace: Substitute an automaton for every arc with a given label.
//
// Every arc of A whose lower label is LABEL is replaced by a copy of B. With
// a symbol table (embedded in A or given with -s) LABEL is a symbol,
// otherwise an integer.
//
// Usage:
//   fsm-replace --label LABEL [-s SYMBOLS] A B [OUT]
//
// Options:
//   -l, --label LABEL      Label to replace (required)
//   -s, --symbols FILE     Symbol file (overrides the embedded table)
//   -h, --help             Print help

use kleene_fst::rational;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (verbose, args) = kleene_cli::parse_verbosity(&args);
    let (label, args) = kleene_cli::parse_option(&args, "-l", "--label");
    let (symbols, args) = kleene_cli::parse_symbols(&args);

    if kleene_cli::wants_help(&args) {
        println!("fsm-replace: Substitute an automaton for every arc with a given label.");
        println!();
        println!("Usage: fsm-replace --label LABEL [-s SYMBOLS] A B [OUT]");
        println!();
        println!("Options:");
        println!("  -l, --label LABEL      Label to replace (required)");
        println!("  -s, --symbols FILE     Symbol file (overrides the embedded table)");
        println!("  -h, --help             Print this help");
        return;
    }
    kleene_cli::init_logging(verbose);

    let label = label.unwrap_or_else(|| kleene_cli::fatal("--label is required"));
    let files = kleene_cli::positional(&args);
    if files.len() < 2 {
        kleene_cli::fatal("fsm-replace needs two input automata");
    }
    let (mut a, embedded) =
        kleene_cli::load_fsm(Some(files[0].as_str())).unwrap_or_else(|e| kleene_cli::fatal(&e));
    let (b, _) = kleene_cli::load_fsm(Some(files[1].as_str())).unwrap_or_else(|e| kleene_cli::fatal(&e));
    let alphabet = kleene_cli::load_optional_symbols(symbols.as_deref())
        .unwrap_or_else(|e| kleene_cli::fatal(&e))
        .or(embedded);

    let labels = kleene_cli::parse_labels(&label, alphabet.as_ref())
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
    let [label] = labels.as_slice() else {
        kleene_cli::fatal(&format!("--label takes exactly one label, got {label:?}"));
    };

    rational::replace(&mut a, *label, &b);
    kleene_cli::save_fsm(files.get(2).map(String::as_str), &a, alphabet.as_ref())
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
}
