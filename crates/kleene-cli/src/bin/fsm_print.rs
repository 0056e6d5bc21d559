// fsm-print: Print a binary automaton as AT&T text.
//
// Labels are printed as symbols when the automaton carries a symbol table
// or one is given with -s; otherwise as integers.
//
// Usage:
//   fsm-print [-s SYMBOLS] [--numeric] [IN [OUT]]
//
// Options:
//   -s, --symbols FILE     Symbol file (overrides the embedded table)
//   -n, --numeric          Print integer labels
//   -h, --help             Print help

use kleene_fst::text;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (verbose, args) = kleene_cli::parse_verbosity(&args);
    let (symbols, args) = kleene_cli::parse_symbols(&args);
    let (numeric, args) = kleene_cli::parse_flag(&args, "-n", "--numeric");

    if kleene_cli::wants_help(&args) {
        println!("fsm-print: Print a binary automaton as AT&T text.");
        println!();
        println!("Usage: fsm-print [-s SYMBOLS] [--numeric] [IN [OUT]]");
        println!();
        println!("Options:");
        println!("  -s, --symbols FILE     Symbol file (overrides the embedded table)");
        println!("  -n, --numeric          Print integer labels");
        println!("  -h, --help             Print this help");
        return;
    }
    kleene_cli::init_logging(verbose);

    let files = kleene_cli::positional(&args);
    let (fsm, embedded) = kleene_cli::load_fsm(files.first().map(String::as_str))
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
    let given = kleene_cli::load_optional_symbols(symbols.as_deref())
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
    let alphabet = if numeric { None } else { given.or(embedded) };

    let out = text::print(&fsm, alphabet.as_ref());
    kleene_cli::write_output(files.get(1).map(String::as_str), out.as_bytes())
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
}
