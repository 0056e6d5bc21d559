// fsm-compile: Compile AT&T text into a binary automaton.
//
// Reads arc lines `src dst lower upper [weight]` (or `src dst label
// [weight]` with --acceptor) and final lines `state [weight]`. The first
// line's source state is the root.
//
// Usage:
//   fsm-compile [-s SYMBOLS] [--semiring NAME] [--acceptor] [TEXT [OUT]]
//
// Options:
//   -s, --symbols FILE     Symbol file; labels are symbols (default: $KLEENE_SYMBOLS)
//   --semiring NAME        tropical (default), log, real or boolean
//   -a, --acceptor         One label per arc line
//   -v                     More logging (repeatable)
//   -h, --help             Print help

use kleene_fst::text;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (verbose, args) = kleene_cli::parse_verbosity(&args);
    let (symbols, args) = kleene_cli::parse_symbols(&args);
    let (semiring, args) = kleene_cli::parse_option(&args, "--semiring", "--semiring");
    let (acceptor, args) = kleene_cli::parse_flag(&args, "-a", "--acceptor");

    if kleene_cli::wants_help(&args) {
        println!("fsm-compile: Compile AT&T text into a binary automaton.");
        println!();
        println!("Usage: fsm-compile [-s SYMBOLS] [--semiring NAME] [--acceptor] [TEXT [OUT]]");
        println!();
        println!("TEXT and OUT default to stdin and stdout.");
        println!();
        println!("Options:");
        println!("  -s, --symbols FILE     Symbol file (default: $KLEENE_SYMBOLS)");
        println!("  --semiring NAME        tropical (default), log, real or boolean");
        println!("  -a, --acceptor         One label per arc line");
        println!("  -v                     More logging (repeatable)");
        println!("  -h, --help             Print this help");
        return;
    }
    kleene_cli::init_logging(verbose);

    let files = kleene_cli::positional(&args);
    let semiring = kleene_cli::parse_semiring(semiring.as_deref().unwrap_or("tropical"))
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
    let mut alphabet = kleene_cli::load_optional_symbols(symbols.as_deref())
        .unwrap_or_else(|e| kleene_cli::fatal(&e));

    let data = kleene_cli::read_input(files.first().map(String::as_str))
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
    let source = String::from_utf8(data).unwrap_or_else(|_| kleene_cli::fatal("input is not UTF-8"));
    let fsm = text::parse(&source, semiring, alphabet.as_mut(), acceptor)
        .unwrap_or_else(|e| kleene_cli::fatal(&e.to_string()));
    log::info!(
        "compiled {} states, {} arcs",
        fsm.num_states(),
        fsm.num_arcs()
    );

    kleene_cli::save_fsm(files.get(1).map(String::as_str), &fsm, alphabet.as_ref())
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
}
