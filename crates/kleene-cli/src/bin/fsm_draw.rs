// fsm-draw: Render a binary automaton as a Graphviz digraph.
//
// Usage:
//   fsm-draw [-s SYMBOLS] [--title TITLE] [IN [OUT]]
//
// Options:
//   -s, --symbols FILE     Symbol file (overrides the embedded table)
//   --title TITLE          Graph name (default: the input file name)
//   -h, --help             Print help
//
// Example:
//   fsm-draw lexicon.fsm | dot -Tsvg > lexicon.svg

use kleene_fst::dot;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (verbose, args) = kleene_cli::parse_verbosity(&args);
    let (symbols, args) = kleene_cli::parse_symbols(&args);
    let (title, args) = kleene_cli::parse_option(&args, "--title", "--title");

    if kleene_cli::wants_help(&args) {
        println!("fsm-draw: Render a binary automaton as a Graphviz digraph.");
        println!();
        println!("Usage: fsm-draw [-s SYMBOLS] [--title TITLE] [IN [OUT]]");
        println!();
        println!("Options:");
        println!("  -s, --symbols FILE     Symbol file (overrides the embedded table)");
        println!("  --title TITLE          Graph name (default: the input file name)");
        println!("  -h, --help             Print this help");
        return;
    }
    kleene_cli::init_logging(verbose);

    let files = kleene_cli::positional(&args);
    let input = files.first().map(String::as_str);
    let (fsm, embedded) = kleene_cli::load_fsm(input).unwrap_or_else(|e| kleene_cli::fatal(&e));
    let alphabet = kleene_cli::load_optional_symbols(symbols.as_deref())
        .unwrap_or_else(|e| kleene_cli::fatal(&e))
        .or(embedded);
    let title = title.unwrap_or_else(|| input.unwrap_or("fsm").to_string());

    let out = dot::draw(&fsm, alphabet.as_ref(), &title);
    kleene_cli::write_output(files.get(1).map(String::as_str), out.as_bytes())
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
}
