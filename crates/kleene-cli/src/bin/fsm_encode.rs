// fsm-encode: Fold each arc's (lower, upper, weight) into one label.
//
// The encode table needed by fsm-decode is written as text to TABLE.
//
// Usage:
//   fsm-encode --table TABLE [IN [OUT]]
//
// Options:
//   -t, --table FILE       Where to write the encode table (required)
//   -h, --help             Print help

use kleene_fst::encode;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (verbose, args) = kleene_cli::parse_verbosity(&args);
    let (table_path, args) = kleene_cli::parse_option(&args, "-t", "--table");

    if kleene_cli::wants_help(&args) {
        println!("fsm-encode: Fold each arc's (lower, upper, weight) into one label.");
        println!();
        println!("Usage: fsm-encode --table TABLE [IN [OUT]]");
        println!();
        println!("Options:");
        println!("  -t, --table FILE       Where to write the encode table (required)");
        println!("  -h, --help             Print this help");
        return;
    }
    kleene_cli::init_logging(verbose);

    let table_path = table_path.unwrap_or_else(|| kleene_cli::fatal("--table is required"));
    let files = kleene_cli::positional(&args);
    // The embedded symbol table no longer describes the encoded labels.
    let (mut fsm, _) = kleene_cli::load_fsm(files.first().map(String::as_str))
        .unwrap_or_else(|e| kleene_cli::fatal(&e));

    let table = encode::encode(&mut fsm);
    std::fs::write(&table_path, table.to_text())
        .unwrap_or_else(|e| kleene_cli::fatal(&format!("failed to write {table_path}: {e}")));
    kleene_cli::save_fsm(files.get(1).map(String::as_str), &fsm, None)
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
}
