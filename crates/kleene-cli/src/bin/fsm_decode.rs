// fsm-decode: Undo fsm-encode.
//
// Usage:
//   fsm-decode --table TABLE [-s SYMBOLS] [IN [OUT]]
//
// Options:
//   -t, --table FILE       Encode table written by fsm-encode (required)
//   -s, --symbols FILE     Symbol table to embed in the output
//   -h, --help             Print help

use kleene_fst::encode::{self, EncodeTable};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (verbose, args) = kleene_cli::parse_verbosity(&args);
    let (table_path, args) = kleene_cli::parse_option(&args, "-t", "--table");
    let (symbols, args) = kleene_cli::parse_symbols(&args);

    if kleene_cli::wants_help(&args) {
        println!("fsm-decode: Undo fsm-encode.");
        println!();
        println!("Usage: fsm-decode --table TABLE [-s SYMBOLS] [IN [OUT]]");
        println!();
        println!("Options:");
        println!("  -t, --table FILE       Encode table written by fsm-encode (required)");
        println!("  -s, --symbols FILE     Symbol table to embed in the output");
        println!("  -h, --help             Print this help");
        return;
    }
    kleene_cli::init_logging(verbose);

    let table_path = table_path.unwrap_or_else(|| kleene_cli::fatal("--table is required"));
    let table_text = std::fs::read_to_string(&table_path)
        .unwrap_or_else(|e| kleene_cli::fatal(&format!("failed to read {table_path}: {e}")));
    let table = EncodeTable::from_text(&table_text)
        .unwrap_or_else(|e| kleene_cli::fatal(&format!("{table_path}: {e}")));
    let alphabet = kleene_cli::load_optional_symbols(symbols.as_deref())
        .unwrap_or_else(|e| kleene_cli::fatal(&e));

    let files = kleene_cli::positional(&args);
    let (mut fsm, _) = kleene_cli::load_fsm(files.first().map(String::as_str))
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
    encode::decode(&mut fsm, &table).unwrap_or_else(|e| kleene_cli::fatal(&e.to_string()));
    kleene_cli::save_fsm(files.get(1).map(String::as_str), &fsm, alphabet.as_ref())
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
}
