// fsm-project: Keep one side of a transducer.
//
// Usage:
//   fsm-project [--side lower|upper] [IN [OUT]]
//
// Options:
//   --side SIDE            lower (default) or upper
//   -h, --help             Print help

use kleene_fst::rational::{self, Side};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (verbose, args) = kleene_cli::parse_verbosity(&args);
    let (side, args) = kleene_cli::parse_option(&args, "--side", "--side");

    if kleene_cli::wants_help(&args) {
        println!("fsm-project: Keep one side of a transducer.");
        println!();
        println!("Usage: fsm-project [--side lower|upper] [IN [OUT]]");
        println!();
        println!("Options:");
        println!("  --side SIDE            lower (default) or upper");
        println!("  -h, --help             Print this help");
        return;
    }
    kleene_cli::init_logging(verbose);

    let side = match side.as_deref().unwrap_or("lower") {
        "lower" | "input" => Side::Lower,
        "upper" | "output" => Side::Upper,
        other => kleene_cli::fatal(&format!("unknown side {other:?}")),
    };

    let files = kleene_cli::positional(&args);
    let (mut fsm, alphabet) = kleene_cli::load_fsm(files.first().map(String::as_str))
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
    rational::project(&mut fsm, side);
    kleene_cli::save_fsm(files.get(1).map(String::as_str), &fsm, alphabet.as_ref())
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
}
