// fsm-determinize: Weighted subset construction.
//
// Usage:
//   fsm-determinize [--max-states N] [IN [OUT]]
//
// Options:
//   --max-states N         Give up once the result has N states
//   -h, --help             Print help

use kleene_fst::config::DeterminizeConfig;
use kleene_fst::determinize;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (verbose, args) = kleene_cli::parse_verbosity(&args);
    let (max_states, args) = kleene_cli::parse_option(&args, "--max-states", "--max-states");

    if kleene_cli::wants_help(&args) {
        println!("fsm-determinize: Weighted subset construction.");
        println!();
        println!("Usage: fsm-determinize [--max-states N] [IN [OUT]]");
        println!();
        println!("Options:");
        println!("  --max-states N         Give up once the result has N states");
        println!("  -h, --help             Print this help");
        return;
    }
    kleene_cli::init_logging(verbose);

    let cfg = DeterminizeConfig {
        max_states: max_states.map(|n| {
            n.parse()
                .unwrap_or_else(|_| kleene_cli::fatal(&format!("bad --max-states {n:?}")))
        }),
        ..DeterminizeConfig::default()
    };

    let files = kleene_cli::positional(&args);
    let (mut fsm, alphabet) = kleene_cli::load_fsm(files.first().map(String::as_str))
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
    determinize::determinize(&mut fsm, &cfg).unwrap_or_else(|e| kleene_cli::fatal(&e.to_string()));
    kleene_cli::save_fsm(files.get(1).map(String::as_str), &fsm, alphabet.as_ref())
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
}
