// fsm-minimize: Brzozowski minimization.
//
// Usage:
//   fsm-minimize [--rmeps] [--compact] [IN [OUT]]
//
// Options:
//   --rmeps                Remove epsilons before each determinization
//   --compact              Minimize over encoded (lower, upper, weight) arcs
//   -h, --help             Print help

use kleene_fst::config::DeterminizeConfig;
use kleene_fst::minimize;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (verbose, args) = kleene_cli::parse_verbosity(&args);
    let (rmeps, args) = kleene_cli::parse_flag(&args, "--rmeps", "--rmeps");
    let (compact, args) = kleene_cli::parse_flag(&args, "--compact", "--compact");

    if kleene_cli::wants_help(&args) {
        println!("fsm-minimize: Brzozowski minimization.");
        println!();
        println!("Usage: fsm-minimize [--rmeps] [--compact] [IN [OUT]]");
        println!();
        println!("Options:");
        println!("  --rmeps                Remove epsilons before each determinization");
        println!("  --compact              Minimize over encoded (lower, upper, weight) arcs");
        println!("  -h, --help             Print this help");
        return;
    }
    kleene_cli::init_logging(verbose);

    let files = kleene_cli::positional(&args);
    let (mut fsm, alphabet) = kleene_cli::load_fsm(files.first().map(String::as_str))
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
    let cfg = DeterminizeConfig::default();
    let result = if compact {
        minimize::compact(&mut fsm, rmeps, &cfg)
    } else {
        minimize::minimize(&mut fsm, rmeps, &cfg)
    };
    result.unwrap_or_else(|e| kleene_cli::fatal(&e.to_string()));
    kleene_cli::save_fsm(files.get(1).map(String::as_str), &fsm, alphabet.as_ref())
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
}
