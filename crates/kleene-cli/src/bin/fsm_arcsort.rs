// fsm-arcsort: Sort the arcs of every state.
//
// Usage:
//   fsm-arcsort [--sort-type TYPE] [IN [OUT]]
//
// Options:
//   --sort-type TYPE       lower (default), upper, weight or none
//   -h, --help             Print help

use kleene_fst::ArcSort;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (verbose, args) = kleene_cli::parse_verbosity(&args);
    let (sort_type, args) = kleene_cli::parse_option(&args, "--sort-type", "--sort-type");

    if kleene_cli::wants_help(&args) {
        println!("fsm-arcsort: Sort the arcs of every state.");
        println!();
        println!("Usage: fsm-arcsort [--sort-type TYPE] [IN [OUT]]");
        println!();
        println!("Options:");
        println!("  --sort-type TYPE       lower (default), upper, weight or none");
        println!("  -h, --help             Print this help");
        return;
    }
    kleene_cli::init_logging(verbose);

    let name = sort_type.as_deref().unwrap_or("lower");
    let mode = ArcSort::from_name(name)
        .unwrap_or_else(|| kleene_cli::fatal(&format!("unknown sort type {name:?}")));

    let files = kleene_cli::positional(&args);
    let (mut fsm, alphabet) = kleene_cli::load_fsm(files.first().map(String::as_str))
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
    fsm.arc_sort(mode);
    kleene_cli::save_fsm(files.get(1).map(String::as_str), &fsm, alphabet.as_ref())
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
}
