// fsm-renumber: Compact state ids to 0..N-1, root first.
//
// Usage:
//   fsm-renumber [--connect] [IN [OUT]]
//
// Options:
//   -c, --connect          Drop states not on a root-to-final path first
//   -h, --help             Print help

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (verbose, args) = kleene_cli::parse_verbosity(&args);
    let (connect, args) = kleene_cli::parse_flag(&args, "-c", "--connect");

    if kleene_cli::wants_help(&args) {
        println!("fsm-renumber: Compact state ids to 0..N-1, root first.");
        println!();
        println!("Usage: fsm-renumber [--connect] [IN [OUT]]");
        println!();
        println!("Options:");
        println!("  -c, --connect          Drop states not on a root-to-final path first");
        println!("  -h, --help             Print this help");
        return;
    }
    kleene_cli::init_logging(verbose);

    let files = kleene_cli::positional(&args);
    let (mut fsm, alphabet) = kleene_cli::load_fsm(files.first().map(String::as_str))
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
    if connect {
        fsm.connect();
    }
    fsm.renumber();
    log::info!("{} states, {} arcs", fsm.num_states(), fsm.num_arcs());
    kleene_cli::save_fsm(files.get(1).map(String::as_str), &fsm, alphabet.as_ref())
        .unwrap_or_else(|e| kleene_cli::fatal(&e));
}
