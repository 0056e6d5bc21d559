// fsm-lookup: Transduce label sequences through an automaton.
//
// Each input is a whitespace-separated label sequence (symbols with -s or an
// embedded symbol table, integers otherwise). Inputs come from the command
// line after the automaton, or one per line on stdin. For every output the
// tool prints `input<TAB>output<TAB>weight`, preferred weights first; inputs
// without output print `input<TAB>?`.
//
// Usage:
//   fsm-lookup [-s SYMBOLS] [--max-states N] [--max-paths N] FSM [INPUT...]
//
// Options:
//   -s, --symbols FILE     Symbol file (overrides the embedded table)
//   --max-states N         Fail an input whose result exceeds N states
//   --max-paths N          Print at most N outputs per input (default: 100)
//   -h, --help             Print help
//
// Example:
//   echo "c a t" | fsm-lookup -s letters.syms plural.fsm

use std::io::{self, BufRead};

use kleene_fst::alphabet::Alphabet;
use kleene_fst::config::{LookupConfig, PathConfig};
use kleene_fst::{Fsm, Label, lookup, shortest};

fn render(labels: &[Label], alphabet: Option<&Alphabet>) -> String {
    labels
        .iter()
        .map(|&l| match alphabet {
            Some(a) => a.display(l),
            None => l.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn lookup_one(
    fsm: &Fsm,
    input: &str,
    alphabet: Option<&Alphabet>,
    cfg: &LookupConfig,
    paths: &PathConfig,
) -> Result<Vec<String>, String> {
    let labels = kleene_cli::parse_labels(input, alphabet)?;
    let result = lookup::lookup(fsm, &labels, cfg).map_err(|e| e.to_string())?;
    let sr = fsm.semiring();
    let mut outputs = shortest::paths(&result, paths);
    outputs.sort_by(|a, b| {
        if sr.less_than(a.weight, b.weight) {
            std::cmp::Ordering::Less
        } else if sr.less_than(b.weight, a.weight) {
            std::cmp::Ordering::Greater
        } else {
            a.upper.cmp(&b.upper)
        }
    });
    let input = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if outputs.is_empty() {
        return Ok(vec![format!("{input}\t?")]);
    }
    Ok(outputs
        .iter()
        .map(|p| format!("{input}\t{}\t{}", render(&p.upper, alphabet), p.weight))
        .collect())
}

fn parse_count(value: Option<String>, name: &str) -> Option<usize> {
    value.map(|v| {
        v.parse()
            .unwrap_or_else(|_| kleene_cli::fatal(&format!("bad {name} {v:?}")))
    })
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (verbose, args) = kleene_cli::parse_verbosity(&args);
    let (symbols, args) = kleene_cli::parse_symbols(&args);
    let (max_states, args) = kleene_cli::parse_option(&args, "--max-states", "--max-states");
    let (max_paths, args) = kleene_cli::parse_option(&args, "--max-paths", "--max-paths");

    if kleene_cli::wants_help(&args) {
        println!("fsm-lookup: Transduce label sequences through an automaton.");
        println!();
        println!("Usage: fsm-lookup [-s SYMBOLS] [--max-states N] [--max-paths N] FSM [INPUT...]");
        println!();
        println!("Inputs are read one per line from stdin when none are given.");
        println!();
        println!("Options:");
        println!("  -s, --symbols FILE     Symbol file (overrides the embedded table)");
        println!("  --max-states N         Fail an input whose result exceeds N states");
        println!("  --max-paths N          Print at most N outputs per input (default: 100)");
        println!("  -h, --help             Print this help");
        return;
    }
    kleene_cli::init_logging(verbose);

    let cfg = LookupConfig {
        max_states: parse_count(max_states, "--max-states"),
    };
    let paths = PathConfig {
        max_paths: parse_count(max_paths, "--max-paths").unwrap_or(100),
        ..PathConfig::default()
    };

    let files = kleene_cli::positional(&args);
    let Some(fsm_path) = files.first() else {
        kleene_cli::fatal("fsm-lookup needs an automaton");
    };
    let (fsm, embedded) =
        kleene_cli::load_fsm(Some(fsm_path.as_str())).unwrap_or_else(|e| kleene_cli::fatal(&e));
    let alphabet = kleene_cli::load_optional_symbols(symbols.as_deref())
        .unwrap_or_else(|e| kleene_cli::fatal(&e))
        .or(embedded);

    let mut failed = false;
    let mut run = |input: &str| match lookup_one(&fsm, input, alphabet.as_ref(), &cfg, &paths) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        Err(e) => {
            eprintln!("error: {input}: {e}");
            failed = true;
        }
    };

    if files.len() > 1 {
        for input in &files[1..] {
            run(input);
        }
    } else {
        for line in io::stdin().lock().lines() {
            let line = line.unwrap_or_else(|e| kleene_cli::fatal(&format!("failed to read stdin: {e}")));
            if !line.trim().is_empty() {
                run(&line);
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}
