// kleene-cli: shared utilities for the fsm-* tools.

use std::io::{self, Read, Write};
use std::process;

use kleene_fst::alphabet::Alphabet;
use kleene_fst::{Fsm, Label, Semiring, format};

/// Environment variable naming a default symbol file.
pub const SYMBOLS_ENV: &str = "KLEENE_SYMBOLS";

/// Initialize `env_logger`: `RUST_LOG` wins, otherwise the level follows
/// the number of `-v` flags.
pub fn init_logging(verbose: usize) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Count and strip `-v` / `-vv` / `--verbose` arguments.
///
/// Returns `(verbosity, remaining_args)`.
pub fn parse_verbosity(args: &[String]) -> (usize, Vec<String>) {
    let mut verbose = 0;
    let mut remaining = Vec::new();
    for arg in args {
        if arg == "--verbose" {
            verbose += 1;
        } else if arg.len() > 1 && arg.starts_with('-') && arg[1..].chars().all(|c| c == 'v') {
            verbose += arg.len() - 1;
        } else {
            remaining.push(arg.clone());
        }
    }
    (verbose, remaining)
}

/// Parse a `--long=VALUE`, `--long VALUE` or `-s VALUE` option.
///
/// Returns `(value, remaining_args)`; the last occurrence wins.
pub fn parse_option(args: &[String], short: &str, long: &str) -> (Option<String>, Vec<String>) {
    let mut value = None;
    let mut remaining = Vec::new();
    let mut skip_next = false;
    let long_eq = format!("{long}=");

    for (i, arg) in args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if let Some(val) = arg.strip_prefix(long_eq.as_str()) {
            value = Some(val.to_string());
        } else if arg == long || arg == short {
            if i + 1 < args.len() {
                value = Some(args[i + 1].clone());
                skip_next = true;
            } else {
                fatal(&format!("{arg} requires a value"));
            }
        } else {
            remaining.push(arg.clone());
        }
    }

    (value, remaining)
}

/// Strip a boolean flag. Returns `(present, remaining_args)`.
pub fn parse_flag(args: &[String], short: &str, long: &str) -> (bool, Vec<String>) {
    let present = args.iter().any(|a| a == short || a == long);
    let remaining = args
        .iter()
        .filter(|a| *a != short && *a != long)
        .cloned()
        .collect();
    (present, remaining)
}

/// Parse `-s SYMBOLS` / `--symbols SYMBOLS`, falling back to
/// `KLEENE_SYMBOLS`.
pub fn parse_symbols(args: &[String]) -> (Option<String>, Vec<String>) {
    let (path, remaining) = parse_option(args, "-s", "--symbols");
    let path = path.or_else(|| std::env::var(SYMBOLS_ENV).ok().filter(|p| !p.is_empty()));
    (path, remaining)
}

/// Load a text symbol file.
pub fn load_symbols(path: &str) -> Result<Alphabet, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("failed to read {path}: {e}"))?;
    Alphabet::from_text(&text).map_err(|e| format!("{path}: {e}"))
}

/// Load the symbol file named by `path`, if any.
pub fn load_optional_symbols(path: Option<&str>) -> Result<Option<Alphabet>, String> {
    path.map(load_symbols).transpose()
}

/// Read a whole file, or stdin for `None` and `-`.
pub fn read_input(path: Option<&str>) -> Result<Vec<u8>, String> {
    match path {
        None | Some("-") => {
            let mut data = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut data)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            Ok(data)
        }
        Some(p) => std::fs::read(p).map_err(|e| format!("failed to read {p}: {e}")),
    }
}

/// Write bytes to a file, or stdout for `None` and `-`.
pub fn write_output(path: Option<&str>, data: &[u8]) -> Result<(), String> {
    match path {
        None | Some("-") => {
            let mut out = io::stdout().lock();
            out.write_all(data)
                .and_then(|()| out.flush())
                .map_err(|e| format!("failed to write stdout: {e}"))
        }
        Some(p) => std::fs::write(p, data).map_err(|e| format!("failed to write {p}: {e}")),
    }
}

/// Load a binary automaton and its embedded symbol table.
pub fn load_fsm(path: Option<&str>) -> Result<(Fsm, Option<Alphabet>), String> {
    let name = path.unwrap_or("-");
    let data = read_input(path)?;
    if !format::is_binary(&data) {
        return Err(format!(
            "{name}: not a binary automaton (compile text with fsm-compile)"
        ));
    }
    format::from_bytes(&data).map_err(|e| format!("{name}: {e}"))
}

/// Write a binary automaton, embedding `alphabet` if given.
pub fn save_fsm(path: Option<&str>, fsm: &Fsm, alphabet: Option<&Alphabet>) -> Result<(), String> {
    write_output(path, &format::to_bytes(fsm, alphabet))
}

/// Parse a semiring name.
pub fn parse_semiring(name: &str) -> Result<Semiring, String> {
    Semiring::from_name(name).ok_or_else(|| {
        format!("unknown semiring {name:?} (expected tropical, log, real or boolean)")
    })
}

/// Parse a whitespace-separated label sequence: symbols when an alphabet is
/// given, integers otherwise.
pub fn parse_labels(input: &str, alphabet: Option<&Alphabet>) -> Result<Vec<Label>, String> {
    input
        .split_whitespace()
        .map(|token| match alphabet {
            Some(a) => a.require(token).map_err(|e| e.to_string()),
            None => token
                .parse::<Label>()
                .map_err(|_| format!("bad label {token:?} (give -s SYMBOLS to use symbols)")),
        })
        .collect()
}

/// Positional (non-option) arguments.
pub fn positional(args: &[String]) -> Vec<String> {
    args.iter()
        .filter(|a| *a == "-" || !a.starts_with('-'))
        .cloned()
        .collect()
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}
