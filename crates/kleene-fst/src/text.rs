// AT&T-style text format.
//
// Arc lines:   src dst lower upper [weight]   (transducers)
//              src dst label [weight]         (acceptors)
// Final lines: state [weight]
//
// Fields are separated by whitespace; an omitted weight is `one`. The first
// line's source state is the root. Lines starting with `#` are comments.

use std::fmt::Write as _;

use crate::alphabet::Alphabet;
use crate::arc::Arc;
use crate::fsm::Fsm;
use crate::semiring::{Semiring, Weight};
use crate::{FstError, Label, Result, StateId};

fn label_text(label: Label, alphabet: Option<&Alphabet>) -> String {
    match alphabet {
        Some(a) => a.display(label),
        None => label.to_string(),
    }
}

fn state_lines(fsm: &Fsm, s: StateId, alphabet: Option<&Alphabet>, out: &mut String) {
    let sr = fsm.semiring();
    let acceptor = !fsm.is_transducer();
    for a in fsm.arcs(s) {
        let _ = write!(out, "{}\t{}\t{}", a.source, a.target, label_text(a.lower, alphabet));
        if !acceptor {
            let _ = write!(out, "\t{}", label_text(a.upper, alphabet));
        }
        if !sr.is_one(a.weight) {
            let _ = write!(out, "\t{}", a.weight);
        }
        out.push('\n');
    }
    if fsm.is_final(s) {
        let w = fsm.final_weight(s);
        if sr.is_one(w) {
            let _ = writeln!(out, "{s}");
        } else {
            let _ = writeln!(out, "{s}\t{w}");
        }
    }
}

/// Render `fsm` as text, root state first. Acceptors use the one-label
/// form. An automaton whose root has neither arcs nor finality prints as
/// nothing.
pub fn print(fsm: &Fsm, alphabet: Option<&Alphabet>) -> String {
    let mut out = String::new();
    let root = fsm.root();
    if fsm.is_empty() || (fsm.arcs(root).is_empty() && !fsm.is_final(root)) {
        return out;
    }
    state_lines(fsm, root, alphabet, &mut out);
    for s in fsm.states().filter(|&s| s != root) {
        state_lines(fsm, s, alphabet, &mut out);
    }
    out
}

/// Parse the text form.
///
/// With an alphabet, labels are symbols and unseen symbols are added to it;
/// without one, labels are integers. `acceptor` selects the one-label arc
/// form.
pub fn parse(
    text: &str,
    semiring: Semiring,
    mut alphabet: Option<&mut Alphabet>,
    acceptor: bool,
) -> Result<Fsm> {
    let mut fsm = Fsm::new(semiring);
    let id_limit = crate::text_id_limit(text.len());
    let (arc_fields, label_fields) = if acceptor { (3, 1) } else { (4, 2) };

    for (n, line) in text.lines().enumerate() {
        let line_no = n + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parse_err = |msg: String| FstError::Parse { line: line_no, msg };
        let fields: Vec<&str> = line.split_whitespace().collect();

        let state = |field: &str| -> Result<StateId> {
            let s = field
                .parse::<StateId>()
                .map_err(|_| parse_err(format!("bad state {field:?}")))?;
            if s == crate::NO_STATE || s as usize > id_limit {
                return Err(parse_err(format!("state {s} out of range")));
            }
            Ok(s)
        };
        let weight = |fields: &[&str], at: usize| -> Result<Weight> {
            match fields.get(at) {
                None => Ok(semiring.one()),
                Some(field) => field
                    .parse::<Weight>()
                    .map_err(|_| parse_err(format!("bad weight {field:?}"))),
            }
        };
        let mut label = |field: &str| -> Result<Label> {
            match alphabet.as_deref_mut() {
                Some(a) => Ok(a.find_or_insert(field)),
                None => field
                    .parse::<Label>()
                    .map_err(|_| parse_err(format!("bad label {field:?}"))),
            }
        };

        let src = state(fields[0])?;
        let ensure = |fsm: &mut Fsm, s: StateId| {
            while fsm.num_states() <= s as usize {
                fsm.add_state();
            }
        };
        ensure(&mut fsm, src);
        if fsm.is_empty() {
            fsm.set_root(src);
        }

        match fields.len() {
            1 | 2 => {
                let w = weight(&fields, 1)?;
                fsm.set_final(src, w);
            }
            len if len == arc_fields || len == arc_fields + 1 => {
                let dst = state(fields[1])?;
                ensure(&mut fsm, dst);
                let lower = label(fields[2])?;
                let upper = if label_fields == 2 { label(fields[3])? } else { lower };
                let w = weight(&fields, arc_fields)?;
                fsm.add_arc(Arc::new(src, dst, lower, upper, w));
            }
            len => {
                return Err(parse_err(format!("unexpected field count {len}")));
            }
        }
    }
    Ok(fsm)
}
