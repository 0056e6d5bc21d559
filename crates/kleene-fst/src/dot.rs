// Graphviz rendering.

use std::fmt::Write as _;

use crate::alphabet::Alphabet;
use crate::fsm::Fsm;
use crate::Label;

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn label_text(label: Label, alphabet: Option<&Alphabet>) -> String {
    match alphabet {
        Some(a) => escape(&a.display(label)),
        None => label.to_string(),
    }
}

/// Render `fsm` as a Graphviz digraph.
///
/// Final states are drawn as double circles with their final weight, the
/// root is bold, and arcs are labeled `lower:upper/weight` (the weight is
/// omitted when it is `one`, and acceptor arcs show a single label).
pub fn draw(fsm: &Fsm, alphabet: Option<&Alphabet>, title: &str) -> String {
    let sr = fsm.semiring();
    let mut out = String::new();
    let _ = writeln!(out, "digraph \"{}\" {{", escape(title));
    let _ = writeln!(out, "  rankdir = LR;");
    let _ = writeln!(out, "  node [shape = circle];");
    for s in fsm.states() {
        let mut attrs = Vec::new();
        if fsm.is_final(s) {
            attrs.push("shape = doublecircle".to_string());
            let w = fsm.final_weight(s);
            if !sr.is_one(w) {
                attrs.push(format!("label = \"{s}/{w}\""));
            }
        }
        if s == fsm.root() {
            attrs.push("style = bold".to_string());
        }
        if attrs.is_empty() {
            let _ = writeln!(out, "  {s};");
        } else {
            let _ = writeln!(out, "  {s} [{}];", attrs.join(", "));
        }
    }
    for s in fsm.states() {
        for a in fsm.arcs(s) {
            let mut label = label_text(a.lower, alphabet);
            if fsm.is_transducer() {
                label.push(':');
                label.push_str(&label_text(a.upper, alphabet));
            }
            if !sr.is_one(a.weight) {
                let _ = write!(label, "/{}", a.weight);
            }
            let _ = writeln!(out, "  {} -> {} [label = \"{label}\"];", a.source, a.target);
        }
    }
    out.push_str("}\n");
    out
}
