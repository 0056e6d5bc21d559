// Bijective arc encoding.
//
// Encoding folds each arc's (lower, upper, weight) triple into a single
// label so that acceptor algorithms treat the triple as one symbol. Pure
// epsilon arcs are left alone so epsilon handling still applies.

use std::fmt::Write as _;

use hashbrown::HashMap;

use crate::arc::ArcSort;
use crate::fsm::Fsm;
use crate::semiring::Weight;
use crate::{EPSILON, FstError, Label, Result};

/// Mapping between codes and the (lower, upper, weight) triples they stand
/// for. Codes start at 1; 0 stays epsilon.
#[derive(Debug, Clone, Default)]
pub struct EncodeTable {
    entries: Vec<(Label, Label, Weight)>,
    codes: HashMap<(Label, Label, u64), Label>,
}

impl EncodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Code for a triple, allocating the next one on first sight. Weights
    /// are matched bit for bit.
    pub fn encode(&mut self, lower: Label, upper: Label, weight: Weight) -> Label {
        let next = self.entries.len() as Label + 1;
        let code = *self
            .codes
            .entry((lower, upper, weight.to_bits()))
            .or_insert(next);
        if code == next {
            self.entries.push((lower, upper, weight));
        }
        code
    }

    /// Triple for a code.
    pub fn decode(&self, code: Label) -> Option<(Label, Label, Weight)> {
        let index = (code as usize).checked_sub(1)?;
        self.entries.get(index).copied()
    }

    /// One `code lower upper weight` line per entry.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for (i, (lower, upper, weight)) in self.entries.iter().enumerate() {
            let _ = writeln!(text, "{}\t{lower}\t{upper}\t{weight}", i + 1);
        }
        text
    }

    /// Parse the output of [`to_text`](Self::to_text). Codes must be dense
    /// and in ascending order.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut table = Self::new();
        for (n, line) in text.lines().enumerate() {
            let line_no = n + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parse_err = |msg: &str| FstError::Parse {
                line: line_no,
                msg: msg.to_string(),
            };
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [code, lower, upper, weight] = fields[..] else {
                return Err(parse_err("expected: code lower upper weight"));
            };
            let code: Label = code.parse().map_err(|_| parse_err("bad code"))?;
            let lower: Label = lower.parse().map_err(|_| parse_err("bad lower label"))?;
            let upper: Label = upper.parse().map_err(|_| parse_err("bad upper label"))?;
            let weight: Weight = weight.parse().map_err(|_| parse_err("bad weight"))?;
            if table.encode(lower, upper, weight) != code {
                return Err(parse_err("codes must be dense, ascending and unique"));
            }
        }
        Ok(table)
    }
}

/// Replace every non-epsilon arc by an acceptor arc labeled with its code
/// and weight `one`. Returns the table needed to undo it.
pub fn encode(fsm: &mut Fsm) -> EncodeTable {
    let mut table = EncodeTable::new();
    let one = fsm.semiring().one();
    for s in &mut fsm.states {
        for arc in &mut s.arcs {
            if arc.is_epsilon() {
                continue;
            }
            let code = table.encode(arc.lower, arc.upper, arc.weight);
            arc.lower = code;
            arc.upper = code;
            arc.weight = one;
        }
    }
    fsm.is_transducer = false;
    fsm.sort = ArcSort::Unsorted;
    log::debug!("encode: {} distinct arc triples", table.len());
    table
}

/// Restore the arcs encoded by [`encode`].
///
/// Weights moved onto encoded arcs since encoding (for example pushed by
/// determinization) are kept: the decoded weight is the arc weight times the
/// table weight. On an unknown code the automaton is left unchanged.
pub fn decode(fsm: &mut Fsm, table: &EncodeTable) -> Result<()> {
    let sr = fsm.semiring();
    for s in &fsm.states {
        for arc in &s.arcs {
            if arc.lower != EPSILON && table.decode(arc.lower).is_none() {
                return Err(FstError::UnknownCode(arc.lower));
            }
        }
    }
    for s in &mut fsm.states {
        for arc in &mut s.arcs {
            if let Some((lower, upper, weight)) = table.decode(arc.lower) {
                arc.lower = lower;
                arc.upper = upper;
                arc.weight = sr.times(arc.weight, weight);
            }
        }
    }
    fsm.recompute_kind();
    fsm.sort = ArcSort::Unsorted;
    Ok(())
}
