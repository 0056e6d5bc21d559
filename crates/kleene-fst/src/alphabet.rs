// Symbol table: symbol-to-label and label-to-symbol mapping.

use std::fmt::Write as _;

use hashbrown::HashMap;

use crate::{EPSILON, FstError, Label, Result};

/// Symbol printed for label 0.
pub const EPSILON_SYMBOL: &str = "<eps>";

/// Bidirectional mapping between symbol strings and labels.
///
/// Labels are dense indexes into the symbol list; label 0 is always
/// [`EPSILON_SYMBOL`]. A table loaded from text may leave gaps, which are
/// stored as empty strings and map to no symbol.
///
/// Binary layout (little-endian):
/// - u32 symbol count (including epsilon and gaps)
/// - one NUL-terminated UTF-8 string per label, in label order
#[derive(Debug, Clone, PartialEq)]
pub struct Alphabet {
    symbols: Vec<String>,
    index: HashMap<String, Label>,
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new()
    }
}

impl Alphabet {
    pub fn new() -> Self {
        let mut index = HashMap::new();
        index.insert(EPSILON_SYMBOL.to_string(), EPSILON);
        Self {
            symbols: vec![EPSILON_SYMBOL.to_string()],
            index,
        }
    }

    /// Number of label slots, including epsilon and gaps.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Only epsilon is defined.
    pub fn is_empty(&self) -> bool {
        self.index.len() <= 1
    }

    /// Label of `symbol`, assigning the next free label on first sight.
    pub fn find_or_insert(&mut self, symbol: &str) -> Label {
        if let Some(&label) = self.index.get(symbol) {
            return label;
        }
        let label = self.symbols.len() as Label;
        self.symbols.push(symbol.to_string());
        self.index.insert(symbol.to_string(), label);
        label
    }

    pub fn label_of(&self, symbol: &str) -> Option<Label> {
        self.index.get(symbol).copied()
    }

    pub fn symbol_of(&self, label: Label) -> Option<&str> {
        self.symbols
            .get(label as usize)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Like [`label_of`](Self::label_of) but an unknown symbol is an error.
    pub fn require(&self, symbol: &str) -> Result<Label> {
        self.label_of(symbol)
            .ok_or_else(|| FstError::UnknownSymbol(symbol.to_string()))
    }

    /// Symbol for `label`, or the label number when it has none.
    pub fn display(&self, label: Label) -> String {
        match self.symbol_of(label) {
            Some(s) => s.to_string(),
            None => label.to_string(),
        }
    }

    /// Defined non-epsilon labels in ascending order.
    pub fn labels(&self) -> Vec<Label> {
        self.symbols
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, s)| !s.is_empty())
            .map(|(i, _)| i as Label)
            .collect()
    }

    fn define(&mut self, symbol: &str, label: Label) -> std::result::Result<(), String> {
        if symbol.is_empty() {
            return Err("empty symbol".to_string());
        }
        if label == EPSILON {
            return if symbol == EPSILON_SYMBOL {
                Ok(())
            } else {
                Err(format!("label 0 is reserved for {EPSILON_SYMBOL}"))
            };
        }
        if let Some(&old) = self.index.get(symbol) {
            return Err(format!("symbol {symbol:?} already has label {old}"));
        }
        let at = label as usize;
        if at < self.symbols.len() && !self.symbols[at].is_empty() {
            return Err(format!("label {label} already used by {:?}", self.symbols[at]));
        }
        if at >= self.symbols.len() {
            self.symbols.resize(at + 1, String::new());
        }
        self.symbols[at] = symbol.to_string();
        self.index.insert(symbol.to_string(), label);
        Ok(())
    }

    /// Parse `symbol<whitespace>label` lines. Blank lines are skipped.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut alphabet = Self::new();
        let label_limit = crate::text_id_limit(text.len());
        for (n, line) in text.lines().enumerate() {
            let line_no = n + 1;
            if line.trim().is_empty() {
                continue;
            }
            let parse_err = |msg: String| FstError::Parse { line: line_no, msg };
            let mut fields = line.split_whitespace();
            let (Some(symbol), Some(label), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(parse_err("expected: symbol label".to_string()));
            };
            let label: Label = label
                .parse()
                .map_err(|_| parse_err(format!("bad label {label:?}")))?;
            if label as usize > label_limit {
                return Err(parse_err(format!("label {label} out of range")));
            }
            alphabet.define(symbol, label).map_err(parse_err)?;
        }
        Ok(alphabet)
    }

    /// One `symbol<TAB>label` line per defined label, epsilon first.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for (label, symbol) in self.symbols.iter().enumerate() {
            if !symbol.is_empty() {
                let _ = writeln!(text, "{symbol}\t{label}");
            }
        }
        text
    }

    /// Append the binary form to `buf`.
    pub fn write_binary(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&(self.symbols.len() as u32).to_le_bytes());
        for symbol in &self.symbols {
            buf.extend_from_slice(symbol.as_bytes());
            buf.push(0);
        }
    }

    /// Parse the binary form at `offset`. Returns the alphabet and the offset
    /// just past it.
    pub fn parse_binary(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let count_end = offset + 4;
        let Some(count) = data.get(offset..count_end) else {
            return Err(FstError::TooShort {
                expected: count_end,
                actual: data.len(),
            });
        };
        let count = u32::from_le_bytes([count[0], count[1], count[2], count[3]]);
        let mut pos = count_end;

        let mut alphabet = Self::new();
        for i in 0..count {
            let str_start = pos;
            while pos < data.len() && data[pos] != 0 {
                pos += 1;
            }
            if pos >= data.len() {
                return Err(FstError::Alphabet("unterminated symbol string".to_string()));
            }
            let symbol = std::str::from_utf8(&data[str_start..pos])
                .map_err(|_| FstError::Alphabet(format!("invalid UTF-8 in symbol {i}")))?;
            pos += 1; // NUL

            if i == 0 {
                if symbol != EPSILON_SYMBOL {
                    return Err(FstError::Alphabet(format!(
                        "label 0 must be {EPSILON_SYMBOL}, found {symbol:?}"
                    )));
                }
                continue;
            }
            if symbol.is_empty() {
                alphabet.symbols.push(String::new());
                continue;
            }
            alphabet.define(symbol, i).map_err(FstError::Alphabet)?;
        }
        Ok((alphabet, pos))
    }
}
