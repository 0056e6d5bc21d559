// Binary automaton format: header parsing, validation, reading and writing.

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use hashbrown::HashMap;

use crate::alphabet::Alphabet;
use crate::arc::{Arc, ArcSort};
use crate::fsm::{Fsm, State};
use crate::semiring::{Semiring, Weight};
use crate::{FstError, NO_STATE, Result, StateId};

/// Header magic constants (little-endian).
const COOKIE1: u32 = 0x4B4C_4E45;
const COOKIE2: u32 = 0x0046_534D;

/// Current format version.
pub const VERSION: u8 = 1;

/// Size of the binary header in bytes.
pub const HEADER_SIZE: usize = 16;

const FLAG_TRANSDUCER: u8 = 0x01;
const FLAG_DETERMINISTIC: u8 = 0x02;
const FLAG_ALPHABET: u8 = 0x04;

const STATE_VALID: u32 = 0x01;
const STATE_FINAL: u32 = 0x02;

/// Parsed file header.
///
/// The header occupies the first 16 bytes:
/// - bytes 0..8: two magic cookies
/// - byte 8: format version
/// - byte 9: semiring id
/// - byte 10: flags (transducer, deterministic, alphabet present)
/// - byte 11: arc sort id
/// - bytes 12..16: reserved (zero)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsmHeader {
    pub version: u8,
    pub semiring: Semiring,
    pub is_transducer: bool,
    pub is_deterministic: bool,
    pub has_alphabet: bool,
    pub sort: ArcSort,
}

/// Counts following the header (16 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct Counts {
    num_states: u32,
    root: u32,
    num_arcs: u32,
    num_finals: u32,
}

/// Per-state record (8 bytes): validity/finality bits and arc count.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct StateRecord {
    flags: u32,
    num_arcs: u32,
}

/// Final weight record (16 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct FinalRecord {
    state: u32,
    _padding: u32,
    weight: Weight,
}

const _: () = assert!(size_of::<Counts>() == 16);
const _: () = assert!(size_of::<StateRecord>() == 8);
const _: () = assert!(size_of::<FinalRecord>() == 16);

/// The data starts with the header cookies.
pub fn is_binary(data: &[u8]) -> bool {
    data.len() >= 8
        && u32::from_le_bytes([data[0], data[1], data[2], data[3]]) == COOKIE1
        && u32::from_le_bytes([data[4], data[5], data[6], data[7]]) == COOKIE2
}

/// Parse and validate the 16-byte header.
pub fn parse_header(data: &[u8]) -> Result<FsmHeader> {
    if data.len() < HEADER_SIZE {
        return Err(FstError::TooShort {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }
    if !is_binary(data) {
        return Err(FstError::InvalidMagic);
    }
    let version = data[8];
    if version != VERSION {
        return Err(FstError::UnsupportedVersion(version));
    }
    let semiring = Semiring::from_id(data[9])?;
    let flags = data[10];
    let sort = ArcSort::from_id(data[11])
        .ok_or_else(|| FstError::Corrupt(format!("unknown arc sort id {}", data[11])))?;
    Ok(FsmHeader {
        version,
        semiring,
        is_transducer: flags & FLAG_TRANSDUCER != 0,
        is_deterministic: flags & FLAG_DETERMINISTIC != 0,
        has_alphabet: flags & FLAG_ALPHABET != 0,
        sort,
    })
}

/// Copy `count` records starting at `offset` into an aligned vector.
fn read_records<T: Pod>(data: &[u8], offset: usize, count: usize) -> Result<(Vec<T>, usize)> {
    let len = count
        .checked_mul(size_of::<T>())
        .ok_or_else(|| FstError::Corrupt("record count overflows".to_string()))?;
    let end = offset + len;
    let Some(src) = data.get(offset..end) else {
        return Err(FstError::TooShort {
            expected: end,
            actual: data.len(),
        });
    };
    let mut records = vec![T::zeroed(); count];
    bytemuck::cast_slice_mut::<T, u8>(&mut records).copy_from_slice(src);
    Ok((records, end))
}

/// Serialize `fsm`, optionally with a symbol table.
pub fn to_bytes(fsm: &Fsm, alphabet: Option<&Alphabet>) -> Vec<u8> {
    let mut buf = Vec::with_capacity(
        HEADER_SIZE
            + size_of::<Counts>()
            + fsm.num_states() * size_of::<StateRecord>()
            + fsm.num_arcs() * size_of::<Arc>(),
    );
    buf.extend_from_slice(&COOKIE1.to_le_bytes());
    buf.extend_from_slice(&COOKIE2.to_le_bytes());
    let mut flags = 0;
    if fsm.is_transducer() {
        flags |= FLAG_TRANSDUCER;
    }
    if fsm.is_deterministic() {
        flags |= FLAG_DETERMINISTIC;
    }
    if alphabet.is_some() {
        flags |= FLAG_ALPHABET;
    }
    buf.extend_from_slice(&[VERSION, fsm.semiring().id(), flags, fsm.sort().id(), 0, 0, 0, 0]);

    let finals = fsm.finals();
    let counts = Counts {
        num_states: fsm.num_states() as u32,
        root: fsm.root(),
        num_arcs: fsm.num_arcs() as u32,
        num_finals: finals.len() as u32,
    };
    buf.extend_from_slice(bytemuck::bytes_of(&counts));

    let records: Vec<StateRecord> = fsm
        .states
        .iter()
        .map(|s| StateRecord {
            flags: (if s.valid { STATE_VALID } else { 0 }) | (if s.is_final { STATE_FINAL } else { 0 }),
            num_arcs: s.arcs.len() as u32,
        })
        .collect();
    buf.extend_from_slice(bytemuck::cast_slice(&records));
    for s in &fsm.states {
        buf.extend_from_slice(bytemuck::cast_slice(&s.arcs));
    }
    let final_records: Vec<FinalRecord> = finals
        .into_iter()
        .map(|(state, weight)| FinalRecord {
            state,
            _padding: 0,
            weight,
        })
        .collect();
    buf.extend_from_slice(bytemuck::cast_slice(&final_records));

    if let Some(alphabet) = alphabet {
        alphabet.write_binary(&mut buf);
    }
    buf
}

/// Deserialize an automaton and its symbol table, if one was stored.
pub fn from_bytes(data: &[u8]) -> Result<(Fsm, Option<Alphabet>)> {
    let header = parse_header(data)?;
    let (counts, pos) = read_records::<Counts>(data, HEADER_SIZE, 1)?;
    let counts = counts[0];
    let num_states = counts.num_states as usize;

    let (records, pos) = read_records::<StateRecord>(data, pos, num_states)?;
    let declared: usize = records.iter().map(|r| r.num_arcs as usize).sum();
    if declared != counts.num_arcs as usize {
        return Err(FstError::Corrupt(format!(
            "state records declare {declared} arcs, header says {}",
            counts.num_arcs
        )));
    }
    let (arcs, pos) = read_records::<Arc>(data, pos, declared)?;
    let (final_records, pos) = read_records::<FinalRecord>(data, pos, counts.num_finals as usize)?;

    let is_valid = |s: StateId| {
        records
            .get(s as usize)
            .is_some_and(|r| r.flags & STATE_VALID != 0)
    };

    let mut states = Vec::with_capacity(num_states);
    let mut rest = arcs.as_slice();
    for (i, r) in records.iter().enumerate() {
        let (own, tail) = rest.split_at(r.num_arcs as usize);
        rest = tail;
        for a in own {
            if a.source as usize != i {
                return Err(FstError::Corrupt(format!(
                    "arc stored under state {i} leaves state {}",
                    a.source
                )));
            }
            if !is_valid(a.target) {
                return Err(FstError::InvalidState(a.target));
            }
        }
        states.push(State {
            valid: r.flags & STATE_VALID != 0,
            is_final: r.flags & STATE_FINAL != 0,
            arcs: own.to_vec(),
        });
    }

    let mut finals: HashMap<StateId, Weight> = HashMap::with_capacity(final_records.len());
    for f in &final_records {
        if !is_valid(f.state) || records[f.state as usize].flags & STATE_FINAL == 0 {
            return Err(FstError::InvalidState(f.state));
        }
        finals.insert(f.state, f.weight);
    }
    let flagged = records.iter().filter(|r| r.flags & STATE_FINAL != 0).count();
    if flagged != finals.len() {
        return Err(FstError::Corrupt(format!(
            "{flagged} states flagged final, {} final records",
            finals.len()
        )));
    }
    if counts.root != NO_STATE && !is_valid(counts.root) {
        return Err(FstError::InvalidState(counts.root));
    }

    let alphabet = if header.has_alphabet {
        let (alphabet, _) = Alphabet::parse_binary(data, pos)?;
        Some(alphabet)
    } else {
        None
    };

    let fsm = Fsm {
        states,
        root: counts.root,
        finals,
        semiring: header.semiring,
        is_transducer: header.is_transducer,
        is_deterministic: header.is_deterministic,
        sort: header.sort,
    };
    log::debug!(
        "loaded automaton: {} states, {} arcs, semiring {}",
        fsm.num_states(),
        fsm.num_arcs(),
        fsm.semiring().name()
    );
    Ok((fsm, alphabet))
}

/// Write the binary form to `path`.
pub fn save(path: impl AsRef<Path>, fsm: &Fsm, alphabet: Option<&Alphabet>) -> Result<()> {
    std::fs::write(path, to_bytes(fsm, alphabet))?;
    Ok(())
}

/// Read the binary form from `path`.
pub fn load(path: impl AsRef<Path>) -> Result<(Fsm, Option<Alphabet>)> {
    let data = std::fs::read(path)?;
    from_bytes(&data)
}
