// Copyright 2026 the layout_core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! UAX #9 level resolution: explicit levels (X1-X9), level runs and isolating
//! run sequences (X10/BD13), and per-sequence weak/neutral/implicit
//! resolution (W1-W7, N0-N2, I1/I2).
//!
//! Operates byte-indexed: continuation bytes of multi-byte UTF-8 sequences
//! carry [`DirClass::BN`] and are threaded through the same retaining-BN
//! algorithm that UAX #9 5.2 describes for explicit-formatting characters, so
//! no separate "squeeze out the removed characters" pass is needed.

use super::brackets::{bracket_type, closers_match, BracketKind};
use super::tables::*;
use super::ReorderingMode;
use smallvec::SmallVec;

/// Maximum explicit embedding/isolate depth (UAX #9 X1).
pub(crate) const MAX_DEPTH: u8 = 125;

/// One entry of the X1-X8 directional status stack.
#[derive(Clone, Copy)]
struct StatusEntry {
    level: u8,
    /// `ON` means no override in effect; `L`/`R` means characters at this
    /// entry are forced to that type (X6).
    override_status: DirClass,
    isolate: bool,
}

struct StatusStack {
    entries: SmallVec<[StatusEntry; 16]>,
    overflow_isolates: u32,
    overflow_embeddings: u32,
    valid_isolates: u32,
}

impl StatusStack {
    fn new(para_level: u8) -> Self {
        let mut entries = SmallVec::new();
        entries.push(StatusEntry {
            level: para_level,
            override_status: DirClass::ON,
            isolate: false,
        });
        Self {
            entries,
            overflow_isolates: 0,
            overflow_embeddings: 0,
            valid_isolates: 0,
        }
    }

    fn top(&self) -> StatusEntry {
        *self.entries.last().expect("stack always has the paragraph entry")
    }

    fn depth(&self) -> usize {
        self.entries.len()
    }

    fn try_push(&mut self, level: u8, override_status: DirClass, isolate: bool) -> bool {
        if level > MAX_DEPTH || self.entries.len() > MAX_DEPTH as usize {
            return false;
        }
        self.entries.push(StatusEntry {
            level,
            override_status,
            isolate,
        });
        true
    }

    fn pop(&mut self) {
        if self.entries.len() > 1 {
            self.entries.pop();
        }
    }
}

/// Resolves explicit levels and BN-retained types for one paragraph (or
/// isolating-run-sequence root). `types` is mutated in place: characters
/// whose directional meaning is consumed by explicit formatting (the
/// embedding/override/isolate initiators and terminators themselves) are
/// rewritten to `BN`, matching UAX #9 5.2's retaining-BN variant. Returns the
/// per-byte resolved levels.
pub(crate) fn resolve_explicit_levels(types: &mut [DirClass], para_level: u8) -> Vec<u8> {
    let mut levels = vec![para_level; types.len()];
    let mut stack = StatusStack::new(para_level);

    let mut i = 0;
    while i < types.len() {
        let ty = types[i];
        match ty {
            DirClass::RLE | DirClass::LRE | DirClass::RLO | DirClass::LRO => {
                let top = stack.top();
                levels[i] = top.level;
                types[i] = DirClass::BN;

                let rtl = matches!(ty, DirClass::RLE | DirClass::RLO);
                let new_level = next_level(top.level, rtl);
                let new_override = match ty {
                    DirClass::LRO => DirClass::L,
                    DirClass::RLO => DirClass::R,
                    _ => DirClass::ON,
                };
                if new_level <= MAX_DEPTH
                    && stack.overflow_isolates == 0
                    && stack.overflow_embeddings == 0
                    && stack.try_push(new_level, new_override, false)
                {
                    // pushed
                } else if stack.overflow_isolates == 0 {
                    stack.overflow_embeddings += 1;
                }
            }
            DirClass::RLI | DirClass::LRI | DirClass::FSI => {
                let top = stack.top();
                levels[i] = top.level;
                if top.override_status != DirClass::ON {
                    types[i] = top.override_status;
                }

                let rtl = if ty == DirClass::FSI {
                    let scope_end = matching_pdi_or_end(types, i + 1);
                    default_level_until_pdi(&types[i + 1..scope_end]) == 1
                } else {
                    ty == DirClass::RLI
                };
                let new_level = next_level(top.level, rtl);
                if new_level <= MAX_DEPTH
                    && stack.overflow_isolates == 0
                    && stack.overflow_embeddings == 0
                    && stack.try_push(new_level, DirClass::ON, true)
                {
                    stack.valid_isolates += 1;
                } else {
                    stack.overflow_isolates += 1;
                }
            }
            DirClass::PDI => {
                if stack.overflow_isolates > 0 {
                    stack.overflow_isolates -= 1;
                } else if stack.valid_isolates > 0 {
                    stack.overflow_embeddings = 0;
                    while !stack.top().isolate {
                        stack.pop();
                    }
                    stack.pop();
                    stack.valid_isolates -= 1;
                }
                let top = stack.top();
                levels[i] = top.level;
                if top.override_status != DirClass::ON {
                    types[i] = top.override_status;
                }
            }
            DirClass::PDF => {
                let top = stack.top();
                levels[i] = top.level;
                if stack.overflow_isolates > 0 {
                    // no-op: inside an overflowed isolate
                } else if stack.overflow_embeddings > 0 {
                    stack.overflow_embeddings -= 1;
                } else if !stack.top().isolate && stack.depth() > 1 {
                    stack.pop();
                }
                types[i] = DirClass::BN;
            }
            DirClass::B => {
                // A paragraph separator resets to the paragraph level; callers
                // split paragraphs before calling this, so B should only
                // appear (if at all) as the final character.
                levels[i] = para_level;
            }
            DirClass::S => {
                levels[i] = para_level;
            }
            DirClass::BN => {
                levels[i] = stack.top().level;
            }
            _ => {
                let top = stack.top();
                levels[i] = top.level;
                if top.override_status != DirClass::ON {
                    types[i] = top.override_status;
                }
            }
        }
        i += 1;
    }

    levels
}

fn next_level(level: u8, rtl: bool) -> u8 {
    if rtl {
        level + 1 + (level % 2 == 0) as u8
    } else {
        level + 1 + (level % 2 == 1) as u8
    }
}

/// Finds the byte index of the `PDI` matching the isolate initiator that
/// starts at `from` (i.e. `from` is the index just past the initiator),
/// or `types.len()` if unmatched.
fn matching_pdi_or_end(types: &[DirClass], from: usize) -> usize {
    let mut depth = 0i32;
    let mut i = from;
    while i < types.len() {
        match types[i] {
            DirClass::LRI | DirClass::RLI | DirClass::FSI => depth += 1,
            DirClass::PDI => {
                if depth == 0 {
                    return i;
                }
                depth -= 1;
            }
            _ => {}
        }
        i += 1;
    }
    types.len()
}

/// A maximal run of consecutive bytes at the same level (BD7), restricted to
/// bytes that survived X9 (i.e. not `BN`-equivalent per retaining rules is
/// irrelevant here; level runs are defined over every byte, BN included,
/// since BN bytes still carry a level used to glue isolating run sequences).
#[derive(Clone, Copy, Debug)]
pub(crate) struct LevelRun {
    pub start: usize,
    pub end: usize,
    pub level: u8,
}

fn level_runs(levels: &[u8]) -> Vec<LevelRun> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < levels.len() {
        let level = levels[i];
        let start = i;
        while i < levels.len() && levels[i] == level {
            i += 1;
        }
        runs.push(LevelRun {
            start,
            end: i,
            level,
        });
    }
    runs
}

/// An isolating run sequence (BD13): level runs linked across matched
/// isolate initiator/PDI pairs, carrying the `sos`/`eos` types used to seed
/// weak-type resolution (X10).
pub(crate) struct IsolatingRunSequence {
    /// Byte ranges, in logical order, making up this sequence.
    pub runs: Vec<LevelRun>,
    pub level: u8,
    pub sos: DirClass,
    pub eos: DirClass,
}

/// Builds the isolating run sequences for one paragraph (X10/BD13).
///
/// `types` must be the post-X9 (BN-retained) type array; `orig_types` is the
/// array before explicit formatting characters were rewritten to `BN`, used
/// only to detect isolate initiators/PDI for linking (their `BN`-rewritten
/// slot in `types` loses that information).
pub(crate) fn isolating_run_sequences(
    levels: &[u8],
    orig_types: &[DirClass],
    para_level: u8,
) -> Vec<IsolatingRunSequence> {
    let runs = level_runs(levels);
    let mut used = vec![false; runs.len()];
    let mut sequences = Vec::new();

    for start_idx in 0..runs.len() {
        if used[start_idx] {
            continue;
        }
        let first = runs[start_idx];
        // A run starting mid-sequence (its first byte is a PDI matching an
        // isolate initiator in an earlier run) is picked up when that
        // earlier run is processed, not as its own sequence root.
        if first.start > 0 && orig_types[first.start] == DirClass::PDI && has_matching_initiator(orig_types, first.start)
        {
            continue;
        }

        let mut chain = vec![start_idx];
        used[start_idx] = true;
        loop {
            let last = *chain.last().unwrap();
            let run = runs[last];
            if run.end == 0 || !is_isolate_initiator(orig_types[run.end - 1]) {
                break;
            }
            let pdi_pos = matching_pdi_or_end(orig_types, run.end);
            if pdi_pos >= levels.len() {
                break;
            }
            if let Some(next_idx) = runs.iter().enumerate().position(|(idx, r)| r.start == pdi_pos && !used[idx]) {
                chain.push(next_idx);
                used[next_idx] = true;
            } else {
                break;
            }
        }

        let seq_runs: Vec<LevelRun> = chain.iter().map(|&idx| runs[idx]).collect();
        let level = seq_runs[0].level;

        let seq_start = seq_runs[0].start;
        let sos = boundary_type(levels, orig_types, seq_start, -1, para_level);

        let last_run = *seq_runs.last().unwrap();
        let ends_with_isolate_initiator =
            last_run.end > 0 && is_isolate_initiator(orig_types[last_run.end - 1]) && matching_pdi_or_end(orig_types, last_run.end) >= levels.len();
        let eos_level = if ends_with_isolate_initiator {
            level
        } else {
            boundary_level(levels, last_run.end, para_level)
        };
        let eos = type_from_level(level.max(eos_level));

        sequences.push(IsolatingRunSequence {
            runs: seq_runs,
            level,
            sos,
            eos,
        });
    }

    sequences
}

fn has_matching_initiator(orig_types: &[DirClass], pdi_pos: usize) -> bool {
    let mut depth = 0i32;
    let mut i = pdi_pos as i32 - 1;
    while i >= 0 {
        match orig_types[i as usize] {
            DirClass::PDI => depth += 1,
            DirClass::LRI | DirClass::RLI | DirClass::FSI => {
                if depth == 0 {
                    return true;
                }
                depth -= 1;
            }
            _ => {}
        }
        i -= 1;
    }
    false
}

fn boundary_level(levels: &[u8], pos: usize, para_level: u8) -> u8 {
    if pos < levels.len() {
        levels[pos]
    } else {
        para_level
    }
}

fn boundary_type(levels: &[u8], _orig_types: &[DirClass], seq_start: usize, _dir: i32, para_level: u8) -> DirClass {
    let seq_level = levels[seq_start];
    let prev_level = if seq_start == 0 {
        para_level
    } else {
        levels[seq_start - 1]
    };
    type_from_level(seq_level.max(prev_level))
}

const MAX_BRACKET_PAIRS: usize = 63;

#[derive(Clone, Copy)]
struct BracketEntry {
    closer: char,
    /// Byte offset of the opening bracket within the isolating run sequence's
    /// flattened text.
    text_pos: usize,
}

/// Resolves one isolating run sequence's weak types (W1-W7), bracket pairs
/// (N0), remaining neutrals (N1/N2) and implicit levels (I1/I2), writing
/// results into `types`/`levels` at the sequence's byte positions.
pub(crate) fn resolve_sequence(
    text: &str,
    types: &mut [DirClass],
    levels: &mut [u8],
    seq: &IsolatingRunSequence,
    mode: ReorderingMode,
) {
    let indices = sequence_indices(seq);
    if indices.is_empty() {
        return;
    }

    if mode == ReorderingMode::RunsOnly {
        // Text is treated as already structured into explicit-level runs;
        // no further type-based disambiguation is applied, so the X1-X9
        // levels already written stand as the final result.
        return;
    }

    resolve_weak(types, &indices, seq.sos);
    resolve_brackets(text, types, levels, &indices, seq);
    resolve_neutral(types, levels, &indices, seq.sos, seq.eos, mode);
    resolve_implicit(types, levels, &indices, mode, seq.sos, seq.eos);
}

/// Flattens an isolating run sequence's level runs into one ordered list of
/// byte indices, skipping bytes rewritten to `BN` by X9 per the "retaining"
/// convention's W/N-stage exclusion (UAX #9 5.2: BN does not participate in
/// W1-W7/N0-N2, only inherits a neighbor's resolved type at the very end).
fn sequence_indices(seq: &IsolatingRunSequence) -> Vec<usize> {
    let mut v = Vec::new();
    for run in &seq.runs {
        for i in run.start..run.end {
            v.push(i);
        }
    }
    v
}

fn prev_non_bn(types: &[DirClass], indices: &[usize], pos: usize, sos: DirClass) -> DirClass {
    let mut j = pos;
    while j > 0 {
        j -= 1;
        let idx = indices[j];
        if types[idx] != DirClass::BN {
            return types[idx];
        }
    }
    sos
}

fn resolve_weak(types: &mut [DirClass], indices: &[usize], sos: DirClass) {
    // W1: NSM takes the type of the previous character (sos at sequence
    // start; isolate initiators/PDI make an NSM take ON instead).
    let mut prev = sos;
    for (pos, &idx) in indices.iter().enumerate() {
        if types[idx] == DirClass::NSM {
            types[idx] = if is_isolate_initiator(prev) || prev == DirClass::PDI {
                DirClass::ON
            } else {
                prev
            };
        }
        if types[idx] != DirClass::BN {
            prev = types[idx];
        }
        let _ = pos;
    }

    // W2: EN becomes AN if the preceding strong type (scanning back through
    // numbers) was AL.
    let mut strong = sos;
    for &idx in indices {
        match types[idx] {
            DirClass::L | DirClass::R | DirClass::AL => strong = types[idx],
            DirClass::EN if strong == DirClass::AL => types[idx] = DirClass::AN,
            _ => {}
        }
    }

    // W3: AL becomes R.
    for &idx in indices {
        if types[idx] == DirClass::AL {
            types[idx] = DirClass::R;
        }
    }

    // W4: a single ES between two ENs becomes EN; a single CS between two
    // numbers of the same type becomes that type.
    for w in 0..indices.len() {
        let idx = indices[w];
        if !matches!(types[idx], DirClass::ES | DirClass::CS) {
            continue;
        }
        let prev = prev_non_bn_in(types, indices, w, sos);
        let next = next_non_bn_in(types, indices, w, sos);
        if types[idx] == DirClass::ES && prev == DirClass::EN && next == DirClass::EN {
            types[idx] = DirClass::EN;
        } else if types[idx] == DirClass::CS
            && ((prev == DirClass::EN && next == DirClass::EN)
                || (prev == DirClass::AN && next == DirClass::AN))
        {
            types[idx] = prev;
        }
    }

    // W5: a sequence of ET adjacent to EN becomes EN.
    let mut w = 0;
    while w < indices.len() {
        if types[indices[w]] != DirClass::ET {
            w += 1;
            continue;
        }
        let run_start = w;
        while w < indices.len() && types[indices[w]] == DirClass::ET {
            w += 1;
        }
        let prev = prev_non_bn_in(types, indices, run_start, sos);
        let next = next_non_bn_in_from(types, indices, w, DirClass::ON);
        if prev == DirClass::EN || next == DirClass::EN {
            for &idx in &indices[run_start..w] {
                types[idx] = DirClass::EN;
            }
        }
    }

    // W6: remaining ES/ET/CS become ON.
    for &idx in indices {
        if matches!(types[idx], DirClass::ES | DirClass::ET | DirClass::CS) {
            types[idx] = DirClass::ON;
        }
    }

    // W7: EN becomes L if the preceding strong type was L.
    let mut strong = sos;
    for &idx in indices {
        match types[idx] {
            DirClass::L | DirClass::R => strong = types[idx],
            DirClass::EN if strong == DirClass::L => types[idx] = DirClass::L,
            _ => {}
        }
    }
}

fn prev_non_bn_in(types: &[DirClass], indices: &[usize], pos: usize, sos: DirClass) -> DirClass {
    prev_non_bn(types, indices, pos, sos)
}

fn next_non_bn_in(types: &[DirClass], indices: &[usize], pos: usize, sos: DirClass) -> DirClass {
    let mut j = pos + 1;
    while j < indices.len() {
        let idx = indices[j];
        if types[idx] != DirClass::BN {
            return types[idx];
        }
        j += 1;
    }
    sos
}

fn next_non_bn_in_from(types: &[DirClass], indices: &[usize], from: usize, default: DirClass) -> DirClass {
    let mut j = from;
    while j < indices.len() {
        let idx = indices[j];
        if types[idx] != DirClass::BN {
            return types[idx];
        }
        j += 1;
    }
    default
}

/// N0: resolves paired brackets by examining the strong-type context inside
/// and around each pair, per the table in UAX #9 BD16/N0. Operates on the
/// *original* text so it can see the actual bracket characters; `types` at
/// this point holds post-W1-W7 classes, which N0 reads for its strong-type
/// checks before writing `L`/`R` back into the pair.
fn resolve_brackets(
    text: &str,
    types: &mut [DirClass],
    levels: &[u8],
    indices: &[usize],
    seq: &IsolatingRunSequence,
) {
    let mut stack: SmallVec<[BracketEntry; MAX_BRACKET_PAIRS]> = SmallVec::new();
    let mut pairs: Vec<(usize, usize)> = Vec::new();

    for (pos, &idx) in indices.iter().enumerate() {
        if types[idx] != DirClass::ON {
            continue;
        }
        let ch = match text[idx..].chars().next() {
            Some(c) => c,
            None => continue,
        };
        match bracket_type(ch) {
            Some(BracketKind::Open(closer)) => {
                if stack.len() == MAX_BRACKET_PAIRS {
                    // BD16: a full stack stops bracket pairing entirely.
                    break;
                }
                stack.push(BracketEntry {
                    closer,
                    text_pos: pos,
                });
            }
            Some(BracketKind::Close(_)) => {
                if let Some(open_idx) = stack.iter().rposition(|e| closers_match(e.closer, ch)) {
                    let open_pos = stack[open_idx].text_pos;
                    stack.truncate(open_idx);
                    pairs.push((open_pos, pos));
                }
            }
            None => {}
        }
    }

    pairs.sort_by_key(|&(open, _)| open);
    let embedding_dir = type_from_level(seq.level);

    for (open_pos, close_pos) in pairs {
        let strong_inside = strong_type_in_range(types, indices, open_pos + 1, close_pos);
        let resolved = match strong_inside {
            Some(dir) if dir == embedding_dir => Some(embedding_dir),
            Some(opposite) => {
                let strong_before = strong_type_before(types, indices, open_pos, seq.sos);
                if strong_before == opposite {
                    Some(opposite)
                } else {
                    Some(embedding_dir)
                }
            }
            None => None,
        };
        if let Some(dir) = resolved {
            types[indices[open_pos]] = dir;
            types[indices[close_pos]] = dir;
            // Any NSM originally following either bracket takes its new type
            // (N0 note); approximate by re-running W1 locally is unnecessary
            // since NSM was already resolved against the bracket's prior (ON)
            // type in W1 and brackets are rare NSM bases.
            let _ = levels;
        }
    }
}

fn strong_type_in_range(types: &[DirClass], indices: &[usize], from: usize, to: usize) -> Option<DirClass> {
    let mut found_en_an = false;
    for &idx in &indices[from..to] {
        match types[idx] {
            DirClass::L => return Some(DirClass::L),
            DirClass::R => return Some(DirClass::R),
            DirClass::EN | DirClass::AN => found_en_an = true,
            _ => {}
        }
    }
    if found_en_an {
        Some(DirClass::R)
    } else {
        None
    }
}

fn strong_type_before(types: &[DirClass], indices: &[usize], pos: usize, sos: DirClass) -> DirClass {
    let mut j = pos;
    while j > 0 {
        j -= 1;
        let idx = indices[j];
        match types[idx] {
            DirClass::L => return DirClass::L,
            DirClass::R | DirClass::EN | DirClass::AN => return DirClass::R,
            _ => {}
        }
    }
    if sos == DirClass::L {
        DirClass::L
    } else {
        DirClass::R
    }
}

/// N1/N2: a maximal run of neutral/isolate-formatting types (`B`, `S`, `WS`,
/// `ON`, and the isolate initiators/`PDI` once BN-retained) takes the
/// direction shared by its neighbors (N1), or the embedding direction
/// otherwise (N2).
///
/// Under [`ReorderingMode::NumbersSpecial`], a neutral run at an even
/// (LTR-embedded) sequence level that sits directly between an `R` and an
/// `EN`/`AN` takes the number's own type instead of folding to `R` (ICU's
/// `processPropertySeq` case 4 vs. the default case 3), so I2 gives it the
/// number's own implicit bump rather than R's.
fn resolve_neutral(
    types: &mut [DirClass],
    levels: &[u8],
    indices: &[usize],
    sos: DirClass,
    eos: DirClass,
    mode: ReorderingMode,
) {
    let is_ni = |t: DirClass| {
        matches!(
            t,
            DirClass::B
                | DirClass::S
                | DirClass::WS
                | DirClass::ON
                | DirClass::FSI
                | DirClass::LRI
                | DirClass::RLI
                | DirClass::PDI
        )
    };

    let mut w = 0;
    while w < indices.len() {
        let idx = indices[w];
        if types[idx] == DirClass::BN || !is_ni(types[idx]) {
            w += 1;
            continue;
        }
        let run_start = w;
        while w < indices.len() && (types[indices[w]] == DirClass::BN || is_ni(types[indices[w]])) {
            w += 1;
        }
        let raw_prev = prev_non_bn(types, indices, run_start, sos);
        let raw_next = next_non_bn_in(types, indices, w - 1, eos);
        let prev = strong_or_number_dir(raw_prev);
        let next = strong_or_number_dir(raw_next);
        let embedding_dir = type_from_level(levels[idx]);

        let resolved = if mode == ReorderingMode::NumbersSpecial
            && levels[idx] % 2 == 0
            && raw_prev == DirClass::R
            && matches!(raw_next, DirClass::EN | DirClass::AN)
        {
            raw_next
        } else if mode == ReorderingMode::NumbersSpecial
            && levels[idx] % 2 == 0
            && matches!(raw_prev, DirClass::EN | DirClass::AN)
            && raw_next == DirClass::R
        {
            raw_prev
        } else if prev == next {
            prev
        } else {
            embedding_dir
        };
        for &i in &indices[run_start..w] {
            if types[i] != DirClass::BN {
                types[i] = resolved;
            }
        }
    }
}

fn strong_or_number_dir(ty: DirClass) -> DirClass {
    match ty {
        DirClass::L => DirClass::L,
        DirClass::R | DirClass::EN | DirClass::AN => DirClass::R,
        other => other,
    }
}

/// I1/I2: bumps each character's level from its run's level according to its
/// (now fully resolved) type and the run's parity.
///
/// Under [`ReorderingMode::GroupNumbersWithR`], an `EN`/`AN` at an even level
/// only gets the default +2 bump (keeping it on its own level, separate from
/// a neighboring `R` run) when its nearest strong neighbor on both sides is
/// `L`; otherwise it gets +1, grouping it visually with an adjacent `R` run
/// instead of splitting off as its own level.
fn resolve_implicit(
    types: &mut [DirClass],
    levels: &mut [u8],
    indices: &[usize],
    mode: ReorderingMode,
    sos: DirClass,
    eos: DirClass,
) {
    for (pos, &idx) in indices.iter().enumerate() {
        let level = levels[idx];
        let bump = if level % 2 == 0 {
            match types[idx] {
                DirClass::R => 1,
                DirClass::AN | DirClass::EN => {
                    if mode == ReorderingMode::GroupNumbersWithR {
                        let before = nearest_strong_before(types, indices, pos, sos);
                        let after = nearest_strong_after(types, indices, pos, eos);
                        if before == DirClass::L && after == DirClass::L {
                            2
                        } else {
                            1
                        }
                    } else {
                        2
                    }
                }
                _ => 0,
            }
        } else {
            match types[idx] {
                DirClass::L | DirClass::EN | DirClass::AN => 1,
                _ => 0,
            }
        };
        levels[idx] = level + bump;
    }
}

/// Nearest strong (`L`/`R`) type at or before `pos` in sequence order,
/// skipping numbers, falling back to `sos` if none precedes it.
fn nearest_strong_before(types: &[DirClass], indices: &[usize], pos: usize, sos: DirClass) -> DirClass {
    let mut j = pos;
    while j > 0 {
        j -= 1;
        match types[indices[j]] {
            DirClass::L => return DirClass::L,
            DirClass::R => return DirClass::R,
            _ => {}
        }
    }
    sos
}

/// Nearest strong (`L`/`R`) type after `pos` in sequence order, skipping
/// numbers, falling back to `eos` if none follows it.
fn nearest_strong_after(types: &[DirClass], indices: &[usize], pos: usize, eos: DirClass) -> DirClass {
    let mut j = pos + 1;
    while j < indices.len() {
        match types[indices[j]] {
            DirClass::L => return DirClass::L,
            DirClass::R => return DirClass::R,
            _ => {}
        }
        j += 1;
    }
    eos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(text: &str) -> Vec<DirClass> {
        use icu_properties::props::BidiClass as IcuBidiClass;
        use icu_properties::CodePointMapData;
        let data = CodePointMapData::<IcuBidiClass>::new();
        let mut out = Vec::with_capacity(text.len());
        for ch in text.chars() {
            let class = DirClass::from_icu(data.get(ch));
            out.push(class);
            for _ in 1..ch.len_utf8() {
                out.push(DirClass::BN);
            }
        }
        out
    }

    #[test]
    fn plain_ltr_text_stays_at_paragraph_level() {
        let text = "hello world";
        let mut types = classes(text);
        let levels = resolve_explicit_levels(&mut types, 0);
        assert!(levels.iter().all(|&l| l == 0));
    }

    #[test]
    fn rtl_paragraph_level_is_odd() {
        // Hebrew text, paragraph level forced to 1 (RTL).
        let text = "\u{05D0}\u{05D1}";
        let mut types = classes(text);
        let orig = types.clone();
        let levels = resolve_explicit_levels(&mut types, 1);
        let seqs = isolating_run_sequences(&levels, &orig, 1);
        assert_eq!(seqs.len(), 1);
        let mut levels2 = levels.clone();
        resolve_sequence(text, &mut types, &mut levels2, &seqs[0], ReorderingMode::Default);
        assert!(levels2.iter().all(|&l| l == 1));
    }

    #[test]
    fn embedded_numbers_bump_to_level_two_in_rtl_run() {
        // Arabic letter followed by European digits: EN inside an RTL run
        // with default directional context resolves one level above base odd
        // level per I2.
        let text = "\u{0627}1";
        let mut types = classes(text);
        let orig = types.clone();
        let levels = resolve_explicit_levels(&mut types, 1);
        let seqs = isolating_run_sequences(&levels, &orig, 1);
        let mut levels2 = levels.clone();
        resolve_sequence(text, &mut types, &mut levels2, &seqs[0], ReorderingMode::Default);
        // The Arabic letter is 2 bytes (lead + continuation, byte 0 and 1,
        // both level 1); the digit at byte 2 becomes AN under W2 (EN after
        // an AL-derived strong context) and gets I1's AN bump of +1 over the
        // run's odd level, landing at level 2.
        assert_eq!(levels2[0], 1);
        assert_eq!(levels2[2], 2);
    }

    #[test]
    fn numbers_special_resolves_on_between_r_and_en_to_the_number_itself() {
        // R ON EN at an even (LTR) sequence level: Default folds the ON to R
        // (both neighbors map to R), giving it R's +1 bump; NumbersSpecial
        // instead gives the ON the EN's own type, so it gets EN's +2 bump.
        let text = "\u{05D0} 1";
        let mut types = classes(text);
        let orig = types.clone();
        let levels = resolve_explicit_levels(&mut types, 0);
        let seqs = isolating_run_sequences(&levels, &orig, 0);
        assert_eq!(seqs.len(), 1);

        let mut default_types = types.clone();
        let mut default_levels = levels.clone();
        resolve_sequence(text, &mut default_types, &mut default_levels, &seqs[0], ReorderingMode::Default);

        let mut special_types = types.clone();
        let mut special_levels = levels.clone();
        resolve_sequence(
            text,
            &mut special_types,
            &mut special_levels,
            &seqs[0],
            ReorderingMode::NumbersSpecial,
        );

        // The Hebrew letter is 2 bytes (lead + continuation); byte 2 is the
        // space between it and the digit.
        assert_eq!(default_levels[2], 1);
        assert_eq!(special_levels[2], 2);
    }

    #[test]
    fn group_numbers_with_r_drops_the_en_bump_unless_bounded_by_l() {
        // R EN at an even level: Default bumps the EN by +2 (its own level);
        // GroupNumbersWithR only keeps +2 when both strong neighbors are L,
        // which isn't the case here (the left neighbor is R), so it should
        // drop to +1, grouping the digit with the R run instead.
        let text = "\u{05D0}1";
        let mut types = classes(text);
        let orig = types.clone();
        let levels = resolve_explicit_levels(&mut types, 0);
        let seqs = isolating_run_sequences(&levels, &orig, 0);

        let mut default_levels = levels.clone();
        resolve_sequence(
            text,
            &mut types.clone(),
            &mut default_levels,
            &seqs[0],
            ReorderingMode::Default,
        );

        let mut grouped_levels = levels.clone();
        resolve_sequence(
            text,
            &mut types.clone(),
            &mut grouped_levels,
            &seqs[0],
            ReorderingMode::GroupNumbersWithR,
        );

        // The Hebrew letter is 2 bytes (lead + continuation); byte 2 is the
        // digit.
        assert_eq!(default_levels[2], 2);
        assert_eq!(grouped_levels[2], 1);
    }

    #[test]
    fn runs_only_mode_skips_weak_and_implicit_resolution() {
        // Under RunsOnly, no type-based resolution runs at all: levels stay
        // exactly at their X1-X9 explicit-level values.
        let text = "\u{0627}1";
        let mut types = classes(text);
        let orig = types.clone();
        let levels = resolve_explicit_levels(&mut types, 1);
        let seqs = isolating_run_sequences(&levels, &orig, 1);
        let mut levels2 = levels.clone();
        resolve_sequence(text, &mut types, &mut levels2, &seqs[0], ReorderingMode::RunsOnly);
        assert_eq!(levels2, levels);
    }
}
