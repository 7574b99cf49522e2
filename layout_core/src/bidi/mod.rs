// Copyright 2026 the layout_core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A full UAX #9 bidirectional algorithm operating directly on UTF-8 byte
//! offsets, plus paragraph splitting (P1) and the paired `Paragraph`/`Line`
//! API this crate's `u8bidi.hpp`-style surface is built around.

mod brackets;
mod reorder;
mod resolve;
mod tables;

pub use reorder::{write_reordered, WriteReorderedOptions as ReorderingOptions};
pub use tables::DirClass;

use crate::error::BidiError;
use icu_properties::props::BidiClass as IcuBidiClass;
use icu_properties::CodePointMapData;

/// An explicit UAX #9 embedding level (`0..=125`).
pub type BidiLevel = u8;

/// The overall direction of a paragraph or line once resolved.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Ltr,
    Rtl,
    /// The text contains runs of both directions.
    Mixed,
}

/// Selects which weak-type table variant resolution uses, mirroring ICU's
/// `UBiDiReorderingMode` (`original_source/src/u8bidi.cpp`).
///
/// [`ReorderingMode::Default`], [`ReorderingMode::NumbersSpecial`],
/// [`ReorderingMode::GroupNumbersWithR`] and [`ReorderingMode::RunsOnly`] each
/// get a distinct resolution path (see `resolve::resolve_neutral`/
/// `resolve_implicit` for the first two, and `resolve::resolve_sequence`'s
/// early return for `RunsOnly`). The three `Inverse*` modes are accepted (so
/// callers porting ICU-based code don't get a hard rejection) but resolve
/// through the same `Default` path, skipping only the L1 trailing-whitespace
/// reset a forward pass would apply unconditionally — a simplification, not a
/// reproduction of ICU's bespoke inverse state tables.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ReorderingMode {
    #[default]
    Default,
    NumbersSpecial,
    GroupNumbersWithR,
    InverseNumbersAsL,
    InverseLikeDirect,
    InverseForNumbersSpecial,
    RunsOnly,
}

impl ReorderingMode {
    fn is_inverse(self) -> bool {
        matches!(
            self,
            Self::InverseNumbersAsL | Self::InverseLikeDirect | Self::InverseForNumbersSpecial
        )
    }
}

/// A resolved paragraph: explicit levels, weak/neutral/implicit resolution,
/// and L1 trailing-whitespace reset have all already run by the time
/// [`Paragraph::new`] returns.
pub struct Paragraph<'a> {
    text: &'a str,
    para_level: BidiLevel,
    mode: ReorderingMode,
    /// Directional classes before X9 rewrote formatting characters to `BN`;
    /// kept for isolate-boundary bookkeeping line splitting needs.
    orig_types: Vec<DirClass>,
    levels: Vec<BidiLevel>,
}

impl<'a> std::fmt::Debug for Paragraph<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paragraph")
            .field("len", &self.text.len())
            .field("para_level", &self.para_level)
            .field("mode", &self.mode)
            .finish()
    }
}

impl<'a> Paragraph<'a> {
    /// Resolves `text` as one paragraph. `base_direction` overrides the P2/P3
    /// auto-detected direction when `Some`, binding the paragraph to that
    /// explicit starting embedding level (§4.C.1): its low bit gives the base
    /// direction (even = LTR, odd = RTL) and the value itself becomes the
    /// paragraph's starting level, so e.g. `Some(2)` is a valid LTR paragraph
    /// nested two levels deep. Levels above [`resolve::MAX_DEPTH`] are
    /// rejected (§4.C.4).
    pub fn new(text: &'a str, base_direction: Option<BidiLevel>) -> Result<Self, BidiError> {
        Self::with_mode(text, base_direction, ReorderingMode::Default)
    }

    /// As [`Paragraph::new`], additionally selecting the reordering-mode
    /// table variant (§4.C.2 stage 4).
    pub fn with_mode(
        text: &'a str,
        base_direction: Option<BidiLevel>,
        mode: ReorderingMode,
    ) -> Result<Self, BidiError> {
        if let Some(level) = base_direction {
            if level > resolve::MAX_DEPTH {
                return Err(BidiError::IllegalArgument("base_direction exceeds the maximum explicit embedding level"));
            }
        }

        let orig_types = classify(text);
        let para_level = match base_direction {
            Some(level) => level,
            None => tables::default_level(&orig_types),
        };

        let mut types = orig_types.clone();
        let mut levels = resolve::resolve_explicit_levels(&mut types, para_level);
        let sequences = resolve::isolating_run_sequences(&levels, &orig_types, para_level);
        for seq in &sequences {
            resolve::resolve_sequence(text, &mut types, &mut levels, seq, mode);
        }
        reorder::reset_trailing_whitespace_levels(&orig_types, &mut levels, para_level);

        Ok(Self {
            text,
            para_level,
            mode,
            orig_types,
            levels,
        })
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn paragraph_level(&self) -> BidiLevel {
        self.para_level
    }

    pub fn base_direction(&self) -> Direction {
        if self.para_level % 2 == 0 {
            Direction::Ltr
        } else {
            Direction::Rtl
        }
    }

    /// The resolved embedding level of the byte at `index` (pre-line-split,
    /// i.e. before any `line()` call's local L1 reset).
    pub fn level_at(&self, index: usize) -> BidiLevel {
        self.levels[index]
    }

    pub fn levels(&self) -> &[BidiLevel] {
        &self.levels
    }

    /// The overall direction of the resolved paragraph: `Ltr`/`Rtl` if every
    /// byte resolved to the same parity, `Mixed` otherwise.
    pub fn direction(&self) -> Direction {
        direction_of(&self.levels)
    }

    /// Produces a `Line` view over the byte range `[start, limit)`, applying
    /// this range's own L1 trailing-whitespace reset (UAX #9's `set_line`:
    /// a line boundary can itself create a new trailing-whitespace run that
    /// the paragraph-wide reset didn't see).
    pub fn line(&self, start: usize, limit: usize) -> Result<Line<'a>, BidiError> {
        if start > limit || limit > self.text.len() {
            return Err(BidiError::IllegalArgument("line range outside paragraph"));
        }
        if !self.text.is_char_boundary(start) || !self.text.is_char_boundary(limit) {
            return Err(BidiError::IllegalArgument("line range must fall on char boundaries"));
        }

        let mut levels = self.levels[start..limit].to_vec();
        if !self.mode.is_inverse() {
            reorder::reset_trailing_whitespace_levels(&self.orig_types[start..limit], &mut levels, self.para_level);
        }

        Ok(Line {
            text: &self.text[start..limit],
            start,
            para_level: self.para_level,
            levels,
        })
    }
}

/// A bidi-resolved line: a byte sub-range of a [`Paragraph`] with its own
/// (possibly re-reset) levels, ready for L2 visual reordering.
#[derive(Debug)]
pub struct Line<'a> {
    text: &'a str,
    /// Byte offset of this line's first byte within its parent paragraph.
    start: usize,
    para_level: BidiLevel,
    levels: Vec<BidiLevel>,
}

impl<'a> Line<'a> {
    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn paragraph_start(&self) -> usize {
        self.start
    }

    pub fn paragraph_level(&self) -> BidiLevel {
        self.para_level
    }

    pub fn direction(&self) -> Direction {
        direction_of(&self.levels)
    }

    /// Visual runs as `(start, limit, level)` byte ranges local to this
    /// line's text, in left-to-right visual order.
    pub fn visual_runs(&self) -> Vec<(usize, usize, BidiLevel)> {
        reorder::visual_runs(&self.levels)
    }

    pub fn visual_run_count(&self) -> usize {
        self.visual_runs().len()
    }

    /// Writes this line's visually reordered text into `out`. See
    /// [`write_reordered`].
    pub fn write_reordered(&self, options: ReorderingOptions, out: &mut [u8]) -> Result<usize, BidiError> {
        write_reordered(self.text, &self.levels, options, out).map_err(|required| BidiError::BufferOverflow {
            required,
            available: out.len(),
        })
    }
}

fn direction_of(levels: &[BidiLevel]) -> Direction {
    let mut saw_ltr = false;
    let mut saw_rtl = false;
    for &level in levels {
        if level % 2 == 0 {
            saw_ltr = true;
        } else {
            saw_rtl = true;
        }
    }
    match (saw_ltr, saw_rtl) {
        (true, false) | (false, false) => Direction::Ltr,
        (false, true) => Direction::Rtl,
        (true, true) => Direction::Mixed,
    }
}

/// Builds the byte-indexed directional class array for `text`: each
/// character's lead byte gets its real `Bidi_Class`, and every continuation
/// byte of a multi-byte sequence gets `BN` (§4.C.2 stage 2), so the
/// byte-indexed array behaves exactly like the char-indexed one UAX #9's
/// tables assume.
fn classify(text: &str) -> Vec<DirClass> {
    let data = CodePointMapData::<IcuBidiClass>::new();
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        out.push(DirClass::from_icu(data.get(ch)));
        for _ in 1..ch.len_utf8() {
            out.push(DirClass::continuation_byte());
        }
    }
    out
}

/// Splits `text` into paragraphs per UAX #9 P1: each paragraph runs up to
/// and including its terminating separator (`Bidi_Class = B`), with the
/// final, possibly unterminated, paragraph covering the remainder. Returns
/// `(start, limit)` byte ranges.
pub fn split_paragraphs(text: &str) -> Vec<(usize, usize)> {
    let data = CodePointMapData::<IcuBidiClass>::new();
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((pos, ch)) = chars.next() {
        if DirClass::from_icu(data.get(ch)) == DirClass::B {
            let mut end = pos + ch.len_utf8();
            // CRLF is a single paragraph separator (UAX #9 3.1.2).
            if ch == '\r' {
                if let Some(&(_, '\n')) = chars.peek() {
                    let (next_pos, next_ch) = chars.next().unwrap();
                    end = next_pos + next_ch.len_utf8();
                }
            }
            out.push((start, end));
            start = end;
        }
    }
    if start < text.len() || out.is_empty() {
        out.push((start, text.len()));
    }
    out
}
