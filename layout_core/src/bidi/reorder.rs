// Copyright 2026 the layout_core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! UAX #9 L1/L2: trailing-whitespace level reset and visual reordering, plus
//! the `write_reordered` byte-transform used to hand a line's visual text to
//! a non-bidi-aware consumer (§4.C.3).

use super::tables::DirClass;
use smallvec::SmallVec;

/// L1: resets the level of sequences of whitespace/isolate-formatting
/// characters at the end of a line (and of the whole paragraph) to the
/// paragraph level, since line-breaking may have split off trailing spaces
/// that should not visually migrate with a reordered RTL run.
pub(crate) fn reset_trailing_whitespace_levels(orig_types: &[DirClass], levels: &mut [u8], para_level: u8) {
    let is_reset_class = |t: DirClass| {
        matches!(
            t,
            DirClass::B
                | DirClass::S
                | DirClass::WS
                | DirClass::FSI
                | DirClass::LRI
                | DirClass::RLI
                | DirClass::PDI
                | DirClass::RLE
                | DirClass::LRE
                | DirClass::RLO
                | DirClass::LRO
                | DirClass::PDF
                | DirClass::BN
        )
    };

    let mut i = levels.len();
    while i > 0 {
        let idx = i - 1;
        if orig_types[idx] == DirClass::B || orig_types[idx] == DirClass::S {
            levels[idx] = para_level;
            // continue scanning backward past this separator for its own
            // leading run of whitespace.
            i -= 1;
            continue;
        }
        break;
    }

    // Trailing whitespace run at the very end of the text.
    let mut j = levels.len();
    while j > 0 && is_reset_class(orig_types[j - 1]) {
        j -= 1;
    }
    for level in &mut levels[j..] {
        *level = para_level;
    }
}

/// L2: computes the visual order of byte indices `[0, levels.len())` by
/// repeatedly reversing maximal runs at or above each level, from the
/// highest level down to the lowest odd level.
pub(crate) fn reorder_visual(levels: &[u8]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..levels.len()).collect();
    if levels.is_empty() {
        return order;
    }
    let max_level = *levels.iter().max().unwrap();
    let min_odd = levels.iter().copied().filter(|&l| l % 2 == 1).min().unwrap_or(max_level + 1);
    if min_odd > max_level {
        return order;
    }

    let mut level = max_level;
    while level >= min_odd {
        let mut i = 0;
        while i < levels.len() {
            if levels[i] >= level {
                let start = i;
                while i < levels.len() && levels[i] >= level {
                    i += 1;
                }
                order[start..i].reverse();
            } else {
                i += 1;
            }
        }
        if level == 0 {
            break;
        }
        level -= 1;
    }
    order
}

/// Splits a visually-ordered byte index list into maximal runs of
/// contiguous levels at the same level, in visual order; each run's
/// direction follows from its level's parity. This is what a caller walks to
/// build [`crate::layout_info::VisualRun`]s from resolved levels.
pub(crate) fn visual_runs(levels: &[u8]) -> Vec<(usize, usize, u8)> {
    let order = reorder_visual(levels);
    let mut runs = Vec::new();
    let mut i = 0;
    while i < order.len() {
        let start = i;
        let level = levels[order[i]];
        // A visual run is contiguous both in visual order and as a logical
        // byte range (L2 only ever reverses logical sub-ranges, so a run of
        // equal level in visual order is always `order[start]..=order[start
        // + n]` ascending or descending logically).
        while i < order.len() && levels[order[i]] == level {
            i += 1;
        }
        let lo = *order[start..i].iter().min().unwrap();
        let hi = *order[start..i].iter().max().unwrap() + 1;
        runs.push((lo, hi, level));
    }
    runs
}

bitflags::bitflags! {
    /// Options controlling [`write_reordered`]'s output transform.
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct WriteReorderedOptions: u32 {
        /// Replace paired brackets and other mirrored characters with their
        /// glyph-mirrored counterpart inside RTL runs.
        const DO_MIRRORING = 1 << 0;
        /// Drop BiDi control characters (explicit embedding/override/isolate
        /// codes) from the output instead of passing them through.
        const REMOVE_BIDI_CONTROLS = 1 << 1;
        /// Insert an LRM (in an LTR run) or RLM (in an RTL run) in place of
        /// each control character [`REMOVE_BIDI_CONTROLS`] drops, so the
        /// directional disambiguation the removed control provided isn't
        /// lost. This is a simplified analog of the original's numeric
        /// insertion-point tracking (`lastStrongRTL`/`insertPoints` in
        /// `u8bidi.cpp`): it substitutes one mark per removed control rather
        /// than ICU's context-sensitive placement used for inverse-mode
        /// numeric runs.
        const INSERT_LRM_FOR_REMOVED_CONTROLS = 1 << 2;
        /// Keep each base character together with any combining marks that
        /// follow it logically when reversing an RTL run, instead of
        /// reversing character-by-character (which would visually detach a
        /// mark from its base). Has no effect on LTR runs, which are never
        /// reversed.
        const KEEP_BASE_COMBINING = 1 << 3;
        /// Reverse the visual order this function would otherwise produce:
        /// LTR runs are written back to front and RTL runs front to back.
        /// Used by callers that already hold visually-ordered text and want
        /// `write_reordered` to hand it back to logical order.
        const OUTPUT_REVERSE = 1 << 4;
    }
}

/// Applies [`reorder_visual`] to `text` and writes the resulting visual
/// string into `out`, honoring `options`. Returns the number of bytes
/// written, or the required length as `Err` if `out` is too small.
pub fn write_reordered(
    text: &str,
    levels: &[u8],
    options: WriteReorderedOptions,
    out: &mut [u8],
) -> Result<usize, usize> {
    use super::brackets::mirrored;

    let runs = visual_runs(levels);
    let mut buf: SmallVec<[u8; 64]> = SmallVec::new();

    for (lo, hi, level) in runs {
        let rtl = (level % 2 == 1) ^ options.contains(WriteReorderedOptions::OUTPUT_REVERSE);
        let run_text = &text[lo..hi];
        if !rtl {
            for ch in run_text.chars() {
                push_char(&mut buf, ch, options, false);
            }
        } else if options.contains(WriteReorderedOptions::KEEP_BASE_COMBINING) {
            for cluster in base_combining_clusters(run_text).into_iter().rev() {
                for ch in cluster.chars() {
                    push_char(&mut buf, ch, options, true);
                }
            }
        } else {
            let chars: Vec<char> = run_text.chars().collect();
            for &ch in chars.iter().rev() {
                push_char(&mut buf, ch, options, true);
            }
        }
    }

    if buf.len() > out.len() {
        return Err(buf.len());
    }
    out[..buf.len()].copy_from_slice(&buf);
    Ok(buf.len())
}

/// Groups `text` into base-character clusters, each a base character
/// followed by any immediately-following `Nonspacing_Mark` characters, so a
/// caller can reverse cluster order without splitting a mark from its base.
fn base_combining_clusters(text: &str) -> Vec<&str> {
    use icu_properties::props::BidiClass as IcuBidiClass;
    use icu_properties::CodePointMapData;

    let data = CodePointMapData::<IcuBidiClass>::new();
    let mut clusters = Vec::new();
    let mut iter = text.char_indices().peekable();
    while let Some((start, ch)) = iter.next() {
        let mut end = start + ch.len_utf8();
        while let Some(&(pos, next_ch)) = iter.peek() {
            if data.get(next_ch) == IcuBidiClass::NonspacingMark {
                end = pos + next_ch.len_utf8();
                iter.next();
            } else {
                break;
            }
        }
        clusters.push(&text[start..end]);
    }
    clusters
}

fn push_char(buf: &mut SmallVec<[u8; 64]>, ch: char, options: WriteReorderedOptions, rtl_run: bool) {
    let is_control = matches!(
        ch,
        '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}' | '\u{200E}' | '\u{200F}' | '\u{061C}'
    );
    if is_control && options.contains(WriteReorderedOptions::REMOVE_BIDI_CONTROLS) {
        if options.contains(WriteReorderedOptions::INSERT_LRM_FOR_REMOVED_CONTROLS) {
            let mark = if rtl_run { '\u{200F}' } else { '\u{200E}' };
            let mut tmp = [0u8; 4];
            buf.extend_from_slice(mark.encode_utf8(&mut tmp).as_bytes());
        }
        return;
    }
    let out_ch = if rtl_run && options.contains(WriteReorderedOptions::DO_MIRRORING) {
        mirrored(ch)
    } else {
        ch
    };
    let mut tmp = [0u8; 4];
    buf.extend_from_slice(out_ch.encode_utf8(&mut tmp).as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_level_leaves_order_unchanged() {
        let levels = [0u8, 0, 0, 0];
        assert_eq!(reorder_visual(&levels), vec![0, 1, 2, 3]);
    }

    #[test]
    fn single_rtl_run_reverses() {
        let levels = [1u8, 1, 1];
        assert_eq!(reorder_visual(&levels), vec![2, 1, 0]);
    }

    #[test]
    fn mixed_levels_reorder_embedded_run() {
        // LTR LTR RTL RTL LTR LTR: middle pair should reverse in place.
        let levels = [0u8, 0, 1, 1, 0, 0];
        assert_eq!(reorder_visual(&levels), vec![0, 1, 3, 2, 4, 5]);
    }

    #[test]
    fn visual_runs_groups_by_level() {
        let levels = [0u8, 0, 1, 1, 0, 0];
        let runs = visual_runs(&levels);
        assert_eq!(runs, vec![(0, 2, 0), (2, 4, 1), (4, 6, 0)]);
    }

    #[test]
    fn write_reordered_reverses_rtl_text() {
        let text = "ab";
        let levels = [1u8, 1];
        let mut out = [0u8; 8];
        let n = write_reordered(text, &levels, WriteReorderedOptions::empty(), &mut out).unwrap();
        assert_eq!(&out[..n], b"ba");
    }

    #[test]
    fn write_reordered_reports_required_length_on_overflow() {
        let text = "abcdef";
        let levels = [0u8; 6];
        let mut out = [0u8; 2];
        let err = write_reordered(text, &levels, WriteReorderedOptions::empty(), &mut out).unwrap_err();
        assert_eq!(err, 6);
    }

    #[test]
    fn output_reverse_flips_an_ltr_run_too() {
        let text = "abc";
        let levels = [0u8, 0, 0];
        let mut out = [0u8; 8];
        let n = write_reordered(text, &levels, WriteReorderedOptions::OUTPUT_REVERSE, &mut out).unwrap();
        assert_eq!(&out[..n], b"cba");
    }

    #[test]
    fn output_reverse_cancels_with_an_rtl_run() {
        let text = "ab";
        let levels = [1u8, 1];
        let mut out = [0u8; 8];
        let n = write_reordered(text, &levels, WriteReorderedOptions::OUTPUT_REVERSE, &mut out).unwrap();
        assert_eq!(&out[..n], b"ab");
    }

    #[test]
    fn keep_base_combining_preserves_mark_after_its_base_when_reversing() {
        // Two base letters, the second followed by a combining acute accent
        // (U+0301). Plain per-char reversal would move the accent to be
        // immediately after the first letter instead; with
        // KEEP_BASE_COMBINING the "b\u{0301}" cluster reverses as a unit.
        let text = "ab\u{0301}";
        let levels = [1u8, 1, 1];
        let mut out = [0u8; 16];
        let n = write_reordered(
            text,
            &levels,
            WriteReorderedOptions::KEEP_BASE_COMBINING,
            &mut out,
        )
        .unwrap();
        assert_eq!(&out[..n], "b\u{0301}a".as_bytes());
    }

    #[test]
    fn without_keep_base_combining_marks_reverse_independently() {
        let text = "ab\u{0301}";
        let levels = [1u8, 1, 1];
        let mut out = [0u8; 16];
        let n = write_reordered(text, &levels, WriteReorderedOptions::empty(), &mut out).unwrap();
        assert_eq!(&out[..n], "\u{0301}ba".as_bytes());
    }
}
