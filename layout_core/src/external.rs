// Copyright 2026 the layout_core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The trait boundary to the external collaborators this crate consumes but
//! does not implement: a complex-text shaper, a line-break iterator, a
//! grapheme-cluster iterator, and a font registry (spec §6).
//!
//! Only the line-break and grapheme-cluster iterators get a reference
//! implementation here, backed by `icu_segmenter`, grounded on the usage
//! pattern in `examples/linebender-parley/parley/src/analysis/mod.rs`. The
//! shaper and font registry require a real HarfBuzz/FreeType-equivalent and
//! a real font loader respectively, both out of scope; callers must supply
//! their own.

use crate::error::CollaboratorFailure;
use crate::font::{Font, SingleScriptFont};
use icu_properties::props::Script;
use icu_segmenter::{GraphemeClusterSegmenter, LineSegmenter};

/// One shaped glyph, as returned by [`Shaper::shape`].
#[derive(Clone, Copy, Debug)]
pub struct ShapedGlyph {
    pub glyph_id: u16,
    /// Source byte offset of the character cluster this glyph belongs to,
    /// relative to the shaped run's start.
    pub cluster: u32,
    /// 26.6 fixed-point advance and offset.
    pub x_advance: i32,
    pub y_advance: i32,
    pub x_offset: i32,
    pub y_offset: i32,
}

/// OpenType feature requests a logical run's attributes imply (`smcp`,
/// `subs`, `sups`) when the selected font can satisfy them natively.
#[derive(Clone, Copy, Default, Debug)]
pub struct ShapeFeatures {
    pub small_caps: bool,
    pub subscript: bool,
    pub superscript: bool,
}

/// A complex-text shaper: turns one logical run's text into positioned
/// glyphs in visual order for the run's direction (§6 "Shaper").
pub trait Shaper {
    /// Shapes `text`, given surrounding context for cross-run joining.
    /// Returns `Err` if the font has no usable data; the builder absorbs
    /// this by substituting a `.notdef` run rather than failing the layout.
    fn shape(
        &mut self,
        font: SingleScriptFont,
        script: Script,
        right_to_left: bool,
        prefix_context: &str,
        text: &str,
        suffix_context: &str,
        features: ShapeFeatures,
    ) -> Result<Vec<ShapedGlyph>, CollaboratorFailure>;
}

/// Produces legal line-break opportunities (ICU-style: mandatory and
/// optional) over a string (§6 "Line-break iterator").
pub trait LineBreakIterator {
    /// Returns the byte offset of the next break opportunity at or after
    /// `after`, and whether it is mandatory, or `None` at end of text.
    fn next_break(&mut self, text: &str, after: usize) -> Option<(usize, bool)>;
}

/// Produces grapheme cluster (user-perceived character) boundaries over a
/// string (§6 "Grapheme cluster iterator"), used to keep cursor movement and
/// hit-testing from landing inside a combining-character sequence.
pub trait GraphemeClusterIterator {
    fn next_boundary(&mut self, text: &str, after: usize) -> Option<usize>;
    fn prev_boundary(&mut self, text: &str, before: usize) -> Option<usize>;
}

/// Resolves a base [`Font`] request plus script/feature context down to the
/// concrete [`SingleScriptFont`] that covers as much of `text[*offset..limit)`
/// as one face can (§6 "Font registry").
pub trait FontRegistry {
    /// Advances `*offset` past the longest prefix of `text[*offset..limit)`
    /// the returned font can shape, and returns that font.
    fn get_sub_font(
        &self,
        font: Font,
        text: &str,
        offset: &mut usize,
        limit: usize,
        script: Script,
        small_caps: bool,
        subscript: bool,
        superscript: bool,
    ) -> Result<SingleScriptFont, CollaboratorFailure>;

    fn ascent(&self, font: SingleScriptFont) -> i32;
    fn descent(&self, font: SingleScriptFont) -> i32;
}

/// A [`LineBreakIterator`] backed by `icu_segmenter`'s UAX #14 line-breaking
/// data, usable by callers without their own ICU integration and by this
/// crate's own tests.
#[derive(Debug, Default)]
pub struct IcuLineBreakIterator;

impl LineBreakIterator for IcuLineBreakIterator {
    fn next_break(&mut self, text: &str, after: usize) -> Option<(usize, bool)> {
        let segmenter = LineSegmenter::new_for_non_complex_scripts(Default::default());
        let breaks = segmenter.segment_str(text);
        for pos in breaks {
            if pos > after {
                let mandatory = text[..pos]
                    .chars()
                    .next_back()
                    .is_some_and(|ch| matches!(ch, '\n' | '\r' | '\u{2029}' | '\u{0085}'));
                return Some((pos, mandatory));
            }
        }
        None
    }
}

/// A [`GraphemeClusterIterator`] backed by `icu_segmenter`'s UAX #29
/// grapheme-cluster data.
#[derive(Debug, Default)]
pub struct IcuGraphemeClusterIterator;

impl GraphemeClusterIterator for IcuGraphemeClusterIterator {
    fn next_boundary(&mut self, text: &str, after: usize) -> Option<usize> {
        let segmenter = GraphemeClusterSegmenter::new();
        segmenter.segment_str(text).find(|&pos| pos > after)
    }

    fn prev_boundary(&mut self, text: &str, before: usize) -> Option<usize> {
        let segmenter = GraphemeClusterSegmenter::new();
        segmenter.segment_str(text).take_while(|&pos| pos < before).last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grapheme_iterator_finds_char_boundary() {
        let mut it = IcuGraphemeClusterIterator;
        let next = it.next_boundary("ab", 0).unwrap();
        assert_eq!(next, 1);
    }

    #[test]
    fn grapheme_iterator_prev_boundary_before_end() {
        let mut it = IcuGraphemeClusterIterator;
        let prev = it.prev_boundary("ab", 2).unwrap();
        assert_eq!(prev, 1);
    }

    #[test]
    fn line_break_iterator_finds_mandatory_break_after_newline() {
        let mut it = IcuLineBreakIterator;
        let (pos, mandatory) = it.next_break("a\nb", 0).unwrap();
        assert_eq!(pos, 2);
        assert!(mandatory);
    }
}
