// Copyright 2026 the layout_core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The produced layout and its cursor/hit-test query surface (component E).
//!
//! `LayoutInfo` is immutable once built by [`crate::builder::LayoutBuilder`];
//! all positions are 26.6 fixed-point pixels, grounded on
//! `examples/original_source/src/paragraph_layout.hpp` and
//! `layout_info.cpp`'s cursor-affinity logic.

use crate::external::GraphemeClusterIterator;
use crate::font::SingleScriptFont;

/// One positioned glyph within a [`VisualRun`].
#[derive(Clone, Copy, Debug)]
pub struct PositionedGlyph {
    pub glyph_id: u16,
    /// Source byte offset, paragraph-local.
    pub char_index: u32,
    /// 26.6 fixed-point primary-axis (x for horizontal layout) position.
    pub x: i32,
    /// 26.6 fixed-point secondary-axis (y) position.
    pub y: i32,
}

/// A maximal contiguous run of glyphs sharing font, script, level and
/// direction, emitted in final visual order (spec §3 "Visual run").
#[derive(Clone, Debug)]
pub struct VisualRun {
    pub font: SingleScriptFont,
    pub right_to_left: bool,
    /// Paragraph-local byte offset of this run's first character (logical
    /// order, regardless of `right_to_left`).
    pub char_start_index: u32,
    /// Exclusive end, paragraph-local bytes.
    pub char_end_index: u32,
    /// Bytes of a trailing paragraph separator this run owns; 0 unless this
    /// is the "highest run" (the run ending at the largest char index) of a
    /// paragraph's final line.
    pub char_end_offset: u32,
    pub glyphs: Vec<PositionedGlyph>,
    /// Pen position following this run's last glyph (26.6 fixed), the
    /// trailing sentinel `positions()` appends after each real glyph's
    /// position (spec §3: "one trailing sentinel position per run").
    pub end_x: i32,
    pub end_y: i32,
}

impl VisualRun {
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Positions in visual order, one per glyph plus a trailing sentinel
    /// holding the pen position after the run's last glyph, as `(x, y)`
    /// 26.6 pairs (`glyph_count() + 1` entries).
    pub fn positions(&self) -> Vec<(i32, i32)> {
        let mut out: Vec<(i32, i32)> = self.glyphs.iter().map(|g| (g.x, g.y)).collect();
        out.push((self.end_x, self.end_y));
        out
    }
}

/// One laid-out line: a horizontal band containing some number of visual
/// runs in left-to-right display order.
#[derive(Clone, Debug)]
pub struct Line {
    /// Index of the first run (in [`LayoutInfo::runs`]) belonging to this
    /// line.
    pub run_start: usize,
    /// Exclusive end.
    pub run_end: usize,
    /// Total advance width of the line, 26.6 fixed.
    pub width: i32,
    pub ascent: i32,
    /// Cumulative descent of this line plus all previous lines' line-gaps;
    /// see spec §4.D.2 step 5.
    pub total_descent: i32,
}

/// A finished, immutable layout.
#[derive(Debug, Default)]
pub struct LayoutInfo {
    pub(crate) lines: Vec<Line>,
    pub(crate) runs: Vec<VisualRun>,
    pub(crate) text_width: i32,
    pub(crate) text_start_y: i32,
}

impl LayoutInfo {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    pub fn text_width(&self) -> i32 {
        self.text_width
    }

    pub fn text_height(&self) -> i32 {
        self.lines
            .last()
            .map(|l| l.total_descent + self.text_start_y)
            .unwrap_or(0)
    }

    pub fn line(&self, i: usize) -> &Line {
        &self.lines[i]
    }

    pub fn run(&self, i: usize) -> &VisualRun {
        &self.runs[i]
    }

    pub fn line_width(&self, i: usize) -> i32 {
        self.lines[i].width
    }

    pub fn line_ascent(&self, i: usize) -> i32 {
        self.lines[i].ascent
    }

    pub fn line_total_descent(&self, i: usize) -> i32 {
        self.lines[i].total_descent
    }

    pub fn line_run_end(&self, i: usize) -> usize {
        self.lines[i].run_end
    }

    /// Y-coordinate of the top of line `i`.
    pub fn line_start_pos(&self, i: usize) -> i32 {
        if i == 0 {
            self.text_start_y
        } else {
            self.lines[i - 1].total_descent + self.text_start_y
        }
    }

    /// Y-coordinate of the bottom of line `i`.
    pub fn line_end_pos(&self, i: usize) -> i32 {
        self.lines[i].total_descent + self.text_start_y
    }

    pub fn run_font(&self, i: usize) -> SingleScriptFont {
        self.runs[i].font
    }

    pub fn run_char_start(&self, i: usize) -> u32 {
        self.runs[i].char_start_index
    }

    pub fn run_char_end(&self, i: usize) -> u32 {
        self.runs[i].char_end_index
    }

    pub fn run_rtl(&self, i: usize) -> bool {
        self.runs[i].right_to_left
    }

    pub fn run_glyph_count(&self, i: usize) -> usize {
        self.runs[i].glyph_count()
    }

    pub fn run_positions(&self, i: usize) -> Vec<(i32, i32)> {
        self.runs[i].positions()
    }

    fn line_of_run(&self, run_index: usize) -> usize {
        self.lines
            .iter()
            .position(|l| run_index >= l.run_start && run_index < l.run_end)
            .unwrap_or(self.lines.len().saturating_sub(1))
    }

    /// Finds the visual run and line containing the cursor at `cursor`
    /// (spec §4.E `get_run_containing_cursor`).
    pub fn get_run_containing_cursor(&self, cursor: CursorPosition) -> Option<(usize, usize)> {
        let resolved = self.resolve_run_for_cursor(cursor)?;
        let line = self.line_of_run(resolved);
        Some((resolved, line))
    }

    /// Implements the cursor-affinity decision table (spec §4.E
    /// "Cursor-affinity rules"): given the cursor's byte position, finds the
    /// run on one side of it, applying affinity when the position sits
    /// exactly at a run boundary.
    fn resolve_run_for_cursor(&self, cursor: CursorPosition) -> Option<usize> {
        if self.runs.is_empty() {
            return None;
        }
        let pos = cursor.byte_offset();

        // Strictly inside some run's character range: unambiguous.
        if let Some(i) = self
            .runs
            .iter()
            .position(|r| pos > r.char_start_index && pos < r.char_end_index)
        {
            return Some(i);
        }

        // `pos` sits exactly on a boundary between run `prev` (ending here)
        // and run `next` (starting here); decide per the affinity table.
        let next = self.runs.iter().position(|r| r.char_start_index == pos);
        let prev = self
            .runs
            .iter()
            .enumerate()
            .rev()
            .find(|(_, r)| r.char_end_index == pos)
            .map(|(i, _)| i);

        match (prev, next) {
            (Some(prev_i), Some(next_i)) => {
                let prev_line = self.line_of_run(prev_i);
                let next_line = self.line_of_run(next_i);
                let at_line_break = prev_line != next_line;

                let prefer_prev = if at_line_break {
                    cursor.affinity() == CursorAffinity::Opposite
                } else {
                    let prev_rtl = self.runs[prev_i].right_to_left;
                    let next_rtl = self.runs[next_i].right_to_left;
                    (!prev_rtl && next_rtl && cursor.affinity() == CursorAffinity::Opposite)
                        || (prev_rtl && !next_rtl && cursor.affinity() == CursorAffinity::Default)
                };
                Some(if prefer_prev { prev_i } else { next_i })
            }
            (Some(prev_i), None) => Some(prev_i),
            (None, Some(next_i)) => Some(next_i),
            (None, None) => None,
        }
    }

    /// `calc_cursor_pixel_pos` (spec §4.E): the on-screen `(x, y)` of a
    /// cursor, plus the containing line's height and index.
    pub fn calc_cursor_pixel_pos(&self, cursor: CursorPosition) -> Option<(i32, i32, i32, usize)> {
        let (run_index, line_index) = self.get_run_containing_cursor(cursor)?;
        let run = &self.runs[run_index];
        let line_height = self.line_end_pos(line_index) - self.line_start_pos(line_index);

        let x = if run.right_to_left {
            glyph_offset_rtl(run, cursor.byte_offset())
        } else {
            glyph_offset_ltr(run, cursor.byte_offset())
        };
        let y = self.line_start_pos(line_index);
        Some((x, y, line_height, line_index))
    }

    /// `find_closest_cursor_position` (spec §4.E): locates the closest
    /// cursor position on line `line_number` to the pixel x-coordinate `x`.
    pub fn find_closest_cursor_position(
        &self,
        line_number: usize,
        x: i32,
        grapheme_iter: &mut dyn GraphemeClusterIterator,
        text: &str,
    ) -> Option<CursorPosition> {
        let line = self.lines.get(line_number)?;
        if line.run_start == line.run_end {
            return Some(CursorPosition::new(0, CursorAffinity::Default));
        }

        let mut best_run = line.run_start;
        for i in line.run_start..line.run_end {
            let run = &self.runs[i];
            if let Some(&(rx, _)) = run.glyphs.first() {
                if rx <= x {
                    best_run = i;
                }
            }
        }
        let run = &self.runs[best_run];

        let mut closest_pos = run.char_start_index;
        let mut closest_dist = i32::MAX;
        for g in &run.glyphs {
            let d = (g.x - x).abs();
            if d < closest_dist {
                closest_dist = d;
                closest_pos = g.char_index;
            }
        }

        let snapped = if let Some(next) = grapheme_iter.next_boundary(text, closest_pos as usize) {
            let prev = grapheme_iter
                .prev_boundary(text, (closest_pos as usize + 1).min(text.len()))
                .unwrap_or(0);
            if (next as i32 - closest_pos as i32).abs() < (closest_pos as i32 - prev as i32).abs() {
                next
            } else {
                prev
            }
        } else {
            closest_pos as usize
        };

        let affinity = if snapped as u32 == run.char_start_index && best_run > line.run_start {
            let prev_rtl = self.runs[best_run - 1].right_to_left;
            if prev_rtl != run.right_to_left {
                CursorAffinity::Opposite
            } else {
                CursorAffinity::Default
            }
        } else {
            CursorAffinity::Default
        };

        Some(CursorPosition::new(snapped as u32, affinity))
    }
}

fn glyph_offset_ltr(run: &VisualRun, byte_pos: u32) -> i32 {
    interpolate_cluster(run, byte_pos, false)
}

fn glyph_offset_rtl(run: &VisualRun, byte_pos: u32) -> i32 {
    interpolate_cluster(run, byte_pos, true)
}

/// Linearly interpolates a byte position's x coordinate between the start
/// and end glyph of its cluster (spec §4.E: "linearly interpolates between
/// the cluster's start and end glyph positions by `(P - cluster_start) / k`").
fn interpolate_cluster(run: &VisualRun, byte_pos: u32, rtl: bool) -> i32 {
    if run.glyphs.is_empty() {
        return run.end_x;
    }
    let mut cluster_start_idx = 0;
    for (i, g) in run.glyphs.iter().enumerate() {
        if g.char_index <= byte_pos {
            cluster_start_idx = i;
        }
    }
    let cluster_start = run.glyphs[cluster_start_idx];

    let (next_char_index, next_x) = if rtl {
        match cluster_start_idx.checked_sub(1) {
            Some(i) => (run.glyphs[i].char_index, run.glyphs[i].x),
            None => return cluster_start.x,
        }
    } else if cluster_start_idx + 1 < run.glyphs.len() {
        let g = run.glyphs[cluster_start_idx + 1];
        (g.char_index, g.x)
    } else {
        // Last glyph in logical order: interpolate toward the run's
        // trailing sentinel pen position rather than flattening to this
        // glyph's own x (spec §3 sentinel invariant).
        (run.char_end_index, run.end_x)
    };

    let cluster_bytes = (next_char_index as i32 - cluster_start.char_index as i32).unsigned_abs().max(1);
    let offset_in_cluster = (byte_pos as i32 - cluster_start.char_index as i32).max(0) as u32;
    let t = offset_in_cluster.min(cluster_bytes) as i64;
    let interpolated = cluster_start.x as i64 + (next_x as i64 - cluster_start.x as i64) * t / cluster_bytes as i64;
    interpolated as i32
}

/// Which side of a directionality boundary a cursor renders on when its
/// byte position alone is ambiguous (spec §4.E).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum CursorAffinity {
    #[default]
    Default,
    Opposite,
}

/// A cursor position: a paragraph-local byte offset plus an affinity bit,
/// packed as the original source does (`original_source` keeps a 31-bit
/// offset and a 1-bit affinity flag in one `u32`) so it stays a cheap Copy
/// value.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CursorPosition(u32);

impl CursorPosition {
    const AFFINITY_BIT: u32 = 1 << 31;

    pub fn new(byte_offset: u32, affinity: CursorAffinity) -> Self {
        assert!(byte_offset < Self::AFFINITY_BIT, "cursor byte offset exceeds 31 bits");
        let bit = match affinity {
            CursorAffinity::Default => 0,
            CursorAffinity::Opposite => Self::AFFINITY_BIT,
        };
        Self(byte_offset | bit)
    }

    pub fn byte_offset(self) -> u32 {
        self.0 & !Self::AFFINITY_BIT
    }

    pub fn affinity(self) -> CursorAffinity {
        if self.0 & Self::AFFINITY_BIT != 0 {
            CursorAffinity::Opposite
        } else {
            CursorAffinity::Default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{FontHandle, FontStyle, FontWeight};

    fn test_font() -> SingleScriptFont {
        SingleScriptFont {
            face: FontHandle(1),
            weight: FontWeight::REGULAR,
            style: FontStyle::Normal,
            size: 1600,
            subscript: false,
            superscript: false,
            small_caps: false,
            synthetic_subscript: false,
            synthetic_superscript: false,
            synthetic_small_caps: false,
        }
    }

    fn single_run_layout() -> LayoutInfo {
        let run = VisualRun {
            font: test_font(),
            right_to_left: false,
            char_start_index: 0,
            char_end_index: 5,
            char_end_offset: 0,
            glyphs: vec![
                PositionedGlyph { glyph_id: 1, char_index: 0, x: 0, y: 0 },
                PositionedGlyph { glyph_id: 2, char_index: 1, x: 100, y: 0 },
                PositionedGlyph { glyph_id: 3, char_index: 2, x: 200, y: 0 },
                PositionedGlyph { glyph_id: 4, char_index: 3, x: 300, y: 0 },
                PositionedGlyph { glyph_id: 5, char_index: 4, x: 400, y: 0 },
            ],
            end_x: 500,
            end_y: 0,
        };
        LayoutInfo {
            lines: vec![Line {
                run_start: 0,
                run_end: 1,
                width: 500,
                ascent: 1200,
                total_descent: 1600,
            }],
            runs: vec![run],
            text_width: 500,
            text_start_y: 0,
        }
    }

    #[test]
    fn cursor_position_packs_and_unpacks() {
        let pos = CursorPosition::new(42, CursorAffinity::Opposite);
        assert_eq!(pos.byte_offset(), 42);
        assert_eq!(pos.affinity(), CursorAffinity::Opposite);
    }

    #[test]
    fn run_containing_cursor_inside_run() {
        let layout = single_run_layout();
        let cursor = CursorPosition::new(2, CursorAffinity::Default);
        let (run, line) = layout.get_run_containing_cursor(cursor).unwrap();
        assert_eq!(run, 0);
        assert_eq!(line, 0);
    }

    #[test]
    fn cursor_pixel_pos_interpolates_within_cluster() {
        let layout = single_run_layout();
        let cursor = CursorPosition::new(2, CursorAffinity::Default);
        let (x, _y, _h, line) = layout.calc_cursor_pixel_pos(cursor).unwrap();
        assert_eq!(x, 200);
        assert_eq!(line, 0);
    }
}
