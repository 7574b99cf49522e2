// Copyright 2026 the layout_core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout builder: drives attribute segmentation, shaping, greedy
//! width-based line breaking and visual-run emission for one text +
//! attribute-run bundle, producing a [`crate::layout_info::LayoutInfo`]
//! (spec §4.D), grounded on
//! `examples/original_source/src/layout_builder.hpp`'s `LayoutBuilder`.

mod line_break;

use crate::bidi::{self, BidiLevel};
use crate::external::{FontRegistry, ShapeFeatures, Shaper};
use crate::font::{Font, SingleScriptFont};
use crate::layout_info::{Line, LayoutInfo, PositionedGlyph, VisualRun};
use crate::script::ScriptRunIterator;
use crate::value_runs::ValueRuns;
use icu_properties::props::Script;
use log::warn;

/// Horizontal alignment of each line within `text_area_width`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum XAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical alignment of the whole text block within `text_area_height`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum YAlignment {
    #[default]
    Top,
    Center,
    Bottom,
}

/// Parameters for one [`LayoutBuilder::build`] call (spec §4.D.1).
#[derive(Debug)]
pub struct LayoutBuildParams<'a> {
    /// 26.6 fixed-point wrap width; 0 disables wrapping (one line per
    /// paragraph).
    pub text_area_width: i32,
    /// 26.6 fixed-point; used only for Y alignment.
    pub text_area_height: i32,
    /// 26.6 fixed-point tab stop width.
    pub tab_width: i32,
    pub x_alignment: XAlignment,
    pub y_alignment: YAlignment,
    /// Force a uniform base direction instead of per-paragraph P2/P3
    /// auto-detection (`OVERRIDE_DIRECTIONALITY`).
    pub override_base_level: Option<BidiLevel>,
    pub small_caps_runs: Option<&'a ValueRuns<bool>>,
    pub subscript_runs: Option<&'a ValueRuns<bool>>,
    pub superscript_runs: Option<&'a ValueRuns<bool>>,
}

impl<'a> Default for LayoutBuildParams<'a> {
    fn default() -> Self {
        Self {
            text_area_width: 0,
            text_area_height: 0,
            tab_width: 0,
            x_alignment: XAlignment::Left,
            y_alignment: YAlignment::Top,
            override_base_level: None,
            small_caps_runs: None,
            subscript_runs: None,
            superscript_runs: None,
        }
    }
}

/// One maximal character range over which font, script, level and locale
/// are constant (spec §3 "Logical run").
struct LogicalRun {
    font: SingleScriptFont,
    script: Script,
    level: BidiLevel,
    char_start: usize,
    char_end: usize,
    glyph_start: usize,
    glyph_end: usize,
}

/// Drives the pipeline described in spec §4.D. Holds reusable scratch
/// buffers across calls to amortize allocation the way the teacher's
/// per-builder scratch vectors do.
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    glyphs: Vec<u16>,
    char_indices: Vec<u32>,
    /// 26.6 fixed-point glyph widths (primary axis), logical order.
    widths: Vec<i32>,
    /// 26.6 fixed-point absolute secondary-axis positions, logical order.
    cross_positions: Vec<i32>,
    logical_runs: Vec<LogicalRun>,
}

impl LayoutBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        self.glyphs.clear();
        self.char_indices.clear();
        self.widths.clear();
        self.cross_positions.clear();
        self.logical_runs.clear();
    }

    /// Builds a layout for `text` under `font_runs` (a font `ValueRuns`
    /// covering `[0, text.len())`) and `params`.
    pub fn build(
        &mut self,
        text: &str,
        font_runs: &ValueRuns<Font>,
        params: &LayoutBuildParams<'_>,
        registry: &dyn FontRegistry,
        shaper: &mut dyn Shaper,
        line_breaker: &mut dyn crate::external::LineBreakIterator,
    ) -> LayoutInfo {
        self.reset();
        let mut lines = Vec::new();
        let mut runs = Vec::new();
        let mut total_descent = 0i32;
        let mut text_width = 0i32;

        for (para_start, para_end) in bidi::split_paragraphs(text) {
            let para_text = &text[para_start..para_end];
            if para_text.is_empty() {
                continue;
            }
            let paragraph = match bidi::Paragraph::new(para_text, params.override_base_level) {
                Ok(p) => p,
                Err(e) => {
                    warn!("failed to resolve paragraph bidi levels: {e}");
                    continue;
                }
            };

            self.reset();
            self.build_logical_runs(para_text, para_start, font_runs, &paragraph, params, registry);
            self.shape_logical_runs(para_text, para_start, shaper);

            let separator_len = para_end - para_start - trim_separator(para_text).len();
            let para_font = *font_runs.get(para_start);
            self.build_lines(
                &paragraph,
                para_text,
                para_start,
                params,
                registry,
                para_font,
                line_breaker,
                separator_len as u32,
                &mut lines,
                &mut runs,
                &mut total_descent,
                &mut text_width,
            );
        }

        let text_start_y = match params.y_alignment {
            YAlignment::Top => 0,
            YAlignment::Center => (params.text_area_height - total_descent) / 2,
            YAlignment::Bottom => params.text_area_height - total_descent,
        };

        LayoutInfo {
            lines,
            runs,
            text_width,
            text_start_y,
        }
    }

    /// Step 1: attribute segmentation + font-registry sub-font resolution,
    /// coalesced into logical runs.
    fn build_logical_runs(
        &mut self,
        para_text: &str,
        para_start: usize,
        font_runs: &ValueRuns<Font>,
        paragraph: &bidi::Paragraph<'_>,
        params: &LayoutBuildParams<'_>,
        registry: &dyn FontRegistry,
    ) {
        let mut scripts = ScriptRunIterator::new(para_text);
        let script_runs: Vec<(usize, usize, Script)> = std::iter::from_fn(|| scripts.next_run()).collect();

        let mut script_idx = 0;
        let mut offset = 0usize;
        while offset < para_text.len() {
            while script_idx < script_runs.len() && script_runs[script_idx].1 <= offset {
                script_idx += 1;
            }
            let script = script_runs.get(script_idx).map(|r| r.2).unwrap_or(Script::Common);
            let script_limit = script_runs.get(script_idx).map(|r| r.1).unwrap_or(para_text.len());

            let base_font = *font_runs.get(para_start + offset);
            let small_caps = params.small_caps_runs.is_some_and(|r| *r.get(para_start + offset));
            let subscript = params.subscript_runs.is_some_and(|r| *r.get(para_start + offset));
            let superscript = params.superscript_runs.is_some_and(|r| *r.get(para_start + offset));

            let mut font_offset = offset;
            let font = match registry.get_sub_font(
                base_font,
                para_text,
                &mut font_offset,
                script_limit,
                script,
                small_caps,
                subscript,
                superscript,
            ) {
                Ok(f) => f,
                Err(e) => {
                    warn!("font registry failed to resolve a sub-font: {e:?}");
                    font_offset = script_limit;
                    fallback_font(base_font, small_caps, subscript, superscript)
                }
            };
            let run_end = font_offset.max(offset + 1).min(para_text.len());
            let level = paragraph.level_at(offset);

            if let Some(last) = self.logical_runs.last_mut() {
                if last.font == font && last.script == script && last.level == level && last.char_end == offset {
                    last.char_end = run_end;
                    offset = run_end;
                    continue;
                }
            }
            self.logical_runs.push(LogicalRun {
                font,
                script,
                level,
                char_start: offset,
                char_end: run_end,
                glyph_start: 0,
                glyph_end: 0,
            });
            offset = run_end;
        }
    }

    /// Step 2: hand each logical run to the external shaper, accumulating
    /// glyphs/char indices/widths in logical (monotone) order.
    fn shape_logical_runs(&mut self, para_text: &str, para_start: usize, shaper: &mut dyn Shaper) {
        let run_count = self.logical_runs.len();
        for i in 0..run_count {
            let (char_start, char_end, font, script, rtl) = {
                let run = &self.logical_runs[i];
                (run.char_start, run.char_end, run.font, run.script, run.level % 2 == 1)
            };
            let run_text = &para_text[char_start..char_end];
            let prefix = &para_text[..char_start];
            let suffix = &para_text[char_end..];
            let features = ShapeFeatures {
                small_caps: font.synthetic_small_caps,
                subscript: font.synthetic_subscript,
                superscript: font.synthetic_superscript,
            };

            let glyph_start = self.glyphs.len();
            match shaper.shape(font, script, rtl, prefix, run_text, suffix, features) {
                Ok(mut glyphs) => {
                    if rtl {
                        // The shaper returns visual order for an RTL run;
                        // reverse back to logical order so char_indices stays
                        // monotone non-decreasing across the paragraph.
                        glyphs.reverse();
                    }
                    for g in glyphs {
                        self.glyphs.push(g.glyph_id);
                        self.char_indices.push(para_start as u32 + char_start as u32 + g.cluster);
                        self.widths.push(g.x_advance);
                        self.cross_positions.push(g.y_offset);
                    }
                }
                Err(e) => {
                    warn!("shaper failed on a logical run, substituting .notdef: {e:?}");
                    self.glyphs.push(0);
                    self.char_indices.push(para_start as u32 + char_start as u32);
                    self.widths.push(0);
                    self.cross_positions.push(0);
                }
            }
            self.logical_runs[i].glyph_start = glyph_start;
            self.logical_runs[i].glyph_end = self.glyphs.len();
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build_lines(
        &self,
        paragraph: &bidi::Paragraph<'_>,
        para_text: &str,
        para_start: usize,
        params: &LayoutBuildParams<'_>,
        registry: &dyn FontRegistry,
        para_font: Font,
        line_breaker: &mut dyn crate::external::LineBreakIterator,
        separator_len: u32,
        lines: &mut Vec<Line>,
        runs: &mut Vec<VisualRun>,
        total_descent: &mut i32,
        text_width: &mut i32,
    ) {
        if self.logical_runs.is_empty() {
            // Empty paragraph: spec §4.D.2 step 6. Resolve a font via the
            // registry so the synthetic line's height still reflects the
            // paragraph's actual font metrics rather than a placeholder.
            let mut offset = 0;
            let font = registry
                .get_sub_font(para_font, para_text, &mut offset, para_text.len(), Script::Common, false, false, false)
                .unwrap_or_else(|_| fallback_font(para_font, false, false, false));
            let run_start = runs.len();
            runs.push(VisualRun {
                font,
                right_to_left: false,
                char_start_index: para_start as u32,
                char_end_index: para_start as u32,
                char_end_offset: separator_len,
                glyphs: Vec::new(),
                end_x: 0,
                end_y: 0,
            });
            let ascent = registry.ascent(font);
            let descent = registry.descent(font);
            *total_descent += ascent.max(1) - descent.min(0);
            lines.push(Line {
                run_start,
                run_end: runs.len(),
                width: 0,
                ascent,
                total_descent: *total_descent,
            });
            return;
        }

        let mut line_start = 0usize;
        while line_start < para_text.len() {
            let line_end = self.find_line_end(para_text, line_start, params.text_area_width, line_breaker);
            let is_para_end = line_end >= para_text.len();

            let line = paragraph
                .line(line_start, line_end)
                .expect("line range computed from this paragraph's own text");

            let run_start = runs.len();
            // Pen position along the line, in visual order; each emitted
            // run's glyphs sit at the x they had before their own advance
            // (so a run's first glyph starts at the run's own start x), and
            // the pen position after a run's last glyph becomes that run's
            // trailing sentinel (spec §3).
            let mut visual_last_x = 0i32;
            let mut max_ascent = 0i32;
            let mut max_descent = 0i32;
            let mut highest_run: Option<usize> = None;
            let mut highest_char_end = 0u32;

            for (vstart, vend, level) in line.visual_runs() {
                let rtl = level % 2 == 1;
                let abs_start = para_start + line_start + vstart;
                let abs_end = para_start + line_start + vend;

                for lr in self.logical_runs_overlapping(abs_start, abs_end) {
                    let frag_start = abs_start.max(lr.char_start);
                    let frag_end = abs_end.min(lr.char_end);
                    if frag_start >= frag_end {
                        continue;
                    }
                    let mut glyphs = Vec::new();
                    let glyph_range = lr.glyph_start..lr.glyph_end;
                    let mut indices: Vec<usize> = glyph_range
                        .clone()
                        .filter(|&g| {
                            let ci = self.char_indices[g] as usize;
                            ci >= frag_start && ci < frag_end
                        })
                        .collect();
                    if rtl {
                        indices.reverse();
                    }
                    let mut last_y = 0i32;
                    for g in indices {
                        let x = visual_last_x;
                        visual_last_x += self.widths[g];
                        last_y = self.cross_positions[g];
                        glyphs.push(PositionedGlyph {
                            glyph_id: self.glyphs[g],
                            char_index: self.char_indices[g],
                            x,
                            y: last_y,
                        });
                    }
                    max_ascent = max_ascent.max(registry.ascent(lr.font));
                    max_descent = max_descent.max(registry.descent(lr.font));

                    let char_end = frag_end as u32;
                    if char_end >= highest_char_end {
                        highest_char_end = char_end;
                        highest_run = Some(runs.len());
                    }
                    runs.push(VisualRun {
                        font: lr.font,
                        right_to_left: rtl,
                        char_start_index: frag_start as u32,
                        char_end_index: frag_end as u32,
                        char_end_offset: 0,
                        glyphs,
                        end_x: visual_last_x,
                        end_y: last_y,
                    });
                }
            }

            if is_para_end {
                if let Some(idx) = highest_run {
                    runs[idx].char_end_offset = separator_len;
                }
            }

            *total_descent += max_ascent.max(1) - max_descent.min(0);
            *text_width = (*text_width).max(visual_last_x);
            lines.push(Line {
                run_start,
                run_end: runs.len(),
                width: visual_last_x,
                ascent: max_ascent,
                total_descent: *total_descent,
            });

            line_start = line_end;
        }
    }

    fn logical_runs_overlapping(&self, abs_start: usize, abs_end: usize) -> Vec<&LogicalRun> {
        self.logical_runs
            .iter()
            .filter(|r| r.char_start < abs_end && r.char_end > abs_start)
            .collect()
    }

    /// Step 3 (§4.D.2): width-based greedy line breaking.
    fn find_line_end(
        &self,
        para_text: &str,
        line_start: usize,
        text_area_width: i32,
        line_breaker: &mut dyn crate::external::LineBreakIterator,
    ) -> usize {
        if text_area_width <= 0 {
            return para_text.len();
        }

        let start_glyph = self
            .char_indices
            .partition_point(|&ci| (ci as usize) < line_start);

        let mut width = 0i32;
        let mut last_fit_char_end = line_start;
        let mut g = start_glyph;
        let mut fit_any = false;
        while g < self.char_indices.len() {
            let w = self.widths[g];
            if fit_any && width + w > text_area_width {
                break;
            }
            width += w;
            fit_any = true;
            let next_char = if g + 1 < self.char_indices.len() {
                self.char_indices[g + 1] as usize
            } else {
                para_text.len()
            };
            last_fit_char_end = next_char;
            g += 1;
        }
        if !fit_any {
            // Force at least one glyph of progress.
            last_fit_char_end = if self.char_indices.len() > start_glyph + 1 {
                self.char_indices[start_glyph + 1] as usize
            } else {
                para_text.len()
            };
        }

        let candidate_end = last_fit_char_end.min(para_text.len());
        line_break::largest_break_at_or_before(para_text, line_start, candidate_end, line_breaker)
            .filter(|&pos| pos > line_start)
            .unwrap_or_else(|| {
                // No earlier break: advance through glyphs until progress is
                // guaranteed, per spec §4.D.2 step 3e.
                let mut idx = start_glyph + 1;
                while idx < self.char_indices.len() && self.char_indices[idx] as usize <= line_start {
                    idx += 1;
                }
                if idx < self.char_indices.len() {
                    self.char_indices[idx] as usize
                } else {
                    para_text.len()
                }
            })
    }
}

fn trim_separator(para_text: &str) -> &str {
    let mut end = para_text.len();
    let mut chars = para_text.char_indices().rev().peekable();
    while let Some((pos, ch)) = chars.peek().copied() {
        if matches!(ch, '\n' | '\r' | '\u{2029}' | '\u{2028}' | '\u{0085}' | '\u{000B}' | '\u{000C}') {
            end = pos;
            chars.next();
        } else {
            break;
        }
    }
    &para_text[..end]
}

fn fallback_font(base: Font, small_caps: bool, subscript: bool, superscript: bool) -> SingleScriptFont {
    SingleScriptFont {
        face: base.face,
        weight: base.weight,
        style: base.style,
        size: base.size,
        subscript,
        superscript,
        small_caps,
        synthetic_subscript: false,
        synthetic_superscript: false,
        synthetic_small_caps: false,
    }
}

#[cfg(test)]
fn font_ascent(font: SingleScriptFont) -> i32 {
    font.size * 8 / 10
}

#[cfg(test)]
fn font_descent(font: SingleScriptFont) -> i32 {
    -(font.size * 2 / 10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollaboratorFailure;
    use crate::external::{IcuLineBreakIterator, ShapedGlyph};
    use crate::font::{FontHandle, FontStyle, FontWeight};

    struct MonospaceShaper;

    impl Shaper for MonospaceShaper {
        fn shape(
            &mut self,
            _font: SingleScriptFont,
            _script: Script,
            rtl: bool,
            _prefix: &str,
            text: &str,
            _suffix: &str,
            _features: ShapeFeatures,
        ) -> Result<Vec<ShapedGlyph>, CollaboratorFailure> {
            let mut glyphs: Vec<ShapedGlyph> = text
                .char_indices()
                .map(|(i, _)| ShapedGlyph {
                    glyph_id: 1,
                    cluster: i as u32,
                    x_advance: 640,
                    y_advance: 0,
                    x_offset: 0,
                    y_offset: 0,
                })
                .collect();
            if rtl {
                glyphs.reverse();
            }
            Ok(glyphs)
        }
    }

    struct FixedRegistry;

    impl FontRegistry for FixedRegistry {
        fn get_sub_font(
            &self,
            font: Font,
            _text: &str,
            offset: &mut usize,
            limit: usize,
            _script: Script,
            small_caps: bool,
            subscript: bool,
            superscript: bool,
        ) -> Result<SingleScriptFont, CollaboratorFailure> {
            let result = SingleScriptFont {
                face: font.face,
                weight: font.weight,
                style: font.style,
                size: font.size,
                subscript,
                superscript,
                small_caps,
                synthetic_subscript: false,
                synthetic_superscript: false,
                synthetic_small_caps: false,
            };
            *offset = limit;
            Ok(result)
        }

        fn ascent(&self, font: SingleScriptFont) -> i32 {
            font_ascent(font)
        }

        fn descent(&self, font: SingleScriptFont) -> i32 {
            font_descent(font)
        }
    }

    fn base_font() -> Font {
        Font {
            face: FontHandle(1),
            weight: FontWeight::REGULAR,
            style: FontStyle::Normal,
            size: 1600,
        }
    }

    #[test]
    fn builds_single_line_for_short_text() {
        let text = "hello world";
        let fonts = ValueRuns::from_single(base_font(), text.len());
        let params = LayoutBuildParams::default();
        let mut builder = LayoutBuilder::new();
        let mut shaper = MonospaceShaper;
        let registry = FixedRegistry;
        let mut breaker = IcuLineBreakIterator;
        let layout = builder.build(text, &fonts, &params, &registry, &mut shaper, &mut breaker);
        assert_eq!(layout.line_count(), 1);
        assert!(layout.run_count() >= 1);
        assert_eq!(layout.run_char_start(0), 0);
    }

    #[test]
    fn wraps_long_text_into_multiple_lines() {
        let text = "one two three four five six seven eight";
        let fonts = ValueRuns::from_single(base_font(), text.len());
        let mut params = LayoutBuildParams::default();
        params.text_area_width = 640 * 8;
        let mut builder = LayoutBuilder::new();
        let mut shaper = MonospaceShaper;
        let registry = FixedRegistry;
        let mut breaker = IcuLineBreakIterator;
        let layout = builder.build(text, &fonts, &params, &registry, &mut shaper, &mut breaker);
        assert!(layout.line_count() > 1);
    }

    #[test]
    fn rtl_paragraph_produces_right_to_left_run() {
        let text = "\u{05E9}\u{05DC}\u{05D5}\u{05DD}";
        let fonts = ValueRuns::from_single(base_font(), text.len());
        let params = LayoutBuildParams::default();
        let mut builder = LayoutBuilder::new();
        let mut shaper = MonospaceShaper;
        let registry = FixedRegistry;
        let mut breaker = IcuLineBreakIterator;
        let layout = builder.build(text, &fonts, &params, &registry, &mut shaper, &mut breaker);
        assert!(layout.run_rtl(0));
    }
}
