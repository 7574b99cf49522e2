// Copyright 2026 the layout_core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end layout-builder scenarios, one per concrete example in the
//! design notes, driven entirely through the crate's public API with a
//! deterministic monospace shaper and a pass-through font registry (no real
//! HarfBuzz/font-file integration is in scope for this crate; see
//! `external::Shaper`/`external::FontRegistry`).

use icu_properties::props::Script;
use layout_core::error::CollaboratorFailure;
use layout_core::external::{IcuLineBreakIterator, ShapeFeatures, ShapedGlyph};
use layout_core::font::{Font, FontHandle, FontStyle, FontWeight, SingleScriptFont};
use layout_core::{LayoutBuildParams, LayoutBuilder, ValueRuns};

const GLYPH_ADVANCE: i32 = 640;

struct MonospaceShaper;

impl layout_core::external::Shaper for MonospaceShaper {
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
                x_advance: GLYPH_ADVANCE,
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

struct PassthroughRegistry;

impl layout_core::external::FontRegistry for PassthroughRegistry {
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
        font.size * 8 / 10
    }

    fn descent(&self, font: SingleScriptFont) -> i32 {
        -(font.size * 2 / 10)
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

fn build(text: &str, params: &LayoutBuildParams<'_>) -> layout_core::LayoutInfo {
    let fonts = ValueRuns::from_single(base_font(), text.len());
    let mut builder = LayoutBuilder::new();
    let mut shaper = MonospaceShaper;
    let registry = PassthroughRegistry;
    let mut breaker = IcuLineBreakIterator;
    builder.build(text, &fonts, params, &registry, &mut shaper, &mut breaker)
}

#[test]
fn scenario_1_plain_ascii_one_run_three_glyphs() {
    let layout = build("abc", &LayoutBuildParams::default());
    assert_eq!(layout.line_count(), 1);
    assert_eq!(layout.run_count(), 1);
    assert_eq!(layout.run_glyph_count(0), 3);
    assert!(!layout.run_rtl(0));
}

#[test]
fn scenario_3_mixed_direction_produces_three_runs_on_one_line() {
    let text = "abc \u{05D2}\u{05D1}\u{05D0} def";
    let layout = build(text, &LayoutBuildParams::default());
    assert_eq!(layout.line_count(), 1);
    assert_eq!(layout.run_count(), 3);
    assert!(layout.run_rtl(1));
    assert!(!layout.run_rtl(0));
    assert!(!layout.run_rtl(2));
}

#[test]
fn scenario_4_newline_splits_lines_and_assigns_separator_to_first_run() {
    let text = "abc\ndef";
    let layout = build(text, &LayoutBuildParams::default());
    assert_eq!(layout.line_count(), 2);
    assert_eq!(layout.run_count(), 2);
    // The LF belongs to the first line's run as a zero-width trailing
    // separator (spec §4.D.2 step 5), so its char range ends one byte past
    // "abc" while still only covering 3 visible characters.
    let first_run = layout.run(0);
    assert_eq!(first_run.char_end_offset, 1);
    // Line spans stack: the second line's cumulative descent must exceed
    // the first's by roughly one more line's worth of ascent+descent.
    assert!(layout.line_total_descent(1) > layout.line_total_descent(0));
}

#[test]
fn scenario_6_width_limited_wrap_breaks_at_space() {
    // "ab " is 3 glyphs, "1" is one more: width exactly covers "ab 1" before
    // overflowing on the second digit.
    let width = GLYPH_ADVANCE * 4;
    let mut params = LayoutBuildParams::default();
    params.text_area_width = width;
    let layout = build("ab 12", &params);
    assert_eq!(layout.line_count(), 2);
}
