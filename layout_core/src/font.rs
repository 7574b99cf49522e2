// Copyright 2026 the layout_core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font handle and single-script font descriptor types.
//!
//! Font *loading* and face management live entirely in the external font
//! registry (see [`crate::external::FontRegistry`]); this module only
//! defines the cheap, copyable value types the rest of the crate passes
//! around to refer to a font, grounded on
//! `examples/original_source/src/font.hpp`'s `Font`/`SingleScriptFont`.

/// An opaque handle to a font face, owned and interpreted by the caller's
/// font registry. The core never dereferences this; it is a lookup key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct FontHandle(pub u32);

impl FontHandle {
    pub const INVALID: Self = Self(u32::MAX);

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

/// Nominal font weight, matching the CSS/OpenType `usWeightClass` scale.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const THIN: Self = Self(100);
    pub const REGULAR: Self = Self(400);
    pub const MEDIUM: Self = Self(500);
    pub const BOLD: Self = Self(700);
    pub const BLACK: Self = Self(900);
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::REGULAR
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// A base font request: family face + weight + style + size, before any
/// script-specific sub-font resolution or small-caps/sub/superscript
/// synthesis has been applied.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Font {
    pub face: FontHandle,
    pub weight: FontWeight,
    pub style: FontStyle,
    /// 26.6 fixed-point font size in pixels.
    pub size: i32,
}

/// A single physical face, at one size, with the requested text-feature
/// flags resolved to either "face supports it natively" or "must be
/// synthesized" (§4.D "single-script font descriptor").
///
/// Equality and hashing use only `face` + `size`: the flag fields are
/// derived from the request that produced this descriptor and do not affect
/// which physical glyphs get shaped.
#[derive(Clone, Copy, Debug)]
pub struct SingleScriptFont {
    pub face: FontHandle,
    pub weight: FontWeight,
    pub style: FontStyle,
    /// 26.6 fixed-point font size in pixels.
    pub size: i32,
    pub subscript: bool,
    pub superscript: bool,
    pub small_caps: bool,
    pub synthetic_subscript: bool,
    pub synthetic_superscript: bool,
    pub synthetic_small_caps: bool,
}

impl SingleScriptFont {
    /// The font size actually used for glyph metrics: small-caps synthesis
    /// shapes at a reduced size and the layout re-scales it back up, while
    /// subscript/superscript synthesis scales down the size before shaping
    /// (mirroring `calc_effective_font_size` in the original source).
    pub fn effective_size(&self) -> i32 {
        let mut size = self.size;
        if self.synthetic_small_caps {
            size = size * 7 / 10;
        }
        if self.synthetic_subscript || self.synthetic_superscript {
            size = size * 2 / 3;
        }
        size
    }

    /// Vertical offset applied to a synthesized subscript/superscript run's
    /// baseline, in the same 26.6 fixed-point units as `size`.
    pub fn baseline_offset(&self) -> i32 {
        if self.synthetic_subscript {
            self.size / 5
        } else if self.synthetic_superscript {
            -(self.size * 3 / 10)
        } else {
            0
        }
    }
}

impl PartialEq for SingleScriptFont {
    fn eq(&self, other: &Self) -> bool {
        self.face == other.face && self.size == other.size
    }
}

impl Eq for SingleScriptFont {}

impl core::hash::Hash for SingleScriptFont {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.face.hash(state);
        self.size.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_feature_flags() {
        let a = SingleScriptFont {
            face: FontHandle(1),
            weight: FontWeight::REGULAR,
            style: FontStyle::Normal,
            size: 1600,
            subscript: false,
            superscript: false,
            small_caps: true,
            synthetic_subscript: false,
            synthetic_superscript: false,
            synthetic_small_caps: true,
        };
        let mut b = a;
        b.small_caps = false;
        b.synthetic_small_caps = false;
        assert_eq!(a, b);
    }

    #[test]
    fn synthetic_small_caps_shrinks_effective_size() {
        let font = SingleScriptFont {
            face: FontHandle(1),
            weight: FontWeight::REGULAR,
            style: FontStyle::Normal,
            size: 1000,
            subscript: false,
            superscript: false,
            small_caps: true,
            synthetic_subscript: false,
            synthetic_superscript: false,
            synthetic_small_caps: true,
        };
        assert_eq!(font.effective_size(), 700);
    }
}
