// Copyright 2026 the layout_core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paired-bracket (N0) and mirroring tables.
//!
//! UAX #9 N0 and the Bidi_Mirrored/Bidi_Paired_Bracket properties cover a
//! long tail of punctuation; this table carries the common ASCII, general
//! punctuation, and CJK pairs the teacher's bracket fixup logic
//! (`examples/linebender-parley/parley/src/bidi.rs`, `BracketStack`) and
//! `examples/original_source/src/u8bidi_props.hpp` both special-case.

/// Whether a bracket character opens or closes a pair.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum BracketKind {
    Open(char),
    Close(char),
}

const BRACKET_TABLE: &[(char, char)] = &[
    ('(', ')'),
    ('[', ']'),
    ('{', '}'),
    ('\u{0F3A}', '\u{0F3B}'), // Tibetan
    ('\u{0F3C}', '\u{0F3D}'),
    ('\u{169B}', '\u{169C}'), // Ogham
    ('\u{2018}', '\u{2019}'),
    ('\u{201C}', '\u{201D}'),
    ('\u{2045}', '\u{2046}'),
    ('\u{207D}', '\u{207E}'),
    ('\u{208D}', '\u{208E}'),
    ('\u{2308}', '\u{2309}'),
    ('\u{230A}', '\u{230B}'),
    ('\u{2329}', '\u{232A}'),
    ('\u{2768}', '\u{2769}'),
    ('\u{27E6}', '\u{27E7}'),
    ('\u{2983}', '\u{2984}'),
    ('\u{3008}', '\u{3009}'),
    ('\u{300A}', '\u{300B}'),
    ('\u{300C}', '\u{300D}'),
    ('\u{300E}', '\u{300F}'),
    ('\u{3010}', '\u{3011}'),
    ('\u{3014}', '\u{3015}'),
    ('\u{FF08}', '\u{FF09}'),
    ('\u{FF3B}', '\u{FF3D}'),
    ('\u{FF5B}', '\u{FF5D}'),
];

/// The spec's angle-bracket synonym: U+232A and U+3009 close against either
/// of each other's opener (§4.C.2: "Both `<` / `>` and the angle-bracket
/// synonym pair ... are pushed when applicable").
const ANGLE_SYNONYMS: [char; 2] = ['\u{232A}', '\u{3009}'];

/// Returns the paired-bracket classification of `ch`, or `None` if it is
/// not a tracked bracket character.
pub(crate) fn bracket_type(ch: char) -> Option<BracketKind> {
    for &(open, close) in BRACKET_TABLE {
        if ch == open {
            return Some(BracketKind::Open(close));
        }
        if ch == close {
            return Some(BracketKind::Close(open));
        }
    }
    None
}

/// Whether `opener` (the closer recorded when a bracket was pushed) matches
/// `closer` (the character actually encountered), accounting for the
/// angle-bracket synonym pair.
pub(crate) fn closers_match(expected_closer: char, actual_closer: char) -> bool {
    expected_closer == actual_closer
        || (ANGLE_SYNONYMS.contains(&expected_closer) && ANGLE_SYNONYMS.contains(&actual_closer))
}

/// Returns the mirrored glyph for `ch` under `DO_MIRRORING`, or `ch` itself
/// if it has no canonical mirror.
pub(crate) fn mirrored(ch: char) -> char {
    for &(open, close) in BRACKET_TABLE {
        if ch == open {
            return close;
        }
        if ch == close {
            return open;
        }
    }
    match ch {
        '<' => '>',
        '>' => '<',
        '\u{2264}' => '\u{2265}', // ≤ ≥
        '\u{2265}' => '\u{2264}',
        '\u{226A}' => '\u{226B}', // ≪ ≫
        '\u{226B}' => '\u{226A}',
        other => other,
    }
}
