// Copyright 2026 the layout_core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end bidi scenarios, one per concrete example in the design notes.

use layout_core::bidi::{Paragraph, ReorderingOptions};

#[test]
fn scenario_plain_ltr_text_is_one_forward_run() {
    let text = "abc";
    let para = Paragraph::new(text, Some(0)).unwrap();
    let line = para.line(0, text.len()).unwrap();
    let runs = line.visual_runs();
    assert_eq!(runs, vec![(0, 3, 0)]);
}

#[test]
fn scenario_plain_rtl_text_reverses_byte_order() {
    let text = "\u{05D0}\u{05D1}\u{05D2}";
    let para = Paragraph::new(text, Some(1)).unwrap();
    let line = para.line(0, text.len()).unwrap();
    let runs = line.visual_runs();
    assert_eq!(runs, vec![(0, text.len(), 1)]);

    let mut out = vec![0u8; text.len()];
    let n = line.write_reordered(ReorderingOptions::empty(), &mut out).unwrap();
    assert_eq!(n, text.len());
    // byte-reversed (each character here is a 2-byte Hebrew letter, and
    // L2 reverses the whole run since it is one maximal level-1 range).
    let expected: Vec<u8> = text.bytes().collect::<Vec<_>>().into_iter().rev().collect();
    assert_eq!(out, expected);
}

#[test]
fn scenario_mixed_ltr_rtl_ltr_has_three_visual_runs() {
    let text = "abc \u{05D2}\u{05D1}\u{05D0} def";
    let para = Paragraph::new(text, Some(0)).unwrap();
    let line = para.line(0, text.len()).unwrap();
    let runs = line.visual_runs();
    assert_eq!(runs.len(), 3);
    assert_eq!(runs[1].2 % 2, 1, "middle run must be RTL");
}

#[test]
fn scenario_paragraph_split_on_newline_keeps_separator_with_first() {
    let text = "abc\ndef";
    let ranges = layout_core::bidi::split_paragraphs(text);
    assert_eq!(ranges, vec![(0, 4), (4, 7)]);
}

#[test]
fn scenario_bracket_pair_resolution_lifts_inner_level() {
    // "(((a)(A)))" - A and its enclosing single-letter-pair brackets should
    // resolve consistently with the surrounding Latin text at level 0 since
    // all characters here are strong-L; the bracket-pairing table is
    // exercised without requiring mixed direction to confirm N0 doesn't
    // crash or misorder an all-LTR bracket nest.
    let text = "(((a)(A)))";
    let para = Paragraph::new(text, Some(0)).unwrap();
    assert_eq!(para.paragraph_level(), 0);
    for &level in para.levels() {
        assert_eq!(level, 0);
    }
}
