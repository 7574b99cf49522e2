// Copyright 2026 the layout_core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bidirectional character classes and the bitmask tables used throughout
//! the resolution stages.
//!
//! This mirrors the class set the teacher's own (char-indexed) resolver
//! used in `examples/linebender-parley/parley/src/bidi.rs`, adapted to work
//! from `icu_properties::props::BidiClass` and to carry a `mask()` that
//! groups classes the same way UAX #9 rules group them (W1/W2/W4's masks,
//! the explicit-formatting mask, etc).

use icu_properties::props::BidiClass as IcuBidiClass;

/// A UAX #9 directional class.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum DirClass {
    L,
    R,
    AL,
    EN,
    ES,
    ET,
    AN,
    CS,
    NSM,
    BN,
    B,
    S,
    WS,
    ON,
    LRE,
    LRO,
    RLE,
    RLO,
    PDF,
    LRI,
    RLI,
    FSI,
    PDI,
}

use DirClass::*;

impl DirClass {
    /// A single bit uniquely identifying this class, used to build the
    /// group masks below.
    pub const fn mask(self) -> u32 {
        1 << (self as u32)
    }

    /// Converts from the UCD's `Bidi_Class` property value.
    pub fn from_icu(value: IcuBidiClass) -> Self {
        match value {
            IcuBidiClass::LeftToRight => L,
            IcuBidiClass::RightToLeft => R,
            IcuBidiClass::ArabicLetter => AL,
            IcuBidiClass::EuropeanNumber => EN,
            IcuBidiClass::EuropeanSeparator => ES,
            IcuBidiClass::EuropeanTerminator => ET,
            IcuBidiClass::ArabicNumber => AN,
            IcuBidiClass::CommonSeparator => CS,
            IcuBidiClass::NonspacingMark => NSM,
            IcuBidiClass::BoundaryNeutral => BN,
            IcuBidiClass::ParagraphSeparator => B,
            IcuBidiClass::SegmentSeparator => S,
            IcuBidiClass::WhiteSpace => WS,
            IcuBidiClass::OtherNeutral => ON,
            IcuBidiClass::LeftToRightEmbedding => LRE,
            IcuBidiClass::LeftToRightOverride => LRO,
            IcuBidiClass::RightToLeftEmbedding => RLE,
            IcuBidiClass::RightToLeftOverride => RLO,
            IcuBidiClass::PopDirectionalFormat => PDF,
            IcuBidiClass::LeftToRightIsolate => LRI,
            IcuBidiClass::RightToLeftIsolate => RLI,
            IcuBidiClass::FirstStrongIsolate => FSI,
            IcuBidiClass::PopDirectionalIsolate => PDI,
            // Unallocated/unknown values fall back to ON, matching ICU's
            // handling of out-of-range Bidi_Class values.
            _ => ON,
        }
    }

    /// The class used for continuation (non-lead) bytes of a multi-byte
    /// UTF-8 sequence, and for BiDi control characters once their control
    /// meaning has been stripped during `write_reordered` (§4.C.2 stage 2:
    /// "trailing bytes ... are filled with BN so that existing UAX #9
    /// tables work unmodified").
    pub const fn continuation_byte() -> Self {
        BN
    }
}

/// Returns the default strong direction (0 = LTR, 1 = RTL) per UAX #9 rule
/// P2/P3, skipping characters inside isolates.
pub(crate) fn default_level(types: &[DirClass]) -> u8 {
    let mut isolates = 0u32;
    for &ty in types {
        match ty {
            RLI | LRI | FSI => isolates += 1,
            PDI => {
                if isolates > 0 {
                    isolates -= 1;
                }
            }
            L | R | AL if isolates == 0 => return if ty == L { 0 } else { 1 },
            _ => {}
        }
    }
    0
}

/// As [`default_level`], but stops scanning (returning LTR) once an
/// unmatched `PDI` is found rather than continuing past the isolate scope.
/// Used to determine an `FSI`'s effective direction (P2/P3 within its own
/// isolate scope only).
pub(crate) fn default_level_until_pdi(types: &[DirClass]) -> u8 {
    let mut isolates = 0u32;
    for &ty in types {
        match ty {
            RLI | LRI | FSI => isolates += 1,
            PDI => {
                if isolates > 0 {
                    isolates -= 1;
                } else {
                    return 0;
                }
            }
            L | R | AL if isolates == 0 => return if ty == L { 0 } else { 1 },
            _ => {}
        }
    }
    0
}

/// The neutral-or-strong class implied purely by a level's parity, used as
/// sos/eos for a level run with no neighbor (X10).
pub(crate) fn type_from_level(level: u8) -> DirClass {
    if level & 1 == 0 {
        L
    } else {
        R
    }
}

pub(crate) const OVERRIDE_MASK: u32 = RLE.mask() | LRE.mask() | RLO.mask() | LRO.mask();
pub(crate) const ISOLATE_MASK: u32 = RLI.mask() | LRI.mask() | FSI.mask();
pub(crate) const EXPLICIT_MASK: u32 = OVERRIDE_MASK | ISOLATE_MASK;
pub(crate) const RTL_MASK: u32 = RLE.mask() | RLO.mask() | RLI.mask();
pub(crate) const REMOVED_BY_X9_MASK: u32 = OVERRIDE_MASK | PDF.mask() | BN.mask();
pub(crate) const BIDI_MASK: u32 = EXPLICIT_MASK | R.mask() | AL.mask() | AN.mask();

pub(crate) fn is_isolate_initiator(ty: DirClass) -> bool {
    ty.mask() & ISOLATE_MASK != 0
}

pub(crate) fn is_removed_by_x9(ty: DirClass) -> bool {
    ty.mask() & REMOVED_BY_X9_MASK != 0
}

/// Whether a class's presence can possibly require running full bidi
/// resolution at all (used as a fast-path gate: all-`L`, level-0 text never
/// needs the explicit/weak/neutral machinery).
pub(crate) fn needs_bidi_resolution(ty: DirClass) -> bool {
    ty.mask() & BIDI_MASK != 0
}
