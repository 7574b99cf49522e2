// Copyright 2026 the layout_core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types surfaced at the BiDi engine's API boundary.
//!
//! The layout builder (see [`crate::builder`]) never fails outright: per the
//! design, shaper and font-registry failures are absorbed and reported
//! through a caller-supplied logging callback instead of propagating an
//! error. Only the lower-level BiDi engine returns `Result`.

/// Errors returned by [`crate::bidi::Paragraph`] and [`crate::bidi::Line`].
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum BidiError {
    /// An argument was outside its valid range: a paragraph level outside
    /// `0..=125` (excluding the default-direction sentinels), a line range
    /// outside its parent paragraph, or a reordering mode outside the
    /// enumerated set.
    #[error("illegal argument: {0}")]
    IllegalArgument(&'static str),

    /// `write_reordered` was preflighted with a destination shorter than the
    /// required length. Not fatal: the call still reports the required
    /// length so the caller can allocate and retry.
    #[error("destination buffer too small: need {required} bytes, have {available}")]
    BufferOverflow {
        /// Bytes required to hold the full reordered output.
        required: usize,
        /// Bytes actually available in the destination the caller passed.
        available: usize,
    },

    /// Growing one of the engine's internal scratch arrays (isolates,
    /// bracket openings, paragraphs, runs) failed.
    #[error("memory allocation failed while growing `{0}`")]
    MemoryAllocation(&'static str),
}

/// Failures surfaced by the external collaborators the layout builder
/// consumes (§6/§7). The builder never fails because of these: it logs them
/// through [`log`] and substitutes a `.notdef` glyph or an arbitrary
/// registry font to make forward progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollaboratorFailure {
    /// The shaper could not shape a run (e.g. a scalar value had no glyph
    /// in the selected face).
    ShaperFailure,
    /// The font registry could not resolve a sub-font for some part of a
    /// run's text.
    RegistryUnavailable,
}
