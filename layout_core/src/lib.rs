// Copyright 2026 the layout_core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `layout_core` turns a UTF-8 string plus per-range attribute runs (font,
//! small-caps, subscript, superscript) into a fully resolved, line-broken,
//! bidirectionally reordered sequence of positioned glyph clusters.
//!
//! The crate is organized around the pipeline described by its design
//! document:
//!
//! - [`value_runs`] — piecewise-constant attribute runs and multi-run
//!   intersection (used to segment text by font/script/level/features).
//! - [`script`] — a UAX #24 script-run iterator.
//! - [`bidi`] — a full UAX #9 bidirectional algorithm operating directly on
//!   UTF-8 byte offsets.
//! - [`external`] — the trait boundary to the shaper, line-break iterator,
//!   grapheme-cluster iterator and font registry this crate consumes but
//!   does not implement.
//! - [`font`] — font handle and single-script font descriptor types.
//! - [`builder`] — the layout builder that drives the whole pipeline.
//! - [`layout_info`] — the produced layout and its cursor/hit-test queries.
//!
//! Rasterization, glyph atlases, windowing, and font file loading are
//! out of scope; see the crate's design notes for the external
//! collaborators this crate expects callers to supply.

#![warn(missing_debug_implementations)]
#![warn(unreachable_pub)]

pub mod bidi;
pub mod builder;
pub mod error;
pub mod external;
pub mod font;
pub mod layout_info;
pub mod script;
pub mod value_runs;

pub use bidi::{BidiLevel, Line as BidiLine, Paragraph, ReorderingMode, ReorderingOptions};
pub use builder::{LayoutBuildParams, LayoutBuilder, XAlignment, YAlignment};
pub use error::BidiError;
pub use font::{FontHandle, SingleScriptFont};
pub use layout_info::{CursorAffinity, CursorPosition, LayoutInfo, Line, VisualRun};
pub use value_runs::ValueRuns;
