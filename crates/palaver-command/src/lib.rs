//! Command micro-grammars — no I/O, no store, no clocks.
//!
//! A raw message is progressively peeled in a fixed order: a leading
//! `/name` directive, a run of `#tag[:label]` markers, then a `>` or
//! `<n>` context marker. Each step is a pure function over the current
//! remainder, so the whole grammar is unit-testable in isolation.

pub mod args;
pub mod peel;
pub mod tags;

pub use peel::{peel, PeelError, Peeled};
pub use tags::{LabelMap, TagSet};
