//! The extraction pipeline, stage by stage.
//!
//! ```text
//! raw markdown ──► headings ──► sections ─┐
//!                                         ├─► assign ──► metadata
//! elements (regex or content list) ───────┘
//! ```
//!
//! Data flows strictly one direction; no stage re-enters an earlier one.
//! Every stage is a pure synchronous function over its inputs — the only
//! I/O in the whole pipeline is the optional image-path existence check in
//! [`elements`] — so a parse can run concurrently from any number of
//! threads without locking.

pub mod assign;
pub mod blocks;
pub mod elements;
pub mod headings;
pub mod metadata;
pub mod sections;
