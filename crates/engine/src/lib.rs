//! Timestomp detection engine.
//!
//! Cross-references file timestamps recovered from four independent Windows
//! artifacts and flags files whose $STANDARD_INFORMATION times are earlier
//! than corroborating evidence of the file's existence.
//!
//! ## Pipeline
//!
//! ```text
//!  MFT csv ─────┐
//!  ShimCache ───┤   ingest      join        consolidate    rules     score
//!  Amcache ─────┼─▶ (project) ─▶ (outer) ─▶ (collapse) ─▶ (R1-R3) ─▶ (true_count) ─▶ merged_output.csv
//!  $I30 csv ────┘
//! ```
//!
//! Every stage fully materializes its output before the next begins; a fatal
//! error anywhere aborts the run before anything is written.

pub mod consolidate;
pub mod ingest;
pub mod join;
pub mod logging;
pub mod persist;
pub mod pipeline;
pub mod rules;
pub mod score;

pub use pipeline::{rescore, run, SourcePaths};
