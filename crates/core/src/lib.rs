//! Core types for the timestomp correlation pipeline.
//!
//! This crate carries everything the engine needs that is not a pipeline
//! stage: the artifact source catalog (required columns, prefix-strip rules),
//! the join-key normalizer, lenient timestamp parsing, the in-memory table
//! model, the fatal error taxonomy, and the non-fatal run report.

pub mod error;
pub mod path_key;
pub mod report;
pub mod source;
pub mod table;
pub mod timestamp;

pub use error::Error;
pub use path_key::{normalize, JoinKey, Unkeyable};
pub use report::{RunReport, RunSummary};
pub use source::{PrefixStripRule, Source};
pub use table::Table;
