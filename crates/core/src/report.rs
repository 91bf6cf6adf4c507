//! Non-fatal run accounting.
//!
//! Unkeyable rows and unparsable timestamps never abort the run; they are
//! tallied here and summarized once at the end, next to the success output.

use crate::path_key::Unkeyable;
use crate::source::Source;
use serde::Serialize;
use std::collections::BTreeMap;

/// Cap on retained raw-path samples per source.
const MAX_UNKEYABLE_SAMPLES: usize = 5;

#[derive(Debug, Clone, Default, Serialize)]
pub struct UnkeyableTally {
    pub rows: u64,
    pub samples: Vec<String>,
}

/// Accumulator for everything non-fatal observed during a run.
#[derive(Debug, Default)]
pub struct RunReport {
    unkeyable: BTreeMap<&'static str, UnkeyableTally>,
    parse_warnings: BTreeMap<String, String>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a row excluded from correlation because its path could not be
    /// normalized. Keeps a bounded number of sample paths per source.
    pub fn record_unkeyable(&mut self, source: Source, raw: &str, reason: &Unkeyable) {
        let tally = self.unkeyable.entry(source.as_str()).or_default();
        tally.rows += 1;
        if tally.samples.len() < MAX_UNKEYABLE_SAMPLES {
            tally.samples.push(format!("{} ({})", raw, reason));
        }
    }

    /// Record an unparsable timestamp. Returns `true` only the first time a
    /// column is reported, so the caller can log once per column.
    pub fn record_parse_warning(&mut self, column: &str, example: &str) -> bool {
        if self.parse_warnings.contains_key(column) {
            return false;
        }
        self.parse_warnings
            .insert(column.to_string(), example.to_string());
        true
    }

    pub fn unkeyable(&self) -> &BTreeMap<&'static str, UnkeyableTally> {
        &self.unkeyable
    }

    pub fn unkeyable_total(&self) -> u64 {
        self.unkeyable.values().map(|t| t.rows).sum()
    }

    pub fn parse_warnings(&self) -> &BTreeMap<String, String> {
        &self.parse_warnings
    }

    pub fn unkeyable_rows_by_source(&self) -> BTreeMap<String, u64> {
        self.unkeyable
            .iter()
            .map(|(s, t)| (s.to_string(), t.rows))
            .collect()
    }
}

/// End-of-run summary, logged and returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Rows ingested per source (after unkeyable exclusion).
    pub source_rows: BTreeMap<String, u64>,
    /// Rows excluded per source because their path was unkeyable.
    pub unkeyable_rows: BTreeMap<String, u64>,
    /// Distinct join keys, which is also the output row count.
    pub distinct_keys: u64,
    /// How many rows had each indicator strictly true.
    pub indicator_true_counts: BTreeMap<String, u64>,
    /// Columns with at least one unparsable timestamp, with an example value.
    pub timestamp_parse_warnings: BTreeMap<String, String>,
    pub output_path: String,
}
