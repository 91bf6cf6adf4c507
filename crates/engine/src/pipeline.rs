//! Pipeline driver.
//!
//! Strict linear sequence: ingest the four sources, outer-join, consolidate,
//! evaluate rules, score, persist. Nothing is written until every stage has
//! succeeded. `rescore` is the standalone second entry point that re-runs
//! only the scoring pass against an existing merged artifact.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tsd_core::{Error, RunReport, RunSummary, Source};

use crate::score::INDICATOR_COLUMNS;
use crate::{consolidate, ingest, join, persist, rules, score};

/// Locations of the four extracted source CSVs and the output artifact.
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub mft: PathBuf,
    pub shimcache: PathBuf,
    pub amcache: PathBuf,
    pub i30: PathBuf,
    pub output: PathBuf,
}

impl SourcePaths {
    /// The conventional file names the extractors drop into one output
    /// directory.
    pub fn conventional(outdir: &Path) -> Self {
        Self {
            mft: outdir.join("extracted_mft_info.csv"),
            shimcache: outdir.join("extracted_appcompat_info.csv"),
            amcache: outdir.join("amcache_combined_extracted.csv"),
            i30: outdir.join("consolidated_i30_data.csv"),
            output: outdir.join("merged_output.csv"),
        }
    }

    fn for_source(&self, source: Source) -> &Path {
        match source {
            Source::Mft => &self.mft,
            Source::Shimcache => &self.shimcache,
            Source::Amcache => &self.amcache,
            Source::I30 => &self.i30,
        }
    }
}

/// Run the whole correlation pipeline and write the merged artifact.
pub fn run(paths: &SourcePaths) -> Result<RunSummary, Error> {
    let mut report = RunReport::new();

    info!("loading source tables");
    let mut tables = Vec::with_capacity(Source::ALL.len());
    let mut source_rows = BTreeMap::new();
    for source in Source::ALL {
        let table = ingest::ingest_source(source, paths.for_source(source), &mut report)?;
        source_rows.insert(source.as_str().to_string(), table.len() as u64);
        tables.push(table);
    }

    info!("joining source tables");
    let superset = join::join_all(tables);

    info!("consolidating rows");
    let mut merged = consolidate::consolidate(&superset);

    info!("evaluating anomaly rules");
    rules::evaluate(&mut merged, &mut report);

    info!("scoring");
    let indicator_true_counts = score::score(&mut merged);

    persist::write_csv(&merged, &paths.output)?;

    log_non_fatal(&report);
    let summary = RunSummary {
        source_rows,
        unkeyable_rows: report.unkeyable_rows_by_source(),
        distinct_keys: merged.len() as u64,
        indicator_true_counts,
        timestamp_parse_warnings: report.parse_warnings().clone(),
        output_path: paths.output.display().to_string(),
    };
    info!(
        summary = %serde_json::to_string(&summary).unwrap_or_default(),
        "run complete"
    );
    Ok(summary)
}

/// Re-run only the scoring pass against an existing merged artifact,
/// rewriting it in place. All five indicator columns must be present.
pub fn rescore(path: &Path) -> Result<RunSummary, Error> {
    let mut table = persist::read_csv(path)?;

    let missing: Vec<String> = INDICATOR_COLUMNS
        .iter()
        .filter(|c| table.column_index(c).is_none())
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }

    let indicator_true_counts = score::score(&mut table);
    persist::write_csv(&table, path)?;

    Ok(RunSummary {
        source_rows: BTreeMap::new(),
        unkeyable_rows: BTreeMap::new(),
        distinct_keys: table.len() as u64,
        indicator_true_counts,
        timestamp_parse_warnings: BTreeMap::new(),
        output_path: path.display().to_string(),
    })
}

fn log_non_fatal(report: &RunReport) {
    for (source, tally) in report.unkeyable() {
        warn!(
            source,
            rows = tally.rows,
            samples = ?tally.samples,
            "rows excluded from correlation: unkeyable path"
        );
    }
    for (column, example) in report.parse_warnings() {
        warn!(
            column = column.as_str(),
            example = example.as_str(),
            "column had unparsable timestamps, treated as missing"
        );
    }
}
