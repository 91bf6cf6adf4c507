//! Source CSV ingestion and schema projection.
//!
//! Reads one extractor CSV, verifies the source's required columns are all
//! present (fatal if not, naming the file and the columns), projects only
//! those columns, lower-cases the header names, and replaces the path column
//! with the normalized `merge_key`. Rows whose path cannot be keyed are
//! excluded and tallied on the run report.

use std::fs::File;
use std::path::Path;
use tracing::info;
use tsd_core::path_key::normalize;
use tsd_core::source::{MERGE_KEY, PATH_COLUMN};
use tsd_core::{Error, RunReport, Source, Table};

/// Ingest one source file into its projected table. Column 0 of the result
/// is always `merge_key`; the remaining columns follow the source's
/// allowlist order.
pub fn ingest_source(source: Source, path: &Path, report: &mut RunReport) -> Result<Table, Error> {
    let file = File::open(path).map_err(|e| Error::MissingInput {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    // Map each required column to its position in the file.
    let required = source.required_columns();
    let mut indices = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    for column in required {
        match headers.iter().position(|h| h == column) {
            Some(idx) => indices.push(idx),
            None => missing.push((*column).to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(Error::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }

    let mut columns = vec![MERGE_KEY.to_string()];
    columns.extend(
        required
            .iter()
            .filter(|c| **c != PATH_COLUMN)
            .map(|c| c.to_string()),
    );
    let mut table = Table::new(columns);

    let rule = source.strip_rule();
    for record in reader.records() {
        let record = record.map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;

        // required[0] is the path column, so indices[0] points at it.
        let raw_path = record.get(indices[0]).unwrap_or("");
        let key = match normalize(raw_path, rule) {
            Ok(key) => key,
            Err(reason) => {
                report.record_unkeyable(source, raw_path, &reason);
                continue;
            }
        };

        let mut row = Vec::with_capacity(table.columns().len());
        row.push(Some(key.into_string()));
        for &idx in &indices[1..] {
            let value = record.get(idx).map(str::trim).unwrap_or("");
            row.push(if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            });
        }
        table.push_row(row);
    }

    info!(
        source = source.as_str(),
        rows = table.len(),
        "ingested source table"
    );
    Ok(table)
}
