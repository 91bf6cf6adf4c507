//! CSV persistence for the merged artifact.
//!
//! Writes go to a temp file in the destination directory and are renamed
//! into place, so a failed run never leaves a partial artifact behind.

use std::fs::File;
use std::path::Path;
use tracing::info;
use tsd_core::{Error, Table};

/// Read a previously merged artifact back in, headers as-is. Empty cells
/// become missing values.
pub fn read_csv(path: &Path) -> Result<Table, Error> {
    let file = File::open(path).map_err(|e| Error::MissingInput {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let mut table = Table::new(columns);

    for record in reader.records() {
        let record = record.map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
        let row = record
            .iter()
            .map(|v| {
                if v.is_empty() {
                    None
                } else {
                    Some(v.to_string())
                }
            })
            .collect();
        table.push_row(row);
    }
    Ok(table)
}

/// Write the table to `path` atomically (temp file, then rename). Missing
/// cells serialize as empty fields.
pub fn write_csv(table: &Table, path: &Path) -> Result<(), Error> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut writer = csv::Writer::from_writer(tmp.as_file());
    writer.write_record(table.columns()).map_err(|e| Error::Csv {
        path: path.to_path_buf(),
        source: e,
    })?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))
            .map_err(|e| Error::Csv {
                path: path.to_path_buf(),
                source: e,
            })?;
    }
    writer.flush().map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    drop(writer);

    tmp.persist(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    info!(path = %path.display(), rows = table.len(), "wrote merged artifact");
    Ok(())
}
