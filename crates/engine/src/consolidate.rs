//! Group-and-collapse: one row per distinct join key.
//!
//! For each group of superset rows sharing a key, every column collapses to
//! the distinct non-missing values in first-seen order, joined with `"; "`.
//! Lossy but auditable: when sources disagree, both values stay visible in
//! the cell. Output rows are sorted by key for determinism.

use std::collections::HashMap;
use tracing::info;
use tsd_core::table::merge_distinct;
use tsd_core::Table;

pub fn consolidate(superset: &Table) -> Table {
    let width = superset.columns().len();

    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, row) in superset.rows().iter().enumerate() {
        let key = row[0].as_deref().unwrap_or("");
        groups.entry(key).or_default().push(i);
    }
    let mut ordered: Vec<(&str, Vec<usize>)> = groups.into_iter().collect();
    ordered.sort_by(|a, b| a.0.cmp(b.0));

    let mut out = Table::new(superset.columns().to_vec());
    for (key, indices) in ordered {
        let mut row = Vec::with_capacity(width);
        row.push(Some(key.to_string()));
        for col in 1..width {
            let merged = merge_distinct(
                indices
                    .iter()
                    .filter_map(|&i| superset.rows()[i][col].as_deref()),
            );
            row.push(if merged.is_empty() { None } else { Some(merged) });
        }
        out.push_row(row);
    }

    info!(
        input_rows = superset.len(),
        output_rows = out.len(),
        "consolidated superset by merge key"
    );
    out
}
