//! Full outer join of projected source tables on `merge_key`.
//!
//! Row membership: every row of every source survives. A key absent from one
//! side gets missing cells for that side's columns. Duplicate keys within a
//! source are NOT collapsed here; matching rows multiply, exactly like a
//! dataframe outer merge, and the consolidator resolves them later.
//!
//! Invariant carried through every table: column 0 is `merge_key`.

use std::collections::{HashMap, HashSet};
use tracing::info;
use tsd_core::source::MERGE_KEY;
use tsd_core::Table;

/// Outer-join two projected tables. Output columns are the left columns
/// followed by the right columns minus `merge_key`. Left rows come first in
/// left order (fanned out per matching right row), then right-only rows in
/// right order.
pub fn outer_join(left: &Table, right: &Table) -> Table {
    debug_assert_eq!(left.columns().first().map(String::as_str), Some(MERGE_KEY));
    debug_assert_eq!(right.columns().first().map(String::as_str), Some(MERGE_KEY));

    let left_width = left.columns().len();
    let right_width = right.columns().len();

    let mut columns = left.columns().to_vec();
    columns.extend(right.columns().iter().skip(1).cloned());
    let mut out = Table::new(columns);

    let mut right_index: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, row) in right.rows().iter().enumerate() {
        let key = row[0].as_deref().unwrap_or("");
        right_index.entry(key).or_default().push(i);
    }
    let left_keys: HashSet<&str> = left
        .rows()
        .iter()
        .map(|row| row[0].as_deref().unwrap_or(""))
        .collect();

    for left_row in left.rows() {
        let key = left_row[0].as_deref().unwrap_or("");
        match right_index.get(key) {
            Some(matches) => {
                for &ri in matches {
                    let mut row = left_row.clone();
                    row.extend(right.rows()[ri][1..].iter().cloned());
                    out.push_row(row);
                }
            }
            None => {
                let mut row = left_row.clone();
                row.extend(std::iter::repeat(None).take(right_width - 1));
                out.push_row(row);
            }
        }
    }

    for right_row in right.rows() {
        let key = right_row[0].as_deref().unwrap_or("");
        if left_keys.contains(key) {
            continue;
        }
        let mut row = Vec::with_capacity(out.columns().len());
        row.push(right_row[0].clone());
        row.extend(std::iter::repeat(None).take(left_width - 1));
        row.extend(right_row[1..].iter().cloned());
        out.push_row(row);
    }

    out
}

/// Fold the projected tables in the fixed source order into one superset
/// table (MFT ⋈ ShimCache ⋈ Amcache ⋈ I30).
pub fn join_all(tables: Vec<Table>) -> Table {
    let mut iter = tables.into_iter();
    let mut superset = match iter.next() {
        Some(first) => first,
        None => Table::new(vec![MERGE_KEY.to_string()]),
    };
    for table in iter {
        superset = outer_join(&superset, &table);
    }
    info!(
        rows = superset.len(),
        columns = superset.columns().len(),
        "superset table assembled"
    );
    superset
}
