//! Composite suspicion score.
//!
//! Counts the indicators that are strictly true per row over a fixed set:
//! the two upstream MFT flags (`si<fn`, `useczeros`, carried through
//! unchanged) plus the three comparison rules. Empty, non-boolean, or
//! disagreeing multi-value cells ("True; False") contribute zero, never an
//! error. Replacing an existing `true_count` column keeps a second scoring
//! pass idempotent.

use std::collections::BTreeMap;
use tracing::info;
use tsd_core::Table;

use crate::rules::{COL_SI_BEFORE_I30, COL_SI_BEFORE_LINKDATE, COL_SI_BEFORE_SHIMCACHE};

pub const COL_TRUE_COUNT: &str = "true_count";

/// The fixed indicator set, in scoring order. `true_count` is bounded by its
/// length.
pub const INDICATOR_COLUMNS: [&str; 5] = [
    "si<fn",
    "useczeros",
    COL_SI_BEFORE_SHIMCACHE,
    COL_SI_BEFORE_I30,
    COL_SI_BEFORE_LINKDATE,
];

/// A cell counts only when it is exactly the boolean literal `True`.
fn is_true_cell(cell: &str) -> bool {
    cell.trim().eq_ignore_ascii_case("true")
}

/// Append (or replace) `true_count`. Returns how many rows had each
/// indicator true, for the run summary.
pub fn score(table: &mut Table) -> BTreeMap<String, u64> {
    let mut per_indicator: BTreeMap<String, u64> = INDICATOR_COLUMNS
        .iter()
        .map(|c| (c.to_string(), 0))
        .collect();

    let mut counts = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let mut row_count = 0u32;
        for column in INDICATOR_COLUMNS {
            if table.cell(row, column).is_some_and(is_true_cell) {
                row_count += 1;
                if let Some(n) = per_indicator.get_mut(column) {
                    *n += 1;
                }
            }
        }
        counts.push(Some(row_count.to_string()));
    }
    table.set_column(COL_TRUE_COUNT, counts);

    info!(rows = table.len(), "scored consolidated table");
    per_indicator
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        let mut t = Table::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            t.push_row(
                row.iter()
                    .map(|v| {
                        if v.is_empty() {
                            None
                        } else {
                            Some(v.to_string())
                        }
                    })
                    .collect(),
            );
        }
        t
    }

    fn full_columns() -> Vec<&'static str> {
        let mut cols = vec!["merge_key"];
        cols.extend(INDICATOR_COLUMNS);
        cols
    }

    #[test]
    fn test_score_counts_only_true_cells() {
        let mut t = table(
            &full_columns(),
            &[
                &["a", "True", "False", "True", "", "True"],
                &["b", "", "", "", "", ""],
                &["c", "True", "True", "True", "True", "True"],
            ],
        );
        score(&mut t);
        assert_eq!(t.cell(0, COL_TRUE_COUNT), Some("3"));
        assert_eq!(t.cell(1, COL_TRUE_COUNT), Some("0"));
        assert_eq!(t.cell(2, COL_TRUE_COUNT), Some("5"));
    }

    #[test]
    fn test_score_bound_holds() {
        let mut t = table(
            &full_columns(),
            &[&["k", "True", "True", "True", "True", "True"]],
        );
        score(&mut t);
        let n: u32 = t.cell(0, COL_TRUE_COUNT).unwrap().parse().unwrap();
        assert!(n <= INDICATOR_COLUMNS.len() as u32);
    }

    #[test]
    fn test_disagreeing_multi_value_cell_counts_zero() {
        // A consolidated "True; False" is disagreement, not a boolean.
        let mut t = table(&full_columns(), &[&["k", "True; False", "", "", "", ""]]);
        score(&mut t);
        assert_eq!(t.cell(0, COL_TRUE_COUNT), Some("0"));
    }

    #[test]
    fn test_rescoring_replaces_count_without_drift() {
        let mut t = table(&full_columns(), &[&["k", "True", "", "", "", "True"]]);
        score(&mut t);
        let columns_after_first = t.columns().to_vec();
        let first = t.cell(0, COL_TRUE_COUNT).map(str::to_string);

        score(&mut t);
        assert_eq!(t.columns(), columns_after_first.as_slice());
        assert_eq!(t.cell(0, COL_TRUE_COUNT).map(str::to_string), first);
        assert_eq!(first.as_deref(), Some("2"));
    }
}
