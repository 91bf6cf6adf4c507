//! Anomaly rule evaluation.
//!
//! Three tri-state comparisons per consolidated row. A genuine file's
//! $STANDARD_INFORMATION timestamps should never be earlier than independent
//! evidence of the file's existence (its ShimCache sighting, its directory
//! index slack entry, or its own compile timestamp); earlier means the $SI
//! attribute was back-dated. Missing or unparsable operands leave the
//! indicator empty, never true or false.

use chrono::{DateTime, Utc};
use tracing::warn;
use tsd_core::table::first_value;
use tsd_core::timestamp::parse_timestamp;
use tsd_core::{RunReport, Table};

/// R1: $SI modify time strictly earlier than the ShimCache sighting.
pub const COL_SI_BEFORE_SHIMCACHE: &str = "$SI M time prior to shimcache time";
/// R2: earliest $SI time strictly earlier than the earliest $I30 time.
pub const COL_SI_BEFORE_I30: &str = "$SI times prior to $I30";
/// R3: earliest $SI time strictly earlier than the executable link date.
pub const COL_SI_BEFORE_LINKDATE: &str = "$SI times prior to exe compile time";

/// Tri-state rule outcome. `Undetermined` serializes as an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    True,
    False,
    Undetermined,
}

impl Indicator {
    fn into_cell(self) -> Option<String> {
        match self {
            Indicator::True => Some("True".to_string()),
            Indicator::False => Some("False".to_string()),
            Indicator::Undetermined => None,
        }
    }
}

/// `true` iff both operands are known and the first strictly precedes the
/// second; empty when either side is missing.
fn strictly_before(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Indicator {
    match (a, b) {
        (Some(a), Some(b)) => {
            if a < b {
                Indicator::True
            } else {
                Indicator::False
            }
        }
        _ => Indicator::Undetermined,
    }
}

/// Min with skip-missing semantics: absent operands do not participate;
/// all-absent means no min.
fn min_present(times: [Option<DateTime<Utc>>; 3]) -> Option<DateTime<Utc>> {
    times.into_iter().flatten().min()
}

/// Parse one timestamp cell. Multi-value consolidated cells use their first
/// (first-seen) segment; an unparsable value is missing and logged once per
/// column with an example.
fn parse_cell(
    table: &Table,
    row: usize,
    column: &str,
    report: &mut RunReport,
) -> Option<DateTime<Utc>> {
    let cell = table.cell(row, column)?;
    let value = first_value(cell);
    match parse_timestamp(value) {
        Some(ts) => Some(ts),
        None => {
            if report.record_parse_warning(column, value) {
                warn!(column, example = value, "unparsable timestamp treated as missing");
            }
            None
        }
    }
}

/// Evaluate R1, R2 and R3 over the consolidated table, appending (or
/// replacing) the three indicator columns.
pub fn evaluate(table: &mut Table, report: &mut RunReport) {
    let rows = table.len();
    let mut r1 = Vec::with_capacity(rows);
    let mut r2 = Vec::with_capacity(rows);
    let mut r3 = Vec::with_capacity(rows);

    for i in 0..rows {
        let created = parse_cell(table, i, "created0x10", report);
        let modified = parse_cell(table, i, "lastmodified0x10", report);
        let record_change = parse_cell(table, i, "lastrecordchange0x10", report);
        let si_min = min_present([created, modified, record_change]);

        let shimcache = parse_cell(table, i, "lastmodifiedtimeutc", report);
        r1.push(strictly_before(modified, shimcache));

        let i30_min = min_present([
            parse_cell(table, i, "btime", report),
            parse_cell(table, i, "mtime", report),
            parse_cell(table, i, "ctime", report),
        ]);
        r2.push(strictly_before(si_min, i30_min));

        let linkdate = parse_cell(table, i, "linkdate", report);
        r3.push(strictly_before(si_min, linkdate));
    }

    table.set_column(
        COL_SI_BEFORE_SHIMCACHE,
        r1.into_iter().map(Indicator::into_cell).collect(),
    );
    table.set_column(
        COL_SI_BEFORE_I30,
        r2.into_iter().map(Indicator::into_cell).collect(),
    );
    table.set_column(
        COL_SI_BEFORE_LINKDATE,
        r3.into_iter().map(Indicator::into_cell).collect(),
    );
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

    #[test]
    fn test_si_modified_before_shimcache_fires() {
        // Scenario: SI modify 2020, ShimCache sighting 2021 -> back-dated.
        let mut t = table(
            &["merge_key", "lastmodified0x10", "lastmodifiedtimeutc"],
            &[&["foo\\bar.exe", "2020-01-01 00:00:00", "2021-06-01 00:00:00"]],
        );
        let mut report = RunReport::new();
        evaluate(&mut t, &mut report);
        assert_eq!(t.cell(0, COL_SI_BEFORE_SHIMCACHE), Some("True"));
    }

    #[test]
    fn test_si_after_linkdate_is_consistent() {
        // SI time later than compile time: no anomaly, explicit False.
        let mut t = table(
            &["merge_key", "created0x10", "linkdate"],
            &[&["foo\\bar.exe", "2020-01-01 00:00:00", "2019-01-01"]],
        );
        let mut report = RunReport::new();
        evaluate(&mut t, &mut report);
        assert_eq!(t.cell(0, COL_SI_BEFORE_LINKDATE), Some("False"));
    }

    #[test]
    fn test_missing_operand_leaves_indicator_empty() {
        let mut t = table(
            &["merge_key", "lastmodified0x10", "lastmodifiedtimeutc", "linkdate"],
            &[
                &["a", "2020-01-01 00:00:00", "", ""],
                &["b", "", "2021-06-01 00:00:00", ""],
            ],
        );
        let mut report = RunReport::new();
        evaluate(&mut t, &mut report);
        assert_eq!(t.cell(0, COL_SI_BEFORE_SHIMCACHE), None);
        assert_eq!(t.cell(1, COL_SI_BEFORE_SHIMCACHE), None);
        assert_eq!(t.cell(0, COL_SI_BEFORE_LINKDATE), None);
        assert_eq!(t.cell(0, COL_SI_BEFORE_I30), None);
    }

    #[test]
    fn test_si_min_skips_missing_fields() {
        // Only lastrecordchange0x10 present on the SI side; it alone is the min.
        let mut t = table(
            &[
                "merge_key",
                "created0x10",
                "lastmodified0x10",
                "lastrecordchange0x10",
                "btime",
                "mtime",
                "ctime",
            ],
            &[&[
                "k",
                "",
                "",
                "2020-01-01 00:00:00",
                "2022-01-01 00:00:00",
                "",
                "2021-01-01 00:00:00",
            ]],
        );
        let mut report = RunReport::new();
        evaluate(&mut t, &mut report);
        // 2020 < min(2022, 2021) = 2021
        assert_eq!(t.cell(0, COL_SI_BEFORE_I30), Some("True"));
    }

    #[test]
    fn test_unparsable_timestamp_is_missing_and_reported_once() {
        let mut t = table(
            &["merge_key", "lastmodified0x10", "lastmodifiedtimeutc"],
            &[
                &["a", "garbage", "2021-06-01 00:00:00"],
                &["b", "also garbage", "2021-06-01 00:00:00"],
            ],
        );
        let mut report = RunReport::new();
        evaluate(&mut t, &mut report);
        assert_eq!(t.cell(0, COL_SI_BEFORE_SHIMCACHE), None);
        assert_eq!(t.cell(1, COL_SI_BEFORE_SHIMCACHE), None);
        // One warning per column, first example retained.
        assert_eq!(report.parse_warnings()["lastmodified0x10"], "garbage");
    }

    #[test]
    fn test_multi_value_cell_uses_first_seen_value() {
        let mut t = table(
            &["merge_key", "lastmodified0x10", "lastmodifiedtimeutc"],
            &[&[
                "k",
                "2020-01-01 00:00:00; 2022-01-01 00:00:00",
                "2021-06-01 00:00:00",
            ]],
        );
        let mut report = RunReport::new();
        evaluate(&mut t, &mut report);
        assert_eq!(t.cell(0, COL_SI_BEFORE_SHIMCACHE), Some("True"));
    }
}
