/// Fayette Station level estimation.
///
/// The Lower New River Gorge has no gauge at Fayette Station; the level
/// there is estimated from the New River at Thurmond discharge via a fixed
/// cubic regression fitted to that specific site pairing. The coefficients
/// and the 2-decimal rounding are part of the site's published behavior
/// and must not drift.

use crate::model::{StageError, WideTable};

// Regression coefficients: level_ft = C0 + C1·q + C2·q² + C3·q³,
// with q in cfs at Thurmond.
const C0: f64 = -3.4;
const C1: f64 = 0.00155;
const C2: f64 = -0.000_000_090_5;
const C3: f64 = 0.000_000_000_002_26;

/// Estimated Fayette Station level in feet for a Thurmond discharge,
/// rounded to 2 decimals. Pure function of its single input.
pub fn level_from_flow(q_cfs: f64) -> f64 {
    let level = C0 + C1 * q_cfs + C2 * q_cfs * q_cfs + C3 * q_cfs * q_cfs * q_cfs;
    round2(level)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Append the derived level column to a pivoted table.
///
/// Every row with a flow for `source_site` gets an estimate; rows where the
/// source flow is missing stay undefined. Fails if no row carries the
/// source column at all, which means the wrong site list was queried.
pub fn estimate_levels(table: &mut WideTable, source_site: &str) -> Result<(), StageError> {
    let source_seen = table.rows.values().any(|row| row.flows.contains_key(source_site));
    if !source_seen {
        return Err(StageError::MissingSourceColumn(source_site.to_string()));
    }

    for row in table.rows.values_mut() {
        row.level_est_ft = row.flows.get(source_site).map(|q| level_from_flow(*q));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WideRow;
    use chrono::{DateTime, FixedOffset, TimeZone};

    fn ts(h: u32) -> DateTime<FixedOffset> {
        FixedOffset::west_opt(4 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, h, 0, 0)
            .unwrap()
    }

    fn row_with_flow(site: &str, q: f64) -> WideRow {
        let mut row = WideRow::default();
        row.flows.insert(site.to_string(), q);
        row
    }

    // --- Worked literal values ----------------------------------------------

    #[test]
    fn test_zero_flow_gives_the_intercept() {
        assert_eq!(level_from_flow(0.0), -3.4);
    }

    #[test]
    fn test_thousand_cfs_literal() {
        // -3.4 + 1.55 - 0.0905 + 0.00226 = -1.93824, rounds to -1.94
        assert_eq!(level_from_flow(1000.0), -1.94);
    }

    #[test]
    fn test_ten_thousand_cfs_literal() {
        // -3.4 + 15.5 - 9.05 + 2.26 = 5.31
        assert_eq!(level_from_flow(10000.0), 5.31);
    }

    #[test]
    fn test_estimate_is_deterministic() {
        assert_eq!(level_from_flow(4321.5), level_from_flow(4321.5));
    }

    // --- Column application -------------------------------------------------

    #[test]
    fn test_estimate_fills_rows_with_source_flow() {
        let mut table = WideTable::default();
        table.rows.insert(ts(10), row_with_flow("03185400", 1000.0));
        table.rows.insert(ts(11), row_with_flow("03185400", 10000.0));

        estimate_levels(&mut table, "03185400").expect("source column present");
        assert_eq!(table.level(ts(10)), Some(-1.94));
        assert_eq!(table.level(ts(11)), Some(5.31));
    }

    #[test]
    fn test_rows_missing_the_source_stay_undefined() {
        let mut table = WideTable::default();
        table.rows.insert(ts(10), row_with_flow("03185400", 1000.0));
        // Only a tributary reading at 11:00, no source flow.
        table.rows.insert(ts(11), row_with_flow("03176500", 2100.0));

        estimate_levels(&mut table, "03185400").expect("source column present");
        assert_eq!(table.level(ts(10)), Some(-1.94));
        assert_eq!(table.level(ts(11)), None);
    }

    #[test]
    fn test_missing_source_column_is_an_error() {
        let mut table = WideTable::default();
        table.rows.insert(ts(10), row_with_flow("03176500", 2100.0));

        assert_eq!(
            estimate_levels(&mut table, "03185400"),
            Err(StageError::MissingSourceColumn("03185400".to_string()))
        );
    }

    #[test]
    fn test_estimate_ignores_other_columns() {
        // The derived column is a function of the source column only.
        let mut table = WideTable::default();
        let mut row = row_with_flow("03185400", 1000.0);
        row.flows.insert("03176500".to_string(), 999999.0);
        table.rows.insert(ts(10), row);

        estimate_levels(&mut table, "03185400").expect("source column present");
        assert_eq!(table.level(ts(10)), Some(-1.94));
    }
}
