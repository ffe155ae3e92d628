/// Long-to-wide reshape.
///
/// Produces one row per distinct timestamp across all stations, one column
/// per station. Duplicate (timestamp, station) pairs with identical values
/// pass through; conflicting duplicates are rejected rather than resolved
/// by write order, so a bad upstream merge cannot silently pick a winner.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};

use crate::model::{StageError, StationReading, WideTable};

/// Reshape long-form readings into a `WideTable`.
///
/// A reading with a missing discharge still claims its timestamp in the
/// index (the row exists with no entry for that station), mirroring how
/// the source data represents sentinel gaps.
pub fn pivot(readings: &[StationReading]) -> Result<WideTable, StageError> {
    if readings.is_empty() {
        return Err(StageError::EmptyTable);
    }

    let mut table = WideTable::default();
    let mut seen: HashMap<(DateTime<FixedOffset>, &str), Option<f64>> = HashMap::new();

    for reading in readings {
        let key = (reading.datetime, reading.site_code.as_str());
        if let Some(previous) = seen.get(&key) {
            if *previous != reading.discharge_cfs {
                return Err(StageError::DuplicateObservation {
                    site_code: reading.site_code.clone(),
                    datetime: reading.datetime.to_rfc3339(),
                });
            }
            continue; // identical duplicate
        }
        seen.insert(key, reading.discharge_cfs);

        let row = table.rows.entry(reading.datetime).or_default();
        if let Some(q) = reading.discharge_cfs {
            row.flows.insert(reading.site_code.clone(), q);
        }
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
