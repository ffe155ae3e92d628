/// Core data types for the New River gauge page service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O and no external service knowledge beyond the USGS
/// parameter and sentinel constants, only types.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};

// ---------------------------------------------------------------------------
// Parameter codes and sentinels
// ---------------------------------------------------------------------------

/// USGS parameter code for discharge (streamflow), in cubic feet per second.
pub const PARAM_DISCHARGE: &str = "00060";

/// Documented NWIS "no data" sentinel. A reading carrying this value must be
/// treated as missing, never as a valid discharge.
pub const NWIS_NO_DATA: f64 = -999999.0;

// ---------------------------------------------------------------------------
// Long-form readings
// ---------------------------------------------------------------------------

/// A single instantaneous discharge observation from a USGS gauge station.
///
/// Corresponds to one entry in the `values[].value[]` array of a USGS
/// IV API response. `discharge_cfs` is `None` where the service reported
/// the `-999999` sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct StationReading {
    pub site_code: String,
    pub datetime: DateTime<FixedOffset>,
    pub discharge_cfs: Option<f64>,
}

/// Row-per-observation form of the telemetry, as returned by acquisition.
/// Not required to be sorted; timestamps may repeat across stations.
pub type LongTable = Vec<StationReading>;

// ---------------------------------------------------------------------------
// Wide-form table
// ---------------------------------------------------------------------------

/// One timestamp's worth of pivoted data: discharge per station, plus the
/// derived Fayette Station level estimate once `analysis::estimate` has run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideRow {
    /// site_code -> discharge in cfs. Missing entries are allowed.
    pub flows: BTreeMap<String, f64>,
    /// Estimated level at Fayette Station, in feet, rounded to 2 decimals.
    /// `None` until estimation runs, and wherever the source flow is missing.
    pub level_est_ft: Option<f64>,
}

/// Pivoted telemetry keyed by timestamp. The `BTreeMap` keeps the index
/// unique and chronologically ordered, which the summary stage relies on
/// for calendar-date slicing and first-occurrence tie-breaks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideTable {
    pub rows: BTreeMap<DateTime<FixedOffset>, WideRow>,
}

impl WideTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Discharge for one station at one timestamp, if observed.
    pub fn flow(&self, ts: DateTime<FixedOffset>, site_code: &str) -> Option<f64> {
        self.rows.get(&ts).and_then(|r| r.flows.get(site_code).copied())
    }

    /// Estimated level at one timestamp, if defined.
    pub fn level(&self, ts: DateTime<FixedOffset>) -> Option<f64> {
        self.rows.get(&ts).and_then(|r| r.level_est_ft)
    }

    /// The most recent timestamp with a defined level estimate, with its value.
    pub fn latest_estimated(&self) -> Option<(DateTime<FixedOffset>, f64)> {
        self.rows
            .iter()
            .rev()
            .find_map(|(ts, row)| row.level_est_ft.map(|v| (*ts, v)))
    }

    /// All rows whose timestamp falls on the given calendar date, in
    /// chronological order. Dates are taken in each reading's own offset,
    /// matching how the gauges report local time.
    pub fn rows_on(&self, date: NaiveDate) -> Vec<(DateTime<FixedOffset>, &WideRow)> {
        self.rows
            .iter()
            .filter(|(ts, _)| ts.date_naive() == date)
            .map(|(ts, row)| (*ts, row))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Summary bundle
// ---------------------------------------------------------------------------

/// The four text values consumed by the page template, in render order.
///
/// `hourly_change` and `yesterday_msg` carry their own fallback text when
/// the underlying sub-computation was unavailable; the latest reading is
/// required, so a `SummaryBundle` never exists without it.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryBundle {
    /// Latest estimated level in feet, rounded to 1 decimal.
    pub latest_level_ft: f64,
    /// Clock time of the latest reading, e.g. "02:15 PM".
    pub latest_time: String,
    /// Change over the previous hour rounded to 2 decimals, or "not available".
    pub hourly_change: String,
    /// Previous calendar day's peak/low message, or its fallback text.
    pub yesterday_msg: String,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise at any stage of the page pipeline.
///
/// Each stage converts its failure into one of these reason codes at the
/// stage boundary, so tests can distinguish "no data from the service" from
/// "malformed data" from a genuine transformation bug even though the page
/// itself only ever sees a null placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum StageError {
    /// Non-2xx HTTP response from the USGS API.
    HttpStatus(u16),
    /// The request could not be sent or the body could not be read.
    Request(String),
    /// The response body could not be deserialized or a field was malformed.
    Parse(String),
    /// The service returned no observations, or a stage received an empty table.
    EmptyTable,
    /// Two readings for the same (timestamp, station) pair disagree.
    DuplicateObservation { site_code: String, datetime: String },
    /// The pivoted table has no column for the estimation source station.
    MissingSourceColumn(String),
    /// No row carries a defined level estimate.
    NoEstimatedLevels,
    /// No reading exists exactly one hour before the latest one.
    MissingHourEndpoint,
    /// The previous calendar day has no rows with a defined estimate.
    NoPriorDayRows,
    /// A chart builder was handed nothing it could plot.
    NoPlottableData,
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageError::HttpStatus(code) => write!(f, "HTTP error: {}", code),
            StageError::Request(msg) => write!(f, "Request failed: {}", msg),
            StageError::Parse(msg) => write!(f, "Parse error: {}", msg),
            StageError::EmptyTable => write!(f, "No observations available"),
            StageError::DuplicateObservation { site_code, datetime } => {
                write!(f, "Conflicting duplicate reading for site {} at {}", site_code, datetime)
            }
            StageError::MissingSourceColumn(site) => {
                write!(f, "No column for estimation source site: {}", site)
            }
            StageError::NoEstimatedLevels => write!(f, "No defined level estimates"),
            StageError::MissingHourEndpoint => {
                write!(f, "No reading exactly one hour before the latest")
            }
            StageError::NoPriorDayRows => {
                write!(f, "No estimated levels on the previous calendar day")
            }
            StageError::NoPlottableData => write!(f, "No plottable data"),
        }
    }
}

impl std::error::Error for StageError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
