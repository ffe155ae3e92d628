/// Summary text computation.
///
/// Produces the four values the page template renders: latest estimated
/// level with its clock time, the hour-over-hour change, and the previous
/// calendar day's peak/low. The hourly change and previous-day extremes
/// are independently fault-tolerant; each falls back to its own
/// "not available" text without touching the others. The latest reading
/// is the one required piece; without it there is no summary at all.

use chrono::{DateTime, Duration, FixedOffset};

use crate::model::{StageError, SummaryBundle, WideTable};

/// Fallback text for an unavailable hourly change.
pub const NOT_AVAILABLE: &str = "not available";

/// Fallback text for unavailable previous-day extremes.
pub const YESTERDAY_UNAVAILABLE: &str = "Info on yesterday's min/max not available";

// ---------------------------------------------------------------------------
// Bundle assembly
// ---------------------------------------------------------------------------

/// Compute the summary bundle from a pivoted table with the derived column.
///
/// Fails only when no row has a defined estimate; the two optional fields
/// degrade to their fallback text on their own.
pub fn compute_summary(table: &WideTable) -> Result<SummaryBundle, StageError> {
    let (latest_ts, latest_level) = latest_reading(table)?;

    let hourly_change = match hourly_change(table, latest_ts) {
        Ok(delta) => format!("{:.2}", delta),
        Err(_) => NOT_AVAILABLE.to_string(),
    };

    let yesterday_msg = match previous_day_extremes(table, latest_ts) {
        Ok(extremes) => extremes.to_message(),
        Err(_) => YESTERDAY_UNAVAILABLE.to_string(),
    };

    Ok(SummaryBundle {
        latest_level_ft: round1(latest_level),
        latest_time: format_clock(latest_ts),
        hourly_change,
        yesterday_msg,
    })
}

// ---------------------------------------------------------------------------
// Sub-computations
// ---------------------------------------------------------------------------

/// The row with the maximum timestamp among rows with a defined estimate.
pub fn latest_reading(table: &WideTable) -> Result<(DateTime<FixedOffset>, f64), StageError> {
    table.latest_estimated().ok_or(StageError::NoEstimatedLevels)
}

/// Level at `latest_ts` minus the level exactly one hour earlier.
///
/// No interpolation and no nearest-match fallback: if either endpoint row
/// is absent or undefined, the change is unavailable.
pub fn hourly_change(
    table: &WideTable,
    latest_ts: DateTime<FixedOffset>,
) -> Result<f64, StageError> {
    let now = table.level(latest_ts).ok_or(StageError::MissingHourEndpoint)?;
    let hour_ago = table
        .level(latest_ts - Duration::hours(1))
        .ok_or(StageError::MissingHourEndpoint)?;
    Ok(now - hour_ago)
}

/// Previous calendar day's peak and low, with first-occurrence timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct DayExtremes {
    pub peak_level_ft: f64,
    pub peak_time: DateTime<FixedOffset>,
    pub min_level_ft: f64,
    pub min_time: DateTime<FixedOffset>,
}

impl DayExtremes {
    fn to_message(&self) -> String {
        format!(
            "Yesterday's <strong>peak</strong> level of <strong>{:.1}&apos;</strong> occurred at {},<br>\
             Yesterday's <strong>low</strong> level of <strong>{:.1}&apos;</strong> occurred at {}",
            round1(self.peak_level_ft),
            format_clock(self.peak_time),
            round1(self.min_level_ft),
            format_clock(self.min_time),
        )
    }
}

/// Extremes of the derived column over the calendar day before the latest
/// reading's date. Ties report the earliest timestamp, and comparisons use
/// strict inequality so the first occurrence always wins.
pub fn previous_day_extremes(
    table: &WideTable,
    latest_ts: DateTime<FixedOffset>,
) -> Result<DayExtremes, StageError> {
    let yesterday = (latest_ts - Duration::days(1)).date_naive();

    let mut extremes: Option<DayExtremes> = None;
    for (ts, row) in table.rows_on(yesterday) {
        let Some(level) = row.level_est_ft else { continue };
        match extremes.as_mut() {
            None => {
                extremes = Some(DayExtremes {
                    peak_level_ft: level,
                    peak_time: ts,
                    min_level_ft: level,
                    min_time: ts,
                });
            }
            Some(e) => {
                if level > e.peak_level_ft {
                    e.peak_level_ft = level;
                    e.peak_time = ts;
                }
                if level < e.min_level_ft {
                    e.min_level_ft = level;
                    e.min_time = ts;
                }
            }
        }
    }

    extremes.ok_or(StageError::NoPriorDayRows)
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// 12-hour clock time in the reading's own offset, e.g. "02:15 PM".
fn format_clock(ts: DateTime<FixedOffset>) -> String {
    ts.format("%I:%M %p").to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
