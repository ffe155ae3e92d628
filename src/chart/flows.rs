/// Multi-gauge raw-flow hydrograph.
///
/// One line per monitored station over the 7-day window, legend labels
/// from the display-name table, a unified hover that lines every series
/// up by timestamp, and exactly one x tick per calendar day regardless
/// of how dense the readings are.

use chrono::{Duration, NaiveDate};

use crate::chart::level::plot_timestamp;
use crate::chart::spec::{Axis, AxisTitle, ChartSpec, Layout, Legend, Margin, TickVal, Title, Trace};
use crate::config::AppConfig;
use crate::model::{StageError, StationReading};

/// Build the multi-series raw-flow chart from the long-form readings.
///
/// Traces follow the configured station order; stations present in the
/// data but absent from the configuration are appended in first-appearance
/// order and keep their raw site code as the legend label.
pub fn build_flows_chart(
    readings: &[StationReading],
    config: &AppConfig,
    today: NaiveDate,
) -> Result<ChartSpec, StageError> {
    if readings.is_empty() {
        return Err(StageError::EmptyTable);
    }

    let mut trace_order: Vec<&str> = config.site_codes.iter().map(String::as_str).collect();
    for reading in readings {
        if !trace_order.contains(&reading.site_code.as_str()) {
            trace_order.push(&reading.site_code);
        }
    }

    let mut traces = Vec::new();
    for site_code in trace_order {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for reading in readings.iter().filter(|r| r.site_code == site_code) {
            x.push(plot_timestamp(reading.datetime));
            y.push(reading.discharge_cfs);
        }
        if x.is_empty() {
            continue; // configured station with no data this window
        }
        let mut trace = Trace::lines(x, y);
        trace.name = Some(config.display_name(site_code).to_string());
        trace.hovertemplate = Some("%{y:.0f} cfs".to_string());
        traces.push(trace);
    }

    if traces.is_empty() {
        return Err(StageError::NoPlottableData);
    }

    let layout = Layout {
        title: Some(Title::centered("New River Area Gauges")),
        xaxis: day_tick_axis(today),
        yaxis: Axis { title: Some(AxisTitle::new("Flow (cfs)")), ..Default::default() },
        hovermode: Some("x unified"),
        legend: Some(Legend::horizontal_below()),
        margin: Some(Margin { l: 20, r: 20, t: 40, b: 20 }),
        paper_bgcolor: Some("#EEEEEE"),
        plot_bgcolor: Some("#FFF"),
        ..Default::default()
    };

    Ok(ChartSpec { data: traces, layout })
}

/// Pin one tick per calendar day across the trailing 7-day window,
/// labeled month-day, rotated like the level chart's date axis.
fn day_tick_axis(today: NaiveDate) -> Axis {
    let start = today - Duration::days(7);
    let days: Vec<NaiveDate> = (0..7).map(|d| start + Duration::days(d)).collect();
    Axis {
        tickvals: Some(
            days.iter()
                .map(|d| TickVal::Label(d.format("%Y-%m-%d").to_string()))
                .collect(),
        ),
        ticktext: Some(days.iter().map(|d| d.format("%m-%d").to_string()).collect()),
        tickangle: Some(67.5),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
