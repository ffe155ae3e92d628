/// Estimated-level hydrograph.
///
/// One blue line of the derived Fayette Station level over the 7-day
/// window, drawn over colored difficulty bands with dashed half-foot
/// reference lines. The y-axis holds a fixed [-2, 8] window unless the
/// water is unusually high or low, in which case it widens to fit.

use chrono::{DateTime, FixedOffset};

use crate::config::AppConfig;
use crate::model::{StageError, WideTable};
use crate::chart::spec::{
    Axis, AxisTitle, ChartSpec, Font, HoverLabel, Layout, Line, Margin, Shape, TickVal, Title,
    Trace,
};

/// Default y-axis window in feet; widened only when the data escapes it.
const Y_DEFAULT_MIN: f64 = -2.0;
const Y_DEFAULT_MAX: f64 = 8.0;

/// Dashed reference lines at every half-foot from -1.5 to 12.5.
const GRIDLINE_FIRST: f64 = -1.5;
const GRIDLINE_COUNT: usize = 15;

/// Build the single-series estimated-level chart.
///
/// Fails with `NoPlottableData` when no row carries a defined estimate;
/// a line with no points is worse than an absent section.
pub fn build_level_chart(table: &WideTable, config: &AppConfig) -> Result<ChartSpec, StageError> {
    let defined: Vec<f64> = table.rows.values().filter_map(|r| r.level_est_ft).collect();
    if defined.is_empty() {
        return Err(StageError::NoPlottableData);
    }
    let data_min = defined.iter().copied().fold(f64::INFINITY, f64::min);
    let data_max = defined.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let x: Vec<String> = table.rows.keys().map(|ts| plot_timestamp(*ts)).collect();
    let y: Vec<Option<f64>> = table.rows.values().map(|r| r.level_est_ft).collect();

    let mut trace = Trace::lines(x, y);
    trace.line = Some(Line { color: Some("Blue".to_string()), width: Some(2.0), ..Default::default() });
    trace.hovertemplate = Some("%{y:.1f} '<br>%{x|%I:%M %p}".to_string());

    let mut shapes: Vec<Shape> = config
        .hazard_bands
        .iter()
        .map(|band| Shape::hrect(band.floor_ft, band.ceiling_ft, &band.color, 0.15))
        .collect();
    for i in 0..GRIDLINE_COUNT {
        let y = GRIDLINE_FIRST + i as f64;
        shapes.push(Shape::hline(
            y,
            Line { color: Some("white".to_string()), width: Some(0.5), dash: Some("dash") },
            0.5,
        ));
    }

    let layout = Layout {
        title: Some(Title::centered("Estimated Fayette Station Level")),
        shapes,
        xaxis: Axis {
            tickformat: Some("%m-%d".to_string()),
            tickangle: Some(67.5),
            ..Default::default()
        },
        yaxis: Axis {
            title: Some(AxisTitle::new("Feet")),
            range: Some(y_range(data_min, data_max)),
            tickvals: Some((-2..=12).map(|v| TickVal::Num(v as f64)).collect()),
            ticks: Some("outside"),
            ticklen: Some(5.0),
            ..Default::default()
        },
        hoverlabel: Some(HoverLabel { bgcolor: "white", font: Font { size: 12, family: "Tahoma" } }),
        margin: Some(Margin { l: 20, r: 20, t: 40, b: 20 }),
        paper_bgcolor: Some("#EEEEEE"),
        ..Default::default()
    };

    Ok(ChartSpec { data: vec![trace], layout })
}

/// Fixed default window, widened by half a foot below the data's low and a
/// full foot above its high whenever the data escapes [-2, 8].
fn y_range(data_min: f64, data_max: f64) -> [f64; 2] {
    [
        (data_min - 0.5).min(Y_DEFAULT_MIN),
        (data_max + 1.0).max(Y_DEFAULT_MAX),
    ]
}

/// Timestamps are plotted in the gauge's own local time.
pub(crate) fn plot_timestamp(ts: DateTime<FixedOffset>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
