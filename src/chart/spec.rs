/// Declarative chart description.
///
/// A `ChartSpec` is a serializable subset of the Plotly figure schema,
/// enough to express the two hydrographs this page draws. It is produced
/// by the chart builders and serialized into the page verbatim; nothing
/// downstream inspects it. Field names follow the Plotly JSON schema, so
/// serde renames appear wherever Rust naming differs.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Figure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartSpec {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

// ---------------------------------------------------------------------------
// Traces
// ---------------------------------------------------------------------------

/// A single line series. `y` entries are `None` where the value is
/// undefined, which Plotly renders as a gap.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
}

impl Trace {
    pub fn lines(x: Vec<String>, y: Vec<Option<f64>>) -> Trace {
        Trace {
            kind: "scatter",
            mode: "lines",
            name: None,
            x,
            y,
            line: None,
            hovertemplate: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Line {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<&'static str>,
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shapes: Vec<Shape>,
    pub xaxis: Axis,
    pub yaxis: Axis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovermode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverlabel: Option<HoverLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_bgcolor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<&'static str>,
}

/// Chart title; `x: 0.5` centers it over the plot area.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Title {
    pub text: String,
    pub x: f64,
}

impl Title {
    pub fn centered(text: &str) -> Title {
        Title { text: text.to_string(), x: 0.5 }
    }
}

// ---------------------------------------------------------------------------
// Shapes: background bands and reference lines
// ---------------------------------------------------------------------------

/// A layout shape spanning the full plot width (`xref: "paper"`).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub xref: &'static str,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fillcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    pub layer: &'static str,
}

impl Shape {
    /// Horizontal background band between two levels.
    pub fn hrect(y0: f64, y1: f64, fillcolor: &str, opacity: f64) -> Shape {
        Shape {
            kind: "rect",
            xref: "paper",
            x0: 0.0,
            x1: 1.0,
            y0,
            y1,
            fillcolor: Some(fillcolor.to_string()),
            opacity: Some(opacity),
            line: Some(Line { width: Some(0.0), ..Default::default() }),
            layer: "below",
        }
    }

    /// Horizontal reference line at one level.
    pub fn hline(y: f64, line: Line, opacity: f64) -> Shape {
        Shape {
            kind: "line",
            xref: "paper",
            x0: 0.0,
            x1: 1.0,
            y0: y,
            y1: y,
            fillcolor: None,
            opacity: Some(opacity),
            line: Some(line),
            layer: "below",
        }
    }
}

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

/// A tick position: numeric for value axes, a label for date axes.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum TickVal {
    Num(f64),
    Label(String),
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<AxisTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickvals: Option<Vec<TickVal>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticktext: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickformat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickangle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticks: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticklen: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AxisTitle {
    pub text: String,
}

impl AxisTitle {
    pub fn new(text: &str) -> AxisTitle {
        AxisTitle { text: text.to_string() }
    }
}

// ---------------------------------------------------------------------------
// Hover, legend, margins
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HoverLabel {
    pub bgcolor: &'static str,
    pub font: Font,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Font {
    pub size: u32,
    pub family: &'static str,
}

/// Horizontal legend anchored below the plot area.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Legend {
    pub orientation: &'static str,
    pub yanchor: &'static str,
    pub y: f64,
    pub xanchor: &'static str,
    pub x: f64,
    pub title: LegendTitle,
}

impl Legend {
    pub fn horizontal_below() -> Legend {
        Legend {
            orientation: "h",
            yanchor: "top",
            y: -0.2,
            xanchor: "right",
            x: 1.0,
            title: LegendTitle { text: String::new() },
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LegendTitle {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_serializes_nulls_for_gaps() {
        let trace = Trace::lines(
            vec!["2024-05-01 12:00:00".to_string(), "2024-05-01 13:00:00".to_string()],
            vec![Some(2.5), None],
        );
        let json = serde_json::to_value(&trace).expect("trace serializes");
        assert_eq!(json["type"], "scatter");
        assert_eq!(json["y"][0], 2.5);
        assert!(json["y"][1].is_null());
    }

    #[test]
    fn test_hrect_spans_paper_width_below_traces() {
        let shape = Shape::hrect(-2.0, 2.0, "green", 0.15);
        let json = serde_json::to_value(&shape).expect("shape serializes");
        assert_eq!(json["type"], "rect");
        assert_eq!(json["xref"], "paper");
        assert_eq!(json["x0"], 0.0);
        assert_eq!(json["x1"], 1.0);
        assert_eq!(json["layer"], "below");
        assert_eq!(json["fillcolor"], "green");
        assert_eq!(json["line"]["width"], 0.0);
    }

    #[test]
    fn test_tickvals_mix_numbers_and_labels() {
        let axis = Axis {
            tickvals: Some(vec![
                TickVal::Num(-2.0),
                TickVal::Label("2024-05-01".to_string()),
            ]),
            ..Default::default()
        };
        let json = serde_json::to_value(&axis).expect("axis serializes");
        assert_eq!(json["tickvals"][0], -2.0);
        assert_eq!(json["tickvals"][1], "2024-05-01");
    }

    #[test]
    fn test_unset_layout_fields_are_omitted() {
        let layout = Layout::default();
        let json = serde_json::to_value(&layout).expect("layout serializes");
        assert!(json.get("title").is_none());
        assert!(json.get("shapes").is_none());
        assert!(json.get("legend").is_none());
        // Axes are always present so the template's JS can rely on them.
        assert!(json.get("xaxis").is_some());
        assert!(json.get("yaxis").is_some());
    }
}
