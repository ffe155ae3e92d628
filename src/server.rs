/// Single-route web shell.
///
/// `GET /` runs the full pipeline and renders the page. The pipeline is
/// synchronous and blocking (one outbound USGS call), so it runs under
/// `spawn_blocking`; the handler itself only substitutes the serialized
/// chart payloads and summary strings into the HTML template. The page
/// must render whatever subset of items survived the pipeline.

use std::sync::Arc;

use axum::{Router, extract::State, response::Html, routing::get};

use crate::analysis::summary::NOT_AVAILABLE;
use crate::config::AppConfig;
use crate::logging::{self, LogSource};
use crate::page::{self, PageItems};

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

pub fn router(config: Arc<AppConfig>) -> Router {
    Router::new().route("/", get(index)).with_state(config)
}

async fn index(State(config): State<Arc<AppConfig>>) -> Html<String> {
    let items = tokio::task::spawn_blocking(move || page::create_page_items(&config))
        .await
        .unwrap_or_else(|e| {
            logging::error(LogSource::Http, None, &format!("pipeline task panicked: {}", e));
            PageItems::default()
        });
    Html(render_index(&items))
}

/// Substitute the page items into the template. Absent charts become JSON
/// `null` (the template's script skips them); an absent summary renders
/// its fallback line.
pub fn render_index(items: &PageItems) -> String {
    let summary_html = match &items.text_info {
        Some(bundle) => format!(
            "Estimated Fayette Station level: <strong>{:.1}&apos;</strong> at {}<br>\
             Change in the last hour: {}",
            bundle.latest_level_ft, bundle.latest_time, bundle.hourly_change,
        ),
        None => format!("Current level information is {}", NOT_AVAILABLE),
    };
    let yesterday_html = items
        .text_info
        .as_ref()
        .map(|b| b.yesterday_msg.clone())
        .unwrap_or_default();

    INDEX_TEMPLATE
        .replace("{{summary_html}}", &summary_html)
        .replace("{{yesterday_html}}", &yesterday_html)
        .replace("{{level_chart_json}}", &chart_json(&items.level_chart))
        .replace("{{flow_chart_json}}", &chart_json(&items.flow_chart))
}

fn chart_json(chart: &Option<crate::chart::spec::ChartSpec>) -> String {
    match chart {
        Some(spec) => serde_json::to_string(spec).unwrap_or_else(|e| {
            logging::error(LogSource::Http, None, &format!("chart serialization failed: {}", e));
            "null".to_string()
        }),
        None => "null".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::spec::{Axis, ChartSpec, Layout, Trace};
    use crate::model::SummaryBundle;

    fn minimal_chart() -> ChartSpec {
        ChartSpec {
            data: vec![Trace::lines(
                vec!["2024-05-01 12:00:00".to_string()],
                vec![Some(2.5)],
            )],
            layout: Layout { xaxis: Axis::default(), yaxis: Axis::default(), ..Default::default() },
        }
    }

    #[test]
    fn test_render_with_all_items_present() {
        let items = PageItems {
            text_info: Some(SummaryBundle {
                latest_level_ft: 2.5,
                latest_time: "02:15 PM".to_string(),
                hourly_change: "0.25".to_string(),
                yesterday_msg: "Yesterday's peak...".to_string(),
            }),
            level_chart: Some(minimal_chart()),
            flow_chart: Some(minimal_chart()),
        };
        let html = render_index(&items);

        assert!(html.contains("2.5&apos;"));
        assert!(html.contains("02:15 PM"));
        assert!(html.contains("0.25"));
        assert!(html.contains(r#""type":"scatter""#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_render_with_everything_null_still_produces_a_page() {
        let html = render_index(&PageItems::default());

        assert!(html.contains("not available"));
        // Both chart slots degrade to a JSON null the script can test for.
        assert!(html.contains("= null"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_absent_chart_serializes_as_null() {
        assert_eq!(chart_json(&None), "null");
    }
}
