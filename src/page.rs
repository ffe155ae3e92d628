/// Page-item orchestration.
///
/// Runs the full pipeline for one page load: acquisition, pivot and
/// estimation, summary, and both chart builders. Every stage is isolated:
/// a failure nulls that stage's output, gets logged with its reason code,
/// and leaves the sibling stages alone. One degraded visualization must
/// not blank the entire page.

use chrono::{Local, NaiveDate};

use crate::analysis::{estimate, pivot, summary};
use crate::chart::{flows, level, spec::ChartSpec};
use crate::config::AppConfig;
use crate::ingest::usgs;
use crate::logging::{self, LogSource};
use crate::model::{StageError, StationReading, SummaryBundle, WideTable};

/// Everything the page template consumes. Any element may be absent.
#[derive(Debug, Clone, Default)]
pub struct PageItems {
    pub text_info: Option<SummaryBundle>,
    pub level_chart: Option<ChartSpec>,
    pub flow_chart: Option<ChartSpec>,
}

/// Fetch and assemble all page items. One outbound USGS call, no caching;
/// every request rebuilds everything from scratch.
pub fn create_page_items(config: &AppConfig) -> PageItems {
    let client = reqwest::blocking::Client::new();

    let readings = match usgs::fetch_discharge(&client, config) {
        Ok(readings) => Some(readings),
        Err(e) => {
            logging::log_stage_failure(LogSource::Usgs, "acquisition", &e);
            None
        }
    };

    assemble(config, readings.as_deref(), Local::now().date_naive())
}

/// Assemble page items from already-acquired readings.
///
/// Split from `create_page_items` so the whole degradation matrix is
/// testable without a network.
pub fn assemble(
    config: &AppConfig,
    readings: Option<&[StationReading]>,
    today: NaiveDate,
) -> PageItems {
    let wide = readings.and_then(|r| match transform(r, &config.source_site) {
        Ok(table) => Some(table),
        Err(e) => {
            logging::log_stage_failure(LogSource::Pipeline, "pivot/estimation", &e);
            None
        }
    });

    let text_info = wide.as_ref().and_then(|table| match summary::compute_summary(table) {
        Ok(bundle) => Some(bundle),
        Err(e) => {
            logging::log_stage_failure(LogSource::Pipeline, "summary", &e);
            None
        }
    });

    let level_chart =
        wide.as_ref().and_then(|table| match level::build_level_chart(table, config) {
            Ok(chart) => Some(chart),
            Err(e) => {
                logging::log_stage_failure(LogSource::Chart, "level chart", &e);
                None
            }
        });

    let flow_chart =
        readings.and_then(|r| match flows::build_flows_chart(r, config, today) {
            Ok(chart) => Some(chart),
            Err(e) => {
                logging::log_stage_failure(LogSource::Chart, "flow chart", &e);
                None
            }
        });

    PageItems { text_info, level_chart, flow_chart }
}

fn transform(readings: &[StationReading], source_site: &str) -> Result<WideTable, StageError> {
    let mut table = pivot::pivot(readings)?;
    estimate::estimate_levels(&mut table, source_site)?;
    Ok(table)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
