/// USGS NWIS Instantaneous Values API client.
///
/// Issues one batched query for discharge (00060) across all monitored
/// gauges over a rolling 7-day window and normalizes the waterml-JSON
/// response into long-form `StationReading` rows. The NWIS `-999999`
/// sentinel becomes a missing value, never a valid discharge.
///
/// API Documentation: https://waterservices.usgs.gov/docs/instantaneous-values/
///
/// One outbound call per page load, no retries, and no timeout override
/// beyond the client's defaults, a known correctness gap accepted for a
/// low-traffic informational page.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::model::{NWIS_NO_DATA, PARAM_DISCHARGE, StageError, StationReading};

// ============================================================================
// NWIS API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct IvResponse {
    value: IvResponseValue,
}

#[derive(Debug, Deserialize)]
struct IvResponseValue {
    #[serde(rename = "timeSeries", default)]
    time_series: Vec<IvTimeSeries>,
}

/// One (site, parameter) series in the response.
#[derive(Debug, Deserialize)]
struct IvTimeSeries {
    #[serde(rename = "sourceInfo")]
    source_info: IvSourceInfo,
    variable: IvVariable,
    #[serde(default)]
    values: Vec<IvValueSet>,
}

#[derive(Debug, Deserialize)]
struct IvSourceInfo {
    #[serde(rename = "siteCode")]
    site_code: Vec<IvCode>,
}

#[derive(Debug, Deserialize)]
struct IvVariable {
    #[serde(rename = "variableCode")]
    variable_code: Vec<IvCode>,
    #[serde(rename = "noDataValue")]
    no_data_value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct IvCode {
    value: String,
}

#[derive(Debug, Deserialize)]
struct IvValueSet {
    #[serde(default)]
    value: Vec<IvPoint>,
}

#[derive(Debug, Deserialize)]
struct IvPoint {
    value: String,
    #[serde(rename = "dateTime")]
    date_time: String,
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Build the IV query URL for a set of sites and one parameter over a
/// calendar-date window (inclusive, ISO 8601 dates rather than timestamps).
pub fn build_iv_url(
    base_url: &str,
    site_codes: &[&str],
    parameter: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> String {
    format!(
        "{}?format=json&sites={}&parameterCd={}&startDT={}&endDT={}",
        base_url,
        site_codes.join(","),
        parameter,
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d"),
    )
}

/// Fetch the trailing 7-day discharge window for all configured gauges.
///
/// Any failure (network, HTTP status, malformed body, empty result)
/// surfaces as a `StageError`; the caller decides what degrades.
pub fn fetch_discharge(
    client: &reqwest::blocking::Client,
    config: &AppConfig,
) -> Result<Vec<StationReading>, StageError> {
    fetch_discharge_window(client, config, Local::now().date_naive())
}

/// Same as `fetch_discharge` but with the window's end date injected,
/// so tests and replays can pin "today".
pub fn fetch_discharge_window(
    client: &reqwest::blocking::Client,
    config: &AppConfig,
    today: NaiveDate,
) -> Result<Vec<StationReading>, StageError> {
    let start = today - Duration::days(7);
    let sites: Vec<&str> = config.site_codes.iter().map(String::as_str).collect();
    let url = build_iv_url(&config.nwis_base_url, &sites, PARAM_DISCHARGE, start, today);

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| StageError::Request(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(StageError::HttpStatus(status.as_u16()));
    }

    let body = response.text().map_err(|e| StageError::Request(e.to_string()))?;
    parse_iv_response(&body)
}

/// Parse a waterml-JSON IV response into long-form readings.
///
/// Only discharge (00060) series are kept. Points carrying the series'
/// no-data sentinel come through with `discharge_cfs: None` so the pivot
/// still records the timestamp. An entirely empty response is an error,
/// matching the upstream behavior of failing the whole acquisition.
pub fn parse_iv_response(body: &str) -> Result<Vec<StationReading>, StageError> {
    let response: IvResponse =
        serde_json::from_str(body).map_err(|e| StageError::Parse(e.to_string()))?;

    let mut readings = Vec::new();
    for series in &response.value.time_series {
        let is_discharge = series
            .variable
            .variable_code
            .iter()
            .any(|c| c.value == PARAM_DISCHARGE);
        if !is_discharge {
            continue;
        }

        let site_code = series
            .source_info
            .site_code
            .first()
            .map(|c| c.value.clone())
            .ok_or_else(|| StageError::Parse("timeSeries entry without a site code".to_string()))?;
        let sentinel = series.variable.no_data_value.unwrap_or(NWIS_NO_DATA);

        for value_set in &series.values {
            for point in &value_set.value {
                let datetime = parse_nwis_datetime(&point.date_time)?;
                let raw: f64 = point.value.parse().map_err(|_| {
                    StageError::Parse(format!(
                        "non-numeric value '{}' for site {} at {}",
                        point.value, site_code, point.date_time
                    ))
                })?;
                let discharge_cfs = if raw == sentinel { None } else { Some(raw) };
                readings.push(StationReading {
                    site_code: site_code.clone(),
                    datetime,
                    discharge_cfs,
                });
            }
        }
    }

    if readings.is_empty() {
        return Err(StageError::EmptyTable);
    }
    Ok(readings)
}

/// NWIS reports gauge-local timestamps with an explicit offset,
/// e.g. "2024-05-01T12:00:00.000-04:00".
fn parse_nwis_datetime(raw: &str) -> Result<DateTime<FixedOffset>, StageError> {
    DateTime::parse_from_rfc3339(raw)
        .map_err(|e| StageError::Parse(format!("bad timestamp '{}': {}", raw, e)))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal waterml-JSON body with one discharge series.
    fn iv_body(site: &str, points: &[(&str, &str)]) -> String {
        let values: Vec<String> = points
            .iter()
            .map(|(dt, v)| format!(r#"{{"value": "{}", "dateTime": "{}"}}"#, v, dt))
            .collect();
        format!(
            r#"{{
                "value": {{
                    "timeSeries": [
                        {{
                            "sourceInfo": {{"siteCode": [{{"value": "{}"}}]}},
                            "variable": {{
                                "variableCode": [{{"value": "00060"}}],
                                "noDataValue": -999999.0
                            }},
                            "values": [{{"value": [{}]}}]
                        }}
                    ]
                }}
            }}"#,
            site,
            values.join(",")
        )
    }

    #[test]
    fn test_build_iv_url_uses_calendar_dates() {
        let url = build_iv_url(
            "https://waterservices.usgs.gov/nwis/iv/",
            &["03185400", "03176500"],
            "00060",
            NaiveDate::from_ymd_opt(2024, 4, 24).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        );
        assert!(url.contains("sites=03185400,03176500"));
        assert!(url.contains("parameterCd=00060"));
        assert!(url.contains("startDT=2024-04-24"));
        assert!(url.contains("endDT=2024-05-01"));
        assert!(url.contains("format=json"));
    }

    #[test]
    fn test_parse_iv_response_normalizes_readings() {
        let body = iv_body(
            "03185400",
            &[
                ("2024-05-01T12:00:00.000-04:00", "8500"),
                ("2024-05-01T12:15:00.000-04:00", "8620.5"),
            ],
        );
        let readings = parse_iv_response(&body).expect("well-formed body should parse");
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].site_code, "03185400");
        assert_eq!(readings[0].discharge_cfs, Some(8500.0));
        assert_eq!(readings[1].discharge_cfs, Some(8620.5));
        assert_eq!(readings[0].datetime.date_naive().to_string(), "2024-05-01");
    }

    #[test]
    fn test_sentinel_value_becomes_missing() {
        let body = iv_body(
            "03185400",
            &[
                ("2024-05-01T12:00:00.000-04:00", "-999999"),
                ("2024-05-01T12:15:00.000-04:00", "8620"),
            ],
        );
        let readings = parse_iv_response(&body).expect("sentinel body should parse");
        assert_eq!(readings[0].discharge_cfs, None);
        assert_eq!(readings[1].discharge_cfs, Some(8620.0));
    }

    #[test]
    fn test_non_discharge_series_are_skipped() {
        // Stage (00065) series must not leak into the flow table.
        let body = r#"{
            "value": {
                "timeSeries": [
                    {
                        "sourceInfo": {"siteCode": [{"value": "03185400"}]},
                        "variable": {
                            "variableCode": [{"value": "00065"}],
                            "noDataValue": -999999.0
                        },
                        "values": [{"value": [
                            {"value": "4.2", "dateTime": "2024-05-01T12:00:00.000-04:00"}
                        ]}]
                    }
                ]
            }
        }"#;
        assert_eq!(parse_iv_response(body), Err(StageError::EmptyTable));
    }

    #[test]
    fn test_empty_time_series_is_an_acquisition_failure() {
        let body = r#"{"value": {"timeSeries": []}}"#;
        assert_eq!(parse_iv_response(body), Err(StageError::EmptyTable));
    }

    #[test]
    fn test_malformed_body_is_a_parse_error() {
        let result = parse_iv_response("<html>service down</html>");
        assert!(matches!(result, Err(StageError::Parse(_))));
    }

    #[test]
    fn test_non_numeric_value_is_a_parse_error() {
        let body = iv_body("03185400", &[("2024-05-01T12:00:00.000-04:00", "Ice")]);
        assert!(matches!(parse_iv_response(&body), Err(StageError::Parse(_))));
    }

    #[test]
    fn test_bad_timestamp_is_a_parse_error() {
        let body = iv_body("03185400", &[("yesterday-ish", "8500")]);
        assert!(matches!(parse_iv_response(&body), Err(StageError::Parse(_))));
    }
}
