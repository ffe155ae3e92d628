/// Service configuration.
///
/// One `AppConfig` is constructed per process and passed down to the
/// pipeline entry point; there is no process-global application state.
/// Defaults come from `stations::STATION_REGISTRY`; a TOML file can
/// override the domain constants (station list, display names, hazard
/// bands) per deployment without touching transformation logic, and a
/// few server settings come from the environment (`.env` supported).

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::stations;

// ---------------------------------------------------------------------------
// Configuration types
// ---------------------------------------------------------------------------

/// A qualitative difficulty/hazard range rendered as a colored background
/// band on the estimated-level hydrograph.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HazardBand {
    pub floor_ft: f64,
    pub ceiling_ft: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the NWIS instantaneous-values endpoint.
    pub nwis_base_url: String,
    /// Site codes to query, in the order their traces appear on the chart.
    pub site_codes: Vec<String>,
    /// Gauge whose discharge feeds the level regression.
    pub source_site: String,
    /// site_code -> legend label. Codes absent here display as-is.
    pub display_names: HashMap<String, String>,
    /// Background bands for the level chart, bottom to top.
    pub hazard_bands: Vec<HazardBand>,
    /// Bind address for the web shell.
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            nwis_base_url: "https://waterservices.usgs.gov/nwis/iv/".to_string(),
            site_codes: stations::all_site_codes().iter().map(|s| s.to_string()).collect(),
            source_site: stations::SOURCE_SITE.to_string(),
            display_names: stations::STATION_REGISTRY
                .iter()
                .map(|s| (s.site_code.to_string(), s.display_name.to_string()))
                .collect(),
            hazard_bands: vec![
                HazardBand { floor_ft: -2.0, ceiling_ft: 2.0, color: "green".to_string() },
                HazardBand { floor_ft: 2.0, ceiling_ft: 6.0, color: "blue".to_string() },
                HazardBand { floor_ft: 6.0, ceiling_ft: 10.0, color: "black".to_string() },
                HazardBand { floor_ft: 10.0, ceiling_ft: 20.0, color: "red".to_string() },
            ],
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl AppConfig {
    /// Legend label for a site code; codes without an entry pass through.
    pub fn display_name<'a>(&'a self, site_code: &'a str) -> &'a str {
        self.display_names
            .get(site_code)
            .map(String::as_str)
            .unwrap_or(site_code)
    }

    /// Build the process configuration: defaults, then the optional
    /// `gauges.toml` override (path from `GAUGE_CONFIG` or the working
    /// directory), then environment overrides for the server settings.
    pub fn load() -> Result<AppConfig, String> {
        let mut config = AppConfig::default();

        let file_path =
            std::env::var("GAUGE_CONFIG").unwrap_or_else(|_| "./gauges.toml".to_string());
        if Path::new(&file_path).exists() {
            config.apply_file(&file_path)?;
        }

        if let Ok(host) = std::env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            config.port = port
                .parse()
                .map_err(|_| format!("PORT must be a number, got '{}'", port))?;
        }
        if let Ok(url) = std::env::var("NWIS_BASE_URL") {
            config.nwis_base_url = url;
        }

        Ok(config)
    }

    /// Merge a TOML override file into this configuration.
    pub fn apply_file(&mut self, path: &str) -> Result<(), String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path, e))?;
        let file: ConfigFile = toml::from_str(&raw)
            .map_err(|e| format!("Failed to parse config file {}: {}", path, e))?;

        if let Some(url) = file.nwis_base_url {
            self.nwis_base_url = url;
        }
        if let Some(source_site) = file.source_site {
            self.source_site = source_site;
        }
        if let Some(entries) = file.stations {
            self.site_codes = entries.iter().map(|s| s.site_code.clone()).collect();
            self.display_names = entries
                .into_iter()
                .filter_map(|s| s.display_name.map(|name| (s.site_code, name)))
                .collect();
        }
        if let Some(bands) = file.hazard_bands {
            self.hazard_bands = bands;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TOML file schema
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ConfigFile {
    nwis_base_url: Option<String>,
    source_site: Option<String>,
    stations: Option<Vec<StationEntry>>,
    hazard_bands: Option<Vec<HazardBand>>,
}

#[derive(Debug, Deserialize)]
struct StationEntry {
    site_code: String,
    display_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_mirror_the_registry() {
        let config = AppConfig::default();
        assert_eq!(config.site_codes.len(), stations::STATION_REGISTRY.len());
        assert_eq!(config.source_site, stations::SOURCE_SITE);
        assert!(config.site_codes.contains(&config.source_site));
    }

    #[test]
    fn test_default_hazard_bands_cover_expected_ranges() {
        let config = AppConfig::default();
        let ranges: Vec<(f64, f64)> = config
            .hazard_bands
            .iter()
            .map(|b| (b.floor_ft, b.ceiling_ft))
            .collect();
        assert_eq!(ranges, vec![(-2.0, 2.0), (2.0, 6.0), (6.0, 10.0), (10.0, 20.0)]);
    }

    #[test]
    fn test_display_name_falls_back_to_site_code() {
        let config = AppConfig::default();
        assert_eq!(config.display_name("03176500"), "New @ Glen Lyn, VA");
        assert_eq!(config.display_name("12345678"), "12345678");
    }

    #[test]
    fn test_toml_override_replaces_stations_and_bands() {
        let mut config = AppConfig::default();
        let raw = r#"
            source_site = "11111111"

            [[stations]]
            site_code = "11111111"
            display_name = "Test Gauge"

            [[stations]]
            site_code = "22222222"

            [[hazard_bands]]
            floor_ft = 0.0
            ceiling_ft = 5.0
            color = "purple"
        "#;
        let path = std::env::temp_dir().join("newriver_service_gauges_override.toml");
        std::fs::write(&path, raw).expect("temp config file should be writable");
        config
            .apply_file(path.to_str().expect("temp path should be valid UTF-8"))
            .expect("override file should apply cleanly");
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.source_site, "11111111");
        assert_eq!(config.site_codes, vec!["11111111", "22222222"]);
        assert_eq!(config.display_name("11111111"), "Test Gauge");
        // No display_name entry: site code passes through.
        assert_eq!(config.display_name("22222222"), "22222222");
        assert_eq!(config.hazard_bands.len(), 1);
        assert_eq!(config.hazard_bands[0].color, "purple");
    }
}
