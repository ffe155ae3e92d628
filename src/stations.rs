/// Station registry for the New River gauge page service.
///
/// Defines the canonical list of USGS gauge stations this page displays,
/// along with their legend display names and the estimation-source marker.
/// This is the single source of truth for site codes; all other modules
/// should reference stations from here rather than hardcoding site codes.

pub use crate::model::{NWIS_NO_DATA, PARAM_DISCHARGE};

// ---------------------------------------------------------------------------
// Station metadata
// ---------------------------------------------------------------------------

/// Metadata for a single USGS gauge station.
pub struct Station {
    /// 8-digit USGS site code.
    pub site_code: &'static str,
    /// Official USGS site name.
    pub name: &'static str,
    /// Legend label on the multi-gauge chart. Some labels carry trailing
    /// padding so the horizontal legend entries line up visually.
    pub display_name: &'static str,
    /// Human-readable description of the station's role on the page.
    pub description: &'static str,
}

/// Site code of the gauge whose discharge feeds the Fayette Station level
/// regression. Must appear in `STATION_REGISTRY`.
pub const SOURCE_SITE: &str = "03185400";

/// All USGS gauges shown on the page, ordered as their traces appear on
/// the multi-gauge hydrograph.
///
/// Sources:
///   - Site codes: USGS NWIS (waterservices.usgs.gov)
pub static STATION_REGISTRY: &[Station] = &[
    Station {
        site_code: "03185400",
        name: "New River at Thurmond, WV",
        display_name: "New @ Thurmond     ",
        description: "Regression source for the Fayette Station level estimate; \
                      closest upstream gauge to the Lower New River Gorge.",
    },
    Station {
        site_code: "03184000",
        name: "Greenbrier River at Hilldale, WV",
        display_name: "Greenbrier @ Hilldale  ",
        description: "Largest undammed tributary; a rising Greenbrier leads \
                      the New at Thurmond by several hours.",
    },
    Station {
        site_code: "03179000",
        name: "Bluestone River near Pipestem, WV",
        display_name: "Bluestone @ Pipestem      ",
        description: "Tributary above Bluestone Lake; useful context for \
                      inflow to the dam-controlled upper New.",
    },
    Station {
        site_code: "03176500",
        name: "New River at Glen Lyn, VA",
        display_name: "New @ Glen Lyn, VA",
        description: "Upstream main-stem reference above Bluestone Lake.",
    },
];

/// Returns the site codes for all monitored stations, in registry order,
/// suitable for passing directly to `ingest::usgs::build_iv_url`.
pub fn all_site_codes() -> Vec<&'static str> {
    STATION_REGISTRY.iter().map(|s| s.site_code).collect()
}

/// Looks up a station by site code. Returns `None` if not found.
pub fn find_station(site_code: &str) -> Option<&'static Station> {
    STATION_REGISTRY.iter().find(|s| s.site_code == site_code)
}

/// Legend label for a site code. Site codes absent from the registry are
/// displayed as-is.
pub fn display_name(site_code: &str) -> &str {
    match find_station(site_code) {
        Some(station) => station.display_name,
        None => site_code,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_site_codes_are_valid_usgs_format() {
        // USGS site codes in this basin are 8-digit numeric strings.
        // If any entry in the registry violates this, the IV API will
        // silently drop that site from its response.
        for station in STATION_REGISTRY {
            assert_eq!(
                station.site_code.len(),
                8,
                "site code for '{}' should be 8 digits, got '{}'",
                station.name,
                station.site_code
            );
            assert!(
                station.site_code.chars().all(|c| c.is_ascii_digit()),
                "site code for '{}' should be numeric, got '{}'",
                station.name,
                station.site_code
            );
        }
    }

    #[test]
    fn test_no_duplicate_site_codes() {
        let mut seen = std::collections::HashSet::new();
        for station in STATION_REGISTRY {
            assert!(
                seen.insert(station.site_code),
                "duplicate site code '{}' found in STATION_REGISTRY",
                station.site_code
            );
        }
    }

    #[test]
    fn test_registry_contains_all_expected_new_river_sites() {
        let expected = [
            "03185400", // New River at Thurmond (regression source)
            "03184000", // Greenbrier at Hilldale
            "03179000", // Bluestone near Pipestem
            "03176500", // New River at Glen Lyn
        ];
        let codes: Vec<_> = STATION_REGISTRY.iter().map(|s| s.site_code).collect();
        for expected_code in &expected {
            assert!(
                codes.contains(expected_code),
                "STATION_REGISTRY missing expected site '{}'",
                expected_code
            );
        }
    }

    #[test]
    fn test_source_site_is_registered() {
        assert!(
            find_station(SOURCE_SITE).is_some(),
            "estimation source '{}' must be in STATION_REGISTRY",
            SOURCE_SITE
        );
    }

    #[test]
    fn test_find_station_returns_correct_entry() {
        let station = find_station("03185400").expect("Thurmond should be in registry");
        assert_eq!(station.site_code, "03185400");
        assert!(station.name.contains("Thurmond"));
    }

    #[test]
    fn test_find_station_returns_none_for_unknown_code() {
        assert!(find_station("00000000").is_none());
    }

    #[test]
    fn test_display_name_passes_unknown_codes_through() {
        assert_eq!(display_name("03185400"), "New @ Thurmond     ");
        assert_eq!(display_name("99999999"), "99999999");
    }

    #[test]
    fn test_all_site_codes_helper_matches_registry_length() {
        assert_eq!(all_site_codes().len(), STATION_REGISTRY.len());
    }

    #[test]
    fn test_parameter_code_is_valid() {
        assert_eq!(PARAM_DISCHARGE.len(), 5);
        assert!(PARAM_DISCHARGE.chars().all(|c| c.is_ascii_digit()));
    }
}
