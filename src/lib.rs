/// New River gauge page service.
///
/// Fetches recent discharge telemetry from the USGS NWIS instantaneous-values
/// API for four New River area gauges, estimates the water level at the
/// ungauged Fayette Station site from the Thurmond gauge's flow, and builds
/// the charts and summary text for a single informational web page.

pub mod analysis;
pub mod chart;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod page;
pub mod server;
pub mod stations;
