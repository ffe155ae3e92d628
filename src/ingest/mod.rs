/// Data acquisition from external services.
///
/// Submodules:
/// - `usgs`: NWIS instantaneous-values client for gauge discharge.

pub mod usgs;
