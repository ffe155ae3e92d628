/// Chart assembly for the page.
///
/// Submodules:
/// - `spec`: serializable figure description consumed by the browser's
///   Plotly runtime; opaque to everything downstream of assembly.
/// - `level`: single-series estimated-level hydrograph.
/// - `flows`: multi-series raw-flow hydrograph for all gauges.

pub mod flows;
pub mod level;
pub mod spec;
