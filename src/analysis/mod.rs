/// Data transformation for the gauge page.
///
/// Submodules:
/// - `pivot`: reshapes long-form readings into the timestamp-keyed wide table.
/// - `estimate`: the fixed Thurmond-to-Fayette level regression.
/// - `summary`: latest reading, hourly change, and previous-day extremes.

pub mod estimate;
pub mod pivot;
pub mod summary;
