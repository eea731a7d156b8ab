pub mod analyze;
pub mod derived;

use benford_core::{with_metadata, AnalysisConfig};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

/// Wrap a result in the standard computation envelope.
pub(crate) fn envelope<T: Serialize>(
    methodology: &str,
    config: &AnalysisConfig,
    warnings: Vec<String>,
    start: Instant,
    result: T,
) -> Result<Value, Box<dyn std::error::Error>> {
    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(methodology, config, warnings, elapsed, result);
    Ok(serde_json::to_value(output)?)
}
