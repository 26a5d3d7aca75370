use serde::{Deserialize, Serialize};

/// Version tag stamped onto every `DomainResult`. Must change whenever
/// banding tables, weights, or window lengths change, since that breaks
/// numeric comparability with previously stored results.
pub const MODEL_VERSION: &str = "longitudinal-risk@2026-06-01";

/// Explicit scorer configuration, passed in by the caller rather than read
/// from the environment, so the core stays referentially transparent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    pub model_version: String,
    /// A critical metric whose most recent sample is older than this forces
    /// the domain to the Unknown band.
    pub stale_after_days: i64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            model_version: MODEL_VERSION.to_string(),
            stale_after_days: 365,
        }
    }
}
