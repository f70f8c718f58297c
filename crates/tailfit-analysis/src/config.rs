use serde::{Deserialize, Serialize};

use crate::analyzer::INDISTINGUISHABLE_SCORE_GAP;

/// Tunables of the [`AnalysisEngine`](crate::engine::AnalysisEngine).
///
/// Missing fields fall back to their defaults when deserialized, so a config
/// file only needs to name what it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Confidence gap at or below which two results are ranked by AIC instead.
    pub tie_tolerance: f64,
    /// Number of runner-up fits named in a summary recommendation.
    pub max_alternatives: usize,
    /// Run analyzers on the rayon thread pool.
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tie_tolerance: INDISTINGUISHABLE_SCORE_GAP,
            max_alternatives: 2,
            parallel: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{ "parallel": true }"#).unwrap();
        assert!(config.parallel);
        assert_eq!(config.max_alternatives, 2);
        assert!((config.tie_tolerance - 0.05).abs() < 1e-12);

        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
