use std::path::Path;

use anyhow::Context;
use dropbrain_evaluator::{
    board_rater::{RaterWeights, StackRater},
    move_search::MoveSearch,
    search_policy::SearchPolicy,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::util;

/// Tunable parts of the brain: rater weights and search policy.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BrainConfig {
    pub weights: RaterWeights,
    pub policy: SearchPolicy,
}

impl BrainConfig {
    /// Reads the configuration file, or returns the defaults when no path is
    /// given.
    pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            debug!("no brain config given, using defaults");
            return Ok(Self::default());
        };
        let config: Self = util::read_json_file("brain config", path)?;
        debug!(path = %path.display(), ?config, "loaded brain config");
        Ok(config)
    }

    pub(crate) fn to_move_search(&self) -> anyhow::Result<MoveSearch<'static>> {
        let rater = StackRater::new(self.weights).context("Invalid weights in brain config")?;
        Ok(MoveSearch::new(Box::new(rater), self.policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config: BrainConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BrainConfig::default());
        assert!(config.to_move_search().is_ok());
    }

    #[test]
    fn test_partial_config() {
        let config: BrainConfig = serde_json::from_str(
            r#"{
                "weights": { "hole_square": 5.0 },
                "policy": { "single_column_stop": false, "wide_rotation": null }
            }"#,
        )
        .unwrap();
        assert!((config.weights.hole_square - 5.0).abs() < f64::EPSILON);
        assert!((config.weights.line_clear - 200.0).abs() < f64::EPSILON);
        assert_eq!(config.policy, SearchPolicy::exhaustive());
    }

    #[test]
    fn test_invalid_weights_are_rejected() {
        let config: BrainConfig =
            serde_json::from_str(r#"{ "weights": { "line_clear": 0.0 } }"#).unwrap();
        let err = config.to_move_search().unwrap_err();
        assert!(err.to_string().contains("brain config"));
    }

    #[test]
    fn test_load_without_path() {
        assert_eq!(BrainConfig::load(None).unwrap(), BrainConfig::default());
    }
}
