//! Operations settings for placement and bulk reset.
//!
//! Every field has a default, so an empty or missing config file yields
//! [`OperationsConfig::default`].

use serde::{Deserialize, Serialize};

/// Which industries a reset empties before reassigning cars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetScope {
    /// Empty every track on the layout, spotted cars included.
    #[default]
    AllIndustries,
    /// Empty only yard tracks. Cars at other industries keep their spots
    /// and are not sent home.
    YardsOnly,
}

/// Settings for [`crate::reset::reset_to_home_yards`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResetConfig {
    pub scope: ResetScope,
    /// Skip tracks whose running count has reached `max_cars`.
    pub respect_capacity: bool,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            scope: ResetScope::AllIndustries,
            respect_capacity: true,
        }
    }
}

/// Settings for single-car placement through [`crate::layout_state::LayoutState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Reject placing a car that already occupies another track.
    pub strict_duplicate_check: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            strict_duplicate_check: true,
        }
    }
}

/// Top-level operations config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationsConfig {
    pub reset: ResetConfig,
    pub placement: PlacementConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = OperationsConfig::default();
        assert_eq!(config.reset.scope, ResetScope::AllIndustries);
        assert!(config.reset.respect_capacity);
        assert!(config.placement.strict_duplicate_check);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: OperationsConfig =
            serde_json::from_str(r#"{"reset": {"scope": "yards_only"}}"#).unwrap();
        assert_eq!(config.reset.scope, ResetScope::YardsOnly);
        assert!(config.reset.respect_capacity);
        assert!(config.placement.strict_duplicate_check);
    }
}
