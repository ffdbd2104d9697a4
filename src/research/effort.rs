//! Effort levels and the fixed profiles they select.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Named effort level chosen by the caller at session start
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    schemars::JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum EffortLevel {
    #[default]
    Low,
    Medium,
    High,
}

/// Which reflection/answer model a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    Flash,
    Pro,
}

/// Read-only knobs for one research run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffortProfile {
    /// Number of initial search queries to generate
    pub query_count: usize,
    /// Hard ceiling on research rounds
    pub max_loops: u32,
    pub model_tier: ModelTier,
}

impl EffortLevel {
    pub fn profile(self) -> EffortProfile {
        match self {
            EffortLevel::Low => EffortProfile {
                query_count: 1,
                max_loops: 1,
                model_tier: ModelTier::Flash,
            },
            EffortLevel::Medium => EffortProfile {
                query_count: 3,
                max_loops: 2,
                model_tier: ModelTier::Flash,
            },
            EffortLevel::High => EffortProfile {
                query_count: 5,
                max_loops: 3,
                model_tier: ModelTier::Pro,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EffortLevel::Low => "low",
            EffortLevel::Medium => "medium",
            EffortLevel::High => "high",
        }
    }
}

impl fmt::Display for EffortLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffortLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(EffortLevel::Low),
            "medium" => Ok(EffortLevel::Medium),
            "high" => Ok(EffortLevel::High),
            other => Err(format!(
                "Unknown effort level '{}'. Expected one of: low, medium, high",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(EffortLevel::Low, 1, 1, ModelTier::Flash)]
    #[case(EffortLevel::Medium, 3, 2, ModelTier::Flash)]
    #[case(EffortLevel::High, 5, 3, ModelTier::Pro)]
    fn test_profiles(
        #[case] level: EffortLevel,
        #[case] query_count: usize,
        #[case] max_loops: u32,
        #[case] tier: ModelTier,
    ) {
        let profile = level.profile();
        assert_eq!(profile.query_count, query_count);
        assert_eq!(profile.max_loops, max_loops);
        assert_eq!(profile.model_tier, tier);
    }

    #[rstest]
    #[case("low", EffortLevel::Low)]
    #[case("Medium", EffortLevel::Medium)]
    #[case(" HIGH ", EffortLevel::High)]
    fn test_parse(#[case] input: &str, #[case] expected: EffortLevel) {
        assert_eq!(input.parse::<EffortLevel>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "extreme".parse::<EffortLevel>().unwrap_err();
        assert!(err.contains("extreme"));
    }

    #[test]
    fn test_default_is_low() {
        assert_eq!(EffortLevel::default(), EffortLevel::Low);
        let parsed: EffortLevel = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(parsed, EffortLevel::Medium);
    }
}
