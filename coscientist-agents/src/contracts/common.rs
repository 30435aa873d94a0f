//! Common Contract Types
//!
//! Shared types used across all agent contracts.

use serde::{Deserialize, Serialize};

/// Agent identification for registration and versioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentIdentity {
    /// Unique agent identifier
    pub id: String,

    /// Semantic version
    pub version: String,

    /// Agent classification
    pub classification: AgentClassification,

    /// Human-readable description
    pub description: String,
}

/// Role an agent plays in the research workflow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentClassification {
    HypothesisGeneration,
    HypothesisReflection,
    HypothesisRanking,
    HypothesisEvolution,
    ProximityEvaluation,
    MetaReview,
    ResearchSupervision,
}

impl std::fmt::Display for AgentClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HypothesisGeneration => write!(f, "HYPOTHESIS_GENERATION"),
            Self::HypothesisReflection => write!(f, "HYPOTHESIS_REFLECTION"),
            Self::HypothesisRanking => write!(f, "HYPOTHESIS_RANKING"),
            Self::HypothesisEvolution => write!(f, "HYPOTHESIS_EVOLUTION"),
            Self::ProximityEvaluation => write!(f, "PROXIMITY_EVALUATION"),
            Self::MetaReview => write!(f, "META_REVIEW"),
            Self::ResearchSupervision => write!(f, "RESEARCH_SUPERVISION"),
        }
    }
}

/// Outcome of a lexical validator.
///
/// `is_valid` tolerates a single issue: two or more issues mark the input
/// invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Overall pass/fail flag
    pub is_valid: bool,

    /// Human-readable issues, in check order
    pub issues: Vec<String>,
}

impl ValidationReport {
    /// Maximum number of issues tolerated before the input is rejected.
    pub const TOLERATED_ISSUES: usize = 1;

    /// Build a report from the collected issues.
    pub fn from_issues(issues: Vec<String>) -> Self {
        Self {
            is_valid: issues.len() <= Self::TOLERATED_ISSUES,
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_tolerates_one_issue() {
        assert!(ValidationReport::from_issues(vec![]).is_valid);
        assert!(ValidationReport::from_issues(vec!["a".into()]).is_valid);
        assert!(!ValidationReport::from_issues(vec!["a".into(), "b".into()]).is_valid);
    }

    #[test]
    fn test_classification_serialization() {
        let json = serde_json::to_string(&AgentClassification::HypothesisReflection).unwrap();
        assert_eq!(json, "\"HYPOTHESIS_REFLECTION\"");
        assert_eq!(
            AgentClassification::HypothesisRanking.to_string(),
            "HYPOTHESIS_RANKING"
        );
    }
}
