//! Refinement and Report Contracts
//!
//! Records produced after ranking: evolved variants of the best hypotheses,
//! their proximity to the research goal, and the final meta-review report.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::hypothesis::{HypothesisRecord, RankedHypothesis};

/// How an evolved hypothesis was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvolutionKind {
    /// One hypothesis improved using its review
    IndividualRefinement,
    /// A hybrid of the two best hypotheses
    HypothesisCombination,
}

impl fmt::Display for EvolutionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndividualRefinement => write!(f, "individual_refinement"),
            Self::HypothesisCombination => write!(f, "hypothesis_combination"),
        }
    }
}

/// An improved or combined hypothesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolvedHypothesis {
    #[serde(flatten)]
    pub hypothesis: HypothesisRecord,

    pub evolution_type: EvolutionKind,

    /// Ranks of the hypotheses this one was derived from
    pub parent_ranks: Vec<usize>,

    /// Raw model output the record was parsed from
    pub evolution_text: String,
}

/// How closely a hypothesis stays on the research goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityAssessment {
    /// Raw evaluator output
    pub evaluation: String,

    /// Overall proximity score on the 1-10 scale
    pub proximity_score: f64,

    pub is_relevant: bool,
}

impl ProximityAssessment {
    /// Score rescaled to `[0.1, 1.0]`.
    pub fn ratio(&self) -> f64 {
        self.proximity_score / 10.0
    }
}

/// A hypothesis together with its proximity assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenedHypothesis {
    #[serde(flatten)]
    pub hypothesis: HypothesisRecord,

    pub proximity: ProximityAssessment,
}

/// A top-ranked hypothesis after the refinement loop.
///
/// When no evolved variant was accepted, `hypothesis` is the ranked record
/// unchanged and `iteration` is 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedHypothesis {
    #[serde(flatten)]
    pub hypothesis: HypothesisRecord,

    /// Rank the hypothesis entered refinement with
    pub original_rank: usize,

    /// Last refinement iteration whose variant was accepted
    pub iteration: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolution_type: Option<EvolutionKind>,

    /// Review the accepted variant was evolved from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proximity: Option<ProximityAssessment>,
}

impl RefinedHypothesis {
    pub fn from_ranked(ranked: &RankedHypothesis) -> Self {
        Self {
            hypothesis: ranked.hypothesis.hypothesis.clone(),
            original_rank: ranked.rank,
            iteration: 0,
            evolution_type: None,
            feedback: None,
            proximity: None,
        }
    }

    /// Replace the record with an accepted variant.
    pub fn accept(
        &mut self,
        evolved: EvolvedHypothesis,
        feedback: String,
        proximity: ProximityAssessment,
        iteration: usize,
    ) {
        self.hypothesis = evolved.hypothesis;
        self.evolution_type = Some(evolved.evolution_type);
        self.feedback = Some(feedback);
        self.proximity = Some(proximity);
        self.iteration = iteration;
    }
}

/// Layout requested from the meta-review agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    ScientificReport,
    GrantProposal,
    ResearchBrief,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScientificReport => write!(f, "scientific_report"),
            Self::GrantProposal => write!(f, "grant_proposal"),
            Self::ResearchBrief => write!(f, "research_brief"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "scientific_report" => Ok(Self::ScientificReport),
            "grant_proposal" => Ok(Self::GrantProposal),
            "research_brief" => Ok(Self::ResearchBrief),
            other => Err(format!(
                "unknown report format '{other}' (expected scientific_report, grant_proposal or research_brief)"
            )),
        }
    }
}

/// Final synthesis of the best hypotheses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaReviewReport {
    pub title: String,
    pub research_goal: String,
    /// Full report text
    pub report: String,
    pub format: ReportFormat,
    pub hypothesis_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// Input for the evolution agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionInput {
    pub research_goal: String,
    pub ranked: Vec<RankedHypothesis>,
}

/// Input for the proximity agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityInput {
    pub research_goal: String,
    pub hypotheses: Vec<HypothesisRecord>,
}

/// Input for the meta-review agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaReviewInput {
    pub research_goal: String,
    pub hypotheses: Vec<RefinedHypothesis>,
    #[serde(default)]
    pub format: ReportFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format_parsing() {
        assert_eq!("grant-proposal".parse::<ReportFormat>(), Ok(ReportFormat::GrantProposal));
        assert_eq!(" Research_Brief ".parse::<ReportFormat>(), Ok(ReportFormat::ResearchBrief));
        assert!("poster".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::default().to_string(), "scientific_report");
    }

    #[test]
    fn test_unrefined_hypothesis_omits_refinement_fields() {
        let refined = RefinedHypothesis {
            hypothesis: HypothesisRecord::new("Shade reduces bleaching"),
            original_rank: 2,
            iteration: 0,
            evolution_type: None,
            feedback: None,
            proximity: None,
        };

        let value = serde_json::to_value(&refined).unwrap();
        assert_eq!(value["statement"], "Shade reduces bleaching");
        assert_eq!(value["original_rank"], 2);
        assert!(value.get("proximity").is_none());
        assert!(value.get("evolution_type").is_none());
    }

    #[test]
    fn test_proximity_ratio() {
        let proximity = ProximityAssessment {
            evaluation: String::new(),
            proximity_score: 7.0,
            is_relevant: true,
        };
        assert!((proximity.ratio() - 0.7).abs() < f64::EPSILON);
    }
}
