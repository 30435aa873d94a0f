//! Hypothesis Contracts
//!
//! This module defines the records that flow through the research workflow:
//!
//! 1. [`HypothesisRecord`]: a candidate hypothesis as produced by generation
//! 2. [`ReviewedHypothesis`]: the same record after peer review
//! 3. [`RankedHypothesis`]: a reviewed record with its final rank
//!
//! Each stage wraps the previous one by value, so a record can never carry a
//! review without its assessment summary (or the reverse).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A candidate scientific hypothesis plus its supporting text.
///
/// Every field defaults to the empty string when absent from the input.
/// Missing supporting text is not an error anywhere in the workflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HypothesisRecord {
    /// The hypothesis claim
    #[serde(default, alias = "hypothesis")]
    pub statement: String,

    /// Scientific rationale supporting the claim
    #[serde(default)]
    pub rationale: String,

    /// Known evidence or references
    #[serde(default)]
    pub evidence: String,

    /// Assumptions or conditions that must hold
    #[serde(default)]
    pub assumptions: String,

    /// Potential validation approach
    #[serde(default)]
    pub validation: String,
}

impl HypothesisRecord {
    /// Create a record holding only a statement.
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            ..Default::default()
        }
    }

    /// Whether every field is blank.
    pub fn is_blank(&self) -> bool {
        [
            &self.statement,
            &self.rationale,
            &self.evidence,
            &self.assumptions,
            &self.validation,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }
}

/// Structured heuristic judgment of a review text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSummary {
    /// False when the review mentions "invalid" or "implausible"
    pub valid: bool,

    /// Reserved for structured extraction; always empty
    pub strengths: Vec<String>,

    /// Reserved for structured extraction; always empty
    pub weaknesses: Vec<String>,

    /// Review mentions "ethical concerns" or "ethical issues"
    pub ethical_concerns: bool,

    /// Review mentions "impractical" or "limitation"
    pub practical_limitations: bool,

    /// Lexical polarity ratio in [0.0, 1.0]
    pub overall_score: f64,
}

/// A hypothesis together with its peer review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewedHypothesis {
    /// The original record, unchanged
    #[serde(flatten)]
    pub hypothesis: HypothesisRecord,

    /// Raw reviewer output
    pub review: String,

    /// Heuristic summary derived from `review`
    pub assessment_summary: AssessmentSummary,
}

/// How a hypothesis earned its rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum RankingEvidence {
    /// Round-robin pairwise comparisons
    Tournament {
        /// Comparisons won
        wins: usize,
        /// Comparisons this hypothesis took part in
        total_comparisons: usize,
    },

    /// Independent per-criterion scoring
    Scoring {
        /// Raw evaluator output
        evaluation: String,
        /// Criterion name to score (1-10)
        scores: BTreeMap<String, u8>,
        /// Mean of the parsed scores, 0 when none were found
        overall_score: f64,
    },
}

/// A reviewed hypothesis with its final position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedHypothesis {
    /// The reviewed hypothesis
    #[serde(flatten)]
    pub hypothesis: ReviewedHypothesis,

    /// 1-based rank, 1 is best
    pub rank: usize,

    /// Ranking method and its supporting data
    #[serde(flatten)]
    pub evidence: RankingEvidence,
}

/// Input for the reflection (peer review) agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionInput {
    /// The research goal the hypotheses address
    pub research_goal: String,

    /// Hypotheses to review, in order
    pub hypotheses: Vec<HypothesisRecord>,
}

/// Input for the generation agent.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerationInput {
    /// The research goal to generate hypotheses for
    #[validate(length(min = 1, max = 2000))]
    pub research_goal: String,

    /// Requested number of hypotheses
    #[validate(range(min = 1, max = 20))]
    pub count: usize,
}

/// Input for the ranking agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingInput {
    /// The research goal the hypotheses address
    pub research_goal: String,

    /// Reviewed hypotheses to rank
    pub hypotheses: Vec<ReviewedHypothesis>,
}
