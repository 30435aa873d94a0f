//! Proximity Agent Implementation
//!
//! # Agent Contract
//!
//! ## Purpose
//! Judge how closely each hypothesis stays on the research goal.
//!
//! ## Classification
//! PROXIMITY EVALUATION
//!
//! ## Scoring
//! The overall score is read from the first of these labels found in the
//! reply: `Overall proximity score: N` (or `... score of N`),
//! `Proximity score: N`, `Overall score: N`. Without one the score is
//! [`DEFAULT_PROXIMITY_SCORE`]. A hypothesis is relevant from
//! [`RELEVANCE_MIN_SCORE`] upwards unless the reply says "not relevant" or
//! "irrelevant"; "highly relevant" or "very relevant" overrides both.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument};

use super::prompts::{proximity_prompt, PROXIMITY_SYSTEM_PROMPT};
use super::traits::{Agent, AgentRuntimeError, CompletionAgent};
use crate::clients::{CompletionClient, LlmConfig, LlmError, ModelSettings};
use crate::contracts::{
    AgentClassification, AgentIdentity, HypothesisRecord, ProximityAssessment, ProximityInput,
    ScreenedHypothesis,
};

/// Agent version (semantic versioning).
pub const PROXIMITY_AGENT_VERSION: &str = "1.0.0";

/// Agent identifier.
pub const PROXIMITY_AGENT_ID: &str = "proximity-agent-v1";

/// Low temperature for consistent relevance judgments.
pub const PROXIMITY_TEMPERATURE: f32 = 0.2;

/// Score assumed when the reply states none.
pub const DEFAULT_PROXIMITY_SCORE: f64 = 5.0;

/// Lowest score counted as relevant.
pub const RELEVANCE_MIN_SCORE: f64 = 6.0;

/// Default cut-off for [`filter_relevant`].
pub const DEFAULT_RELEVANCE_THRESHOLD: f64 = 5.0;

static SCORE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"overall\s+proximity\s+score\**\s*(?::|of)",
        r"proximity\s+score\**\s*:",
        r"overall\s+score\**\s*:",
    ]
    .iter()
    .filter_map(|label| {
        Regex::new(&format!(r"(?i){label}\s*\**\s*(10(?:\.0+)?|[1-9](?:\.\d+)?)\b")).ok()
    })
    .collect()
});

/// Overall proximity score (1-10) stated in an evaluation, if any.
pub fn extract_proximity_score(evaluation: &str) -> Option<f64> {
    SCORE_PATTERNS.iter().find_map(|re| {
        let value: f64 = re.captures(evaluation)?.get(1)?.as_str().parse().ok()?;
        Some(value.clamp(1.0, 10.0))
    })
}

/// Score and relevance verdict for an evaluation text.
pub fn assess_proximity(evaluation: &str) -> ProximityAssessment {
    let proximity_score = extract_proximity_score(evaluation).unwrap_or(DEFAULT_PROXIMITY_SCORE);
    let lower = evaluation.to_lowercase();

    let mut is_relevant = proximity_score >= RELEVANCE_MIN_SCORE;
    if lower.contains("not relevant") || lower.contains("irrelevant") {
        is_relevant = false;
    }
    if lower.contains("highly relevant") || lower.contains("very relevant") {
        is_relevant = true;
    }

    ProximityAssessment {
        evaluation: evaluation.to_string(),
        proximity_score,
        is_relevant,
    }
}

/// Keep the hypotheses scoring at least `threshold`, in order.
pub fn filter_relevant(evaluated: Vec<ScreenedHypothesis>, threshold: f64) -> Vec<ScreenedHypothesis> {
    let total = evaluated.len();
    let kept: Vec<_> = evaluated
        .into_iter()
        .filter(|h| h.proximity.proximity_score >= threshold)
        .collect();
    info!(kept = kept.len(), total, threshold, "Filtered hypotheses by proximity");
    kept
}

/// Proximity (relevance) agent.
pub struct ProximityAgent<C> {
    identity: AgentIdentity,
    completion: CompletionAgent<C>,
}

impl<C: CompletionClient> ProximityAgent<C> {
    pub fn new(client: C, config: &LlmConfig) -> Self {
        Self::with_settings(client, ModelSettings::from_config(config, PROXIMITY_TEMPERATURE))
    }

    pub fn with_settings(client: C, settings: ModelSettings) -> Self {
        Self {
            identity: AgentIdentity {
                id: PROXIMITY_AGENT_ID.to_string(),
                version: PROXIMITY_AGENT_VERSION.to_string(),
                classification: AgentClassification::ProximityEvaluation,
                description: "Scores how closely hypotheses stay on the research goal".to_string(),
            },
            completion: CompletionAgent::new(client, PROXIMITY_SYSTEM_PROMPT, settings),
        }
    }

    /// Evaluate one hypothesis in a fresh conversation.
    pub async fn evaluate(
        &self,
        research_goal: &str,
        hypothesis: &HypothesisRecord,
    ) -> Result<ProximityAssessment, LlmError> {
        let reply = self
            .completion
            .ask(&proximity_prompt(research_goal, hypothesis))
            .await?;
        let assessment = assess_proximity(&reply);
        debug!(
            score = assessment.proximity_score,
            relevant = assessment.is_relevant,
            "Proximity evaluated"
        );
        Ok(assessment)
    }

    /// Evaluate every hypothesis in order, failing on the first error.
    #[instrument(skip_all, fields(count = hypotheses.len()))]
    pub async fn evaluate_all(
        &self,
        research_goal: &str,
        hypotheses: &[HypothesisRecord],
    ) -> Result<Vec<ScreenedHypothesis>, AgentRuntimeError> {
        let mut screened = Vec::with_capacity(hypotheses.len());
        for hypothesis in hypotheses {
            screened.push(ScreenedHypothesis {
                hypothesis: hypothesis.clone(),
                proximity: self.evaluate(research_goal, hypothesis).await?,
            });
        }
        Ok(screened)
    }
}

#[async_trait]
impl<C: CompletionClient> Agent for ProximityAgent<C> {
    type Input = ProximityInput;
    type Output = Vec<ScreenedHypothesis>;

    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    fn validate_input(&self, _input: &Self::Input) -> Result<(), AgentRuntimeError> {
        Ok(())
    }

    async fn execute(&self, input: Self::Input) -> Result<Self::Output, AgentRuntimeError> {
        self.evaluate_all(&input.research_goal, &input.hypotheses).await
    }
}
