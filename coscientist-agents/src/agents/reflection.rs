//! Reflection Agent Implementation
//!
//! # Agent Contract
//!
//! ## Purpose
//! Peer-review each hypothesis against the research goal and attach the raw
//! review together with its heuristic [`AssessmentSummary`].
//!
//! ## Classification
//! HYPOTHESIS REFLECTION
//!
//! ## Processing
//! Hypotheses are reviewed one at a time, strictly in input order. Every
//! review runs in its own conversation holding only the system prompt, so no
//! review sees another hypothesis or its review. The conversation is dropped
//! once the review is stored.
//!
//! ## Failure Modes
//! - [`ReflectionAgent::review_all`]: the first collaborator error aborts the
//!   batch and names the failing index; nothing reviewed so far is returned.
//! - [`ReflectionAgent::review_each`]: one result per input, failures kept in
//!   place.
//!
//! [`AssessmentSummary`]: crate::contracts::AssessmentSummary

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use super::assessment::extract_assessment;
use super::prompts::{review_prompt, REFLECTION_SYSTEM_PROMPT};
use super::telemetry::AgentTelemetry;
use super::traits::{Agent, AgentRuntimeError, CompletionAgent};
use crate::clients::{CompletionClient, LlmConfig, LlmError, ModelSettings};
use crate::contracts::{
    AgentClassification, AgentIdentity, HypothesisRecord, ReflectionInput, ReviewedHypothesis,
};

/// Agent version (semantic versioning).
pub const REFLECTION_AGENT_VERSION: &str = "1.0.0";

/// Agent identifier.
pub const REFLECTION_AGENT_ID: &str = "reflection-agent-v1";

/// Low temperature for analytical reviews.
pub const REFLECTION_TEMPERATURE: f32 = 0.2;

/// Reflection (peer review) agent.
pub struct ReflectionAgent<C> {
    identity: AgentIdentity,
    completion: CompletionAgent<C>,
}

impl<C: CompletionClient> ReflectionAgent<C> {
    /// Create the agent with the configured model at the reflection temperature.
    pub fn new(client: C, config: &LlmConfig) -> Self {
        Self::with_settings(client, ModelSettings::from_config(config, REFLECTION_TEMPERATURE))
    }

    pub fn with_settings(client: C, settings: ModelSettings) -> Self {
        Self {
            identity: AgentIdentity {
                id: REFLECTION_AGENT_ID.to_string(),
                version: REFLECTION_AGENT_VERSION.to_string(),
                classification: AgentClassification::HypothesisReflection,
                description: "Critically reviews hypotheses like a scientific peer reviewer"
                    .to_string(),
            },
            completion: CompletionAgent::new(client, REFLECTION_SYSTEM_PROMPT, settings),
        }
    }

    pub fn completion(&self) -> &CompletionAgent<C> {
        &self.completion
    }

    /// Review a single hypothesis in a fresh conversation.
    pub async fn review(
        &self,
        research_goal: &str,
        hypothesis: &HypothesisRecord,
    ) -> Result<ReviewedHypothesis, LlmError> {
        let prompt = review_prompt(research_goal, hypothesis);
        let review = self.completion.ask(&prompt).await?;
        let assessment_summary = extract_assessment(&review);

        Ok(ReviewedHypothesis {
            hypothesis: hypothesis.clone(),
            review,
            assessment_summary,
        })
    }

    /// Review every hypothesis in order, failing on the first error.
    #[instrument(skip_all, fields(count = hypotheses.len()))]
    pub async fn review_all(
        &self,
        research_goal: &str,
        hypotheses: &[HypothesisRecord],
    ) -> Result<Vec<ReviewedHypothesis>, AgentRuntimeError> {
        info!("Reviewing {} hypotheses", hypotheses.len());
        let telemetry = AgentTelemetry::new(self.agent_id());

        let mut reviewed = Vec::with_capacity(hypotheses.len());
        for (index, hypothesis) in hypotheses.iter().enumerate() {
            debug!(index, "Reviewing hypothesis");
            let result = self
                .review(research_goal, hypothesis)
                .await
                .map_err(|source| AgentRuntimeError::Review { index, source })?;

            telemetry.hypothesis_reviewed(
                index,
                result.assessment_summary.overall_score,
                result.assessment_summary.valid,
            );
            reviewed.push(result);
        }

        Ok(reviewed)
    }

    /// Review every hypothesis in order, keeping each outcome.
    #[instrument(skip_all, fields(count = hypotheses.len()))]
    pub async fn review_each(
        &self,
        research_goal: &str,
        hypotheses: &[HypothesisRecord],
    ) -> Vec<Result<ReviewedHypothesis, LlmError>> {
        let telemetry = AgentTelemetry::new(self.agent_id());

        let mut results = Vec::with_capacity(hypotheses.len());
        for (index, hypothesis) in hypotheses.iter().enumerate() {
            let result = self.review(research_goal, hypothesis).await;
            if let Ok(reviewed) = &result {
                telemetry.hypothesis_reviewed(
                    index,
                    reviewed.assessment_summary.overall_score,
                    reviewed.assessment_summary.valid,
                );
            }
            results.push(result);
        }

        results
    }
}

#[async_trait]
impl<C: CompletionClient> Agent for ReflectionAgent<C> {
    type Input = ReflectionInput;
    type Output = Vec<ReviewedHypothesis>;

    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    // Missing or empty fields are reviewed as empty text.
    fn validate_input(&self, _input: &Self::Input) -> Result<(), AgentRuntimeError> {
        Ok(())
    }

    async fn execute(&self, input: Self::Input) -> Result<Self::Output, AgentRuntimeError> {
        self.review_all(&input.research_goal, &input.hypotheses).await
    }
}
