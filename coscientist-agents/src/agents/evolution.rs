//! Evolution Agent Implementation
//!
//! # Agent Contract
//!
//! ## Purpose
//! Improve the best-ranked hypotheses using their reviews, and propose a
//! hybrid of the two best.
//!
//! ## Classification
//! HYPOTHESIS EVOLUTION
//!
//! ## Processing
//! - Each of the top [`EVOLUTION_TOP_K`] hypotheses is evolved in its own
//!   conversation from its statement, supporting fields and review.
//! - With at least two hypotheses, the top two are combined into one hybrid.
//!
//! Replies are read with the generation parser. A refined hypothesis keeps
//! the original text for every field the reply leaves out; a hybrid without
//! a statement is an error.

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use super::generation::parse_hypotheses;
use super::prompts::{combination_prompt, evolution_prompt, EVOLUTION_SYSTEM_PROMPT};
use super::traits::{Agent, AgentRuntimeError, CompletionAgent};
use crate::clients::{CompletionClient, LlmConfig, LlmError, ModelSettings};
use crate::contracts::{
    AgentClassification, AgentIdentity, EvolutionInput, EvolutionKind, EvolvedHypothesis,
    HypothesisRecord, RankedHypothesis, ReviewedHypothesis,
};

/// Agent version (semantic versioning).
pub const EVOLUTION_AGENT_VERSION: &str = "1.0.0";

/// Agent identifier.
pub const EVOLUTION_AGENT_ID: &str = "evolution-agent-v1";

/// Balanced temperature for creative but focused rewrites.
pub const EVOLUTION_TEMPERATURE: f32 = 0.5;

/// Number of top-ranked hypotheses evolved individually.
pub const EVOLUTION_TOP_K: usize = 3;

/// Fill blank fields of `parsed` from `fallback`.
fn merge_fields(mut parsed: HypothesisRecord, fallback: &HypothesisRecord) -> HypothesisRecord {
    let pairs = [
        (&mut parsed.statement, &fallback.statement),
        (&mut parsed.rationale, &fallback.rationale),
        (&mut parsed.evidence, &fallback.evidence),
        (&mut parsed.assumptions, &fallback.assumptions),
        (&mut parsed.validation, &fallback.validation),
    ];
    for (field, original) in pairs {
        if field.trim().is_empty() {
            field.clone_from(original);
        }
    }
    parsed
}

/// Hypothesis evolution agent.
pub struct EvolutionAgent<C> {
    identity: AgentIdentity,
    completion: CompletionAgent<C>,
}

impl<C: CompletionClient> EvolutionAgent<C> {
    pub fn new(client: C, config: &LlmConfig) -> Self {
        Self::with_settings(client, ModelSettings::from_config(config, EVOLUTION_TEMPERATURE))
    }

    pub fn with_settings(client: C, settings: ModelSettings) -> Self {
        Self {
            identity: AgentIdentity {
                id: EVOLUTION_AGENT_ID.to_string(),
                version: EVOLUTION_AGENT_VERSION.to_string(),
                classification: AgentClassification::HypothesisEvolution,
                description: "Refines promising hypotheses and combines the strongest two"
                    .to_string(),
            },
            completion: CompletionAgent::new(client, EVOLUTION_SYSTEM_PROMPT, settings),
        }
    }

    /// Evolve one reviewed hypothesis in a fresh conversation.
    pub async fn evolve(
        &self,
        research_goal: &str,
        reviewed: &ReviewedHypothesis,
        parent_rank: usize,
    ) -> Result<EvolvedHypothesis, LlmError> {
        let reply = self
            .completion
            .ask(&evolution_prompt(research_goal, reviewed))
            .await?;

        let hypothesis = match parse_hypotheses(&reply).into_iter().next() {
            Some(parsed) => merge_fields(parsed, &reviewed.hypothesis),
            None => {
                warn!(parent_rank, "Evolution reply held no labelled hypothesis");
                reviewed.hypothesis.clone()
            }
        };

        Ok(EvolvedHypothesis {
            hypothesis,
            evolution_type: EvolutionKind::IndividualRefinement,
            parent_ranks: vec![parent_rank],
            evolution_text: reply,
        })
    }

    /// Combine two ranked hypotheses into a hybrid.
    pub async fn combine(
        &self,
        research_goal: &str,
        first: &RankedHypothesis,
        second: &RankedHypothesis,
    ) -> Result<EvolvedHypothesis, AgentRuntimeError> {
        let reply = self
            .completion
            .ask(&combination_prompt(research_goal, first, second))
            .await?;

        let hypothesis = parse_hypotheses(&reply)
            .into_iter()
            .next()
            .ok_or(AgentRuntimeError::NoHypotheses)?;

        Ok(EvolvedHypothesis {
            hypothesis,
            evolution_type: EvolutionKind::HypothesisCombination,
            parent_ranks: vec![first.rank, second.rank],
            evolution_text: reply,
        })
    }

    /// Evolve the top-ranked hypotheses, then combine the best two.
    ///
    /// `ranked` is ordered by rank first.
    #[instrument(skip_all, fields(count = ranked.len()))]
    pub async fn evolve_top(
        &self,
        research_goal: &str,
        ranked: &[RankedHypothesis],
    ) -> Result<Vec<EvolvedHypothesis>, AgentRuntimeError> {
        let mut top: Vec<&RankedHypothesis> = ranked.iter().collect();
        top.sort_by_key(|r| r.rank);
        top.truncate(EVOLUTION_TOP_K);
        info!("Evolving {} hypotheses", top.len());

        let mut evolved = Vec::with_capacity(top.len() + 1);
        for candidate in &top {
            debug!(rank = candidate.rank, "Evolving hypothesis");
            evolved.push(
                self.evolve(research_goal, &candidate.hypothesis, candidate.rank)
                    .await?,
            );
        }

        if let [first, second, ..] = top.as_slice() {
            evolved.push(self.combine(research_goal, first, second).await?);
        }

        Ok(evolved)
    }
}

#[async_trait]
impl<C: CompletionClient> Agent for EvolutionAgent<C> {
    type Input = EvolutionInput;
    type Output = Vec<EvolvedHypothesis>;

    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    fn validate_input(&self, input: &Self::Input) -> Result<(), AgentRuntimeError> {
        if input.research_goal.trim().is_empty() {
            return Err(AgentRuntimeError::Validation(
                "research_goal must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    async fn execute(&self, input: Self::Input) -> Result<Self::Output, AgentRuntimeError> {
        self.evolve_top(&input.research_goal, &input.ranked).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::agents::testing::ScriptedClient;
    use crate::contracts::{AssessmentSummary, RankingEvidence};

    fn ranked(statement: &str, rank: usize) -> RankedHypothesis {
        RankedHypothesis {
            hypothesis: ReviewedHypothesis {
                hypothesis: HypothesisRecord {
                    statement: statement.to_string(),
                    rationale: format!("Because of {statement}"),
                    evidence: "Field surveys".to_string(),
                    ..Default::default()
                },
                review: "Plausible but vague.".to_string(),
                assessment_summary: AssessmentSummary {
                    valid: true,
                    strengths: vec![],
                    weaknesses: vec![],
                    ethical_concerns: false,
                    practical_limitations: false,
                    overall_score: 1.0,
                },
            },
            rank,
            evidence: RankingEvidence::Tournament {
                wins: 0,
                total_comparisons: 0,
            },
        }
    }

    fn agent(client: &Arc<ScriptedClient>) -> EvolutionAgent<Arc<ScriptedClient>> {
        EvolutionAgent::new(Arc::clone(client), &LlmConfig::default())
    }

    #[tokio::test]
    async fn test_evolve_keeps_fields_the_reply_omits() {
        let client = Arc::new(ScriptedClient::with_replies([
            "Statement: Warm water above 30C doubles bleaching\nRationale: Thermal stress expels algae",
        ]));
        let original = ranked("Warm water increases bleaching", 1);

        let evolved = agent(&client)
            .evolve("To study reefs", &original.hypothesis, 1)
            .await
            .unwrap();

        assert_eq!(evolved.hypothesis.statement, "Warm water above 30C doubles bleaching");
        assert_eq!(evolved.hypothesis.rationale, "Thermal stress expels algae");
        assert_eq!(evolved.hypothesis.evidence, "Field surveys");
        assert_eq!(evolved.evolution_type, EvolutionKind::IndividualRefinement);
        assert_eq!(evolved.parent_ranks, vec![1]);

        let conversations = client.conversations();
        let prompt = &conversations[0].messages()[1].content;
        assert!(prompt.contains("REVIEW FEEDBACK:\nPlausible but vague."));
        assert!((client.settings()[0].temperature - EVOLUTION_TEMPERATURE).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_unparseable_evolution_keeps_original() {
        let client = Arc::new(ScriptedClient::with_replies(["I cannot improve this."]));
        let original = ranked("Warm water increases bleaching", 2);

        let evolved = agent(&client)
            .evolve("To study reefs", &original.hypothesis, 2)
            .await
            .unwrap();

        assert_eq!(evolved.hypothesis, original.hypothesis.hypothesis);
        assert_eq!(evolved.evolution_text, "I cannot improve this.");
    }

    #[tokio::test]
    async fn test_evolve_top_refines_three_and_combines_two() {
        let client = Arc::new(ScriptedClient::with_replies([
            "Statement: A2",
            "Statement: B2",
            "Statement: C2",
            "Statement: A and B together",
        ]));
        let input = vec![
            ranked("D", 4),
            ranked("B", 2),
            ranked("A", 1),
            ranked("C", 3),
        ];

        let evolved = agent(&client).evolve_top("To study reefs", &input).await.unwrap();

        let statements: Vec<&str> = evolved.iter().map(|e| e.hypothesis.statement.as_str()).collect();
        assert_eq!(statements, ["A2", "B2", "C2", "A and B together"]);
        assert_eq!(evolved[3].evolution_type, EvolutionKind::HypothesisCombination);
        assert_eq!(evolved[3].parent_ranks, vec![1, 2]);
        assert_eq!(client.calls(), 4);
        assert!(client.conversations().iter().all(|c| c.turns() == 1));
    }

    #[tokio::test]
    async fn test_single_hypothesis_is_not_combined() {
        let client = Arc::new(ScriptedClient::with_replies(["Statement: A2"]));

        let evolved = agent(&client)
            .evolve_top("To study reefs", &[ranked("A", 1)])
            .await
            .unwrap();

        assert_eq!(evolved.len(), 1);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_combination_fails() {
        let client = Arc::new(ScriptedClient::with_replies(["Statement: A2", "Statement: B2", "No idea."]));

        let err = agent(&client)
            .evolve_top("To study reefs", &[ranked("A", 1), ranked("B", 2)])
            .await
            .unwrap_err();

        assert!(matches!(err, AgentRuntimeError::NoHypotheses));
    }
}
