//! Supervisor
//!
//! Static control loop over the research agents. Stages run one after
//! another, each consuming the previous stage's output:
//!
//! 1. validate the research goal (issues are reported, never blocking)
//! 2. generate hypotheses
//! 3. validate each generated statement (recorded, not filtering)
//! 4. review every hypothesis
//! 5. rank the reviewed hypotheses
//! 6. refine the top [`REFINE_TOP_K`]: each iteration reviews, evolves and
//!    scores proximity, keeping a variant only at
//!    [`REFINEMENT_PROXIMITY_THRESHOLD`] or above
//! 7. write the meta-review report over the best hypotheses

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use validator::Validate;

use super::evolution::EvolutionAgent;
use super::generation::GenerationAgent;
use super::meta_review::{MetaReviewAgent, REPORT_MAX_HYPOTHESES};
use super::proximity::ProximityAgent;
use super::ranking::RankingAgent;
use super::reflection::ReflectionAgent;
use super::telemetry::AgentTelemetry;
use super::traits::{Agent, AgentRuntimeError};
use crate::clients::{CompletionClient, LlmConfig, LlmError};
use crate::contracts::{
    AgentClassification, AgentIdentity, EvolvedHypothesis, GenerationInput, MetaReviewReport,
    ProximityAssessment, RankedHypothesis, RefinedHypothesis, ReportFormat, ValidationReport,
};
use crate::validators::{validate_hypothesis, validate_research_goal};

/// Agent version (semantic versioning).
pub const SUPERVISOR_AGENT_VERSION: &str = "1.0.0";

/// Agent identifier.
pub const SUPERVISOR_AGENT_ID: &str = "supervisor-agent-v1";

/// Number of top-ranked hypotheses taken through refinement.
pub const REFINE_TOP_K: usize = 3;

/// Lowest proximity ratio (score / 10) at which an evolved variant replaces
/// the current hypothesis.
pub const REFINEMENT_PROXIMITY_THRESHOLD: f64 = 0.7;

pub const DEFAULT_REFINEMENT_ITERATIONS: usize = 3;

/// Tunables of a research run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorOptions {
    /// Refinement iterations over the top hypotheses; 0 skips refinement
    pub refinement_iterations: usize,
    pub report_format: ReportFormat,
}

impl Default for SupervisorOptions {
    fn default() -> Self {
        Self {
            refinement_iterations: DEFAULT_REFINEMENT_ITERATIONS,
            report_format: ReportFormat::default(),
        }
    }
}

/// Everything one research run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchReport {
    pub research_goal: String,
    pub goal_validation: ValidationReport,
    /// One report per generated hypothesis, in generation order
    pub hypothesis_validations: Vec<ValidationReport>,
    /// Ranking before refinement, best first
    pub ranked: Vec<RankedHypothesis>,
    /// Top hypotheses after refinement, in rank order
    pub refined: Vec<RefinedHypothesis>,
    pub final_report: MetaReviewReport,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Refined hypotheses first, then the remaining ranked ones, up to the
/// report limit.
fn report_candidates(
    refined: &[RefinedHypothesis],
    ranked: &[RankedHypothesis],
) -> Vec<RefinedHypothesis> {
    refined
        .iter()
        .cloned()
        .chain(ranked.iter().skip(refined.len()).map(RefinedHypothesis::from_ranked))
        .take(REPORT_MAX_HYPOTHESES)
        .collect()
}

/// Drives every research agent for one research goal.
pub struct Supervisor<C> {
    identity: AgentIdentity,
    options: SupervisorOptions,
    generation: GenerationAgent<C>,
    reflection: ReflectionAgent<C>,
    ranking: RankingAgent<C>,
    evolution: EvolutionAgent<C>,
    proximity: ProximityAgent<C>,
    meta_review: MetaReviewAgent<C>,
}

impl<C: CompletionClient + Clone> Supervisor<C> {
    /// Build every agent on a shared client.
    pub fn new(client: C, config: &LlmConfig) -> Self {
        Self {
            identity: AgentIdentity {
                id: SUPERVISOR_AGENT_ID.to_string(),
                version: SUPERVISOR_AGENT_VERSION.to_string(),
                classification: AgentClassification::ResearchSupervision,
                description: "Coordinates generation, review, ranking, refinement and reporting"
                    .to_string(),
            },
            options: SupervisorOptions::default(),
            generation: GenerationAgent::new(client.clone(), config),
            reflection: ReflectionAgent::new(client.clone(), config),
            ranking: RankingAgent::new(client.clone(), config),
            evolution: EvolutionAgent::new(client.clone(), config),
            proximity: ProximityAgent::new(client.clone(), config),
            meta_review: MetaReviewAgent::new(client, config),
        }
    }
}

impl<C: CompletionClient> Supervisor<C> {
    pub fn with_options(mut self, options: SupervisorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &SupervisorOptions {
        &self.options
    }

    pub fn generation(&self) -> &GenerationAgent<C> {
        &self.generation
    }

    pub fn reflection(&self) -> &ReflectionAgent<C> {
        &self.reflection
    }

    pub fn ranking(&self) -> &RankingAgent<C> {
        &self.ranking
    }

    pub fn evolution(&self) -> &EvolutionAgent<C> {
        &self.evolution
    }

    pub fn proximity(&self) -> &ProximityAgent<C> {
        &self.proximity
    }

    pub fn meta_review(&self) -> &MetaReviewAgent<C> {
        &self.meta_review
    }

    /// Run the full workflow.
    #[instrument(skip(self, research_goal))]
    pub async fn run(
        &self,
        research_goal: &str,
        count: usize,
    ) -> Result<ResearchReport, AgentRuntimeError> {
        let started_at = Utc::now();

        let goal_validation = validate_research_goal(research_goal);
        if !goal_validation.issues.is_empty() {
            warn!(issues = ?goal_validation.issues, "Research goal has issues");
        }

        let hypotheses = self.generation.generate(research_goal, count).await?;
        info!(generated = hypotheses.len(), "Generation stage finished");

        let hypothesis_validations: Vec<ValidationReport> = hypotheses
            .iter()
            .map(|h| validate_hypothesis(&h.statement))
            .collect();
        let flagged = hypothesis_validations.iter().filter(|r| !r.is_valid).count();
        if flagged > 0 {
            warn!(flagged, "Some generated hypotheses failed validation");
        }

        let reviewed = self.reflection.review_all(research_goal, &hypotheses).await?;
        info!(reviewed = reviewed.len(), "Reflection stage finished");

        let ranked = self.ranking.rank(research_goal, reviewed).await?;
        info!(ranked = ranked.len(), "Ranking stage finished");

        let refined = self.refine(research_goal, &ranked).await?;
        let accepted = refined.iter().filter(|r| r.iteration > 0).count();
        info!(refined = refined.len(), accepted, "Refinement stage finished");

        let final_report = self
            .meta_review
            .generate_report(
                research_goal,
                &report_candidates(&refined, &ranked),
                self.options.report_format,
            )
            .await?;
        info!(title = %final_report.title, "Report stage finished");

        Ok(ResearchReport {
            research_goal: research_goal.to_string(),
            goal_validation,
            hypothesis_validations,
            ranked,
            refined,
            final_report,
            started_at,
            completed_at: Utc::now(),
        })
    }

    /// Iteratively refine the top-ranked hypotheses.
    ///
    /// Every iteration reviews the current version of each hypothesis,
    /// evolves it from that review and scores the variant's proximity to
    /// the goal. A rejected variant leaves the current version in place.
    #[instrument(skip_all, fields(iterations = self.options.refinement_iterations))]
    pub async fn refine(
        &self,
        research_goal: &str,
        ranked: &[RankedHypothesis],
    ) -> Result<Vec<RefinedHypothesis>, AgentRuntimeError> {
        let telemetry = AgentTelemetry::new(self.agent_id());
        let mut refined: Vec<RefinedHypothesis> = ranked
            .iter()
            .take(REFINE_TOP_K)
            .map(RefinedHypothesis::from_ranked)
            .collect();

        for iteration in 1..=self.options.refinement_iterations {
            for (index, current) in refined.iter_mut().enumerate() {
                let (evolved, feedback, proximity) = self
                    .refine_once(research_goal, current)
                    .await
                    .map_err(|source| AgentRuntimeError::Refinement { index, source })?;

                let accepted = proximity.ratio() >= REFINEMENT_PROXIMITY_THRESHOLD;
                telemetry.hypothesis_refined(index, iteration, proximity.proximity_score, accepted);
                if accepted {
                    info!(index, iteration, "Accepted refined hypothesis");
                    current.accept(evolved, feedback, proximity, iteration);
                } else {
                    warn!(
                        index,
                        iteration,
                        score = proximity.proximity_score,
                        "Refined hypothesis drifted from the research goal"
                    );
                }
            }
        }

        Ok(refined)
    }

    async fn refine_once(
        &self,
        research_goal: &str,
        current: &RefinedHypothesis,
    ) -> Result<(EvolvedHypothesis, String, ProximityAssessment), LlmError> {
        let reviewed = self.reflection.review(research_goal, &current.hypothesis).await?;
        let evolved = self
            .evolution
            .evolve(research_goal, &reviewed, current.original_rank)
            .await?;
        let proximity = self.proximity.evaluate(research_goal, &evolved.hypothesis).await?;
        Ok((evolved, reviewed.review, proximity))
    }
}

#[async_trait]
impl<C: CompletionClient> Agent for Supervisor<C> {
    type Input = GenerationInput;
    type Output = ResearchReport;

    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    fn validate_input(&self, input: &Self::Input) -> Result<(), AgentRuntimeError> {
        input.validate()?;
        Ok(())
    }

    async fn execute(&self, input: Self::Input) -> Result<Self::Output, AgentRuntimeError> {
        self.run(&input.research_goal, input.count).await
    }
}
