//! Co-Scientist Agent Infrastructure
//!
//! This crate provides the agents, data contracts and language model client
//! behind the `coscientist` command-line tool. Given a research goal, the
//! agents generate candidate hypotheses, peer-review them, rank them, refine
//! the best few, and write a research report.
//!
//! # Workflow
//!
//! ```text
//! research goal ──► GenerationAgent ──► ReflectionAgent ──► RankingAgent
//!                                                                │
//!        ┌───────────────────────────────────────────────────────┘
//!        ▼
//!   refine top 3: ReflectionAgent ──► EvolutionAgent ──► ProximityAgent (gate 0.7)
//!        │
//!        ▼
//!   MetaReviewAgent ──► report
//! ```
//!
//! Each agent talks to the model through a [`CompletionAgent`], one fresh
//! conversation per request.
//!
//! Every stage runs sequentially; there is no concurrent agent execution
//! and no retry around a model call. A failed call propagates to the caller.
//!
//! # Usage
//!
//! ```rust,ignore
//! use coscientist_agents::{LlmConfig, OpenAiClient, ReflectionAgent, HypothesisRecord};
//!
//! let config = LlmConfig::from_env()?;
//! let agent = ReflectionAgent::new(OpenAiClient::new(config.clone())?, &config);
//!
//! let reviewed = agent
//!     .review_all("To investigate sleep and memory", &[HypothesisRecord::new("...")])
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`agents`]: agent implementations, prompts, assessment heuristics
//! - [`contracts`]: hypothesis records, conversations, reports
//! - [`clients`]: completion client trait and OpenAI-compatible client
//! - [`validators`]: lexical checks for hypotheses and research goals

#![warn(rustdoc::missing_crate_level_docs)]

pub mod agents;
pub mod clients;
pub mod contracts;
pub mod validators;

// Re-export commonly used types
pub use agents::{
    Agent, AgentRuntimeError, AgentTelemetry, CompletionAgent, EvolutionAgent, GenerationAgent,
    MetaReviewAgent, ProximityAgent, RankingAgent, ReflectionAgent, ResearchReport, Supervisor,
    SupervisorOptions, EVOLUTION_AGENT_ID, GENERATION_AGENT_ID, META_REVIEW_AGENT_ID,
    PROXIMITY_AGENT_ID, RANKING_AGENT_ID, REFLECTION_AGENT_ID, SUPERVISOR_AGENT_ID,
};
pub use clients::{CompletionClient, LlmConfig, LlmError, ModelSettings, OpenAiClient};
pub use contracts::{
    AgentClassification, AssessmentSummary, Conversation, EvolutionKind, EvolvedHypothesis,
    HypothesisRecord, MetaReviewReport, ProximityAssessment, RankedHypothesis, RankingEvidence,
    RefinedHypothesis, ReportFormat, ReviewedHypothesis, ScreenedHypothesis, ValidationReport,
};
pub use validators::{validate_hypothesis, validate_research_goal};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Agent registration information for CLI wiring.
#[derive(Debug, Clone)]
pub struct AgentRegistration {
    /// Agent ID
    pub id: String,
    /// Agent version
    pub version: String,
    /// Agent classification
    pub classification: AgentClassification,
    /// CLI command
    pub cli_command: String,
    /// Model temperature, if the agent calls the model directly
    pub temperature: Option<f32>,
}

/// Get registration info for all agents.
pub fn get_agent_registrations() -> Vec<AgentRegistration> {
    vec![
        AgentRegistration {
            id: GENERATION_AGENT_ID.to_string(),
            version: agents::GENERATION_AGENT_VERSION.to_string(),
            classification: AgentClassification::HypothesisGeneration,
            cli_command: "generate".to_string(),
            temperature: Some(agents::GENERATION_TEMPERATURE),
        },
        AgentRegistration {
            id: REFLECTION_AGENT_ID.to_string(),
            version: agents::REFLECTION_AGENT_VERSION.to_string(),
            classification: AgentClassification::HypothesisReflection,
            cli_command: "review".to_string(),
            temperature: Some(agents::REFLECTION_TEMPERATURE),
        },
        AgentRegistration {
            id: RANKING_AGENT_ID.to_string(),
            version: agents::RANKING_AGENT_VERSION.to_string(),
            classification: AgentClassification::HypothesisRanking,
            cli_command: "rank".to_string(),
            temperature: Some(agents::RANKING_TEMPERATURE),
        },
        AgentRegistration {
            id: EVOLUTION_AGENT_ID.to_string(),
            version: agents::EVOLUTION_AGENT_VERSION.to_string(),
            classification: AgentClassification::HypothesisEvolution,
            cli_command: "evolve".to_string(),
            temperature: Some(agents::EVOLUTION_TEMPERATURE),
        },
        AgentRegistration {
            id: PROXIMITY_AGENT_ID.to_string(),
            version: agents::PROXIMITY_AGENT_VERSION.to_string(),
            classification: AgentClassification::ProximityEvaluation,
            cli_command: "proximity".to_string(),
            temperature: Some(agents::PROXIMITY_TEMPERATURE),
        },
        AgentRegistration {
            id: META_REVIEW_AGENT_ID.to_string(),
            version: agents::META_REVIEW_AGENT_VERSION.to_string(),
            classification: AgentClassification::MetaReview,
            cli_command: "report".to_string(),
            temperature: Some(agents::META_REVIEW_TEMPERATURE),
        },
        AgentRegistration {
            id: SUPERVISOR_AGENT_ID.to_string(),
            version: agents::SUPERVISOR_AGENT_VERSION.to_string(),
            classification: AgentClassification::ResearchSupervision,
            cli_command: "run".to_string(),
            temperature: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_registrations() {
        let registrations = get_agent_registrations();
        assert_eq!(registrations.len(), 7);

        let reflection = &registrations[1];
        assert_eq!(reflection.id, REFLECTION_AGENT_ID);
        assert_eq!(reflection.classification, AgentClassification::HypothesisReflection);
        assert_eq!(reflection.temperature, Some(0.2));

        let proximity = registrations
            .iter()
            .find(|r| r.cli_command == "proximity")
            .unwrap();
        assert_eq!(proximity.id, PROXIMITY_AGENT_ID);
        assert_eq!(registrations.last().unwrap().temperature, None);
    }
}
