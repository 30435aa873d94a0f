//! Meta-Review Agent Implementation
//!
//! Synthesizes the final hypotheses into a research report in one of the
//! [`ReportFormat`] layouts, and condenses a report into an executive
//! summary on request.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, instrument};

use super::prompts::{executive_summary_prompt, meta_review_prompt, META_REVIEW_SYSTEM_PROMPT};
use super::traits::{Agent, AgentRuntimeError, CompletionAgent};
use crate::clients::{CompletionClient, LlmConfig, LlmError, ModelSettings};
use crate::contracts::{
    AgentClassification, AgentIdentity, MetaReviewInput, MetaReviewReport, RefinedHypothesis,
    ReportFormat,
};

/// Agent version (semantic versioning).
pub const META_REVIEW_AGENT_VERSION: &str = "1.0.0";

/// Agent identifier.
pub const META_REVIEW_AGENT_ID: &str = "meta-review-agent-v1";

pub const META_REVIEW_TEMPERATURE: f32 = 0.4;

/// Hypotheses included in a report, best first.
pub const REPORT_MAX_HYPOTHESES: usize = 5;

/// Default length limit of an executive summary, in characters.
pub const EXECUTIVE_SUMMARY_CHARS: usize = 500;

const DEFAULT_TITLE: &str = "Research Report";
const TITLE_SEARCH_LINES: usize = 10;
const TITLE_MAX_CHARS: usize = 100;

/// Title of a generated report.
///
/// The first short non-empty line among the opening lines, with heading
/// markup and a `Title:` label removed.
pub fn extract_title(report: &str) -> String {
    report
        .lines()
        .take(TITLE_SEARCH_LINES)
        .map(|line| {
            let line = line.trim().trim_start_matches('#').trim().trim_matches('*').trim();
            match line.get(..6) {
                Some(label) if label.eq_ignore_ascii_case("title:") => {
                    line[6..].trim().trim_matches('*').trim()
                }
                _ => line,
            }
        })
        .find(|line| !line.is_empty() && line.chars().count() < TITLE_MAX_CHARS)
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Meta-review agent.
pub struct MetaReviewAgent<C> {
    identity: AgentIdentity,
    completion: CompletionAgent<C>,
}

impl<C: CompletionClient> MetaReviewAgent<C> {
    pub fn new(client: C, config: &LlmConfig) -> Self {
        Self::with_settings(client, ModelSettings::from_config(config, META_REVIEW_TEMPERATURE))
    }

    pub fn with_settings(client: C, settings: ModelSettings) -> Self {
        Self {
            identity: AgentIdentity {
                id: META_REVIEW_AGENT_ID.to_string(),
                version: META_REVIEW_AGENT_VERSION.to_string(),
                classification: AgentClassification::MetaReview,
                description: "Synthesizes the best hypotheses into a research report".to_string(),
            },
            completion: CompletionAgent::new(client, META_REVIEW_SYSTEM_PROMPT, settings),
        }
    }

    /// Write a report over the first [`REPORT_MAX_HYPOTHESES`] hypotheses.
    #[instrument(skip_all, fields(count = hypotheses.len(), %format))]
    pub async fn generate_report(
        &self,
        research_goal: &str,
        hypotheses: &[RefinedHypothesis],
        format: ReportFormat,
    ) -> Result<MetaReviewReport, AgentRuntimeError> {
        if hypotheses.is_empty() {
            return Err(AgentRuntimeError::NoHypotheses);
        }
        let included = &hypotheses[..hypotheses.len().min(REPORT_MAX_HYPOTHESES)];
        info!("Writing {format} over {} hypotheses", included.len());

        let report = self
            .completion
            .ask(&meta_review_prompt(research_goal, included, format))
            .await?;

        Ok(MetaReviewReport {
            title: extract_title(&report),
            research_goal: research_goal.to_string(),
            report,
            format,
            hypothesis_count: included.len(),
            generated_at: Utc::now(),
        })
    }

    /// Condense a report to at most `max_chars` characters.
    pub async fn executive_summary(
        &self,
        report: &MetaReviewReport,
        max_chars: usize,
    ) -> Result<String, LlmError> {
        let summary = self
            .completion
            .ask(&executive_summary_prompt(report, max_chars))
            .await?;

        if summary.chars().count() <= max_chars {
            return Ok(summary);
        }
        let kept: String = summary.chars().take(max_chars.saturating_sub(3)).collect();
        Ok(format!("{kept}..."))
    }
}

#[async_trait]
impl<C: CompletionClient> Agent for MetaReviewAgent<C> {
    type Input = MetaReviewInput;
    type Output = MetaReviewReport;

    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    fn validate_input(&self, input: &Self::Input) -> Result<(), AgentRuntimeError> {
        if input.hypotheses.is_empty() {
            return Err(AgentRuntimeError::Validation(
                "at least one hypothesis is required for a report".to_string(),
            ));
        }
        Ok(())
    }

    async fn execute(&self, input: Self::Input) -> Result<Self::Output, AgentRuntimeError> {
        self.generate_report(&input.research_goal, &input.hypotheses, input.format)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::agents::testing::ScriptedClient;
    use crate::contracts::HypothesisRecord;

    fn refined(statement: &str, rank: usize) -> RefinedHypothesis {
        RefinedHypothesis {
            hypothesis: HypothesisRecord::new(statement),
            original_rank: rank,
            iteration: 0,
            evolution_type: None,
            feedback: None,
            proximity: None,
        }
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(extract_title("\n# Sleep and Memory\n\nAbstract"), "Sleep and Memory");
        assert_eq!(extract_title("**Title:** Coral Resilience\n..."), "Coral Resilience");
        assert_eq!(extract_title(&"x".repeat(150)), DEFAULT_TITLE);
        assert_eq!(extract_title(""), DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn test_report_covers_at_most_five() {
        let client = Arc::new(ScriptedClient::with_replies(["Title: Reef Futures\n\nAbstract..."]));
        let agent = MetaReviewAgent::new(Arc::clone(&client), &LlmConfig::default());
        let hypotheses: Vec<_> = (1..=7).map(|i| refined(&format!("H{i}"), i)).collect();

        let report = agent
            .generate_report("To study reefs", &hypotheses, ReportFormat::GrantProposal)
            .await
            .unwrap();

        assert_eq!(report.title, "Reef Futures");
        assert_eq!(report.hypothesis_count, 5);
        assert_eq!(report.format, ReportFormat::GrantProposal);

        let conversations = client.conversations();
        let prompt = &conversations[0].messages()[1].content;
        assert!(prompt.contains("HYPOTHESIS 5 (Rank: 5)"));
        assert!(!prompt.contains("HYPOTHESIS 6"));
        assert!(prompt.contains("grant proposal"));
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected() {
        let client = Arc::new(ScriptedClient::default());
        let agent = MetaReviewAgent::new(Arc::clone(&client), &LlmConfig::default());

        let err = agent
            .invoke(MetaReviewInput {
                research_goal: "To study reefs".to_string(),
                hypotheses: vec![],
                format: ReportFormat::default(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AgentRuntimeError::Validation(_)));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_executive_summary_is_clipped() {
        let client = Arc::new(ScriptedClient::with_replies(["s".repeat(40)]));
        let agent = MetaReviewAgent::new(Arc::clone(&client), &LlmConfig::default());
        let report = MetaReviewReport {
            title: "Reef Futures".to_string(),
            research_goal: "To study reefs".to_string(),
            report: "Body".to_string(),
            format: ReportFormat::ScientificReport,
            hypothesis_count: 1,
            generated_at: Utc::now(),
        };

        let summary = agent.executive_summary(&report, 20).await.unwrap();

        assert_eq!(summary, format!("{}...", "s".repeat(17)));
        assert!(client.conversations()[0].messages()[1].content.contains("no more than 20 characters"));
    }
}
