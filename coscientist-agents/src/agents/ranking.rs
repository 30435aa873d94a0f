//! Ranking Agent Implementation
//!
//! # Agent Contract
//!
//! ## Purpose
//! Order reviewed hypotheses by scientific merit.
//!
//! ## Classification
//! HYPOTHESIS RANKING
//!
//! ## Methods
//! - Up to [`TOURNAMENT_MAX_HYPOTHESES`]: round-robin pairwise tournament.
//!   Every pair is compared once in its own conversation and the verdict is
//!   read from the reply by [`determine_winner`]. Hypotheses are ordered by
//!   wins; ties keep input order.
//! - Larger sets: each hypothesis is scored independently on the
//!   [`SCORING_CRITERIA`] and ordered by the mean of the scores found, ties
//!   again keeping input order.

use std::collections::BTreeMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument};

use super::prompts::{comparison_prompt, scoring_prompt, RANKING_SYSTEM_PROMPT, SCORING_CRITERIA};
use super::telemetry::AgentTelemetry;
use super::traits::{Agent, AgentRuntimeError, CompletionAgent};
use crate::clients::{CompletionClient, LlmConfig, ModelSettings};
use crate::contracts::{
    AgentClassification, AgentIdentity, RankedHypothesis, RankingEvidence, RankingInput,
    ReviewedHypothesis,
};

/// Agent version (semantic versioning).
pub const RANKING_AGENT_VERSION: &str = "1.0.0";

/// Agent identifier.
pub const RANKING_AGENT_ID: &str = "ranking-agent-v1";

/// Low temperature for consistent judgments.
pub const RANKING_TEMPERATURE: f32 = 0.3;

/// Largest set ranked by pairwise tournament.
pub const TOURNAMENT_MAX_HYPOTHESES: usize = 5;

/// Outcome of one pairwise comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    First,
    Second,
    Tie,
}

/// Read the verdict of a comparison between "hypothesis 1" and "hypothesis 2".
///
/// In order: an explicit "hypothesis K is superior" / "is stronger"; then
/// the count of "hypothesis K is more" plus "hypothesis K has higher"; then
/// whichever side alone is named in the last three sentences. Otherwise a
/// tie.
pub fn determine_winner(comparison: &str) -> Verdict {
    let lower = comparison.to_lowercase();

    let declared = |k: u8| {
        lower.contains(&format!("hypothesis {k} is superior"))
            || lower.contains(&format!("hypothesis {k} is stronger"))
    };
    if declared(1) {
        return Verdict::First;
    }
    if declared(2) {
        return Verdict::Second;
    }

    let advantages = |k: u8| {
        lower.matches(&format!("hypothesis {k} is more")).count()
            + lower.matches(&format!("hypothesis {k} has higher")).count()
    };
    let (first, second) = (advantages(1), advantages(2));
    if first != second {
        return if first > second {
            Verdict::First
        } else {
            Verdict::Second
        };
    }

    let sentences: Vec<&str> = lower.split('.').collect();
    let tail = sentences[sentences.len().saturating_sub(3)..].join(".");
    match (tail.contains("hypothesis 1"), tail.contains("hypothesis 2")) {
        (true, false) => Verdict::First,
        (false, true) => Verdict::Second,
        _ => Verdict::Tie,
    }
}

static CRITERION_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    SCORING_CRITERIA
        .iter()
        .filter_map(|&criterion| {
            let pattern = format!(
                r"(?i){}\**\s*[:\-]\s*\**\s*(10|[1-9])(?:\s*/\s*10)?\b",
                regex::escape(criterion)
            );
            Regex::new(&pattern).ok().map(|re| (criterion, re))
        })
        .collect()
});

/// Criterion scores (1-10) found in an evaluation, keyed by criterion.
///
/// Accepts `Novelty: 8`, `Novelty - 8` and `Novelty: 8/10`. The first match
/// per criterion wins; criteria without a score are absent.
pub fn extract_scores(evaluation: &str) -> BTreeMap<String, u8> {
    CRITERION_PATTERNS
        .iter()
        .filter_map(|(criterion, re)| {
            let score = re.captures(evaluation)?.get(1)?.as_str().parse().ok()?;
            Some((criterion.to_string(), score))
        })
        .collect()
}

/// Mean of the scores, 0 when there are none.
pub fn mean_score(scores: &BTreeMap<String, u8>) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.values().map(|&s| f64::from(s)).sum::<f64>() / scores.len() as f64
}

/// Hypothesis ranking agent.
pub struct RankingAgent<C> {
    identity: AgentIdentity,
    completion: CompletionAgent<C>,
}

impl<C: CompletionClient> RankingAgent<C> {
    pub fn new(client: C, config: &LlmConfig) -> Self {
        Self::with_settings(client, ModelSettings::from_config(config, RANKING_TEMPERATURE))
    }

    pub fn with_settings(client: C, settings: ModelSettings) -> Self {
        Self {
            identity: AgentIdentity {
                id: RANKING_AGENT_ID.to_string(),
                version: RANKING_AGENT_VERSION.to_string(),
                classification: AgentClassification::HypothesisRanking,
                description: "Ranks reviewed hypotheses by tournament or criterion scoring"
                    .to_string(),
            },
            completion: CompletionAgent::new(client, RANKING_SYSTEM_PROMPT, settings),
        }
    }

    /// Rank hypotheses with the method suited to their number.
    pub async fn rank(
        &self,
        research_goal: &str,
        hypotheses: Vec<ReviewedHypothesis>,
    ) -> Result<Vec<RankedHypothesis>, AgentRuntimeError> {
        if hypotheses.len() <= TOURNAMENT_MAX_HYPOTHESES {
            self.rank_by_tournament(research_goal, hypotheses).await
        } else {
            self.rank_by_scoring(research_goal, hypotheses).await
        }
    }

    /// Round-robin pairwise tournament.
    #[instrument(skip_all, fields(count = hypotheses.len()))]
    pub async fn rank_by_tournament(
        &self,
        research_goal: &str,
        hypotheses: Vec<ReviewedHypothesis>,
    ) -> Result<Vec<RankedHypothesis>, AgentRuntimeError> {
        info!("Ranking by pairwise comparison");
        let telemetry = AgentTelemetry::new(self.agent_id());
        let n = hypotheses.len();
        let mut wins = vec![0usize; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let prompt = comparison_prompt(
                    research_goal,
                    &hypotheses[i].hypothesis,
                    &hypotheses[j].hypothesis,
                );
                let reply = self.completion.ask(&prompt).await?;
                let verdict = determine_winner(&reply);
                debug!(first = i, second = j, ?verdict, "Comparison finished");

                match verdict {
                    Verdict::First => wins[i] += 1,
                    Verdict::Second => wins[j] += 1,
                    Verdict::Tie => {}
                }
                telemetry.hypothesis_compared(json!({
                    "first": i,
                    "second": j,
                    "verdict": verdict,
                }));
            }
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| wins[b].cmp(&wins[a]));

        let mut slots: Vec<Option<ReviewedHypothesis>> = hypotheses.into_iter().map(Some).collect();
        let total_comparisons = n.saturating_sub(1);

        Ok(order
            .into_iter()
            .enumerate()
            .filter_map(|(position, index)| {
                slots[index].take().map(|hypothesis| RankedHypothesis {
                    hypothesis,
                    rank: position + 1,
                    evidence: RankingEvidence::Tournament {
                        wins: wins[index],
                        total_comparisons,
                    },
                })
            })
            .collect())
    }

    /// Independent per-hypothesis scoring.
    #[instrument(skip_all, fields(count = hypotheses.len()))]
    pub async fn rank_by_scoring(
        &self,
        research_goal: &str,
        hypotheses: Vec<ReviewedHypothesis>,
    ) -> Result<Vec<RankedHypothesis>, AgentRuntimeError> {
        info!("Ranking by criterion scoring");
        let telemetry = AgentTelemetry::new(self.agent_id());

        let mut scored = Vec::with_capacity(hypotheses.len());
        for (index, hypothesis) in hypotheses.into_iter().enumerate() {
            let evaluation = self
                .completion
                .ask(&scoring_prompt(research_goal, &hypothesis))
                .await?;
            let scores = extract_scores(&evaluation);
            let overall_score = mean_score(&scores);

            telemetry.hypothesis_compared(json!({
                "index": index,
                "criteria_found": scores.len(),
                "overall_score": overall_score,
            }));
            scored.push((hypothesis, evaluation, scores, overall_score));
        }

        scored.sort_by(|a, b| b.3.total_cmp(&a.3));

        Ok(scored
            .into_iter()
            .enumerate()
            .map(|(position, (hypothesis, evaluation, scores, overall_score))| {
                RankedHypothesis {
                    hypothesis,
                    rank: position + 1,
                    evidence: RankingEvidence::Scoring {
                        evaluation,
                        scores,
                        overall_score,
                    },
                }
            })
            .collect())
    }
}

#[async_trait]
impl<C: CompletionClient> Agent for RankingAgent<C> {
    type Input = RankingInput;
    type Output = Vec<RankedHypothesis>;

    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    fn validate_input(&self, _input: &Self::Input) -> Result<(), AgentRuntimeError> {
        Ok(())
    }

    async fn execute(&self, input: Self::Input) -> Result<Self::Output, AgentRuntimeError> {
        self.rank(&input.research_goal, input.hypotheses).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::agents::assessment::extract_assessment;
    use crate::agents::testing::ScriptedClient;
    use crate::contracts::HypothesisRecord;

    fn reviewed(statement: &str) -> ReviewedHypothesis {
        ReviewedHypothesis {
            hypothesis: HypothesisRecord::new(statement),
            review: "Plausible.".to_string(),
            assessment_summary: extract_assessment("Plausible."),
        }
    }

    fn statements(ranked: &[RankedHypothesis]) -> Vec<&str> {
        ranked
            .iter()
            .map(|r| r.hypothesis.hypothesis.statement.as_str())
            .collect()
    }

    #[test]
    fn test_explicit_verdict() {
        assert_eq!(determine_winner("Overall, Hypothesis 2 is superior."), Verdict::Second);
        assert_eq!(
            determine_winner("Hypothesis 1 is stronger; hypothesis 2 is superior in scope"),
            Verdict::First
        );
    }

    #[test]
    fn test_advantage_counts() {
        let text = "Hypothesis 2 is more novel. Hypothesis 2 has higher impact. \
                    Hypothesis 1 is more testable. Both are fine. Both are good. Both are ok.";
        assert_eq!(determine_winner(text), Verdict::Second);
    }

    #[test]
    fn test_conclusion_sentences() {
        let text = "Hypothesis 1 and hypothesis 2 both have merit. Neither dominates. \
                    On balance I favor hypothesis 1. It is clearer.";
        assert_eq!(determine_winner(text), Verdict::First);
    }

    #[test]
    fn test_no_signal_is_tie() {
        assert_eq!(determine_winner("Both are equally good."), Verdict::Tie);
        assert_eq!(
            determine_winner("Hypothesis 1 and hypothesis 2 are comparable."),
            Verdict::Tie
        );
    }

    #[test]
    fn test_extract_scores_formats() {
        let evaluation = "\
Novelty: 8 - new angle
Plausibility - 6
Relevance: 10/10 - on target
Testability: 85 - typo
Potential impact: 7/10
Overall score: 7.75";
        let scores = extract_scores(evaluation);

        assert_eq!(scores.get("novelty"), Some(&8));
        assert_eq!(scores.get("plausibility"), Some(&6));
        assert_eq!(scores.get("relevance"), Some(&10));
        assert_eq!(scores.get("testability"), None);
        assert_eq!(scores.get("potential impact"), Some(&7));
        assert_eq!(mean_score(&scores), 7.75);
    }

    #[test]
    fn test_mean_of_nothing_is_zero() {
        assert_eq!(mean_score(&extract_scores("no numbers here")), 0.0);
    }

    #[tokio::test]
    async fn test_tournament_orders_by_wins() {
        // pairs: (0,1) (0,2) (1,2)
        let client = Arc::new(ScriptedClient::with_replies([
            "Hypothesis 2 is superior.",
            "Hypothesis 2 is superior.",
            "Hypothesis 2 is stronger.",
        ]));
        let agent = RankingAgent::new(Arc::clone(&client), &LlmConfig::default());

        let ranked = agent
            .rank("To test", vec![reviewed("A"), reviewed("B"), reviewed("C")])
            .await
            .unwrap();

        assert_eq!(statements(&ranked), vec!["C", "B", "A"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(
            ranked[0].evidence,
            RankingEvidence::Tournament {
                wins: 2,
                total_comparisons: 2
            }
        );
        assert_eq!(client.calls(), 3);
        for conversation in client.conversations() {
            assert_eq!(conversation.turns(), 1);
        }
    }

    #[tokio::test]
    async fn test_tournament_ties_keep_input_order() {
        let client = Arc::new(ScriptedClient::with_replies(["No preference."]));
        let agent = RankingAgent::new(Arc::clone(&client), &LlmConfig::default());

        let ranked = agent
            .rank("To test", vec![reviewed("A"), reviewed("B")])
            .await
            .unwrap();

        assert_eq!(statements(&ranked), vec!["A", "B"]);
        assert_eq!(ranked[1].rank, 2);
    }

    #[tokio::test]
    async fn test_single_hypothesis_needs_no_comparison() {
        let client = Arc::new(ScriptedClient::default());
        let agent = RankingAgent::new(Arc::clone(&client), &LlmConfig::default());

        let ranked = agent.rank("To test", vec![reviewed("A")]).await.unwrap();

        assert_eq!(ranked.len(), 1);
        assert_eq!(
            ranked[0].evidence,
            RankingEvidence::Tournament {
                wins: 0,
                total_comparisons: 0
            }
        );
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_large_sets_use_scoring() {
        let replies = [
            "Novelty: 3", "Novelty: 9", "Novelty: 5", "Novelty: 9", "nothing", "Novelty: 7",
        ];
        let client = Arc::new(ScriptedClient::with_replies(replies));
        let agent = RankingAgent::new(Arc::clone(&client), &LlmConfig::default());

        let input: Vec<_> = ["A", "B", "C", "D", "E", "F"].into_iter().map(reviewed).collect();
        let ranked = agent.rank("To test", input).await.unwrap();

        assert_eq!(statements(&ranked), vec!["B", "D", "F", "C", "A", "E"]);
        match &ranked[4].evidence {
            RankingEvidence::Scoring { overall_score, .. } => assert_eq!(*overall_score, 3.0),
            other => panic!("unexpected evidence {other:?}"),
        }
        assert_eq!(client.settings()[0].temperature, RANKING_TEMPERATURE);
    }
}
