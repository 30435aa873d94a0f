//! Generation Agent Implementation
//!
//! Proposes the initial hypotheses for a research goal with a single
//! completion, then parses the labelled reply into [`HypothesisRecord`]s.
//!
//! ## Reply format
//!
//! The parser is line-oriented and tolerant of list and heading markup:
//!
//! ```text
//! 1. **Hypothesis 1:** Soil pH changes microbial diversity
//!    Rationale: ...
//!    Evidence: ...
//! ```
//!
//! - `Hypothesis` or `Statement` labels start a new record (a `Statement`
//!   right after an empty `Hypothesis N:` heading fills that record instead)
//! - `Rationale`, `Evidence`, `Assumptions`, `Validation` or `Testing` labels
//!   select the field that following text goes to
//! - unlabelled lines continue the current field
//!
//! Records without a statement are dropped.

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use super::prompts::{generation_prompt, GENERATION_SYSTEM_PROMPT};
use super::traits::{Agent, AgentRuntimeError, CompletionAgent};
use crate::clients::{CompletionClient, LlmConfig, ModelSettings};
use crate::contracts::{AgentClassification, AgentIdentity, GenerationInput, HypothesisRecord};

/// Agent version (semantic versioning).
pub const GENERATION_AGENT_VERSION: &str = "1.0.0";

/// Agent identifier.
pub const GENERATION_AGENT_ID: &str = "generation-agent-v1";

/// Higher temperature for diverse ideation.
pub const GENERATION_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Statement,
    Rationale,
    Evidence,
    Assumptions,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Start,
    Field(Field),
}

fn classify_label(raw: &str) -> Option<(Label, bool)> {
    let label = raw
        .trim()
        .trim_matches('*')
        .trim_end_matches(|c: char| c.is_ascii_digit() || c.is_whitespace() || c == '#')
        .to_lowercase();

    // second element: whether this is a `Statement` label
    match label.as_str() {
        "hypothesis" => Some((Label::Start, false)),
        "statement" => Some((Label::Start, true)),
        "rationale" => Some((Label::Field(Field::Rationale), false)),
        "evidence" | "references" => Some((Label::Field(Field::Evidence), false)),
        "assumptions" | "assumption" => Some((Label::Field(Field::Assumptions), false)),
        l if l == "validation" || l.starts_with("validation ") || l == "testing" || l.starts_with("testing ") => {
            Some((Label::Field(Field::Validation), false))
        }
        _ => None,
    }
}

/// Strip leading heading, quote, bullet and `N.`/`N)` list markers.
fn strip_markers(line: &str) -> &str {
    let mut rest = line.trim();
    loop {
        let before = rest.len();
        rest = rest
            .trim_start_matches(|c: char| matches!(c, '#' | '*' | '-' | '>' | '•'))
            .trim_start();

        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits > 0 {
            let after = &rest[digits..];
            if after.starts_with(". ") || after.starts_with(") ") {
                rest = after[1..].trim_start();
            }
        }

        if rest.len() == before {
            return rest;
        }
    }
}

fn split_label(line: &str) -> Option<(Label, bool, &str)> {
    let stripped = strip_markers(line);
    let colon = stripped.find(':')?;
    let (label, is_statement) = classify_label(&stripped[..colon])?;
    let value = stripped[colon + 1..].trim().trim_matches('*').trim();
    Some((label, is_statement, value))
}

fn field_mut(record: &mut HypothesisRecord, field: Field) -> &mut String {
    match field {
        Field::Statement => &mut record.statement,
        Field::Rationale => &mut record.rationale,
        Field::Evidence => &mut record.evidence,
        Field::Assumptions => &mut record.assumptions,
        Field::Validation => &mut record.validation,
    }
}

fn append(target: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

/// Parse a labelled generation reply into hypothesis records, in order.
pub fn parse_hypotheses(reply: &str) -> Vec<HypothesisRecord> {
    let mut records: Vec<HypothesisRecord> = Vec::new();
    let mut current: Option<HypothesisRecord> = None;
    let mut field = Field::Statement;

    for line in reply.lines() {
        if line.trim().is_empty() {
            continue;
        }

        match split_label(line) {
            Some((Label::Start, is_statement, value)) => {
                let fills_heading = is_statement
                    && current.as_ref().is_some_and(|r| r.statement.is_empty());
                if !fills_heading {
                    if let Some(done) = current.take() {
                        records.push(done);
                    }
                }
                let record = current.get_or_insert_with(HypothesisRecord::default);
                field = Field::Statement;
                append(&mut record.statement, value);
            }
            Some((Label::Field(selected), _, value)) => {
                if let Some(record) = current.as_mut() {
                    field = selected;
                    append(field_mut(record, field), value);
                }
            }
            None => {
                if let Some(record) = current.as_mut() {
                    append(field_mut(record, field), line.trim());
                }
            }
        }
    }
    records.extend(current);

    records.retain(|r| !r.statement.trim().is_empty());
    records
}

/// Hypothesis generation agent.
pub struct GenerationAgent<C> {
    identity: AgentIdentity,
    completion: CompletionAgent<C>,
}

impl<C: CompletionClient> GenerationAgent<C> {
    pub fn new(client: C, config: &LlmConfig) -> Self {
        Self::with_settings(client, ModelSettings::from_config(config, GENERATION_TEMPERATURE))
    }

    pub fn with_settings(client: C, settings: ModelSettings) -> Self {
        Self {
            identity: AgentIdentity {
                id: GENERATION_AGENT_ID.to_string(),
                version: GENERATION_AGENT_VERSION.to_string(),
                classification: AgentClassification::HypothesisGeneration,
                description: "Proposes initial hypotheses for a research goal".to_string(),
            },
            completion: CompletionAgent::new(client, GENERATION_SYSTEM_PROMPT, settings),
        }
    }

    /// Generate up to `count` hypotheses.
    #[instrument(skip(self, research_goal))]
    pub async fn generate(
        &self,
        research_goal: &str,
        count: usize,
    ) -> Result<Vec<HypothesisRecord>, AgentRuntimeError> {
        info!("Generating hypotheses");
        let reply = self
            .completion
            .ask(&generation_prompt(research_goal, count))
            .await?;

        let mut hypotheses = parse_hypotheses(&reply);
        if hypotheses.is_empty() {
            warn!(reply_chars = reply.len(), "No hypotheses found in generation reply");
            return Err(AgentRuntimeError::NoHypotheses);
        }
        if hypotheses.len() > count {
            debug!(parsed = hypotheses.len(), "Dropping hypotheses beyond requested count");
            hypotheses.truncate(count);
        }

        Ok(hypotheses)
    }
}

#[async_trait]
impl<C: CompletionClient> Agent for GenerationAgent<C> {
    type Input = GenerationInput;
    type Output = Vec<HypothesisRecord>;

    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    fn validate_input(&self, input: &Self::Input) -> Result<(), AgentRuntimeError> {
        input.validate()?;
        if input.research_goal.trim().is_empty() {
            return Err(AgentRuntimeError::Validation(
                "research_goal must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    async fn execute(&self, input: Self::Input) -> Result<Self::Output, AgentRuntimeError> {
        self.generate(&input.research_goal, input.count).await
    }
}
