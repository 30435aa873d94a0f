//! Agent Traits
//!
//! Common traits that all co-scientist agents implement, and the completion
//! capability they compose.

use std::time::Instant;

use async_trait::async_trait;
use thiserror::Error;
use tracing::instrument;

use super::telemetry::AgentTelemetry;
use crate::clients::{CompletionClient, LlmError, ModelSettings};
use crate::contracts::{AgentIdentity, Conversation};

/// Errors from agent execution.
#[derive(Debug, Error)]
pub enum AgentRuntimeError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Completion failed: {0}")]
    Completion(#[from] LlmError),

    #[error("Review of hypothesis {index} failed: {source}")]
    Review {
        index: usize,
        #[source]
        source: LlmError,
    },

    #[error("Refinement of hypothesis {index} failed: {source}")]
    Refinement {
        index: usize,
        #[source]
        source: LlmError,
    },

    #[error("No hypotheses could be parsed from the model output")]
    NoHypotheses,
}

impl From<validator::ValidationErrors> for AgentRuntimeError {
    fn from(err: validator::ValidationErrors) -> Self {
        AgentRuntimeError::Validation(err.to_string())
    }
}

/// Trait for all co-scientist agents.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Input type for this agent
    type Input: Send + Sync;

    /// Output type for this agent
    type Output: Send + Sync;

    /// Get the agent's identity.
    fn identity(&self) -> &AgentIdentity;

    /// Get the agent's version.
    fn version(&self) -> &str {
        &self.identity().version
    }

    /// Get the agent's ID.
    fn agent_id(&self) -> &str {
        &self.identity().id
    }

    /// Validate input before execution.
    fn validate_input(&self, input: &Self::Input) -> Result<(), AgentRuntimeError>;

    /// Execute the agent's core logic.
    async fn execute(&self, input: Self::Input) -> Result<Self::Output, AgentRuntimeError>;

    /// Full invocation cycle: validate, execute, emit telemetry.
    ///
    /// This is the primary entry point for agent invocation.
    async fn invoke(&self, input: Self::Input) -> Result<Self::Output, AgentRuntimeError> {
        let telemetry = AgentTelemetry::new(self.agent_id());
        let start = Instant::now();
        telemetry.execution_started();

        let result = match self.validate_input(&input) {
            Ok(()) => self.execute(input).await,
            Err(e) => Err(e),
        };

        match &result {
            Ok(_) => telemetry.execution_completed(start.elapsed().as_millis() as u64),
            Err(e) => telemetry.execution_failed(&e.to_string()),
        }

        result
    }
}

/// The ability to hold a conversation with a language model.
///
/// Agents compose this rather than inheriting behavior: it owns the client,
/// the agent's system prompt and its model settings. Conversation state is
/// never stored here; each exchange starts from [`start_conversation`] and
/// the caller drops or resets it when the exchange is over.
///
/// [`start_conversation`]: CompletionAgent::start_conversation
#[derive(Clone)]
pub struct CompletionAgent<C> {
    client: C,
    system_prompt: String,
    settings: ModelSettings,
}

impl<C: CompletionClient> CompletionAgent<C> {
    pub fn new(client: C, system_prompt: impl Into<String>, settings: ModelSettings) -> Self {
        Self {
            client,
            system_prompt: system_prompt.into(),
            settings,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    /// A fresh conversation holding only the system prompt.
    pub fn start_conversation(&self) -> Conversation {
        Conversation::new(self.system_prompt.clone())
    }

    /// One request/response turn within `conversation`.
    ///
    /// The prompt and the reply are both appended, so a later turn on the
    /// same conversation sees this one.
    #[instrument(skip_all, fields(model = %self.settings.model, prompt_chars = prompt.len()))]
    pub async fn request(
        &self,
        conversation: &mut Conversation,
        prompt: &str,
    ) -> Result<String, LlmError> {
        conversation.push_user(prompt);
        let reply = self.client.complete(&self.settings, conversation).await?;
        conversation.push_assistant(reply.clone());
        Ok(reply)
    }

    /// Single-turn request on a fresh conversation that is discarded afterwards.
    pub async fn ask(&self, prompt: &str) -> Result<String, LlmError> {
        let mut conversation = self.start_conversation();
        self.request(&mut conversation, prompt).await
    }
}
