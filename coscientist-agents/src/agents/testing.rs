//! Scripted completion client for agent unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::clients::{CompletionClient, LlmError, ModelSettings};
use crate::contracts::Conversation;

/// Replays queued replies in order and records every conversation it sees.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    seen: Mutex<Vec<(ModelSettings, Conversation)>>,
}

impl ScriptedClient {
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let client = Self::default();
        for reply in replies {
            client.push_reply(reply);
        }
        client
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(reply.into()));
    }

    pub fn push_error(&self, error: LlmError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn conversations(&self) -> Vec<Conversation> {
        self.seen.lock().unwrap().iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn settings(&self) -> Vec<ModelSettings> {
        self.seen.lock().unwrap().iter().map(|(s, _)| s.clone()).collect()
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(
        &self,
        settings: &ModelSettings,
        conversation: &Conversation,
    ) -> Result<String, LlmError> {
        self.seen
            .lock()
            .unwrap()
            .push((settings.clone(), conversation.clone()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::MalformedResponse("script exhausted".to_string())))
    }
}
