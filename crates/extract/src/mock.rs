//! Scripted reasoning service for tests that must not reach the network.

use anyhow::Result;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::llm::ReasoningService;

/// Replays queued responses in order and records every prompt it receives.
///
/// Once the queue is empty every further call fails, which exercises the
/// soft-failure paths of callers.
#[derive(Default)]
pub struct MockReasoner {
    responses: Mutex<VecDeque<std::result::Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockReasoner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mock = Self::new();
        for response in responses {
            mock.push_ok(response);
        }
        mock
    }

    pub fn push_ok(&self, response: impl Into<String>) {
        self.lock_responses().push_back(Ok(response.into()));
    }

    pub fn push_err(&self, message: impl Into<String>) {
        self.lock_responses().push_back(Err(message.into()));
    }

    pub fn calls(&self) -> usize {
        self.lock_prompts().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.lock_prompts().clone()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<std::result::Result<String, String>>> {
        self.responses.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_prompts(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.prompts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ReasoningService for MockReasoner {
    async fn generate_json(&self, prompt: &str) -> Result<String> {
        self.lock_prompts().push(prompt.to_string());
        match self.lock_responses().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => anyhow::bail!(message),
            None => anyhow::bail!("mock reasoner has no scripted response"),
        }
    }
}
