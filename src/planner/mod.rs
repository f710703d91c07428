//! Plan generation, enhancement, and activity suggestion flows.
//!
//! The `Planner` owns the completion collaborator and the single-slot
//! debug buffer holding the most recently built user-input block. One
//! instance per app; tests construct their own with a mock provider.

pub mod normalize;
pub mod prompt;
pub mod render;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::completion::{
    ChatMessage, CompletionError, CompletionProvider, ACTIVITY_SUGGESTION, PLAN_ENHANCEMENT,
    PLAN_GENERATION,
};
use crate::types::{EventDraft, StructuredPlan};

pub struct Planner {
    provider: Arc<dyn CompletionProvider>,
    /// Last user-input block sent to the model. Overwritten on every
    /// build, regardless of whether the call afterwards succeeds.
    last_prompt: Mutex<Option<String>>,
}

impl Planner {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            last_prompt: Mutex::new(None),
        }
    }

    /// Build the three-block plan payload for a draft, recording the
    /// user-input block in the debug slot before returning.
    pub fn build_plan_prompt(&self, draft: &EventDraft) -> Vec<ChatMessage> {
        let input_block = prompt::render_draft_block(draft);
        *self.last_prompt.lock() = Some(input_block.clone());
        prompt::assemble_messages(draft, input_block)
    }

    /// Generate a structured plan for a draft.
    ///
    /// A malformed response is not an error: the normalizer always
    /// produces a plan, falling back to its fixed could-not-parse object.
    /// Only transport/credential failures and empty responses propagate.
    pub async fn generate_plan(
        &self,
        draft: &EventDraft,
    ) -> Result<StructuredPlan, CompletionError> {
        let messages = self.build_plan_prompt(draft);
        let text = self.provider.complete(messages, PLAN_GENERATION).await?;
        Ok(normalize::normalize_response(&text))
    }

    /// Rework an existing flattened plan per a free-text request.
    /// Returns the raw response text unmodified; an empty response is a
    /// hard error.
    pub async fn enhance_plan(
        &self,
        plan_text: &str,
        request: &str,
    ) -> Result<String, CompletionError> {
        let content = prompt::build_enhancement_prompt(plan_text, request);
        self.provider
            .complete(vec![ChatMessage::user(content)], PLAN_ENHANCEMENT)
            .await
    }

    /// Suggest activity names for an event type. Degrades to an empty
    /// list on any failure; never errors.
    pub async fn suggest_activities(
        &self,
        event_type: &str,
        attendees: Option<u32>,
        location: Option<&str>,
    ) -> Vec<String> {
        let content = prompt::build_suggestion_prompt(event_type, attendees, location);
        match self
            .provider
            .complete(vec![ChatMessage::user(content)], ACTIVITY_SUGGESTION)
            .await
        {
            Ok(text) => text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect(),
            Err(e) => {
                log::warn!("activity suggestion failed: {}", e);
                Vec::new()
            }
        }
    }

    /// The most recent user-input block built by this planner, for
    /// developer inspection.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().clone()
    }
}
