//! Per-run conversation state and node update merging.

use serde::Serialize;

use crate::types::{ModelMessage, Role, Usage};

/// State owned by one graph run.
///
/// `messages` and `tools_used` only grow; `step_count` counts node visits.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationState {
    pub messages: Vec<ModelMessage>,
    pub thread_id: String,
    pub tools_used: Vec<String>,
    pub step_count: usize,
    #[serde(skip)]
    pub usage: Usage,
}

/// What a node contributes to the state.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub messages: Vec<ModelMessage>,
    pub tools_used: Vec<String>,
    pub usage: Usage,
}

impl ConversationState {
    /// Seed a run with an optional system prompt and the user's message.
    pub fn new(
        thread_id: impl Into<String>,
        system_prompt: Option<&str>,
        user_message: impl Into<String>,
    ) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(prompt) = system_prompt {
            messages.push(ModelMessage::system(prompt));
        }
        messages.push(ModelMessage::user(user_message));
        Self {
            messages,
            thread_id: thread_id.into(),
            tools_used: Vec::new(),
            step_count: 0,
            usage: Usage::default(),
        }
    }

    /// Merge a node's update: concatenate lists, count the visit.
    pub fn apply(&mut self, update: StateUpdate) {
        self.messages.extend(update.messages);
        self.tools_used.extend(update.tools_used);
        self.usage.merge(&update.usage);
        self.step_count += 1;
    }

    pub fn last_message(&self) -> Option<&ModelMessage> {
        self.messages.last()
    }

    /// Text of the final assistant message, empty if there is none.
    pub fn final_response(&self) -> String {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(ModelMessage::text)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_with_user_message() {
        let state = ConversationState::new("t-1", None, "hi");
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].role, Role::User);
        assert_eq!(state.step_count, 0);
    }

    #[test]
    fn system_prompt_precedes_user_message() {
        let state = ConversationState::new("t-1", Some("be brief"), "hi");
        assert_eq!(state.messages[0].role, Role::System);
        assert_eq!(state.messages[1].text(), "hi");
    }

    #[test]
    fn apply_concatenates_and_counts() {
        let mut state = ConversationState::new("t-1", None, "hi");
        state.apply(StateUpdate {
            messages: vec![ModelMessage::assistant("one")],
            tools_used: vec!["search".into()],
            ..Default::default()
        });
        state.apply(StateUpdate {
            messages: vec![ModelMessage::assistant("two")],
            tools_used: vec!["search".into()],
            ..Default::default()
        });
        assert_eq!(state.messages.len(), 3);
        assert_eq!(state.tools_used, ["search", "search"]);
        assert_eq!(state.step_count, 2);
        assert_eq!(state.final_response(), "two");
        assert_eq!(state.thread_id, "t-1");
    }
}
