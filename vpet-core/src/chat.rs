//! Conversational agent contract.
//!
//! The remote chat client itself lives outside this crate; this module owns
//! the data and rules the collaborator must honor: the role-tagged message
//! shape, the rolling conversation history with its context window, and the
//! composition of the system prompt from the pet's personality and a
//! read-only state snapshot.

use crate::pet::Snapshot;
use serde::{Deserialize, Serialize};

/// How many trailing turns of history are included in a request.
pub const DEFAULT_CONTEXT_WINDOW: usize = 8;

/// The role of a chat message, in the wire shape chat-completions
/// endpoints expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions from the application.
    System,
    /// What the user typed.
    User,
    /// What the agent answered.
    Assistant,
}

/// One role-tagged message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who said it.
    pub role: ChatRole,
    /// What was said.
    pub content: String,
}

impl ChatTurn {
    /// Create a system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// The message list a collaborator posts to the remote text-generation
/// service: one system turn followed by the trailing history window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    /// Messages in conversation order, system turn first.
    pub messages: Vec<ChatTurn>,
}

/// Rolling conversation history between the user and the pet.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<ChatTurn>,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user turn.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(ChatTurn::user(content));
    }

    /// Append an assistant turn.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(ChatTurn::assistant(content));
    }

    /// All turns, oldest first.
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Number of recorded turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether no turns have been recorded.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The trailing `window` turns of history.
    pub fn context_window(&self, window: usize) -> &[ChatTurn] {
        let start = self.turns.len().saturating_sub(window);
        &self.turns[start..]
    }

    /// Build the request message list: the system prompt followed by the
    /// trailing `window` turns.
    pub fn request(&self, system_prompt: &str, window: usize) -> ChatRequest {
        let mut messages = Vec::with_capacity(window + 1);
        messages.push(ChatTurn::system(system_prompt));
        messages.extend_from_slice(self.context_window(window));
        ChatRequest { messages }
    }
}

/// Compose the system prompt from the pet's personality and its current
/// state snapshot.
pub fn build_system_prompt(personality: &str, snapshot: &Snapshot) -> String {
    format!("{personality}\nCurrent pet state: {snapshot}")
}
