//! Pet memory: interaction tracking and preferences.
//!
//! Every user interaction (feeding, playing, talking, ...) is recorded with
//! a timestamp so the pet "remembers" how it has been treated across runs.
//! The memory round-trips through the save document alongside the pet state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The kind of a recorded interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// The pet was fed.
    Feed,
    /// The user played with the pet.
    Play,
    /// The pet was put to sleep.
    Sleep,
    /// The pet was woken up.
    Wake,
    /// The user talked to the pet.
    Talk,
}

impl InteractionKind {
    /// The stable string form used in save files and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Feed => "feed",
            InteractionKind::Play => "play",
            InteractionKind::Sleep => "sleep",
            InteractionKind::Wake => "wake",
            InteractionKind::Talk => "talk",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// What happened.
    pub kind: InteractionKind,

    /// Optional free-text detail (e.g. what the user said).
    #[serde(default)]
    pub details: String,

    /// When it happened.
    pub timestamp: DateTime<Utc>,
}

/// Interaction history and preferences for one pet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PetMemory {
    #[serde(default)]
    interactions: Vec<Interaction>,

    #[serde(default)]
    preferences: BTreeMap<String, serde_json::Value>,

    #[serde(default)]
    last_interaction: Option<DateTime<Utc>>,
}

impl PetMemory {
    /// Create an empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an interaction at the current time.
    pub fn record(&mut self, kind: InteractionKind, details: impl Into<String>) {
        let now = Utc::now();
        self.interactions.push(Interaction {
            kind,
            details: details.into(),
            timestamp: now,
        });
        self.last_interaction = Some(now);
    }

    /// Count recorded interactions of a specific kind.
    pub fn count(&self, kind: InteractionKind) -> usize {
        self.interactions.iter().filter(|i| i.kind == kind).count()
    }

    /// Total number of recorded interactions.
    pub fn total(&self) -> usize {
        self.interactions.len()
    }

    /// All recorded interactions, oldest first.
    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// When the most recent interaction happened, if any.
    pub fn last_interaction(&self) -> Option<DateTime<Utc>> {
        self.last_interaction
    }

    /// Set a free-form preference.
    pub fn set_preference(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.preferences.insert(key.into(), value.into());
    }

    /// Look up a preference by key.
    pub fn preference(&self, key: &str) -> Option<&serde_json::Value> {
        self.preferences.get(key)
    }
}
