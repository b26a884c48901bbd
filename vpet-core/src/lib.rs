//! VPet core library
//!
//! This crate provides the core functionality for the VPet desktop virtual
//! pet: the pet state model and mood derivation, save file persistence,
//! interaction memory, application settings, the conversational agent
//! contract, and the single-actor session loop that serializes all state
//! mutation for front-ends.

pub mod chat;
pub mod error;
pub mod memory;
pub mod pet;
pub mod session;
pub mod settings;
pub mod store;

pub use chat::{build_system_prompt, ChatRequest, ChatRole, ChatTurn, Conversation};
pub use error::{Error, Result};
pub use memory::{Interaction, InteractionKind, PetMemory};
pub use pet::{Mood, Pet, PetVariant, SavedPet, Snapshot};
pub use session::{Command, Outcome, Session, SessionHandle, StopReason};
pub use settings::Settings;
pub use store::{SaveDocument, SaveStore};
