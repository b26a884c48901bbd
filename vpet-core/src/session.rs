//! Single-actor session loop.
//!
//! The pet model is not thread-safe and assumes one sequential mutator.
//! `Session` supplies that actor: it owns the pet, its memory, and the save
//! store, applies periodic ticks, and processes interaction commands from a
//! channel. Embedders (the CLI, a windowing front-end) hold a
//! `SessionHandle`, send commands, and receive a post-mutation snapshot in
//! reply, which is the polling contract: the presentation layer re-reads
//! mood after every mutating call it issues.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::chat::{build_system_prompt, ChatRequest, Conversation, DEFAULT_CONTEXT_WINDOW};
use crate::error::{Error, Result};
use crate::memory::{InteractionKind, PetMemory};
use crate::pet::{Pet, Snapshot};
use crate::settings::Settings;
use crate::store::{SaveDocument, SaveStore};

/// Command channel buffer size.
const COMMAND_CHANNEL_SIZE: usize = 32;

/// Commands accepted by the session loop.
#[derive(Debug)]
pub enum Command {
    /// Feed the pet.
    Feed {
        /// Receives the post-mutation snapshot.
        reply: oneshot::Sender<Snapshot>,
    },

    /// Play with the pet.
    Play {
        /// Receives the post-mutation snapshot.
        reply: oneshot::Sender<Snapshot>,
    },

    /// Put the pet to sleep.
    Sleep {
        /// Receives the post-mutation snapshot.
        reply: oneshot::Sender<Snapshot>,
    },

    /// Wake the pet up.
    Wake {
        /// Receives the post-mutation snapshot.
        reply: oneshot::Sender<Snapshot>,
    },

    /// Read the current state without mutating it.
    Status {
        /// Receives the current snapshot.
        reply: oneshot::Sender<Snapshot>,
    },

    /// Say something to the pet.
    Talk {
        /// What the user said.
        text: String,
        /// Receives the request the conversational agent should post.
        reply: oneshot::Sender<ChatRequest>,
    },

    /// Record what the conversational agent answered, so later context
    /// windows include it.
    RecordReply {
        /// The agent's answer.
        text: String,
    },

    /// Save the pet state now.
    Save {
        /// Receives the snapshot, or the save error.
        reply: oneshot::Sender<Result<Snapshot>>,
    },

    /// Save and shut the session down.
    Quit,
}

/// Why the session loop exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A `Quit` command was received.
    Quit,
    /// The handle requested cancellation.
    Cancelled,
    /// Every handle was dropped.
    ChannelClosed,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Quit => write!(f, "quit requested"),
            StopReason::Cancelled => write!(f, "cancelled"),
            StopReason::ChannelClosed => write!(f, "all handles dropped"),
        }
    }
}

/// The result of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// How many ticks were applied.
    pub ticks: u64,
    /// Why the loop exited.
    pub reason: StopReason,
}

/// Handle for driving a running session from another task.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    cancel_flag: Arc<AtomicBool>,
}

impl SessionHandle {
    /// Signal the session to stop at the next tick or command.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }

    async fn round_trip<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .await
            .map_err(|_| Error::SessionClosed)?;
        rx.await.map_err(|_| Error::SessionClosed)
    }

    /// Feed the pet and return the resulting snapshot.
    pub async fn feed(&self) -> Result<Snapshot> {
        self.round_trip(|reply| Command::Feed { reply }).await
    }

    /// Play with the pet and return the resulting snapshot.
    pub async fn play(&self) -> Result<Snapshot> {
        self.round_trip(|reply| Command::Play { reply }).await
    }

    /// Put the pet to sleep and return the resulting snapshot.
    pub async fn sleep(&self) -> Result<Snapshot> {
        self.round_trip(|reply| Command::Sleep { reply }).await
    }

    /// Wake the pet and return the resulting snapshot.
    pub async fn wake(&self) -> Result<Snapshot> {
        self.round_trip(|reply| Command::Wake { reply }).await
    }

    /// Read the current snapshot without mutating anything.
    pub async fn status(&self) -> Result<Snapshot> {
        self.round_trip(|reply| Command::Status { reply }).await
    }

    /// Say something to the pet; returns the request for the
    /// conversational agent.
    pub async fn talk(&self, text: impl Into<String>) -> Result<ChatRequest> {
        let text = text.into();
        self.round_trip(|reply| Command::Talk { text, reply }).await
    }

    /// Record the conversational agent's answer.
    pub async fn record_reply(&self, text: impl Into<String>) -> Result<()> {
        self.commands
            .send(Command::RecordReply { text: text.into() })
            .await
            .map_err(|_| Error::SessionClosed)
    }

    /// Save the pet state now and return the snapshot.
    pub async fn save(&self) -> Result<Snapshot> {
        self.round_trip(|reply| Command::Save { reply }).await?
    }

    /// Ask the session to save and shut down.
    pub async fn quit(&self) -> Result<()> {
        self.commands
            .send(Command::Quit)
            .await
            .map_err(|_| Error::SessionClosed)
    }
}

/// The session actor: owns the pet and serializes all mutation.
#[derive(Debug)]
pub struct Session {
    pet: Pet,
    memory: PetMemory,
    conversation: Conversation,
    settings: Settings,
    store: SaveStore,
    commands: mpsc::Receiver<Command>,
    cancel_flag: Arc<AtomicBool>,
}

impl Session {
    /// Create a session and the handle that drives it.
    pub fn new(
        pet: Pet,
        memory: PetMemory,
        settings: Settings,
        store: SaveStore,
    ) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let cancel_flag = Arc::new(AtomicBool::new(false));

        let session = Self {
            pet,
            memory,
            conversation: Conversation::new(),
            settings,
            store,
            commands: rx,
            cancel_flag: cancel_flag.clone(),
        };

        let handle = SessionHandle {
            commands: tx,
            cancel_flag,
        };

        (session, handle)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&SaveDocument {
            pet: self.pet.to_saved(),
            memory: self.memory.clone(),
        })
    }

    /// Run the session loop until quit, cancellation, or channel close.
    ///
    /// Ticks fire on the configured interval (missed ticks are skipped, not
    /// replayed), commands are applied in arrival order, and the state is
    /// autosaved every `autosave_every_ticks` ticks. A final save happens on
    /// every exit path; only that final save's failure is surfaced as an
    /// error, autosave failures are logged and tolerated.
    pub async fn run(mut self) -> Result<Outcome> {
        // At least 1ms so the interval is never zero-period.
        let period = self.settings.tick_interval().max(Duration::from_millis(1));
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut ticks: u64 = 0;
        let mut ticks_since_save: u32 = 0;

        loop {
            if self.is_cancelled() {
                tracing::info!(ticks, "session cancelled");
                self.persist()?;
                return Ok(Outcome {
                    ticks,
                    reason: StopReason::Cancelled,
                });
            }

            tokio::select! {
                _ = ticker.tick() => {
                    self.pet.tick();
                    ticks += 1;
                    ticks_since_save += 1;
                    tracing::debug!(
                        ticks,
                        hunger = self.pet.hunger(),
                        happiness = self.pet.happiness(),
                        energy = self.pet.energy(),
                        mood = %self.pet.mood(),
                        "tick applied"
                    );

                    if self.settings.autosave_every_ticks > 0
                        && ticks_since_save >= self.settings.autosave_every_ticks
                    {
                        if let Err(e) = self.persist() {
                            tracing::warn!(error = %e, "autosave failed");
                        }
                        ticks_since_save = 0;
                    }
                }
                command = self.commands.recv() => {
                    match command {
                        None => {
                            tracing::info!(ticks, "all session handles dropped");
                            self.persist()?;
                            return Ok(Outcome {
                                ticks,
                                reason: StopReason::ChannelClosed,
                            });
                        }
                        Some(Command::Feed { reply }) => {
                            self.pet.feed();
                            self.memory.record(InteractionKind::Feed, "");
                            let _ = reply.send(self.pet.snapshot());
                        }
                        Some(Command::Play { reply }) => {
                            self.pet.play();
                            self.memory.record(InteractionKind::Play, "");
                            let _ = reply.send(self.pet.snapshot());
                        }
                        Some(Command::Sleep { reply }) => {
                            self.pet.sleep();
                            self.memory.record(InteractionKind::Sleep, "");
                            let _ = reply.send(self.pet.snapshot());
                        }
                        Some(Command::Wake { reply }) => {
                            self.pet.wake_up();
                            self.memory.record(InteractionKind::Wake, "");
                            let _ = reply.send(self.pet.snapshot());
                        }
                        Some(Command::Status { reply }) => {
                            let _ = reply.send(self.pet.snapshot());
                        }
                        Some(Command::Talk { text, reply }) => {
                            self.memory.record(InteractionKind::Talk, text.clone());
                            self.conversation.push_user(text);
                            let prompt = build_system_prompt(
                                self.pet.personality(),
                                &self.pet.snapshot(),
                            );
                            let request =
                                self.conversation.request(&prompt, DEFAULT_CONTEXT_WINDOW);
                            let _ = reply.send(request);
                        }
                        Some(Command::RecordReply { text }) => {
                            self.conversation.push_assistant(text);
                        }
                        Some(Command::Save { reply }) => {
                            let result = self.persist().map(|()| self.pet.snapshot());
                            ticks_since_save = 0;
                            let _ = reply.send(result);
                        }
                        Some(Command::Quit) => {
                            tracing::info!(ticks, "quit requested");
                            self.persist()?;
                            return Ok(Outcome {
                                ticks,
                                reason: StopReason::Quit,
                            });
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::PetVariant;
    use std::path::PathBuf;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "vpet_session_test_{}_{}.json",
            tag,
            std::process::id()
        ))
    }

    fn quiet_settings() -> Settings {
        // One-hour ticks keep simulated time still while commands drive
        // the loop.
        Settings::new()
            .tick_interval_ms(3_600_000)
            .autosave_every_ticks(0)
    }

    #[test]
    fn test_handle_cancel_flag() {
        let store = SaveStore::new(temp_path("cancel_flag"));
        let (_session, handle) = Session::new(
            Pet::new(PetVariant::Cat),
            PetMemory::new(),
            quiet_settings(),
            store,
        );

        assert!(!handle.is_cancelled());
        handle.cancel();
        assert!(handle.is_cancelled());

        let cloned = handle.clone();
        assert!(cloned.is_cancelled());
    }

    #[test]
    fn test_stop_reason_display() {
        assert_eq!(StopReason::Quit.to_string(), "quit requested");
        assert_eq!(StopReason::Cancelled.to_string(), "cancelled");
        assert_eq!(StopReason::ChannelClosed.to_string(), "all handles dropped");
    }

    #[tokio::test]
    async fn test_commands_mutate_and_reply() {
        let path = temp_path("commands");
        let (session, handle) = Session::new(
            Pet::new(PetVariant::Dog),
            PetMemory::new(),
            quiet_settings(),
            SaveStore::new(&path),
        );
        let task = tokio::spawn(session.run());

        let snap = handle.feed().await.expect("feed should reply");
        assert_eq!(snap.hunger, 30.0);
        assert_eq!(snap.happiness, 55.0);

        let snap = handle.play().await.expect("play should reply");
        assert_eq!(snap.happiness, 70.0);
        assert_eq!(snap.energy, 45.0);

        let snap = handle.sleep().await.expect("sleep should reply");
        assert!(snap.sleeping);
        assert_eq!(snap.mood.as_str(), "sleeping");

        let snap = handle.wake().await.expect("wake should reply");
        assert!(!snap.sleeping);

        handle.quit().await.expect("quit should send");
        let outcome = task.await.expect("join").expect("run should succeed");
        assert_eq!(outcome.reason, StopReason::Quit);
        assert_eq!(outcome.ticks, 0);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_quit_persists_state_and_memory() {
        let path = temp_path("quit_saves");
        std::fs::remove_file(&path).ok();
        let store = SaveStore::new(&path);
        let (session, handle) = Session::new(
            Pet::new(PetVariant::Cat),
            PetMemory::new(),
            quiet_settings(),
            store.clone(),
        );
        let task = tokio::spawn(session.run());

        handle.feed().await.expect("feed");
        handle.play().await.expect("play");
        handle.quit().await.expect("quit");
        task.await.expect("join").expect("run");

        let doc = store.load();
        assert_eq!(doc.pet.hunger, 33.0); // 50 - 20 + 3
        assert_eq!(doc.pet.happiness, 70.0); // 50 + 5 + 15
        assert_eq!(doc.memory.count(InteractionKind::Feed), 1);
        assert_eq!(doc.memory.count(InteractionKind::Play), 1);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_talk_builds_request_with_history() {
        let path = temp_path("talk");
        let (session, handle) = Session::new(
            Pet::new(PetVariant::Cat),
            PetMemory::new(),
            quiet_settings(),
            SaveStore::new(&path),
        );
        let task = tokio::spawn(session.run());

        let request = handle.talk("hello!").await.expect("talk should reply");
        assert_eq!(request.messages.len(), 2);
        assert!(request.messages[0].content.contains("lazy cat"));
        assert!(request.messages[0].content.contains("Current pet state:"));
        assert_eq!(request.messages[1].content, "hello!");

        handle.record_reply("*meow*").await.expect("record reply");
        let request = handle.talk("still there?").await.expect("talk again");
        // system + user + assistant + user
        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.messages[2].content, "*meow*");

        handle.quit().await.expect("quit");
        task.await.expect("join").expect("run");
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_cancel_stops_the_loop() {
        let path = temp_path("cancelled");
        let (session, handle) = Session::new(
            Pet::new(PetVariant::Cat),
            PetMemory::new(),
            // Short ticks so the loop top re-checks the flag promptly.
            Settings::new().tick_interval_ms(5).autosave_every_ticks(0),
            SaveStore::new(&path),
        );
        let task = tokio::spawn(session.run());

        handle.cancel();
        let outcome = task.await.expect("join").expect("run");
        assert_eq!(outcome.reason, StopReason::Cancelled);

        // The session is gone, so the handle errors.
        assert!(matches!(handle.status().await, Err(Error::SessionClosed)));

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_dropping_all_handles_ends_the_session() {
        let path = temp_path("dropped");
        let (session, handle) = Session::new(
            Pet::new(PetVariant::Cat),
            PetMemory::new(),
            quiet_settings(),
            SaveStore::new(&path),
        );
        let task = tokio::spawn(session.run());

        drop(handle);
        let outcome = task.await.expect("join").expect("run");
        assert_eq!(outcome.reason, StopReason::ChannelClosed);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_explicit_save_writes_file() {
        let path = temp_path("explicit_save");
        std::fs::remove_file(&path).ok();
        let store = SaveStore::new(&path);
        let (session, handle) = Session::new(
            Pet::new(PetVariant::AnimeGirl),
            PetMemory::new(),
            quiet_settings(),
            store.clone(),
        );
        let task = tokio::spawn(session.run());

        handle.feed().await.expect("feed");
        let snap = handle.save().await.expect("save should succeed");
        assert_eq!(snap.hunger, 30.0);
        assert!(path.exists());
        assert_eq!(store.load().pet.hunger, 30.0);

        handle.quit().await.expect("quit");
        task.await.expect("join").expect("run");
        std::fs::remove_file(&path).ok();
    }
}
