//! VPet CLI - a terminal front-end for the VPet virtual pet.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use vpet_core::{Pet, PetVariant, SaveStore, Session, SessionHandle, Settings, Snapshot};

/// VPet - a virtual pet that lives in your terminal.
///
/// VPet loads the pet from its save file, advances its hunger, happiness,
/// and energy on a fixed tick, and lets you interact with it through simple
/// commands (feed, play, sleep, talk, ...). State is autosaved periodically
/// and on exit.
#[derive(Parser, Debug)]
#[command(name = "vpet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Which pet to run: 'cat', 'dog', or 'anime_girl'.
    ///
    /// Overrides the variant stored in the settings file.
    #[arg(short = 'p', long = "pet", env = "VPET_PET")]
    pub pet: Option<PetVariant>,

    /// Path to the save file holding the pet state and memory.
    #[arg(
        short = 'f',
        long = "save-file",
        default_value = vpet_core::store::DEFAULT_SAVE_FILE,
        env = "VPET_SAVE_FILE"
    )]
    pub save_file: PathBuf,

    /// Path to the settings file.
    #[arg(
        short = 's',
        long = "settings",
        default_value = vpet_core::settings::DEFAULT_SETTINGS_FILE
    )]
    pub settings: PathBuf,

    /// Tick interval in milliseconds.
    ///
    /// Overrides the interval stored in the settings file.
    #[arg(short = 't', long = "tick-interval")]
    pub tick_interval_ms: Option<u64>,

    /// Disable the conversational agent for this run.
    #[arg(long = "no-ai")]
    pub no_ai: bool,

    /// Enable verbose output (debug logs and full chat requests).
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Load settings from disk and apply command-line overrides.
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::load(&self.settings);
        if let Some(variant) = self.pet {
            settings = settings.pet_variant(variant);
        }
        if let Some(ms) = self.tick_interval_ms {
            settings = settings.tick_interval_ms(ms);
        }
        if self.no_ai {
            settings = settings.ai_enabled(false);
        }
        settings
    }
}

fn print_snapshot(name: &str, snapshot: &Snapshot) {
    println!(
        "{name} [{}]  hunger {:>5.1}  happiness {:>5.1}  energy {:>5.1}{}",
        snapshot.mood,
        snapshot.hunger,
        snapshot.happiness,
        snapshot.energy,
        if snapshot.sleeping { "  (zzz)" } else { "" },
    );
}

fn print_help() {
    println!("commands:");
    println!("  feed            give the pet some food");
    println!("  play            play with the pet");
    println!("  sleep           put the pet to sleep");
    println!("  wake            wake the pet up");
    println!("  status          show the pet's current state");
    println!("  talk <message>  say something to the pet");
    println!("  save            save the pet state now");
    println!("  help            show this help");
    println!("  quit            save and exit");
}

async fn talk(
    handle: &SessionHandle,
    settings: &Settings,
    verbose: bool,
    name: &str,
    text: &str,
) -> anyhow::Result<()> {
    if text.is_empty() {
        println!("usage: talk <message>");
        return Ok(());
    }
    if !settings.ai_enabled {
        println!("AI chat is disabled. {name} tilts its head at you silently.");
        return Ok(());
    }

    let request = handle.talk(text).await?;
    println!(
        "(prepared a chat request for the conversational agent: {} messages)",
        request.messages.len()
    );
    if verbose {
        println!("{}", serde_json::to_string_pretty(&request)?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let settings = cli.to_settings();
    let store = SaveStore::new(&cli.save_file);
    let doc = store.load();
    let pet = Pet::from_saved(settings.pet_variant, &doc.pet);
    let name = pet.name();

    println!("{name} is here! Type 'help' for commands.");
    print_snapshot(name, &pet.snapshot());

    let (session, handle) = Session::new(pet, doc.memory, settings.clone(), store);
    let session_task = tokio::spawn(session.run());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            // EOF: treat like quit so the pet is saved.
            handle.quit().await?;
            break;
        };
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "feed" => print_snapshot(name, &handle.feed().await?),
            "play" => {
                let snapshot = handle.play().await?;
                if snapshot.sleeping {
                    println!("{name} is asleep and ignores you.");
                }
                print_snapshot(name, &snapshot);
            }
            "sleep" => print_snapshot(name, &handle.sleep().await?),
            "wake" => print_snapshot(name, &handle.wake().await?),
            "status" => print_snapshot(name, &handle.status().await?),
            "save" => {
                let snapshot = handle.save().await?;
                println!("saved.");
                print_snapshot(name, &snapshot);
            }
            "talk" => talk(&handle, &settings, cli.verbose, name, rest).await?,
            "help" => print_help(),
            "quit" | "exit" => {
                handle.quit().await?;
                break;
            }
            other => println!("unknown command '{other}', type 'help'"),
        }
    }

    let outcome = session_task.await.context("session task panicked")??;
    tracing::info!(ticks = outcome.ticks, reason = %outcome.reason, "session finished");
    println!("Goodbye! ({} ticks, {})", outcome.ticks, outcome.reason);
    Ok(())
}
