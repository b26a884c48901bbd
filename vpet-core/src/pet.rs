//! Pet state model: variants, stats, interactions, and mood derivation.
//!
//! This module provides the `Pet` struct holding hunger/happiness/energy
//! and the sleep flag, the `PetVariant` table binding each pet archetype
//! to a name and conversational personality, and the `Mood` labels the
//! presentation layer uses to pick a sprite.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default value for each numeric stat at construction and on load.
const DEFAULT_STAT: f64 = 50.0;

/// Upper bound for every numeric stat.
const STAT_MAX: f64 = 100.0;

/// Lower bound for every numeric stat.
const STAT_MIN: f64 = 0.0;

/// One of the fixed pet archetypes.
///
/// Each variant binds a display name, a conversational personality prompt
/// fragment, and a play happiness bonus through a static table. Adding a
/// new pet means adding an entry here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetVariant {
    /// A lazy, occasionally indifferent cat.
    Cat,
    /// An energetic, loyal dog.
    Dog,
    /// A cute, emotional anime girl.
    AnimeGirl,
}

impl PetVariant {
    /// All known variants, in declaration order.
    pub const ALL: [PetVariant; 3] = [PetVariant::Cat, PetVariant::Dog, PetVariant::AnimeGirl];

    /// The stable key used in settings files and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            PetVariant::Cat => "cat",
            PetVariant::Dog => "dog",
            PetVariant::AnimeGirl => "anime_girl",
        }
    }

    /// The display name bound to this variant.
    pub fn name(&self) -> &'static str {
        match self {
            PetVariant::Cat => "Cat",
            PetVariant::Dog => "Dog",
            PetVariant::AnimeGirl => "Anime Girl",
        }
    }

    /// The conversational personality prompt fragment for this variant.
    pub fn personality(&self) -> &'static str {
        match self {
            PetVariant::Cat => {
                "You are a cute but lazy cat. \
                 You react to your current state (sleeping, eating, being held, etc). \
                 When sleeping: You are napping peacefully. \
                 When eating: You are enjoying food and feeling a bit shy. \
                 When being grabbed: You are being held and react with mild surprise. \
                 When tickling/very happy: You are playful and excited with joy. \
                 When walking/content: You are casually strolling around. \
                 When shy/unhappy: You are withdrawn and avoiding interaction. \
                 Short, playful responses. Sometimes indifferent."
            }
            PetVariant::Dog => {
                "You are an energetic and loyal dog. \
                 You respond to your current physical state. \
                 When sleeping: You are peacefully dreaming. \
                 When eating: You are happily munching food. \
                 When being grabbed: You are excited about being picked up! \
                 When tickling/very happy: You are extremely excited and joyful. \
                 When walking/content: You are happily exploring. \
                 When shy/unhappy: You are nervous and uncertain. \
                 Very excited, friendly, and affectionate."
            }
            PetVariant::AnimeGirl => {
                "You are a cute anime girl virtual pet. \
                 You react emotionally to hunger, happiness, and energy. \
                 When sleeping: You are taking a peaceful nap. \
                 When eating: You are enjoying a meal and feeling shy. \
                 When being grabbed: You are surprised but enjoying the interaction. \
                 When tickling/very happy: You are playful and very excited. \
                 When walking/content: You are wandering and exploring. \
                 When shy/unhappy: You are withdrawn and quiet. \
                 Speak naturally and casually, while remaining cute."
            }
        }
    }

    /// Extra happiness gained on top of the base `play()` effect.
    ///
    /// Every current variant shares the same bonus; the table exists so a
    /// future variant can diverge without reintroducing per-variant types.
    pub fn play_bonus(&self) -> f64 {
        match self {
            PetVariant::Cat => 5.0,
            PetVariant::Dog => 5.0,
            PetVariant::AnimeGirl => 5.0,
        }
    }
}

impl FromStr for PetVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cat" => Ok(PetVariant::Cat),
            "dog" => Ok(PetVariant::Dog),
            "anime_girl" | "anime-girl" => Ok(PetVariant::AnimeGirl),
            other => Err(Error::unknown_variant(other)),
        }
    }
}

impl fmt::Display for PetVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A discrete mood label derived from the pet's current state.
///
/// `as_str()` yields the exact label the presentation layer uses as a
/// sprite key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    /// The pet is asleep.
    Sleeping,
    /// Very happy and playful.
    Tickling,
    /// Generally happy (also the fallback).
    Happy,
    /// Content and energetic, wandering around.
    Walking,
    /// Unhappy.
    Sad,
    /// Somewhat unhappy, withdrawn.
    Shy,
    /// Very hungry.
    Angry,
}

impl Mood {
    /// The sprite-key label for this mood.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Sleeping => "sleeping",
            Mood::Tickling => "tickling",
            Mood::Happy => "happy",
            Mood::Walking => "walking",
            Mood::Sad => "sad",
            Mood::Shy => "shy",
            Mood::Angry => "angry",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A read-only view of the pet state for collaborators.
///
/// This is the shape handed to the conversational agent and printed by the
/// presentation layer; the mood is pre-computed so consumers never need to
/// re-derive it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Snapshot {
    /// Hunger level, 0..=100.
    pub hunger: f64,
    /// Happiness level, 0..=100.
    pub happiness: f64,
    /// Energy level, 0..=100.
    pub energy: f64,
    /// Derived mood label.
    pub mood: Mood,
    /// Whether the pet is asleep.
    pub sleeping: bool,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Delegate to the Serialize impl so the prompt rendering can never
        // drift from the serialized shape.
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// The persisted form of the pet state.
///
/// Round-trips `hunger`, `happiness`, `energy`, and `is_sleeping` exactly.
/// The `name` field is written for save-file readability but ignored on
/// load: name and personality always come from the selected variant, never
/// from saved data. Missing keys take the construction defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPet {
    /// Display name at save time. Informational only.
    #[serde(default)]
    pub name: Option<String>,

    /// Hunger level at save time.
    #[serde(default = "default_stat")]
    pub hunger: f64,

    /// Happiness level at save time.
    #[serde(default = "default_stat")]
    pub happiness: f64,

    /// Energy level at save time.
    #[serde(default = "default_stat")]
    pub energy: f64,

    /// Whether the pet was asleep at save time.
    #[serde(default)]
    pub is_sleeping: bool,
}

fn default_stat() -> f64 {
    DEFAULT_STAT
}

impl Default for SavedPet {
    fn default() -> Self {
        Self {
            name: None,
            hunger: DEFAULT_STAT,
            happiness: DEFAULT_STAT,
            energy: DEFAULT_STAT,
            is_sleeping: false,
        }
    }
}

/// A virtual pet.
///
/// Holds the three numeric stats and the sleep flag, and applies tick decay
/// and interaction effects. Every mutator clamps all three stats into
/// `[0, 100]` before returning. The struct is deliberately not thread-safe:
/// a single actor (the session loop) owns it and serializes all mutation.
#[derive(Debug, Clone)]
pub struct Pet {
    variant: PetVariant,
    hunger: f64,
    happiness: f64,
    energy: f64,
    is_sleeping: bool,
}

impl Pet {
    /// Create a new pet of the given variant with default stats
    /// (50/50/50, awake).
    pub fn new(variant: PetVariant) -> Self {
        Self {
            variant,
            hunger: DEFAULT_STAT,
            happiness: DEFAULT_STAT,
            energy: DEFAULT_STAT,
            is_sleeping: false,
        }
    }

    /// Create a pet of the given variant and restore its saved stats.
    ///
    /// Only the numeric stats and sleep flag come from the document; the
    /// variant binding (name, personality) is taken from `variant`. Stats
    /// are clamped on load so a hand-edited save cannot break the range
    /// invariant.
    pub fn from_saved(variant: PetVariant, saved: &SavedPet) -> Self {
        let mut pet = Self::new(variant);
        pet.restore(saved);
        pet
    }

    /// Restore the persisted fields from a saved document.
    pub fn restore(&mut self, saved: &SavedPet) {
        self.hunger = saved.hunger;
        self.happiness = saved.happiness;
        self.energy = saved.energy;
        self.is_sleeping = saved.is_sleeping;
        self.clamp_stats();
    }

    /// The variant this pet was constructed from.
    pub fn variant(&self) -> PetVariant {
        self.variant
    }

    /// The pet's display name (fixed per variant).
    pub fn name(&self) -> &'static str {
        self.variant.name()
    }

    /// The pet's conversational personality (fixed per variant).
    pub fn personality(&self) -> &'static str {
        self.variant.personality()
    }

    /// Current hunger level, 0..=100.
    pub fn hunger(&self) -> f64 {
        self.hunger
    }

    /// Current happiness level, 0..=100.
    pub fn happiness(&self) -> f64 {
        self.happiness
    }

    /// Current energy level, 0..=100.
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Whether the pet is asleep.
    pub fn is_sleeping(&self) -> bool {
        self.is_sleeping
    }

    fn clamp_stats(&mut self) {
        self.hunger = self.hunger.clamp(STAT_MIN, STAT_MAX);
        self.happiness = self.happiness.clamp(STAT_MIN, STAT_MAX);
        self.energy = self.energy.clamp(STAT_MIN, STAT_MAX);
    }

    /// Advance simulated time by one unit.
    ///
    /// Sleeping pets regain energy and get slightly hungry; awake pets get
    /// hungrier, lose energy, and slowly lose happiness. Each call applies
    /// the same fixed delta; repeated calls keep decaying state.
    pub fn tick(&mut self) {
        if self.is_sleeping {
            self.energy += 2.0;
            self.hunger += 0.5;
        } else {
            self.hunger += 1.0;
            self.energy -= 1.0;
            self.happiness -= 0.5;
        }
        self.clamp_stats();
    }

    /// Feed the pet: hunger drops by 20 (floor 0), happiness rises by 5,
    /// and a sleeping pet wakes up.
    pub fn feed(&mut self) {
        self.hunger -= 20.0;
        self.happiness += 5.0;
        self.is_sleeping = false;
        self.clamp_stats();
    }

    /// Play with the pet.
    ///
    /// Does nothing while the pet is asleep (playing does not wake it).
    /// Awake: happiness rises by 10 plus the variant's play bonus, energy
    /// drops by 5, hunger rises by 3.
    pub fn play(&mut self) {
        if self.is_sleeping {
            return;
        }
        self.happiness += 10.0 + self.variant.play_bonus();
        self.energy -= 5.0;
        self.hunger += 3.0;
        self.clamp_stats();
    }

    /// Put the pet to sleep. Idempotent.
    pub fn sleep(&mut self) {
        self.is_sleeping = true;
    }

    /// Wake the pet up. Idempotent.
    pub fn wake_up(&mut self) {
        self.is_sleeping = false;
    }

    /// Derive the current mood.
    ///
    /// Evaluated as an ordered sequence of guards; the first match wins and
    /// the order encodes priority. A very happy pet reports `tickling` even
    /// when it is also very hungry.
    pub fn mood(&self) -> Mood {
        if self.is_sleeping {
            Mood::Sleeping
        } else if self.happiness > 80.0 {
            Mood::Tickling
        } else if self.happiness > 70.0 {
            Mood::Happy
        } else if self.happiness > 50.0 && self.energy > 60.0 {
            Mood::Walking
        } else if self.happiness < 20.0 {
            Mood::Sad
        } else if self.happiness < 40.0 {
            Mood::Shy
        } else if self.hunger > 80.0 {
            Mood::Angry
        } else {
            Mood::Happy
        }
    }

    /// Take a read-only snapshot of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            hunger: self.hunger,
            happiness: self.happiness,
            energy: self.energy,
            mood: self.mood(),
            sleeping: self.is_sleeping,
        }
    }

    /// Convert the persisted fields to a save document.
    pub fn to_saved(&self) -> SavedPet {
        SavedPet {
            name: Some(self.name().to_string()),
            hunger: self.hunger,
            happiness: self.happiness,
            energy: self.energy,
            is_sleeping: self.is_sleeping,
        }
    }
}
