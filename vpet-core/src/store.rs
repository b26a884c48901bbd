//! Save file persistence.
//!
//! The save file is a single JSON document with a `"pet"` key holding the
//! serialized pet state and a `"memory"` key holding the interaction
//! history. Loading is total: a missing or malformed file yields an
//! all-defaults document rather than an error, so the caller always gets a
//! usable state. Writing surfaces real I/O failures.

use crate::error::{Error, Result};
use crate::memory::PetMemory;
use crate::pet::SavedPet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default save file name.
pub const DEFAULT_SAVE_FILE: &str = "vpet_save.json";

/// The persisted document.
///
/// Unknown top-level keys in an existing file are tolerated and dropped on
/// the next save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveDocument {
    /// The serialized pet state.
    #[serde(default)]
    pub pet: SavedPet,

    /// The interaction memory.
    #[serde(default)]
    pub memory: PetMemory,
}

/// Reads and writes the save document at a fixed path.
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    /// Create a store for the given save file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the save document.
    ///
    /// Never fails: a missing file is normal on first run and yields the
    /// default document; an unreadable or malformed file is logged and also
    /// yields the default document.
    pub fn load(&self) -> SaveDocument {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no save file, starting fresh");
            return SaveDocument::default();
        }

        match self.read_document() {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load save file, using defaults");
                SaveDocument::default()
            }
        }
    }

    fn read_document(&self) -> Result<SaveDocument> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| Error::SaveRead {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| Error::SaveParse {
            path: self.path.clone(),
            source,
        })
    }

    /// Write the save document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized or the file
    /// cannot be written.
    pub fn save(&self, doc: &SaveDocument) -> Result<()> {
        let content = serde_json::to_string_pretty(doc).map_err(|source| Error::SaveParse {
            path: self.path.clone(),
            source,
        })?;

        std::fs::write(&self.path, content).map_err(|source| Error::SaveWrite {
            path: self.path.clone(),
            source,
        })
    }
}
