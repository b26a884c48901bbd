//! Error types for the vpet core library.
//!
//! This module provides a unified error type for all operations in the
//! vpet-core library, including save file persistence, settings handling,
//! variant parsing, and the session command channel.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for vpet-core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read the save file from disk.
    #[error("failed to read save file '{path}': {source}")]
    SaveRead {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse or serialize save file JSON content.
    #[error("failed to parse save file JSON from '{path}': {source}")]
    SaveParse {
        /// The path containing invalid JSON.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write the save file to disk.
    #[error("failed to write save file '{path}': {source}")]
    SaveWrite {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to read the settings file from disk.
    #[error("failed to read settings file '{path}': {source}")]
    SettingsRead {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse or serialize settings JSON content.
    #[error("failed to parse settings JSON from '{path}': {source}")]
    SettingsParse {
        /// The path containing invalid JSON.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write the settings file to disk.
    #[error("failed to write settings file '{path}': {source}")]
    SettingsWrite {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An unrecognized pet variant name was supplied.
    #[error("unknown pet variant '{value}' (expected 'cat', 'dog', or 'anime_girl')")]
    UnknownVariant {
        /// The value that could not be parsed.
        value: String,
    },

    /// The session loop has exited and can no longer accept commands.
    #[error("session closed")]
    SessionClosed,

    /// An error that doesn't fit other categories.
    #[error("{message}")]
    Other {
        /// Description of the error.
        message: String,
    },
}

impl Error {
    /// Create a new `UnknownVariant` error for the given value.
    pub fn unknown_variant(value: impl Into<String>) -> Self {
        Self::UnknownVariant {
            value: value.into(),
        }
    }

    /// Create a new `Other` error with the given message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// A specialized `Result` type for vpet-core operations.
pub type Result<T> = std::result::Result<T, Error>;
