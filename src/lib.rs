//! Sequential command-line audio player
//!
//! Plays a single audio file, or every supported audio file in a directory,
//! one after another. Decoding and device output are delegated to `rodio`;
//! this crate resolves what to play and drives the backend through each track.
//!
//! # Features
//! - Single-file and directory playback (optionally recursive)
//! - Case-insensitive extension filtering (`mp3`, `wav`, `ogg`, `flac`)
//! - Per-track wait timeout with deterministic, clock-driven polling
//! - Partial-failure tolerance: undecodable tracks are reported and skipped
//! - Interrupt-safe teardown of the output device
//!
//! # Quick start
//! ```no_run
//! use playmusic::{PlaybackRequest, Player, PlayerConfig, SystemClock, TrackList};
//! use std::path::PathBuf;
//!
//! let request = PlaybackRequest::Directory { path: PathBuf::from("music"), recursive: false };
//! let tracks = TrackList::resolve(&request).unwrap();
//! let engine = playmusic::engine::open_default().unwrap();
//! let mut player = Player::new(engine, SystemClock, PlayerConfig::default());
//! let summary = player.run(&tracks).unwrap();
//! println!("{} played, {} skipped", summary.finished, summary.skipped.len());
//! ```

#![warn(missing_docs)]

use std::path::PathBuf;

pub mod args; // Command-line parsing and validation
pub mod clock; // Time source for the poll loop
pub mod engine; // Playback engine adapter
pub mod interrupt; // SIGINT/SIGTERM handling
pub mod player; // Track sequencing
pub mod playlist; // Request resolution and directory scanning

/// Error types for playback operations
#[derive(thiserror::Error, Debug)]
pub enum PlayerError {
    /// Missing, conflicting or malformed command-line arguments
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A requested file does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A requested directory does not exist or cannot be read
    #[error("Directory not found or unreadable: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// The backend cannot decode the file
    #[error("Unsupported format for {}: {reason}", path.display())]
    UnsupportedFormat {
        /// File that failed to decode
        path: PathBuf,
        /// Decoder message
        reason: String,
    },

    /// No audio output device could be opened
    #[error("Audio device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Playback was cancelled by SIGINT/SIGTERM
    #[error("Playback interrupted")]
    Interrupted,

    /// The signal handler could not be registered
    #[error("Failed to install interrupt handler: {0}")]
    InterruptHandler(String),

    /// IO error from the filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlayerError {
    /// Whether this error only affects the current track.
    ///
    /// Track errors are reported and the run moves on to the next file;
    /// everything else aborts the run.
    pub fn is_track_error(&self) -> bool {
        matches!(
            self,
            PlayerError::FileNotFound(_) | PlayerError::UnsupportedFormat { .. } | PlayerError::Io(_)
        )
    }

    /// Cause of a track error without the file path, for per-track reports.
    pub fn track_reason(&self) -> String {
        match self {
            PlayerError::FileNotFound(_) => "file not found".to_string(),
            PlayerError::UnsupportedFormat { reason, .. } => format!("unsupported format ({})", reason),
            PlayerError::Io(err) => err.to_string(),
            other => other.to_string(),
        }
    }

    /// Process exit code for a run that ended with this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            PlayerError::InvalidArguments(_) => 2,
            PlayerError::Interrupted => 130,
            _ => 1,
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlayerError>;

// Public API exports
pub use args::CliArgs;
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{PlaybackEngine, RodioEngine};
pub use player::{Player, PlayerConfig, PlayerState, RunSummary, TrackOutcome};
pub use playlist::{PlaybackRequest, TrackList, SUPPORTED_EXTENSIONS};
