//! Track list resolution for file and directory playback.
//!
//! This module provides:
//! - The [`PlaybackRequest`] produced from the command line
//! - Directory scanning with case-insensitive extension filtering
//! - Deterministic, name-sorted [`TrackList`] construction

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::{PlayerError, Result};

/// Supported file extensions (lowercase, without the dot)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac"];

/// What the user asked to play.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaybackRequest {
    /// Play one file
    File(PathBuf),
    /// Play every supported file in a directory
    Directory {
        /// Directory to scan
        path: PathBuf,
        /// Descend into subdirectories
        recursive: bool,
    },
}

/// Check whether a path carries one of the [`SUPPORTED_EXTENSIONS`].
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext_lower = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext_lower.as_str())
        })
        .unwrap_or(false)
}

/// Ordered, immutable list of files to play
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackList {
    tracks: Vec<PathBuf>,
}

impl TrackList {
    /// Resolve a request into the files to play.
    ///
    /// A file request must point at an existing file. A directory request must
    /// point at a readable directory; an empty result is not an error.
    pub fn resolve(request: &PlaybackRequest) -> Result<Self> {
        match request {
            PlaybackRequest::File(path) => {
                if !path.is_file() {
                    return Err(PlayerError::FileNotFound(path.clone()));
                }
                Ok(Self {
                    tracks: vec![path.clone()],
                })
            }
            PlaybackRequest::Directory { path, recursive } => {
                Self::scan_directory(path, *recursive)
            }
        }
    }

    /// Scan a directory for supported files, sorted by path.
    ///
    /// Symlinked directories are not descended, so link cycles cannot repeat
    /// tracks. Symlinked files are kept.
    pub fn scan_directory(path: &Path, recursive: bool) -> Result<Self> {
        fs::read_dir(path).map_err(|_| PlayerError::DirectoryNotFound(path.to_path_buf()))?;

        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut tracks: Vec<PathBuf> = WalkDir::new(path)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!("Skipping unreadable entry: {}", err);
                    None
                }
            })
            .filter(is_track_entry)
            .map(DirEntry::into_path)
            .collect();
        tracks.sort();

        if tracks.is_empty() {
            warn!(
                "No supported audio files found in {} (looked for: {})",
                path.display(),
                SUPPORTED_EXTENSIONS.join(", ")
            );
        } else {
            debug!("Found {} track(s) in {}", tracks.len(), path.display());
        }

        Ok(Self { tracks })
    }

    /// Build a list from already-resolved paths, keeping their order
    pub fn from_paths(tracks: Vec<PathBuf>) -> Self {
        Self { tracks }
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Get number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Iterate over the tracks in play order
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.tracks.iter().map(PathBuf::as_path)
    }

    /// Get the track at `index`
    pub fn get(&self, index: usize) -> Option<&Path> {
        self.tracks.get(index).map(PathBuf::as_path)
    }
}

/// Regular file, or symlink to one, with a supported extension
fn is_track_entry(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    let is_file = file_type.is_file() || (file_type.is_symlink() && entry.path().is_file());
    is_file && is_supported(entry.path())
}
