//! Command-line argument parsing for the player.
//!
//! This module handles parsing and validation of CLI arguments including:
//! - Target selection (`--file`, `--dir`, or a bare path)
//! - Wait timeout and poll interval
//! - Conversion into a [`PlaybackRequest`] and [`PlayerConfig`]

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::player::{PlayerConfig, DEFAULT_POLL_INTERVAL};
use crate::playlist::PlaybackRequest;
use crate::{PlayerError, Result};

/// Parsed command-line arguments.
#[derive(Parser, Debug, Default)]
#[command(name = "playmusic")]
#[command(about = "Command-line audio player: plays a file or every audio file in a directory")]
#[command(version)]
#[command(after_help = "Supported formats: mp3, wav, ogg, flac\n\n\
Examples:\n  \
playmusic -f song.mp3\n  \
playmusic -d ~/music --wait-timeout 30\n  \
playmusic ~/music/album")]
pub struct CliArgs {
    /// Single audio file to play
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Directory of audio files to play in name order
    #[arg(short = 'd', long = "dir", value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// File or directory, resolved by what exists on disk
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Also play files in subdirectories
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Seconds to wait for a track before moving on (default: until it ends)
    #[arg(
        long = "wait-timeout",
        visible_alias = "wt",
        value_name = "SECONDS",
        env = "PLAYMUSIC_WAIT_TIMEOUT",
        value_parser = parse_seconds
    )]
    pub wait_timeout: Option<Duration>,

    /// Milliseconds between playback status checks
    #[arg(
        long = "poll-interval-ms",
        value_name = "MS",
        env = "PLAYMUSIC_POLL_INTERVAL_MS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval_ms: Option<u64>,
}

/// Parse a non-negative, possibly fractional, number of seconds
fn parse_seconds(value: &str) -> std::result::Result<Duration, String> {
    let secs: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", value))?;
    Duration::try_from_secs_f64(secs)
        .map_err(|_| format!("'{}' must be a finite, non-negative number of seconds", value))
}

impl CliArgs {
    /// Validate the arguments and split them into a request and a config.
    ///
    /// Exactly one of `--file`, `--dir` or the positional path must be set.
    pub fn into_parts(self) -> Result<(PlaybackRequest, PlayerConfig)> {
        let recursive = self.recursive;
        let request = match (self.file, self.dir, self.path) {
            (Some(file), None, None) => PlaybackRequest::File(file),
            (None, Some(dir), None) => PlaybackRequest::Directory {
                path: dir,
                recursive,
            },
            (None, None, Some(path)) => {
                if path.is_dir() {
                    PlaybackRequest::Directory { path, recursive }
                } else {
                    PlaybackRequest::File(path)
                }
            }
            (None, None, None) => {
                return Err(PlayerError::InvalidArguments(
                    "one of --file, --dir or a path is required".into(),
                ))
            }
            _ => {
                return Err(PlayerError::InvalidArguments(
                    "--file, --dir and a positional path are mutually exclusive".into(),
                ))
            }
        };

        let config = PlayerConfig::default()
            .with_wait_timeout(self.wait_timeout)
            .with_poll_interval(
                self.poll_interval_ms
                    .map(Duration::from_millis)
                    .unwrap_or(DEFAULT_POLL_INTERVAL),
            );

        Ok((request, config))
    }
}
