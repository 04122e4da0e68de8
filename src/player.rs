//! Sequential track playback.
//!
//! [`Player`] walks a [`TrackList`] in order: load a track, poll the engine
//! until it finishes or the wait timeout runs out, then move on. Tracks the
//! backend cannot open are reported and skipped; only engine-level failures
//! and interrupts abort the run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::engine::PlaybackEngine;
use crate::interrupt::InterruptFlag;
use crate::playlist::TrackList;
use crate::{PlayerError, Result};

/// Default delay between two `is_playing` polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Playback tuning
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerConfig {
    /// Longest time to wait for a single track; `None` waits for it to end
    pub wait_timeout: Option<Duration>,
    /// Delay between polls of the engine
    pub poll_interval: Duration,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            wait_timeout: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl PlayerConfig {
    /// Set the per-track wait timeout
    pub fn with_wait_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Set the poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// How a single track ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Played to the end
    Finished,
    /// Stopped after the wait timeout
    TimedOut,
    /// Could not be played
    Skipped {
        /// Human-readable cause
        reason: String,
    },
}

/// Per-run counters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Tracks that played to the end
    pub finished: usize,
    /// Tracks cut short by the wait timeout
    pub timed_out: usize,
    /// Tracks that could not be played, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

impl RunSummary {
    /// Total number of tracks attempted
    pub fn attempted(&self) -> usize {
        self.finished + self.timed_out + self.skipped.len()
    }

    fn record(&mut self, path: &Path, outcome: TrackOutcome) {
        match outcome {
            TrackOutcome::Finished => self.finished += 1,
            TrackOutcome::TimedOut => self.timed_out += 1,
            TrackOutcome::Skipped { reason } => self.skipped.push((path.to_path_buf(), reason)),
        }
    }
}

/// Lifecycle of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    /// Nothing started yet
    Idle,
    /// Playing the track at this index
    PlayingTrack(usize),
    /// All tracks done, releasing the current session
    Draining,
    /// Completed normally
    Terminated,
    /// Stopped by a fatal error or an interrupt
    Aborted,
}

/// Drives a [`PlaybackEngine`] through a [`TrackList`]
pub struct Player<E: PlaybackEngine, C: Clock> {
    engine: E,
    clock: C,
    config: PlayerConfig,
    interrupt: InterruptFlag,
    state: PlayerState,
}

impl<E: PlaybackEngine, C: Clock> Player<E, C> {
    /// Create a player that owns `engine`
    pub fn new(engine: E, clock: C, config: PlayerConfig) -> Self {
        Self {
            engine,
            clock,
            config,
            interrupt: InterruptFlag::new(),
            state: PlayerState::Idle,
        }
    }

    /// Abort the run when `flag` is raised
    pub fn with_interrupt(mut self, flag: InterruptFlag) -> Self {
        self.interrupt = flag;
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Borrow the engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Give the engine back, releasing the player
    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Play every track in order.
    ///
    /// Returns the run summary on completion. Fails with
    /// [`PlayerError::Interrupted`] when the interrupt flag is raised, or with
    /// any non-track error the engine reports.
    pub fn run(&mut self, tracks: &TrackList) -> Result<RunSummary> {
        let total = tracks.len();
        let mut summary = RunSummary::default();

        for (index, path) in tracks.iter().enumerate() {
            if self.interrupt.is_raised() {
                return Err(self.abort(PlayerError::Interrupted));
            }

            self.transition(PlayerState::PlayingTrack(index));
            info!("Playing {}/{}: {}", index + 1, total, display_name(path));

            let outcome = match self.play_track(path) {
                Ok(outcome) => outcome,
                Err(err) => return Err(self.abort(err)),
            };

            match &outcome {
                TrackOutcome::Finished => debug!("Finished {}", path.display()),
                TrackOutcome::TimedOut => info!(
                    "Wait timeout reached, moving on from {}",
                    display_name(path)
                ),
                TrackOutcome::Skipped { reason } => {
                    warn!("Skipping {}: {}", path.display(), reason)
                }
            }
            summary.record(path, outcome);
        }

        self.transition(PlayerState::Draining);
        self.engine.stop();
        self.transition(PlayerState::Terminated);

        info!(
            "Done: {} finished, {} timed out, {} skipped",
            summary.finished,
            summary.timed_out,
            summary.skipped.len()
        );
        Ok(summary)
    }

    /// Load one track and wait for it to end
    fn play_track(&mut self, path: &Path) -> Result<TrackOutcome> {
        match self.engine.load_and_play(path) {
            Ok(()) => {}
            Err(err) if err.is_track_error() => {
                return Ok(TrackOutcome::Skipped {
                    reason: err.track_reason(),
                })
            }
            Err(err) => return Err(err),
        }

        self.wait_for_track()
    }

    /// Poll the engine until the track ends, times out, or is interrupted
    fn wait_for_track(&mut self) -> Result<TrackOutcome> {
        let started = self.clock.now();

        loop {
            if !self.engine.is_playing() {
                return Ok(TrackOutcome::Finished);
            }
            if self.interrupt.is_raised() {
                self.engine.stop();
                return Err(PlayerError::Interrupted);
            }

            let elapsed = self.clock.now().saturating_duration_since(started);
            let pause = match self.config.wait_timeout {
                Some(limit) if elapsed >= limit => {
                    debug!("Timed out after {:.2}s", elapsed.as_secs_f32());
                    self.engine.stop();
                    return Ok(TrackOutcome::TimedOut);
                }
                Some(limit) => self.config.poll_interval.min(limit - elapsed),
                None => self.config.poll_interval,
            };

            self.clock.sleep(pause);
        }
    }

    fn abort(&mut self, err: PlayerError) -> PlayerError {
        self.engine.stop();
        self.transition(PlayerState::Aborted);
        err
    }

    fn transition(&mut self, next: PlayerState) {
        debug!("Player state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
