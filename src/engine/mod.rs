//! Playback engine adapter
//!
//! [`PlaybackEngine`] is the only surface the player uses to make sound:
//! load-and-play, poll, stop. The `rodio` implementation lives in
//! [`audio_device`].

use std::path::Path;

use crate::Result;

pub mod audio_device;

pub use audio_device::{open_source, RodioEngine};

/// Minimal control surface over an audio backend.
///
/// Implementations own the output device for their whole lifetime and must
/// release it on drop.
pub trait PlaybackEngine {
    /// Load `path` and start playing it, replacing any current track.
    ///
    /// # Errors
    /// - [`PlayerError::FileNotFound`](crate::PlayerError::FileNotFound) if the file is gone
    /// - [`PlayerError::UnsupportedFormat`](crate::PlayerError::UnsupportedFormat) if it cannot be decoded
    fn load_and_play(&mut self, path: &Path) -> Result<()>;

    /// Whether the current track still has audio queued. Never blocks.
    fn is_playing(&self) -> bool;

    /// Halt playback immediately. Safe to call when nothing is playing.
    fn stop(&mut self);
}

impl<E: PlaybackEngine + ?Sized> PlaybackEngine for Box<E> {
    fn load_and_play(&mut self, path: &Path) -> Result<()> {
        (**self).load_and_play(path)
    }

    fn is_playing(&self) -> bool {
        (**self).is_playing()
    }

    fn stop(&mut self) {
        (**self).stop()
    }
}

/// Open the default output device.
///
/// Fails with [`PlayerError::DeviceUnavailable`](crate::PlayerError::DeviceUnavailable)
/// when no device can be opened.
pub fn open_default() -> Result<Box<dyn PlaybackEngine>> {
    Ok(Box::new(RodioEngine::open_default()?))
}
