//! Audio device integration using rodio
//!
//! Owns the default output stream and plays one decoded file at a time
//! through a per-track [`Sink`].

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::debug;

use super::PlaybackEngine;
use crate::{PlayerError, Result};

/// Open a file and hand it to rodio's decoder.
///
/// Missing files map to `FileNotFound`, data the decoder rejects maps to
/// `UnsupportedFormat`.
pub fn open_source(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => PlayerError::FileNotFound(path.to_path_buf()),
        _ => PlayerError::Io(e),
    })?;

    Decoder::new(BufReader::new(file)).map_err(|e| PlayerError::UnsupportedFormat {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Playback engine backed by the system's default audio device
pub struct RodioEngine {
    /// Sink for the track currently playing
    session: Option<Sink>,
    handle: OutputStreamHandle,
    /// Must outlive every sink; dropping it closes the device
    _stream: OutputStream,
}

impl RodioEngine {
    /// Open the default output device
    pub fn open_default() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| PlayerError::DeviceUnavailable(e.to_string()))?;
        debug!("Opened default audio output stream");

        Ok(RodioEngine {
            session: None,
            handle,
            _stream: stream,
        })
    }
}

impl PlaybackEngine for RodioEngine {
    fn load_and_play(&mut self, path: &Path) -> Result<()> {
        self.stop();

        let source = open_source(path)?;
        let sink = Sink::try_new(&self.handle)
            .map_err(|e| PlayerError::DeviceUnavailable(format!("Failed to create audio sink: {}", e)))?;
        sink.append(source);
        sink.play();

        self.session = Some(sink);
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.session.as_ref().is_some_and(|sink| !sink.empty())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.session.take() {
            sink.stop();
            debug!("Playback session stopped");
        }
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        self.stop();
        debug!("Releasing audio output stream");
    }
}
