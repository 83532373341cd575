//! Audio collaborators driven by frame-boundary cues.

use std::sync::Arc;

/// One loaded audio asset, owned by the player for the lifetime of a movie.
pub trait AudioDevice {
    /// Move the play head to `secs` seconds into the asset.
    fn seek(&mut self, secs: f64);
    /// Start or resume output.
    fn play(&mut self);
    /// Halt output.
    fn stop(&mut self);
}

/// Turns raw audio payloads into playable devices.
pub trait AudioBackend {
    /// Load `bytes` for cue key `key`; `None` when the payload cannot be played.
    fn load(&mut self, key: &str, bytes: Arc<[u8]>) -> Option<Box<dyn AudioDevice>>;
}

/// Backend that plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn load(&mut self, _key: &str, _bytes: Arc<[u8]>) -> Option<Box<dyn AudioDevice>> {
        None
    }
}

/// Backend whose devices only log their transitions.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAudio;

impl AudioBackend for TracingAudio {
    fn load(&mut self, key: &str, bytes: Arc<[u8]>) -> Option<Box<dyn AudioDevice>> {
        tracing::debug!(key, bytes = bytes.len(), "audio loaded");
        Some(Box::new(TracingDevice {
            key: key.to_string(),
            playing: false,
        }))
    }
}

struct TracingDevice {
    key: String,
    playing: bool,
}

impl AudioDevice for TracingDevice {
    fn seek(&mut self, secs: f64) {
        tracing::debug!(key = %self.key, secs, "audio seek");
    }

    fn play(&mut self) {
        self.playing = true;
        tracing::info!(key = %self.key, "audio play");
    }

    fn stop(&mut self) {
        if std::mem::take(&mut self.playing) {
            tracing::info!(key = %self.key, "audio stop");
        }
    }
}
