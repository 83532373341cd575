//! Frame-stepping playback state machine.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::decode::raster::RasterImage;
use crate::foundation::core::{Affine, FrameRange, Size};
use crate::foundation::error::{SvgaError, SvgaResult};
use crate::model::movie::{AudioCue, Movie};
use crate::playback::audio::{AudioBackend, AudioDevice, NullAudio};
use crate::playback::clock::{ManualClock, TickSource};
use crate::scene::dynamic::{DrawHook, DynamicOverrides, StyledText};
use crate::scene::layout::{ContentMode, fit_transform};
use crate::scene::tree::SceneTree;

/// Frame held after the loop budget runs out, when the tree is not cleared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FillMode {
    /// Keep whatever the stop left behind.
    #[default]
    None,
    /// Hold the last frame of the range.
    Forward,
    /// Hold the first frame of the range.
    Backward,
}

/// Playback configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerOpts {
    /// Loop budget; `0` loops forever.
    pub loops: u32,
    /// Whether stopping clears the render tree.
    pub clears_after_stop: bool,
    /// Frame held after the loop budget is exhausted.
    pub fill_mode: FillMode,
    /// How the canvas is fitted into the host viewport.
    pub content_mode: ContentMode,
}

impl Default for PlayerOpts {
    fn default() -> Self {
        Self {
            loops: 0,
            clears_after_stop: true,
            fill_mode: FillMode::None,
            content_mode: ContentMode::Top,
        }
    }
}

/// Coarse playback state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayerState {
    /// Nothing scheduled; the tree may still hold a frame.
    #[default]
    Idle,
    /// Tick source attached.
    Playing,
    /// Tick source detached with the last frame retained.
    Paused,
}

/// Progress notifications. Every method defaults to a no-op.
pub trait PlayerDelegate {
    /// A tick stepped the tree to `frame`.
    fn on_frame(&mut self, _frame: usize) {}
    /// Fraction of the movie shown after the same tick, in `(0, 1]`.
    fn on_percentage(&mut self, _percentage: f64) {}
    /// The loop budget ran out.
    fn on_finished(&mut self) {}
}

struct AudioTrack {
    cue: AudioCue,
    device: Box<dyn AudioDevice>,
}

/// Playback session: one movie, one render tree, one tick source.
pub struct Player {
    opts: PlayerOpts,
    clock: Box<dyn TickSource>,
    audio: Box<dyn AudioBackend>,
    delegate: Option<Box<dyn PlayerDelegate>>,
    overrides: DynamicOverrides,
    movie: Option<Arc<Movie>>,
    tree: Option<SceneTree>,
    tracks: Vec<AudioTrack>,
    range: FrameRange,
    reversing: bool,
    current: usize,
    loop_count: u32,
    forward_animating: bool,
    state: PlayerState,
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("opts", &self.opts)
            .field("state", &self.state)
            .field("range", &self.range)
            .field("current", &self.current)
            .field("reversing", &self.reversing)
            .field("loop_count", &self.loop_count)
            .field("tracks", &self.tracks.len())
            .finish()
    }
}

impl Player {
    /// Player driven by `clock`, playing audio through `audio`.
    pub fn new(
        opts: PlayerOpts,
        clock: Box<dyn TickSource>,
        audio: Box<dyn AudioBackend>,
    ) -> Self {
        Self {
            opts,
            clock,
            audio,
            delegate: None,
            overrides: DynamicOverrides::default(),
            movie: None,
            tree: None,
            tracks: Vec::new(),
            range: FrameRange::with_len(0, 0),
            reversing: false,
            current: 0,
            loop_count: 0,
            forward_animating: false,
            state: PlayerState::Idle,
        }
    }

    /// Silent player ticked by hand.
    pub fn headless(opts: PlayerOpts) -> Self {
        Self::new(opts, Box::new(ManualClock::default()), Box::new(NullAudio))
    }

    /// Install the progress delegate.
    pub fn set_delegate(&mut self, delegate: Option<Box<dyn PlayerDelegate>>) {
        self.delegate = delegate;
    }

    /// Attach `movie`, rebuild the tree and show frame 0.
    ///
    /// Any running playback stops. The range resets to the whole movie, forward.
    pub fn set_movie(&mut self, movie: Arc<Movie>) {
        self.stop_with(false);
        self.range = FrameRange::with_len(0, movie.frames);
        self.reversing = false;
        self.current = 0;
        self.loop_count = 0;

        self.tracks.clear();
        for cue in &movie.audio_cues {
            let Some(bytes) = movie.audios.get(&cue.key) else {
                tracing::warn!(key = %cue.key, "audio cue without asset");
                continue;
            };
            if let Some(device) = self.audio.load(&cue.key, Arc::clone(bytes)) {
                self.tracks.push(AudioTrack {
                    cue: cue.clone(),
                    device,
                });
            }
        }

        self.tree = Some(SceneTree::build(Arc::clone(&movie), &self.overrides));
        tracing::debug!(
            frames = movie.frames,
            fps = movie.fps,
            tracks = self.tracks.len(),
            "movie attached"
        );
        self.movie = Some(movie);
        self.update();
    }

    /// Detach the movie and drop its tree.
    pub fn clear_movie(&mut self) {
        self.stop_with(false);
        self.tree = None;
        self.tracks.clear();
        self.movie = None;
        self.range = FrameRange::with_len(0, 0);
        self.current = 0;
    }

    /// Play the active range from the current frame, resetting the loop count.
    pub fn start(&mut self) -> SvgaResult<()> {
        let fps = self.require_movie()?.fps;
        self.stop_with(false);
        self.loop_count = 0;
        self.clock.attach(fps);
        self.forward_animating = !self.reversing;
        self.state = PlayerState::Playing;
        self.update();
        Ok(())
    }

    /// Play `range` in the given direction, starting from its first or last frame.
    ///
    /// The range is clipped to the movie; an empty result is rejected.
    pub fn start_range(&mut self, range: FrameRange, reverse: bool) -> SvgaResult<()> {
        let frames = self.require_movie()?.frames;
        let clipped = range.clip_to(frames);
        let Some(last) = clipped.last() else {
            return Err(SvgaError::validation(format!(
                "range {}..{} is empty for a {frames}-frame movie",
                range.start, range.end
            )));
        };
        tracing::debug!(
            start = clipped.start,
            frames = clipped.len_frames(),
            reverse,
            "playing range"
        );
        self.range = clipped;
        self.reversing = reverse;
        self.current = if reverse { last } else { clipped.start };
        self.start()
    }

    /// Detach the tick source and keep the current frame on screen.
    pub fn pause(&mut self) {
        self.stop_with(false);
        if self.movie.is_some() {
            self.state = PlayerState::Paused;
        }
    }

    /// Stop, clearing the tree when configured to.
    pub fn stop(&mut self) {
        self.stop_with(self.opts.clears_after_stop);
    }

    /// Stop, clearing the tree when `clear` is set, and halt all audio.
    pub fn stop_with(&mut self, clear: bool) {
        self.forward_animating = false;
        self.clock.detach();
        if clear && let Some(tree) = &mut self.tree {
            tree.clear();
        }
        self.stop_audio();
        self.state = PlayerState::Idle;
    }

    /// Pause, show `frame` (clamped to the movie), and optionally resume playing.
    pub fn seek(&mut self, frame: usize, and_play: bool) -> SvgaResult<()> {
        let movie = self.require_movie()?;
        let (frames, fps) = (movie.frames, movie.fps);
        self.pause();
        self.current = frame.min(frames.saturating_sub(1));
        self.update();
        if and_play {
            self.clock.attach(fps);
            self.forward_animating = !self.reversing;
            self.state = PlayerState::Playing;
        }
        Ok(())
    }

    /// Seek to `floor(frames * percentage)`, clamped to the last frame.
    pub fn seek_percentage(&mut self, percentage: f64, and_play: bool) -> SvgaResult<()> {
        let frames = self.require_movie()?.frames;
        let p = if percentage.is_nan() {
            0.0
        } else {
            percentage.clamp(0.0, 1.0)
        };
        let frame = (frames as f64 * p).floor() as usize;
        self.seek(frame, and_play)
    }

    /// Advance one frame; called by the host for every tick while playing.
    pub fn tick(&mut self) {
        if self.state != PlayerState::Playing {
            return;
        }
        let Some(frames) = self.movie.as_ref().map(|m| m.frames) else {
            return;
        };
        let first = self.range.start;
        let last = self.range.end.min(frames).saturating_sub(1);

        if self.reversing {
            if self.current <= first {
                self.current = last;
                self.loop_count += 1;
            } else {
                self.current -= 1;
            }
        } else {
            self.current += 1;
            if self.current >= self.range.end.min(frames) {
                self.current = first;
                self.stop_audio();
                self.loop_count += 1;
            }
        }

        if self.opts.loops > 0 && self.loop_count >= self.opts.loops {
            self.finish(first, last);
            return;
        }

        self.update();
        let current = self.current;
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.on_frame(current);
            if frames > 0 {
                delegate.on_percentage((current + 1) as f64 / frames as f64);
            }
        }
    }

    /// Run every tick the clock reports due at `now`, stopping early once playback ends.
    /// Returns how many ticks ran.
    pub fn advance(&mut self, now: Instant) -> u32 {
        let due = self.clock.due_ticks(now);
        let mut ran = 0;
        while ran < due && self.state == PlayerState::Playing {
            self.tick();
            ran += 1;
        }
        ran
    }

    /// Time until the clock's next tick, when the clock keeps its own schedule.
    pub fn until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.clock.until_next(now)
    }

    fn finish(&mut self, first: usize, last: usize) {
        self.stop();
        if !self.opts.clears_after_stop {
            let hold = match self.opts.fill_mode {
                FillMode::Backward => Some(first),
                FillMode::Forward => Some(last),
                FillMode::None => None,
            };
            if let Some(frame) = hold {
                self.current = frame;
                self.update();
            }
        }
        self.state = PlayerState::Idle;
        tracing::debug!(loops = self.loop_count, frame = self.current, "playback finished");
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.on_finished();
        }
    }

    fn update(&mut self) {
        if let Some(tree) = &mut self.tree {
            tree.step_to_frame(self.current, &mut self.overrides);
        }
        if !self.forward_animating {
            return;
        }
        let current = self.current;
        for track in &mut self.tracks {
            if track.cue.start_frame == current {
                track.device.seek(track.cue.start_time_ms as f64 / 1000.0);
                track.device.play();
            } else if track.cue.end_frame <= current {
                track.device.stop();
            }
        }
    }

    fn stop_audio(&mut self) {
        for track in &mut self.tracks {
            track.device.stop();
        }
    }

    fn require_movie(&self) -> SvgaResult<&Arc<Movie>> {
        self.movie
            .as_ref()
            .ok_or_else(|| SvgaError::validation("no movie attached"))
    }

    /// Replace the raster of sprites keyed `key`.
    pub fn set_image(&mut self, key: impl Into<String>, image: Arc<RasterImage>) {
        self.overrides.set_image(key, image);
        self.refresh_overrides();
    }

    /// Draw `text` over sprites keyed `key`.
    pub fn set_text(&mut self, key: impl Into<String>, text: StyledText) {
        self.overrides.set_text(key, text);
        self.refresh_overrides();
    }

    /// Install or remove a draw hook for sprites keyed `key`.
    pub fn set_draw_hook(&mut self, key: impl Into<String>, hook: Option<DrawHook>) {
        self.overrides.set_draw_hook(key, hook);
    }

    /// Force sprites keyed `key` hidden or release them.
    pub fn set_hidden(&mut self, key: impl Into<String>, hidden: bool) {
        self.overrides.set_hidden(key, hidden);
        self.refresh_overrides();
    }

    /// Remove every dynamic override.
    pub fn clear_dynamic_objects(&mut self) {
        self.overrides.clear();
        self.refresh_overrides();
    }

    fn refresh_overrides(&mut self) {
        if let Some(tree) = &mut self.tree {
            tree.apply_overrides(&self.overrides);
        }
    }

    /// Transform mapping the movie canvas into `viewport` under the configured content mode.
    pub fn root_transform(&self, viewport: Size) -> Affine {
        match &self.movie {
            Some(movie) => fit_transform(movie.canvas, viewport, self.opts.content_mode),
            None => Affine::IDENTITY,
        }
    }

    /// Configuration.
    pub fn opts(&self) -> &PlayerOpts {
        &self.opts
    }

    /// Mutable configuration; takes effect on the next tick.
    pub fn opts_mut(&mut self) -> &mut PlayerOpts {
        &mut self.opts
    }

    /// Current state.
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Current frame.
    pub fn current_frame(&self) -> usize {
        self.current
    }

    /// Completed loops since the last start.
    pub fn loop_count(&self) -> u32 {
        self.loop_count
    }

    /// Active frame range.
    pub fn range(&self) -> FrameRange {
        self.range
    }

    /// Whether playback runs backwards.
    pub fn is_reversing(&self) -> bool {
        self.reversing
    }

    /// Whether the tick source is attached.
    pub fn is_ticking(&self) -> bool {
        self.clock.is_attached()
    }

    /// Attached movie.
    pub fn movie(&self) -> Option<&Arc<Movie>> {
        self.movie.as_ref()
    }

    /// Render tree of the attached movie.
    pub fn tree(&self) -> Option<&SceneTree> {
        self.tree.as_ref()
    }

    /// Dynamic overrides.
    pub fn overrides(&self) -> &DynamicOverrides {
        &self.overrides
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/player.rs"]
mod tests;
