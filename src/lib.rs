//! SVGA is a loader, cache and playback engine for compressed vector-animation bundles.
//!
//! The crate covers the stateful core of a player:
//!
//! - Resolve a [`Source`] to a decoded [`Movie`] through a [`Loader`] (memory cache, disk cache,
//!   then fetch), coalescing concurrent requests for the same resource
//! - Build a [`SceneTree`] of per-sprite render nodes with matte grouping
//! - Drive the tree frame by frame with a [`Player`]
//!
//! Rasterization, audio output and display timing are host services reached through the
//! [`RasterDecoder`], [`AudioBackend`] and [`TickSource`] traits.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Acquisition pipeline and caches.
pub mod cache;
/// Container, stream and scene decoding.
pub mod decode;
/// Render-tree snapshots.
pub mod export;
/// Decoded movie model.
pub mod model;
/// Path command interpreter.
pub mod path;
/// Playback state machine and its collaborators.
pub mod playback;
/// Render tree built from a movie.
pub mod scene;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, FrameRange, Point, Rect, Rgba, Size, Vec2,
};
pub use crate::foundation::error::{DecodeKind, SvgaError, SvgaResult};

pub use crate::cache::fetch::{Fetch, FetchCallback, OfflineFetcher};
#[cfg(feature = "network")]
pub use crate::cache::fetch::HttpFetcher;
pub use crate::cache::key::{CacheKey, Source};
pub use crate::cache::loader::{LoadResult, Loader, LoaderOpts};
pub use crate::decode::raster::{ImageCrateDecoder, RasterDecoder, RasterImage};
pub use crate::export::{FrameSnapshot, NodeSnapshot, snapshot_frames};
pub use crate::model::movie::{AudioCue, Movie, Shape, ShapeKind, Sprite, SpriteFrame};
pub use crate::playback::audio::{AudioBackend, AudioDevice, NullAudio, TracingAudio};
pub use crate::playback::clock::{FramePacer, ManualClock, TickSource};
pub use crate::playback::player::{FillMode, Player, PlayerDelegate, PlayerOpts, PlayerState};
pub use crate::scene::dynamic::{DrawHook, DynamicOverrides, StyledText};
pub use crate::scene::layout::{ContentMode, fit_transform};
pub use crate::scene::node::SpriteNode;
pub use crate::scene::tree::SceneTree;
