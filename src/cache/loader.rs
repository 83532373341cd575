//! Acquisition and cache manager.
//!
//! A [`Loader`] lives on one thread, the main context. It owns the memory cache and the registry
//! of pending callbacks, and it is the only place callbacks run. Fetching, extraction and
//! decoding happen on worker pools that report back over a channel; the owner drains that channel
//! with [`Loader::pump`] (non-blocking, once per host tick) or [`Loader::wait`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crate::cache::fetch::{self, Fetch};
use crate::cache::key::{CacheKey, DiskCache, Location, Source};
use crate::cache::memory::MemoryCache;
use crate::decode::container::{self, BINARY_FILE};
use crate::decode::raster::{ImageCrateDecoder, RasterDecoder};
use crate::decode::scene;
use crate::foundation::error::{SvgaError, SvgaResult};
use crate::model::movie::Movie;

/// Outcome delivered to load callbacks.
pub type LoadResult = SvgaResult<Arc<Movie>>;

/// Callback receiving a load outcome on the loader's thread.
pub type LoadCallback = Box<dyn FnOnce(LoadResult) + 'static>;

#[derive(Clone, Debug)]
/// Loader configuration.
pub struct LoaderOpts {
    /// Root of the per-identity cache directories.
    pub cache_root: PathBuf,
    /// Store decoded movies in memory.
    pub memory_cache: bool,
    /// Answer requests from memory when possible.
    pub load_from_memory: bool,
    /// Nominal number of movies kept in memory.
    pub memory_capacity: usize,
    /// Worker threads in the decode pool.
    pub decode_threads: usize,
    /// Search root for [`Source::Named`] without an explicit root.
    pub resource_root: PathBuf,
    /// Network request timeout.
    pub request_timeout: Duration,
}

impl Default for LoaderOpts {
    fn default() -> Self {
        Self {
            cache_root: std::env::temp_dir().join("svga"),
            memory_cache: true,
            load_from_memory: true,
            memory_capacity: 32,
            decode_threads: 8,
            resource_root: PathBuf::from("."),
            request_timeout: Duration::from_secs(20),
        }
    }
}

struct Completion {
    key: CacheKey,
    result: LoadResult,
}

struct Pending {
    started: Instant,
    waiters: Vec<LoadCallback>,
}

/// Off-context half of the loader: pools, disk layout and the completion channel.
struct Workers {
    disk: DiskCache,
    raster: Arc<dyn RasterDecoder>,
    decode_pool: rayon::ThreadPool,
    extract_pool: rayon::ThreadPool,
    tx: Sender<Completion>,
}

impl Workers {
    fn decode_cached(self: &Arc<Self>, key: CacheKey) {
        let this = Arc::clone(self);
        self.decode_pool.spawn(move || {
            let dir = this.disk.dir(&key);
            let result = scene::decode_dir(&dir, this.raster.as_ref());
            this.complete(key, result);
        });
    }

    fn read_file(self: &Arc<Self>, key: CacheKey, path: PathBuf) {
        let this = Arc::clone(self);
        self.decode_pool.spawn(move || match std::fs::read(&path) {
            Ok(bytes) => this.ingest(key, bytes),
            Err(e) => {
                let err = if e.kind() == std::io::ErrorKind::NotFound {
                    SvgaError::not_found(path.display().to_string())
                } else {
                    SvgaError::io(format!("read '{}'", path.display()), e)
                };
                this.complete(key, Err(err));
            }
        });
    }

    /// Route fetched bytes: archives go through the extraction pool, streams decode directly.
    fn ingest(self: &Arc<Self>, key: CacheKey, bytes: Vec<u8>) {
        if container::is_zip(&bytes) {
            let this = Arc::clone(self);
            self.extract_pool.spawn(move || {
                let dir = this.disk.dir(&key);
                match container::extract_zip(&bytes, &dir) {
                    Ok(()) => this.decode_cached(key),
                    Err(e) => this.complete(key, Err(e)),
                }
            });
            return;
        }

        let result = self.disk.ensure_dir(&key).and_then(|dir| {
            let path = dir.join(BINARY_FILE);
            std::fs::write(&path, &bytes)
                .map_err(|e| SvgaError::io(format!("write '{}'", path.display()), e))?;
            scene::decode_stream(&bytes, Some(dir.as_path()), self.raster.as_ref())
        });
        self.complete(key, result);
    }

    fn complete(&self, key: CacheKey, result: SvgaResult<Movie>) {
        if result.is_err()
            && let Err(e) = self.disk.purge(&key)
        {
            tracing::warn!(key = %key, error = %e, "failed to purge cache directory");
        }
        // The receiver only disappears with the loader, and then nobody is waiting.
        let _ = self.tx.send(Completion {
            key,
            result: result.map(Arc::new),
        });
    }
}

struct LoaderState {
    opts: LoaderOpts,
    memory: MemoryCache,
    pending: HashMap<CacheKey, Pending>,
    fetcher: Box<dyn Fetch>,
}

/// Resolves [`Source`]s to shared [`Movie`]s through memory, disk and fetch, coalescing
/// concurrent requests for the same identity.
pub struct Loader {
    state: RefCell<LoaderState>,
    workers: Arc<Workers>,
    rx: Receiver<Completion>,
}

fn build_thread_pool(threads: usize, name: &'static str) -> SvgaResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(SvgaError::validation(format!(
            "{name} pool must have at least one thread"
        )));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(move |i| format!("svga-{name}-{i}"))
        .build()
        .map_err(|e| SvgaError::validation(format!("failed to build {name} thread pool: {e}")))
}

impl Loader {
    /// Loader with the default fetcher and raster decoder for this build.
    pub fn new(opts: LoaderOpts) -> SvgaResult<Self> {
        let fetcher = fetch::default_fetcher(opts.request_timeout)?;
        Self::with_collaborators(opts, fetcher, Arc::new(ImageCrateDecoder))
    }

    /// Loader with caller-provided fetcher and raster decoder.
    pub fn with_collaborators(
        opts: LoaderOpts,
        fetcher: Box<dyn Fetch>,
        raster: Arc<dyn RasterDecoder>,
    ) -> SvgaResult<Self> {
        let (tx, rx) = mpsc::channel();
        let workers = Workers {
            disk: DiskCache::new(opts.cache_root.clone()),
            raster,
            decode_pool: build_thread_pool(opts.decode_threads, "decode")?,
            extract_pool: build_thread_pool(1, "extract")?,
            tx,
        };
        Ok(Self {
            state: RefCell::new(LoaderState {
                memory: MemoryCache::new(opts.memory_capacity),
                opts,
                pending: HashMap::new(),
                fetcher,
            }),
            workers: Arc::new(workers),
            rx,
        })
    }

    /// Options in effect.
    pub fn opts(&self) -> LoaderOpts {
        self.state.borrow().opts.clone()
    }

    /// Identity hash naming `source`'s cache entry and directory.
    pub fn cache_key(&self, source: &Source) -> SvgaResult<CacheKey> {
        let state = self.state.borrow();
        let location = source.locate(&state.opts.resource_root)?;
        Ok(CacheKey::for_identity(&location.identity()))
    }

    /// Cache directory for `source`. It may not exist yet.
    pub fn cache_dir(&self, source: &Source) -> SvgaResult<PathBuf> {
        Ok(self.workers.disk.dir(&self.cache_key(source)?))
    }

    /// Request `source`; `done` fires exactly once on this thread.
    ///
    /// A memory hit and an immediately detectable failure (bad source, missing local file) call
    /// `done` before this returns. Anything else is delivered by [`pump`](Self::pump) or
    /// [`wait`](Self::wait) once workers finish; concurrent requests for the same identity share
    /// one fetch and decode.
    pub fn load(&self, source: &Source, done: impl FnOnce(LoadResult) + 'static) {
        let mut state = self.state.borrow_mut();
        let location = match source.locate(&state.opts.resource_root) {
            Ok(l) => l,
            Err(e) => {
                drop(state);
                done(Err(e));
                return;
            }
        };
        let key = CacheKey::for_identity(&location.identity());

        if state.opts.memory_cache
            && state.opts.load_from_memory
            && let Some(movie) = state.memory.get(&key)
        {
            drop(state);
            tracing::debug!(key = %key, source = %source, "memory hit");
            done(Ok(movie));
            return;
        }

        if let Some(pending) = state.pending.get_mut(&key) {
            tracing::debug!(key = %key, waiters = pending.waiters.len() + 1, "joining pending load");
            pending.waiters.push(Box::new(done));
            return;
        }

        let on_disk = container::has_document(&self.workers.disk.dir(&key));
        if !on_disk
            && let Location::File(path) = &location
            && !path.is_file()
        {
            drop(state);
            done(Err(SvgaError::not_found(path.display().to_string())));
            return;
        }

        state.pending.insert(
            key.clone(),
            Pending {
                started: Instant::now(),
                waiters: vec![Box::new(done)],
            },
        );

        if on_disk {
            tracing::debug!(key = %key, source = %source, "disk hit");
            self.workers.decode_cached(key);
            return;
        }

        match location {
            Location::File(path) => {
                tracing::debug!(key = %key, path = %path.display(), "reading local bundle");
                self.workers.read_file(key, path);
            }
            Location::Remote(url) => {
                tracing::debug!(key = %key, url = %url, "fetching");
                let workers = Arc::clone(&self.workers);
                state.fetcher.fetch(
                    &url,
                    Box::new(move |fetched| {
                        let pool_workers = Arc::clone(&workers);
                        workers.decode_pool.spawn(move || match fetched {
                            Ok(bytes) => pool_workers.ingest(key, bytes),
                            Err(e) => pool_workers.complete(key, Err(e)),
                        });
                    }),
                );
            }
        }
    }

    /// Load `source` and block until it resolves or `timeout` elapses.
    ///
    /// Other completions arriving meanwhile are delivered as usual.
    pub fn load_blocking(&self, source: &Source, timeout: Duration) -> LoadResult {
        let slot: std::rc::Rc<RefCell<Option<LoadResult>>> = Default::default();
        let sink = std::rc::Rc::clone(&slot);
        self.load(source, move |r| *sink.borrow_mut() = Some(r));

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(result) = slot.borrow_mut().take() {
                return result;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !self.recv_one(remaining) {
                return Err(SvgaError::Io(format!(
                    "timed out after {timeout:?} loading '{source}'"
                )));
            }
        }
    }

    /// Deliver every completion that has arrived, without blocking. Returns how many identities
    /// resolved.
    pub fn pump(&self) -> usize {
        let mut n = 0;
        while let Ok(completion) = self.rx.try_recv() {
            self.deliver(completion);
            n += 1;
        }
        n
    }

    /// Deliver completions until nothing is pending or `timeout` elapses. Returns whether the
    /// registry drained.
    pub fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.pump();
            if self.pending_count() == 0 {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !self.recv_one(remaining) {
                return self.pending_count() == 0;
            }
        }
    }

    fn recv_one(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => {
                self.deliver(completion);
                true
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => false,
        }
    }

    fn deliver(&self, completion: Completion) {
        let Completion { key, result } = completion;
        let pending = {
            let mut state = self.state.borrow_mut();
            if let Ok(movie) = &result
                && state.opts.memory_cache
            {
                state.memory.insert(key.clone(), Arc::clone(movie));
            }
            state.pending.remove(&key)
        };
        let Some(pending) = pending else {
            return;
        };

        let elapsed_ms = pending.started.elapsed().as_millis() as u64;
        match &result {
            Ok(movie) => tracing::info!(
                key = %key,
                elapsed_ms,
                sprites = movie.sprites.len(),
                frames = movie.frames,
                callers = pending.waiters.len(),
                "movie loaded"
            ),
            Err(e) => tracing::warn!(
                key = %key,
                elapsed_ms,
                error = %e,
                callers = pending.waiters.len(),
                "movie load failed"
            ),
        }

        for waiter in pending.waiters {
            waiter(result.clone());
        }
    }

    /// Number of identities with a load in flight.
    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Whether a load for `source` is in flight.
    pub fn is_pending(&self, source: &Source) -> bool {
        self.cache_key(source)
            .is_ok_and(|key| self.state.borrow().pending.contains_key(&key))
    }

    /// Number of movies held in memory.
    pub fn memory_len(&self) -> usize {
        self.state.borrow().memory.len()
    }

    /// Whether `source` is held in memory.
    pub fn is_cached(&self, source: &Source) -> bool {
        self.cache_key(source)
            .is_ok_and(|key| self.state.borrow().memory.contains(&key))
    }

    /// Drop `source` from memory. Sessions holding it keep their `Arc`.
    pub fn evict(&self, source: &Source) -> bool {
        match self.cache_key(source) {
            Ok(key) => self.state.borrow_mut().memory.remove(&key).is_some(),
            Err(_) => false,
        }
    }

    /// Drop every movie from memory.
    pub fn clear_memory(&self) {
        self.state.borrow_mut().memory.clear();
    }

    /// Drop every movie no session retains. Returns how many were dropped.
    pub fn sweep(&self) -> usize {
        let dropped = self.state.borrow_mut().memory.sweep();
        tracing::debug!(dropped, "swept memory cache");
        dropped
    }

    /// Remove `source`'s cache directory. Refused while a load for it is in flight.
    pub fn clear_disk(&self, source: &Source) -> SvgaResult<()> {
        let key = self.cache_key(source)?;
        if self.state.borrow().pending.contains_key(&key) {
            return Err(SvgaError::validation(format!(
                "cannot clear '{source}' while it is loading"
            )));
        }
        self.workers.disk.purge(&key)
    }

    /// Root of the on-disk cache.
    pub fn cache_root(&self) -> &Path {
        self.workers.disk.root()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/loader.rs"]
mod tests;
