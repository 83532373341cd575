//! Acquisition pipeline: identities, disk and memory caches, fetchers and the loader.

pub mod fetch;
pub mod key;
pub mod loader;
pub mod memory;
