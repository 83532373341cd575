//! Container, stream and scene decoding.

pub mod container;
pub mod json;
pub mod proto;
pub mod raster;
pub mod scene;
