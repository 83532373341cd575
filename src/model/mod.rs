/// Decoded movie model.
pub mod movie;
