/// Host-supplied per-sprite overrides.
pub mod dynamic;
/// Canvas-to-viewport fitting.
pub mod layout;
/// Per-sprite render nodes.
pub mod node;
/// Shape nodes built from movie shapes.
pub mod shape;
/// Render tree and matte grouping.
pub mod tree;
