/// Audio collaborators.
pub mod audio;
/// Tick sources.
pub mod clock;
/// Playback state machine.
pub mod player;
