//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` events into logical [`crate::types::GameEvent`]s. Pointer
//! coordinates are resolved against the [`crate::types::BoardLayout`] the
//! renderer produced for the current frame, so the engine never sees raw
//! terminal positions.

pub mod map;

pub use three_to_go_types as types;

pub use map::{handle_key_event, map_mouse, should_quit, KeyCommand};
