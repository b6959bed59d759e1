//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: the view draws a snapshot into a
//! framebuffer, and the renderer flushes the changed cells to the terminal.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Keep rendering allocation-free once the framebuffer is sized
//! - Report the drawn grid geometry so clicks can be hit-tested

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use three_to_go_core as core;
pub use three_to_go_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{glyph, AnchorY, GameView, Overlay, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
