//! Core game logic - pure, deterministic, and testable
//!
//! Everything that decides what happens in a match lives here. There are no
//! dependencies on terminals or wall clocks: time only moves when the caller
//! passes elapsed milliseconds to [`GameSession::tick`].
//!
//! # Module Structure
//!
//! - [`token`]: tokens and the generational slot arena that owns them
//! - [`rings`]: per-color and per-shape membership masks
//! - [`sequence`]: the bounded play row and its alignment operations
//! - [`supply`]: the endless queue of upcoming tokens
//! - [`rng`]: seeded generator for token kinds
//! - [`resolver`]: run detection and removal
//! - [`scoring`]: run points, combo multiplier and cue selection
//! - [`session`]: score, clock and the click/selection state machine
//! - [`snapshot`]: read-only per-frame view for renderers
//!
//! # Game Rules
//!
//! - **Insertion**: the next supply token goes to the left or right end of the row
//! - **Alignment**: tokens sharing the selected token's color (or shape) are
//!   grouped at the front, keeping their relative order
//! - **Runs**: 3+ contiguous tokens uniform in color or in shape are removed
//!   and score `100 * len^2`
//! - **Combo**: consecutive scoring moves multiply the gain by the combo level
//! - **Clock**: a match lasts two minutes
//!
//! # Example
//!
//! ```
//! use three_to_go_core::GameSession;
//! use three_to_go_types::{GameEvent, Side};
//!
//! let mut session = GameSession::with_seed(12345);
//! session.handle_event(GameEvent::ClickAddButton(Side::Right));
//! session.handle_event(GameEvent::ClickAddButton(Side::Left));
//! assert_eq!(session.sequence().len(), 2);
//!
//! session.tick(33);
//! assert!(!session.is_over());
//! ```

pub mod config;
pub mod error;
pub mod resolver;
pub mod rings;
pub mod rng;
pub mod scoring;
pub mod sequence;
pub mod session;
pub mod snapshot;
pub mod supply;
pub mod token;

pub use three_to_go_types as types;

// Re-export commonly used types for convenience
pub use config::{ScoringConfig, SessionConfig, SupplyConfig};
pub use error::{ConfigError, EngineError};
pub use resolver::{MatchResolver, Resolution, ScoredRun};
pub use rng::SimpleRng;
pub use scoring::{apply_combo, run_points, select_cue, RunAttribute};
pub use sequence::{MainSequence, Run};
pub use session::{GameSession, MoveOutcome, Selection};
pub use snapshot::{GameSnapshot, SelectionSnapshot};
pub use supply::SupplyQueue;
pub use token::{Token, TokenArena, TokenId};
