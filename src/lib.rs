//! ThreeToGo (workspace facade crate).
//!
//! Re-exports the `three_to_go::{core,input,term,types}` public API while the
//! implementation lives in dedicated crates under `crates/`, and adds the
//! pieces only the binary needs: the TOML config loader, the high-score
//! table and the wall-clock tick source.

pub mod clock;
pub mod config;
pub mod scores;

pub use three_to_go_core as core;
pub use three_to_go_input as input;
pub use three_to_go_term as term;
pub use three_to_go_types as types;
