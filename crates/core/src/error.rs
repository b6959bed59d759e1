use crate::token::Token;

/// Errors returned by row and session mutators.
///
/// None of these are fatal: the state is left exactly as it was before the call.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Insertion attempted on a full row. The rejected token is handed back.
    #[error("board is full")]
    BoardFull(Token),

    #[error("selected token is no longer on the board")]
    InvalidSelection,

    #[error("run {start}..{end} is out of range for a row of {len} tokens")]
    RunOutOfRange { start: usize, end: usize, len: usize },
}

/// Errors raised while validating a session configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config validation error: {0}")]
    Validation(String),
}
