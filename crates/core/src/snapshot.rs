use crate::types::{BoardCell, TokenKind, MAX_CAPACITY, PREVIEW_LEN};

/// Pending selection as seen by renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionSnapshot {
    /// Row index of the selected token
    pub index: usize,
    /// Grid cell the selection was made on
    pub anchor: BoardCell,
}

/// Read-only per-frame view of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    /// Row kinds, left to right; only the first `len` entries are `Some`
    pub row: [Option<TokenKind>; MAX_CAPACITY],
    pub len: usize,
    pub capacity: usize,
    pub selection: Option<SelectionSnapshot>,
    /// Upcoming supply tokens, oldest first
    pub next: [Option<TokenKind>; PREVIEW_LEN],
    pub score: u32,
    pub combo: u32,
    pub elapsed_ms: u32,
    pub duration_ms: u32,
    pub game_over: bool,
    pub episode_id: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.row = [None; MAX_CAPACITY];
        self.len = 0;
        self.capacity = MAX_CAPACITY;
        self.selection = None;
        self.next = [None; PREVIEW_LEN];
        self.score = 0;
        self.combo = 0;
        self.elapsed_ms = 0;
        self.duration_ms = 0;
        self.game_over = false;
        self.episode_id = 0;
    }

    /// Row kinds in order
    pub fn row_kinds(&self) -> impl Iterator<Item = TokenKind> + '_ {
        self.row.iter().take(self.len).flatten().copied()
    }

    pub fn remaining_ms(&self) -> u32 {
        self.duration_ms.saturating_sub(self.elapsed_ms)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            row: [None; MAX_CAPACITY],
            len: 0,
            capacity: MAX_CAPACITY,
            selection: None,
            next: [None; PREVIEW_LEN],
            score: 0,
            combo: 0,
            elapsed_ms: 0,
            duration_ms: 0,
            game_over: false,
            episode_id: 0,
        };
        s.clear();
        s
    }
}
