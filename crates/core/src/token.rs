//! Token module - attributed game pieces and the slot arena that owns on-board tokens
//!
//! A [`Token`] is deliberately neither `Clone` nor `Copy`: it is moved from the
//! supply into the row and dropped when a run removes it, so it can never be
//! owned by two containers at once.
//!
//! On-board tokens live in a [`TokenArena`] of `MAX_CAPACITY` slots. A
//! [`TokenId`] pairs the slot index with the slot's generation; releasing a slot
//! bumps its generation, so ids held after removal never resolve to the token
//! that later reuses the slot.

use arrayvec::ArrayVec;

use crate::types::{Color, Shape, TokenKind, MAX_CAPACITY};

/// A game piece with fixed color and shape
#[derive(Debug, PartialEq, Eq)]
pub struct Token {
    serial: u32,
    kind: TokenKind,
}

impl Token {
    /// Create a token. `serial` is a diagnostic sequence number assigned by the supply.
    pub fn new(serial: u32, kind: TokenKind) -> Self {
        Self { serial, kind }
    }

    pub fn serial(&self) -> u32 {
        self.serial
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.kind.color
    }

    pub fn shape(&self) -> Shape {
        self.kind.shape
    }
}

/// Stable identity of an on-board token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId {
    slot: u8,
    generation: u32,
}

impl TokenId {
    /// Arena slot index in `0..MAX_CAPACITY`
    pub fn slot(&self) -> u8 {
        self.slot
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    token: Option<Token>,
}

/// Fixed-size arena of on-board tokens with slot reuse
#[derive(Debug)]
pub struct TokenArena {
    slots: [Slot; MAX_CAPACITY],
    /// Retired slots, popped from the back
    free: ArrayVec<u8, MAX_CAPACITY>,
}

impl TokenArena {
    pub fn new() -> Self {
        let mut free = ArrayVec::new();
        // Reverse order so slot 0 is handed out first.
        for slot in (0..MAX_CAPACITY as u8).rev() {
            free.push(slot);
        }
        Self {
            slots: std::array::from_fn(|_| Slot::default()),
            free,
        }
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        MAX_CAPACITY - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take ownership of a token, returning its id.
    ///
    /// Hands the token back when every slot is occupied.
    pub fn alloc(&mut self, token: Token) -> Result<TokenId, Token> {
        let Some(slot) = self.free.pop() else {
            return Err(token);
        };
        let entry = &mut self.slots[slot as usize];
        entry.token = Some(token);
        Ok(TokenId {
            slot,
            generation: entry.generation,
        })
    }

    /// Release a token and retire its slot. Returns `None` for stale ids.
    pub fn release(&mut self, id: TokenId) -> Option<Token> {
        let entry = self.slots.get_mut(id.slot as usize)?;
        if entry.generation != id.generation {
            return None;
        }
        let token = entry.token.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.slot);
        Some(token)
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        let entry = self.slots.get(id.slot as usize)?;
        if entry.generation != id.generation {
            return None;
        }
        entry.token.as_ref()
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.get(id).is_some()
    }
}

impl Default for TokenArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_circle(serial: u32) -> Token {
        Token::new(serial, TokenKind::new(Color::Red, Shape::Circle))
    }

    #[test]
    fn test_alloc_hands_out_slot_zero_first() {
        let mut arena = TokenArena::new();
        let id = arena.alloc(red_circle(1)).unwrap();
        assert_eq!(id.slot(), 0);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.get(id).map(Token::serial), Some(1));
    }

    #[test]
    fn test_alloc_fails_when_full() {
        let mut arena = TokenArena::new();
        for i in 0..MAX_CAPACITY as u32 {
            assert!(arena.alloc(red_circle(i)).is_ok());
        }
        let rejected = arena.alloc(red_circle(99)).unwrap_err();
        assert_eq!(rejected.serial(), 99);
        assert_eq!(arena.len(), MAX_CAPACITY);
    }

    #[test]
    fn test_release_invalidates_old_id() {
        let mut arena = TokenArena::new();
        let old = arena.alloc(red_circle(1)).unwrap();
        assert_eq!(arena.release(old).map(|t| t.serial()), Some(1));
        assert!(!arena.contains(old));

        // Slot is reused with a new generation.
        let new = arena.alloc(red_circle(2)).unwrap();
        assert_eq!(new.slot(), old.slot());
        assert_ne!(new.generation(), old.generation());
        assert!(arena.get(old).is_none());
        assert!(arena.release(old).is_none());
        assert_eq!(arena.get(new).map(Token::serial), Some(2));
    }

    #[test]
    fn test_token_attributes() {
        let token = Token::new(7, TokenKind::new(Color::Blue, Shape::Diamond));
        assert_eq!(token.color(), Color::Blue);
        assert_eq!(token.shape(), Shape::Diamond);
        assert_eq!(token.kind(), TokenKind::new(Color::Blue, Shape::Diamond));
    }
}
