//! Main sequence - the ordered, capacity-bounded row of on-board tokens
//!
//! Three co-indexed views of the same token set are kept in sync here:
//!
//! - `order`: left-to-right row order (ids into the arena)
//! - `arena`: the tokens themselves, addressed by [`TokenId`]
//! - `rings`: per-color and per-shape membership masks
//!
//! Every mutator updates all three before returning, so
//! `token ∈ order ⇔ token ∈ color ring ⇔ token ∈ shape ring` holds between calls.

use arrayvec::ArrayVec;

use crate::error::EngineError;
use crate::rings::{AttributeRings, SlotMask};
use crate::token::{Token, TokenArena, TokenId};
use crate::types::{Color, Shape, Side, TokenKind, MAX_CAPACITY};

/// A contiguous sub-range of the row: `start..start + len`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Run {
    pub start: usize,
    pub len: usize,
}

impl Run {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Exclusive end index
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.len)
    }

    pub fn overlaps(&self, other: &Run) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

/// The play row
#[derive(Debug)]
pub struct MainSequence {
    capacity: usize,
    order: ArrayVec<TokenId, MAX_CAPACITY>,
    arena: TokenArena,
    rings: AttributeRings,
}

impl MainSequence {
    /// Create an empty row. `capacity` is clamped to `1..=MAX_CAPACITY`.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.clamp(1, MAX_CAPACITY),
            order: ArrayVec::new(),
            arena: TokenArena::new(),
            rings: AttributeRings::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.order.len() >= self.capacity
    }

    /// Prepend a token
    pub fn insert_left(&mut self, token: Token) -> Result<TokenId, EngineError> {
        self.insert(Side::Left, token)
    }

    /// Append a token
    pub fn insert_right(&mut self, token: Token) -> Result<TokenId, EngineError> {
        self.insert(Side::Right, token)
    }

    /// Insert a token at one end of the row.
    ///
    /// A full row rejects the token and hands it back in [`EngineError::BoardFull`].
    pub fn insert(&mut self, side: Side, token: Token) -> Result<TokenId, EngineError> {
        if self.is_full() {
            return Err(EngineError::BoardFull(token));
        }
        let kind = token.kind();
        let id = self.arena.alloc(token).map_err(EngineError::BoardFull)?;
        self.rings.add(id, kind);
        match side {
            Side::Left => self.order.insert(0, id),
            Side::Right => self.order.push(id),
        }
        Ok(id)
    }

    /// Group tokens sharing the pivot's color at the front of the row.
    ///
    /// Stable within both groups; reapplying without a structural change is a no-op.
    pub fn align_by_color(&mut self, pivot: TokenId) -> Result<(), EngineError> {
        let color = self.get(pivot).ok_or(EngineError::InvalidSelection)?.color();
        let mask = self.rings.color(color);
        self.stable_partition(mask);
        tracing::trace!(color = color.as_str(), members = mask.len(), "aligned by color");
        Ok(())
    }

    /// Group tokens sharing the pivot's shape at the front of the row.
    pub fn align_by_shape(&mut self, pivot: TokenId) -> Result<(), EngineError> {
        let shape = self.get(pivot).ok_or(EngineError::InvalidSelection)?.shape();
        let mask = self.rings.shape(shape);
        self.stable_partition(mask);
        tracing::trace!(shape = shape.as_str(), members = mask.len(), "aligned by shape");
        Ok(())
    }

    fn stable_partition(&mut self, members: SlotMask) {
        let mut front: ArrayVec<TokenId, MAX_CAPACITY> = ArrayVec::new();
        let mut back: ArrayVec<TokenId, MAX_CAPACITY> = ArrayVec::new();
        for &id in &self.order {
            if members.contains(id.slot()) {
                front.push(id);
            } else {
                back.push(id);
            }
        }
        self.order.clear();
        self.order.extend(front);
        self.order.extend(back);
    }

    /// Remove a contiguous run, closing the gap.
    ///
    /// Returns the removed tokens in row order. Each one leaves the arena and
    /// both of its rings.
    pub fn remove_run(&mut self, run: Run) -> Result<ArrayVec<Token, MAX_CAPACITY>, EngineError> {
        let end = match run.start.checked_add(run.len) {
            Some(end) if run.len > 0 && end <= self.order.len() => end,
            _ => {
                return Err(EngineError::RunOutOfRange {
                    start: run.start,
                    end: run.end(),
                    len: self.order.len(),
                })
            }
        };

        let mut removed = ArrayVec::new();
        for id in self.order.drain(run.start..end) {
            if let Some(token) = self.arena.release(id) {
                self.rings.remove(id, token.kind());
                removed.push(token);
            }
        }
        Ok(removed)
    }

    /// Id of the token at a row index
    pub fn token_at(&self, index: usize) -> Option<TokenId> {
        self.order.get(index).copied()
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.arena.get(id)
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.arena.contains(id)
    }

    /// Row index of a live token
    pub fn position_of(&self, id: TokenId) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        self.order.iter().position(|&other| other == id)
    }

    /// Token ids in row order
    pub fn ids(&self) -> &[TokenId] {
        &self.order
    }

    /// Token kinds in row order
    pub fn kinds(&self) -> impl Iterator<Item = TokenKind> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.arena.get(id))
            .map(Token::kind)
    }

    pub fn color_ring_len(&self, color: Color) -> usize {
        self.rings.color(color).len()
    }

    pub fn shape_ring_len(&self, shape: Shape) -> usize {
        self.rings.shape(shape).len()
    }

    /// Verify that row order, arena and rings describe the same token set.
    pub fn check_invariants(&self) -> bool {
        let len = self.order.len();
        if len > self.capacity
            || self.arena.len() != len
            || self.rings.color_total() != len
            || self.rings.shape_total() != len
        {
            return false;
        }
        self.order.iter().all(|&id| match self.arena.get(id) {
            Some(token) => {
                self.rings.color(token.color()).contains(id.slot())
                    && self.rings.shape(token.shape()).contains(id.slot())
            }
            None => false,
        })
    }
}

impl Default for MainSequence {
    fn default() -> Self {
        Self::new(MAX_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(serial: u32, color: Color, shape: Shape) -> Token {
        Token::new(serial, TokenKind::new(color, shape))
    }

    fn serials(seq: &MainSequence) -> Vec<u32> {
        seq.ids()
            .iter()
            .map(|&id| seq.get(id).unwrap().serial())
            .collect()
    }

    #[test]
    fn test_insert_left_and_right() {
        let mut seq = MainSequence::default();
        seq.insert_right(token(1, Color::Red, Shape::Circle)).unwrap();
        seq.insert_left(token(2, Color::Blue, Shape::Square)).unwrap();
        seq.insert_right(token(3, Color::Green, Shape::Diamond)).unwrap();

        assert_eq!(serials(&seq), vec![2, 1, 3]);
        assert!(seq.check_invariants());
    }

    #[test]
    fn test_insert_rejects_when_full_and_returns_token() {
        let mut seq = MainSequence::new(2);
        seq.insert_right(token(1, Color::Red, Shape::Circle)).unwrap();
        seq.insert_right(token(2, Color::Red, Shape::Circle)).unwrap();

        let err = seq.insert_left(token(3, Color::Blue, Shape::Circle)).unwrap_err();
        match err {
            EngineError::BoardFull(t) => assert_eq!(t.serial(), 3),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(serials(&seq), vec![1, 2]);
        assert!(seq.check_invariants());
    }

    #[test]
    fn test_capacity_is_clamped() {
        assert_eq!(MainSequence::new(0).capacity(), 1);
        assert_eq!(MainSequence::new(99).capacity(), MAX_CAPACITY);
    }

    #[test]
    fn test_align_by_shape_groups_pivot_shape_first() {
        let mut seq = MainSequence::default();
        seq.insert_right(token(1, Color::Red, Shape::Square)).unwrap();
        seq.insert_right(token(2, Color::Blue, Shape::Circle)).unwrap();
        let pivot = seq.insert_right(token(3, Color::Green, Shape::Circle)).unwrap();
        seq.insert_right(token(4, Color::Red, Shape::Triangle)).unwrap();

        seq.align_by_shape(pivot).unwrap();
        assert_eq!(serials(&seq), vec![2, 3, 1, 4]);
        assert!(seq.check_invariants());
    }

    #[test]
    fn test_align_with_stale_id_is_invalid_selection() {
        let mut seq = MainSequence::default();
        let id = seq.insert_right(token(1, Color::Red, Shape::Square)).unwrap();
        seq.insert_right(token(2, Color::Red, Shape::Circle)).unwrap();
        seq.remove_run(Run::new(0, 1)).unwrap();

        assert_eq!(seq.align_by_color(id), Err(EngineError::InvalidSelection));
        assert_eq!(serials(&seq), vec![2]);
    }

    #[test]
    fn test_remove_run_updates_rings() {
        let mut seq = MainSequence::default();
        for i in 0..5 {
            seq.insert_right(token(i, Color::Yellow, Shape::Triangle)).unwrap();
        }
        let removed = seq.remove_run(Run::new(1, 3)).unwrap();

        assert_eq!(removed.iter().map(Token::serial).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(serials(&seq), vec![0, 4]);
        assert_eq!(seq.color_ring_len(Color::Yellow), 2);
        assert_eq!(seq.shape_ring_len(Shape::Triangle), 2);
        assert!(seq.check_invariants());
    }

    #[test]
    fn test_remove_run_out_of_range() {
        let mut seq = MainSequence::default();
        seq.insert_right(token(1, Color::Red, Shape::Circle)).unwrap();

        assert_eq!(
            seq.remove_run(Run::new(0, 2)).unwrap_err(),
            EngineError::RunOutOfRange {
                start: 0,
                end: 2,
                len: 1
            }
        );
        assert!(seq.remove_run(Run::new(0, 0)).is_err());
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn test_remove_run_with_overflowing_end_is_rejected() {
        let mut seq = MainSequence::default();
        seq.insert_right(token(1, Color::Red, Shape::Circle)).unwrap();

        assert_eq!(
            seq.remove_run(Run::new(usize::MAX, 1)).unwrap_err(),
            EngineError::RunOutOfRange {
                start: usize::MAX,
                end: usize::MAX,
                len: 1
            }
        );
        assert!(!Run::new(usize::MAX, 2).overlaps(&Run::new(0, 1)));
        assert_eq!(serials(&seq), vec![1]);
        assert!(seq.check_invariants());
    }

    #[test]
    fn test_position_of_tracks_reorders() {
        let mut seq = MainSequence::default();
        seq.insert_right(token(1, Color::Blue, Shape::Circle)).unwrap();
        let pivot = seq.insert_right(token(2, Color::Red, Shape::Circle)).unwrap();

        assert_eq!(seq.position_of(pivot), Some(1));
        seq.align_by_color(pivot).unwrap();
        assert_eq!(seq.position_of(pivot), Some(0));
    }

    #[test]
    fn test_run_overlap() {
        assert!(Run::new(0, 3).overlaps(&Run::new(2, 3)));
        assert!(!Run::new(0, 3).overlaps(&Run::new(3, 3)));
        assert_eq!(Run::new(4, 3).end(), 7);
    }
}
