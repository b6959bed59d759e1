//! Attribute rings - per-color and per-shape membership of on-board tokens
//!
//! Each ring is a bitmask over arena slots. Rings are pure bookkeeping and are
//! only touched by [`MainSequence`](crate::sequence::MainSequence) mutators.

use crate::token::TokenId;
use crate::types::{Color, Shape, TokenKind, COLOR_COUNT, MAX_CAPACITY, SHAPE_COUNT};

const _: () = assert!(MAX_CAPACITY <= u32::BITS as usize);

/// Set of arena slots, one bit per slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SlotMask(u32);

impl SlotMask {
    pub const EMPTY: SlotMask = SlotMask(0);

    #[inline(always)]
    pub fn contains(self, slot: u8) -> bool {
        self.0 & (1u32 << slot) != 0
    }

    #[inline(always)]
    pub fn insert(&mut self, slot: u8) {
        self.0 |= 1u32 << slot;
    }

    #[inline(always)]
    pub fn remove(&mut self, slot: u8) {
        self.0 &= !(1u32 << slot);
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate member slots in ascending order.
    ///
    /// Cost is proportional to the number of members.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let slot = bits.trailing_zeros() as u8;
            bits &= bits - 1;
            Some(slot)
        })
    }
}

/// One ring per color and one per shape
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeRings {
    colors: [SlotMask; COLOR_COUNT],
    shapes: [SlotMask; SHAPE_COUNT],
}

impl AttributeRings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: TokenId, kind: TokenKind) {
        self.colors[kind.color.index()].insert(id.slot());
        self.shapes[kind.shape.index()].insert(id.slot());
    }

    pub fn remove(&mut self, id: TokenId, kind: TokenKind) {
        self.colors[kind.color.index()].remove(id.slot());
        self.shapes[kind.shape.index()].remove(id.slot());
    }

    pub fn color(&self, color: Color) -> SlotMask {
        self.colors[color.index()]
    }

    pub fn shape(&self, shape: Shape) -> SlotMask {
        self.shapes[shape.index()]
    }

    /// Sum of all color ring sizes
    pub fn color_total(&self) -> usize {
        self.colors.iter().map(|m| m.len()).sum()
    }

    /// Sum of all shape ring sizes
    pub fn shape_total(&self) -> usize {
        self.shapes.iter().map(|m| m.len()).sum()
    }
}
