//! Supply queue - the endless source of tokens for insertion
//!
//! Backed by a small buffer that is refilled synchronously whenever it drops
//! below the low-water mark, so a dequeue never observes an empty queue.

use std::collections::VecDeque;

use crate::config::SupplyConfig;
use crate::rng::SimpleRng;
use crate::token::Token;
use crate::types::{TokenKind, PREVIEW_LEN};

#[derive(Debug)]
pub struct SupplyQueue {
    pending: VecDeque<Token>,
    rng: SimpleRng,
    config: SupplyConfig,
    next_serial: u32,
}

impl SupplyQueue {
    /// Create a queue filled with random tokens
    pub fn new(seed: u32, config: SupplyConfig) -> Self {
        Self::with_pending(std::iter::empty(), seed, config)
    }

    /// Create a queue whose first tokens are `kinds`, in order.
    ///
    /// Random tokens follow once the given prefix is consumed.
    pub fn with_pending(
        kinds: impl IntoIterator<Item = TokenKind>,
        seed: u32,
        config: SupplyConfig,
    ) -> Self {
        let low_water = config.low_water.max(1);
        let config = SupplyConfig {
            low_water,
            refill_to: config.refill_to.max(low_water),
        };
        let mut queue = Self {
            pending: VecDeque::with_capacity(config.refill_to + 1),
            rng: SimpleRng::new(seed),
            config,
            next_serial: 0,
        };
        for kind in kinds {
            let token = queue.mint(kind);
            queue.pending.push_back(token);
        }
        queue.refill();
        queue
    }

    /// Remove and return the oldest pending token. Never fails.
    pub fn dequeue_front(&mut self) -> Token {
        let token = match self.pending.pop_front() {
            Some(token) => token,
            None => self.generate(),
        };
        if self.pending.len() < self.config.low_water {
            self.refill();
        }
        token
    }

    /// Put a token back at the head of the queue.
    pub(crate) fn restore_front(&mut self, token: Token) {
        self.pending.push_front(token);
    }

    /// Kinds of the next `n` pending tokens, oldest first
    pub fn peek(&self, n: usize) -> impl Iterator<Item = TokenKind> + '_ {
        self.pending.iter().take(n).map(Token::kind)
    }

    /// Fixed-size preview for renderers
    pub fn preview(&self) -> [Option<TokenKind>; PREVIEW_LEN] {
        let mut out = [None; PREVIEW_LEN];
        for (slot, kind) in out.iter_mut().zip(self.peek(PREVIEW_LEN)) {
            *slot = Some(kind);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn config(&self) -> SupplyConfig {
        self.config
    }

    /// Current RNG state (for restarting with a continued stream)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }

    fn refill(&mut self) {
        let before = self.pending.len();
        while self.pending.len() < self.config.refill_to {
            let token = self.generate();
            self.pending.push_back(token);
        }
        tracing::trace!(
            generated = self.pending.len() - before,
            pending = self.pending.len(),
            "supply refilled"
        );
    }

    fn generate(&mut self) -> Token {
        let kind = self.rng.next_kind();
        self.mint(kind)
    }

    fn mint(&mut self, kind: TokenKind) -> Token {
        let serial = self.next_serial;
        self.next_serial = self.next_serial.wrapping_add(1);
        Token::new(serial, kind)
    }
}

impl Default for SupplyQueue {
    fn default() -> Self {
        Self::new(1, SupplyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, Shape};

    #[test]
    fn test_new_queue_is_filled() {
        let queue = SupplyQueue::default();
        assert_eq!(queue.len(), SupplyConfig::default().refill_to);
    }

    #[test]
    fn test_refills_below_low_water() {
        let config = SupplyConfig {
            low_water: 3,
            refill_to: 6,
        };
        let mut queue = SupplyQueue::new(9, config);
        assert_eq!(queue.len(), 6);

        queue.dequeue_front();
        queue.dequeue_front();
        queue.dequeue_front();
        assert_eq!(queue.len(), 3);

        // Dropping to 2 (< 3) triggers a refill back to 6.
        queue.dequeue_front();
        assert_eq!(queue.len(), 6);
    }

    #[test]
    fn test_pending_prefix_comes_first() {
        let red = TokenKind::new(Color::Red, Shape::Circle);
        let blue = TokenKind::new(Color::Blue, Shape::Square);
        let mut queue = SupplyQueue::with_pending([red, blue], 1, SupplyConfig::default());

        assert_eq!(queue.peek(2).collect::<Vec<_>>(), vec![red, blue]);
        assert_eq!(queue.dequeue_front().kind(), red);
        assert_eq!(queue.dequeue_front().kind(), blue);
    }

    #[test]
    fn test_serials_are_monotonic() {
        let mut queue = SupplyQueue::default();
        let a = queue.dequeue_front().serial();
        let b = queue.dequeue_front().serial();
        assert!(b > a);
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = SupplyQueue::new(77, SupplyConfig::default());
        let mut b = SupplyQueue::new(77, SupplyConfig::default());
        for _ in 0..50 {
            assert_eq!(a.dequeue_front().kind(), b.dequeue_front().kind());
        }
    }

    #[test]
    fn test_restore_front() {
        let mut queue = SupplyQueue::default();
        let first = queue.dequeue_front();
        let kind = first.kind();
        queue.restore_front(first);
        assert_eq!(queue.peek(1).next(), Some(kind));
    }

    #[test]
    fn test_preview_matches_peek() {
        let queue = SupplyQueue::new(5, SupplyConfig::default());
        let preview = queue.preview();
        let peeked: Vec<_> = queue.peek(PREVIEW_LEN).map(Some).collect();
        assert_eq!(preview.to_vec(), peeked);
    }
}
