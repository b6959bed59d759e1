//! Game session - score, combo, clock and the click/selection state machine
//!
//! The session exclusively owns the row, the supply and the resolver. Input
//! arrives as logical [`GameEvent`]s; every committed insertion or alignment is
//! followed by exactly one resolution pass.
//!
//! # Selection state machine
//!
//! | State | Event | Effect |
//! |-------|-------|--------|
//! | Idle | `ClickAddButton(side)` | insert at `side`, resolve, stay Idle |
//! | Idle | `ClickToken(i)` | select token `i` (if present) |
//! | Pending | direction cell above anchor | align by color, resolve, Idle |
//! | Pending | direction cell below anchor | align by shape, resolve, Idle |
//! | Pending | anything else | cancel, Idle |

use arrayvec::ArrayVec;
use tracing::debug;

use crate::config::SessionConfig;
use crate::error::{ConfigError, EngineError};
use crate::resolver::{MatchResolver, ScoredRun};
use crate::scoring::{apply_combo, select_cue};
use crate::sequence::MainSequence;
use crate::snapshot::{GameSnapshot, SelectionSnapshot};
use crate::supply::SupplyQueue;
use crate::token::TokenId;
use crate::types::{BoardCell, Cue, GameEvent, Side, MAX_CAPACITY};

/// Click/selection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    /// A token was clicked; waiting for the direction click
    PendingDirection { token: TokenId, anchor: BoardCell },
}

/// What a committed move produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Sum of run points before the combo multiplier
    pub gained: u32,
    /// Points actually added to the score
    pub final_gain: u32,
    /// Combo level after this move
    pub combo: u32,
    pub cue: Cue,
    pub runs: ArrayVec<ScoredRun, MAX_CAPACITY>,
}

impl MoveOutcome {
    pub fn scored(&self) -> bool {
        self.gained > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alignment {
    Color,
    Shape,
}

/// One match
#[derive(Debug)]
pub struct GameSession {
    config: SessionConfig,
    sequence: MainSequence,
    supply: SupplyQueue,
    resolver: MatchResolver,
    selection: Selection,
    score: u32,
    combo: u32,
    elapsed_ms: u32,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    /// Committed moves this episode.
    moves: u32,
    /// Last non-silent cue (consumed by observers).
    last_cue: Option<Cue>,
}

impl GameSession {
    /// Create a session from a validated configuration
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let supply = SupplyQueue::new(config.seed, config.supply);
        Ok(Self::assemble(config, supply))
    }

    /// Default rules with the given RNG seed
    pub fn with_seed(seed: u32) -> Self {
        let config = SessionConfig::with_seed(seed);
        let supply = SupplyQueue::new(seed, config.supply);
        Self::assemble(config, supply)
    }

    /// Create a session drawing from a prepared supply
    pub fn with_supply(config: SessionConfig, supply: SupplyQueue) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config, supply))
    }

    fn assemble(config: SessionConfig, supply: SupplyQueue) -> Self {
        Self {
            sequence: MainSequence::new(config.capacity),
            resolver: MatchResolver::new(config.scoring),
            supply,
            config,
            selection: Selection::Idle,
            score: 0,
            combo: 0,
            elapsed_ms: 0,
            episode_id: 0,
            moves: 0,
            last_cue: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn sequence(&self) -> &MainSequence {
        &self.sequence
    }

    pub fn supply(&self) -> &SupplyQueue {
        &self.supply
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    pub fn remaining_ms(&self) -> u32 {
        self.config.duration_ms.saturating_sub(self.elapsed_ms)
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_over(&self) -> bool {
        self.elapsed_ms >= self.config.duration_ms
    }

    /// Final score, once the clock has run out
    pub fn final_score(&self) -> Option<u32> {
        self.is_over().then_some(self.score)
    }

    /// Take the last emitted cue, if any
    pub fn take_last_cue(&mut self) -> Option<Cue> {
        self.last_cue.take()
    }

    /// Advance the match clock.
    ///
    /// Returns `true` on the tick that runs the clock out.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.is_over() {
            return false;
        }
        self.elapsed_ms = self
            .elapsed_ms
            .saturating_add(elapsed_ms)
            .min(self.config.duration_ms);
        if self.is_over() {
            self.selection = Selection::Idle;
            debug!(score = self.score, moves = self.moves, "time up");
            return true;
        }
        false
    }

    /// Start a fresh match, continuing the supply RNG stream
    pub fn restart(&mut self) {
        let seed = self.supply.seed();
        let episode_id = self.episode_id.wrapping_add(1);
        let supply = SupplyQueue::new(seed, self.config.supply);
        *self = Self::assemble(self.config.clone(), supply);
        self.episode_id = episode_id;
        debug!(episode_id, "session restarted");
    }

    /// Feed one logical input event through the state machine.
    ///
    /// Returns the outcome when the event committed a move.
    pub fn handle_event(&mut self, event: GameEvent) -> Option<MoveOutcome> {
        if self.is_over() {
            debug!(?event, "event ignored after time up");
            return None;
        }
        self.revalidate_selection();

        match self.selection {
            Selection::Idle => self.handle_idle(event),
            Selection::PendingDirection { token, anchor } => {
                self.selection = Selection::Idle;
                self.handle_direction(token, anchor, event)
            }
        }
    }

    fn handle_idle(&mut self, event: GameEvent) -> Option<MoveOutcome> {
        match event {
            GameEvent::ClickAddButton(side) => self.insert(side),
            GameEvent::ClickToken(index) => {
                if let Some(token) = self.sequence.token_at(index) {
                    self.selection = Selection::PendingDirection {
                        token,
                        anchor: BoardCell::of_index(index),
                    };
                    debug!(index, "token selected");
                }
                None
            }
            GameEvent::ClickDirectionCell(_) => None,
        }
    }

    fn handle_direction(
        &mut self,
        token: TokenId,
        anchor: BoardCell,
        event: GameEvent,
    ) -> Option<MoveOutcome> {
        let target = match event {
            GameEvent::ClickDirectionCell(cell) => Some(cell),
            GameEvent::ClickToken(index) => Some(BoardCell::of_index(index)),
            GameEvent::ClickAddButton(_) => None,
        };
        let alignment = match target {
            Some(cell) if cell == anchor.above() => Alignment::Color,
            Some(cell) if cell == anchor.below() => Alignment::Shape,
            _ => {
                debug!(?event, "selection cancelled");
                return None;
            }
        };
        self.align(token, alignment)
    }

    /// Insert the next supply token at one end and resolve.
    ///
    /// A full row rejects the insertion: nothing changes and `None` is returned.
    /// Any pending selection is cancelled first.
    pub fn insert(&mut self, side: Side) -> Option<MoveOutcome> {
        if !self.begin_move() {
            return None;
        }
        if self.sequence.is_full() {
            debug!(?side, len = self.sequence.len(), "insertion rejected: board full");
            return None;
        }
        let token = self.supply.dequeue_front();
        match self.sequence.insert(side, token) {
            Ok(_) => Some(self.resolve_move()),
            Err(EngineError::BoardFull(token)) => {
                self.supply.restore_front(token);
                debug!(?side, "insertion rejected: board full");
                None
            }
            Err(err) => {
                debug!(%err, "insertion rejected");
                None
            }
        }
    }

    /// Group tokens sharing the pivot's color, then resolve.
    ///
    /// Any pending selection is cancelled first.
    pub fn align_by_color(&mut self, pivot: TokenId) -> Option<MoveOutcome> {
        self.align(pivot, Alignment::Color)
    }

    /// Group tokens sharing the pivot's shape, then resolve.
    pub fn align_by_shape(&mut self, pivot: TokenId) -> Option<MoveOutcome> {
        self.align(pivot, Alignment::Shape)
    }

    fn align(&mut self, pivot: TokenId, alignment: Alignment) -> Option<MoveOutcome> {
        if !self.begin_move() {
            return None;
        }
        let result = match alignment {
            Alignment::Color => self.sequence.align_by_color(pivot),
            Alignment::Shape => self.sequence.align_by_shape(pivot),
        };
        match result {
            Ok(()) => Some(self.resolve_move()),
            Err(err) => {
                debug!(%err, ?alignment, "alignment rejected");
                None
            }
        }
    }

    /// Clear the selection before the row changes. False once time is up.
    fn begin_move(&mut self) -> bool {
        if self.is_over() {
            return false;
        }
        if self.selection != Selection::Idle {
            debug!("selection cancelled by direct move");
            self.selection = Selection::Idle;
        }
        true
    }

    fn resolve_move(&mut self) -> MoveOutcome {
        let resolution = self.resolver.scan(&mut self.sequence);
        self.moves = self.moves.wrapping_add(1);

        let gained = resolution.total;
        let (final_gain, cue) = if gained > 0 {
            self.combo = self.combo.saturating_add(1);
            let final_gain = apply_combo(gained, self.combo);
            let cue = select_cue(self.score, final_gain, self.combo, self.resolver.config());
            self.score = self.score.saturating_add(final_gain);
            debug!(
                gained,
                final_gain,
                combo = self.combo,
                score = self.score,
                cue = cue.as_str(),
                "move scored"
            );
            (final_gain, cue)
        } else {
            if self.combo > 0 {
                debug!(combo = self.combo, "combo reset");
            }
            self.combo = 0;
            (0, Cue::None)
        };

        if !cue.is_none() {
            self.last_cue = Some(cue);
        }
        self.revalidate_selection();

        MoveOutcome {
            gained,
            final_gain,
            combo: self.combo,
            cue,
            runs: resolution.runs,
        }
    }

    /// Drop a pending selection whose token has left the row.
    fn revalidate_selection(&mut self) {
        if let Selection::PendingDirection { token, .. } = self.selection {
            if !self.sequence.contains(token) {
                debug!("pending selection invalidated");
                self.selection = Selection::Idle;
            }
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.row = [None; MAX_CAPACITY];
        for (slot, kind) in out.row.iter_mut().zip(self.sequence.kinds()) {
            *slot = Some(kind);
        }
        out.len = self.sequence.len();
        out.capacity = self.sequence.capacity();
        out.selection = match self.selection {
            Selection::PendingDirection { token, anchor } => self
                .sequence
                .position_of(token)
                .map(|index| SelectionSnapshot { index, anchor }),
            Selection::Idle => None,
        };
        out.next = self.supply.preview();
        out.score = self.score;
        out.combo = self.combo;
        out.elapsed_ms = self.elapsed_ms;
        out.duration_ms = self.config.duration_ms;
        out.game_over = self.is_over();
        out.episode_id = self.episode_id;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::with_seed(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SupplyConfig;
    use crate::sequence::Run;
    use crate::types::{Color, Shape, TokenKind};

    const RC: TokenKind = TokenKind::new(Color::Red, Shape::Circle);
    const BS: TokenKind = TokenKind::new(Color::Blue, Shape::Square);
    const GT: TokenKind = TokenKind::new(Color::Green, Shape::Triangle);

    fn session_with(kinds: &[TokenKind]) -> GameSession {
        let supply = SupplyQueue::with_pending(kinds.iter().copied(), 1, SupplyConfig::default());
        GameSession::with_supply(SessionConfig::default(), supply).unwrap()
    }

    #[test]
    fn test_new_session() {
        let session = GameSession::with_seed(5);
        assert_eq!(session.score(), 0);
        assert_eq!(session.combo(), 0);
        assert_eq!(session.selection(), Selection::Idle);
        assert!(session.sequence().is_empty());
        assert!(!session.is_over());
        assert_eq!(session.final_score(), None);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SessionConfig {
            capacity: 0,
            ..SessionConfig::default()
        };
        assert!(GameSession::new(config).is_err());
    }

    #[test]
    fn test_click_token_selects_and_cancel_returns_idle() {
        let mut session = session_with(&[RC, BS]);
        session.handle_event(GameEvent::ClickAddButton(Side::Right));
        session.handle_event(GameEvent::ClickAddButton(Side::Right));

        assert!(session.handle_event(GameEvent::ClickToken(1)).is_none());
        let token = session.sequence().token_at(1).unwrap();
        assert_eq!(
            session.selection(),
            Selection::PendingDirection {
                token,
                anchor: BoardCell::new(1, 0)
            }
        );

        // Off-target cell cancels without a move.
        let moves = session.moves();
        assert!(session
            .handle_event(GameEvent::ClickDirectionCell(BoardCell::new(5, -1)))
            .is_none());
        assert_eq!(session.selection(), Selection::Idle);
        assert_eq!(session.moves(), moves);
    }

    #[test]
    fn test_click_past_end_is_ignored() {
        let mut session = session_with(&[RC]);
        session.handle_event(GameEvent::ClickAddButton(Side::Left));
        session.handle_event(GameEvent::ClickToken(3));
        assert_eq!(session.selection(), Selection::Idle);
    }

    #[test]
    fn test_direction_above_aligns_by_color() {
        let mut session = session_with(&[RC, BS, RC]);
        for _ in 0..3 {
            session.handle_event(GameEvent::ClickAddButton(Side::Right));
        }
        // Row: RC BS RC. Select index 2 and click above it.
        session.handle_event(GameEvent::ClickToken(2));
        let outcome = session
            .handle_event(GameEvent::ClickDirectionCell(BoardCell::new(2, -1)))
            .unwrap();
        assert!(!outcome.scored());
        let kinds: Vec<_> = session.sequence().kinds().collect();
        assert_eq!(kinds, vec![RC, RC, BS]);
        assert_eq!(session.selection(), Selection::Idle);
    }

    #[test]
    fn test_direction_below_aligns_by_shape() {
        let mut session = session_with(&[BS, GT, RC]);
        for _ in 0..3 {
            session.handle_event(GameEvent::ClickAddButton(Side::Right));
        }
        // Row: BS GT RC. Shape of GT is triangle: GT moves first.
        session.handle_event(GameEvent::ClickToken(1));
        session
            .handle_event(GameEvent::ClickDirectionCell(BoardCell::new(1, 1)))
            .unwrap();
        let kinds: Vec<_> = session.sequence().kinds().collect();
        assert_eq!(kinds, vec![GT, BS, RC]);
    }

    #[test]
    fn test_add_button_while_pending_cancels() {
        let mut session = session_with(&[RC, BS]);
        session.handle_event(GameEvent::ClickAddButton(Side::Right));
        session.handle_event(GameEvent::ClickToken(0));
        assert!(session
            .handle_event(GameEvent::ClickAddButton(Side::Right))
            .is_none());
        assert_eq!(session.sequence().len(), 1);
        assert_eq!(session.selection(), Selection::Idle);
    }

    #[test]
    fn test_direct_insert_cancels_pending_selection() {
        let mut session = session_with(&[RC, BS, GT]);
        session.handle_event(GameEvent::ClickAddButton(Side::Right));
        session.handle_event(GameEvent::ClickAddButton(Side::Right));
        session.handle_event(GameEvent::ClickToken(1));

        // Row becomes GT RC BS; the old anchor no longer matches BS.
        assert!(session.insert(Side::Left).is_some());
        assert_eq!(session.selection(), Selection::Idle);
        assert_eq!(session.snapshot().selection, None);

        let moves = session.moves();
        assert!(session
            .handle_event(GameEvent::ClickDirectionCell(BoardCell::new(1, -1)))
            .is_none());
        assert_eq!(session.moves(), moves);
        let kinds: Vec<_> = session.sequence().kinds().collect();
        assert_eq!(kinds, vec![GT, RC, BS]);
    }

    #[test]
    fn test_match_removing_selected_token_clears_selection() {
        let mut session = session_with(&[RC, RC, BS, RC]);
        for _ in 0..4 {
            session.handle_event(GameEvent::ClickAddButton(Side::Right));
        }
        session.handle_event(GameEvent::ClickToken(0));

        // RC RC BS RC -> RC RC RC BS; the run takes the selected token with it.
        let pivot = session.sequence().token_at(3).unwrap();
        let outcome = session.align_by_color(pivot).unwrap();
        assert_eq!(outcome.gained, 900);
        assert_eq!(session.selection(), Selection::Idle);

        let moves = session.moves();
        assert!(session
            .handle_event(GameEvent::ClickDirectionCell(BoardCell::new(0, -1)))
            .is_none());
        assert_eq!(session.moves(), moves);
        let kinds: Vec<_> = session.sequence().kinds().collect();
        assert_eq!(kinds, vec![BS]);
    }

    #[test]
    fn test_stale_pending_token_is_dropped_on_next_event() {
        let mut session = session_with(&[RC, BS]);
        session.handle_event(GameEvent::ClickAddButton(Side::Right));
        session.handle_event(GameEvent::ClickAddButton(Side::Right));
        session.handle_event(GameEvent::ClickToken(0));
        session.sequence.remove_run(Run::new(0, 1)).unwrap();
        assert_eq!(session.snapshot().selection, None);

        let moves = session.moves();
        assert!(session
            .handle_event(GameEvent::ClickDirectionCell(BoardCell::new(0, -1)))
            .is_none());
        assert_eq!(session.selection(), Selection::Idle);
        assert_eq!(session.moves(), moves);
        let kinds: Vec<_> = session.sequence().kinds().collect();
        assert_eq!(kinds, vec![BS]);
    }

    #[test]
    fn test_direct_moves_are_ignored_after_time_up() {
        let config = SessionConfig {
            duration_ms: 10,
            ..SessionConfig::default()
        };
        let mut session = GameSession::new(config).unwrap();
        session.tick(10);
        assert!(session.insert(Side::Left).is_none());
        assert!(session.sequence().is_empty());
    }

    #[test]
    fn test_tick_accumulates_uneven_steps() {
        let config = SessionConfig {
            duration_ms: 1_000,
            ..SessionConfig::default()
        };
        let mut session = GameSession::new(config).unwrap();
        for step in [47, 120, 3, 61] {
            assert!(!session.tick(step));
        }
        assert_eq!(session.elapsed_ms(), 231);
        assert_eq!(session.remaining_ms(), 769);
        assert!(session.tick(5_000));
        assert_eq!(session.elapsed_ms(), 1_000);
    }

    #[test]
    fn test_tick_ends_match_once() {
        let config = SessionConfig {
            duration_ms: 100,
            ..SessionConfig::default()
        };
        let mut session = GameSession::new(config).unwrap();
        assert!(!session.tick(60));
        assert!(session.tick(60));
        assert!(!session.tick(60));
        assert_eq!(session.elapsed_ms(), 100);
        assert_eq!(session.final_score(), Some(0));

        assert!(session
            .handle_event(GameEvent::ClickAddButton(Side::Left))
            .is_none());
        assert!(session.sequence().is_empty());
    }

    #[test]
    fn test_restart_increments_episode_id() {
        let mut session = GameSession::with_seed(3);
        session.handle_event(GameEvent::ClickAddButton(Side::Left));
        session.tick(500);
        session.restart();
        assert_eq!(session.episode_id(), 1);
        assert_eq!(session.elapsed_ms(), 0);
        assert!(session.sequence().is_empty());
    }

    #[test]
    fn test_take_last_cue() {
        let mut session = session_with(&[RC, RC, RC]);
        for _ in 0..3 {
            session.handle_event(GameEvent::ClickAddButton(Side::Left));
        }
        assert_eq!(session.take_last_cue(), Some(Cue::FirstScore));
        assert_eq!(session.take_last_cue(), None);
    }

    #[test]
    fn test_snapshot_reflects_selection() {
        let mut session = session_with(&[RC, BS]);
        session.handle_event(GameEvent::ClickAddButton(Side::Right));
        session.handle_event(GameEvent::ClickAddButton(Side::Right));
        session.handle_event(GameEvent::ClickToken(1));

        let snap = session.snapshot();
        assert_eq!(snap.len, 2);
        assert_eq!(snap.row[0], Some(RC));
        assert_eq!(snap.row[1], Some(BS));
        assert_eq!(
            snap.selection,
            Some(SelectionSnapshot {
                index: 1,
                anchor: BoardCell::new(1, 0)
            })
        );
        assert!(snap.next.iter().all(Option::is_some));
    }
}
