//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, input mapping).
//!
//! # Row Dimensions
//!
//! The play row is a single line of at most [`MAX_CAPACITY`] tokens:
//!
//! - **Tokens**: columns `0..len` on row `0`
//! - **Add buttons**: column `-1` (left) and column `capacity` (right), row `0`
//! - **Direction targets**: row `-1` (align by color) and row `+1` (align by shape)
//!
//! # Game Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MAX_CAPACITY` | 16 | Upper bound on tokens in the row |
//! | `DURATION_MAX_MS` | 120000 | Length of a match |
//! | `TICK_MS` | 33 | Frame step (~30 FPS) |
//! | `SUPPLY_LOW_WATER` | 5 | Supply refills when it drops below this |
//! | `SUPPLY_REFILL_TO` | 8 | Supply size after a refill |
//! | `MIN_RUN_LEN` | 3 | Shortest scoring run |
//! | `POINTS_PER_UNIT` | 100 | Run points are `POINTS_PER_UNIT * len^2` |
//! | `BIG_WIN_THRESHOLD` | 1000 | Single-move gain that earns the big-win cue |
//!
//! # Examples
//!
//! ```
//! use three_to_go_types::{Color, Shape, TokenKind, KIND_COUNT};
//!
//! let kind = TokenKind::new(Color::Red, Shape::Circle);
//! assert_eq!(TokenKind::from_index(kind.index()), Some(kind));
//! assert_eq!(KIND_COUNT, 16);
//!
//! assert_eq!(Color::from_str("BLUE"), Some(Color::Blue));
//! assert_eq!(Shape::Diamond.as_str(), "diamond");
//! ```

/// Upper bound on the number of tokens in the row (16)
pub const MAX_CAPACITY: usize = 16;

/// Default row capacity
pub const DEFAULT_CAPACITY: usize = MAX_CAPACITY;

/// Match length in milliseconds (two minutes)
pub const DURATION_MAX_MS: u32 = 120_000;

/// Fixed frame step in milliseconds (33ms ≈ 30 FPS)
pub const TICK_MS: u32 = 33;

/// Supply buffer refills when its size drops below this mark
pub const SUPPLY_LOW_WATER: usize = 5;

/// Supply buffer size right after a refill
pub const SUPPLY_REFILL_TO: usize = 8;

/// Number of upcoming supply tokens exposed to renderers
pub const PREVIEW_LEN: usize = 5;

/// Minimum length of a scoring run
pub const MIN_RUN_LEN: usize = 3;

/// Base points per squared run length
pub const POINTS_PER_UNIT: u32 = 100;

/// Points multiplier for a run uniform in both color and shape.
///
/// At 1 three identical tokens score 900, the same as any other run of three.
/// Setting it to 2 doubles those runs instead, at the cost of that baseline.
pub const DUAL_RUN_MULTIPLIER: u32 = 1;

/// Final gain at or above this earns [`Cue::BigWin`] outside a combo chain
pub const BIG_WIN_THRESHOLD: u32 = 1000;

/// Highest combo level with a distinct cue; higher combos reuse it
pub const MAX_COMBO_CUE: u8 = 7;

/// Number of distinct colors
pub const COLOR_COUNT: usize = 4;

/// Number of distinct shapes
pub const SHAPE_COUNT: usize = 4;

/// Number of distinct token kinds (color x shape)
pub const KIND_COUNT: usize = COLOR_COUNT * SHAPE_COUNT;


/// Token color
///
/// Ordinals are stable and used to index per-color rings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
}

impl Color {
    /// All colors in ordinal order
    pub const ALL: [Color; COLOR_COUNT] = [Color::Red, Color::Green, Color::Blue, Color::Yellow];

    /// Ordinal in `0..COLOR_COUNT`
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use three_to_go_types::Color;
    ///
    /// assert_eq!(Color::from_str("red"), Some(Color::Red));
    /// assert_eq!(Color::from_str("Yellow"), Some(Color::Yellow));
    /// assert_eq!(Color::from_str("mauve"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(Color::Red),
            "green" => Some(Color::Green),
            "blue" => Some(Color::Blue),
            "yellow" => Some(Color::Yellow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
        }
    }
}

/// Token shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Circle,
    Square,
    Triangle,
    Diamond,
}

impl Shape {
    /// All shapes in ordinal order
    pub const ALL: [Shape; SHAPE_COUNT] =
        [Shape::Circle, Shape::Square, Shape::Triangle, Shape::Diamond];

    /// Ordinal in `0..SHAPE_COUNT`
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse shape from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use three_to_go_types::Shape;
    ///
    /// assert_eq!(Shape::from_str("circle"), Some(Shape::Circle));
    /// assert_eq!(Shape::from_str("TRIANGLE"), Some(Shape::Triangle));
    /// assert_eq!(Shape::from_str("hexagon"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "circle" => Some(Shape::Circle),
            "square" => Some(Shape::Square),
            "triangle" => Some(Shape::Triangle),
            "diamond" => Some(Shape::Diamond),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Square => "square",
            Shape::Triangle => "triangle",
            Shape::Diamond => "diamond",
        }
    }
}

/// The immutable attribute pair carried by a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenKind {
    pub color: Color,
    pub shape: Shape,
}

impl TokenKind {
    pub const fn new(color: Color, shape: Shape) -> Self {
        Self { color, shape }
    }

    /// Dense index in `0..KIND_COUNT` (color-major)
    pub fn index(self) -> usize {
        self.color.index() * SHAPE_COUNT + self.shape.index()
    }

    /// Inverse of [`TokenKind::index`]
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= KIND_COUNT {
            return None;
        }
        Some(Self {
            color: Color::from_index(index / SHAPE_COUNT)?,
            shape: Shape::from_index(index % SHAPE_COUNT)?,
        })
    }
}

/// End of the row an insertion targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// A cell of the logical board grid
///
/// Token `i` sits at `(i, 0)`. Negative columns and rows are valid grid
/// positions (the left add button lives at column `-1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoardCell {
    pub col: i16,
    pub row: i16,
}

impl BoardCell {
    pub const fn new(col: i16, row: i16) -> Self {
        Self { col, row }
    }

    /// Cell occupied by the token at `index`
    pub fn of_index(index: usize) -> Self {
        Self {
            col: index as i16,
            row: 0,
        }
    }

    pub fn above(self) -> Self {
        Self {
            row: self.row - 1,
            ..self
        }
    }

    pub fn below(self) -> Self {
        Self {
            row: self.row + 1,
            ..self
        }
    }
}

/// Logical input events consumed by the game session
///
/// Raw pointer coordinates never reach the engine; an input mapper turns
/// them into one of these first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Insert the next supply token at one end of the row
    ClickAddButton(Side),
    /// Select the token at this row index
    ClickToken(usize),
    /// Choose an alignment direction (or cancel) relative to the selection
    ClickDirectionCell(BoardCell),
}

/// Feedback signal emitted after a resolved move
///
/// Playback is external; the engine only names the cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cue {
    #[default]
    None,
    /// Combo level `2..=MAX_COMBO_CUE`
    Combo(u8),
    /// The move that took the score off zero
    FirstScore,
    /// A large single move outside a combo chain
    BigWin,
}

impl Cue {
    /// Cue for a combo level, saturating at [`MAX_COMBO_CUE`]
    pub fn combo(level: u32) -> Self {
        if level < 2 {
            Cue::None
        } else {
            Cue::Combo(level.min(MAX_COMBO_CUE as u32) as u8)
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Cue::None)
    }

    /// Stable identifier for audio sinks and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::None => "none",
            Cue::Combo(2) => "combo2",
            Cue::Combo(3) => "combo3",
            Cue::Combo(4) => "combo4",
            Cue::Combo(5) => "combo5",
            Cue::Combo(6) => "combo6",
            Cue::Combo(_) => "combo7",
            Cue::FirstScore => "firstScore",
            Cue::BigWin => "bigWin",
        }
    }
}

/// Where the board grid sits on screen
///
/// The grid spans columns `-1..=capacity` and rows `-1..=1`. The renderer
/// fills this in for each frame; the input mapper reads it to turn pointer
/// positions back into [`BoardCell`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardLayout {
    /// Terminal column of grid column `-1`
    pub origin_x: u16,
    /// Terminal row of grid row `-1`
    pub origin_y: u16,
    /// Grid cell width in terminal columns
    pub cell_w: u16,
    /// Grid cell height in terminal rows
    pub cell_h: u16,
    pub capacity: usize,
}

impl BoardLayout {
    pub const ROWS: u16 = 3;

    pub fn columns(&self) -> u16 {
        self.capacity as u16 + 2
    }

    pub fn grid_width(&self) -> u16 {
        self.columns().saturating_mul(self.cell_w)
    }

    pub fn grid_height(&self) -> u16 {
        Self::ROWS.saturating_mul(self.cell_h)
    }

    /// Grid cell under a terminal position
    pub fn cell_at(&self, x: u16, y: u16) -> Option<BoardCell> {
        if self.cell_w == 0 || self.cell_h == 0 || x < self.origin_x || y < self.origin_y {
            return None;
        }
        let dx = (x - self.origin_x) / self.cell_w;
        let dy = (y - self.origin_y) / self.cell_h;
        if dx >= self.columns() || dy >= Self::ROWS {
            return None;
        }
        Some(BoardCell::new(dx as i16 - 1, dy as i16 - 1))
    }

    /// Top-left terminal position of a grid cell
    pub fn screen_pos(&self, cell: BoardCell) -> Option<(u16, u16)> {
        let dx = cell.col.checked_add(1)?;
        let dy = cell.row.checked_add(1)?;
        if dx < 0 || dy < 0 || dx as u16 >= self.columns() || dy as u16 >= Self::ROWS {
            return None;
        }
        let x = self.origin_x.saturating_add(dx as u16 * self.cell_w);
        let y = self.origin_y.saturating_add(dy as u16 * self.cell_h);
        Some((x, y))
    }

    /// Column of the right add button
    pub fn right_button_col(&self) -> i16 {
        self.capacity as i16
    }
}
