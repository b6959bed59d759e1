//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). Besides drawing, it decides where the board
//! grid sits on screen and hands that [`BoardLayout`] back so mouse clicks can
//! be mapped to grid cells against exactly what was drawn.

use crate::core::GameSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{BoardCell, BoardLayout, Color, Cue, Shape, TokenKind};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const BG: Rgb = Rgb::new(0, 0, 0);
const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const SELECT_BG: Rgb = Rgb::new(70, 70, 95);

/// Rows above the board frame (HUD line).
const HUD_ROWS: u16 = 1;
/// Rows below the board frame (supply preview and cue banner).
const FOOTER_ROWS: u16 = 2;

/// Transient layers drawn over the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overlay {
    /// Cue to announce this frame
    pub banner: Option<Cue>,
    /// Best recorded score, shown once time is up
    pub best: Option<u32>,
    /// The finished match set a new best
    pub new_record: bool,
}

impl Overlay {
    pub fn with_banner(cue: Cue) -> Self {
        Self {
            banner: Some(cue),
            ..Self::default()
        }
    }
}

/// Terminal renderer for the token row.
#[derive(Debug, Clone, Copy)]
pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
    /// Grid cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            cell_w: 3,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Where the grid lands for this snapshot and viewport
    pub fn layout(&self, snap: &GameSnapshot, viewport: Viewport) -> BoardLayout {
        let mut layout = BoardLayout {
            origin_x: 0,
            origin_y: 0,
            cell_w: self.cell_w,
            cell_h: self.cell_h,
            capacity: snap.capacity,
        };
        let frame_w = layout.grid_width() + 2;
        let frame_h = layout.grid_height() + 2;
        let total_h = HUD_ROWS + frame_h + FOOTER_ROWS;

        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(total_h) / 2,
            AnchorY::Top => 0,
        };
        layout.origin_x = start_x + 1;
        layout.origin_y = start_y + HUD_ROWS + 1;
        layout
    }

    /// Render into an existing framebuffer.
    ///
    /// Returns the grid layout that was drawn.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        overlay: &Overlay,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) -> BoardLayout {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let layout = self.layout(snap, viewport);
        let frame_x = layout.origin_x - 1;
        let frame_y = layout.origin_y - 1;
        let frame_w = layout.grid_width() + 2;
        let frame_h = layout.grid_height() + 2;

        self.draw_hud(fb, snap, frame_x, frame_y.saturating_sub(1));

        fb.fill_rect(
            layout.origin_x,
            layout.origin_y,
            layout.grid_width(),
            layout.grid_height(),
            ' ',
            CellStyle::fg(Rgb::new(80, 80, 90)).on(BOARD_BG),
        );
        draw_border(
            fb,
            frame_x,
            frame_y,
            frame_w,
            frame_h,
            CellStyle::fg(Rgb::new(200, 200, 200)),
        );

        self.draw_row(fb, snap, &layout);

        let footer_y = frame_y + frame_h;
        self.draw_preview(fb, snap, frame_x, footer_y);
        if let Some(cue) = overlay.banner {
            draw_banner(fb, cue, frame_x, frame_w, footer_y + 1);
        }

        if snap.game_over {
            draw_time_up(fb, snap.score, overlay, frame_x, frame_y, frame_w, frame_h);
        }
        layout
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, overlay: &Overlay, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, overlay, viewport, &mut fb);
        fb
    }

    fn draw_row(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, layout: &BoardLayout) {
        let button = CellStyle::fg(Rgb::new(120, 230, 120)).on(BOARD_BG).bold();
        self.put_in_cell(fb, layout, BoardCell::new(-1, 0), '+', button);
        self.put_in_cell(fb, layout, BoardCell::new(layout.right_button_col(), 0), '+', button);

        let empty = CellStyle::fg(Rgb::new(90, 90, 100)).on(BOARD_BG).dim();
        for col in 0..snap.capacity {
            let cell = BoardCell::of_index(col);
            match snap.row.get(col).copied().flatten().filter(|_| col < snap.len) {
                Some(kind) => {
                    let selected = snap.selection.map(|s| s.index) == Some(col);
                    let bg = if selected { SELECT_BG } else { BOARD_BG };
                    self.fill_cell(fb, layout, cell, bg);
                    self.put_in_cell(fb, layout, cell, glyph(kind.shape), token_style(kind).on(bg));
                }
                None => self.put_in_cell(fb, layout, cell, '·', empty),
            }
        }

        if let Some(sel) = snap.selection {
            let target = CellStyle::fg(Rgb::new(255, 255, 255)).on(SELECT_BG).bold();
            for (cell, ch) in [(sel.anchor.above(), '▲'), (sel.anchor.below(), '▼')] {
                self.fill_cell(fb, layout, cell, SELECT_BG);
                self.put_in_cell(fb, layout, cell, ch, target);
            }
        }
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, layout: &BoardLayout, cell: BoardCell, bg: Rgb) {
        if let Some((x, y)) = layout.screen_pos(cell) {
            fb.fill_rect(x, y, self.cell_w, self.cell_h, ' ', CellStyle::fg(bg).on(bg));
        }
    }

    fn put_in_cell(
        &self,
        fb: &mut FrameBuffer,
        layout: &BoardLayout,
        cell: BoardCell,
        ch: char,
        style: CellStyle,
    ) {
        if let Some((x, y)) = layout.screen_pos(cell) {
            fb.put_char(x + self.cell_w / 2, y + self.cell_h / 2, ch, style);
        }
    }

    fn draw_hud(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, x: u16, y: u16) {
        let label = CellStyle::fg(Rgb::new(220, 220, 220)).bold();
        let value = CellStyle::fg(Rgb::new(200, 200, 200));

        let mut cx = fb.put_str(x, y, "SCORE ", label);
        cx = fb.put_u32(cx, y, snap.score, value);

        cx = fb.put_str(cx + 2, y, "COMBO x", label);
        cx = fb.put_u32(cx, y, snap.combo, value);

        cx = fb.put_str(cx + 2, y, "TIME ", label);
        let secs = snap.remaining_ms().div_ceil(1000);
        cx = fb.put_u32(cx, y, secs / 60, value);
        cx = fb.put_char(cx, y, ':', value);
        if secs % 60 < 10 {
            cx = fb.put_char(cx, y, '0', value);
        }
        fb.put_u32(cx, y, secs % 60, value);
    }

    fn draw_preview(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, x: u16, y: u16) {
        let label = CellStyle::fg(Rgb::new(220, 220, 220)).bold();
        let mut cx = fb.put_str(x, y, "NEXT", label);
        for kind in snap.next.iter().flatten() {
            cx = cx.saturating_add(1);
            cx = fb.put_char(cx, y, glyph(kind.shape), token_style(*kind));
        }
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_banner(fb: &mut FrameBuffer, cue: Cue, frame_x: u16, frame_w: u16, y: u16) {
    let style = CellStyle::fg(Rgb::new(255, 210, 90)).bold();
    let (text, level) = match cue {
        Cue::None => return,
        Cue::Combo(level) => ("COMBO x", Some(level)),
        Cue::FirstScore => ("FIRST SCORE!", None),
        Cue::BigWin => ("BIG WIN!", None),
    };
    let text_w = text.chars().count() as u16 + u16::from(level.is_some()) * 2;
    let x = frame_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
    let cx = fb.put_str(x, y, text, style);
    if let Some(level) = level {
        let cx = fb.put_u32(cx, y, u32::from(level), style);
        fb.put_char(cx, y, '!', style);
    }
}

fn draw_time_up(
    fb: &mut FrameBuffer,
    score: u32,
    overlay: &Overlay,
    frame_x: u16,
    frame_y: u16,
    frame_w: u16,
    frame_h: u16,
) {
    let style = CellStyle::fg(Rgb::new(255, 255, 255)).bold();
    let mid_y = frame_y.saturating_add(frame_h / 2);

    put_centered(fb, frame_x, frame_w, mid_y.saturating_sub(1), "TIME UP", None, style);
    put_centered(fb, frame_x, frame_w, mid_y, "FINAL ", Some(score), style);

    let best_y = mid_y.saturating_add(1);
    if overlay.new_record {
        let style = CellStyle::fg(Rgb::new(255, 215, 0)).bold();
        put_centered(fb, frame_x, frame_w, best_y, "NEW BEST!", None, style);
    } else if let Some(best) = overlay.best {
        put_centered(fb, frame_x, frame_w, best_y, "BEST ", Some(best), style);
    }
}

/// Label followed by an optional number, centered across `width` columns.
fn put_centered(
    fb: &mut FrameBuffer,
    x0: u16,
    width: u16,
    y: u16,
    label: &str,
    value: Option<u32>,
    style: CellStyle,
) {
    let text_w = label.chars().count() as u16 + value.map_or(0, digit_count);
    let x = x0.saturating_add(width.saturating_sub(text_w) / 2);
    let cx = fb.put_str(x, y, label, style);
    if let Some(value) = value {
        fb.put_u32(cx, y, value, style);
    }
}

fn digit_count(mut n: u32) -> u16 {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

/// Glyph drawn for a shape
pub fn glyph(shape: Shape) -> char {
    match shape {
        Shape::Circle => '●',
        Shape::Square => '■',
        Shape::Triangle => '▲',
        Shape::Diamond => '◆',
    }
}

fn token_style(kind: TokenKind) -> CellStyle {
    let fg = match kind.color {
        Color::Red => Rgb::new(220, 80, 80),
        Color::Green => Rgb::new(100, 220, 120),
        Color::Blue => Rgb::new(80, 120, 220),
        Color::Yellow => Rgb::new(240, 220, 80),
    };
    CellStyle::fg(fg).on(BOARD_BG).bold()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_count_matches_decimal_width() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(120_000), 6);
    }

    #[test]
    fn layout_is_centered_horizontally() {
        let snap = GameSnapshot {
            capacity: 4,
            ..GameSnapshot::default()
        };
        let layout = GameView::default().layout(&snap, Viewport::new(40, 20));
        // Grid is (4 + 2) * 3 = 18 wide, frame 20: start_x = 10.
        assert_eq!(layout.origin_x, 11);
        assert_eq!(layout.grid_width(), 18);
        // Total height 1 + 5 + 2 = 8: start_y = 6, frame at 7, grid at 8.
        assert_eq!(layout.origin_y, 8);
    }
}
