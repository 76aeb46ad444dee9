//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//! Board row 0 is the bottom row, so it is drawn last on screen.

use crate::core::{GameSnapshot, Piece, Shape};
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{Cell as BoardCell, Mode, PieceKind, SHAPE_SIZE};

/// Board background
pub const BACKGROUND: Rgb = Rgb::new(0x10, 0x19, 0x44);
/// Screen background around the board
pub const SCREEN: Rgb = Rgb::new(0x34, 0x3e, 0x76);
/// Board frame and preview box
pub const FRAME: Rgb = Rgb::new(0x6e, 0x82, 0xe6);
/// Labels and hints
pub const TEXT: Rgb = Rgb::new(0xee, 0xee, 0xee);

/// Share of the piece color in a ghost cell
const GHOST_ALPHA: u8 = 77;

/// Color of a piece kind
pub fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::O => Rgb::new(0, 0, 255),
        PieceKind::Z => Rgb::new(0, 255, 0),
        PieceKind::S => Rgb::new(0, 255, 255),
        PieceKind::I => Rgb::new(255, 0, 0),
        PieceKind::J => Rgb::new(255, 0, 255),
        PieceKind::T => Rgb::new(154, 205, 50),
        PieceKind::L => Rgb::new(255, 255, 255),
    }
}

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

/// Screen position of the board frame for one frame
#[derive(Debug, Clone, Copy)]
struct Layout {
    start_x: u16,
    start_y: u16,
    frame_w: u16,
    frame_h: u16,
    rows: u16,
}

/// A lightweight terminal renderer for the game.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
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

    /// Render a snapshot into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when
    /// the terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::new(TEXT, SCREEN).into_cell(' '));

        let board_px_w = snap.width as u16 * self.cell_w;
        let board_px_h = snap.height as u16 * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;
        let layout = Layout {
            start_x: viewport.width.saturating_sub(frame_w) / 2,
            start_y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
                AnchorY::Top => 0,
            },
            frame_w,
            frame_h,
            rows: snap.height as u16,
        };

        fb.fill_rect(
            layout.start_x + 1,
            layout.start_y + 1,
            board_px_w,
            board_px_h,
            ' ',
            CellStyle::new(TEXT, BACKGROUND),
        );
        self.draw_border(
            fb,
            layout.start_x,
            layout.start_y,
            frame_w,
            frame_h,
            CellStyle::new(FRAME, SCREEN),
        );

        // Locked and marked cells.
        for y in 0..snap.height as i32 {
            for x in 0..snap.width as i32 {
                match snap.cell(x, y) {
                    Some(BoardCell::Filled(kind)) => {
                        let style = CellStyle::new(piece_color(kind), BACKGROUND);
                        self.draw_board_cell(fb, &layout, x, y, '█', style);
                    }
                    Some(BoardCell::Clearing(kind)) => {
                        let style = CellStyle::new(piece_color(kind), BACKGROUND).reverse();
                        self.draw_board_cell(fb, &layout, x, y, '▒', style);
                    }
                    _ => {}
                }
            }
        }

        if let Some(active) = snap.active {
            if let Some(ghost_y) = snap.ghost_row {
                let ghost = Piece { y: ghost_y, ..active };
                for (x, y, kind) in ghost.cells() {
                    let fg = piece_color(kind).blend(BACKGROUND, GHOST_ALPHA);
                    let style = CellStyle::new(fg, BACKGROUND).dim();
                    self.draw_board_cell(fb, &layout, x, y, '░', style);
                }
            }
            for (x, y, kind) in active.cells() {
                let style = CellStyle::new(piece_color(kind), BACKGROUND).bold();
                self.draw_board_cell(fb, &layout, x, y, '█', style);
            }
        }

        self.draw_side_panel(fb, snap, viewport, &layout);

        match snap.mode {
            Mode::SelectLevel => self.draw_select_level_poster(fb, snap, &layout),
            Mode::GameOver => self.draw_game_over_poster(fb, &layout),
            Mode::Idle | Mode::Play => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
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

    /// Draw one board cell; cells outside the board (e.g. above it) are skipped.
    fn draw_board_cell(
        &self,
        fb: &mut FrameBuffer,
        layout: &Layout,
        x: i32,
        y: i32,
        ch: char,
        style: CellStyle,
    ) {
        let cols = (layout.frame_w - 2) / self.cell_w;
        if x < 0 || y < 0 || x >= cols as i32 || y >= layout.rows as i32 {
            return;
        }
        let screen_row = layout.rows - 1 - y as u16;
        let px = layout.start_x + 1 + x as u16 * self.cell_w;
        let py = layout.start_y + 1 + screen_row * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        layout: &Layout,
    ) {
        let panel_x = layout
            .start_x
            .saturating_add(layout.frame_w)
            .saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 12 {
            return;
        }

        let label = CellStyle::new(TEXT, SCREEN).bold();
        let value = CellStyle::new(TEXT, SCREEN);

        let mut y = layout.start_y;
        if let Some(high) = snap.high_score {
            fb.put_str(panel_x, y, "HIGH", label);
            y = y.saturating_add(1);
            fb.put_u32(panel_x, y, high, value);
            y = y.saturating_add(2);
        }

        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.score, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "LEVEL", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.level as u32, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "LINES", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.lines, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        y = self.draw_next_preview(fb, panel_x, y, &snap.next);
        y = y.saturating_add(1);

        fb.put_str(panel_x, y, "SOUND", label);
        fb.put_str(panel_x + 6, y, if snap.sound { "on" } else { "off" }, value);

        let hint_y = layout.start_y.saturating_add(layout.frame_h).saturating_sub(1);
        let hint = CellStyle::new(TEXT, SCREEN).dim();
        fb.put_str(panel_x, hint_y, "Press ESC to exit", hint);
    }

    /// Preview box with the shape drawn upright (shape row 0 at the bottom).
    /// Returns the row below the box.
    fn draw_next_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, shape: &Shape) -> u16 {
        let side = SHAPE_SIZE as u16;
        let box_w = side * self.cell_w + 2;
        let box_h = side * self.cell_h + 2;
        let inner = CellStyle::new(TEXT, BACKGROUND);
        fb.fill_rect(x + 1, y + 1, box_w - 2, box_h - 2, ' ', inner);
        self.draw_border(fb, x, y, box_w, box_h, CellStyle::new(FRAME, SCREEN));

        for (i, row) in shape.iter().enumerate() {
            for (j, &tag) in row.iter().enumerate() {
                if let Some(kind) = PieceKind::from_tag(tag) {
                    let px = x + 1 + j as u16 * self.cell_w;
                    let py = y + 1 + (side - 1 - i as u16) * self.cell_h;
                    let style = CellStyle::new(piece_color(kind), BACKGROUND);
                    fb.fill_rect(px, py, self.cell_w, self.cell_h, '█', style);
                }
            }
        }
        y.saturating_add(box_h)
    }

    /// Screen row `offset` rows from the vertical middle of the board
    fn poster_row(layout: &Layout, offset: i32) -> u16 {
        let mid = layout.start_y as i32 + 1 + layout.frame_h as i32 / 2;
        (mid + offset).max(0) as u16
    }

    fn draw_select_level_poster(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, layout: &Layout) {
        let style = CellStyle::new(TEXT, BACKGROUND).bold();
        let x = layout.start_x + 1;
        let w = layout.frame_w - 2;

        fb.put_str_centered(x, w, Self::poster_row(layout, -4), "Select Level", style);
        fb.put_str_centered(x, w, Self::poster_row(layout, -2), "Use arrow keys", style);

        // "LEVEL: n" without formatting into a String
        let digits = if snap.level >= 10 { 2 } else { 1 };
        let text_w = 7 + digits;
        let level_x = x.saturating_add(w.saturating_sub(text_w) / 2);
        let level_y = Self::poster_row(layout, 0);
        let end = fb.put_str(level_x, level_y, "LEVEL: ", style);
        fb.put_u32(end, level_y, snap.level as u32, style);

        fb.put_str_centered(x, w, Self::poster_row(layout, 2), "Enter to start", style);
    }

    fn draw_game_over_poster(&self, fb: &mut FrameBuffer, layout: &Layout) {
        let x = layout.start_x + 1;
        let w = layout.frame_w - 2;
        let top = Self::poster_row(layout, -3);
        fb.fill_rect(x, top, w, 6, ' ', CellStyle::new(TEXT, BACKGROUND));

        let style = CellStyle::new(TEXT, BACKGROUND).bold();
        fb.put_str_centered(x, w, Self::poster_row(layout, -1), "GAME OVER", style);
        fb.put_str_centered(x, w, Self::poster_row(layout, 1), "Enter to play again", style);
    }
}

trait IntoCell {
    fn into_cell(self, ch: char) -> Cell;
}

impl IntoCell for CellStyle {
    fn into_cell(self, ch: char) -> Cell {
        Cell { ch, style: self }
    }
}
