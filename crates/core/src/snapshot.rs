use crate::piece::{Piece, Shape};
use crate::types::{Cell, Mode};

/// Read-only copy of everything a renderer needs for one frame.
///
/// Reusable: [`GameSession::snapshot_into`](crate::GameSession::snapshot_into)
/// overwrites an existing value without reallocating the board once it has
/// the right size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    /// Row-major, row 0 at the bottom
    pub board: Vec<Cell>,
    /// Falling piece; `None` before the first reset
    pub active: Option<Piece>,
    /// Anchor row the falling piece would land on
    pub ghost_row: Option<i32>,
    pub next: Shape,
    pub score: u32,
    pub high_score: Option<u32>,
    pub level: u8,
    pub lines: u32,
    pub mode: Mode,
    pub sound: bool,
}

impl GameSnapshot {
    /// Cell at `(x, y)`, `None` outside the board
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        self.board
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            board: Vec::new(),
            active: None,
            ghost_row: None,
            next: [[0; 4]; 4],
            score: 0,
            high_score: None,
            level: 0,
            lines: 0,
            mode: Mode::Idle,
            sound: true,
        }
    }
}
