//! Pieces module - shape templates and matrix rotation
//!
//! Every piece lives in a 4x4 window of numeric tags (0 = empty, 1..=7 = the
//! piece identity). Shape row `i` sits on board row `y + i` and shape column
//! `j` on board column `x + j`, so the window grows upward from its anchor.
//! Rotation turns the whole window a quarter turn; there are no wall kicks.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::config::ConfigError;
use crate::rng::RandomSource;
use crate::types::{PieceKind, PIECE_KINDS, SHAPE_SIZE};

/// 4x4 tag matrix, indexed `[row][col]`
pub type Shape = [[u8; SHAPE_SIZE]; SHAPE_SIZE];

/// Occupied board cells of one piece: `(x, y, kind)`
pub type PieceCells = ArrayVec<(i32, i32, PieceKind), { SHAPE_SIZE * SHAPE_SIZE }>;

/// The seven classic templates, in tag order
pub const CLASSIC_SHAPES: [Shape; PIECE_KINDS as usize] = [
    [[0, 0, 0, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [0, 2, 2, 0], [2, 2, 0, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [3, 3, 0, 0], [0, 3, 3, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [4, 4, 4, 4], [0, 0, 0, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [0, 5, 5, 5], [0, 5, 0, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [6, 6, 6, 0], [0, 6, 0, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [0, 7, 0, 0], [0, 7, 7, 7], [0, 0, 0, 0]],
];

/// Quarter turn clockwise: `new[i][j] = old[j][3 - i]`
pub fn rotated_cw(shape: &Shape) -> Shape {
    let mut out = [[0u8; SHAPE_SIZE]; SHAPE_SIZE];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = shape[j][SHAPE_SIZE - 1 - i];
        }
    }
    out
}

/// Quarter turn counter-clockwise: `new[i][j] = old[3 - j][i]`
pub fn rotated_ccw(shape: &Shape) -> Shape {
    let mut out = [[0u8; SHAPE_SIZE]; SHAPE_SIZE];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = shape[SHAPE_SIZE - 1 - j][i];
        }
    }
    out
}

/// Set of templates new pieces are drawn from, uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    shapes: Vec<Shape>,
}

impl Catalog {
    /// The seven classic pieces
    pub fn classic() -> Self {
        Self {
            shapes: CLASSIC_SHAPES.to_vec(),
        }
    }

    /// Build a custom catalog.
    ///
    /// Rejects an empty list, shapes with no occupied cell, and tags above 7.
    pub fn new(shapes: Vec<Shape>) -> Result<Self, ConfigError> {
        if shapes.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        for (index, shape) in shapes.iter().enumerate() {
            if let Some(&tag) = shape.iter().flatten().find(|&&tag| tag > PIECE_KINDS) {
                return Err(ConfigError::InvalidTag { index, tag });
            }
            if shape.iter().flatten().all(|&tag| tag == 0) {
                return Err(ConfigError::EmptyShape { index });
            }
        }
        Ok(Self { shapes })
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::classic()
    }
}

/// A piece on (or just above) the board: its current shape and anchor.
///
/// `x` may go negative when the leftmost shape columns are empty; `y` may
/// exceed the board height while the piece is still entering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    pub fn new(shape: Shape, x: i32, y: i32) -> Self {
        Self { shape, x, y }
    }

    /// Anchor every new piece starts from
    pub fn spawn_anchor(board: &Board) -> (i32, i32) {
        (board.width() as i32 / 2 - 2, board.height() as i32 - 3)
    }

    /// Draw a random template, pre-rotate it 0..=3 quarter turns
    /// counter-clockwise and place it at the spawn anchor.
    ///
    /// Does not check whether the piece fits; that decides game over and is
    /// the caller's call.
    pub fn spawn<R: RandomSource + ?Sized>(catalog: &Catalog, rng: &mut R, board: &Board) -> Self {
        let index = rng.next_range(catalog.len() as u32) as usize;
        let mut shape = catalog.shapes()[index];
        for _ in 0..rng.next_range(4) {
            shape = rotated_ccw(&shape);
        }
        let (x, y) = Self::spawn_anchor(board);
        Self { shape, x, y }
    }

    /// Identity of the piece, taken from its first non-zero tag
    pub fn kind(&self) -> Option<PieceKind> {
        self.shape
            .iter()
            .flatten()
            .find(|&&tag| tag != 0)
            .and_then(|&tag| PieceKind::from_tag(tag))
    }

    /// Board coordinates of every occupied cell
    pub fn cells(&self) -> PieceCells {
        let mut out = PieceCells::new();
        for (i, row) in self.shape.iter().enumerate() {
            for (j, &tag) in row.iter().enumerate() {
                if let Some(kind) = PieceKind::from_tag(tag) {
                    out.push((self.x + j as i32, self.y + i as i32, kind));
                }
            }
        }
        out
    }

    pub fn rotate_cw(&mut self) {
        self.shape = rotated_cw(&self.shape);
    }

    pub fn rotate_ccw(&mut self) {
        self.shape = rotated_ccw(&self.shape);
    }

    /// Rotate clockwise in place, rolling back if the result collides.
    pub fn try_rotate_cw(&mut self, board: &Board) -> bool {
        let before = self.shape;
        self.rotate_cw();
        if board.fits(self) {
            return true;
        }
        self.shape = before;
        false
    }

    /// Rotate counter-clockwise in place, rolling back if the result collides.
    pub fn try_rotate_ccw(&mut self, board: &Board) -> bool {
        let before = self.shape;
        self.rotate_ccw();
        if board.fits(self) {
            return true;
        }
        self.shape = before;
        false
    }

    /// Move by `(dx, dy)` if the target fits. Unchanged on failure.
    pub fn try_shift(&mut self, board: &Board, dx: i32, dy: i32) -> bool {
        let moved = Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        };
        if board.fits(&moved) {
            *self = moved;
            true
        } else {
            false
        }
    }

    /// Drop row by row until the next step down would collide.
    /// Returns true if the piece moved at all.
    pub fn drop_to_floor(&mut self, board: &Board) -> bool {
        let start = self.y;
        while self.try_shift(board, 0, -1) {}
        self.y != start
    }

    /// Anchor row the piece would come to rest on if dropped now
    pub fn ghost_row(&self, board: &Board) -> i32 {
        let mut ghost = *self;
        ghost.drop_to_floor(board);
        ghost.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleRng;
    use crate::types::Cell;

    #[test]
    fn test_ccw_undoes_cw() {
        for shape in CLASSIC_SHAPES.iter() {
            assert_eq!(rotated_ccw(&rotated_cw(shape)), *shape);
        }
    }

    #[test]
    fn test_four_turns_is_identity() {
        let mut shape = CLASSIC_SHAPES[5];
        for _ in 0..4 {
            shape = rotated_cw(&shape);
        }
        assert_eq!(shape, CLASSIC_SHAPES[5]);
    }

    #[test]
    fn test_i_piece_turns_vertical() {
        let vertical = rotated_ccw(&CLASSIC_SHAPES[3]);
        assert_eq!(
            vertical,
            [[0, 0, 4, 0], [0, 0, 4, 0], [0, 0, 4, 0], [0, 0, 4, 0]]
        );
        assert_eq!(
            rotated_cw(&CLASSIC_SHAPES[3]),
            [[0, 4, 0, 0], [0, 4, 0, 0], [0, 4, 0, 0], [0, 4, 0, 0]]
        );
    }

    #[test]
    fn test_catalog_validation() {
        assert_eq!(Catalog::new(vec![]), Err(ConfigError::EmptyCatalog));
        assert_eq!(
            Catalog::new(vec![CLASSIC_SHAPES[0], [[0; 4]; 4]]),
            Err(ConfigError::EmptyShape { index: 1 })
        );
        let mut bad = CLASSIC_SHAPES[1];
        bad[2][0] = 9;
        assert_eq!(
            Catalog::new(vec![bad]),
            Err(ConfigError::InvalidTag { index: 0, tag: 9 })
        );
        assert_eq!(Catalog::classic().len(), 7);
    }

    #[test]
    fn test_cells_follow_anchor() {
        let piece = Piece::new(CLASSIC_SHAPES[0], 3, 10);
        let cells = piece.cells();
        assert_eq!(cells.len(), 4);
        assert!(cells.contains(&(4, 11, PieceKind::O)));
        assert!(cells.contains(&(5, 12, PieceKind::O)));
        assert_eq!(piece.kind(), Some(PieceKind::O));
    }

    #[test]
    fn test_spawn_uses_anchor() {
        let board = Board::default();
        let mut rng = SimpleRng::new(42);
        let piece = Piece::spawn(&Catalog::classic(), &mut rng, &board);
        assert_eq!((piece.x, piece.y), (3, 17));
        assert!(board.fits(&piece));
    }

    #[test]
    fn test_blocked_rotation_rolls_back() {
        let mut board = Board::default();
        // Vertical I hugging the right wall; horizontal would poke out.
        let mut piece = Piece::new(rotated_ccw(&CLASSIC_SHAPES[3]), 8, 5);
        assert!(board.fits(&piece));
        let before = piece;
        assert!(!piece.try_rotate_cw(&board));
        assert_eq!(piece, before);

        // Away from the wall, a block in the way also blocks the turn.
        let mut piece = Piece::new(rotated_ccw(&CLASSIC_SHAPES[3]), 3, 5);
        board.set(3, 7, Cell::Filled(PieceKind::T));
        let before = piece;
        assert!(!piece.try_rotate_ccw(&board));
        assert_eq!(piece, before);
        assert!(piece.try_shift(&board, 0, 1));
    }

    #[test]
    fn test_drop_to_floor_and_ghost() {
        let board = Board::default();
        let mut piece = Piece::new(CLASSIC_SHAPES[3], 3, 17);
        // I occupies shape row 1, so it rests at anchor row -1.
        assert_eq!(piece.ghost_row(&board), -1);
        assert!(piece.drop_to_floor(&board));
        assert_eq!(piece.y, -1);
        assert!(!piece.drop_to_floor(&board));
    }
}
