//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (engine logic, terminal rendering, tests).
//!
//! # Board Dimensions
//!
//! Default playfield dimensions:
//!
//! - **Width**: 11 columns (indexed 0-10, left to right)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the bottom)
//! - **Spawn anchor**: `(width / 2 - 2, height - 3)`
//!
//! # Game Timing
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_INTERVAL_MS` | 100 | Tick interval at the maximum level |
//! | `LEVEL_STEP_MS` | 100 | Extra interval per level below the maximum |
//! | `SOFT_DROP_STEP_MS` | 5 | Soft drop interval per level below the maximum |
//! | `SOFT_DROP_MIN_MS` | 1 | Soft drop floor |
//! | `LINE_CLEAR_PAUSE_TICKS` | 2 | Intervals the clock waits after a line clear |
//! | `FRAME_MS` | 20 | Driver poll period |
//!
//! # Tick Intervals by Level
//!
//! | Level | Interval | Soft drop |
//! |-------|----------|-----------|
//! | 0 | 1000ms | 45ms |
//! | 5 | 500ms | 20ms |
//! | 9 | 100ms | 1ms |
//!
//! # Examples
//!
//! ```
//! use block_party_types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let kind = PieceKind::from_tag(4).unwrap();
//! assert_eq!(kind, PieceKind::I);
//! assert_eq!(kind.tag(), 4);
//!
//! let cell = Cell::Filled(kind);
//! assert!(!cell.is_empty());
//! assert_eq!(cell.mark(), Cell::Clearing(PieceKind::I));
//!
//! assert_eq!(BOARD_WIDTH, 11);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (11 columns)
pub const BOARD_WIDTH: u8 = 11;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Side of the square window every piece shape lives in
pub const SHAPE_SIZE: usize = 4;

/// Number of distinct piece identities (tags 1..=7)
pub const PIECE_KINDS: u8 = 7;

/// Highest selectable level
pub const MAX_LEVEL: u8 = 9;

/// Level a new game starts on before the player adjusts it
pub const DEFAULT_LEVEL: u8 = MAX_LEVEL - 4;

/// Cleared lines needed per automatic level raise
pub const LINES_PER_LEVEL: u32 = 5;

/// Tick interval at the maximum level
pub const BASE_INTERVAL_MS: u64 = 100;

/// Extra tick interval for each level below the maximum
pub const LEVEL_STEP_MS: u64 = 100;

/// Soft drop interval for each level below the maximum
pub const SOFT_DROP_STEP_MS: u64 = 5;

/// Soft drop never ticks faster than this, so catch-up loops stay bounded
pub const SOFT_DROP_MIN_MS: u64 = 1;

/// Number of tick intervals the clock waits after rows are marked for clearing
pub const LINE_CLEAR_PAUSE_TICKS: u32 = 2;

/// Number of distinct game over sound variants
pub const GAME_OVER_VARIANTS: u8 = 3;

/// Poll period of the terminal driver
pub const FRAME_MS: u64 = 20;

/// The seven piece identities
///
/// Each kind carries the numeric tag its shape template is filled with:
/// - **O** (1): 2x2 square
/// - **Z** (2)
/// - **S** (3)
/// - **I** (4): four in a row
/// - **J** (5)
/// - **T** (6)
/// - **L** (7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    O,
    Z,
    S,
    I,
    J,
    T,
    L,
}

impl PieceKind {
    /// All kinds in tag order
    pub const ALL: [PieceKind; PIECE_KINDS as usize] = [
        PieceKind::O,
        PieceKind::Z,
        PieceKind::S,
        PieceKind::I,
        PieceKind::J,
        PieceKind::T,
        PieceKind::L,
    ];

    /// Numeric tag (1..=7) used in shape templates
    pub fn tag(self) -> u8 {
        match self {
            PieceKind::O => 1,
            PieceKind::Z => 2,
            PieceKind::S => 3,
            PieceKind::I => 4,
            PieceKind::J => 5,
            PieceKind::T => 6,
            PieceKind::L => 7,
        }
    }

    /// Look up a kind by tag. Returns `None` for 0 and anything above 7.
    ///
    /// # Examples
    ///
    /// ```
    /// use block_party_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_tag(1), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_tag(0), None);
    /// assert_eq!(PieceKind::from_tag(8), None);
    /// ```
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1..=PIECE_KINDS => Some(Self::ALL[(tag - 1) as usize]),
            _ => None,
        }
    }
}

/// A cell on the game board
///
/// - `Empty`: nothing there
/// - `Filled`: a locked block of the given kind
/// - `Clearing`: a locked block in a completed row, waiting to be swept
///
/// `Clearing` only exists between a line clear being detected and the
/// following sweep; renderers draw it inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceKind),
    Clearing(PieceKind),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_clearing(self) -> bool {
        matches!(self, Cell::Clearing(_))
    }

    /// Kind of the block in this cell, marked or not
    pub fn kind(self) -> Option<PieceKind> {
        match self {
            Cell::Empty => None,
            Cell::Filled(kind) | Cell::Clearing(kind) => Some(kind),
        }
    }

    /// The marked form of a filled cell. Empty and already marked cells are returned as is.
    pub fn mark(self) -> Self {
        match self {
            Cell::Filled(kind) => Cell::Clearing(kind),
            other => other,
        }
    }
}

/// Discrete player intents, decoupled from any input device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Shift the falling piece one column left, or lower the level while selecting
    MoveLeft,
    /// Shift the falling piece one column right, or raise the level while selecting
    MoveRight,
    /// Speed-up input pressed
    SoftDropOn,
    /// Speed-up input released
    SoftDropOff,
    /// Drop the falling piece straight to its resting row
    HardDrop,
    /// Rotate the falling piece 90° counter-clockwise
    Rotate,
    /// Start a game from level select, or restart after game over
    Confirm,
    /// Flip sound cues on or off
    ToggleSound,
    /// End the session
    Quit,
}

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Constructed but not yet reset; ignores gameplay input
    #[default]
    Idle,
    /// Player picks the starting level
    SelectLevel,
    /// A piece is falling
    Play,
    /// Round ended; waiting for a restart
    GameOver,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::SelectLevel => "select_level",
            Mode::Play => "play",
            Mode::GameOver => "game_over",
        }
    }
}

/// Screen areas a UI may repaint independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Score, high score, level and line counters
    Score,
    /// Next-piece preview
    Next,
    /// The playfield
    Board,
    /// Everything
    Full,
}

/// Symbolic sound cues. Mapping a cue to an asset is the audio side's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A piece locked into the board
    Lock,
    /// One or more rows completed
    LineClear,
    /// The round ended; variant is in `0..GAME_OVER_VARIANTS`
    GameOver(u8),
    /// A fresh round was set up
    NewGame,
}

/// Output of the engine, drained by the driver after each batch of input and ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Redraw(Region),
    Sound(SoundCue),
    ScoreChanged {
        score: u32,
        high_score: Option<u32>,
    },
    LevelChanged(u8),
    LinesCleared {
        rows: u32,
        total: u32,
    },
    GameOver {
        score: u32,
        high_score: Option<u32>,
    },
    Quit,
}
