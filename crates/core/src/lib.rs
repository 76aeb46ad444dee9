//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and timing.
//! It does no terminal or audio I/O; the only side effect is the optional
//! high score file, and storage problems never reach gameplay.
//!
//! - **Deterministic**: the random source is injected, so a seed replays a game
//! - **Testable**: time is passed in, never read from a wall clock
//! - **Portable**: output is a queue of [`GameEvent`](types::GameEvent)s and a snapshot
//!
//! # Module Structure
//!
//! - [`board`]: the grid with fit checks, locking and two-phase row clearing
//! - [`piece`]: 4x4 shape templates, matrix rotation, spawning, ghost row
//! - [`clock`]: level-driven tick deadlines, soft drop and the line clear pause
//! - [`session`]: the `Idle/SelectLevel/Play/GameOver` state machine
//! - [`rng`]: injectable randomness
//! - [`config`]: engine parameters and construction-time validation
//! - [`highscore`]: best-effort score persistence
//! - [`snapshot`]: read-only frame data for renderers
//!
//! # Game Rules
//!
//! - Pieces are drawn uniformly from the catalog and pre-rotated at random
//! - Rotation turns the 4x4 window; a blocked turn is simply refused
//! - A piece is worth `height + level` points at spawn, one less per tick
//! - Completed rows stay marked for two intervals, then drop out
//! - Every 5 cleared lines raise the level, up to 9
//! - The game ends when a freshly spawned piece does not fit
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use block_party_core::{EngineConfig, GameSession, SimpleRng};
//! use block_party_types::{Action, Mode};
//!
//! let mut game = GameSession::new(EngineConfig::default(), SimpleRng::new(12345)).unwrap();
//! game.reset();
//! assert_eq!(game.mode(), Mode::SelectLevel);
//!
//! game.apply_action(Action::Confirm, Duration::ZERO);
//! game.apply_action(Action::HardDrop, Duration::ZERO);
//!
//! // The piece locks on the first tick, half a second in at level 5.
//! // It was worth 20 + 5 at spawn, less the one point that tick costs.
//! game.advance(Duration::from_millis(500));
//! assert_eq!(game.score(), 24);
//! ```

pub mod board;
pub mod clock;
pub mod config;
pub mod highscore;
pub mod piece;
pub mod rng;
pub mod session;
pub mod snapshot;

pub use block_party_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use clock::GameClock;
pub use config::{ConfigError, EngineConfig};
pub use highscore::{FileHighScoreStore, HighScoreStore, MemoryHighScoreStore};
pub use piece::{rotated_ccw, rotated_cw, Catalog, Piece, Shape, CLASSIC_SHAPES};
pub use rng::{RandomSource, SimpleRng};
pub use session::GameSession;
pub use snapshot::GameSnapshot;
