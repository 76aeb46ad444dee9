//! Game session - the state machine that owns one player's game
//!
//! A session is created once and then cycles through
//! `Idle -> SelectLevel -> Play -> GameOver -> SelectLevel -> ...`.
//! It consumes [`Action`]s and clock time, and produces [`GameEvent`]s the
//! driver drains after each batch. Nothing in here blocks or sleeps: the line
//! clear pause is a pushed-back deadline while the marked rows stay on the
//! board.

use std::time::Duration;

use log::{debug, info, warn};

use crate::board::Board;
use crate::clock::GameClock;
use crate::config::{ConfigError, EngineConfig};
use crate::highscore::HighScoreStore;
use crate::piece::{Catalog, Piece};
use crate::rng::{RandomSource, SimpleRng};
use crate::snapshot::GameSnapshot;
use crate::types::{Action, GameEvent, Mode, Region, SoundCue, GAME_OVER_VARIANTS};

#[derive(Debug)]
pub struct GameSession<R: RandomSource = SimpleRng> {
    config: EngineConfig,
    catalog: Catalog,
    board: Board,
    current: Piece,
    next: Piece,
    clock: GameClock,
    rng: R,
    store: Option<Box<dyn HighScoreStore>>,
    mode: Mode,
    score: u32,
    /// `None` when there is no store to keep it in
    high_score: Option<u32>,
    level: u8,
    line_count: u32,
    /// Bonus for the falling piece; every tick takes one point off
    figure_score: u32,
    sound: bool,
    quit: bool,
    /// Rows are marked on the board and wait for the next tick (or move) to sweep them
    clear_pending: bool,
    events: Vec<GameEvent>,
}

impl<R: RandomSource> GameSession<R> {
    /// Create a session with the classic pieces. Starts `Idle`; call
    /// [`reset`](Self::reset) to begin.
    pub fn new(config: EngineConfig, rng: R) -> Result<Self, ConfigError> {
        Self::with_catalog(config, Catalog::classic(), rng)
    }

    pub fn with_catalog(
        config: EngineConfig,
        catalog: Catalog,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.width, config.height)?;
        let (x, y) = Piece::spawn_anchor(&board);
        // Placeholders until reset draws real pieces; keeps the rng untouched.
        let placeholder = Piece::new(catalog.shapes()[0], x, y);

        Ok(Self {
            config,
            board,
            current: placeholder,
            next: placeholder,
            clock: GameClock::new(config.max_level, config.default_level),
            rng,
            store: None,
            mode: Mode::Idle,
            score: 0,
            high_score: None,
            level: config.default_level,
            line_count: 0,
            figure_score: 0,
            sound: true,
            quit: false,
            clear_pending: false,
            events: Vec::with_capacity(16),
            catalog,
        })
    }

    /// Attach persistence. Without a store no high score is tracked.
    pub fn with_high_score_store(mut self, store: Box<dyn HighScoreStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Start a fresh round: empty board, counters zeroed, level back to the
    /// default, new pieces drawn. Lands in `SelectLevel`.
    pub fn reset(&mut self) {
        self.board.reset();
        self.clock.reset();
        self.clear_pending = false;
        self.high_score = self.store.as_ref().map(|store| store.load());
        self.score = 0;
        self.line_count = 0;
        self.level = self.config.default_level;
        self.clock.set_level(self.level);
        self.mode = Mode::SelectLevel;

        self.next = Piece::spawn(&self.catalog, &mut self.rng, &self.board);

        self.events.push(GameEvent::Redraw(Region::Full));
        self.cue(SoundCue::NewGame);
        self.push_score();
        info!(
            "new game: {}x{} board, level {}, high score {:?}",
            self.board.width(),
            self.board.height(),
            self.level,
            self.high_score
        );

        if !self.spawn_next() {
            self.enter_game_over();
        }
    }

    /// Apply one player intent at time `now`. Returns true if anything changed.
    pub fn apply_action(&mut self, action: Action, now: Duration) -> bool {
        match action {
            Action::Quit => {
                self.quit = true;
                self.events.push(GameEvent::Quit);
                info!("quit requested in {}", self.mode.as_str());
                return true;
            }
            Action::ToggleSound => {
                self.sound = !self.sound;
                self.events.push(GameEvent::Redraw(Region::Score));
                debug!("sound {}", if self.sound { "on" } else { "off" });
                return true;
            }
            Action::SoftDropOff => {
                let was_held = self.clock.is_soft_dropping() || !self.clock.can_speed_up();
                self.clock.release_soft_drop();
                return was_held;
            }
            _ => {}
        }

        match self.mode {
            Mode::Idle => false,
            Mode::SelectLevel => match action {
                Action::MoveLeft => self.select_level(self.level.saturating_sub(1)),
                Action::MoveRight => self.select_level(self.level.saturating_add(1)),
                Action::Confirm => {
                    self.start_play(now);
                    true
                }
                _ => false,
            },
            Mode::Play => self.play_action(action),
            Mode::GameOver => match action {
                Action::Confirm => {
                    self.reset();
                    true
                }
                _ => false,
            },
        }
    }

    /// Run every tick whose deadline has passed by `now`. Returns the number of ticks.
    pub fn advance(&mut self, now: Duration) -> u32 {
        let mut ticks = 0;
        while self.mode == Mode::Play && self.clock.poll(now) {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    /// Take all events produced since the last drain, oldest first
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    fn select_level(&mut self, level: u8) -> bool {
        let level = level.min(self.config.max_level);
        if level == self.level {
            return false;
        }
        self.level = level;
        self.clock.set_level(level);
        self.events.push(GameEvent::LevelChanged(level));
        self.events.push(GameEvent::Redraw(Region::Board));
        true
    }

    fn start_play(&mut self, now: Duration) {
        self.mode = Mode::Play;
        self.figure_score = self.config.height as u32 + self.level as u32;
        self.clock.restart(now);
        self.events.push(GameEvent::Redraw(Region::Full));
        info!("play started at level {}", self.level);
    }

    fn play_action(&mut self, action: Action) -> bool {
        if self.clear_pending
            && matches!(
                action,
                Action::MoveLeft | Action::MoveRight | Action::HardDrop | Action::Rotate
            )
        {
            self.finish_line_clear();
        }

        let changed = match action {
            Action::MoveLeft => self.current.try_shift(&self.board, -1, 0),
            Action::MoveRight => self.current.try_shift(&self.board, 1, 0),
            Action::HardDrop => self.current.drop_to_floor(&self.board),
            Action::Rotate => self.current.try_rotate_ccw(&self.board),
            Action::SoftDropOn => return self.clock.press_soft_drop(),
            _ => false,
        };

        if changed {
            self.events.push(GameEvent::Redraw(Region::Board));
        }
        changed
    }

    fn tick(&mut self) {
        if self.clear_pending {
            self.finish_line_clear();
        }

        // Every tick costs a point, including the one that locks.
        self.figure_score = self.figure_score.saturating_sub(1);
        if self.current.try_shift(&self.board, 0, -1) {
            self.events.push(GameEvent::Redraw(Region::Board));
            return;
        }

        self.lock_current();
    }

    fn lock_current(&mut self) {
        self.clock.lock();
        if self.board.place(&self.current) {
            self.score = self.score.saturating_add(self.figure_score);
        } else {
            warn!(
                "piece at ({}, {}) overlaps the board, dropped without score",
                self.current.x, self.current.y
            );
        }

        if let Some(high) = self.high_score.as_mut() {
            if self.score > *high {
                *high = self.score;
            }
        }
        debug!(
            "locked {:?} at ({}, {}) for {} points",
            self.current.kind(),
            self.current.x,
            self.current.y,
            self.figure_score
        );
        self.push_score();
        self.events.push(GameEvent::Redraw(Region::Score));
        self.events.push(GameEvent::Redraw(Region::Board));
        self.cue(SoundCue::Lock);

        if !self.spawn_next() {
            self.enter_game_over();
            return;
        }

        let rows = self.board.mark_full_rows() as u32;
        if rows > 0 {
            self.cue(SoundCue::LineClear);
            self.clock.pause_for_line_clear();
            self.clear_pending = true;
            self.line_count += rows;
            self.events.push(GameEvent::LinesCleared {
                rows,
                total: self.line_count,
            });
            debug!("{} rows marked, {} total", rows, self.line_count);
            self.raise_level();
        }
    }

    fn finish_line_clear(&mut self) {
        self.board.sweep_marked_rows();
        self.clear_pending = false;
        self.events.push(GameEvent::Redraw(Region::Board));
    }

    /// Promote `next` to current and draw a new `next`. Returns false if the
    /// new current piece is blocked.
    fn spawn_next(&mut self) -> bool {
        let fresh = Piece::spawn(&self.catalog, &mut self.rng, &self.board);
        self.current = std::mem::replace(&mut self.next, fresh);
        let (x, y) = Piece::spawn_anchor(&self.board);
        self.current.x = x;
        self.current.y = y;
        self.figure_score = self.config.height as u32 + self.level as u32;
        self.events.push(GameEvent::Redraw(Region::Next));
        self.board.fits(&self.current)
    }

    fn raise_level(&mut self) {
        let target = level_for_lines(
            self.line_count,
            self.config.lines_per_level,
            self.config.max_level,
        );
        if target > self.level {
            self.level = target;
            self.clock.set_level(target);
            self.events.push(GameEvent::LevelChanged(target));
            self.events.push(GameEvent::Redraw(Region::Score));
            info!("level up to {} after {} lines", target, self.line_count);
        }
    }

    fn enter_game_over(&mut self) {
        self.mode = Mode::GameOver;
        self.clock.reset();
        self.clear_pending = false;

        let variant = self.rng.next_range(GAME_OVER_VARIANTS as u32) as u8;
        self.cue(SoundCue::GameOver(variant));

        if let Some(store) = self.store.as_mut() {
            if self.score > store.load() {
                store.save(self.score);
            }
        }

        self.events.push(GameEvent::GameOver {
            score: self.score,
            high_score: self.high_score,
        });
        self.events.push(GameEvent::Redraw(Region::Full));
        info!(
            "game over: score {}, lines {}, level {}",
            self.score, self.line_count, self.level
        );
    }

    fn cue(&mut self, cue: SoundCue) {
        if self.sound {
            self.events.push(GameEvent::Sound(cue));
        }
    }

    fn push_score(&mut self) {
        self.events.push(GameEvent::ScoreChanged {
            score: self.score,
            high_score: self.high_score,
        });
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> Option<u32> {
        self.high_score
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.line_count
    }

    pub fn figure_score(&self) -> u32 {
        self.figure_score
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound
    }

    /// True once Quit was applied
    pub fn is_finished(&self) -> bool {
        self.quit
    }

    pub fn has_pending_clear(&self) -> bool {
        self.clear_pending
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for drivers and test setups
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn current(&self) -> &Piece {
        &self.current
    }

    pub fn next(&self) -> &Piece {
        &self.next
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// When the next tick is due, if the session is playing
    pub fn next_deadline(&self) -> Option<Duration> {
        (self.mode == Mode::Play).then(|| self.clock.next_deadline())
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.width = self.board.width();
        out.height = self.board.height();
        out.board.clear();
        out.board.extend_from_slice(self.board.cells());
        out.active = (self.mode != Mode::Idle).then_some(self.current);
        out.ghost_row = (self.mode == Mode::Play).then(|| self.current.ghost_row(&self.board));
        out.next = self.next.shape;
        out.score = self.score;
        out.high_score = self.high_score;
        out.level = self.level;
        out.lines = self.line_count;
        out.mode = self.mode;
        out.sound = self.sound;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snap = GameSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }
}

/// Level earned by a line count, capped at `max_level`
fn level_for_lines(lines: u32, lines_per_level: u32, max_level: u8) -> u8 {
    (lines / lines_per_level.max(1)).min(max_level as u32) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscore::MemoryHighScoreStore;
    use crate::types::{Cell, PieceKind};

    fn session() -> GameSession {
        GameSession::new(EngineConfig::default(), SimpleRng::new(7)).unwrap()
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_level_for_lines() {
        assert_eq!(level_for_lines(24, 5, 9), 4);
        assert_eq!(level_for_lines(25, 5, 9), 5);
        assert_eq!(level_for_lines(500, 5, 9), 9);
    }

    #[test]
    fn test_raise_level_never_lowers() {
        let mut s = session();
        s.reset();
        assert_eq!(s.level(), 5);
        s.line_count = 24;
        s.raise_level();
        assert_eq!(s.level(), 5);
        s.line_count = 30;
        s.raise_level();
        assert_eq!(s.level(), 6);
        assert_eq!(s.clock().level(), 6);
    }

    #[test]
    fn test_idle_ignores_gameplay() {
        let mut s = session();
        assert_eq!(s.mode(), Mode::Idle);
        assert!(!s.apply_action(Action::Confirm, ms(0)));
        assert!(!s.apply_action(Action::MoveLeft, ms(0)));
        assert_eq!(s.advance(ms(10_000)), 0);
        assert_eq!(s.drain_events().count(), 0);
    }

    #[test]
    fn test_select_level_clamps() {
        let mut s = session();
        s.reset();
        for _ in 0..20 {
            s.apply_action(Action::MoveRight, ms(0));
        }
        assert_eq!(s.level(), 9);
        assert!(!s.apply_action(Action::MoveRight, ms(0)));
        for _ in 0..20 {
            s.apply_action(Action::MoveLeft, ms(0));
        }
        assert_eq!(s.level(), 0);
        assert!(!s.apply_action(Action::MoveLeft, ms(0)));
    }

    #[test]
    fn test_muted_session_emits_no_cues() {
        let mut s = session();
        s.apply_action(Action::ToggleSound, ms(0));
        assert!(!s.sound_enabled());
        s.reset();
        assert!(s
            .drain_events()
            .all(|e| !matches!(e, GameEvent::Sound(_))));
    }

    #[test]
    fn test_reset_loads_high_score() {
        let store = MemoryHighScoreStore::new(321);
        let mut s = session().with_high_score_store(Box::new(store));
        assert_eq!(s.high_score(), None);
        s.reset();
        assert_eq!(s.high_score(), Some(321));
    }

    #[test]
    fn test_no_store_keeps_no_high_score() {
        let mut s = session();
        s.reset();
        s.apply_action(Action::Confirm, ms(0));
        s.apply_action(Action::HardDrop, ms(0));
        s.advance(ms(500));
        assert_eq!(s.score(), 24);
        assert_eq!(s.high_score(), None);
    }

    #[test]
    fn test_overlapping_lock_scores_nothing() {
        let mut s = session();
        s.reset();
        s.apply_action(Action::Confirm, ms(0));
        s.drain_events().for_each(drop);

        // A stack cell inside the falling piece, as an early sweep can leave it.
        let (x, y, _) = s.current().cells()[0];
        assert!(s.board_mut().set(x, y, Cell::Filled(PieceKind::O)));
        assert!(!s.board().fits(s.current()));
        let before = s.board().clone();

        s.lock_current();
        assert_eq!(s.score(), 0);
        assert_eq!(s.board().get(x, y), Some(Cell::Filled(PieceKind::O)));
        let placed = s
            .board()
            .cells()
            .iter()
            .zip(before.cells())
            .filter(|(now, was)| now != was)
            .count();
        assert_eq!(placed, 0);
    }
}
