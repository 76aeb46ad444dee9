//! Game clock - level-driven tick scheduling
//!
//! The clock does not read time itself. Callers pass "now" as a [`Duration`]
//! since some fixed origin (usually session start), which keeps tests exact.
//!
//! Interval at level `l` with max level `m`:
//! - normal: `100ms + (m - l) * 100ms`
//! - soft drop: `max((m - l) * 5ms, 1ms)`
//!
//! Deadlines advance by whole intervals from the previous deadline, so a late
//! poll catches up one tick at a time instead of drifting.

use std::time::Duration;

use crate::types::{
    BASE_INTERVAL_MS, LEVEL_STEP_MS, LINE_CLEAR_PAUSE_TICKS, SOFT_DROP_MIN_MS, SOFT_DROP_STEP_MS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameClock {
    max_level: u8,
    level: u8,
    soft_drop: bool,
    /// Cleared when a piece locks so a held key does not carry into the next piece
    can_speed_up: bool,
    next_deadline: Duration,
}

impl GameClock {
    pub fn new(max_level: u8, level: u8) -> Self {
        Self {
            max_level,
            level: level.min(max_level),
            soft_drop: false,
            can_speed_up: true,
            next_deadline: Duration::ZERO,
        }
    }

    /// Normal interval for a level
    pub fn base_interval(max_level: u8, level: u8) -> Duration {
        let steps = max_level.saturating_sub(level) as u64;
        Duration::from_millis(BASE_INTERVAL_MS + steps * LEVEL_STEP_MS)
    }

    /// Soft drop interval for a level
    pub fn soft_drop_interval(max_level: u8, level: u8) -> Duration {
        let steps = max_level.saturating_sub(level) as u64;
        Duration::from_millis((steps * SOFT_DROP_STEP_MS).max(SOFT_DROP_MIN_MS))
    }

    /// Interval currently in effect
    pub fn interval(&self) -> Duration {
        if self.soft_drop {
            Self::soft_drop_interval(self.max_level, self.level)
        } else {
            Self::base_interval(self.max_level, self.level)
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// Change level. The pending deadline is kept; the new interval applies
    /// from the next tick on.
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(self.max_level);
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.soft_drop
    }

    pub fn can_speed_up(&self) -> bool {
        self.can_speed_up
    }

    pub fn next_deadline(&self) -> Duration {
        self.next_deadline
    }

    /// Back to normal speed with the speed-up latch open
    pub fn reset(&mut self) {
        self.soft_drop = false;
        self.can_speed_up = true;
        self.next_deadline = Duration::ZERO;
    }

    /// Schedule the first tick one interval after `now`
    pub fn restart(&mut self, now: Duration) {
        self.next_deadline = now + self.interval();
    }

    /// Switch to soft drop speed. Ignored (returns false) after a lock until
    /// the key is released.
    pub fn press_soft_drop(&mut self) -> bool {
        if !self.can_speed_up || self.soft_drop {
            return false;
        }
        self.soft_drop = true;
        true
    }

    /// Back to normal speed and re-arm soft drop
    pub fn release_soft_drop(&mut self) {
        self.soft_drop = false;
        self.can_speed_up = true;
    }

    /// A piece locked: drop to normal speed and hold soft drop off until release
    pub fn lock(&mut self) {
        self.soft_drop = false;
        self.can_speed_up = false;
    }

    /// Returns true and schedules the next tick if `now` reached the deadline.
    /// Call repeatedly to catch up after a stall.
    pub fn poll(&mut self, now: Duration) -> bool {
        if now < self.next_deadline {
            return false;
        }
        self.next_deadline += self.interval();
        true
    }

    /// Hold the next tick back so marked rows stay visible for a moment
    pub fn pause_for_line_clear(&mut self) {
        self.next_deadline += self.interval() * LINE_CLEAR_PAUSE_TICKS;
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(crate::types::MAX_LEVEL, crate::types::DEFAULT_LEVEL)
    }
}
