//! Soft drop hold tracking for terminal environments.
//!
//! Many terminals never report key releases, only repeated presses while a
//! key is held. The handler turns the first Down press into `SoftDropOn`,
//! swallows the auto-repeats, and synthesizes `SoftDropOff` once no repeat
//! has arrived for a timeout. As soon as a real release event is seen the
//! timeout is disabled and releases are passed straight through.

use std::time::Duration;

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::map::{handle_key_event, is_soft_drop_key};
use crate::types::Action;

// Longer than the typical initial auto-repeat delay, so a held key does not
// flicker off before the first repeat arrives.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u64 = 500;

/// Tracks the soft drop key between events.
#[derive(Debug, Clone)]
pub struct InputHandler {
    soft_drop_held: bool,
    last_soft_drop: Duration,
    release_events_seen: bool,
    key_release_timeout: Duration,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            soft_drop_held: false,
            last_soft_drop: Duration::ZERO,
            release_events_seen: false,
            key_release_timeout: Duration::from_millis(DEFAULT_KEY_RELEASE_TIMEOUT_MS),
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.key_release_timeout = Duration::from_millis(timeout_ms);
        self
    }

    pub fn key_release_timeout(&self) -> Duration {
        self.key_release_timeout
    }

    pub fn soft_drop_held(&self) -> bool {
        self.soft_drop_held
    }

    /// Translate one key event received at `now`.
    pub fn handle_key_event(&mut self, key: KeyEvent, now: Duration) -> Option<Action> {
        if key.kind == KeyEventKind::Release {
            self.release_events_seen = true;
        }

        let action = handle_key_event(key)?;
        match action {
            Action::SoftDropOn => {
                self.last_soft_drop = now;
                if self.soft_drop_held {
                    None
                } else {
                    self.soft_drop_held = true;
                    Some(Action::SoftDropOn)
                }
            }
            Action::SoftDropOff => {
                self.soft_drop_held = false;
                Some(Action::SoftDropOff)
            }
            other => Some(other),
        }
    }

    /// Synthesize a release if the soft drop key went quiet. Call once per frame.
    pub fn update(&mut self, now: Duration) -> Option<Action> {
        if !self.soft_drop_held || self.release_events_seen {
            return None;
        }
        if now.saturating_sub(self.last_soft_drop) > self.key_release_timeout {
            self.soft_drop_held = false;
            return Some(Action::SoftDropOff);
        }
        None
    }

    /// Whether `key` is the soft drop key, whatever its event kind
    pub fn is_soft_drop(key: &KeyEvent) -> bool {
        is_soft_drop_key(key.code)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
