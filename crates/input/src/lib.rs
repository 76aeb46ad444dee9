//! Terminal input module (engine-facing).
//!
//! This module is independent of any UI framework. It maps `crossterm` key
//! events into [`crate::types::Action`] and tracks the soft drop key on
//! terminals that never send key-release events.

pub mod handler;
pub mod map;

pub use block_party_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, handle_key_release, should_quit};
