//! Block Party (workspace facade crate).
//!
//! Re-exports the member crates as `block_party::{core,input,term,types}` and
//! holds the binary-side plumbing: environment configuration and logging.

pub mod app_config;
pub mod logging;

pub use block_party_core as core;
pub use block_party_input as input;
pub use block_party_term as term;
pub use block_party_types as types;

pub use app_config::AppConfig;
