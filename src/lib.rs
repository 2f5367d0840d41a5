//! Card Crush (workspace facade crate).
//!
//! Re-exports the `card_crush::{core,adapter,term,input,types}` crates under
//! one name and holds the front-end pieces shared by the binary and tests:
//! start-up configuration, progress persistence and the interactive app state.

pub mod app;
pub mod config;
pub mod progress;

pub use card_crush_adapter as adapter;
pub use card_crush_core as core;
pub use card_crush_input as input;
pub use card_crush_term as term;
pub use card_crush_types as types;
