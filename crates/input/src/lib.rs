//! Terminal input module.
//!
//! Independent of any UI framework: maps `crossterm` key events into
//! [`crate::types::InputAction`]. Cursor state and tap handling live with the
//! caller; this crate only names the player's intent.

pub mod map;

pub use card_crush_types as types;

pub use map::{handle_key_event, should_quit};
