//! Terminal "game renderer" module.
//!
//! A small rendering layer for terminal play. It avoids widget/layout
//! frameworks and renders into a plain framebuffer that is diffed and flushed
//! to the terminal.
//!
//! Goals:
//! - Keep `core` deterministic and free of I/O
//! - Draw the card grid with tags wide enough to read (`air`, `fre`, `wtr`, ...)
//! - Show the burn overlay on affected cells without touching session state

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use card_crush_core as core;
pub use card_crush_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{tile_color, AdapterStatusView, AnchorY, GameView, HudView, Viewport};
pub use renderer::{changed_spans, encode_diff_into, encode_full_into, DirtySpan, TerminalRenderer};
