//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the match-resolution engine and the session controller.
//! It has **no dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces the identical board and outcomes
//! - **Testable**: Every rule is a pure function over a [`Grid`]
//! - **Portable**: Runs in the terminal front-end, the remote-play adapter, or headless
//! - **Allocation-light**: Grids and working copies live on the stack
//!
//! # Module Structure
//!
//! - [`grid`]: N×N tile board (N in 6..=11 for play) and the [`CellSet`] bitmask
//! - [`seed`]: grid size and starting board derived from a seed string
//! - [`matcher`]: run detection (longest first, horizontal before vertical)
//! - [`effects`]: default replacement and the six special-tile overlays
//! - [`sweep`]: one row-major resolution pass after a swap
//! - [`session`]: tap state machine, turn limit, score and move log
//! - [`notation`]: move notation, submission memos, history entries
//! - [`levels`]: level list, rewards, unlock progression
//! - [`rng`]: practice seeds and random level picks
//!
//! # Example
//!
//! ```
//! use card_crush_core::{Session, TapOutcome};
//! use card_crush_core::types::Pos;
//!
//! let mut session = Session::new("abc").unwrap();
//! assert_eq!(session.grid().size(), 6);
//!
//! session.tap(Pos::new(0, 0));
//! match session.tap(Pos::new(0, 1)) {
//!     TapOutcome::Swapped(report) => assert_eq!(report.entry.to_string(), "a1r"),
//!     other => panic!("unexpected {other:?}"),
//! }
//! assert_eq!(session.turn(), 1);
//! assert_eq!(session.moves().len(), 1);
//! ```
//!
//! # Timing
//!
//! Resolution is instantaneous here. The front-end shows the swapped board for
//! `SWAP_SETTLE_MS`, then the burn overlay on affected cells for
//! `MATCH_OVERLAY_MS`, using the [`SwapReport`] returned by [`Session::tap`].

pub mod effects;
pub mod grid;
pub mod levels;
pub mod matcher;
pub mod notation;
pub mod rng;
pub mod seed;
pub mod session;
pub mod snapshot;
pub mod sweep;

pub use card_crush_types as types;

// Re-export commonly used types for convenience
pub use effects::resolve_run;
pub use grid::{CellSet, Grid, GridError};
pub use levels::{apply_history, next_available, parse_levels, total_rewards, Level, LevelSummary};
pub use matcher::{find_run_at, has_run, Run};
pub use notation::{parse_memo, GameEntry, MemoError, MoveEntry, NotationError, ParsedMemo, Submission};
pub use rng::SimpleRng;
pub use seed::{board_for_seed, generate_board, grid_size_for_seed, SeedError};
pub use session::{Selection, Session, SwapReport, TapOutcome};
pub use snapshot::SessionSnapshot;
pub use sweep::{resolve_board, Resolution};
