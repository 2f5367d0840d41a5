//! Interactive app state: the session plus everything the terminal front-end
//! layers on top of it (cursor, level navigation, resolution animation,
//! practice seeds, memo submission).
//!
//! No I/O happens here except appending submitted memos to the history file.
//! Time is driven by [`App::tick`] so the animation is testable.

use std::path::PathBuf;

use crate::core::{
    apply_history, next_available, CellSet, GameEntry, Grid, Level, SeedError, Session,
    SessionSnapshot, SimpleRng, TapOutcome,
};
use crate::progress::{append_history, SavedProgress};
use crate::types::{InputAction, Pos, FALLBACK_SEED, MATCH_OVERLAY_MS, SWAP_SETTLE_MS};

/// What is being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    /// Index into the level list.
    Level(usize),
    Custom,
    Practice,
}

/// Resolution animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// The swapped board is on screen, before resolution.
    Settling { remaining_ms: u32 },
    /// Affected cells are covered by the burn overlay.
    Overlay { remaining_ms: u32 },
}

#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub levels: Vec<Level>,
    /// Submitted games used to mark levels completed.
    pub history: Vec<GameEntry>,
    /// Play this seed instead of a level.
    pub seed: Option<String>,
    pub saved: Option<SavedProgress>,
    /// Memos are appended here on submission.
    pub history_path: Option<PathBuf>,
    pub rng_seed: u32,
}

pub struct App {
    session: Session,
    levels: Vec<Level>,
    history: Vec<GameEntry>,
    mode: PlayMode,
    cursor: Pos,
    phase: Phase,
    /// Pre-resolution board shown while animating.
    swapped: Option<Grid>,
    overlay: CellSet,
    message: Option<String>,
    submitted: bool,
    rng: SimpleRng,
    history_path: Option<PathBuf>,
}

impl App {
    /// Pick the starting point: an explicit seed, then the saved level (if
    /// still unlocked) or saved custom seed, then the next available level,
    /// then the fallback seed.
    pub fn new(options: AppOptions) -> Result<Self, SeedError> {
        let AppOptions {
            mut levels,
            history,
            seed,
            saved,
            history_path,
            rng_seed,
        } = options;
        apply_history(&mut levels, &history);

        let (seed, mode) = match (seed, saved) {
            (Some(seed), _) => {
                let mode = level_with_seed(&levels, &seed).map_or(PlayMode::Custom, PlayMode::Level);
                (seed, mode)
            }
            (None, Some(saved)) => match saved.level_id {
                Some(id) => match levels.iter().position(|l| l.id == id && l.unlocked) {
                    Some(index) => (levels[index].seed.clone(), PlayMode::Level(index)),
                    None => default_start(&levels),
                },
                None if !saved.seed.is_empty() => (saved.seed, PlayMode::Custom),
                None => default_start(&levels),
            },
            (None, None) => default_start(&levels),
        };

        Ok(Self {
            session: Session::new(&seed)?,
            levels,
            history,
            mode,
            cursor: Pos::new(0, 0),
            phase: Phase::Idle,
            swapped: None,
            overlay: CellSet::new(),
            message: None,
            submitted: false,
            rng: SimpleRng::new(rng_seed),
            history_path,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access for remote commands; follow up with [`App::after_remote`].
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn title(&self) -> String {
        match self.mode {
            PlayMode::Level(index) => self
                .levels
                .get(index)
                .map(|l| l.name.clone())
                .unwrap_or_default(),
            PlayMode::Custom => "Custom seed".to_string(),
            PlayMode::Practice => "Practice".to_string(),
        }
    }

    /// Cells under the burn overlay, while it is showing.
    pub fn overlay(&self) -> Option<&CellSet> {
        matches!(self.phase, Phase::Overlay { .. }).then_some(&self.overlay)
    }

    pub fn saved_progress(&self) -> SavedProgress {
        SavedProgress {
            level_id: match self.mode {
                PlayMode::Level(index) => self.levels.get(index).map(|l| l.id),
                _ => None,
            },
            seed: self.session.seed().to_string(),
        }
    }

    /// Snapshot for drawing: the session, with the pre-resolution board
    /// substituted while the animation runs.
    pub fn render_snapshot(&self, out: &mut SessionSnapshot) {
        self.session.snapshot_into(out);
        if let Some(grid) = &self.swapped {
            grid.write_u8_grid(&mut out.grid);
        }
    }

    pub fn apply(&mut self, action: InputAction) {
        match action {
            InputAction::CursorLeft => self.move_cursor(0, -1),
            InputAction::CursorRight => self.move_cursor(0, 1),
            InputAction::CursorUp => self.move_cursor(-1, 0),
            InputAction::CursorDown => self.move_cursor(1, 0),
            InputAction::Tap => self.tap(),
            InputAction::Reset => {
                self.session.reset();
                self.restart_view();
            }
            InputAction::NextLevel => self.step_level(1),
            InputAction::PrevLevel => self.step_level(-1),
            InputAction::Practice => {
                let seed = self.rng.practice_seed();
                self.load(&seed, PlayMode::Practice);
            }
            InputAction::Memo => self.submit(),
        }
    }

    /// Advance the animation by `dt_ms`.
    pub fn tick(&mut self, dt_ms: u32) {
        let phase = self.phase;
        self.phase = match phase {
            Phase::Idle => Phase::Idle,
            Phase::Settling { remaining_ms } if remaining_ms > dt_ms => Phase::Settling {
                remaining_ms: remaining_ms - dt_ms,
            },
            Phase::Settling { .. } => Phase::Overlay {
                remaining_ms: MATCH_OVERLAY_MS,
            },
            Phase::Overlay { remaining_ms } if remaining_ms > dt_ms => Phase::Overlay {
                remaining_ms: remaining_ms - dt_ms,
            },
            Phase::Overlay { .. } => {
                self.finish_animation();
                Phase::Idle
            }
        };
    }

    /// Start animating a tap outcome.
    pub fn animate(&mut self, outcome: &TapOutcome) {
        self.finish_animation();
        match outcome {
            TapOutcome::Swapped(report) if !report.resolution.is_noop() => {
                self.swapped = Some(report.swapped.clone());
                self.overlay = report.resolution.affected;
                self.phase = Phase::Settling {
                    remaining_ms: SWAP_SETTLE_MS,
                };
            }
            TapOutcome::Blocked => {
                self.message = Some("No turns left. m: memo, r: retry".to_string());
            }
            _ => {}
        }
    }

    /// Bring the front-end in line after a remote command touched the session.
    pub fn after_remote(&mut self, outcome: Option<&TapOutcome>) {
        match outcome {
            Some(outcome) => self.animate(outcome),
            None => {
                // reset or load
                if let Some(index) = level_with_seed(&self.levels, self.session.seed()) {
                    self.mode = PlayMode::Level(index);
                } else if self.mode != PlayMode::Practice {
                    self.mode = PlayMode::Custom;
                }
                self.restart_view();
            }
        }
    }

    fn finish_animation(&mut self) {
        self.phase = Phase::Idle;
        self.swapped = None;
        self.overlay.clear();
    }

    fn restart_view(&mut self) {
        self.finish_animation();
        self.cursor = self.clamp(self.cursor);
        self.message = None;
        self.submitted = false;
    }

    fn clamp(&self, pos: Pos) -> Pos {
        let max = self.session.grid().size().saturating_sub(1);
        Pos::new(pos.row.min(max), pos.col.min(max))
    }

    fn move_cursor(&mut self, d_row: i8, d_col: i8) {
        let max = self.session.grid().size().saturating_sub(1) as i16;
        let row = (self.cursor.row as i16 + d_row as i16).clamp(0, max);
        let col = (self.cursor.col as i16 + d_col as i16).clamp(0, max);
        self.cursor = Pos::new(row as u8, col as u8);
    }

    fn tap(&mut self) {
        self.message = None;
        let outcome = self.session.tap(self.cursor);
        self.animate(&outcome);
    }

    fn load(&mut self, seed: &str, mode: PlayMode) {
        match self.session.load(seed) {
            Ok(()) => {
                self.mode = mode;
                self.cursor = Pos::new(0, 0);
                self.restart_view();
            }
            Err(e) => self.message = Some(format!("Cannot load seed: {e}")),
        }
    }

    fn step_level(&mut self, delta: isize) {
        if self.levels.is_empty() {
            self.message = Some("No levels available".to_string());
            return;
        }

        let target = match self.mode {
            PlayMode::Level(index) => index as isize + delta,
            _ => next_available(&self.levels)
                .and_then(|l| self.levels.iter().position(|x| x.id == l.id))
                .unwrap_or(0) as isize,
        };
        let Ok(target) = usize::try_from(target) else {
            self.message = Some("Already at the first level".to_string());
            return;
        };
        let Some(level) = self.levels.get(target) else {
            self.message = Some("Already at the last level".to_string());
            return;
        };
        if !level.unlocked {
            self.message = Some(format!("{} is locked", level.name));
            return;
        }
        let seed = level.seed.clone();
        self.load(&seed, PlayMode::Level(target));
    }

    fn submit(&mut self) {
        if !self.session.can_submit() {
            self.message = Some(format!(
                "Play all turns first ({}/{})",
                self.session.turn(),
                self.session.turn_limit()
            ));
            return;
        }

        let memo = self.session.submission().memo();
        if !self.submitted {
            // Left unsubmitted on failure so the next submit retries.
            if let Some(path) = &self.history_path {
                if let Err(e) = append_history(path, &memo) {
                    self.message = Some(format!("History not saved: {e:#}"));
                    return;
                }
            }
            self.submitted = true;
            let signature = format!("local-{}", self.history.len() + 1);
            if let Ok(entry) = GameEntry::from_memo(signature, 0, &memo) {
                self.history.push(entry);
                apply_history(&mut self.levels, &self.history);
            }
        }
        self.message = Some(memo);
    }
}

fn level_with_seed(levels: &[Level], seed: &str) -> Option<usize> {
    levels.iter().position(|l| l.seed == seed)
}

fn default_start(levels: &[Level]) -> (String, PlayMode) {
    match next_available(levels).and_then(|l| level_with_seed(levels, &l.seed)) {
        Some(index) => (levels[index].seed.clone(), PlayMode::Level(index)),
        None => (FALLBACK_SEED.to_string(), PlayMode::Custom),
    }
}
