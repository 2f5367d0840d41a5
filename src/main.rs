//! Terminal Card Crush runner (default binary).
//!
//! Uses crossterm for input and a custom framebuffer-based renderer.
//! When the remote-play adapter is enabled, its commands are applied here,
//! on the same thread as keyboard input.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};

use card_crush::adapter::Adapter;
use card_crush::app::{App, AppOptions};
use card_crush::config::AppConfig;
use card_crush::core::{parse_levels, GameEntry, Level, SessionSnapshot};
use card_crush::input::{handle_key_event, should_quit};
use card_crush::progress::{load_history, load_progress, read_levels, save_progress};
use card_crush::term::{
    AdapterStatusView, FrameBuffer, GameView, HudView, TerminalRenderer, Viewport,
};
use card_crush::types::FALLBACK_SEED;

/// Frame period; also the animation step.
const FRAME_MS: u32 = 16;

fn main() -> Result<()> {
    let config = AppConfig::from_env();

    let levels = load_levels(&config);
    let history = load_history_or_warn(&config);
    let saved = load_progress(&config.progress_path);

    let mut app = App::new(AppOptions {
        levels,
        history,
        seed: config.seed.clone(),
        saved,
        history_path: config.history_path.clone(),
        rng_seed: clock_seed(),
    })
    .context("start session")?;

    let mut adapter = match Adapter::start_from_env() {
        Ok(adapter) => adapter,
        Err(e) => {
            eprintln!("[CardCrush] Remote play unavailable: {:#}", e);
            None
        }
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut app, adapter.as_mut());

    // Always try to restore terminal state.
    let _ = term.exit();

    if let Err(e) = save_progress(&config.progress_path, &app.saved_progress()) {
        eprintln!("[CardCrush] {:#}", e);
    }
    result
}

fn run(term: &mut TerminalRenderer, app: &mut App, mut adapter: Option<&mut Adapter>) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = SessionSnapshot::default();

    let frame = Duration::from_millis(FRAME_MS as u64);
    let mut last_frame = Instant::now();

    loop {
        // Remote commands.
        if let Some(adapter) = adapter.as_deref_mut() {
            while let Some(inbound) = adapter.try_recv() {
                if let Some(applied) = adapter.handle(inbound, app.session_mut(), &mut snap) {
                    app.after_remote(applied.tap_outcome());
                }
            }
        }

        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        app.render_snapshot(&mut snap);
        let title = app.title();
        let status = adapter.as_deref().map(|a| {
            let stats = a.stats();
            AdapterStatusView {
                enabled: true,
                client_count: stats.client_count(),
                controller_id: stats.controller_id().map(|id| id as usize),
                streaming_count: stats.streaming_count(),
            }
        });
        let hud = HudView {
            overlay: app.overlay(),
            message: app.message(),
            adapter: status.as_ref(),
            ..HudView::new(&title, app.cursor())
        };
        view.render_into(&snap, &hud, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next frame.
        let timeout = frame.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        app.apply(action);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        let elapsed = last_frame.elapsed();
        if elapsed >= frame {
            last_frame = Instant::now();
            app.tick(elapsed.as_millis().min(u32::MAX as u128) as u32);
        }
    }
}

fn load_levels(config: &AppConfig) -> Vec<Level> {
    let levels = match read_levels(&config.levels_path) {
        Ok(levels) => levels,
        Err(e) => {
            eprintln!("[CardCrush] {:#}", e);
            Vec::new()
        }
    };
    if levels.is_empty() {
        eprintln!("[CardCrush] No levels loaded, using the fallback seed");
        return parse_levels(FALLBACK_SEED);
    }
    levels
}

fn load_history_or_warn(config: &AppConfig) -> Vec<GameEntry> {
    let Some(path) = config.history_path.as_deref() else {
        return Vec::new();
    };
    load_history(path).unwrap_or_else(|e| {
        eprintln!("[CardCrush] {:#}", e);
        Vec::new()
    })
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(0)
}
