//! GameView: maps a [`SessionSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{CellSet, MoveEntry, SessionSnapshot};
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{Pos, TileKind};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterStatusView {
    pub enabled: bool,
    pub client_count: u16,
    pub controller_id: Option<usize>,
    pub streaming_count: u16,
}

/// Front-end state drawn next to the board.
#[derive(Debug, Clone, Copy)]
pub struct HudView<'a> {
    pub level_name: &'a str,
    pub cursor: Pos,
    /// Cells under the burn overlay, while it is showing.
    pub overlay: Option<&'a CellSet>,
    /// One-line status (memo, errors, level changes).
    pub message: Option<&'a str>,
    pub adapter: Option<&'a AdapterStatusView>,
}

impl<'a> HudView<'a> {
    pub fn new(level_name: &'a str, cursor: Pos) -> Self {
        Self {
            level_name,
            cursor,
            overlay: None,
            message: None,
            adapter: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Number of recent moves listed in the side panel.
const RECENT_MOVES: usize = 6;

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// Terminal renderer for the card grid.
pub struct GameView {
    /// Tile width in terminal columns (3-letter tag plus cursor brackets).
    cell_w: u16,
    /// Tile height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            cell_w: 5,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &SessionSnapshot,
        hud: &HudView<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let n = snap.grid_size as u16;
        let board_w = n * self.cell_w;
        let board_h = n * self.cell_h;
        let frame_w = board_w + 2;
        let frame_h = board_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w + PANEL_MIN_W) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };

        fb.fill_rect(
            start_x + 1,
            start_y + 1,
            board_w,
            board_h,
            ' ',
            CellStyle::new(BOARD_BG, BOARD_BG),
        );
        fb.draw_box(
            start_x,
            start_y,
            frame_w,
            frame_h,
            CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG),
        );

        for row in 0..snap.grid_size {
            for col in 0..snap.grid_size {
                let pos = Pos::new(row, col);
                let Some(kind) = snap.code_at(pos).and_then(TileKind::from_code) else {
                    continue;
                };
                let burning = hud.overlay.map_or(false, |set| set.contains(pos));
                let selected = snap.selected == Some(pos);
                let under_cursor = hud.cursor == pos;
                self.draw_tile(fb, start_x, start_y, pos, kind, burning, selected, under_cursor);
            }
        }

        self.draw_side_panel(fb, snap, hud, viewport, start_x + frame_w, start_y);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &SessionSnapshot, hud: &HudView<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, hud, viewport, &mut fb);
        fb
    }

    /// Screen column/row of the top-left corner of `pos`'s tile.
    pub fn tile_origin(&self, start_x: u16, start_y: u16, pos: Pos) -> (u16, u16) {
        (
            start_x + 1 + pos.col as u16 * self.cell_w,
            start_y + 1 + pos.row as u16 * self.cell_h,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_tile(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        pos: Pos,
        kind: TileKind,
        burning: bool,
        selected: bool,
        under_cursor: bool,
    ) {
        let (px, py) = self.tile_origin(start_x, start_y, pos);

        let mut style = CellStyle::new(tile_color(kind), BOARD_BG);
        if kind.is_special() {
            style = style.bold();
        }
        if selected {
            style.bg = Rgb::new(90, 90, 140);
        }
        if under_cursor {
            style.bg = Rgb::new(70, 70, 70);
            style.bold = true;
        }

        if burning {
            let burn = CellStyle::new(Rgb::new(255, 140, 0), style.bg).bold();
            fb.fill_rect(px, py, self.cell_w, self.cell_h, '▒', burn);
            return;
        }

        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);
        let label_y = py + (self.cell_h - 1) / 2;
        let tag = kind.tag();
        let text_w = (tag.len() as u16).min(self.cell_w);
        let label_x = px + (self.cell_w - text_w) / 2;
        for (i, ch) in tag.chars().take(text_w as usize).enumerate() {
            fb.put_char(label_x + i as u16, label_y, ch, style);
        }
        if under_cursor && self.cell_w >= text_w + 2 {
            fb.put_char(px, label_y, '[', style);
            fb.put_char(px + self.cell_w - 1, label_y, ']', style);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        hud: &HudView<'_>,
        viewport: Viewport,
        frame_right: u16,
        start_y: u16,
    ) {
        let panel_x = frame_right.saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        let dim = value.dim();

        let mut y = start_y;
        fb.put_str(panel_x, y, hud.level_name, label);
        y += 2;

        fb.put_str(panel_x, y, "TURN", label);
        y += 1;
        let x = fb.put_u32(panel_x, y, snap.turn, value);
        let x = fb.put_str(x, y, "/", value);
        fb.put_u32(x, y, snap.turn_limit, value);
        y += 2;

        fb.put_str(panel_x, y, "POINTS", label);
        y += 1;
        fb.put_u32(panel_x, y, snap.score, value);
        y += 2;

        fb.put_str(panel_x, y, "MOVES", label);
        y += 1;
        if snap.moves.is_empty() {
            fb.put_str(panel_x, y, "-", dim);
            y += 1;
        }
        let skip = snap.moves.len().saturating_sub(RECENT_MOVES);
        for entry in snap.moves.iter().skip(skip) {
            put_move(fb, panel_x, y, entry, value);
            y += 1;
        }
        y += 1;

        if snap.can_submit {
            let ready = CellStyle::new(Rgb::new(120, 230, 120), PANEL_BG).bold();
            fb.put_str(panel_x, y, "You can now submit!", ready);
            y += 1;
            fb.put_str(panel_x, y, "m: memo  r: retry", dim);
            y += 2;
        }

        if let Some(st) = hud.adapter {
            fb.put_str(panel_x, y, "AI", label);
            y += 1;
            if st.enabled {
                let x = fb.put_str(panel_x, y, "C ", value);
                let x = fb.put_u32(x, y, st.client_count as u32, value);
                let x = fb.put_str(x, y, " S ", value);
                let x = fb.put_u32(x, y, st.streaming_count as u32, value);
                let x = fb.put_str(x, y, " CTRL ", value);
                match st.controller_id {
                    Some(id) => fb.put_u32(x, y, id as u32, value),
                    None => fb.put_str(x, y, "-", value),
                };
            } else {
                fb.put_str(panel_x, y, "OFF", value);
            }
            y += 2;
        }

        if let Some(msg) = hud.message {
            let bottom = viewport.height.saturating_sub(1).max(y);
            fb.put_str(panel_x, bottom, msg, CellStyle::new(Rgb::new(240, 220, 80), PANEL_BG));
        }
    }
}

/// Notation of `entry` (`b3r`), written without going through `String`.
fn put_move(fb: &mut FrameBuffer, x: u16, y: u16, entry: &MoveEntry, style: CellStyle) {
    fb.put_char(x, y, (b'a' + entry.from.col) as char, style);
    let x = fb.put_u32(x.saturating_add(1), y, entry.from.row as u32 + 1, style);
    fb.put_char(x, y, entry.dir.as_char(), style);
}

/// Room reserved to the right of the board when centering.
const PANEL_MIN_W: u16 = 24;

/// Foreground color per face; specials get saturated colors.
pub fn tile_color(kind: TileKind) -> Rgb {
    match kind {
        TileKind::Air => Rgb::new(200, 230, 255),
        TileKind::Bonk => Rgb::new(240, 220, 80),
        TileKind::Fire => Rgb::new(235, 80, 60),
        TileKind::Jito => Rgb::new(120, 230, 120),
        TileKind::Thunder => Rgb::new(200, 120, 240),
        TileKind::Water => Rgb::new(80, 150, 240),
        _ => Rgb::new(170, 170, 180),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specials_have_distinct_colors() {
        let plain = tile_color(TileKind::Inu);
        for kind in TileKind::ALL.iter().copied().filter(|k| k.is_special()) {
            assert_ne!(tile_color(kind), plain, "{kind:?}");
        }
    }

    #[test]
    fn tile_origin_steps_by_cell_size() {
        let view = GameView::new(4, 1);
        assert_eq!(view.tile_origin(10, 5, Pos::new(0, 0)), (11, 6));
        assert_eq!(view.tile_origin(10, 5, Pos::new(2, 3)), (23, 8));
    }
}
