//! GameView: maps a `SessionSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::SessionSnapshot;
use crate::fb::{u32_digits, CellStyle, FrameBuffer, Rgb};
use crate::palette::{tile_style, BOARD_BG};
use crate::types::{GameStatus, GRID_SIZE};

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

/// What the side panel shows about the TCP adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterStatusView {
    pub client_count: u16,
    pub has_controller: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const GAP_X: u16 = 1;

const LABEL: CellStyle = CellStyle::new(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0)).bold();
const VALUE: CellStyle = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
const DIM: CellStyle = CellStyle::new(Rgb::new(120, 120, 120), Rgb::new(0, 0, 0));

/// A lightweight terminal renderer for the 2048 grid.
pub struct GameView {
    /// Tile width in terminal columns.
    tile_w: u16,
    /// Tile height in terminal rows.
    tile_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 6x3 fits "2048" with padding and keeps tiles roughly square.
        Self {
            tile_w: 6,
            tile_h: 3,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(tile_w: u16, tile_h: u16) -> Self {
        Self {
            tile_w: tile_w.max(1),
            tile_h: tile_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Outer size of the bordered grid, in terminal cells.
    pub fn frame_size(&self) -> (u16, u16) {
        let n = GRID_SIZE as u16;
        let inner_w = n * self.tile_w + (n - 1) * GAP_X;
        let inner_h = n * self.tile_h;
        (inner_w + 2, inner_h + 2)
    }

    /// Render into an existing framebuffer (reused across frames).
    pub fn render_into(
        &self,
        snap: &SessionSnapshot,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let (frame_w, frame_h) = self.frame_size();
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };

        let board = CellStyle::new(Rgb::new(0x77, 0x6e, 0x65), BOARD_BG);
        fb.fill_rect(start_x + 1, start_y + 1, frame_w - 2, frame_h - 2, ' ', board);
        self.draw_border(fb, start_x, start_y, frame_w, frame_h);

        for (row, cells) in snap.grid.iter().enumerate() {
            for (col, &value) in cells.iter().enumerate() {
                self.draw_tile(fb, start_x, start_y, row as u16, col as u16, value);
            }
        }

        self.draw_side_panel(fb, snap, adapter, viewport, start_x + frame_w, start_y);

        match snap.status {
            GameStatus::Active => {}
            GameStatus::Won => self.draw_overlay(fb, start_x, start_y, frame_w, frame_h, "YOU WIN!"),
            GameStatus::Lost => self.draw_overlay(fb, start_x, start_y, frame_w, frame_h, "GAME OVER"),
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &SessionSnapshot,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, adapter, viewport, &mut fb);
        fb
    }

    /// Top-left corner of a tile.
    pub fn tile_origin(&self, start_x: u16, start_y: u16, row: u16, col: u16) -> (u16, u16) {
        (
            start_x + 1 + col * (self.tile_w + GAP_X),
            start_y + 1 + row * self.tile_h,
        )
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
        let style = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_tile(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, row: u16, col: u16, value: u32) {
        let (px, py) = self.tile_origin(start_x, start_y, row, col);
        let style = tile_style(value);
        fb.fill_rect(px, py, self.tile_w, self.tile_h, ' ', style);

        if value == 0 {
            return;
        }
        let mut digits = [0u8; 10];
        let n = u32_digits(value, &mut digits) as u16;
        let tx = px + self.tile_w.saturating_sub(n) / 2;
        let ty = py + self.tile_h / 2;
        fb.put_u32(tx, ty, value, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
        frame_right: u16,
        start_y: u16,
    ) {
        let panel_x = frame_right.saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let mut y = start_y;
        fb.put_str(panel_x, y, "STATUS", LABEL);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, status_label(snap.status), VALUE);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "MOVES", LABEL);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.moves, VALUE);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "BEST", LABEL);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.max_tile, VALUE);
        fb.put_char(panel_x + 6, y, '/', DIM);
        fb.put_u32(panel_x + 7, y, snap.win_tile, DIM);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "AI", LABEL);
        y = y.saturating_add(1);
        match adapter {
            Some(st) => {
                fb.put_str(panel_x, y, "ON", VALUE);
                fb.put_u32(panel_x + 3, y, st.client_count as u32, DIM);
                fb.put_str(panel_x + 6, y, if st.has_controller { "ctrl" } else { "-" }, DIM);
            }
            None => fb.put_str(panel_x, y, "OFF", VALUE),
        }
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "arrows/wasd", DIM);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, "r restart", DIM);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, "q quit", DIM);
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, frame_w: u16, frame_h: u16, text: &str) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
        fb.put_str(x, mid_y, text, style);

        let hint = "r: restart";
        let hx = start_x.saturating_add(frame_w.saturating_sub(hint.len() as u16) / 2);
        fb.put_str(hx, mid_y.saturating_add(1), hint, style);
    }
}

fn status_label(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Active => "playing",
        GameStatus::Won => "won",
        GameStatus::Lost => "lost",
    }
}
