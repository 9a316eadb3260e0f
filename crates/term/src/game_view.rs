//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use std::net::SocketAddr;

use crate::core::GameSnapshot;
use crate::fb::{FrameBuffer, Glyph, Rgb, Style};
use crate::types::{TileKind, TileType};

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const FALLBACK_TILE: Rgb = Rgb::new(160, 160, 160);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Network surface status shown in the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerStatusView {
    pub addr: SocketAddr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TileStyle {
    sign: char,
    color: Rgb,
}

/// Terminal look of every tile kind, derived from the configured vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    tiles: Vec<TileStyle>,
}

impl Palette {
    pub fn from_tiles(tiles: &[TileType]) -> Self {
        let tiles = tiles
            .iter()
            .map(|t| TileStyle {
                sign: t.sign.chars().next().unwrap_or('?'),
                color: Rgb::from_hex(&t.color).unwrap_or(FALLBACK_TILE),
            })
            .collect();
        Self { tiles }
    }

    fn style(&self, kind: TileKind) -> TileStyle {
        self.tiles.get(kind.index()).copied().unwrap_or(TileStyle {
            sign: '?',
            color: FALLBACK_TILE,
        })
    }
}

/// Where the board frame sits inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    start_x: u16,
    start_y: u16,
    frame_w: u16,
    frame_h: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// A lightweight terminal renderer for the cluster board.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    fn layout(&self, board_w: u16, board_h: u16, viewport: Viewport) -> Layout {
        let frame_w = board_w.saturating_mul(self.cell_w).saturating_add(2);
        let frame_h = board_h.saturating_add(2);
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };
        Layout {
            // Leave room for the side panel on the right.
            start_x: viewport.width.saturating_sub(frame_w + 20) / 2,
            start_y,
            frame_w,
            frame_h,
        }
    }

    /// Board cell under terminal position `(column, row)`, if any.
    pub fn board_cell_at(
        &self,
        snap: &GameSnapshot,
        viewport: Viewport,
        column: u16,
        row: u16,
    ) -> Option<(u16, u16)> {
        let layout = self.layout(snap.width, snap.height, viewport);
        let dx = column.checked_sub(layout.start_x + 1)?;
        let dy = row.checked_sub(layout.start_y + 1)?;
        let (x, y) = (dx / self.cell_w, dy);
        (x < snap.width && y < snap.height).then_some((x, y))
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        palette: &Palette,
        server: Option<&ServerStatusView>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Glyph::default());

        let layout = self.layout(snap.width, snap.height, viewport);
        self.draw_border(fb, layout, Style::fg(Rgb::new(200, 200, 200)));

        for (y, row) in snap.rows().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let is_cursor = snap.cursor.x as usize == x && snap.cursor.y as usize == y;
                self.draw_board_cell(fb, layout, palette, x as u16, y as u16, *cell, is_cursor);
            }
        }

        self.draw_side_panel(fb, snap, server, viewport, layout);

        if snap.game_over {
            self.draw_overlay_text(fb, layout, 0, "GAME OVER");
            self.draw_overlay_text(fb, layout, 1, "r restart  n new");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &GameSnapshot,
        palette: &Palette,
        server: Option<&ServerStatusView>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, palette, server, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, layout: Layout, style: Style) {
        let Layout {
            start_x: x,
            start_y: y,
            frame_w: w,
            frame_h: h,
        } = layout;
        if w < 2 || h < 2 {
            return;
        }

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

    #[allow(clippy::too_many_arguments)]
    fn draw_board_cell(
        &self,
        fb: &mut FrameBuffer,
        layout: Layout,
        palette: &Palette,
        x: u16,
        y: u16,
        cell: Option<TileKind>,
        is_cursor: bool,
    ) {
        let px = layout.start_x + 1 + x * self.cell_w;
        let py = layout.start_y + 1 + y;

        let (sign, mut style) = match cell {
            Some(kind) => {
                let tile = palette.style(kind);
                (tile.sign, Style::fg(tile.color.contrast()).on(tile.color.shade(200)))
            }
            None => ('·', Style::fg(Rgb::new(90, 90, 100)).on(BOARD_BG).dim()),
        };
        if is_cursor {
            style.reverse = true;
            style.bold = true;
        }

        fb.fill_rect(px, py, self.cell_w, 1, ' ', style);
        fb.put_char(px, py, sign, style);
        if is_cursor && self.cell_w >= 2 {
            fb.put_char(px + self.cell_w - 1, py, '◂', style);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        server: Option<&ServerStatusView>,
        viewport: Viewport,
        layout: Layout,
    ) {
        let panel_x = layout.start_x.saturating_add(layout.frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = Style::fg(Rgb::new(220, 220, 220)).bold();
        let value = Style::fg(Rgb::new(200, 200, 200));
        let hint = value.dim();

        let mut y = layout.start_y;
        for (name, n) in [
            ("SCORE", snap.points as u64),
            ("SEED", snap.seed),
            ("REFILLS", snap.refills_left as u64),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u64(panel_x, y + 1, n, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "SERVER", label);
        y = y.saturating_add(1);
        match server {
            Some(st) => {
                fb.put_str(panel_x, y, &st.addr.to_string(), value);
            }
            None => {
                fb.put_str(panel_x, y, "OFF", value);
            }
        }
        y = y.saturating_add(2);

        for line in ["move  arrows/hjkl", "hit   space/click", "r restart  n new", "q quit"] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, hint);
            y = y.saturating_add(1);
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, layout: Layout, line: u16, text: &str) {
        let mid_y = layout.start_y.saturating_add(layout.frame_h / 2).saturating_add(line);
        let text_w = text.chars().count() as u16;
        let x = layout.start_x.saturating_add(layout.frame_w.saturating_sub(text_w) / 2);
        fb.put_str(x, mid_y, text, Style::fg(Rgb::new(255, 255, 255)).bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Cursor;

    fn snapshot() -> GameSnapshot {
        GameSnapshot {
            width: 3,
            height: 2,
            cells: vec![Some(TileKind(0)), None, Some(TileKind(1)), None, None, Some(TileKind(0))],
            cursor: Cursor { x: 2, y: 1 },
            points: 12,
            game_over: false,
            seed: 77,
            refills_left: 4,
            episode_id: 0,
        }
    }

    fn palette() -> Palette {
        Palette::from_tiles(&[TileType::new("*", "#ffff00"), TileType::new("X", "#88ff00")])
    }

    #[test]
    fn board_cell_at_round_trips_layout() {
        let view = GameView::default().with_anchor_y(AnchorY::Top);
        let snap = snapshot();
        let vp = Viewport::new(60, 10);
        let layout = view.layout(3, 2, vp);

        let col = layout.start_x + 1 + 2 * 2 + 1;
        assert_eq!(view.board_cell_at(&snap, vp, col, 2), Some((2, 1)));
        assert_eq!(view.board_cell_at(&snap, vp, layout.start_x, 1), None);
        assert_eq!(view.board_cell_at(&snap, vp, col + 2, 1), None);
        assert_eq!(view.board_cell_at(&snap, vp, col, 3), None);
    }

    #[test]
    fn renders_signs_and_cursor() {
        let view = GameView::default().with_anchor_y(AnchorY::Top);
        let snap = snapshot();
        let vp = Viewport::new(60, 12);
        let fb = view.render(&snap, &palette(), None, vp);
        let layout = view.layout(3, 2, vp);

        let first = fb.get(layout.start_x + 1, 1).unwrap();
        assert_eq!(first.ch, '*');
        let cursor = fb.get(layout.start_x + 1 + 4, 2).unwrap();
        assert_eq!(cursor.ch, '*');
        assert!(cursor.style.reverse);
        assert_eq!(fb.get(layout.start_x + 1 + 2, 1).unwrap().ch, '·');
    }

    #[test]
    fn unknown_color_falls_back() {
        let palette = Palette::from_tiles(&[TileType::new("", "purple")]);
        let style = palette.style(TileKind(0));
        assert_eq!(style.sign, '?');
        assert_eq!(style.color, FALLBACK_TILE);
        assert_eq!(palette.style(TileKind(9)).sign, '?');
    }
}
