/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// session state.  No game logic is performed; this module only translates
/// world coordinates into terminal cells.

use std::io::Write;

use arcade_shooter::assets::VictoryArt;
use arcade_shooter::entities::{BoundingBox, RoundState, SessionState};
use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_ENEMIES: Color = Color::Yellow;
const C_HUD_FRAME: Color = Color::DarkGrey;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Red;
const C_PROJECTILE: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;
const C_VICTORY: Color = Color::DarkYellow;

pub const VICTORY_TEXT: &str = "Jai Shri Ram";

// ── World → terminal mapping ─────────────────────────────────────────────────

/// Maps world units onto the play area inside the border: columns
/// `1..cols-1` and rows `2..rows-2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    world_width: f32,
    world_height: f32,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, world_width: f32, world_height: f32) -> Self {
        Viewport {
            cols,
            rows,
            world_width,
            world_height,
        }
    }

    fn play_cols(&self) -> f32 {
        self.cols.saturating_sub(2) as f32
    }

    fn play_rows(&self) -> f32 {
        self.rows.saturating_sub(4) as f32
    }

    fn col_of(&self, x: f32) -> f32 {
        x / self.world_width * self.play_cols()
    }

    fn row_of(&self, y: f32) -> f32 {
        y / self.world_height * self.play_rows()
    }

    /// Terminal cells covered by `bounds`, clipped to the play area, as
    /// `(first_col, last_col, first_row, last_row)`.  Every box that is at
    /// least partly on screen covers at least one cell.
    pub fn cells(&self, bounds: &BoundingBox) -> Option<(u16, u16, u16, u16)> {
        let max_col = self.play_cols() - 1.0;
        let max_row = self.play_rows() - 1.0;
        if max_col < 0.0 || max_row < 0.0 {
            return None;
        }

        let c0 = self.col_of(bounds.x).floor();
        let c1 = (self.col_of(bounds.x + bounds.width).ceil() - 1.0).max(c0);
        let r0 = self.row_of(bounds.y).floor();
        let r1 = (self.row_of(bounds.y + bounds.height).ceil() - 1.0).max(r0);

        if c1 < 0.0 || r1 < 0.0 || c0 > max_col || r0 > max_row {
            return None;
        }
        Some((
            1 + c0.max(0.0) as u16,
            1 + c1.min(max_col) as u16,
            2 + r0.max(0.0) as u16,
            2 + r1.min(max_row) as u16,
        ))
    }
}

// ── Public entry points ──────────────────────────────────────────────────────

/// Render one complete frame.  On a won round the celebratory text is drawn
/// over the field, with `victory_art` below it once it is available.
pub fn render<W: Write>(
    out: &mut W,
    state: &SessionState,
    view: &Viewport,
    victory_art: Option<&VictoryArt>,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_hud(out, state, view)?;

    for enemy in state.enemies.iter().filter(|e| e.alive) {
        fill_box(out, view, &enemy.bounds(), '▼', '█', C_ENEMY)?;
    }
    for projectile in state.projectiles.iter().filter(|p| p.active) {
        fill_box(out, view, &projectile.bounds(), '▲', '║', C_PROJECTILE)?;
    }
    fill_box(out, view, &state.player.bounds(), '▲', '█', C_PLAYER)?;

    draw_controls_hint(out, view)?;

    match state.round {
        RoundState::Won => {
            draw_victory_text(out, view)?;
            if let Some(art) = victory_art {
                draw_victory_art(out, view, art)?;
            }
        }
        RoundState::Lost => draw_game_over(out, view)?,
        RoundState::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Draw the victory art centred below the celebratory text.
pub fn draw_victory_art<W: Write>(
    out: &mut W,
    view: &Viewport,
    art: &VictoryArt,
) -> std::io::Result<()> {
    let cx = view.cols / 2;
    let left = cx.saturating_sub(art.width() as u16 / 2);
    // One blank row of padding below the text.
    let top = view.rows / 2 + 2;
    let bottom = view.rows.saturating_sub(2);

    out.queue(style::SetForegroundColor(C_VICTORY))?;
    for (i, line) in art.lines.iter().enumerate() {
        let row = top + i as u16;
        if row >= bottom {
            break;
        }
        out.queue(cursor::MoveTo(left, row))?;
        out.queue(Print(line))?;
    }
    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2 — bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &SessionState, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_ENEMIES))?;
    out.queue(Print(format!(
        "Enemies:{:>3}/{}",
        state.living_enemies(),
        state.enemies.len()
    )))?;

    let (round_str, round_color) = match state.round {
        RoundState::Playing => ("[ PLAYING ]", Color::Green),
        RoundState::Won => ("[ WON ]", Color::Yellow),
        RoundState::Lost => ("[ LOST ]", Color::Red),
    };
    let lx = (view.cols / 2).saturating_sub(round_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(round_color))?;
    out.queue(Print(round_str))?;

    let frame_str = format!("Frame:{:>7}", state.frame);
    let rx = view
        .cols
        .saturating_sub(frame_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_FRAME))?;
    out.queue(Print(&frame_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Fill the cells covered by `bounds`: `top` along the first row, `body`
/// below it.
fn fill_box<W: Write>(
    out: &mut W,
    view: &Viewport,
    bounds: &BoundingBox,
    top: char,
    body: char,
    color: Color,
) -> std::io::Result<()> {
    let Some((c0, c1, r0, r1)) = view.cells(bounds) else {
        return Ok(());
    };
    let width = (c1 - c0 + 1) as usize;

    out.queue(style::SetForegroundColor(color))?;
    for row in r0..=r1 {
        let glyph = if row == r0 { top } else { body };
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print(glyph.to_string().repeat(width)))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Round-over overlays ───────────────────────────────────────────────────────

fn draw_victory_text<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let col = (view.cols / 2).saturating_sub(VICTORY_TEXT.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, view.rows / 2))?;
    out.queue(style::SetForegroundColor(C_VICTORY))?;
    out.queue(Print(VICTORY_TEXT))?;
    Ok(())
}

fn draw_game_over<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        ("Any key - Play Again  Q - Quit", Color::White),
    ];

    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
