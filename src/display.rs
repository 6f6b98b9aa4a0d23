//! Rendering layer. All terminal I/O lives here.
//!
//! `TerminalSurface` is the game's drawing surface: it records what the game
//! draws each frame in canvas coordinates. `render` then scales that onto
//! the terminal grid and adds the HUD. No game logic is performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use invaders::entities::GameStatus;
use invaders::geometry::Rect;
use invaders::host::{Sprite, Surface};

/// Smallest terminal the playfield can be drawn in.
pub const MIN_COLS: u16 = 40;
pub const MIN_ROWS: u16 = 12;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_TITLE: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

fn fits(cols: u16, rows: u16) -> bool {
    cols >= MIN_COLS && rows >= MIN_ROWS
}

// ── Surface ───────────────────────────────────────────────────────────────────

pub struct TerminalSurface {
    canvas_width: f32,
    canvas_height: f32,
    cols: u16,
    rows: u16,
    drawn: Vec<(Sprite, Rect)>,
}

impl TerminalSurface {
    /// Returns `None` when the terminal is too small to hold the playfield.
    pub fn open(canvas_width: f32, canvas_height: f32, cols: u16, rows: u16) -> Option<Self> {
        if !fits(cols, rows) {
            return None;
        }
        Some(TerminalSurface {
            canvas_width,
            canvas_height,
            cols,
            rows,
            drawn: Vec::new(),
        })
    }

    /// Track the real terminal size. Below the minimum, `render` shows a
    /// notice instead of the playfield until the terminal grows back.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if !fits(cols, rows) {
            log::warn!("Terminal shrank to {}x{}, playfield hidden", cols, rows);
        }
        self.cols = cols;
        self.rows = rows;
    }

    pub fn fits(&self) -> bool {
        fits(self.cols, self.rows)
    }

    // Playfield sits inside the border: columns 1..cols-1, rows 2..rows-2.
    fn play_cols(&self) -> f32 {
        f32::from(self.cols - 2)
    }

    fn play_rows(&self) -> f32 {
        f32::from(self.rows - 4)
    }

    /// Map a canvas rect to a (col, row, width, height) cell span.
    fn cells(&self, rect: &Rect) -> (u16, u16, u16, u16) {
        let sx = self.play_cols() / self.canvas_width;
        let sy = self.play_rows() / self.canvas_height;

        let c0 = (rect.left() * sx).floor().clamp(0.0, self.play_cols() - 1.0);
        let c1 = (rect.right() * sx).ceil().clamp(c0 + 1.0, self.play_cols());
        let r0 = (rect.top() * sy).floor().clamp(0.0, self.play_rows() - 1.0);
        let r1 = (rect.bottom() * sy).ceil().clamp(r0 + 1.0, self.play_rows());

        (
            1 + c0 as u16,
            2 + r0 as u16,
            (c1 - c0) as u16,
            (r1 - r0) as u16,
        )
    }
}

impl Surface for TerminalSurface {
    fn size(&self) -> (f32, f32) {
        (self.canvas_width, self.canvas_height)
    }

    fn clear(&mut self) {
        self.drawn.clear();
    }

    fn draw_image(&mut self, sprite: Sprite, rect: Rect) {
        self.drawn.push((sprite, rect));
    }
}

/// The values the HUD binds to.
pub struct Hud {
    pub score: u32,
    pub lives: i32,
    pub status: GameStatus,
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, surface: &TerminalSurface, hud: &Hud) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    if !surface.fits() {
        return draw_too_small(out, surface);
    }

    draw_border(out, surface)?;
    draw_hud(out, surface, hud)?;

    for (sprite, rect) in &surface.drawn {
        draw_sprite(out, surface, *sprite, rect)?;
    }

    draw_controls_hint(out, surface)?;

    if hud.status.is_over() {
        draw_game_over(out, surface, hud)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, surface.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Undersized terminal ───────────────────────────────────────────────────────

fn draw_too_small<W: Write>(out: &mut W, surface: &TerminalSurface) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print("Terminal too small"))?;
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(format!(
        "{}x{}, need {}x{}",
        surface.cols, surface.rows, MIN_COLS, MIN_ROWS
    )))?;
    out.queue(style::ResetColor)?;
    out.flush()
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, surface: &TerminalSurface) -> std::io::Result<()> {
    let w = surface.cols as usize;
    let h = surface.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(surface.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, surface: &TerminalSurface, hud: &Hud) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", hud.score)))?;

    let title = "[ INVADERS ]";
    let tx = (surface.cols / 2).saturating_sub(title.len() as u16 / 2);
    out.queue(cursor::MoveTo(tx, 0))?;
    out.queue(style::SetForegroundColor(C_TITLE))?;
    out.queue(Print(title))?;

    let hearts: String = "♥".repeat(hud.lives.max(0) as usize);
    let lives_str = format!("Lives:{}", hearts);
    let rx = surface
        .cols
        .saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// One row of a sprite, `width` cells wide.
fn sprite_row(sprite: Sprite, width: usize) -> String {
    match sprite {
        // /███\ ship, ▲ when squeezed to a single cell
        Sprite::Player if width >= 3 => format!("/{}\\", "█".repeat(width - 2)),
        Sprite::Player => "▲".repeat(width),
        // «▼▼» invader
        Sprite::Enemy if width >= 3 => format!("«{}»", "▼".repeat(width - 2)),
        Sprite::Enemy => "▼".repeat(width),
        Sprite::PlayerBullet => "║".to_string(),
        Sprite::EnemyBullet => "↓".to_string(),
    }
}

fn draw_sprite<W: Write>(
    out: &mut W,
    surface: &TerminalSurface,
    sprite: Sprite,
    rect: &Rect,
) -> std::io::Result<()> {
    let color = match sprite {
        Sprite::Player => C_PLAYER,
        Sprite::Enemy => C_ENEMY,
        Sprite::PlayerBullet => C_BULLET_PLAYER,
        Sprite::EnemyBullet => C_BULLET_ENEMY,
    };
    let (col, row, width, height) = surface.cells(rect);
    let line = sprite_row(sprite, width as usize);

    out.queue(style::SetForegroundColor(color))?;
    for dy in 0..height {
        out.queue(cursor::MoveTo(col, row + dy))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, surface: &TerminalSurface) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, surface.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   R : Restart   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, surface: &TerminalSurface, hud: &Hud) -> std::io::Result<()> {
    let (banner, color) = match hud.status {
        GameStatus::Won => ("║     YOU  WIN!      ║", Color::Green),
        _ => ("║    GAME  OVER      ║", Color::Red),
    };
    let lines: [(&str, Color); 3] = [
        ("╔════════════════════╗", color),
        (banner, color),
        ("╚════════════════════╝", color),
    ];
    let score_line = format!("Final Score: {:>6}", hud.score);
    let hint = "R - Play Again  Q - Quit";

    let cx = surface.cols / 2;
    let total_rows = lines.len() + 2;
    let start_row = (surface.rows / 2).saturating_sub(total_rows as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    let score_row = start_row + lines.len() as u16;
    let col = cx.saturating_sub(score_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, score_row))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&score_line))?;

    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, score_row + 1))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;

    Ok(())
}
