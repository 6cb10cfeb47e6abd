//! Rendering layer. All terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state. No game logic is performed; this module only translates
//! world coordinates into terminal commands, scaling the fixed logical
//! playfield onto whatever terminal it finds each frame.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use purple_ball::compute::{FPS, INVISIBILITY_FRAMES, SCREEN_HEIGHT, SCREEN_WIDTH};
use purple_ball::entities::{GameStatus, GameWorld, Hue, Obstacle, Platform, Player, Rect};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_LEVEL: Color = Color::White;
const C_HUD_INVIS: Color = Color::Cyan;
const C_HUD_READY: Color = Color::DarkGrey;
const C_PLAYER: Color = Color::Magenta;
const C_PLAYER_INVIS: Color = Color::DarkMagenta;
const C_OBSTACLE: Color = Color::Red;
const C_GOAL: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

fn hue_color(hue: &Hue) -> Color {
    match hue {
        Hue::Green => Color::Green,
        Hue::Red => Color::Red,
        Hue::Yellow => Color::Yellow,
        Hue::Purple => Color::Magenta,
    }
}

// ── Viewport ──────────────────────────────────────────────────────────────────

/// World-to-cell mapping for one frame. Row 0 is the HUD, rows 1 and
/// `rows - 2` are the border bars, the last row is the controls hint; the
/// playfield is everything in between.
struct Viewport {
    cols: u16,
    rows: u16,
    scale_x: f32,
    scale_y: f32,
}

impl Viewport {
    fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            scale_x: cols.saturating_sub(2) as f32 / SCREEN_WIDTH,
            scale_y: rows.saturating_sub(4) as f32 / SCREEN_HEIGHT,
        }
    }

    fn col(&self, x: f32) -> i32 {
        1 + (x * self.scale_x) as i32
    }

    fn row(&self, y: f32) -> i32 {
        2 + (y * self.scale_y) as i32
    }
}

/// Fill a world rectangle with `glyph`, clipped to the playfield. A
/// rectangle thinner than one cell still draws one cell so small
/// furniture never vanishes.
fn draw_world_rect<W: Write>(
    out: &mut W,
    vp: &Viewport,
    rect: &Rect,
    color: Color,
    glyph: &str,
) -> std::io::Result<()> {
    let max_col = vp.cols as i32 - 1;
    let max_row = vp.rows as i32 - 2;

    let c0 = vp.col(rect.left()).max(1);
    let c1 = vp.col(rect.right()).max(vp.col(rect.left()) + 1).min(max_col);
    let r0 = vp.row(rect.top()).max(2);
    let r1 = vp.row(rect.bottom()).max(vp.row(rect.top()) + 1).min(max_row);
    if c1 <= c0 || r1 <= r0 {
        return Ok(());
    }

    out.queue(style::SetForegroundColor(color))?;
    for row in r0..r1 {
        out.queue(cursor::MoveTo(c0 as u16, row as u16))?;
        out.queue(Print(glyph.repeat((c1 - c0) as usize)))?;
    }
    Ok(())
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, world: &GameWorld) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let vp = Viewport::new(cols, rows);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &vp)?;

    for plat in &world.level.platforms {
        draw_platform(out, &vp, plat)?;
    }
    for obs in &world.level.obstacles {
        draw_obstacle(out, &vp, obs)?;
    }
    if let Some(goal) = &world.level.goal {
        draw_world_rect(out, &vp, &goal.rect, C_GOAL, "█")?;
    }
    draw_player(out, &vp, &world.player)?;

    draw_hud(out, world)?;
    draw_controls_hint(out, &vp)?;

    if world.status != GameStatus::Playing {
        draw_message_overlay(out, world, &vp)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, vp.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    let w = vp.cols as usize;
    let h = vp.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(vp.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_platform<W: Write>(out: &mut W, vp: &Viewport, plat: &Platform) -> std::io::Result<()> {
    draw_world_rect(out, vp, &plat.rect, hue_color(&plat.hue), "█")
}

fn draw_obstacle<W: Write>(out: &mut W, vp: &Viewport, obs: &Obstacle) -> std::io::Result<()> {
    draw_world_rect(out, vp, &obs.rect, C_OBSTACLE, "█")
}

/// The ball is drawn over its bounding square, matching the collision
/// model. While invisible it is dimmed rather than omitted, so the
/// player can still steer it.
fn draw_player<W: Write>(out: &mut W, vp: &Viewport, player: &Player) -> std::io::Result<()> {
    let bounds = Rect {
        x: player.x - player.radius,
        y: player.y - player.radius,
        w: player.radius * 2.0,
        h: player.radius * 2.0,
    };
    if player.invisible {
        draw_world_rect(out, vp, &bounds, C_PLAYER_INVIS, "▒")
    } else {
        draw_world_rect(out, vp, &bounds, C_PLAYER, "█")
    }
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, world: &GameWorld) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(format!("Level: {}", world.level.number)))?;

    out.queue(cursor::MoveTo(14, 0))?;
    if world.player.invisible {
        let seconds = (INVISIBILITY_FRAMES - world.player.invisible_frames) / FPS;
        out.queue(style::SetForegroundColor(C_HUD_INVIS))?;
        out.queue(Print(format!("Invisibility: {}s", seconds)))?;
    } else {
        out.queue(style::SetForegroundColor(C_HUD_READY))?;
        out.queue(Print("Invisibility Ready (Z)"))?;
    }

    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, vp.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "← → / A D : Move   SPACE / W : Jump   Z : Invisibility   S : Stop   Q : Quit",
    ))?;
    Ok(())
}

// ── State-message overlay ─────────────────────────────────────────────────────

fn draw_message_overlay<W: Write>(
    out: &mut W,
    world: &GameWorld,
    vp: &Viewport,
) -> std::io::Result<()> {
    let color = match world.status {
        GameStatus::GameOver => Color::Red,
        _ => Color::Yellow,
    };
    let msg = world.message.as_str();
    let inner = msg.chars().count();

    let top = format!("╔{}╗", "═".repeat(inner + 2));
    let mid = format!("║ {} ║", msg);
    let bot = format!("╚{}╝", "═".repeat(inner + 2));

    let cx = vp.cols / 2;
    let cy = vp.rows / 2;
    for (i, line) in [top, mid, bot].iter().enumerate() {
        let col = cx.saturating_sub(line.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, cy.saturating_sub(1) + i as u16))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(line))?;
    }

    Ok(())
}
