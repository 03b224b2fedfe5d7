//! Rendering layer: all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! session. No game logic is performed; this module only translates world
//! rectangles into terminal cells through a camera that follows the avatar.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use rand::Rng;

use quiz_platformer::avatar::AvatarState;
use quiz_platformer::enemy::{Enemy, EnemyKind};
use quiz_platformer::entities::{Obstacle, ObstacleKind, PowerUpKind};
use quiz_platformer::gate::{Gate, GateKind};
use quiz_platformer::geometry::Rect;
use quiz_platformer::level::BUILTIN_LEVELS;
use quiz_platformer::quiz::BankQuiz;
use quiz_platformer::{GameStatus, LevelSession};

pub type Session<R> = LevelSession<BankQuiz<R>>;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_KEYS: Color = Color::Cyan;
const C_GROUND: Color = Color::DarkYellow;
const C_PIPE: Color = Color::Green;
const C_BLOCK: Color = Color::Yellow;
const C_BARRIER: Color = Color::Red;
const C_ENEMY_WEAK: Color = Color::DarkRed;
const C_ENEMY_ARMORED: Color = Color::Green;
const C_COIN: Color = Color::Yellow;
const C_FIREBALL: Color = Color::Red;
const C_BOSS: Color = Color::Magenta;
const C_GOAL: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

// ── Camera ────────────────────────────────────────────────────────────────────

/// Maps world pixels onto the playfield inside the border.
struct Viewport {
    camera_x: f32,
    scale_x: f32,
    scale_y: f32,
    cols: u16,
    rows: u16,
}

const ORIGIN_COL: u16 = 1;
const ORIGIN_ROW: u16 = 2;

impl Viewport {
    /// Terminal cells are about twice as tall as wide, so a cell covers half
    /// as many world pixels horizontally as vertically.
    fn new<R: Rng>(session: &Session<R>, width: u16, height: u16) -> Self {
        let cols = width.saturating_sub(2).max(1);
        let rows = height.saturating_sub(4).max(1);
        let scale_y = session.config().physics.world_height / rows as f32;
        let scale_x = scale_y / 2.0;
        let view_width = cols as f32 * scale_x;
        let target = session.avatar.rect().center_x() - view_width / 3.0;
        let camera_x = target
            .min(session.level.world_width - view_width)
            .max(0.0);
        Self {
            camera_x,
            scale_x,
            scale_y,
            cols,
            rows,
        }
    }

    /// Cell-space `(col, row, width, height)` of a rectangle, clipped to the
    /// playfield. `None` when nothing of it is visible.
    fn project(&self, rect: &Rect) -> Option<(u16, u16, u16, u16)> {
        let left = ((rect.left() - self.camera_x) / self.scale_x).floor().max(0.0);
        let right = ((rect.right() - self.camera_x) / self.scale_x)
            .ceil()
            .min(self.cols as f32);
        let top = (rect.top() / self.scale_y).floor().max(0.0);
        let bottom = (rect.bottom() / self.scale_y).ceil().min(self.rows as f32);
        if right <= left || bottom <= top {
            return None;
        }
        Some((
            ORIGIN_COL + left as u16,
            ORIGIN_ROW + top as u16,
            (right - left) as u16,
            (bottom - top) as u16,
        ))
    }
}

fn fill<W: Write>(
    out: &mut W,
    view: &Viewport,
    rect: &Rect,
    glyph: char,
    color: Color,
) -> std::io::Result<()> {
    let Some((col, row, width, height)) = view.project(rect) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(color))?;
    let line: String = std::iter::repeat(glyph).take(width as usize).collect();
    for r in row..row + height {
        out.queue(cursor::MoveTo(col, r))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write, R: Rng>(out: &mut W, session: &Session<R>) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let view = Viewport::new(session, width, height);
    draw_border(out, width, height)?;
    draw_hud(out, session, width)?;

    let level = &session.level;
    for obstacle in &level.obstacles {
        draw_obstacle(out, &view, obstacle)?;
    }
    for gate in &level.gates {
        draw_gate(out, &view, gate)?;
    }
    fill(out, &view, &level.goal, '|', C_GOAL)?;
    for coin in &level.coins {
        fill(out, &view, &coin.rect, 'o', C_COIN)?;
    }
    for item in &level.items {
        let (glyph, color) = match item.kind {
            PowerUpKind::Mushroom => ('m', Color::Red),
            PowerUpKind::Flower => ('f', Color::DarkYellow),
            PowerUpKind::Star => ('*', Color::Yellow),
        };
        fill(out, &view, &item.actor.rect, glyph, color)?;
    }
    if let Some(boss) = &level.boss {
        if !boss.defeated {
            let glyph = if boss.active { 'B' } else { 'b' };
            fill(out, &view, &boss.rect, glyph, C_BOSS)?;
        }
    }
    for enemy in &level.enemies {
        draw_enemy(out, &view, enemy)?;
    }
    for fireball in &level.fireballs {
        fill(out, &view, &fireball.actor.rect, '•', C_FIREBALL)?;
    }
    draw_avatar(out, &view, session)?;
    draw_controls_hint(out, height)?;

    if let Some(question) = session.quiz().active_question() {
        let mut lines = vec![(question.prompt.clone(), Color::White), (String::new(), Color::White)];
        for (i, option) in question.options.iter().enumerate() {
            lines.push((format!("{}) {}", i + 1, option), Color::Cyan));
        }
        lines.push((String::new(), Color::White));
        lines.push(("Answer with 1-4".to_string(), C_HINT));
        draw_box(out, width, height, "QUESTION", Color::Yellow, &lines)?;
    } else if let Some(feedback) = session.quiz().feedback() {
        let (title, color) = if feedback.correct {
            ("CORRECT", Color::Green)
        } else {
            ("WRONG", Color::Red)
        };
        let lines = [(feedback.explanation.clone(), Color::White)];
        draw_box(out, width, height, title, color, &lines)?;
    }

    match session.status() {
        GameStatus::Paused => {
            let lines = [("P - Resume  Q - Quit".to_string(), Color::White)];
            draw_box(out, width, height, "PAUSED", Color::Cyan, &lines)?;
        }
        GameStatus::LevelComplete => draw_level_complete(out, session, width, height)?,
        GameStatus::GameOver => draw_game_over(out, session, width, height)?,
        GameStatus::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn state_tag(state: AvatarState) -> (&'static str, Color) {
    match state {
        AvatarState::Small => ("SMALL", Color::White),
        AvatarState::Big => ("BIG", Color::Red),
        AvatarState::Fire => ("FIRE", Color::DarkYellow),
        AvatarState::Invincible => ("STAR", Color::Yellow),
        AvatarState::Dying => ("DOWN", Color::DarkGrey),
    }
}

fn draw_hud<W: Write, R: Rng>(out: &mut W, session: &Session<R>, width: u16) -> std::io::Result<()> {
    // Score and coins, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!(
        "Score:{:>7}  Coins:{:>3}  Time:{:>3}",
        session.score(),
        session.coins(),
        session.time_left()
    )))?;

    // Level and state, centre
    let level_str = format!("[ LEVEL {} ]", session.level.number);
    let (tag, tag_color) = state_tag(session.avatar.state);
    let lx = (width / 2).saturating_sub(level_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(Color::Green))?;
    out.queue(Print(&level_str))?;
    out.queue(style::SetForegroundColor(tag_color))?;
    out.queue(Print(format!(" {tag}")))?;

    // Keys, accuracy and lives, right
    let keys_str = format!(
        "Keys:{}  Acc:{:>3.0}%  ",
        session.wallet.held(),
        session.stats.accuracy()
    );
    let lives_str = format!("Lives:{}", "♥".repeat(session.lives() as usize));
    let total = keys_str.chars().count() + lives_str.chars().count();
    let rx = width.saturating_sub(total as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_KEYS))?;
    out.queue(Print(&keys_str))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── World ─────────────────────────────────────────────────────────────────────

fn draw_obstacle<W: Write>(out: &mut W, view: &Viewport, obstacle: &Obstacle) -> std::io::Result<()> {
    let (glyph, color) = match obstacle.kind {
        ObstacleKind::Ground => ('█', C_GROUND),
        ObstacleKind::Platform => ('▀', C_GROUND),
        ObstacleKind::Pipe => ('█', C_PIPE),
        ObstacleKind::Block { contents: Some(_) } if !obstacle.released => ('?', C_BLOCK),
        ObstacleKind::Block { .. } => ('#', C_GROUND),
        ObstacleKind::Barrier => ('║', C_BARRIER),
    };
    fill(out, view, &obstacle.rect, glyph, color)
}

fn draw_gate<W: Write>(out: &mut W, view: &Viewport, gate: &Gate) -> std::io::Result<()> {
    if gate.is_open {
        return Ok(());
    }
    let (glyph, color) = match gate.kind {
        GateKind::Mandatory => ('▒', Color::Blue),
        GateKind::SecretOptional => ('▒', Color::DarkMagenta),
        GateKind::BonusOptional => ('▒', Color::DarkGreen),
        GateKind::SpecialKey => ('▒', Color::Yellow),
    };
    fill(out, view, &gate.rect, glyph, color)?;
    if gate.keys_required > 0 {
        if let Some((col, row, _, _)) = view.project(&gate.rect) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(style::SetForegroundColor(C_HUD_KEYS))?;
            out.queue(Print(format!("K{}", gate.keys_required)))?;
        }
    }
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, view: &Viewport, enemy: &Enemy) -> std::io::Result<()> {
    let color = match enemy.kind {
        EnemyKind::Weak => C_ENEMY_WEAK,
        EnemyKind::Armored => C_ENEMY_ARMORED,
    };
    let glyph = match (enemy.crushed, enemy.kind, enemy.animation_frame) {
        (true, _, _) => '_',
        (false, EnemyKind::Weak, 0) => 'w',
        (false, EnemyKind::Weak, _) => 'W',
        (false, EnemyKind::Armored, _) => 'A',
    };
    fill(out, view, enemy.rect(), glyph, color)
}

fn draw_avatar<W: Write, R: Rng>(out: &mut W, view: &Viewport, session: &Session<R>) -> std::io::Result<()> {
    let avatar = &session.avatar;
    // Blink while immune after a hit.
    if avatar.invincibility_timer > 0
        && avatar.state != AvatarState::Invincible
        && (session.frame() / 4) % 2 == 0
    {
        return Ok(());
    }
    let (_, color) = state_tag(avatar.state);
    let color = if avatar.state == AvatarState::Invincible {
        [Color::Yellow, Color::Magenta, Color::Cyan][(session.frame() / 3 % 3) as usize]
    } else {
        color
    };
    fill(out, view, avatar.rect(), 'M', color)
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "←→/AD move  SPACE/W jump  X run  E/↓ gate  F fire  P pause  Q quit",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

/// Centred framed box with a title row and the given lines.
fn draw_box<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    title: &str,
    title_color: Color,
    lines: &[(String, Color)],
) -> std::io::Result<()> {
    let inner = lines
        .iter()
        .map(|(text, _)| text.chars().count())
        .chain(std::iter::once(title.chars().count()))
        .max()
        .unwrap_or(0)
        .min(width.saturating_sub(6) as usize)
        + 2;
    let cx = width / 2;
    let total_rows = lines.len() as u16 + 4;
    let start_row = (height / 2).saturating_sub(total_rows / 2);
    let col = cx.saturating_sub(inner as u16 / 2 + 1);

    out.queue(style::SetForegroundColor(title_color))?;
    out.queue(cursor::MoveTo(col, start_row))?;
    out.queue(Print(format!("╔{}╗", "═".repeat(inner))))?;
    out.queue(cursor::MoveTo(col, start_row + 1))?;
    out.queue(Print(format!("║{:^inner$}║", title)))?;
    out.queue(cursor::MoveTo(col, start_row + 2))?;
    out.queue(Print(format!("╠{}╣", "═".repeat(inner))))?;

    for (i, (text, color)) in lines.iter().enumerate() {
        let row = start_row + 3 + i as u16;
        let shown: String = text.chars().take(inner - 2).collect();
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(title_color))?;
        out.queue(Print("║ "))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<width$}", shown, width = inner - 2)))?;
        out.queue(style::SetForegroundColor(title_color))?;
        out.queue(Print(" ║"))?;
    }

    out.queue(cursor::MoveTo(col, start_row + 3 + lines.len() as u16))?;
    out.queue(Print(format!("╚{}╝", "═".repeat(inner))))?;
    Ok(())
}

fn draw_level_complete<W: Write, R: Rng>(
    out: &mut W,
    session: &Session<R>,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let last = session.level.number >= BUILTIN_LEVELS;
    let mut lines = vec![
        (format!("Score: {:>7}", session.score()), Color::Yellow),
        (
            format!(
                "Answers: {} right, {} wrong, best streak {}",
                session.stats.correct, session.stats.incorrect, session.stats.best_streak
            ),
            Color::White,
        ),
    ];
    let (title, hint) = if last {
        ("ALL LEVELS CLEARED", "R - Play Again  Q - Quit")
    } else {
        ("LEVEL COMPLETE", "N - Next Level  Q - Quit")
    };
    lines.push((hint.to_string(), Color::White));
    draw_box(out, width, height, title, Color::Green, &lines)
}

fn draw_game_over<W: Write, R: Rng>(
    out: &mut W,
    session: &Session<R>,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let lines = [
        (format!("Final Score: {:>7}", session.score()), Color::Yellow),
        (
            format!("Accuracy: {:.0}%", session.stats.accuracy()),
            Color::DarkGrey,
        ),
        ("R - Play Again  Q - Quit".to_string(), Color::White),
    ];
    draw_box(out, width, height, "GAME  OVER", Color::Red, &lines)
}
