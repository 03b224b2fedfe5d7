mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use log::info;
use rand::rngs::ThreadRng;
use rand::thread_rng;

use quiz_platformer::level::{self, BUILTIN_LEVELS};
use quiz_platformer::quiz::{BankQuiz, QuestionBank};
use quiz_platformer::{logging, FrameInput, GameConfig, GameStatus, LevelSession};

use display::Session;

/// Quiz-gated side-scrolling platformer for the terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML file overriding the default tuning constants.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Level to start on.
    #[arg(long, default_value_t = 1)]
    level: u32,
    /// Include debug records in the log.
    #[arg(short, long)]
    verbose: bool,
    /// Write log records to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// 8 frames (≈133 ms) is refreshed by the OS key-repeat before it expires.
const HOLD_WINDOW: u64 = 8;

/// Frames the answer feedback stays on screen.
const FEEDBACK_FRAMES: u32 = 120;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| is_held(key_frame, key, frame))
}

/// Sample the held keys into one frame of input.
fn frame_input(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> FrameInput {
    use KeyCode::{Char, Down, Left, Right, Up};
    FrameInput {
        left: any_held(key_frame, &[Left, Char('a'), Char('A')], frame),
        right: any_held(key_frame, &[Right, Char('d'), Char('D')], frame),
        jump: any_held(key_frame, &[Char(' '), Up, Char('w'), Char('W')], frame),
        run: any_held(key_frame, &[Char('x'), Char('X')], frame),
        interact: any_held(key_frame, &[Down, Char('e'), Char('E')], frame),
        fire: any_held(key_frame, &[Char('f'), Char('F')], frame),
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(u32),
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, first: u32) -> Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  QUIZ  PLATFORMER  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(7),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(16), cy.saturating_sub(5)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(format!(
        "ENTER: start at level {first}   1-{BUILTIN_LEVELS}: pick a level"
    )))?;

    let legend: &[(&str, Color, &str)] = &[
        ("▒", Color::Blue, " Gate: answer a question to pass (E / ↓)"),
        ("▒", Color::Yellow, " Key gate: a right answer earns a key"),
        ("║", Color::Red, " Barrier: removed when its gate opens"),
        ("?", Color::Yellow, " Block: hit from below for a power-up"),
        ("m", Color::Red, " Mushroom  f Flower  * Star"),
        ("B", Color::Magenta, " Boss: every right answer wounds it"),
    ];
    for (i, (sym, color, desc)) in legend.iter().enumerate() {
        let row = cy.saturating_sub(3) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(16), row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(sym))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(*desc))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(16), cy + 4))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("←→/AD move  SPACE jump  X run  F fire  Q quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        let Ok(event) = rx.recv() else {
            return Ok(MenuResult::Quit);
        };
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            continue;
        };
        match code {
            KeyCode::Enter => return Ok(MenuResult::Start(first)),
            KeyCode::Char(c) => {
                if let Some(n) = c.to_digit(10).filter(|n| (1..=BUILTIN_LEVELS).contains(n)) {
                    return Ok(MenuResult::Start(n));
                }
                if c == 'q' || c == 'Q' {
                    return Ok(MenuResult::Quit);
                }
            }
            KeyCode::Esc => return Ok(MenuResult::Quit),
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program, `false` → back to menu.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key. Each frame the keys still "fresh"
/// (within `HOLD_WINDOW` frames) become the frame's `FrameInput`; the session
/// itself turns them into one-shot presses for jump, interact and fire.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`). Keys expire naturally after `HOLD_WINDOW` frames of
///   silence.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session<ThreadRng>,
    rx: &mpsc::Receiver<Event>,
) -> Result<bool> {
    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut feedback_timer: u32 = 0;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        })) = rx.try_recv()
        {
            match kind {
                // Press: record key + handle one-shot actions
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(true);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        KeyCode::Char('p') | KeyCode::Char('P') => {
                            session.toggle_pause();
                        }
                        KeyCode::Char(c @ '1'..='4') => {
                            let index = c as usize - '1' as usize;
                            if session.quiz_mut().answer(index).is_some() {
                                feedback_timer = FEEDBACK_FRAMES;
                            }
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if session.status() == GameStatus::GameOver
                                || (session.status() == GameStatus::LevelComplete
                                    && session.level.number >= BUILTIN_LEVELS) =>
                        {
                            let layout = level::builtin(1).context("missing level 1")?;
                            session.restart(&layout)?;
                            key_frame.clear();
                        }
                        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Enter
                            if session.status() == GameStatus::LevelComplete =>
                        {
                            match level::builtin(session.level.number + 1) {
                                Some(layout) => {
                                    session.advance(&layout)?;
                                    key_frame.clear();
                                }
                                None => return Ok(false),
                            }
                        }
                        _ => {}
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        if feedback_timer > 0 {
            feedback_timer -= 1;
            if feedback_timer == 0 {
                session.quiz_mut().clear_feedback();
            }
        }

        session.tick(frame_input(&key_frame, frame));

        display::render(out, session)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose, args.log_file.as_deref()).context("failed to open log file")?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    let bank = QuestionBank::builtin().context("built-in question bank is invalid")?;
    level::builtin(args.level).with_context(|| format!("there is no level {}", args.level))?;
    info!("loaded {} questions", bank.len());

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &config, &bank, args.level);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    bank: &QuestionBank,
    first: u32,
) -> Result<()> {
    loop {
        match show_menu(out, rx, first)? {
            MenuResult::Quit => break,
            MenuResult::Start(number) => {
                let layout = level::builtin(number)
                    .with_context(|| format!("there is no level {number}"))?;
                let quiz = BankQuiz::new(bank.clone(), thread_rng());
                let mut session = LevelSession::new(&layout, config.clone(), quiz)
                    .context("built-in level layout is invalid")?;
                let quit = game_loop(out, &mut session, rx)?;
                info!(
                    "session ended at level {} with score {}",
                    session.level.number,
                    session.score()
                );
                if quit {
                    break;
                }
                // Otherwise loop back to the menu
            }
        }
    }
    Ok(())
}
