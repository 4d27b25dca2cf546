mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{debug, info};

use arcade_shooter::assets::VictoryArtLoader;
use arcade_shooter::compute::{apply_input, new_session, tick};
use arcade_shooter::config::Args;
use arcade_shooter::entities::{InputState, RoundState, SessionConfig, SessionState};
use arcade_shooter::error::GameError;
use arcade_shooter::logging;

use display::Viewport;

/// A key is considered "held" if its last press/repeat event arrived within
/// this long.  Covers terminals that don't emit key-release events: OS key
/// repeat runs at 15 Hz or faster, so the window is refreshed before expiry.
const HOLD_WINDOW: Duration = Duration::from_millis(130);

/// Poll interval while waiting on a finished round.
const IDLE_POLL: Duration = Duration::from_millis(33);

// ── Input tracking ────────────────────────────────────────────────────────────

/// Maps each held key to the instant it was last seen (press or repeat).
#[derive(Default)]
struct HeldKeys {
    last_seen: HashMap<KeyCode, Instant>,
}

impl HeldKeys {
    fn press(&mut self, code: KeyCode, now: Instant) {
        self.last_seen.insert(code, now);
    }

    fn release(&mut self, code: &KeyCode) {
        self.last_seen.remove(code);
    }

    fn is_held(&self, code: &KeyCode, now: Instant) -> bool {
        self.last_seen
            .get(code)
            .map(|&last| now.duration_since(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    fn any_held(&self, codes: &[KeyCode], now: Instant) -> bool {
        codes.iter().any(|c| self.is_held(c, now))
    }
}

const LEFT_KEYS: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn viewport(state: &SessionState) -> std::io::Result<Viewport> {
    let (cols, rows) = terminal::size()?;
    let view = Viewport::new(cols, rows, state.screen_width, state.screen_height);
    Ok(view)
}

// ── Round loop ────────────────────────────────────────────────────────────────

enum RoundOutcome {
    Quit,
    Restart,
}

/// Run one session until it ends or the player quits.
///
/// Each frame drains pending input into an `InputState`, applies it, ticks
/// the simulation once and renders.  Ticks stop as soon as the round is won
/// or lost.
fn play_round<W: Write>(
    out: &mut W,
    state: &mut SessionState,
    rx: &mpsc::Receiver<Event>,
    frame: Duration,
    loader: &mut VictoryArtLoader,
) -> Result<RoundOutcome, GameError> {
    let mut held = HeldKeys::default();
    let mut art_shown = false;

    while state.round == RoundState::Playing {
        let frame_start = Instant::now();
        let mut input = InputState::default();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    if is_quit(code, modifiers) {
                        return Ok(RoundOutcome::Quit);
                    }
                    if code == KeyCode::Char(' ') {
                        input.fire_requests += 1;
                    }
                    held.press(code, frame_start);
                }
                // Keyboard-enhancement terminals report releases
                KeyEventKind::Release => held.release(&code),
            }
        }

        input.move_left = held.any_held(LEFT_KEYS, frame_start);
        input.move_right = held.any_held(RIGHT_KEYS, frame_start);

        *state = apply_input(state, &input);
        *state = tick(state);

        let view = viewport(state)?;
        let art = match state.round {
            RoundState::Won => loader.poll(),
            _ => None,
        };
        art_shown = art.is_some();
        display::render(out, state, &view, art)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }

    match state.round {
        RoundState::Won => await_after_victory(out, state, rx, loader, art_shown),
        _ => await_after_loss(rx),
    }
}

/// The victory frame has been drawn.  Draw the art once it arrives, then wait
/// for the player to quit or start over.
fn await_after_victory<W: Write>(
    out: &mut W,
    state: &SessionState,
    rx: &mpsc::Receiver<Event>,
    loader: &mut VictoryArtLoader,
    mut art_drawn: bool,
) -> Result<RoundOutcome, GameError> {
    loop {
        if !art_drawn {
            if let Some(art) = loader.poll() {
                display::draw_victory_art(out, &viewport(state)?, art)?;
                art_drawn = true;
            }
        }
        match rx.recv_timeout(IDLE_POLL) {
            Ok(Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                modifiers,
                ..
            })) => {
                if is_quit(code, modifiers) {
                    return Ok(RoundOutcome::Quit);
                }
                if matches!(code, KeyCode::Char('r') | KeyCode::Char('R')) {
                    return Ok(RoundOutcome::Restart);
                }
            }
            Ok(_) | Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => return Ok(RoundOutcome::Quit),
        }
    }
}

/// Block on the game-over notice until a key is pressed.  Keys still in
/// flight from the round are discarded first.
fn await_after_loss(rx: &mpsc::Receiver<Event>) -> Result<RoundOutcome, GameError> {
    while rx.try_recv().is_ok() {}
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                modifiers,
                ..
            })) => {
                return Ok(if is_quit(code, modifiers) {
                    RoundOutcome::Quit
                } else {
                    RoundOutcome::Restart
                });
            }
            Ok(_) => {}
            Err(_) => return Ok(RoundOutcome::Quit),
        }
    }
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &SessionConfig,
    frame: Duration,
    loader: &mut VictoryArtLoader,
) -> Result<(), GameError> {
    loop {
        let mut state = new_session(config);
        match play_round(out, &mut state, rx, frame, loader)? {
            RoundOutcome::Quit => break,
            RoundOutcome::Restart => debug!("restarting after frame {}", state.frame),
        }
    }
    info!("exiting");
    Ok(())
}

// ── Terminal setup ────────────────────────────────────────────────────────────

fn enter_alternate_screen<W: Write>(
    out: &mut W,
    keyboard_enhanced: &mut bool,
) -> Result<(), GameError> {
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    *keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    Ok(())
}

/// Enter the alternate screen, run `body`, then always leave it again, even
/// when entering failed part-way through.
fn with_alternate_screen<W: Write, T>(
    out: &mut W,
    body: impl FnOnce(&mut W) -> Result<T, GameError>,
) -> Result<T, GameError> {
    let mut keyboard_enhanced = false;
    let result = enter_alternate_screen(out, &mut keyboard_enhanced).and_then(|()| body(out));

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    result
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), GameError> {
    let args = Args::parse();
    logging::init(args.verbose, args.log_file.as_deref())?;
    let config = args.session_config()?;
    let frame = args.frame_duration()?;
    info!("starting with {config:?}, {frame:?} per frame");

    let mut loader = VictoryArtLoader::spawn(args.victory_art.clone());

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    let result = with_alternate_screen(&mut out, |out| {
        // Dedicate a thread exclusively to blocking event reads, sending them
        // through a channel so the frame loop never has to block on I/O.
        let (tx, rx) = mpsc::channel::<Event>();
        thread::spawn(move || {
            while let Ok(ev) = event::read() {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
        });

        run(out, &rx, &config, frame, &mut loader)
    });
    let _ = terminal::disable_raw_mode();

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    const ENTER: &str = "\x1b[?1049h";
    const LEAVE: &str = "\x1b[?1049l";
    const SHOW_CURSOR: &str = "\x1b[?25h";

    /// Rejects its first write, then records everything after it.
    #[derive(Default)]
    struct FailFirstWrite {
        failed: bool,
        written: Vec<u8>,
    }

    impl Write for FailFirstWrite {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.failed {
                self.failed = true;
                return Err(io::Error::new(io::ErrorKind::Other, "terminal gone"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn body_runs_inside_the_alternate_screen() {
        let mut out = Vec::new();
        let result = with_alternate_screen(&mut out, |out| {
            out.write_all(b"frame")?;
            Ok(7)
        });
        assert_eq!(result.unwrap(), 7);

        let text = String::from_utf8(out).unwrap();
        let enter = text.find(ENTER).unwrap();
        let frame = text.find("frame").unwrap();
        let leave = text.find(LEAVE).unwrap();
        assert!(enter < frame && frame < leave);
        assert!(text.ends_with(LEAVE));
    }

    #[test]
    fn failed_setup_still_restores_the_terminal() {
        let mut out = FailFirstWrite::default();
        let mut ran = false;
        let result = with_alternate_screen(&mut out, |_| {
            ran = true;
            Ok(())
        });
        assert!(matches!(result, Err(GameError::Io(_))));
        assert!(!ran);

        let text = String::from_utf8(out.written).unwrap();
        assert!(text.contains(SHOW_CURSOR));
        assert!(text.contains(LEAVE));
    }

    #[test]
    fn body_error_is_returned_after_restoring() {
        let mut out = Vec::new();
        let result: Result<(), GameError> = with_alternate_screen(&mut out, |_| {
            Err(GameError::InvalidConfig("boom".to_string()))
        });
        assert!(matches!(result, Err(GameError::InvalidConfig(_))));
        assert!(String::from_utf8(out).unwrap().ends_with(LEAVE));
    }
}
