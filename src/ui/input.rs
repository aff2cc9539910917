/// Raw keyboard input.
///
/// The game reads keys as a stream of raw bytes, the way a terminal in raw
/// mode delivers them:
///   - printable keys are their own byte (`w`, `a`, ` `, ...)
///   - arrows are the 3-byte sequence `ESC [ A|B|C|D`
///   - Escape alone is a bare `ESC`
///
/// `InputSource` is the seam. `TerminalInput` feeds it from crossterm key
/// events (re-encoded to bytes); tests feed it from a fixed script.
///
/// Raw mode itself is switched on by `Renderer::init`.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll};

use crate::domain::entity::Command;

const ESC: u8 = 0x1b;
const CTRL_C: u8 = 0x03;
const BACKSPACE: u8 = 0x7f;
const CTRL_H: u8 = 0x08;

/// Horizontal step for arrow keys vs WASD. The two differ (2 vs 3 columns);
/// players have always had it this way, so both are kept.
pub const ARROW_STEP_X: i32 = 2;
pub const WASD_STEP_X: i32 = 3;

pub trait InputSource {
    /// Is at least one byte ready? Never blocks, never consumes.
    fn poll_available(&mut self) -> bool;

    /// Next byte, blocking until one arrives. None if the source is closed.
    fn read_byte(&mut self) -> Option<u8>;

    /// Throw away everything already queued.
    fn drain(&mut self) {
        while self.poll_available() {
            if self.read_byte().is_none() { break; }
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Terminal source (crossterm)
// ══════════════════════════════════════════════════════════════

pub struct TerminalInput {
    pending: VecDeque<u8>,
}

impl Default for TerminalInput {
    fn default() -> Self {
        TerminalInput::new()
    }
}

impl TerminalInput {
    pub fn new() -> Self {
        TerminalInput { pending: VecDeque::with_capacity(16) }
    }

    fn push_event(&mut self, ev: Event) {
        if let Event::Key(key) = ev {
            encode_key(key, &mut self.pending);
        }
    }
}

impl InputSource for TerminalInput {
    fn poll_available(&mut self) -> bool {
        // Pull in every event that is already waiting, without blocking
        loop {
            match poll(Duration::ZERO) {
                Ok(true) => match event::read() {
                    Ok(ev) => self.push_event(ev),
                    Err(e) => {
                        tracing::warn!(error = %e, "terminal read failed");
                        break;
                    }
                },
                Ok(false) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "terminal poll failed");
                    break;
                }
            }
        }
        !self.pending.is_empty()
    }

    fn read_byte(&mut self) -> Option<u8> {
        loop {
            if let Some(b) = self.pending.pop_front() { return Some(b); }
            match event::read() {
                Ok(ev) => self.push_event(ev),
                Err(e) => {
                    tracing::warn!(error = %e, "terminal read failed");
                    return None;
                }
            }
        }
    }
}

/// Re-encode a key press as the bytes a raw-mode terminal would send.
fn encode_key(key: KeyEvent, out: &mut VecDeque<u8>) {
    if key.kind == KeyEventKind::Release { return; }

    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        out.push_back(CTRL_C);
        return;
    }

    match key.code {
        KeyCode::Char(c) => {
            let mut buf = [0u8; 4];
            out.extend(c.encode_utf8(&mut buf).bytes());
        }
        KeyCode::Up => out.extend([ESC, b'[', b'A']),
        KeyCode::Down => out.extend([ESC, b'[', b'B']),
        KeyCode::Right => out.extend([ESC, b'[', b'C']),
        KeyCode::Left => out.extend([ESC, b'[', b'D']),
        KeyCode::Esc => out.push_back(ESC),
        KeyCode::Enter => out.push_back(b'\r'),
        KeyCode::Backspace => out.push_back(BACKSPACE),
        KeyCode::Tab => out.push_back(b'\t'),
        _ => {}
    }
}

// ══════════════════════════════════════════════════════════════
// Scripted source (tests)
// ══════════════════════════════════════════════════════════════

/// Replays keystrokes in bursts. Each burst is "already typed": it is
/// visible to `poll_available`. When a burst runs dry, the next poll reports
/// nothing pending and moves on to the following burst, so a drain stops at
/// the burst boundary. A blocking read skips straight to the next burst.
#[cfg(test)]
pub struct ScriptedInput {
    bursts: VecDeque<VecDeque<u8>>,
}

#[cfg(test)]
impl ScriptedInput {
    pub fn new(bytes: &[u8]) -> Self {
        ScriptedInput { bursts: VecDeque::from([bytes.iter().copied().collect()]) }
    }

    /// Queue a burst typed after everything before it has been consumed.
    pub fn then(mut self, bytes: &[u8]) -> Self {
        self.bursts.push_back(bytes.iter().copied().collect());
        self
    }

    pub fn remaining(&self) -> usize {
        self.bursts.iter().map(|b| b.len()).sum()
    }
}

#[cfg(test)]
impl InputSource for ScriptedInput {
    fn poll_available(&mut self) -> bool {
        match self.bursts.front() {
            Some(b) if !b.is_empty() => true,
            Some(_) => {
                self.bursts.pop_front();
                false
            }
            None => false,
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        loop {
            let burst = self.bursts.front_mut()?;
            if let Some(b) = burst.pop_front() { return Some(b); }
            self.bursts.pop_front();
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Decoding
// ══════════════════════════════════════════════════════════════

/// Consume one key and decode it. Returns None for keys with no meaning
/// during play (and when the source is closed).
pub fn read_command<S: InputSource>(src: &mut S) -> Option<Command> {
    let key = src.read_byte()?;
    match key {
        ESC => read_escape(src),
        b'w' | b'W' => Some(Command::Move { dx: 0, dy: -1 }),
        b's' | b'S' => Some(Command::Move { dx: 0, dy: 1 }),
        b'a' | b'A' => Some(Command::Move { dx: -WASD_STEP_X, dy: 0 }),
        b'd' | b'D' => Some(Command::Move { dx: WASD_STEP_X, dy: 0 }),
        b' ' => Some(Command::Eat),
        b'q' | b'Q' | CTRL_C => Some(Command::Quit),
        _ => None,
    }
}

/// After an ESC: an arrow sequence, or a quit request.
fn read_escape<S: InputSource>(src: &mut S) -> Option<Command> {
    // Bare ESC with nothing behind it
    if !src.poll_available() { return Some(Command::Quit); }
    if src.read_byte() != Some(b'[') { return Some(Command::Quit); }

    match src.read_byte()? {
        b'A' => Some(Command::Move { dx: 0, dy: -1 }),
        b'B' => Some(Command::Move { dx: 0, dy: 1 }),
        b'D' => Some(Command::Move { dx: -ARROW_STEP_X, dy: 0 }),
        b'C' => Some(Command::Move { dx: ARROW_STEP_X, dy: 0 }),
        ESC => Some(Command::Quit),
        _ => None,
    }
}

/// Read a line of text in raw mode, echoing to `out`.
///
/// Printable ASCII is accepted up to `max` characters. Backspace erases,
/// Enter finishes, Escape abandons the entry (returns an empty string).
pub fn read_line<S: InputSource, W: Write>(src: &mut S, out: &mut W, max: usize) -> io::Result<String> {
    let mut line = String::new();
    out.flush()?;
    while let Some(b) = src.read_byte() {
        match b {
            b'\r' | b'\n' => break,
            ESC | CTRL_C => {
                line.clear();
                break;
            }
            BACKSPACE | CTRL_H => {
                if line.pop().is_some() {
                    out.write_all(b"\x08 \x08")?;
                }
            }
            0x20..=0x7e if line.len() < max => {
                line.push(b as char);
                out.write_all(&[b])?;
            }
            _ => {}
        }
        out.flush()?;
    }
    out.write_all(b"\r\n")?;
    out.flush()?;
    Ok(line)
}
