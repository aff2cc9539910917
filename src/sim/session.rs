/// Session: drives one game through its phases.
///
///   Intro → Playing → GameOver → LeaderboardEntry → Exit
///
/// The session owns every outside-world handle (keyboard, screen, clock, RNG,
/// audio) as a generic parameter, so a whole game can run in tests against a
/// key script, a byte buffer and a clock that never sleeps.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use rand::Rng;

use crate::error::Result;
use crate::ui::input::{read_command, read_line, InputSource};
use crate::ui::renderer::Renderer;
use crate::ui::sound::SoundEngine;
use super::event::GameEvent;
use super::leaderboard::{Leaderboard, MAX_NAME_LEN};
use super::step;
use super::world::{GameState, Phase};

/// Delay between ticks.
pub const TICK: Duration = Duration::from_millis(80);

const ESC: u8 = 0x1b;

// ── Clock ──

pub trait Clock {
    fn sleep(&mut self, d: Duration);
}

pub struct ThreadClock;

impl Clock for ThreadClock {
    fn sleep(&mut self, d: Duration) {
        std::thread::sleep(d);
    }
}

/// Counts sleeps instead of sleeping.
#[cfg(test)]
#[derive(Default)]
pub struct ManualClock {
    pub sleeps: u64,
    pub elapsed: Duration,
}

#[cfg(test)]
impl Clock for ManualClock {
    fn sleep(&mut self, d: Duration) {
        self.sleeps += 1;
        self.elapsed += d;
    }
}

// ══════════════════════════════════════════════════════════════
// Session
// ══════════════════════════════════════════════════════════════

pub struct Session<S: InputSource, W: Write, C: Clock, R: Rng> {
    pub input: S,
    pub renderer: Renderer<W>,
    pub clock: C,
    pub rng: R,
    pub sound: Option<SoundEngine>,
    /// Stop Playing after this many ticks even if the game is still on.
    pub max_ticks: Option<u64>,
}

impl<S: InputSource, W: Write, C: Clock, R: Rng> Session<S, W, C, R> {
    pub fn new(input: S, renderer: Renderer<W>, clock: C, rng: R) -> Self {
        Session { input, renderer, clock, rng, sound: None, max_ticks: None }
    }

    /// Play one full game. The board is updated in place and written to
    /// `board_path` if the score made it in.
    pub fn run(&mut self, board: &mut Leaderboard, board_path: &Path) -> Result<GameState> {
        let mut state = GameState::new(&mut self.rng);
        state.phase = Phase::Intro;

        loop {
            match state.phase {
                Phase::Intro => {
                    self.renderer.show_intro(board)?;
                    self.wait_for_key();
                    state.phase = Phase::Playing;
                    tracing::info!("game started");
                }
                Phase::Playing => {
                    self.play(&mut state);
                    // Tick limit hit with the game still running
                    if state.phase == Phase::Playing { state.phase = Phase::GameOver; }
                }
                Phase::GameOver => {
                    tracing::info!(
                        score = state.score,
                        grass = state.grass_eaten(),
                        ticks = state.tick,
                        reason = ?state.end_reason,
                        "game over"
                    );
                    self.renderer.show_game_over(&state)?;
                    state.phase = Phase::LeaderboardEntry;
                }
                Phase::LeaderboardEntry => {
                    self.enter_leaderboard(&state, board, board_path)?;
                    state.phase = Phase::Exit;
                }
                Phase::Exit => {
                    self.renderer.show_farewell(board)?;
                    self.wait_for_key();
                    return Ok(state);
                }
            }
        }
    }

    /// The Playing loop. Returns the number of ticks run.
    pub fn play(&mut self, state: &mut GameState) -> u64 {
        let mut ran = 0u64;
        while state.is_playing() {
            if self.max_ticks.is_some_and(|limit| ran >= limit) { break; }

            let command = if self.input.poll_available() { read_command(&mut self.input) } else { None };
            let events = step::step(state, command, &mut self.rng);
            ran += 1;
            self.report(&events);

            if !state.is_playing() { break; }
            if let Err(e) = self.renderer.draw_frame(state) {
                tracing::warn!(tick = state.tick, error = %e, "frame draw failed");
            }
            self.clock.sleep(TICK);
        }
        ran
    }

    fn report(&self, events: &[GameEvent]) {
        for event in events {
            tracing::debug!(?event, "step event");
        }
        let sfx = match &self.sound { Some(s) => s, None => return };
        for event in events {
            match event {
                GameEvent::GrassEaten { .. } => sfx.play_eat(),
                GameEvent::PlayerHit { lives_left } if *lives_left > 0 => sfx.play_hit(),
                GameEvent::FieldCleared => sfx.play_clear(),
                GameEvent::GameOver => sfx.play_game_over(),
                _ => {}
            }
        }
    }

    /// Prompt for a name if the score qualifies, then persist the board.
    /// A failed save is reported on screen and play carries on.
    pub fn enter_leaderboard(&mut self, state: &GameState, board: &mut Leaderboard, path: &Path) -> Result<()> {
        if !board.qualifies(state.score) { return Ok(()); }

        // Keys mashed during play must not end up in the name
        self.input.drain();
        self.renderer.prompt_name()?;
        let name = read_line(&mut self.input, self.renderer.writer_mut(), MAX_NAME_LEN)?;

        if let Some(rank) = board.insert(state.score, &name) {
            tracing::info!(score = state.score, rank = rank + 1, "new high score");
        }
        if let Err(e) = board.save(path) {
            tracing::warn!(error = %e, "leaderboard not saved");
            self.renderer.show_warning(&e.to_string())?;
        }
        Ok(())
    }

    /// Block for one keystroke. An arrow key arrives as three bytes; swallow
    /// the tail so it is not read as two more keys.
    fn wait_for_key(&mut self) {
        if self.input.read_byte() != Some(ESC) { return; }
        for _ in 0..2 {
            if !self.input.poll_available() { break; }
            self.input.read_byte();
        }
    }
}
