/// GameState: everything a running game knows, owned by the loop.
///
/// ## Entity store
///
/// `player`, `cows` and `grass` are plain data. Only three systems write
/// them: input application and rules (`sim::step`) and AI motion
/// (`domain::ai`). The renderer only reads.
///
/// ## Counters
///
/// `grass_count` mirrors the number of uneaten patches. Every path that
/// flips `GrassPatch::eaten` goes through `eat_patch` / `regrow_patch` /
/// `regrow_all` so the two never drift.

use rand::Rng;

use crate::domain::ai;
use crate::domain::entity::{AiCow, GrassPatch, Player};
use crate::domain::field::HEIGHT;
use crate::domain::rules;

pub const AI_COWS: usize = 5;
pub const GRASS_PATCHES: usize = 25;

/// Player start: lower-left, clear of the fence.
pub const PLAYER_START: (i32, i32) = (3, HEIGHT - 6);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Intro,
    Playing,
    GameOver,
    LeaderboardEntry,
    Exit,
}

/// Why play stopped.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EndReason {
    Quit,
    OutOfLives,
}

pub struct GameState {
    // ── Entities ──
    pub player: Player,
    pub cows: Vec<AiCow>,
    pub grass: Vec<GrassPatch>,

    // ── Tracking ──
    pub grass_count: usize,
    pub score: u32,
    pub tick: u64,
    /// AI sub-sampling counter (see `ai::advance_counter`).
    pub ai_counter: u32,

    // ── Meta ──
    pub phase: Phase,
    pub end_reason: Option<EndReason>,
}

impl GameState {
    /// Fresh game with randomized cows and grass.
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let (px, py) = PLAYER_START;
        let player = Player::new(px, py);

        let cows = (0..AI_COWS)
            .map(|_| {
                let (mut x, mut y) = rules::random_cow_spot(rng);
                let dx = ai::random_heading(rng);
                let dy = ai::random_heading(rng);
                while !rules::clear_of_start(x, y, px, py) {
                    (x, y) = rules::random_cow_spot(rng);
                }
                AiCow::new(x, y, dx, dy)
            })
            .collect();

        let grass = (0..GRASS_PATCHES)
            .map(|_| {
                let (x, y) = rules::random_grass_spot(rng);
                GrassPatch::new(x, y)
            })
            .collect();

        GameState {
            player,
            cows,
            grass,
            grass_count: GRASS_PATCHES,
            score: 0,
            tick: 0,
            ai_counter: 0,
            phase: Phase::Playing,
            end_reason: None,
        }
    }

    /// Number of patches eaten since the last full regrow.
    pub fn grass_eaten(&self) -> usize {
        GRASS_PATCHES - self.grass_count
    }

    /// Set the terminal condition for the play loop.
    pub fn end(&mut self, reason: EndReason) {
        self.phase = Phase::GameOver;
        self.end_reason = Some(reason);
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }
}

// ── Grass mutation API (keeps grass_count in sync) ──

impl GameState {
    pub fn eat_patch(&mut self, idx: usize) {
        let g = &mut self.grass[idx];
        if g.eaten { return; }
        g.eaten = true;
        self.grass_count -= 1;
    }

    pub fn regrow_patch<R: Rng>(&mut self, idx: usize, rng: &mut R) {
        let (x, y) = rules::random_grass_spot(rng);
        let g = &mut self.grass[idx];
        let was_eaten = g.eaten;
        g.regrow(x, y);
        if was_eaten { self.grass_count += 1; }
    }

    pub fn regrow_all<R: Rng>(&mut self, rng: &mut R) {
        for g in self.grass.iter_mut() {
            let (x, y) = rules::random_grass_spot(rng);
            g.regrow(x, y);
        }
        self.grass_count = self.grass.len();
    }

    /// Recount uneaten patches, to check `grass_count` against.
    #[cfg(test)]
    pub fn live_grass(&self) -> usize {
        self.grass.iter().filter(|g| !g.eaten).count()
    }
}
