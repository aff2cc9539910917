/// AI cow motion: bounded random walk with reflective fence bounces.
///
/// Cows only move on every `AI_MOVE_EVERY`th tick so they drift slower than
/// the player. On a move tick, each cow:
///   1. With odds 1 in `TURN_ODDS`, re-rolls dx and dy from {-1, 0, 1}.
///   2. Proposes `pos + vel * step` (x step 3, y step 1: glyphs are taller
///      than they are wide, so a column is "shorter" than a row).
///   3. Per axis, if the proposal leaves `field::cow_fits`, flips that velocity
///      component and re-proposes that axis only.
///   4. Applies the result.
///
/// All randomness comes from the caller's RNG.

use rand::Rng;

use super::entity::AiCow;
use super::field;

/// Move AI cows on every Nth tick.
pub const AI_MOVE_EVERY: u32 = 4;
/// 1-in-N chance per move tick that a cow picks a new heading.
pub const TURN_ODDS: u32 = 20;
pub const X_STEP: i32 = 3;
pub const Y_STEP: i32 = 1;

/// Uniform pick from {-1, 0, 1}.
pub fn random_heading<R: Rng>(rng: &mut R) -> i32 {
    rng.gen_range(-1..=1)
}

/// Tick the sub-sampling counter. Returns true when this tick is a move tick,
/// and resets the counter.
pub fn advance_counter(counter: &mut u32) -> bool {
    *counter += 1;
    if *counter < AI_MOVE_EVERY { return false; }
    *counter = 0;
    true
}

/// Run one orchestrator tick of AI motion. Returns true if the cows moved.
pub fn step_cows<R: Rng>(cows: &mut [AiCow], counter: &mut u32, rng: &mut R) -> bool {
    if !advance_counter(counter) { return false; }
    for cow in cows.iter_mut() {
        move_cow(cow, rng);
    }
    true
}

/// One motion step for a single cow.
pub fn move_cow<R: Rng>(cow: &mut AiCow, rng: &mut R) {
    if rng.gen_range(0..TURN_ODDS) == 0 {
        cow.dx = random_heading(rng);
        cow.dy = random_heading(rng);
    }
    cow.x = reflect(cow.x, &mut cow.dx, X_STEP, field::cow_x_fits);
    cow.y = reflect(cow.y, &mut cow.dy, Y_STEP, field::cow_y_fits);
}

fn reflect(pos: i32, vel: &mut i32, step: i32, fits: fn(i32) -> bool) -> i32 {
    let candidate = pos + *vel * step;
    if fits(candidate) { return candidate; }
    *vel = -*vel;
    pos + *vel * step
}
