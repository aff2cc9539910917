/// The step function: advances the pasture by one tick.
///
/// Processing order (fixed):
///   1. Input: apply at most one command (move / eat request / quit)
///   2. AI cow motion (sub-sampled, see `domain::ai`)
///   3. Eating (only if requested this tick)
///   4. Hazard collision (may end the game; later stages are skipped)
///   5. Field clear bonus + full regrow
///   6. Stochastic single-patch regrow
///   7. Invincibility countdown
///
/// Rendering happens in the session loop after `step` returns.

use rand::Rng;

use crate::domain::ai;
use crate::domain::entity::Command;
use crate::domain::rules::{self, CLEAR_BONUS, GRASS_POINTS, RESPAWN_ODDS};
use super::event::GameEvent;
use super::world::{EndReason, GameState, Phase};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step<R: Rng>(world: &mut GameState, command: Option<Command>, rng: &mut R) -> Vec<GameEvent> {
    if world.phase != Phase::Playing { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    let eat = resolve_input(world, command, &mut events);
    if !world.is_playing() { return events; }

    ai::step_cows(&mut world.cows, &mut world.ai_counter, rng);

    if eat { resolve_eat(world, &mut events); }
    if resolve_hazards(world, &mut events) { return events; }
    resolve_field_clear(world, rng, &mut events);
    resolve_regrow(world, rng, &mut events);
    world.player.tick_invincibility();

    events
}

// ══════════════════════════════════════════════════════════════
// Input
// ══════════════════════════════════════════════════════════════

/// Apply a command. Returns true if the player asked to eat this tick.
fn resolve_input(world: &mut GameState, command: Option<Command>, events: &mut Vec<GameEvent>) -> bool {
    match command {
        Some(Command::Move { dx, dy }) => {
            if let Some((nx, ny)) = rules::player_destination(&world.player, dx, dy) {
                world.player.x = nx;
                world.player.y = ny;
            }
            false
        }
        Some(Command::Eat) => true,
        Some(Command::Quit) => {
            world.end(EndReason::Quit);
            events.push(GameEvent::QuitRequested);
            false
        }
        None => false,
    }
}

// ══════════════════════════════════════════════════════════════
// Eating
// ══════════════════════════════════════════════════════════════

fn resolve_eat(world: &mut GameState, events: &mut Vec<GameEvent>) {
    let idx = match rules::find_edible(&world.player, &world.grass) { Some(i) => i, None => return };
    world.eat_patch(idx);
    world.score += GRASS_POINTS;
    let g = &world.grass[idx];
    events.push(GameEvent::GrassEaten { x: g.x, y: g.y });
}

// ══════════════════════════════════════════════════════════════
// Hazards
// ══════════════════════════════════════════════════════════════

/// Returns true if the hit cost the last life.
fn resolve_hazards(world: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    if rules::find_hazard(&world.player, &world.cows).is_none() { return false; }

    let dead = world.player.hit();
    events.push(GameEvent::PlayerHit { lives_left: world.player.lives });
    tracing::info!(tick = world.tick, lives = world.player.lives, "player hit by a roaming cow");

    if dead {
        world.end(EndReason::OutOfLives);
        events.push(GameEvent::GameOver);
    }
    dead
}

// ══════════════════════════════════════════════════════════════
// Grass: clear bonus and regrow
// ══════════════════════════════════════════════════════════════

fn resolve_field_clear<R: Rng>(world: &mut GameState, rng: &mut R, events: &mut Vec<GameEvent>) {
    if world.grass_count != 0 { return; }
    world.score += CLEAR_BONUS;
    world.regrow_all(rng);
    events.push(GameEvent::FieldCleared);
    tracing::info!(tick = world.tick, score = world.score, "pasture cleared, regrowing");
}

fn resolve_regrow<R: Rng>(world: &mut GameState, rng: &mut R, events: &mut Vec<GameEvent>) {
    if world.grass_count >= world.grass.len() { return; }
    if !rules::one_in(rng, RESPAWN_ODDS) { return; }
    let idx = match world.grass.iter().position(|g| g.eaten) { Some(i) => i, None => return };
    world.regrow_patch(idx, rng);
    let g = &world.grass[idx];
    events.push(GameEvent::GrassRegrown { x: g.x, y: g.y });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{AiCow, INVINCIBLE_TICKS, START_LIVES};
    use crate::domain::field::{self, HEIGHT};
    use crate::sim::world::GRASS_PATCHES;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    /// Seeded game with every cow parked far from the player start and all
    /// grass moved out of the player's reach.
    fn quiet_game(seed: u64) -> (GameState, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut s = GameState::new(&mut rng);
        for (i, c) in s.cows.iter_mut().enumerate() {
            *c = AiCow::new(40 + i as i32 * 4, 2, 0, 0);
        }
        for (i, g) in s.grass.iter_mut().enumerate() {
            g.x = 30 + (i as i32 % 10) * 3;
            g.y = 8 + i as i32 / 10;
        }
        (s, rng)
    }

    #[test]
    fn eat_with_no_grass_nearby_is_noop() {
        let (mut s, mut rng) = quiet_game(1);
        assert_eq!((s.player.x, s.player.y), (3, HEIGHT - 6));
        let events = step(&mut s, Some(Command::Eat), &mut rng);
        assert!(events.is_empty());
        assert_eq!(s.score, 0);
        assert_eq!(s.grass_count, GRASS_PATCHES);
    }

    #[test]
    fn eat_consumes_one_patch() {
        let (mut s, mut rng) = quiet_game(2);
        s.grass[4].x = s.player.x + 2;
        s.grass[4].y = s.player.y + 1;
        s.grass[7].x = s.player.x;
        s.grass[7].y = s.player.y;

        let events = step(&mut s, Some(Command::Eat), &mut rng);
        assert!(s.grass[4].eaten);
        assert!(!s.grass[7].eaten);
        assert_eq!(s.score, GRASS_POINTS);
        assert_eq!(s.grass_count, GRASS_PATCHES - 1);
        assert!(events.contains(&GameEvent::GrassEaten { x: s.grass[4].x, y: s.grass[4].y }));
    }

    #[test]
    fn clearing_field_pays_bonus_and_regrows() {
        let (mut s, mut rng) = quiet_game(3);
        for i in 0..GRASS_PATCHES { s.eat_patch(i); }
        assert_eq!(s.grass_count, 0);

        let events = step(&mut s, None, &mut rng);
        assert_eq!(s.score, CLEAR_BONUS);
        assert_eq!(s.grass_count, GRASS_PATCHES);
        assert!(s.grass.iter().all(|g| !g.eaten));
        assert!(events.contains(&GameEvent::FieldCleared));
    }

    #[test]
    fn hit_costs_one_life_and_grants_invincibility() {
        let (mut s, _) = quiet_game(4);
        s.cows[2] = AiCow::new(s.player.x + 4, s.player.y - 1, 0, 0);
        s.cows[3] = AiCow::new(s.player.x, s.player.y, 0, 0);
        let mut events = vec![];

        assert!(!resolve_hazards(&mut s, &mut events));
        assert_eq!(s.player.lives, START_LIVES - 1);
        assert_eq!(s.player.invincible_ticks, INVINCIBLE_TICKS);
        assert_eq!(events, vec![GameEvent::PlayerHit { lives_left: START_LIVES - 1 }]);
    }

    #[test]
    fn invincible_player_takes_no_damage() {
        let (mut s, mut rng) = quiet_game(5);
        s.cows[0] = AiCow::new(s.player.x, s.player.y, 0, 0);
        s.player.invincible_ticks = 10;

        for _ in 0..9 {
            step(&mut s, None, &mut rng);
            assert_eq!(s.player.lives, START_LIVES);
        }
    }

    #[test]
    fn invincibility_counts_down_each_tick() {
        let (mut s, mut rng) = quiet_game(6);
        s.player.invincible_ticks = 3;
        step(&mut s, None, &mut rng);
        assert_eq!(s.player.invincible_ticks, 2);
    }

    #[test]
    fn last_life_ends_game_and_stops_ticks() {
        let (mut s, mut rng) = quiet_game(7);
        s.player.lives = 1;
        s.cows[0] = AiCow::new(s.player.x + 1, s.player.y, 0, 0);

        let events = step(&mut s, None, &mut rng);
        assert_eq!(s.player.lives, 0);
        assert_eq!(s.phase, Phase::GameOver);
        assert_eq!(s.end_reason, Some(EndReason::OutOfLives));
        assert!(events.contains(&GameEvent::GameOver));

        let tick = s.tick;
        let player = s.player.clone();
        assert!(step(&mut s, Some(Command::Move { dx: 3, dy: 0 }), &mut rng).is_empty());
        assert_eq!(s.tick, tick);
        assert_eq!(s.player, player);
    }

    #[test]
    fn quit_command_ends_game() {
        let (mut s, mut rng) = quiet_game(8);
        let events = step(&mut s, Some(Command::Quit), &mut rng);
        assert_eq!(events, vec![GameEvent::QuitRequested]);
        assert_eq!(s.end_reason, Some(EndReason::Quit));
        assert_eq!(s.ai_counter, 0); // nothing after input ran
    }

    #[test]
    fn move_respects_fence() {
        let (mut s, mut rng) = quiet_game(9);
        step(&mut s, Some(Command::Move { dx: -3, dy: 0 }), &mut rng);
        assert_eq!(s.player.x, 3); // 0 would touch the fence
        step(&mut s, Some(Command::Move { dx: -2, dy: 0 }), &mut rng);
        assert_eq!(s.player.x, 1);
        step(&mut s, Some(Command::Move { dx: 0, dy: 1 }), &mut rng);
        assert_eq!(s.player.y, HEIGHT - 5);
    }

    #[test]
    fn player_stops_on_lowest_drawn_row() {
        let (mut s, mut rng) = quiet_game(11);
        s.player.y = HEIGHT - 5;
        step(&mut s, Some(Command::Move { dx: 0, dy: 1 }), &mut rng);
        assert_eq!(s.player.y, HEIGHT - 5);
        assert!(field::cow_drawable(s.player.x, s.player.y));
    }

    #[test]
    fn grass_count_invariant_under_random_play() {
        let mut rng = SmallRng::seed_from_u64(0xFEED);
        let mut s = GameState::new(&mut rng);
        let moves = [(3, 0), (-3, 0), (2, 0), (-2, 0), (0, 1), (0, -1)];
        for t in 0..5_000u32 {
            s.player.lives = START_LIVES; // keep the game running
            let cmd = match rng.gen_range(0..4) {
                0 => None,
                1 | 2 => Some(Command::Eat),
                _ => {
                    let (dx, dy) = moves[(t as usize) % moves.len()];
                    Some(Command::Move { dx, dy })
                }
            };
            step(&mut s, cmd, &mut rng);
            assert_eq!(s.grass_count, s.live_grass(), "tick {t}");
        }
    }

    #[test]
    fn regrow_revives_first_eaten_patch() {
        let (mut s, _) = quiet_game(10);
        s.eat_patch(2);
        s.eat_patch(6);
        let mut events = vec![];
        let mut rng = SmallRng::seed_from_u64(0);
        // Keep rolling until the 1-in-30 trial fires.
        while events.is_empty() {
            resolve_regrow(&mut s, &mut rng, &mut events);
        }
        assert!(!s.grass[2].eaten);
        assert!(s.grass[6].eaten);
        assert_eq!(s.grass_count, GRASS_PATCHES - 1);
    }
}
