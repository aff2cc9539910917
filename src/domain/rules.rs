/// Collision, eating and placement rules.
///
/// Pure functions over entity data. No side effects.
/// These encode "what happens" without performing it; `sim::step` applies
/// the outcome to the world.
///
/// ## Eat (Space)
/// ┌───────────────────────────────┬───────────────┐
/// │ Condition                      │ Result        │
/// ├───────────────────────────────┼───────────────┤
/// │ patch eaten                    │ skip          │
/// │ patch outside reach            │ skip          │
/// │ first remaining match (pool order) │ EAT       │
/// │ no match                       │ no-op         │
/// └───────────────────────────────┴───────────────┘
///
/// ## Hazard
/// ┌───────────────────────────────┬───────────────┐
/// │ Condition                      │ Result        │
/// ├───────────────────────────────┼───────────────┤
/// │ player invincible              │ no check      │
/// │ first AI cow overlapping       │ HIT (stop)    │
/// │ none overlapping               │ safe          │
/// └───────────────────────────────┴───────────────┘
///
/// ## Player move
/// ┌───────────────────────────────┬───────────────┐
/// │ Destination sprite in interior │ MOVE          │
/// │ Otherwise                      │ stay put      │
/// └───────────────────────────────┴───────────────┘

use rand::Rng;

use super::entity::{AiCow, GrassPatch, Player};
use super::field::{self, HEIGHT, WIDTH};

pub const GRASS_POINTS: u32 = 10;
pub const CLEAR_BONUS: u32 = 100;
/// 1-in-N chance per tick that one eaten patch regrows.
pub const RESPAWN_ODDS: u32 = 30;

/// Minimum start distance between an AI cow and the player.
/// Resample while BOTH axes are closer than this.
pub const SAFE_START_X: i32 = 12;
pub const SAFE_START_Y: i32 = 6;

// ── Player movement ──

/// Where would the player end up after `(dx, dy)`? None if the move would
/// push the sprite into the fence.
pub fn player_destination(p: &Player, dx: i32, dy: i32) -> Option<(i32, i32)> {
    let nx = p.x + dx;
    let ny = p.y + dy;
    if !field::cow_fits(nx, ny) { return None; }
    Some((nx, ny))
}

// ── Eating ──

/// Index of the first uneaten patch within reach, in pool order.
pub fn find_edible(p: &Player, grass: &[GrassPatch]) -> Option<usize> {
    grass.iter().position(|g| !g.eaten && field::grass_in_reach(p.x, p.y, g.x, g.y))
}

// ── Hazards ──

/// Index of the first AI cow touching the player, or None while the player
/// is invincible.
pub fn find_hazard(p: &Player, cows: &[AiCow]) -> Option<usize> {
    if p.is_invincible() { return None; }
    cows.iter().position(|c| field::cows_overlap(p.x, p.y, c.x, c.y))
}

// ── Placement ──

/// Random spot for a grass patch: x in [4, W-5], y in [3, H-4].
pub fn random_grass_spot<R: Rng>(rng: &mut R) -> (i32, i32) {
    (rng.gen_range(4..=WIDTH - 5), rng.gen_range(3..=HEIGHT - 4))
}

/// Random spot for an AI cow: x in [7, W-8], y in [4, H-5].
pub fn random_cow_spot<R: Rng>(rng: &mut R) -> (i32, i32) {
    (rng.gen_range(7..=WIDTH - 8), rng.gen_range(4..=HEIGHT - 5))
}

/// Is an AI spawn point far enough from the player start?
pub fn clear_of_start(x: i32, y: i32, px: i32, py: i32) -> bool {
    (x - px).abs() >= SAFE_START_X || (y - py).abs() >= SAFE_START_Y
}

/// Bernoulli trial with 1-in-`odds` success.
pub fn one_in<R: Rng>(rng: &mut R, odds: u32) -> bool {
    rng.gen_range(0..odds) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn patch(x: i32, y: i32, eaten: bool) -> GrassPatch {
        GrassPatch { x, y, eaten }
    }

    // ── Movement ──

    #[test]
    fn move_inside_interior() {
        let p = Player::new(10, 10);
        assert_eq!(player_destination(&p, 3, 0), Some((13, 10)));
        assert_eq!(player_destination(&p, 0, -1), Some((10, 9)));
    }

    #[test]
    fn move_into_fence_rejected() {
        let p = Player::new(1, 1);
        assert_eq!(player_destination(&p, -2, 0), None);
        assert_eq!(player_destination(&p, 0, -1), None);
        let p = Player::new(WIDTH - 8, HEIGHT - 5);
        assert_eq!(player_destination(&p, 3, 0), None);
        assert_eq!(player_destination(&p, 0, 1), None);
    }

    // ── Eating ──

    #[test]
    fn edible_first_match_wins() {
        let p = Player::new(10, 10);
        let grass = vec![
            patch(40, 10, false), // far away
            patch(12, 11, true),  // eaten
            patch(15, 12, false), // first match
            patch(11, 10, false), // closer, but later in pool
        ];
        assert_eq!(find_edible(&p, &grass), Some(2));
    }

    #[test]
    fn nothing_in_reach() {
        let p = Player::new(10, 10);
        let grass = vec![patch(10, 13, false), patch(17, 10, false), patch(6, 11, false)];
        assert_eq!(find_edible(&p, &grass), None);
    }

    // ── Hazards ──

    #[test]
    fn hazard_detected_when_overlapping() {
        let p = Player::new(10, 10);
        let cows = vec![AiCow::new(30, 10, 0, 0), AiCow::new(15, 12, 0, 0), AiCow::new(10, 10, 0, 0)];
        assert_eq!(find_hazard(&p, &cows), Some(1));
    }

    #[test]
    fn hazard_ignored_while_invincible() {
        let mut p = Player::new(10, 10);
        p.invincible_ticks = 1;
        let cows = vec![AiCow::new(10, 10, 0, 0)];
        assert_eq!(find_hazard(&p, &cows), None);
    }

    // ── Placement ──

    #[test]
    fn spawn_spots_stay_in_interior() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..2_000 {
            let (x, y) = random_cow_spot(&mut rng);
            assert!(field::cow_fits(x, y));
            let (gx, gy) = random_grass_spot(&mut rng);
            assert!(field::grass_drawable(gx));
            assert!(gy >= 1 && gy <= HEIGHT - 2);
        }
    }

    #[test]
    fn start_clearance_needs_one_axis() {
        assert!(!clear_of_start(10, 20, 3, 19));
        assert!(clear_of_start(15, 19, 3, 19));
        assert!(clear_of_start(4, 13, 3, 19));
    }

    #[test]
    fn one_in_one_always_fires() {
        let mut rng = SmallRng::seed_from_u64(11);
        assert!((0..50).all(|_| one_in(&mut rng, 1)));
    }
}
