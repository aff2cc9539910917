/// Pasture geometry: field size, sprite footprints, and the bounds/overlap
/// predicates every other system asks.
///
/// Geometry is centralized here so that AI, input, rules and renderer agree
/// on exactly one definition of "inside the fence".
///
/// ## Coordinate system
///
/// `(x, y)` is the top-left cell of a sprite. `x` grows right, `y` grows down.
/// Row 0 / row HEIGHT-1 and column 0 / column WIDTH-1 are the fence.
///
/// ## Footprints
/// ┌──────────┬───────┬────────┐
/// │ Sprite    │ Cols  │ Rows   │
/// ├──────────┼───────┼────────┤
/// │ Cow       │ 7     │ 3      │
/// │ Grass     │ 3     │ 1      │
/// └──────────┴───────┴────────┘

pub const WIDTH: i32 = 70;
pub const HEIGHT: i32 = 25;

pub const COW_W: i32 = 7;
pub const COW_H: i32 = 3;
pub const GRASS_W: i32 = 3;

/// Reach to the left of the player's sprite when eating, in columns.
/// A `vvv` patch whose last cell touches the cow's first column still counts.
pub const EAT_REACH_LEFT: i32 = 3;

// ── Standing bounds ──

/// Can a cow sprite stand at (x, y)? The sprite stays inside the fence
/// horizontally; vertically the top row stays above `HEIGHT-4`, the lowest
/// row the renderer draws a cow at.
#[inline]
pub fn cow_x_fits(x: i32) -> bool {
    x >= 1 && x + COW_W - 1 <= WIDTH - 2
}

#[inline]
pub fn cow_y_fits(y: i32) -> bool {
    y >= 1 && y < HEIGHT - 4
}

#[inline]
pub fn cow_fits(x: i32, y: i32) -> bool {
    cow_x_fits(x) && cow_y_fits(y)
}

// ── Draw rules (renderer skip conditions) ──

/// Is a grass patch far enough from the right fence to be drawn?
#[inline]
pub fn grass_drawable(x: i32) -> bool {
    x > 0 && x < WIDTH - GRASS_W
}

/// Is a cow sprite far enough from every fence to be drawn?
#[inline]
pub fn cow_drawable(x: i32, y: i32) -> bool {
    x > 0 && x < WIDTH - COW_W && y > 0 && y < HEIGHT - 4
}

// ── Overlap ──

/// Do two 7x3 cow sprites overlap?
#[inline]
pub fn cows_overlap(ax: i32, ay: i32, bx: i32, by: i32) -> bool {
    (ay - by).abs() <= COW_H - 1 && (ax - bx).abs() <= COW_W - 1
}

/// Is a grass patch at (gx, gy) within eating reach of a cow at (px, py)?
#[inline]
pub fn grass_in_reach(px: i32, py: i32, gx: i32, gy: i32) -> bool {
    gx >= px - EAT_REACH_LEFT
        && gx <= px + COW_W - 1
        && gy >= py
        && gy <= py + COW_H - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_edges() {
        assert!(cow_fits(1, 1));
        assert!(cow_fits(WIDTH - 8, HEIGHT - 5));
        assert!(!cow_fits(0, 5));
        assert!(!cow_fits(WIDTH - 7, 5)); // last column would sit on the fence
        assert!(!cow_fits(5, HEIGHT - 4)); // never drawn there
        assert!(!cow_fits(5, HEIGHT - 3));
        assert!(!cow_fits(5, 0));
    }

    #[test]
    fn draw_rules_match_fence() {
        assert!(grass_drawable(WIDTH - 4));
        assert!(!grass_drawable(WIDTH - 3));
        assert!(!grass_drawable(0));
        assert!(cow_drawable(WIDTH - 8, HEIGHT - 5));
        assert!(!cow_drawable(WIDTH - 7, 5));
        assert!(!cow_drawable(5, HEIGHT - 4));
    }

    #[test]
    fn standable_spots_are_exactly_drawable_spots() {
        for y in -2..HEIGHT + 2 {
            for x in -2..WIDTH + 2 {
                assert_eq!(cow_fits(x, y), cow_drawable(x, y), "({x}, {y})");
            }
        }
    }

    #[test]
    fn cow_overlap_window() {
        assert!(cows_overlap(10, 10, 16, 12));
        assert!(cows_overlap(10, 10, 4, 8));
        assert!(!cows_overlap(10, 10, 17, 10));
        assert!(!cows_overlap(10, 10, 10, 13));
    }

    #[test]
    fn grass_reach_window() {
        // left reach
        assert!(grass_in_reach(10, 10, 7, 10));
        assert!(!grass_in_reach(10, 10, 6, 10));
        // right edge of sprite
        assert!(grass_in_reach(10, 10, 16, 12));
        assert!(!grass_in_reach(10, 10, 17, 12));
        // rows
        assert!(!grass_in_reach(10, 10, 12, 9));
        assert!(!grass_in_reach(10, 10, 12, 13));
    }
}
