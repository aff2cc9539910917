/// Entities: Player, AiCow, GrassPatch, plus the per-tick Command.
/// Pure data with small lifecycle helpers; no RNG, no I/O.

/// Lives at the start of a game.
pub const START_LIVES: u32 = 3;

/// Invincibility window after a hit (60 ticks ~ 5 s at 80 ms/tick).
pub const INVINCIBLE_TICKS: u32 = 60;

/// Sprites are stored as fixed 7x3 rows. `None` cells are transparent:
/// whatever was drawn underneath stays visible.
pub type Sprite = [[Option<char>; 7]; 3];

const fn sprite(rows: [&[u8; 7]; 3]) -> Sprite {
    let mut out = [[None; 7]; 3];
    let mut r = 0;
    while r < 3 {
        let mut c = 0;
        while c < 7 {
            let b = rows[r][c];
            out[r][c] = if b == b'~' { None } else { Some(b as char) };
            c += 1;
        }
        r += 1;
    }
    out
}

// '~' marks a transparent cell
pub const PLAYER_SPRITE: Sprite = sprite([
    b" ^__^~~",
    b"(@O)\\_~",
    b"~||--w|",
]);

pub const AI_SPRITE: Sprite = sprite([
    b" ^__^~~",
    b"(@@)\\_~",
    b"~||--w|",
]);

pub const GRASS_GLYPH: &str = "vvv";

/// One decoded input event. At most one is applied per tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move { dx: i32, dy: i32 },
    Eat,
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    pub lives: u32,
    pub invincible_ticks: u32,
}

impl Player {
    pub fn new(x: i32, y: i32) -> Self {
        Player { x, y, lives: START_LIVES, invincible_ticks: 0 }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }

    /// Take one hit: lose a life and open the invincibility window.
    /// Returns true if that was the last life.
    pub fn hit(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.invincible_ticks = INVINCIBLE_TICKS;
        self.lives == 0
    }

    /// Advance the invincibility countdown by one tick.
    pub fn tick_invincibility(&mut self) {
        self.invincible_ticks = self.invincible_ticks.saturating_sub(1);
    }

    /// Blink phase: while invincible the sprite shows 4 ticks, hides 4.
    pub fn visible(&self) -> bool {
        !self.is_invincible() || self.invincible_ticks % 8 < 4
    }
}

/// A roaming cow. Velocity components are always in {-1, 0, 1}.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiCow {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
}

impl AiCow {
    pub fn new(x: i32, y: i32, dx: i32, dy: i32) -> Self {
        AiCow { x, y, dx, dy }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrassPatch {
    pub x: i32,
    pub y: i32,
    pub eaten: bool,
}

impl GrassPatch {
    pub fn new(x: i32, y: i32) -> Self {
        GrassPatch { x, y, eaten: false }
    }

    /// Move the patch to a fresh spot and make it edible again.
    pub fn regrow(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
        self.eaten = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_lifecycle() {
        let mut p = Player::new(3, 19);
        assert_eq!(p.lives, START_LIVES);
        assert!(!p.is_invincible());

        assert!(!p.hit());
        assert_eq!(p.lives, START_LIVES - 1);
        assert_eq!(p.invincible_ticks, INVINCIBLE_TICKS);

        for _ in 0..INVINCIBLE_TICKS { p.tick_invincibility(); }
        assert!(!p.is_invincible());
        p.tick_invincibility(); // saturates at 0
        assert_eq!(p.invincible_ticks, 0);
    }

    #[test]
    fn last_life_reports_dead() {
        let mut p = Player::new(3, 19);
        p.lives = 1;
        assert!(p.hit());
        assert_eq!(p.lives, 0);
    }

    #[test]
    fn blink_phase() {
        let mut p = Player::new(3, 19);
        assert!(p.visible());
        p.invincible_ticks = 60; // 60 % 8 == 4
        assert!(!p.visible());
        p.invincible_ticks = 59; // 3
        assert!(p.visible());
        p.invincible_ticks = 8; // 0
        assert!(p.visible());
        p.invincible_ticks = 7;
        assert!(!p.visible());
    }

    #[test]
    fn sprites_have_expected_shape() {
        assert_eq!(PLAYER_SPRITE[1][2], Some('O'));
        assert_eq!(AI_SPRITE[1][2], Some('@'));
        assert_eq!(PLAYER_SPRITE[0][5], None);
        assert_eq!(AI_SPRITE[2][0], None);
        assert_eq!(AI_SPRITE[2][6], Some('|'));
    }

    #[test]
    fn regrow_resets_eaten() {
        let mut g = GrassPatch::new(4, 4);
        g.eaten = true;
        g.regrow(10, 12);
        assert_eq!(g, GrassPatch::new(10, 12));
    }
}
