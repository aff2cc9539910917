/// Presentation layer: character-grid frame builder + terminal printer.
///
/// How it works:
///   1. `Field::compose` rasterizes the game state into a WIDTH x HEIGHT
///      grid of chars (pure; no I/O)
///   2. `Renderer::draw_frame` clears the terminal and prints the grid
///      row by row, then the status line
///   3. All commands are batched with `queue!`, flushed once at the end
///
/// Draw order (later wins): blank, fence, grass, AI cows, player.
///
/// The renderer also prints the text screens around a game (intro, game
/// over, leaderboard) and owns terminal setup/teardown.

use std::io::{self, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Sprite, AI_SPRITE, GRASS_GLYPH, PLAYER_SPRITE};
use crate::domain::field::{self, HEIGHT, WIDTH};
use crate::sim::leaderboard::{Leaderboard, MAX_NAME_LEN};
use crate::sim::world::{EndReason, GameState};

const FENCE: char = '#';

// ── Field: the rasterized pasture ──

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    cells: Vec<char>,
}

impl Field {
    pub fn blank() -> Self {
        Field { cells: vec![' '; (WIDTH * HEIGHT) as usize] }
    }

    /// Build the full frame for a game state.
    pub fn compose(state: &GameState) -> Self {
        let mut f = Field::blank();
        f.draw_fence();

        for g in state.grass.iter().filter(|g| !g.eaten) {
            if field::grass_drawable(g.x) {
                f.put_str(g.x, g.y, GRASS_GLYPH);
            }
        }

        for c in &state.cows {
            if field::cow_drawable(c.x, c.y) {
                f.put_sprite(c.x, c.y, &AI_SPRITE);
            }
        }

        let p = &state.player;
        if p.visible() && field::cow_drawable(p.x, p.y) {
            f.put_sprite(p.x, p.y, &PLAYER_SPRITE);
        }

        f
    }

    pub fn get(&self, x: i32, y: i32) -> Option<char> {
        if x < 0 || y < 0 || x >= WIDTH || y >= HEIGHT { return None; }
        Some(self.cells[(y * WIDTH + x) as usize])
    }

    pub fn row(&self, y: i32) -> String {
        let start = (y * WIDTH) as usize;
        self.cells[start..start + WIDTH as usize].iter().collect()
    }

    fn set(&mut self, x: i32, y: i32, ch: char) {
        if x < 0 || y < 0 || x >= WIDTH || y >= HEIGHT { return; }
        self.cells[(y * WIDTH + x) as usize] = ch;
    }

    fn put_str(&mut self, x: i32, y: i32, s: &str) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch);
        }
    }

    fn put_sprite(&mut self, x: i32, y: i32, sprite: &Sprite) {
        for (dy, row) in sprite.iter().enumerate() {
            for (dx, cell) in row.iter().enumerate() {
                if let Some(ch) = cell {
                    self.set(x + dx as i32, y + dy as i32, *ch);
                }
            }
        }
    }

    fn draw_fence(&mut self) {
        for x in 0..WIDTH {
            self.set(x, 0, FENCE);
            self.set(x, HEIGHT - 1, FENCE);
        }
        for y in 0..HEIGHT {
            self.set(0, y, FENCE);
            self.set(WIDTH - 1, y, FENCE);
        }
    }
}

pub fn status_line(state: &GameState) -> String {
    format!(
        "Score: {} | Grass eaten: {} | Lives: {}",
        state.score, state.grass_eaten(), state.player.lives,
    )
}

// ── Screens ──

const COW_FACE: [&str; 8] = [
    r"        /\_/\  /\_/\",
    r"       (           )",
    r"        \ XX   XX /",
    r"         |        |",
    r"         |        |",
    r"         | ( 0   0 ) |",
    r"          \      /",
    r"           \____/",
];

const INTRO: [&str; 9] = [
    "Your black & white cow starts in the lower left corner!",
    "Move with arrow keys or WASD:",
    r"  ^__^",
    r" (@O)\_",
    r"  ||--w|",
    "Press SPACE to eat grass (vvv)",
    "Avoid the all-black cows - each bump costs a life!",
    "Press ESC or Q to quit",
    "",
];

// ── Renderer ──

pub struct Renderer<W: Write> {
    writer: W,
}

impl<W: Write> Renderer<W> {
    pub fn new(writer: W) -> Self {
        Renderer { writer }
    }

    /// Switch the terminal to raw, unbuffered, no-echo mode.
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.writer, cursor::Hide, Clear(ClearType::All), MoveTo(0, 0))
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, cursor::Show)?;
        terminal::disable_raw_mode()
    }

    #[cfg(test)]
    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Raw mode needs an explicit carriage return on every line.
    fn line(&mut self, s: &str) -> io::Result<()> {
        queue!(self.writer, Print(s), Print("\r\n"))
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(self.writer, MoveTo(0, 0), Clear(ClearType::All))
    }

    /// One gameplay frame: clear, grid, status line.
    pub fn draw_frame(&mut self, state: &GameState) -> io::Result<()> {
        let frame = Field::compose(state);
        self.clear()?;
        for y in 0..HEIGHT {
            self.line(&frame.row(y))?;
        }
        self.line(&status_line(state))?;
        self.writer.flush()
    }

    fn cow_face(&mut self) -> io::Result<()> {
        for l in COW_FACE {
            self.line(l)?;
        }
        Ok(())
    }

    fn leaderboard_table(&mut self, board: &Leaderboard) -> io::Result<()> {
        self.line("LEADERBOARD")?;
        self.line("================")?;
        for (i, e) in board.entries().iter().enumerate() {
            let row = if e.is_placeholder() {
                format!("{}. {:<15} ---", i + 1, "Empty")
            } else {
                format!("{}. {:<15} {} pts", i + 1, e.name, e.score)
            };
            self.line(&row)?;
        }
        Ok(())
    }

    pub fn show_intro(&mut self, board: &Leaderboard) -> io::Result<()> {
        self.clear()?;
        self.line("=== ASCII COW PASTURE GAME ===")?;
        self.line("")?;
        self.cow_face()?;
        self.line("")?;
        for l in INTRO {
            self.line(l)?;
        }
        self.leaderboard_table(board)?;
        self.line("")?;
        self.line("Press any key to start...")?;
        self.writer.flush()
    }

    pub fn show_game_over(&mut self, state: &GameState) -> io::Result<()> {
        self.clear()?;
        self.line("")?;
        self.cow_face()?;
        self.line("")?;
        self.line("GAME OVER!")?;
        match state.end_reason {
            Some(EndReason::OutOfLives) => self.line("The black cows trampled your last life.")?,
            Some(EndReason::Quit) => self.line("You left the pasture.")?,
            None => {}
        }
        self.line(&format!("Final Score: {}", state.score))?;
        self.line(&format!("Grass eaten: {}", state.grass_eaten()))?;
        self.writer.flush()
    }

    pub fn prompt_name(&mut self) -> io::Result<()> {
        self.line("")?;
        self.line("NEW HIGH SCORE!")?;
        queue!(self.writer, Print(format!("Enter your name (max {} chars): ", MAX_NAME_LEN)))?;
        self.writer.flush()
    }

    pub fn show_warning(&mut self, msg: &str) -> io::Result<()> {
        self.line(&format!("Warning: {msg}"))?;
        self.writer.flush()
    }

    pub fn show_farewell(&mut self, board: &Leaderboard) -> io::Result<()> {
        self.line("")?;
        self.leaderboard_table(board)?;
        self.line("")?;
        self.cow_face()?;
        self.line("")?;
        self.line("Press any key to exit...")?;
        self.writer.flush()
    }
}
