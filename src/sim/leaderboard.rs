/// Leaderboard: top five scores, persisted as a flat text file.
///
/// ## File format
///
/// Exactly five lines, best first:
///
/// ```text
/// <score> <name>
/// ```
///
/// `name` is a single whitespace-free token. A missing file, a short file, or
/// a malformed line never fails the load: each bad entry becomes
/// `0 Anonymous`. A hand-edited file may be out of order; it is re-sorted on
/// load. The file is rewritten wholesale on every qualifying save.

use std::path::Path;

use crate::error::{GameError, Result};

pub const LEADERBOARD_SIZE: usize = 5;
pub const MAX_NAME_LEN: usize = 19;
pub const DEFAULT_NAME: &str = "Anonymous";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub score: u32,
    pub name: String,
}

impl LeaderboardEntry {
    pub fn placeholder() -> Self {
        LeaderboardEntry { score: 0, name: DEFAULT_NAME.to_string() }
    }

    pub fn is_placeholder(&self) -> bool {
        self.score == 0
    }
}

/// Always exactly `LEADERBOARD_SIZE` entries, sorted by score descending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Leaderboard { entries: vec![LeaderboardEntry::placeholder(); LEADERBOARD_SIZE] }
    }
}

// ══════════════════════════════════════════════════════════════
// Parsing / formatting
// ══════════════════════════════════════════════════════════════

impl Leaderboard {
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Parse file text. The first `LEADERBOARD_SIZE` lines are read;
    /// anything unreadable becomes a placeholder. Entries come back sorted by
    /// score, best first, equal scores in file order.
    pub fn parse(text: &str) -> Self {
        let mut lines = text.lines();
        let mut entries: Vec<LeaderboardEntry> = (0..LEADERBOARD_SIZE)
            .map(|_| lines.next().and_then(parse_line).unwrap_or_else(LeaderboardEntry::placeholder))
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        Leaderboard { entries }
    }

    pub fn to_text(&self) -> String {
        self.entries.iter()
            .map(|e| format!("{} {}\n", e.score, e.name))
            .collect()
    }
}

fn parse_line(line: &str) -> Option<LeaderboardEntry> {
    let mut tokens = line.split_whitespace();
    let score = tokens.next()?.parse::<u32>().ok()?;
    let name = tokens.next()?;
    Some(LeaderboardEntry { score, name: sanitize_name(name) })
}

/// Make a typed name safe for the one-token file format: trim, replace inner
/// whitespace with `_`, cap the length, fall back to `Anonymous` if empty.
pub fn sanitize_name(raw: &str) -> String {
    let cleaned: String = raw.trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .take(MAX_NAME_LEN)
        .collect();
    if cleaned.is_empty() { DEFAULT_NAME.to_string() } else { cleaned }
}

// ══════════════════════════════════════════════════════════════
// Ranking
// ══════════════════════════════════════════════════════════════

impl Leaderboard {
    /// Does `score` beat the current last place? Ties do not qualify.
    pub fn qualifies(&self, score: u32) -> bool {
        self.entries.last().map_or(true, |last| score > last.score)
    }

    /// Insert a score, shifting lower entries down and dropping the last.
    /// Returns the 0-based rank, or None if the score did not qualify.
    pub fn insert(&mut self, score: u32, name: &str) -> Option<usize> {
        let pos = self.entries.iter().position(|e| score > e.score)?;
        self.entries.insert(pos, LeaderboardEntry { score, name: sanitize_name(name) });
        self.entries.truncate(LEADERBOARD_SIZE);
        Some(pos)
    }
}

// ══════════════════════════════════════════════════════════════
// Disk I/O
// ══════════════════════════════════════════════════════════════

impl Leaderboard {
    /// Load from disk. A missing or unreadable file yields the empty board.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                tracing::info!(path = %path.display(), "leaderboard loaded");
                Leaderboard::parse(&text)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no leaderboard yet, starting empty");
                Leaderboard::default()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "leaderboard unreadable, starting empty");
                Leaderboard::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_text()).map_err(|source| GameError::LeaderboardWrite {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "leaderboard saved");
        Ok(())
    }
}
