/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to defaults if the file is missing, unreadable or incomplete.
/// Only file locations, the RNG seed and audio are configurable; gameplay
/// constants are fixed.

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub leaderboard_file: PathBuf,
    pub log_file: PathBuf,
    /// Fixed seed for a reproducible pasture. None draws from the OS.
    pub seed: Option<u64>,
    pub sound_enabled: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    sound: TomlSound,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_leaderboard_file")]
    leaderboard_file: String,
    #[serde(default = "default_log_file")]
    log_file: String,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlSound {
    #[serde(default = "default_sound_enabled")]
    enabled: bool,
}

// ── Defaults ──

fn default_leaderboard_file() -> String { "cow_scores.txt".into() }
fn default_log_file() -> String { "cowpasture.log".into() }
fn default_sound_enabled() -> bool { true }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            leaderboard_file: default_leaderboard_file(),
            log_file: default_log_file(),
            seed: None,
        }
    }
}

impl Default for TomlSound {
    fn default() -> Self {
        TomlSound { enabled: default_sound_enabled() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    pub fn load() -> Self {
        GameConfig::from_toml(load_toml(&candidate_dirs()))
    }

    #[cfg(test)]
    pub fn from_toml_str(text: &str) -> Self {
        GameConfig::from_toml(parse_toml(text, Path::new("config.toml")))
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        // Relative paths stay relative: they resolve against the CWD
        GameConfig {
            leaderboard_file: PathBuf::from(cfg.general.leaderboard_file),
            log_file: PathBuf::from(cfg.general.log_file),
            seed: cfg.general.seed,
            sound_enabled: cfg.sound.enabled,
        }
    }
}

/// Exe dir, then CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Follow symlinks so an installed link still finds the real config
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }
    dirs
}

/// First readable `config.toml` wins.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() { continue; }
        match read_toml(&path) {
            Some(cfg) => return cfg,
            None => continue,
        }
    }
    TomlConfig::default()
}

fn read_toml(path: &Path) -> Option<TomlConfig> {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Warning: could not read {}: {e}", path.display());
            return None;
        }
    };
    Some(parse_toml(&text, path))
}

/// Parse config text. A parse error falls back to defaults with a warning.
fn parse_toml(text: &str, origin: &Path) -> TomlConfig {
    match toml::from_str::<TomlConfig>(text) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Warning: {} parse error: {e}", origin.display());
            eprintln!("Using default settings.");
            TomlConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_toml_str("");
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.leaderboard_file, PathBuf::from("cow_scores.txt"));
        assert_eq!(cfg.log_file, PathBuf::from("cowpasture.log"));
        assert_eq!(cfg.seed, None);
        assert!(cfg.sound_enabled);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str("[general]\nseed = 42\n");
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.leaderboard_file, PathBuf::from("cow_scores.txt"));
        assert!(cfg.sound_enabled);

        let cfg = GameConfig::from_toml_str("[sound]\nenabled = false\n");
        assert!(!cfg.sound_enabled);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn paths_are_taken_verbatim() {
        let cfg = GameConfig::from_toml_str(
            "[general]\nleaderboard_file = \"/var/games/cows.txt\"\nlog_file = \"logs/moo.log\"\n",
        );
        assert_eq!(cfg.leaderboard_file, PathBuf::from("/var/games/cows.txt"));
        assert_eq!(cfg.log_file, PathBuf::from("logs/moo.log"));
    }

    #[test]
    fn malformed_toml_falls_back() {
        assert_eq!(GameConfig::from_toml_str("[general\nseed = "), GameConfig::default());
        assert_eq!(GameConfig::from_toml_str("[general]\nseed = \"abc\"\n"), GameConfig::default());
    }

    #[test]
    fn malformed_file_on_disk_stops_the_search() {
        let dir = std::env::temp_dir().join(format!("cowpasture_cfg_bad_{}", std::process::id()));
        let later = std::env::temp_dir().join(format!("cowpasture_cfg_later_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::create_dir_all(&later).unwrap();
        std::fs::write(dir.join("config.toml"), "[general\nseed = ").unwrap();
        std::fs::write(later.join("config.toml"), "[general]\nseed = 9\n").unwrap();

        let cfg = GameConfig::from_toml(load_toml(&[dir.clone(), later.clone()]));
        assert_eq!(cfg, GameConfig::default());
        let _ = std::fs::remove_dir_all(&dir);
        let _ = std::fs::remove_dir_all(&later);
    }

    #[test]
    fn config_file_on_disk_is_read() {
        let dir = std::env::temp_dir().join(format!("cowpasture_cfg_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "[general]\nseed = 7\n").unwrap();

        let cfg = GameConfig::from_toml(load_toml(&[PathBuf::from("/nonexistent_cowpasture"), dir.clone()]));
        assert_eq!(cfg.seed, Some(7));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
