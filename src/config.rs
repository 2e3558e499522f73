/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// A file that cannot be read or parsed is reported as a warning and
/// replaced by defaults; it never stops the game.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} parse error: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub seed: u64,
    pub sound_enabled: bool,
    pub logging: LoggingConfig,
    pub gamepad: GamepadConfig,
    /// Problems met while loading, for the log once it is up.
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    pub tick_rate_ms: u64,
    pub enemy_turn_ticks: u32,
    pub settle_ticks: u32,
    pub reset_turn_ticks: u32,       // enemy turn after a soft reset
    pub level_complete_ticks: u32,   // banner before the next screen
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `None` means no subscriber is installed.
    pub file: Option<PathBuf>,
    pub level: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub restart: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    sound: TomlSound,
    #[serde(default)]
    logging: TomlLogging,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_enemy_turn")]
    enemy_turn_ticks: u32,
    #[serde(default = "default_settle")]
    settle_ticks: u32,
    #[serde(default = "default_reset_turn")]
    reset_turn_ticks: u32,
    #[serde(default = "default_level_complete")]
    level_complete_ticks: u32,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGame {
    #[serde(default)]
    seed: u64,
}

#[derive(Deserialize, Debug)]
struct TomlSound {
    #[serde(default = "default_true")]
    enabled: bool,
}

#[derive(Deserialize, Debug)]
struct TomlLogging {
    #[serde(default)]
    file: String,
    #[serde(default = "default_log_level")]
    level: String,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_restart")]
    restart: Vec<String>,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 50 }
fn default_enemy_turn() -> u32 { 20 }      // 1s
fn default_settle() -> u32 { 10 }          // 0.5s
fn default_reset_turn() -> u32 { 30 }      // 1.5s
fn default_level_complete() -> u32 { 10 }  // 0.5s
fn default_true() -> bool { true }
fn default_log_level() -> String { "info".into() }

fn default_confirm() -> Vec<String> { vec!["A".into(), "Start".into()] }
fn default_cancel() -> Vec<String> { vec!["B".into()] }
fn default_restart() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            tick_rate_ms: default_tick_rate(),
            enemy_turn_ticks: default_enemy_turn(),
            settle_ticks: default_settle(),
            reset_turn_ticks: default_reset_turn(),
            level_complete_ticks: default_level_complete(),
        }
    }
}

impl Default for TomlSound {
    fn default() -> Self {
        TomlSound { enabled: true }
    }
}

impl Default for TomlLogging {
    fn default() -> Self {
        TomlLogging { file: String::new(), level: default_log_level() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
            restart: default_restart(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default()).timing
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let mut warnings = Vec::new();
        let toml_cfg = match load_toml(&candidate_dirs()) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Warning: {e}");
                eprintln!("Using default settings.");
                warnings.push(e.to_string());
                TomlConfig::default()
            }
        };
        let mut cfg = GameConfig::from_toml(toml_cfg);
        cfg.warnings = warnings;
        cfg
    }

    /// Parse a config document. Keys that are absent take their defaults.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        Ok(GameConfig::from_toml(toml_cfg))
    }

    fn from_toml(t: TomlConfig) -> Self {
        let file = t.logging.file.trim();
        GameConfig {
            timing: TimingConfig {
                tick_rate_ms: t.timing.tick_rate_ms.max(1),
                enemy_turn_ticks: t.timing.enemy_turn_ticks,
                settle_ticks: t.timing.settle_ticks,
                reset_turn_ticks: t.timing.reset_turn_ticks,
                level_complete_ticks: t.timing.level_complete_ticks,
            },
            seed: t.game.seed,
            sound_enabled: t.sound.enabled,
            logging: LoggingConfig {
                file: (!file.is_empty()).then(|| PathBuf::from(file)),
                level: t.logging.level,
            },
            gamepad: GamepadConfig {
                confirm: t.gamepad.confirm,
                cancel: t.gamepad.cancel,
                restart: t.gamepad.restart,
            },
            warnings: Vec::new(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
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

/// First `config.toml` found wins. None found is not an error.
fn load_toml(search_dirs: &[PathBuf]) -> Result<TomlConfig, ConfigError> {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
            return toml::from_str::<TomlConfig>(&text)
                .map_err(|source| ConfigError::Parse { path, source });
        }
    }
    Ok(TomlConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<GameConfig, ConfigError> {
        GameConfig::parse(text, Path::new("config.toml"))
    }

    #[test]
    fn empty_document_is_all_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.timing, TimingConfig {
            tick_rate_ms: 50,
            enemy_turn_ticks: 20,
            settle_ticks: 10,
            reset_turn_ticks: 30,
            level_complete_ticks: 10,
        });
        assert_eq!(cfg.seed, 0);
        assert!(cfg.sound_enabled);
        assert_eq!(cfg.logging.file, None);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.gamepad.cancel, vec!["B".to_string()]);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = parse("[timing]\nsettle_ticks = 4\n\n[game]\nseed = 1234\n").unwrap();
        assert_eq!(cfg.timing.settle_ticks, 4);
        assert_eq!(cfg.timing.enemy_turn_ticks, 20);
        assert_eq!(cfg.seed, 1234);
        assert!(cfg.sound_enabled);
    }

    #[test]
    fn logging_file_and_level() {
        let cfg = parse("[logging]\nfile = \"hero.log\"\nlevel = \"debug\"\n").unwrap();
        assert_eq!(cfg.logging.file, Some(PathBuf::from("hero.log")));
        assert_eq!(cfg.logging.level, "debug");

        let blank = parse("[logging]\nfile = \"  \"\n").unwrap();
        assert_eq!(blank.logging.file, None);
    }

    #[test]
    fn sound_can_be_disabled() {
        let cfg = parse("[sound]\nenabled = false\n").unwrap();
        assert!(!cfg.sound_enabled);
    }

    #[test]
    fn zero_tick_rate_is_raised() {
        let cfg = parse("[timing]\ntick_rate_ms = 0\n").unwrap();
        assert_eq!(cfg.timing.tick_rate_ms, 1);
    }

    #[test]
    fn bad_type_is_a_parse_error() {
        let err = parse("[timing]\nsettle_ticks = \"soon\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn default_matches_empty_document() {
        let d = GameConfig::default();
        let p = parse("").unwrap();
        assert_eq!(d.timing, p.timing);
        assert_eq!(d.gamepad, p.gamepad);
        assert_eq!(TimingConfig::default(), d.timing);
    }
}
