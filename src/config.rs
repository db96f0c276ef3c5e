/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Problems never abort the game: they are collected as warnings and
/// logged once the logger is up.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub grid: GridConfig,
    pub avatar: AvatarConfig,
    pub gamepad: GamepadConfig,
    pub seed: u64,
    /// Empty = logging disabled.
    pub log_file: Option<PathBuf>,
}

/// All durations are in ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    pub tick_rate_ms: u64,
    pub spawn_interval: u32,
    pub session_length: u32,
    pub debuff_duration: u32,
    pub win_step_interval: u32,
    pub win_display_delay: u32,
    pub lose_reset_delay: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AvatarConfig {
    pub start_column: i32,
    pub start_row: i32,
    /// Lowest row the player may steer to.
    pub max_row: i32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub start: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    grid: TomlGrid,
    #[serde(default)]
    avatar: TomlAvatar,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_spawn_interval")]
    spawn_interval: u32,
    #[serde(default = "default_session_length")]
    session_length: u32,
    #[serde(default = "default_debuff_duration")]
    debuff_duration: u32,
    #[serde(default = "default_win_step")]
    win_step_interval: u32,
    #[serde(default = "default_win_display")]
    win_display_delay: u32,
    #[serde(default = "default_lose_reset")]
    lose_reset_delay: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGrid {
    #[serde(default = "default_grid_size")]
    width: i32,
    #[serde(default = "default_grid_size")]
    height: i32,
}

#[derive(Deserialize, Debug)]
struct TomlAvatar {
    #[serde(default = "default_start_column")]
    start_column: i32,
    #[serde(default)]
    start_row: i32,
    #[serde(default = "default_max_row")]
    max_row: i32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_start_buttons")]
    start: Vec<String>,
    #[serde(default = "default_quit_buttons")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_seed")]
    seed: u64,
    #[serde(default = "default_log_file")]
    log_file: String,
}

// ── Defaults ──
// One tick ≈ 1/60 s.

fn default_tick_rate() -> u64 { 16 }
fn default_spawn_interval() -> u32 { 20 }
fn default_session_length() -> u32 { 1800 }  // 30 s
fn default_debuff_duration() -> u32 { 90 }   // 1.5 s
fn default_win_step() -> u32 { 30 }
fn default_win_display() -> u32 { 300 }
fn default_lose_reset() -> u32 { 180 }
fn default_grid_size() -> i32 { 11 }
fn default_start_column() -> i32 { 4 }
fn default_max_row() -> i32 { 5 }
fn default_start_buttons() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_quit_buttons() -> Vec<String> { vec!["Select".into()] }
fn default_seed() -> u64 { 12345 }
fn default_log_file() -> String { "raindrop.log".into() }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            tick_rate_ms: default_tick_rate(),
            spawn_interval: default_spawn_interval(),
            session_length: default_session_length(),
            debuff_duration: default_debuff_duration(),
            win_step_interval: default_win_step(),
            win_display_delay: default_win_display(),
            lose_reset_delay: default_lose_reset(),
        }
    }
}

impl Default for TomlGrid {
    fn default() -> Self {
        TomlGrid { width: default_grid_size(), height: default_grid_size() }
    }
}

impl Default for TomlAvatar {
    fn default() -> Self {
        TomlAvatar {
            start_column: default_start_column(),
            start_row: 0,
            max_row: default_max_row(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            start: default_start_buttons(),
            quit: default_quit_buttons(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            seed: default_seed(),
            log_file: default_log_file(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig::from(TomlTiming::default())
    }
}

impl Default for AvatarConfig {
    fn default() -> Self {
        AvatarConfig {
            start_column: default_start_column(),
            start_row: 0,
            max_row: default_max_row(),
        }
    }
}

impl From<TomlTiming> for TimingConfig {
    /// Zero intervals would spin; they are bumped to one tick.
    fn from(t: TomlTiming) -> Self {
        TimingConfig {
            tick_rate_ms: t.tick_rate_ms.max(1),
            spawn_interval: t.spawn_interval.max(1),
            session_length: t.session_length.max(1),
            debuff_duration: t.debuff_duration.max(1),
            win_step_interval: t.win_step_interval.max(1),
            win_display_delay: t.win_display_delay.max(1),
            lose_reset_delay: t.lose_reset_delay.max(1),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) `~/.local/share/raindrop`.
    /// Returns the config plus any warnings produced while loading.
    pub fn load() -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let toml_cfg = load_toml(&candidate_dirs(), &mut warnings);
        let cfg = GameConfig::from_toml(toml_cfg, &mut warnings);
        (cfg, warnings)
    }

    /// Parse a config document directly (used by tests).
    #[cfg(test)]
    pub fn parse(text: &str) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let toml_cfg = parse_toml(text, "config.toml", &mut warnings);
        let cfg = GameConfig::from_toml(toml_cfg, &mut warnings);
        (cfg, warnings)
    }

    fn from_toml(t: TomlConfig, warnings: &mut Vec<String>) -> Self {
        let grid = sanitize_grid(t.grid, warnings);
        let avatar = sanitize_avatar(t.avatar, grid, warnings);
        let log_file = if t.general.log_file.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(t.general.log_file))
        };

        GameConfig {
            timing: TimingConfig::from(t.timing),
            grid,
            avatar,
            gamepad: GamepadConfig {
                start: t.gamepad.start,
                quit: t.gamepad.quit,
            },
            seed: t.general.seed,
            log_file,
        }
    }
}

fn sanitize_grid(g: TomlGrid, warnings: &mut Vec<String>) -> GridConfig {
    let width = g.width.clamp(3, 64);
    let height = g.height.clamp(3, 64);
    if width != g.width || height != g.height {
        warnings.push(format!(
            "grid {}x{} out of range, using {}x{}",
            g.width, g.height, width, height
        ));
    }
    GridConfig { width, height }
}

/// The avatar must stay above the spawn row, so `max_row < height - 1`.
fn sanitize_avatar(a: TomlAvatar, grid: GridConfig, warnings: &mut Vec<String>) -> AvatarConfig {
    let max_row = a.max_row.clamp(0, grid.height - 2);
    let start_row = a.start_row.clamp(0, max_row);
    let start_column = a.start_column.clamp(0, grid.width - 1);
    if max_row != a.max_row || start_row != a.start_row || start_column != a.start_column {
        warnings.push(format!(
            "avatar start ({}, {}) / max_row {} adjusted to ({}, {}) / {}",
            a.start_column, a.start_row, a.max_row, start_column, start_row, max_row
        ));
    }
    AvatarConfig { start_column, start_row, max_row }
}

/// Candidate directories to search: exe dir + CWD + XDG data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
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

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/raindrop");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => return parse_toml(&text, &path.display().to_string(), warnings),
                Err(e) => {
                    warnings.push(format!("could not read {}: {e}", path.display()));
                }
            }
        }
    }
    TomlConfig::default()
}

/// Deserialize a config document; a syntax error falls back to defaults.
fn parse_toml(text: &str, origin: &str, warnings: &mut Vec<String>) -> TomlConfig {
    match toml::from_str::<TomlConfig>(text) {
        Ok(cfg) => cfg,
        Err(e) => {
            warnings.push(format!("{origin}: parse error: {e}; using defaults"));
            TomlConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let (cfg, warnings) = GameConfig::parse("");
        assert!(warnings.is_empty());
        assert_eq!(cfg.timing, TimingConfig::default());
        assert_eq!(cfg.grid, GridConfig { width: 11, height: 11 });
        assert_eq!(cfg.avatar, AvatarConfig { start_column: 4, start_row: 0, max_row: 5 });
        assert_eq!(cfg.timing.spawn_interval, 20);
        assert_eq!(cfg.timing.session_length, 1800);
        assert_eq!(cfg.seed, 12345);
        assert_eq!(cfg.log_file, Some(PathBuf::from("raindrop.log")));
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let (cfg, warnings) = GameConfig::parse(
            "[timing]\nspawn_interval = 30\nsession_length = 1200\n\n[grid]\nwidth = 8\nheight = 8\n",
        );
        assert!(warnings.is_empty());
        assert_eq!(cfg.timing.spawn_interval, 30);
        assert_eq!(cfg.timing.session_length, 1200);
        assert_eq!(cfg.timing.debuff_duration, 90);
        assert_eq!(cfg.grid, GridConfig { width: 8, height: 8 });
    }

    #[test]
    fn avatar_kept_above_spawn_row() {
        let (cfg, warnings) = GameConfig::parse(
            "[grid]\nwidth = 5\nheight = 4\n[avatar]\nstart_column = 9\nmax_row = 10\n",
        );
        assert_eq!(cfg.avatar.max_row, 2);
        assert_eq!(cfg.avatar.start_column, 4);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn zero_intervals_bumped() {
        let (cfg, _) = GameConfig::parse("[timing]\nspawn_interval = 0\nwin_step_interval = 0\n");
        assert_eq!(cfg.timing.spawn_interval, 1);
        assert_eq!(cfg.timing.win_step_interval, 1);
    }

    #[test]
    fn parse_error_falls_back() {
        let (cfg, warnings) = GameConfig::parse("[timing\nnope");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("config.toml: parse error"));
        assert_eq!(cfg.timing, TimingConfig::default());
    }

    #[test]
    fn broken_file_on_disk_warns_once_with_its_path() {
        let dir = std::env::temp_dir().join(format!("raindrop-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[grid]\nwidth = ").unwrap();

        let mut warnings = Vec::new();
        let t = load_toml(&[dir.clone()], &mut warnings);
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with(&format!("{}: parse error", path.display())));
        assert!(warnings[0].ends_with("using defaults"));
        assert_eq!(t.grid.width, TomlConfig::default().grid.width);
    }

    #[test]
    fn empty_log_file_disables_logging() {
        let (cfg, _) = GameConfig::parse("[general]\nlog_file = \"\"\n");
        assert_eq!(cfg.log_file, None);
    }
}
