// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted arena configuration
//!
//! Loaded from a TOML file in the platform config directory (created with
//! defaults on first use). Durations are written in humantime form
//! (`3m`, `60s`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use gridduel_core::{heuristic, Board, Variant};

/// One entry of the board-type pool a new match draws from
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoardType {
    pub variant: Variant,
    /// Grid size for the open grid; ignored by column drop (fixed 6x7)
    pub size: u8,
    pub win_length: u8,
}

impl BoardType {
    /// Construct an empty board of this type
    pub fn build(&self) -> Board {
        match self.variant {
            Variant::OpenGrid => Board::open_grid(self.size, self.win_length),
            Variant::ColumnDrop => Board::column_drop(),
        }
    }
}

impl Default for BoardType {
    fn default() -> Self {
        Self {
            variant: Variant::OpenGrid,
            size: 13,
            win_length: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// How long a challenge stays open for acceptance
    #[serde(with = "humantime_serde", default = "default_challenge_timeout")]
    pub challenge_timeout: Duration,
    /// How long the challenger may still take the AI offer after expiry
    #[serde(with = "humantime_serde", default = "default_ai_reply_window")]
    pub ai_reply_window: Duration,
    /// How long a player may think before a move is forced
    #[serde(with = "humantime_serde", default = "default_move_timeout")]
    pub move_timeout: Duration,
    /// Poll cadence of the move-timeout supervisor
    #[serde(with = "humantime_serde", default = "default_poll_interval")]
    pub poll_interval: Duration,
    /// Delay between game end and overlay teardown
    #[serde(with = "humantime_serde", default = "default_overlay_clear_delay")]
    pub overlay_clear_delay: Duration,
    /// Bounds of the randomized AI "thinking" pause
    #[serde(with = "humantime_serde", default = "default_ai_think_delay_min")]
    pub ai_think_delay_min: Duration,
    #[serde(with = "humantime_serde", default = "default_ai_think_delay_max")]
    pub ai_think_delay_max: Duration,
    /// Display name of the synthetic opponent
    #[serde(default = "default_ai_name")]
    pub ai_name: String,
    /// Weight of opponent runs in the open-grid heuristic
    #[serde(default = "default_defense_weight")]
    pub defense_weight: f64,
    /// Pool of board types a new match is drawn from
    #[serde(default = "default_board_types")]
    pub board_types: Vec<BoardType>,
}

fn default_challenge_timeout() -> Duration {
    Duration::from_secs(180)
}

fn default_ai_reply_window() -> Duration {
    Duration::from_secs(30)
}

fn default_move_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(2)
}

fn default_overlay_clear_delay() -> Duration {
    Duration::from_secs(8)
}

fn default_ai_think_delay_min() -> Duration {
    Duration::from_millis(1000)
}

fn default_ai_think_delay_max() -> Duration {
    Duration::from_millis(2000)
}

fn default_ai_name() -> String {
    "AI_BOT".to_string()
}

fn default_defense_weight() -> f64 {
    heuristic::DEFAULT_DEFENSE_WEIGHT
}

fn default_board_types() -> Vec<BoardType> {
    vec![
        BoardType {
            variant: Variant::OpenGrid,
            size: 13,
            win_length: 5,
        },
        BoardType {
            variant: Variant::OpenGrid,
            size: 19,
            win_length: 5,
        },
        BoardType {
            variant: Variant::ColumnDrop,
            size: 6,
            win_length: 4,
        },
    ]
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            challenge_timeout: default_challenge_timeout(),
            ai_reply_window: default_ai_reply_window(),
            move_timeout: default_move_timeout(),
            poll_interval: default_poll_interval(),
            overlay_clear_delay: default_overlay_clear_delay(),
            ai_think_delay_min: default_ai_think_delay_min(),
            ai_think_delay_max: default_ai_think_delay_max(),
            ai_name: default_ai_name(),
            defense_weight: default_defense_weight(),
            board_types: default_board_types(),
        }
    }
}

impl ArenaConfig {
    /// Sanity checks applied after loading
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.board_types.is_empty(),
            "board_types must not be empty"
        );
        anyhow::ensure!(
            self.board_types.iter().all(|bt| bt.win_length > 1),
            "win_length must be at least 2"
        );
        anyhow::ensure!(
            self.ai_think_delay_min <= self.ai_think_delay_max,
            "ai_think_delay_min must not exceed ai_think_delay_max"
        );
        anyhow::ensure!(
            self.poll_interval < self.move_timeout,
            "poll_interval must be shorter than move_timeout"
        );
        Ok(())
    }
}

/// Default location of the config file
pub fn config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("io", "gridduel", "gridduel")
        .context("Failed to determine config directory")?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Load the config from `path`, creating a default file when missing
pub fn load_config(path: &Path) -> Result<ArenaConfig> {
    if !path.exists() {
        tracing::info!("Config file not found, creating default at: {}", path.display());
        let default_config = ArenaConfig::default();
        save_config(path, &default_config)?;
        return Ok(default_config);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: ArenaConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Write the config to `path`, creating parent directories as needed
pub fn save_config(path: &Path, config: &ArenaConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }
    let toml_content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(path, toml_content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}
