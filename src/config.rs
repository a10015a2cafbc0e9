//! # Engine Configuration
//!
//! Tuning knobs for the Gang Wars engine, loaded from TOML with sensible
//! defaults for every field. These are *game balance* settings; presentation
//! concerns (currency display name, whether the game is enabled at all) belong
//! to the chat dispatcher and are deliberately absent here.
//!
//! ## Configuration File Format
//!
//! ```toml
//! starting_currency = 100
//! starter_weapon = "knife"
//! attack_cooldown_mins = 30
//! spoils_percent = 10
//! player_jitter_max = 10
//! gang_jitter_max = 20
//! ```
//!
//! All values are validated on load: a config that would make combat panic
//! (zero jitter range) or mint currency from nowhere (spoils above 100%) is
//! rejected before the engine ever sees it.

use anyhow::{bail, Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_starting_currency() -> i64 {
    100
}

fn default_attack_cooldown_mins() -> i64 {
    30
}

fn default_spoils_percent() -> i64 {
    10
}

fn default_player_jitter_max() -> i64 {
    10
}

fn default_gang_jitter_max() -> i64 {
    20
}

/// Game-balance configuration for a Gang Wars deployment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    /// Currency granted to every newly registered player.
    #[serde(default = "default_starting_currency")]
    pub starting_currency: i64,
    /// Weapon id placed in a new player's inventory at level 1, if any.
    /// Must exist in the active catalog; checked when the engine is built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starter_weapon: Option<String>,
    /// Minutes an entity stays protected after being attacked (unless it
    /// retaliates first).
    #[serde(default = "default_attack_cooldown_mins")]
    pub attack_cooldown_mins: i64,
    /// Percentage of the loser's balance transferred to the winner.
    #[serde(default = "default_spoils_percent")]
    pub spoils_percent: i64,
    /// Exclusive upper bound of the random power jitter in player combat.
    #[serde(default = "default_player_jitter_max")]
    pub player_jitter_max: i64,
    /// Exclusive upper bound of the random power jitter in gang combat.
    #[serde(default = "default_gang_jitter_max")]
    pub gang_jitter_max: i64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_currency: default_starting_currency(),
            starter_weapon: None,
            attack_cooldown_mins: default_attack_cooldown_mins(),
            spoils_percent: default_spoils_percent(),
            player_jitter_max: default_player_jitter_max(),
            gang_jitter_max: default_gang_jitter_max(),
        }
    }
}

impl GameConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: GameConfig = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration back out as TOML.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let raw = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, raw)
            .with_context(|| format!("failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Check every tuning value for sanity.
    pub fn validate(&self) -> Result<()> {
        if self.starting_currency < 0 {
            bail!("starting_currency must not be negative");
        }
        if self.attack_cooldown_mins < 0 {
            bail!("attack_cooldown_mins must not be negative");
        }
        if !(0..=100).contains(&self.spoils_percent) {
            bail!("spoils_percent must be between 0 and 100");
        }
        if self.player_jitter_max < 1 {
            bail!("player_jitter_max must be at least 1");
        }
        if self.gang_jitter_max < 1 {
            bail!("gang_jitter_max must be at least 1");
        }
        Ok(())
    }

    /// Cooldown window as a `chrono` duration.
    pub fn cooldown_window(&self) -> Duration {
        Duration::minutes(self.attack_cooldown_mins)
    }

    /// Spoils taken from a losing balance: `floor(percent × balance / 100)`.
    pub fn spoils_for(&self, balance: i64) -> i64 {
        balance * self.spoils_percent / 100
    }
}
