//! Runtime configuration
//!
//! Every timing in the game comes from here. The file is optional: missing
//! keys fall back to the defaults below, and with no file at all the game
//! runs on defaults.
//!
//! ```toml
//! topic = "Should homework be banned?"
//!
//! [timings]
//! crossfire_secs = 60
//! opponent_reply_delay_ms = 1500
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::game::Phase;

/// Motion debated when the config does not name one
pub const DEFAULT_TOPIC: &str = "Should AI be heavily regulated by governments?";

/// File name looked up in the platform config directory
const CONFIG_FILE: &str = "config.toml";

/// Log file name in the platform data directory
const LOG_FILE: &str = "debattle.log";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Motion shown in the lobby and debate header
    pub topic: String,
    pub timings: Timings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            timings: Timings::default(),
        }
    }
}

/// Phase budgets and simulated delays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timings {
    pub opening_secs: u32,
    pub rebuttal_secs: u32,
    pub crossfire_secs: u32,
    pub final_secs: u32,
    pub judging_secs: u32,
    /// Lobby countdown once both players are ready
    pub ready_countdown_secs: u32,
    /// Simulated matchmaker: time until the opponent is ready
    pub opponent_join_delay_ms: u64,
    /// Simulated peer: time until the turn comes back
    pub opponent_reply_delay_ms: u64,
    /// Simulated judge: time spent "evaluating"
    pub judging_delay_ms: u64,
    /// Lobby caption rotation
    pub caption_rotate_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            opening_secs: 30,
            rebuttal_secs: 30,
            crossfire_secs: 90,
            final_secs: 30,
            judging_secs: 30,
            ready_countdown_secs: 10,
            opponent_join_delay_ms: 3_000,
            opponent_reply_delay_ms: 2_000,
            judging_delay_ms: 3_000,
            caption_rotate_ms: 3_000,
        }
    }
}

impl Timings {
    /// Seconds allotted to `phase`. Zero for the terminal phase.
    pub fn phase_budget(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Opening => self.opening_secs,
            Phase::Rebuttal => self.rebuttal_secs,
            Phase::Crossfire => self.crossfire_secs,
            Phase::Final => self.final_secs,
            Phase::Judging => self.judging_secs,
            Phase::Complete => 0,
        }
    }

    pub fn opponent_join_delay(&self) -> Duration {
        Duration::from_millis(self.opponent_join_delay_ms)
    }

    pub fn opponent_reply_delay(&self) -> Duration {
        Duration::from_millis(self.opponent_reply_delay_ms)
    }

    pub fn judging_delay(&self) -> Duration {
        Duration::from_millis(self.judging_delay_ms)
    }

    pub fn caption_rotate(&self) -> Duration {
        Duration::from_millis(self.caption_rotate_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for phase in Phase::ALL.into_iter().filter(|p| !p.is_terminal()) {
            if self.phase_budget(phase) == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{phase} phase needs at least one second"
                )));
            }
        }
        if self.ready_countdown_secs == 0 {
            return Err(ConfigError::Invalid(
                "ready_countdown_secs must be at least 1".to_string(),
            ));
        }
        if self.caption_rotate_ms == 0 {
            return Err(ConfigError::Invalid(
                "caption_rotate_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the platform config file is
    /// used when present and defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path().filter(|p| p.is_file()) {
                Some(path) => path,
                None => {
                    tracing::debug!("no config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml(&text, &path)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.topic.trim().is_empty() {
            return Err(ConfigError::Invalid("topic must not be empty".to_string()));
        }
        self.timings.validate()
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "debattle")
}

/// `<config dir>/debattle/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// `<local data dir>/debattle/debattle.log`
pub fn default_log_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_local_dir().join(LOG_FILE))
}
