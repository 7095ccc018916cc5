use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// Base pause between game steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameSpeed {
    Instant,
    Fast,
    Default,
    Slow,
}

impl GameSpeed {
    pub fn base_delay(self) -> Duration {
        match self {
            GameSpeed::Instant => Duration::ZERO,
            GameSpeed::Fast => Duration::from_millis(500),
            GameSpeed::Default => Duration::from_secs(1),
            GameSpeed::Slow => Duration::from_secs(2),
        }
    }

    fn parse(s: &str) -> Option<GameSpeed> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instant" => Some(GameSpeed::Instant),
            "fast" => Some(GameSpeed::Fast),
            "default" => Some(GameSpeed::Default),
            "slow" => Some(GameSpeed::Slow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    pub small_blind: u32,
    /// Also the minimum raise increment
    pub big_blind: u32,
    pub starting_stack: u32,
    pub seed: Option<u64>,
    pub speed: GameSpeed,
    pub bot_thinking_ms: u64,
    /// Rejected actions a bot may produce in one turn before it is folded
    pub max_invalid_actions: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            small_blind: 1,
            big_blind: 2,
            starting_stack: 1000,
            seed: None,
            speed: GameSpeed::Default,
            bot_thinking_ms: 500,
            max_invalid_actions: 3,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for GameError {
    fn from(e: ConfigError) -> Self {
        GameError::InvalidConfig(e.to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    small_blind: Option<u32>,
    #[serde(default)]
    big_blind: Option<u32>,
    #[serde(default)]
    starting_stack: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    speed: Option<GameSpeed>,
    #[serde(default)]
    bot_thinking_ms: Option<u64>,
    #[serde(default)]
    max_invalid_actions: Option<u32>,
}

impl TableConfig {
    pub fn bot_thinking(&self) -> Duration {
        Duration::from_millis(self.bot_thinking_ms)
    }

    /// Reads a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let f: FileConfig = toml::from_str(s)?;
        let mut cfg = Self::default();
        cfg.apply_file(f);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// Defaults, then the optional file, then `HOLDEM_SEED`,
    /// `HOLDEM_STARTING_STACK` and `HOLDEM_SPEED` from the environment.
    pub fn load_with_env(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        if let Some(path) = path {
            let f: FileConfig = toml::from_str(&fs::read_to_string(path)?)?;
            cfg.apply_file(f);
        }
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_file(&mut self, f: FileConfig) {
        if let Some(v) = f.small_blind {
            self.small_blind = v;
        }
        if let Some(v) = f.big_blind {
            self.big_blind = v;
        }
        if let Some(v) = f.starting_stack {
            self.starting_stack = v;
        }
        if let Some(v) = f.seed {
            self.seed = Some(v);
        }
        if let Some(v) = f.speed {
            self.speed = v;
        }
        if let Some(v) = f.bot_thinking_ms {
            self.bot_thinking_ms = v;
        }
        if let Some(v) = f.max_invalid_actions {
            self.max_invalid_actions = v;
        }
    }

    fn apply_env<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = var("HOLDEM_SEED").filter(|s| !s.is_empty()) {
            self.seed = Some(
                seed.parse()
                    .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
            );
        }
        if let Some(stack) = var("HOLDEM_STARTING_STACK").filter(|s| !s.is_empty()) {
            self.starting_stack = stack
                .parse()
                .map_err(|_| ConfigError::Invalid("Invalid starting stack".into()))?;
        }
        if let Some(speed) = var("HOLDEM_SPEED").filter(|s| !s.is_empty()) {
            self.speed = GameSpeed::parse(&speed)
                .ok_or_else(|| ConfigError::Invalid("Invalid speed".into()))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.small_blind == 0 || self.big_blind == 0 {
            return Err(ConfigError::Invalid(
                "blinds must be >0".into(),
            ));
        }
        if self.small_blind > self.big_blind {
            return Err(ConfigError::Invalid(
                "small_blind must not exceed big_blind".into(),
            ));
        }
        if self.starting_stack == 0 {
            return Err(ConfigError::Invalid(
                "starting_stack must be >0".into(),
            ));
        }
        if self.starting_stack > u32::MAX / 2 {
            return Err(ConfigError::Invalid(
                "starting_stack too large for two players to share a pot".into(),
            ));
        }
        if self.max_invalid_actions == 0 {
            return Err(ConfigError::Invalid(
                "max_invalid_actions must be >=1".into(),
            ));
        }
        Ok(())
    }
}
