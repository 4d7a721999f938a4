//! Key/value engine settings.

use thiserror::Error;

use crate::constants::{DEFAULT_BOARD_SIZE, DEFAULT_KOMI, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::position::LibertyMode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
    #[error("board size {0} is out of range")]
    InvalidBoardSize(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub board_size: usize,
    pub komi: f64,
    pub liberty_mode: LibertyMode,
    /// End playouts early once one side is far ahead in stones.
    pub mercy: bool,
    /// Sample moves from the probability map instead of uniformly.
    pub weighted: bool,
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            board_size: DEFAULT_BOARD_SIZE,
            komi: DEFAULT_KOMI,
            liberty_mode: LibertyMode::Exact,
            mercy: true,
            weighted: true,
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Apply one setting. Returns `Ok(false)` when `name` is not a known key.
    pub fn set(&mut self, name: &str, value: &str) -> Result<bool, ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: name.to_string(),
            value: value.to_string(),
        };
        let value = value.trim();
        match name {
            "boardsize" => {
                let size: usize = value.parse().map_err(|_| invalid())?;
                if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
                    return Err(ConfigError::InvalidBoardSize(size));
                }
                self.board_size = size;
            }
            "komi" => {
                let komi: f64 = value.parse().map_err(|_| invalid())?;
                if !komi.is_finite() {
                    return Err(invalid());
                }
                self.komi = komi;
            }
            "liberties" => {
                self.liberty_mode = match value {
                    "exact" => LibertyMode::Exact,
                    "pseudo" => LibertyMode::Pseudo,
                    _ => return Err(invalid()),
                };
            }
            "mercy" => self.mercy = parse_bool(value).ok_or_else(invalid)?,
            "weighted" => self.weighted = parse_bool(value).ok_or_else(invalid)?,
            "seed" => self.seed = value.parse().map_err(|_| invalid())?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub fn get(&self, name: &str) -> Option<String> {
        let value = match name {
            "boardsize" => self.board_size.to_string(),
            "komi" => self.komi.to_string(),
            "liberties" => match self.liberty_mode {
                LibertyMode::Exact => "exact".to_string(),
                LibertyMode::Pseudo => "pseudo".to_string(),
            },
            "mercy" => self.mercy.to_string(),
            "weighted" => self.weighted.to_string(),
            "seed" => self.seed.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "on" | "1" => Some(true),
        "false" | "off" | "0" => Some(false),
        _ => None,
    }
}
