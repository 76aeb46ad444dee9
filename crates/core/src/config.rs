//! Engine configuration and construction-time validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{BOARD_HEIGHT, BOARD_WIDTH, DEFAULT_LEVEL, LINES_PER_LEVEL, MAX_LEVEL};

/// Smallest board side that still fits a 4x4 piece window at the spawn anchor
pub const MIN_DIMENSION: u8 = 4;

/// Largest supported board side
pub const MAX_DIMENSION: u8 = 64;

/// Rules that shape a session: board size and level curve.
///
/// Missing fields fall back to the defaults when deserialized, so a config
/// file only needs to mention what it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub width: u8,
    pub height: u8,
    pub max_level: u8,
    pub default_level: u8,
    pub lines_per_level: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            max_level: MAX_LEVEL,
            default_level: DEFAULT_LEVEL,
            lines_per_level: LINES_PER_LEVEL,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_dimensions(self.width, self.height)?;
        if self.default_level > self.max_level {
            return Err(ConfigError::DefaultLevel {
                default: self.default_level,
                max: self.max_level,
            });
        }
        if self.lines_per_level == 0 {
            return Err(ConfigError::LinesPerLevel);
        }
        Ok(())
    }
}

pub(crate) fn validate_dimensions(width: u8, height: u8) -> Result<(), ConfigError> {
    if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&width) {
        return Err(ConfigError::Width(width));
    }
    if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&height) {
        return Err(ConfigError::Height(height));
    }
    Ok(())
}

/// Invalid engine setup. Raised at construction, never during play.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board width {0} is outside {}..={}", MIN_DIMENSION, MAX_DIMENSION)]
    Width(u8),
    #[error("board height {0} is outside {}..={}", MIN_DIMENSION, MAX_DIMENSION)]
    Height(u8),
    #[error("default level {default} exceeds max level {max}")]
    DefaultLevel { default: u8, max: u8 },
    #[error("lines per level must be positive")]
    LinesPerLevel,
    #[error("shape catalog is empty")]
    EmptyCatalog,
    #[error("shape {index} has no occupied cells")]
    EmptyShape { index: usize },
    #[error("shape {index} uses tag {tag}, expected 0..={}", crate::types::PIECE_KINDS)]
    InvalidTag { index: usize, tag: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.width, 11);
        assert_eq!(config.height, 20);
        assert_eq!(config.default_level, 5);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_degenerate_boards() {
        let config = EngineConfig {
            width: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Width(0)));

        let config = EngineConfig {
            height: 3,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Height(3)));

        let config = EngineConfig {
            width: MAX_DIMENSION + 1,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_default_level_above_max() {
        let config = EngineConfig {
            max_level: 3,
            default_level: 4,
            ..EngineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::DefaultLevel { default: 4, max: 3 })
        );
    }

    #[test]
    fn rejects_zero_lines_per_level() {
        let config = EngineConfig {
            lines_per_level: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::LinesPerLevel));
    }

    #[test]
    fn error_messages_name_the_bounds() {
        assert_eq!(
            ConfigError::Width(70).to_string(),
            "board width 70 is outside 4..=64"
        );
        assert_eq!(
            ConfigError::InvalidTag { index: 2, tag: 9 }.to_string(),
            "shape 2 uses tag 9, expected 0..=7"
        );
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"width": 10}"#).unwrap();
        assert_eq!(config.width, 10);
        assert_eq!(config.height, 20);
        assert_eq!(config.max_level, 9);
        assert_eq!(config.lines_per_level, 5);
    }
}
