use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lattice geometry in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Side of a drawn cell
    pub size: u32,
    /// Empty space between neighbouring cells
    pub gap: u32,
}

impl GridConfig {
    /// Distance between the origins of two neighbouring cells
    pub fn pitch(&self) -> u32 {
        self.size + self.gap
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { size: 8, gap: 4 }
    }
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimConfig {
    /// Target number of snakes; also the target number of food items
    pub snake_count: usize,

    /// Ticks per second. Zero pauses the simulation.
    pub fps: u32,

    pub grid: GridConfig,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid pitch must be positive (size {size} + gap {gap})")]
    ZeroPitch { size: u32, gap: u32 },

    #[error("fps {0} exceeds the supported maximum")]
    FpsTooHigh(u32),
}

impl SimConfig {
    pub const MAX_FPS: u32 = 240;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.pitch() == 0 {
            return Err(ConfigError::ZeroPitch {
                size: self.grid.size,
                gap: self.grid.gap,
            });
        }
        if self.fps > Self::MAX_FPS {
            return Err(ConfigError::FpsTooHigh(self.fps));
        }
        Ok(())
    }

    /// Food target follows the snake target
    pub fn food_count(&self) -> usize {
        self.snake_count
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            snake_count: 10,
            fps: 15,
            grid: GridConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.snake_count, 10);
        assert_eq!(config.fps, 15);
        assert_eq!(config.grid.pitch(), 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_json_field_names() {
        let json = r#"{"snakeCount": 4, "fps": 0, "grid": {"size": 2, "gap": 1}}"#;
        let config: SimConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.snake_count, 4);
        assert_eq!(config.fps, 0);
        assert_eq!(config.grid, GridConfig { size: 2, gap: 1 });
        assert_eq!(config.food_count(), 4);
    }

    #[test]
    fn test_zero_pitch_rejected() {
        let config = SimConfig {
            grid: GridConfig { size: 0, gap: 0 },
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroPitch { size: 0, gap: 0 })
        );
    }

    #[test]
    fn test_fps_limit() {
        let config = SimConfig {
            fps: 1000,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::FpsTooHigh(1000)));
    }
}
