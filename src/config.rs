use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("canvas must be at least 1x1, got {width}x{height}")]
    Canvas { width: f64, height: f64 },

    #[error("{entity} ({width}x{height}) does not fit on a {canvas_width}x{canvas_height} canvas")]
    TooLarge {
        entity: &'static str,
        width: f64,
        height: f64,
        canvas_width: f64,
        canvas_height: f64,
    },

    #[error("{0} must be positive")]
    NonPositive(&'static str),

    #[error("spawn interval must be at least 1 ms")]
    SpawnInterval,

    #[cfg(not(target_arch = "wasm32"))]
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(target_arch = "wasm32")]
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tunables for the falling-obstacle game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub player_width: f64,
    pub player_height: f64,
    pub player_speed: f64,
    /// Gap between the player's feet and the bottom of the canvas.
    pub player_bottom_margin: f64,
    pub obstacle_width: f64,
    pub obstacle_height: f64,
    pub obstacle_speed: f64,
    pub spawn_interval_ms: u64,
    pub background_scroll: f64,
    /// Drop obstacles once they have fallen fully below the canvas.
    pub prune_offscreen: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            player_width: 50.0,
            player_height: 50.0,
            player_speed: 5.0,
            player_bottom_margin: 10.0,
            obstacle_width: 50.0,
            obstacle_height: 50.0,
            obstacle_speed: 2.0,
            spawn_interval_ms: 2000,
            background_scroll: 2.0,
            prune_offscreen: true,
        }
    }
}

impl GameConfig {
    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_canvas(self.canvas_width, self.canvas_height)?;
        check_fits(
            "player",
            self.player_width,
            self.player_height + self.player_bottom_margin,
            self.canvas_width,
            self.canvas_height,
        )?;
        check_fits(
            "obstacle",
            self.obstacle_width,
            self.obstacle_height,
            self.canvas_width,
            self.canvas_height,
        )?;
        if self.player_speed <= 0.0 {
            return Err(ConfigError::NonPositive("player_speed"));
        }
        if self.obstacle_speed <= 0.0 {
            return Err(ConfigError::NonPositive("obstacle_speed"));
        }
        if self.spawn_interval_ms == 0 {
            return Err(ConfigError::SpawnInterval);
        }
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
}

/// Tunables for the flapping-bird variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlappyConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub bird_x: f64,
    pub bird_y: f64,
    pub bird_size: f64,
    pub gravity: f64,
    pub lift: f64,
    pub pipe_width: f64,
    pub pipe_gap: f64,
    pub pipe_speed: f64,
    /// Frames between pipe spawns.
    pub pipe_spawn_frames: u64,
}

impl Default for FlappyConfig {
    fn default() -> Self {
        Self {
            canvas_width: 480.0,
            canvas_height: 640.0,
            bird_x: 50.0,
            bird_y: 150.0,
            bird_size: 20.0,
            gravity: 0.6,
            lift: -15.0,
            pipe_width: 30.0,
            pipe_gap: 100.0,
            pipe_speed: 2.0,
            pipe_spawn_frames: 90,
        }
    }
}

impl FlappyConfig {
    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_canvas(self.canvas_width, self.canvas_height)?;
        check_fits(
            "bird",
            self.bird_x + self.bird_size,
            self.bird_size,
            self.canvas_width,
            self.canvas_height,
        )?;
        check_fits(
            "pipe gap",
            self.pipe_width,
            self.pipe_gap,
            self.canvas_width,
            self.canvas_height,
        )?;
        if self.pipe_speed <= 0.0 {
            return Err(ConfigError::NonPositive("pipe_speed"));
        }
        if self.pipe_spawn_frames == 0 {
            return Err(ConfigError::NonPositive("pipe_spawn_frames"));
        }
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
}

fn check_canvas(width: f64, height: f64) -> Result<(), ConfigError> {
    if !(width >= 1.0 && height >= 1.0) {
        return Err(ConfigError::Canvas { width, height });
    }
    Ok(())
}

fn check_fits(
    entity: &'static str,
    width: f64,
    height: f64,
    canvas_width: f64,
    canvas_height: f64,
) -> Result<(), ConfigError> {
    if width <= 0.0 || height <= 0.0 {
        return Err(ConfigError::NonPositive(entity));
    }
    if width > canvas_width || height > canvas_height {
        return Err(ConfigError::TooLarge {
            entity,
            width,
            height,
            canvas_width,
            canvas_height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
        assert!(FlappyConfig::default().validate().is_ok());
    }

    #[test]
    fn test_player_wider_than_canvas_is_rejected() {
        let config = GameConfig::default().with_canvas(40.0, 600.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooLarge { entity: "player", .. })
        ));
    }

    #[test]
    fn test_zero_spawn_interval_is_rejected() {
        let config = GameConfig {
            spawn_interval_ms: 0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::SpawnInterval)));
    }

    #[test]
    fn test_nan_canvas_is_rejected() {
        let config = GameConfig::default().with_canvas(f64::NAN, 600.0);
        assert!(matches!(config.validate(), Err(ConfigError::Canvas { .. })));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml("canvas_width = 400.0\nplayer_speed = 8.0\n").unwrap();
        assert_eq!(config.canvas_width, 400.0);
        assert_eq!(config.player_speed, 8.0);
        assert_eq!(config.spawn_interval_ms, 2000);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(matches!(
            GameConfig::from_toml("canvas_width = \"wide\""),
            Err(ConfigError::Toml(_))
        ));
    }
}
