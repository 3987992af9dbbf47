//! Game Configuration
//!
//! Centralized tunables for the renderers and the turn logic. `Default`
//! returns the values the game was tuned with; any subset can be overridden
//! from a JSON file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Phong material coefficients shared by every object renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub specular_power: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            ambient: 0.0,
            diffuse: 3.5,
            specular: 1.0,
            specular_power: 6.0,
        }
    }
}

/// Asset file names, resolved against [`CannonsConfig::asset_dir`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub cannon_mesh: String,
    pub cannon_texture: String,
    pub projectile_mesh: String,
    pub projectile_texture: String,
    pub plane_grid_texture: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            cannon_mesh: "cannon.obj".to_string(),
            cannon_texture: "cannon.png".to_string(),
            projectile_mesh: "ball.obj".to_string(),
            projectile_texture: "ball.png".to_string(),
            plane_grid_texture: "trigrid.png".to_string(),
        }
    }
}

/// Central configuration for the whole game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CannonsConfig {
    /// Projection near plane (meters)
    pub near_plane: f32,
    /// Projection far plane (meters)
    pub far_plane: f32,
    /// Uniform scale applied to both cannon meshes
    pub cannon_scale: f32,
    /// Uniform scale applied to the projectile mesh
    pub projectile_scale: f32,
    /// Degrees of aim per pixel of drag
    pub drag_sensitivity: f32,
    /// Projectile displacement per frame, in unscaled model units
    pub projectile_step: f32,
    /// Displacement at which the projectile lands
    pub projectile_travel: f32,
    /// Fixed height offset of the projectile above its cannon
    pub projectile_lift: f32,
    /// Maximum number of pending taps; extra taps are dropped
    pub tap_queue_capacity: usize,
    /// Width of the transparent fade band at plane edges (meters)
    pub plane_fade_width: f32,
    pub material: MaterialConfig,
    pub asset_dir: PathBuf,
    pub assets: AssetConfig,
}

impl Default for CannonsConfig {
    fn default() -> Self {
        Self {
            near_plane: 0.1,
            far_plane: 100.0,
            cannon_scale: 0.12,
            projectile_scale: 0.02,
            drag_sensitivity: 0.3,
            projectile_step: 0.01,
            projectile_travel: 2.0,
            projectile_lift: 0.1,
            tap_queue_capacity: 16,
            plane_fade_width: 0.2,
            material: MaterialConfig::default(),
            asset_dir: PathBuf::from("assets"),
            assets: AssetConfig::default(),
        }
    }
}

/// Errors reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CannonsConfig {
    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Full path of an asset file name.
    pub fn asset_path(&self, name: &str) -> PathBuf {
        self.asset_dir.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tuned_constants() {
        let config = CannonsConfig::default();
        assert_eq!(config.near_plane, 0.1);
        assert_eq!(config.far_plane, 100.0);
        assert_eq!(config.cannon_scale, 0.12);
        assert_eq!(config.projectile_scale, 0.02);
        assert_eq!(config.tap_queue_capacity, 16);
        assert_eq!(config.material.diffuse, 3.5);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CannonsConfig::from_json(r#"{ "far_plane": 50.0, "material": { "ambient": 0.2 } }"#)
            .unwrap();
        assert_eq!(config.far_plane, 50.0);
        assert_eq!(config.near_plane, 0.1);
        assert_eq!(config.material.ambient, 0.2);
        assert_eq!(config.material.specular_power, 6.0);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let err = CannonsConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_asset_path_joins_dir() {
        let config = CannonsConfig::default();
        assert_eq!(config.asset_path("ball.obj"), PathBuf::from("assets").join("ball.obj"));
    }
}
