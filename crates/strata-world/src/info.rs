use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Descriptive metadata of a world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldInfo {
    pub title: String,
    pub seed: String,
    pub time_ms: u64,
    pub generator: String,
}

impl WorldInfo {
    /// A missing title falls back to the seed.
    pub fn new(
        title: Option<String>,
        seed: impl Into<String>,
        time_ms: u64,
        generator: impl Into<String>,
    ) -> Self {
        let seed = seed.into();
        Self {
            title: title.unwrap_or_else(|| seed.clone()),
            seed,
            time_ms,
            generator: generator.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read world config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse world config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid world config: {0}")]
    Invalid(String),
}

/// Contents of `world.toml`.
#[derive(Clone, Debug, Deserialize)]
pub struct WorldConfig {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub seed: String,
    #[serde(default)]
    pub time_ms: u64,
    #[serde(default = "default_generator")]
    pub generator: String,
    #[serde(default)]
    pub terrain: TerrainConfig,
}

fn default_generator() -> String {
    "strata:flat".to_string()
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            title: None,
            seed: String::new(),
            time_ms: 0,
            generator: default_generator(),
            terrain: TerrainConfig::default(),
        }
    }
}

/// Flat test terrain filled in by the demo binary.
#[derive(Clone, Debug, Deserialize)]
pub struct TerrainConfig {
    /// Chunks loaded in each horizontal direction from the origin chunk.
    #[serde(default = "default_chunk_radius")]
    pub chunk_radius: i32,
    /// Topmost solid layer.
    #[serde(default = "default_ground_height")]
    pub ground_height: i32,
    #[serde(default = "default_ground_block")]
    pub ground_block: String,
}

fn default_chunk_radius() -> i32 {
    2
}
fn default_ground_height() -> i32 {
    63
}
fn default_ground_block() -> String {
    "stone".to_string()
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            chunk_radius: default_chunk_radius(),
            ground_height: default_ground_height(),
            ground_block: default_ground_block(),
        }
    }
}

impl WorldConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: WorldConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.terrain.chunk_radius < 0 {
            return Err(ConfigError::Invalid(format!(
                "terrain.chunk_radius must not be negative, got {}",
                self.terrain.chunk_radius
            )));
        }
        let max_y = strata_chunk::SIZE_Y as i32 - 1;
        if !(-1..=max_y).contains(&self.terrain.ground_height) {
            return Err(ConfigError::Invalid(format!(
                "terrain.ground_height must be within -1..={max_y}, got {}",
                self.terrain.ground_height
            )));
        }
        Ok(())
    }

    pub fn info(&self) -> WorldInfo {
        WorldInfo::new(
            self.title.clone(),
            self.seed.clone(),
            self.time_ms,
            self.generator.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_falls_back_to_seed() {
        let info = WorldInfo::new(None, "abc", 5, "strata:flat");
        assert_eq!(info.title, "abc");
        let info = WorldInfo::new(Some("Home".into()), "abc", 5, "strata:flat");
        assert_eq!(info.title, "Home");
    }

    #[test]
    fn parses_with_defaults() {
        let cfg = WorldConfig::from_toml_str(r#"seed = "s1""#).unwrap();
        assert_eq!(cfg.generator, "strata:flat");
        assert_eq!(cfg.terrain.chunk_radius, 2);
        assert_eq!(cfg.info().title, "s1");
    }

    #[test]
    fn rejects_bad_terrain() {
        let err = WorldConfig::from_toml_str(
            r#"
            [terrain]
            ground_height = 900
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = WorldConfig::from_toml_str("seed = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
