//! Simulation settings and tuning
//!
//! Loaded from JSON so balance can be tweaked without recompiling. Every field
//! has a default, so partial files are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset (oldest dropped first)
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 500,
            QualityPreset::Medium => 2000,
            QualityPreset::High => 8000,
        }
    }
}

/// Terrain layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGenSettings {
    /// World width in blocks
    pub width: i32,
    /// World height in blocks
    pub height: i32,
    /// Row of the grass/surface layer (everything above is air)
    pub surface_row: i32,
    /// First row below the dirt band
    pub dirt_end_row: i32,
    /// Row ore depth is measured from
    pub stone_start_row: i32,
    /// First bedrock row
    pub bedrock_row: i32,
    /// Bedrock band thickness when the nether is enabled
    pub bedrock_thickness: i32,
    /// Split the world into five biome bands
    pub biomes: bool,
    /// Generate a second dimension below the bedrock band
    pub nether: bool,
}

impl Default for WorldGenSettings {
    fn default() -> Self {
        Self {
            width: 100,
            height: 500,
            surface_row: 10,
            dirt_end_row: 15,
            stone_start_row: 20,
            bedrock_row: 480,
            bedrock_thickness: 3,
            biomes: false,
            nether: false,
        }
    }
}

/// Top-down TNT spawning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardSettings {
    /// Nominal seconds between spawn rolls
    pub spawn_interval: f32,
    /// Random jitter applied to the next interval after a spawn
    pub interval_jitter: f32,
    /// Spawn chance at the surface
    pub base_chance: f32,
    /// Extra chance per block of player depth
    pub depth_multiplier: f32,
    /// Upper bound on the spawn chance
    pub max_chance: f32,
    /// Fuse band for spawned TNT
    pub min_fuse: f32,
    pub max_fuse: f32,
}

impl Default for HazardSettings {
    fn default() -> Self {
        Self {
            spawn_interval: 5.0,
            interval_jitter: 1.0,
            base_chance: 0.3,
            depth_multiplier: 0.02,
            max_chance: 0.95,
            min_fuse: 2.0,
            max_fuse: 3.5,
        }
    }
}

/// Meteor shower event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowerSettings {
    pub enabled: bool,
    /// Seconds between showers
    pub min_interval: f32,
    pub max_interval: f32,
    /// Shower length in seconds
    pub min_duration: f32,
    pub max_duration: f32,
    /// Seconds between meteors while active
    pub min_spawn_gap: f32,
    pub max_spawn_gap: f32,
}

impl Default for ShowerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_interval: 40.0,
            max_interval: 60.0,
            min_duration: 12.0,
            max_duration: 18.0,
            min_spawn_gap: 0.5,
            max_spawn_gap: 1.2,
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset (caps particle count)
    pub quality: QualityPreset,
    pub world: WorldGenSettings,
    pub hazards: HazardSettings,
    pub shower: ShowerSettings,
    /// Spawn the four starter pickaxes near the surface
    pub starter_items: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::default(),
            world: WorldGenSettings::default(),
            hazards: HazardSettings::default(),
            shower: ShowerSettings::default(),
            starter_items: true,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        self.quality.max_particles()
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Reject layouts and bands the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let w = &self.world;
        if w.width < 3 || w.height < 3 {
            return Err(invalid("world", "world must be at least 3x3 blocks"));
        }
        if !(0 <= w.surface_row
            && w.surface_row < w.dirt_end_row
            && w.dirt_end_row <= w.stone_start_row
            && w.stone_start_row <= w.bedrock_row
            && w.bedrock_row < w.height)
        {
            return Err(invalid(
                "world",
                "rows must satisfy surface < dirt_end <= stone_start <= bedrock < height",
            ));
        }
        if w.nether && w.bedrock_thickness < 1 {
            return Err(invalid("world.bedrock_thickness", "must be at least 1"));
        }
        check_band("hazards.fuse", self.hazards.min_fuse, self.hazards.max_fuse)?;
        if self.hazards.spawn_interval <= 0.0 {
            return Err(invalid("hazards.spawn_interval", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.hazards.max_chance) {
            return Err(invalid("hazards.max_chance", "must be within [0, 1]"));
        }
        check_band(
            "shower.interval",
            self.shower.min_interval,
            self.shower.max_interval,
        )?;
        check_band(
            "shower.duration",
            self.shower.min_duration,
            self.shower.max_duration,
        )?;
        check_band(
            "shower.spawn_gap",
            self.shower.min_spawn_gap,
            self.shower.max_spawn_gap,
        )?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn check_band(field: &'static str, min: f32, max: f32) -> Result<(), SettingsError> {
    if min <= 0.0 || min > max {
        return Err(SettingsError::Invalid {
            field,
            reason: format!("band [{min}, {max}] must be positive and ordered"),
        });
    }
    Ok(())
}
