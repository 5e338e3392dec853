//! Engine configuration
//!
//! Everything here is static per level. Values are validated once at engine
//! construction; a bad value is a broken level definition, not something to
//! clamp at runtime.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, LoadError};
use crate::sim::entity::Styling;

/// Haunt cadence and difficulty
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HauntConfig {
    /// Seconds between haunts at the start of a level
    pub initial_interval: f32,
    /// Interval floor
    pub min_interval: f32,
    /// Interval reduction applied after each haunt cycle
    pub decrease_rate: f32,
    /// Tighten the interval over time
    pub increase_difficulty: bool,
    /// Cap on props out of place at once
    pub max_simultaneous_displaced: u32,
    /// Per-axis orientation jitter (degrees) applied to displaced props
    pub rotation_jitter_degrees: f32,
}

impl Default for HauntConfig {
    fn default() -> Self {
        Self {
            initial_interval: INITIAL_HAUNT_INTERVAL,
            min_interval: MIN_HAUNT_INTERVAL,
            decrease_rate: HAUNT_INTERVAL_DECREASE,
            increase_difficulty: true,
            max_simultaneous_displaced: MAX_SIMULTANEOUS_HAUNTS,
            rotation_jitter_degrees: ROTATION_JITTER_DEGREES,
        }
    }
}

/// Random offset sampling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub offset_min: Vec3,
    pub offset_max: Vec3,
    pub max_attempts: u32,
    /// When false the first sample is accepted without visibility checks
    pub constrain_visibility: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            offset_min: Vec3::new(-2.0, 0.0, -2.0),
            offset_max: Vec3::new(2.0, 1.0, 2.0),
            max_attempts: MAX_PLACEMENT_ATTEMPTS,
            constrain_visibility: true,
        }
    }
}

/// Constraints a displacement target must satisfy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    /// Inset from each viewport edge, as a fraction of the viewport
    pub screen_margin: f32,
    pub occlusion_enabled: bool,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            screen_margin: SCREEN_MARGIN,
            occlusion_enabled: true,
        }
    }
}

/// Pointer handling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub pick_distance: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            pick_distance: PICK_DISTANCE,
        }
    }
}

/// Tint colors (RGBA) overlaid on props
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub highlight: [f32; 4],
    pub wrong: [f32; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            highlight: [1.0, 0.92, 0.016, 1.0],
            wrong: [1.0, 0.0, 0.0, 1.0],
        }
    }
}

impl Palette {
    /// Tint for a styling, `None` means keep the prop's own material color
    pub fn tint(&self, styling: Styling) -> Option<[f32; 4]> {
        match styling {
            Styling::Default => None,
            Styling::Wrong => Some(self.wrong),
            Styling::Highlight => Some(self.highlight),
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the haunt RNG
    pub seed: u64,
    pub haunt: HauntConfig,
    pub placement: PlacementConfig,
    pub visibility: VisibilityConfig,
    pub interaction: InteractionConfig,
    pub palette: Palette,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            haunt: HauntConfig::default(),
            placement: PlacementConfig::default(),
            visibility: VisibilityConfig::default(),
            interaction: InteractionConfig::default(),
            palette: Palette::default(),
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

impl EngineConfig {
    /// Reject anything that indicates a broken level definition
    pub fn validate(&self) -> Result<(), ConfigError> {
        let haunt = &self.haunt;
        positive("initial_interval", haunt.initial_interval)?;
        positive("min_interval", haunt.min_interval)?;
        if haunt.min_interval > haunt.initial_interval {
            return Err(ConfigError::IntervalOrder {
                min: haunt.min_interval,
                initial: haunt.initial_interval,
            });
        }
        if !haunt.decrease_rate.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "decrease_rate",
            });
        }
        if haunt.decrease_rate < 0.0 {
            return Err(ConfigError::NegativeDecreaseRate(haunt.decrease_rate));
        }
        if haunt.max_simultaneous_displaced == 0 {
            return Err(ConfigError::ZeroDisplacementCap);
        }
        if !haunt.rotation_jitter_degrees.is_finite() || haunt.rotation_jitter_degrees < 0.0 {
            return Err(ConfigError::NonFinite {
                field: "rotation_jitter_degrees",
            });
        }

        let placement = &self.placement;
        if placement.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if !placement.offset_min.is_finite() || !placement.offset_max.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "offset_range",
            });
        }
        for (axis, min, max) in [
            ('x', placement.offset_min.x, placement.offset_max.x),
            ('y', placement.offset_min.y, placement.offset_max.y),
            ('z', placement.offset_min.z, placement.offset_max.z),
        ] {
            if min > max {
                return Err(ConfigError::InvertedOffsetRange { axis, min, max });
            }
        }

        let margin = self.visibility.screen_margin;
        if !(0.0..0.5).contains(&margin) {
            return Err(ConfigError::ScreenMargin(margin));
        }

        positive("pick_distance", self.interaction.pick_distance)?;
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }
}
