//! Demo settings and scene parameters
//!
//! Persisted to LocalStorage on the web build so tweaks survive a reload.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{ChaseMode, SwarmParams};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
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

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Sphere tessellation as (sectors, stacks)
    pub fn sphere_segments(&self) -> (u32, u32) {
        match self {
            QualityPreset::Low => (16, 8),
            QualityPreset::Medium => (32, 16),
            QualityPreset::High => (48, 24),
        }
    }

    /// Whether to draw the ground grid
    pub fn grid_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Demo settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Scene ===
    /// Blob color as 0xRRGGBB
    pub blob_color: u32,
    /// Fog color as 0xRRGGBB
    pub fog_color: u32,
    /// Fog start distance (world units from the camera)
    pub fog_near: f32,
    /// Fog saturation distance
    pub fog_far: f32,

    // === Swarm ===
    /// Chain length including the hidden leader
    pub blob_count: usize,
    /// Initial position spread multiplier
    pub spawn_spread: f32,
    /// Follower chase strategy
    pub chase: ChaseMode,
    /// Per-frame lerp factor for the smooth chase
    pub smoothing: f32,
    /// Map the pointer into the swarm offset each frame
    pub follow_pointer: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            blob_color: 0x00FFFF,
            fog_color: 0x000000,
            fog_near: 4.0,
            fog_far: 12.0,

            blob_count: BLOB_COUNT,
            spawn_spread: SPAWN_SPREAD,
            chase: ChaseMode::Smooth,
            smoothing: CHASE_SMOOTHING,
            follow_pointer: false,

            show_fps: true,
        }
    }
}

impl Settings {
    /// Swarm parameters derived from the current settings
    pub fn swarm_params(&self) -> SwarmParams {
        SwarmParams {
            blob_count: self.blob_count,
            spawn_spread: self.spawn_spread,
            chase: self.chase,
            smoothing: self.smoothing.clamp(f32::EPSILON, 1.0),
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "blob_drift_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_round_trip() {
        for preset in [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High] {
            assert_eq!(QualityPreset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(QualityPreset::from_str("ultra"), None);
    }

    #[test]
    fn test_swarm_params_clamps_smoothing() {
        let settings = Settings {
            smoothing: 7.5,
            ..Default::default()
        };
        assert_eq!(settings.swarm_params().smoothing, 1.0);
    }

    #[test]
    fn test_settings_json_round_trip() {
        let settings = Settings {
            blob_color: 0xFF8800,
            follow_pointer: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.blob_color, 0xFF8800);
        assert!(back.follow_pointer);
    }
}
