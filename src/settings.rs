//! Settings, preferences and simulation tuning
//!
//! Persisted as JSON next to the binary (or wherever `--settings` points).
//! Every field has a default so partial files load cleanly.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::consts::*;

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

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Triangle fan segments per bubble body
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 16,
            QualityPreset::Medium => 32,
            QualityPreset::High => 64,
        }
    }

    /// Particles emitted by a bursting bubble
    pub fn burst_particles(&self) -> u32 {
        match self {
            QualityPreset::Low => 6,
            QualityPreset::Medium => 12,
            QualityPreset::High => 20,
        }
    }
}

/// Simulation tuning shared by every bubble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimTuning {
    /// Smallest spawn radius (pixels, > 0)
    pub radius_min: f32,
    /// Largest spawn radius (pixels)
    pub radius_max: f32,
    /// Max spawn speed per axis (pixels/s)
    pub base_speed: f32,
    /// Drift multiplier applied during integration
    pub speed_multiplier: f32,
    /// Fraction of velocity kept after an edge bounce (0-1)
    pub bounce_damping: f32,
    /// Burst animation length in seconds
    pub burst_duration: f32,
    /// Hit radius inflation (>= 1)
    pub hit_tolerance: f32,
    /// Labels are cut to this many characters
    pub max_text_len: usize,
    /// Bubble colors as `#RRGGBB`
    pub palette: Vec<String>,
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            radius_min: BUBBLE_MIN_RADIUS,
            radius_max: BUBBLE_MAX_RADIUS,
            base_speed: BASE_SPEED,
            speed_multiplier: SPEED_MULTIPLIER,
            bounce_damping: BOUNCE_DAMPING,
            burst_duration: BURST_DURATION,
            hit_tolerance: HIT_TOLERANCE,
            max_text_len: MAX_TEXT_LEN,
            palette: ["#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEEAD"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SimTuning {
    /// Progress gained per second while bursting
    pub fn burst_rate(&self) -> f32 {
        1.0 / self.burst_duration
    }

    /// Clamp hand-edited values back into a range the simulation can rely on
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.radius_min.is_finite() && self.radius_min > 0.0) {
            log::warn!("radius_min {} invalid, using {}", self.radius_min, defaults.radius_min);
            self.radius_min = defaults.radius_min;
        }
        if !(self.radius_max.is_finite() && self.radius_max >= self.radius_min) {
            self.radius_max = self.radius_min;
        }
        if !(self.base_speed.is_finite() && self.base_speed >= 0.0) {
            self.base_speed = defaults.base_speed;
        }
        if !(self.speed_multiplier.is_finite() && self.speed_multiplier >= 0.0) {
            self.speed_multiplier = defaults.speed_multiplier;
        }
        self.bounce_damping = if self.bounce_damping.is_finite() {
            self.bounce_damping.clamp(0.0, 1.0)
        } else {
            defaults.bounce_damping
        };
        if !(self.burst_duration.is_finite() && self.burst_duration > 0.0) {
            self.burst_duration = defaults.burst_duration;
        }
        if !(self.hit_tolerance.is_finite() && self.hit_tolerance >= 1.0) {
            self.hit_tolerance = 1.0;
        }
        if self.max_text_len == 0 {
            self.max_text_len = defaults.max_text_len;
        }
        self
    }
}

/// Application settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Burst particles
    pub particles: bool,
    /// Specular highlight on idle bubbles
    pub highlights: bool,

    // === Window ===
    /// Initial viewport width
    pub width: f32,
    /// Initial viewport height
    pub height: f32,
    /// Target frame rate
    pub fps: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Start muted
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no particles, half-length spokes)
    pub reduced_motion: bool,

    /// Simulation tuning
    pub tuning: SimTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            particles: true,
            highlights: true,

            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
            fps: TARGET_FPS,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            reduced_motion: false,

            tuning: SimTuning::default(),
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset drops the cosmetic extras
        if preset == QualityPreset::Low {
            self.highlights = false;
        }
    }

    /// Effective particles (respects reduced_motion)
    pub fn effective_particles(&self) -> bool {
        self.particles && !self.reduced_motion
    }

    /// Effective particle count per burst
    pub fn burst_particles(&self) -> u32 {
        if self.effective_particles() {
            self.quality.burst_particles()
        } else {
            0
        }
    }

    /// Frame duration for the configured rate
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }

    /// Read settings from a JSON file
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let mut settings: Settings = serde_json::from_str(&json)
            .with_context(|| format!("parsing settings in {}", path.display()))?;
        settings.tuning = settings.tuning.sanitized();
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({e:#})");
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing settings to {}", path.display()))?;
        log::info!("Settings saved");
        Ok(())
    }
}
