//! Bubble Pop - drifting text bubbles you can click to pop
//!
//! Core modules:
//! - `sim`: Simulation core (bubble state machine, boundary physics, click resolution)
//! - `driver`: Frame loop tying input, simulation and rendering together
//! - `platform`: Input events, clocks and event sources
//! - `renderer`: CPU tessellation of frame snapshots
//! - `audio`: Pop sound playback with failure isolation
//! - `loader`: Label loading from text/CSV files
//! - `settings`: Data-driven tuning and preferences

pub mod audio;
pub mod driver;
pub mod loader;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings, SimTuning};

use glam::Vec2;

/// Configuration constants
pub mod consts {
    /// Target update rate
    pub const TARGET_FPS: u32 = 60;
    /// Largest dt fed to the simulation (stalls are clamped, not replayed)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default viewport dimensions
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 720.0;

    /// Bubble defaults
    pub const MAX_TEXT_LEN: usize = 20;
    pub const BUBBLE_MIN_RADIUS: f32 = 40.0;
    pub const BUBBLE_MAX_RADIUS: f32 = 80.0;
    /// Max speed on each axis at spawn (pixels/s)
    pub const BASE_SPEED: f32 = 90.0;
    /// Global drift multiplier applied during integration
    pub const SPEED_MULTIPLIER: f32 = 0.8;
    /// Velocity retained after an edge bounce
    pub const BOUNCE_DAMPING: f32 = 0.9;
    /// Seconds from click to removal
    pub const BURST_DURATION: f32 = 0.5;
    /// Hit radius inflation for small targets
    pub const HIT_TOLERANCE: f32 = 1.1;

    /// Built-in labels used when no input is available
    pub const PLACEHOLDER_TEXTS: [&str; 3] =
        ["Click to pop!", "Right-click to reload", "Press N to add"];
}

/// Linear interpolation between two RGB colors
#[inline]
pub fn lerp_rgb(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Parse `#RRGGBB` (leading `#` optional) into normalized RGB
pub fn parse_hex_color(hex: &str) -> Option<[f32; 3]> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok().map(|v| v as f32 / 255.0);
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Unit direction for an angle in radians
#[inline]
pub fn direction(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        let c = parse_hex_color("#FF6B6B").unwrap();
        assert!((c[0] - 1.0).abs() < 0.001);
        assert!((c[1] - 107.0 / 255.0).abs() < 0.001);
        assert_eq!(parse_hex_color("4ECDC4").map(|c| c[2] > 0.7), Some(true));
        assert!(parse_hex_color("#FFF").is_none());
        assert!(parse_hex_color("#GG0000").is_none());
    }

    #[test]
    fn test_lerp_rgb_clamps() {
        let a = [0.0, 0.0, 0.0];
        let b = [1.0, 0.5, 0.0];
        assert_eq!(lerp_rgb(a, b, 2.0), b);
        assert_eq!(lerp_rgb(a, b, -1.0), a);
    }
}
