//! Randomized bubble creation
//!
//! The random source is passed in, so a seeded `Pcg32` reproduces the same
//! field every run.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{Bubble, Viewport};
use crate::parse_hex_color;
use crate::settings::SimTuning;

/// Trim and cut a label to at most `max_len` characters
pub fn truncate_label(text: &str, max_len: usize) -> String {
    text.trim().chars().take(max_len).collect()
}

/// Label for a bubble added by hand
pub fn generated_label(n: usize) -> String {
    format!("Bubble {n}")
}

/// Creates bubbles from a fixed tuning
#[derive(Debug, Clone)]
pub struct Spawner {
    radius_min: f32,
    radius_max: f32,
    base_speed: f32,
    max_text_len: usize,
    colors: Vec<[f32; 3]>,
}

impl Spawner {
    pub fn from_tuning(tuning: &SimTuning) -> Self {
        let colors: Vec<[f32; 3]> =
            tuning.palette.iter().filter_map(|c| parse_hex_color(c)).collect();
        if colors.len() != tuning.palette.len() {
            log::warn!(
                "Ignoring {} unparseable palette entries",
                tuning.palette.len() - colors.len()
            );
        }
        Self {
            radius_min: tuning.radius_min,
            radius_max: tuning.radius_max.max(tuning.radius_min),
            base_speed: tuning.base_speed.abs(),
            max_text_len: tuning.max_text_len,
            colors,
        }
    }

    /// Spawn an idle bubble somewhere inside the viewport
    pub fn spawn<R: Rng + ?Sized>(&self, text: &str, viewport: &Viewport, rng: &mut R) -> Bubble {
        let radius = rng.random_range(self.radius_min..=self.radius_max);
        let pos = Vec2::new(
            random_axis(rng, radius, viewport.width),
            random_axis(rng, radius, viewport.height),
        );
        let vel = Vec2::new(
            rng.random_range(-self.base_speed..=self.base_speed),
            rng.random_range(-self.base_speed..=self.base_speed),
        );
        let color = self.pick_color(rng);
        Bubble::new(truncate_label(text, self.max_text_len), pos, vel, radius, color)
    }

    /// Palette color, or a light random one when the palette is empty
    fn pick_color<R: Rng + ?Sized>(&self, rng: &mut R) -> [f32; 3] {
        match self.colors.choose(rng) {
            Some(c) => *c,
            None => {
                let mut channel = || rng.random_range(100u8..=255) as f32 / 255.0;
                [channel(), channel(), channel()]
            }
        }
    }
}

/// Uniform coordinate in `[radius, extent - radius]`, or the middle when it doesn't fit
fn random_axis<R: Rng + ?Sized>(rng: &mut R, radius: f32, extent: f32) -> f32 {
    if extent < 2.0 * radius {
        extent * 0.5
    } else {
        rng.random_range(radius..=extent - radius)
    }
}
