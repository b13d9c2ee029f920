//! Burst animation model
//!
//! Progress runs from 0.0 (just clicked) to 1.0 (gone). Everything here is a
//! pure function of progress so the renderer can sample it at any frame.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::{direction, lerp_rgb};

/// Color the spokes fade toward
pub const BURST_TARGET_COLOR: [f32; 3] = [1.0, 165.0 / 255.0, 0.0];

/// Number of radiating spokes
pub const SPOKE_COUNT: u32 = 8;

/// Advance burst progress by `rate * dt`, clamped to `[0, 1]`.
///
/// Negative or NaN `dt` counts as zero so progress never decreases.
#[inline]
pub fn advance_progress(progress: f32, rate: f32, dt: f32) -> f32 {
    let step = (rate * dt.max(0.0)).max(0.0);
    (progress + step).clamp(0.0, 1.0)
}

/// Spoke length at the given progress
#[inline]
pub fn spoke_length(radius: f32, progress: f32) -> f32 {
    radius * (0.5 + progress.clamp(0.0, 1.0) * 1.5)
}

/// Spoke color: bubble color blending toward orange
#[inline]
pub fn spoke_color(base: [f32; 3], progress: f32) -> [f32; 3] {
    lerp_rgb(base, BURST_TARGET_COLOR, progress)
}

/// Overall opacity of the burst
#[inline]
pub fn burst_alpha(progress: f32) -> f32 {
    1.0 - progress.clamp(0.0, 1.0)
}

/// A particle thrown out by a burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstParticle {
    /// Unit direction of travel
    pub dir: Vec2,
    /// Distance covered at full progress, in radii
    pub reach: f32,
    /// Progress at which the particle has fully faded (0.8 - 1.2)
    pub life: f32,
}

/// Where a particle is drawn at a given progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSample {
    /// Offset from the bubble center
    pub offset: Vec2,
    pub size: f32,
    pub alpha: f32,
}

impl BurstParticle {
    /// Sample the particle, `None` once its life is spent
    pub fn sample(&self, progress: f32, radius: f32) -> Option<ParticleSample> {
        let progress = progress.clamp(0.0, 1.0);
        if progress > self.life {
            return None;
        }
        let remaining = 1.0 - progress / self.life;
        Some(ParticleSample {
            offset: self.dir * self.reach * radius * progress,
            size: (5.0 * remaining).max(2.0),
            alpha: remaining,
        })
    }
}

/// Particle layout for a bubble.
///
/// Seeded by the bubble id so the same bubble bursts the same way every frame.
pub fn particle_layout(seed: u32, count: u32) -> Vec<BurstParticle> {
    let mut rng = Pcg32::seed_from_u64(seed as u64);
    (0..count)
        .map(|_| BurstParticle {
            dir: direction(rng.random_range(0.0..std::f32::consts::TAU)),
            reach: rng.random_range(0.6..1.6),
            life: rng.random_range(0.8..=1.2),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_progress_clamps() {
        assert_eq!(advance_progress(0.0, 2.0, 0.25), 0.5);
        assert_eq!(advance_progress(0.9, 2.0, 0.25), 1.0);
        assert_eq!(advance_progress(0.5, 2.0, -1.0), 0.5);
        assert_eq!(advance_progress(0.5, 2.0, f32::NAN), 0.5);
    }

    #[test]
    fn test_spokes_grow_and_fade() {
        assert_eq!(spoke_length(40.0, 0.0), 20.0);
        assert_eq!(spoke_length(40.0, 1.0), 80.0);
        assert_eq!(burst_alpha(0.25), 0.75);
        assert_eq!(spoke_color([0.0, 0.0, 1.0], 1.0), BURST_TARGET_COLOR);
    }

    #[test]
    fn test_particle_layout_is_stable_per_seed() {
        let a = particle_layout(7, 12);
        let b = particle_layout(7, 12);
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
        assert!(a.iter().all(|p| (0.8..=1.2).contains(&p.life)));
        assert_ne!(particle_layout(8, 12), a);
    }

    #[test]
    fn test_particle_expires() {
        let p = BurstParticle {
            dir: Vec2::X,
            reach: 1.0,
            life: 0.8,
        };
        let early = p.sample(0.4, 10.0).unwrap();
        assert!((early.offset.x - 4.0).abs() < 0.001);
        assert!((early.alpha - 0.5).abs() < 0.001);
        assert!(p.sample(0.9, 10.0).is_none());
    }
}
