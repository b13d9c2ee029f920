//! Bubble entity and its lifecycle
//!
//! A bubble moves while `Idle`, freezes and plays its burst while
//! `Bursting`, and ends in `Removed`. No transition leaves `Removed`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::advance_progress;
use super::collision::{circle_contains, viewport_bounce};
use crate::settings::SimTuning;

/// Smallest radius a bubble may have
pub const MIN_RADIUS: f32 = 1.0;

/// Lifecycle state of a bubble
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BubbleState {
    /// Drifting and clickable
    Idle,
    /// Playing the burst animation, progress in `[0, 1]`
    Bursting { progress: f32 },
    /// Burst finished; waiting to be pruned
    Removed,
}

/// Drawable area, origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Non-finite or negative sizes collapse to zero
    pub fn new(width: f32, height: f32) -> Self {
        let sane = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: sane(width),
            height: sane(height),
        }
    }

    /// True if a circle fits entirely inside
    pub fn contains_circle(&self, center: Vec2, radius: f32) -> bool {
        center.x >= radius
            && center.y >= radius
            && center.x <= self.width - radius
            && center.y <= self.height - radius
    }
}

/// A text bubble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    pub id: u32,
    text: String,
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    /// Normalized RGB
    color: [f32; 3],
    state: BubbleState,
}

impl Bubble {
    /// Build an idle bubble with explicit geometry.
    ///
    /// The id is assigned when the bubble is inserted into a manager.
    pub fn new(
        text: impl Into<String>,
        pos: Vec2,
        vel: Vec2,
        radius: f32,
        color: [f32; 3],
    ) -> Self {
        let radius = if radius.is_finite() { radius.max(MIN_RADIUS) } else { MIN_RADIUS };
        Self {
            id: 0,
            text: text.into(),
            pos,
            vel,
            radius,
            color,
            state: BubbleState::Idle,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    pub fn state(&self) -> BubbleState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, BubbleState::Idle)
    }

    /// Burst completion; 0.0 while idle, 1.0 once removed
    pub fn burst_progress(&self) -> f32 {
        match self.state {
            BubbleState::Idle => 0.0,
            BubbleState::Bursting { progress } => progress,
            BubbleState::Removed => 1.0,
        }
    }

    /// Advance motion or burst animation by `dt` seconds
    pub fn advance(&mut self, dt: f32, viewport: &Viewport, tuning: &SimTuning) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        match self.state {
            BubbleState::Removed => {}
            BubbleState::Idle => {
                let pos = self.pos + self.vel * dt * tuning.speed_multiplier;
                let bounce =
                    viewport_bounce(pos, self.vel, self.radius, viewport, tuning.bounce_damping);
                if bounce.hit.any() {
                    log::trace!("bubble {} bounced at {:?}", self.id, bounce.pos);
                }
                self.pos = bounce.pos;
                self.vel = bounce.vel;
            }
            BubbleState::Bursting { progress } => {
                let progress = advance_progress(progress, tuning.burst_rate(), dt);
                self.state = if progress >= 1.0 {
                    BubbleState::Removed
                } else {
                    BubbleState::Bursting { progress }
                };
            }
        }
    }

    /// Geometric hit test against the (inflated) body
    pub fn hit_test(&self, point: Vec2, tolerance: f32) -> bool {
        circle_contains(self.pos, self.radius, point, tolerance)
    }

    /// Start bursting. Returns false (and changes nothing) unless idle.
    pub fn burst(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = BubbleState::Bursting { progress: 0.0 };
        true
    }

    /// Ready to be dropped from the collection
    pub fn is_removable(&self) -> bool {
        match self.state {
            BubbleState::Idle => false,
            BubbleState::Bursting { progress } => progress >= 1.0,
            BubbleState::Removed => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bubble_at(x: f32, y: f32, vx: f32, vy: f32) -> Bubble {
        Bubble::new("test", Vec2::new(x, y), Vec2::new(vx, vy), 40.0, [1.0, 0.0, 0.0])
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_radius_is_positive() {
        let zero = Bubble::new("a", Vec2::ZERO, Vec2::ZERO, 0.0, [0.0; 3]);
        assert_eq!(zero.radius(), MIN_RADIUS);
        let nan = Bubble::new("a", Vec2::ZERO, Vec2::ZERO, f32::NAN, [0.0; 3]);
        assert_eq!(nan.radius(), MIN_RADIUS);
    }

    #[test]
    fn test_idle_moves() {
        let tuning = SimTuning::default();
        let mut b = bubble_at(400.0, 300.0, 10.0, -5.0);
        b.advance(1.0, &viewport(), &tuning);
        assert!((b.pos().x - (400.0 + 10.0 * tuning.speed_multiplier)).abs() < 0.001);
        assert!((b.pos().y - (300.0 - 5.0 * tuning.speed_multiplier)).abs() < 0.001);
    }

    #[test]
    fn test_left_edge_flip() {
        let tuning = SimTuning::default();
        let mut b = bubble_at(40.0, 300.0, -30.0, 0.0);
        b.advance(1.0 / 60.0, &viewport(), &tuning);
        assert!(b.vel().x > 0.0);
        assert!(b.pos().x >= b.radius());
    }

    #[test]
    fn test_zero_dt_is_idempotent() {
        let tuning = SimTuning::default();
        let mut b = bubble_at(40.0, 40.0, -30.0, -30.0);
        b.advance(0.0, &viewport(), &tuning);
        assert_eq!(b.pos(), Vec2::new(40.0, 40.0));
        assert_eq!(b.vel(), Vec2::new(-30.0, -30.0));
    }

    #[test]
    fn test_burst_is_one_shot() {
        let tuning = SimTuning::default();
        let mut b = bubble_at(400.0, 300.0, 0.0, 0.0);
        assert!(b.burst());
        b.advance(0.1, &viewport(), &tuning);
        let progress = b.burst_progress();
        assert!(progress > 0.0);

        assert!(!b.burst());
        assert!(matches!(b.state(), BubbleState::Bursting { .. }));
        assert_eq!(b.burst_progress(), progress);
    }

    #[test]
    fn test_bursting_freezes_position() {
        let tuning = SimTuning::default();
        let mut b = bubble_at(400.0, 300.0, 50.0, 50.0);
        b.burst();
        b.advance(0.1, &viewport(), &tuning);
        assert_eq!(b.pos(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_burst_completes_and_stays_removed() {
        let tuning = SimTuning::default();
        let mut b = bubble_at(400.0, 300.0, 50.0, 50.0);
        b.burst();
        for _ in 0..60 {
            b.advance(1.0 / 60.0, &viewport(), &tuning);
        }
        assert_eq!(b.state(), BubbleState::Removed);
        assert!(b.is_removable());

        let pos = b.pos();
        b.advance(1.0, &viewport(), &tuning);
        assert_eq!(b.pos(), pos);
        assert_eq!(b.burst_progress(), 1.0);
        assert!(!b.burst());
    }

    #[test]
    fn test_shrunk_viewport_clamps_on_next_advance() {
        let tuning = SimTuning::default();
        let mut b = bubble_at(700.0, 500.0, 0.0, 0.0);
        let small = Viewport::new(400.0, 300.0);
        assert!(!small.contains_circle(b.pos(), b.radius()));
        b.advance(0.0, &small, &tuning);
        assert!(small.contains_circle(b.pos(), b.radius()));
    }

    proptest! {
        #[test]
        fn prop_invariants_hold(
            x in 0.0f32..800.0,
            y in 0.0f32..600.0,
            vx in -200.0f32..200.0,
            vy in -200.0f32..200.0,
            radius in 1.0f32..80.0,
            steps in proptest::collection::vec(0.0f32..0.2, 1..50),
            burst_at in 0usize..50,
        ) {
            let tuning = SimTuning::default();
            let vp = viewport();
            let mut b = Bubble::new("p", Vec2::new(x, y), Vec2::new(vx, vy), radius, [0.5; 3]);
            let mut last_progress = 0.0;
            for (i, dt) in steps.iter().enumerate() {
                if i == burst_at {
                    b.burst();
                }
                b.advance(*dt, &vp, &tuning);
                prop_assert!(b.radius() > 0.0);
                let p = b.burst_progress();
                prop_assert!((0.0..=1.0).contains(&p));
                prop_assert!(p >= last_progress);
                last_progress = p;
                if b.is_idle() {
                    prop_assert!(vp.contains_circle(b.pos(), b.radius()));
                }
            }
        }

        #[test]
        fn prop_speed_never_grows(
            vx in -200.0f32..200.0,
            vy in -200.0f32..200.0,
            dt in 0.0f32..0.5,
        ) {
            let tuning = SimTuning::default();
            let mut b = bubble_at(400.0, 300.0, vx, vy);
            let before = b.vel().length();
            for _ in 0..100 {
                b.advance(dt, &viewport(), &tuning);
            }
            prop_assert!(b.vel().length() <= before + 1e-3);
        }
    }
}
