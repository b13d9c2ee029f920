//! Bubble simulation module
//!
//! All behavior lives here. This module must stay headless:
//! - Seeded RNG only
//! - Stable iteration order (insertion order = z-order)
//! - No rendering, audio or platform dependencies

pub mod animation;
pub mod collision;
pub mod manager;
pub mod spawn;
pub mod state;

pub use animation::{BurstParticle, ParticleSample, advance_progress, particle_layout};
pub use collision::{BoundaryHit, BoundaryResult, circle_contains, viewport_bounce};
pub use manager::{BubbleManager, SimEvent};
pub use spawn::{Spawner, generated_label, truncate_label};
pub use state::{Bubble, BubbleState, Viewport};
